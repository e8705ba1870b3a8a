use anyhow::Result;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use super::{MarketDataProvider, ProviderError};
use crate::models::{Config, HistoryPeriod, InfoBundle, PriceBar};

/// quoteSummary modules merged into one info bundle, earlier modules win on
/// duplicate keys
const SUMMARY_MODULES: &[&str] = &[
    "price",
    "summaryDetail",
    "financialData",
    "defaultKeyStatistics",
    "assetProfile",
];

/// Upper bound for each of the two session-setup requests
const CRUMB_TIMEOUT: Duration = Duration::from_secs(2);

enum CrumbState {
    Unknown,
    Ready(String),
    Failed,
}

/// Yahoo Finance HTTP client
pub struct YahooClient {
    client: Client,
    base_url: Url,
    cookie_url: String,
    crumb: Arc<Mutex<CrumbState>>,
}

impl YahooClient {
    /// Create a new Yahoo client
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout())
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.yahoo_base_url)?,
            cookie_url: config.yahoo_cookie_url.clone(),
            crumb: Arc::new(Mutex::new(CrumbState::Unknown)),
        })
    }

    fn endpoint(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Malformed(format!("cannot build URL from {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Session crumb required by quoteSummary. Attempted once per client:
    /// the outcome is cached either way, so after a failure every request
    /// goes out without a crumb instead of queueing behind a retry.
    async fn crumb(&self) -> Option<String> {
        let mut state = self.crumb.lock().await;
        match &*state {
            CrumbState::Ready(crumb) => return Some(crumb.clone()),
            CrumbState::Failed => return None,
            CrumbState::Unknown => {}
        }

        let fetched = self.fetch_crumb().await;
        *state = match &fetched {
            Some(crumb) => CrumbState::Ready(crumb.clone()),
            None => CrumbState::Failed,
        };
        fetched
    }

    async fn fetch_crumb(&self) -> Option<String> {
        // Primes the consent cookie; the response status itself is irrelevant
        if let Err(e) = self.client.get(&self.cookie_url).timeout(CRUMB_TIMEOUT).send().await {
            debug!("Cookie priming request failed: {}", e);
        }

        let url = self.endpoint(&["v1", "test", "getcrumb"], &[]).ok()?;
        let response = match self.client.get(url).timeout(CRUMB_TIMEOUT).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("⚠️ Crumb request returned {}, continuing without crumb", response.status());
                return None;
            }
            Err(e) => {
                warn!("⚠️ Crumb request failed, continuing without crumb: {}", e);
                return None;
            }
        };

        let crumb = response.text().await.ok()?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return None;
        }
        Some(crumb)
    }

    async fn get_json(&self, symbol: &str, url: Url) -> Result<Value, ProviderError> {
        debug!("Making request to: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::Http(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(symbol.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for YahooClient {
    async fn price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<PriceBar>, ProviderError> {
        let url = self.endpoint(
            &["v8", "finance", "chart", symbol],
            &[("range", period.as_str()), ("interval", "1d")],
        )?;
        let body = self.get_json(symbol, url).await?;
        let bars = parse_chart(symbol, &body)?;

        debug!("Retrieved {} price bars for {} ({})", bars.len(), symbol, period);
        Ok(bars)
    }

    async fn info_bundle(&self, symbol: &str) -> Result<InfoBundle, ProviderError> {
        let modules = SUMMARY_MODULES.join(",");
        let crumb = self.crumb().await;

        let mut params = vec![("modules", modules.as_str())];
        if let Some(crumb) = crumb.as_deref() {
            params.push(("crumb", crumb));
        }

        let url = self.endpoint(&["v10", "finance", "quoteSummary", symbol], &params)?;
        let body = self.get_json(symbol, url).await?;
        let bundle = parse_quote_summary(symbol, &body)?;

        debug!("Retrieved {} info fields for {}", bundle.len(), symbol);
        Ok(bundle)
    }
}

/// Extract daily closes from a v8 chart payload
pub fn parse_chart(symbol: &str, body: &Value) -> Result<Vec<PriceBar>, ProviderError> {
    let chart = body
        .get("chart")
        .ok_or_else(|| ProviderError::Malformed("missing chart object".to_string()))?;

    if chart.get("error").map_or(false, |e| !e.is_null()) {
        return Err(ProviderError::NotFound(symbol.to_string()));
    }

    let Some(result) = chart
        .get("result")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
    else {
        return Ok(Vec::new());
    };

    let timestamps = result
        .get("timestamp")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let closes = result
        .pointer("/indicators/quote/0/close")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let bars = timestamps
        .iter()
        .zip(closes.iter())
        .filter_map(|(ts, close)| {
            let timestamp = DateTime::from_timestamp(ts.as_i64()?, 0)?;
            Some(PriceBar {
                timestamp,
                close: close.as_f64().filter(|c| c.is_finite()),
            })
        })
        .collect();

    Ok(bars)
}

/// Flatten a v10 quoteSummary payload into one field map.
///
/// `{"raw": x, "fmt": ".."}` wrappers collapse to `x` and empty objects to
/// null, so every scalar field is directly addressable by its key.
pub fn parse_quote_summary(symbol: &str, body: &Value) -> Result<InfoBundle, ProviderError> {
    let summary = body
        .get("quoteSummary")
        .ok_or_else(|| ProviderError::Malformed("missing quoteSummary object".to_string()))?;

    if summary.get("error").map_or(false, |e| !e.is_null()) {
        return Err(ProviderError::NotFound(symbol.to_string()));
    }

    let result = summary
        .get("result")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .and_then(Value::as_object)
        .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))?;

    let mut bundle = InfoBundle::new();
    for module in SUMMARY_MODULES {
        let Some(fields) = result.get(*module).and_then(Value::as_object) else {
            continue;
        };
        for (key, value) in fields {
            bundle
                .entry(key.clone())
                .or_insert_with(|| unwrap_raw(value));
        }
    }

    Ok(bundle)
}

fn unwrap_raw(value: &Value) -> Value {
    match value {
        Value::Object(map) if map.is_empty() => Value::Null,
        Value::Object(map) => map.get("raw").cloned().unwrap_or_else(|| value.clone()),
        other => other.clone(),
    }
}
