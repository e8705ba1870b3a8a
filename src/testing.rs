//! In-memory provider for unit tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::api::{MarketDataProvider, ProviderError};
use crate::models::{HistoryPeriod, InfoBundle, PriceBar};

#[derive(Default)]
pub struct StaticProvider {
    histories: HashMap<String, Vec<PriceBar>>,
    infos: HashMap<String, InfoBundle>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, symbol: &str, closes: &[Option<f64>]) -> Self {
        let start = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap_or_default();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, close)| PriceBar {
                timestamp: start + chrono::Duration::days(i as i64),
                close: *close,
            })
            .collect();
        self.histories.insert(symbol.to_string(), bars);
        self
    }

    /// `info` must be a JSON object
    pub fn with_info(mut self, symbol: &str, info: Value) -> Self {
        if let Value::Object(map) = info {
            self.infos.insert(symbol.to_string(), map);
        }
        self
    }

    pub fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
        self.delays.insert(symbol.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn wait(&self, symbol: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(symbol) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    async fn price_history(
        &self,
        symbol: &str,
        _period: HistoryPeriod,
    ) -> Result<Vec<PriceBar>, ProviderError> {
        self.wait(symbol).await;
        self.histories
            .get(symbol)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))
    }

    async fn info_bundle(&self, symbol: &str) -> Result<InfoBundle, ProviderError> {
        self.wait(symbol).await;
        self.infos
            .get(symbol)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))
    }
}
