//! Price history for passing companies (chart data)

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::debug;

use crate::api::MarketDataProvider;
use crate::models::{CompanyRecord, HistoryPeriod};

/// Daily closes for one company
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    pub name: String,
    pub ticker: String,
    pub points: Vec<(DateTime<Utc>, f64)>,
}

impl PriceSeries {
    pub fn first_close(&self) -> Option<f64> {
        self.points.first().map(|(_, close)| *close)
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|(_, close)| *close)
    }

    /// First-to-last close change in percent
    pub fn change_pct(&self) -> Option<f64> {
        if self.points.len() < 2 {
            return None;
        }
        match (self.first_close(), self.last_close()) {
            (Some(first), Some(last)) if first != 0.0 => Some((last - first) / first * 100.0),
            _ => None,
        }
    }
}

/// Fetch history for each record. Failed or empty series are left out; the
/// rest keep the order of `records`.
pub async fn collect_price_history(
    provider: &dyn MarketDataProvider,
    records: &[CompanyRecord],
    period: HistoryPeriod,
) -> Vec<PriceSeries> {
    let fetches = records.iter().map(|record| async move {
        match provider.price_history(&record.ticker, period).await {
            Ok(bars) => {
                let points: Vec<_> = bars
                    .into_iter()
                    .filter_map(|bar| bar.close.map(|close| (bar.timestamp, close)))
                    .collect();
                if points.is_empty() {
                    debug!("No {} history for {}", period, record.ticker);
                    return None;
                }
                Some(PriceSeries {
                    name: record.name.clone(),
                    ticker: record.ticker.clone(),
                    points,
                })
            }
            Err(e) => {
                debug!("History unavailable for {}: {}", record.ticker, e);
                None
            }
        }
    });

    join_all(fetches).await.into_iter().flatten().collect()
}
