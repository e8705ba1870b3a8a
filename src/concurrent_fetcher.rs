//! Concurrent company data fetching
//!
//! Runs the normalizer over a ticker selection with a bounded number of
//! requests in flight. Every symbol yields exactly one record: failures and
//! timeouts become placeholders instead of aborting the batch.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::api::MarketDataProvider;
use crate::error::ScreenError;
use crate::models::CompanyRecord;
use crate::normalizer::normalize;

/// Configuration for concurrent fetching
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFetchConfig {
    pub workers: usize,
    pub per_symbol_timeout: Duration,
}

impl Default for BatchFetchConfig {
    fn default() -> Self {
        Self {
            workers: default_worker_count(),
            per_symbol_timeout: Duration::from_secs(10),
        }
    }
}

/// Host-sized pool width: available cores plus 4, capped at 32
pub fn default_worker_count() -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    std::cmp::min(32, cores + 4)
}

/// Result of one batch run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    /// One record per requested symbol, in request order
    pub records: Vec<CompanyRecord>,
    /// Tickers whose price could not be obtained
    pub fetch_errors: Vec<String>,
}

/// Fetch and normalize every symbol.
///
/// An empty selection is rejected before any request goes out.
pub async fn analyze(
    provider: &dyn MarketDataProvider,
    symbols: &[String],
    config: &BatchFetchConfig,
) -> Result<BatchOutcome, ScreenError> {
    if symbols.is_empty() {
        return Err(ScreenError::EmptySelection);
    }

    let total = symbols.len();
    let workers = config.workers.max(1);
    let started = Instant::now();
    info!("🚀 Fetching {} companies with {} workers", total, workers);

    let mut results = stream::iter(symbols.iter().enumerate())
        .map(|(index, symbol)| async move {
            let record = match tokio::time::timeout(config.per_symbol_timeout, normalize(provider, symbol)).await {
                Ok(record) => record,
                Err(_) => {
                    warn!("⏱️ {} timed out after {:?}", symbol, config.per_symbol_timeout);
                    CompanyRecord::placeholder(symbol)
                }
            };
            (index, record)
        })
        .buffer_unordered(workers);

    let mut collected: Vec<(usize, CompanyRecord)> = Vec::with_capacity(total);
    while let Some((index, record)) = results.next().await {
        debug!("{}/{}: {} done", collected.len() + 1, total, record.ticker);
        collected.push((index, record));

        if collected.len() % 25 == 0 {
            info!("📊 Progress: {}/{} companies fetched", collected.len(), total);
        }
    }

    collected.sort_by_key(|(index, _)| *index);
    let records: Vec<CompanyRecord> = collected.into_iter().map(|(_, record)| record).collect();

    let fetch_errors: Vec<String> = records
        .iter()
        .filter(|r| r.is_fetch_error())
        .map(|r| r.ticker.clone())
        .collect();

    info!(
        "✅ Fetched {} companies in {:.1}s ({} without data)",
        records.len(),
        started.elapsed().as_secs_f64(),
        fetch_errors.len()
    );
    if !fetch_errors.is_empty() {
        warn!("❌ Data unavailable for: {}", fetch_errors.join(", "));
    }

    Ok(BatchOutcome {
        records,
        fetch_errors,
    })
}
