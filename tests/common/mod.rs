//! Common test utilities and helpers

use graham_screener::models::{CompanyRecord, InfoBundle};
use serde_json::{json, Value};

/// Test data utilities
pub mod test_data {
    use super::*;

    /// Info payload for a company that meets every default criterion
    pub fn graham_info(name: &str) -> Value {
        json!({
            "shortName": name,
            "currentPrice": 42.5,
            "trailingPE": 9.0,
            "priceToBook": 1.1,
            "debtToEquity": 60.0,
            "dividendYield": 0.045,
            "marketCap": 8_500_000_000_i64,
            "profitMargins": 0.12,
            "dividendRate": 1.9,
            "trailingEps": 4.7,
            "sector": "Industrials",
            "industry": "Engineering & Construction",
            "longBusinessSummary": "Builds things."
        })
    }

    /// `graham_info` with some fields replaced
    pub fn info_with(name: &str, overrides: Value) -> Value {
        let mut info = graham_info(name);
        if let (Some(base), Some(changes)) = (info.as_object_mut(), overrides.as_object()) {
            for (key, value) in changes {
                base.insert(key.clone(), value.clone());
            }
        }
        info
    }

    pub fn bundle(info: Value) -> InfoBundle {
        info.as_object().cloned().unwrap_or_default()
    }

    /// Record with every criterion field filled in and passing defaults
    pub fn passing_record(ticker: &str) -> CompanyRecord {
        CompanyRecord {
            name: format!("{} SA", ticker),
            price: Some(10.0),
            pe: Some(10.0),
            pb: Some(1.0),
            debt_to_equity: Some(50.0),
            dividend_yield_pct: Some(3.0),
            market_cap_bn: Some(5.0),
            net_profit_positive: Some(true),
            ..CompanyRecord::placeholder(ticker)
        }
    }

    pub fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }
}

/// mockall double for the provider seam
pub mod mock_provider {
    use async_trait::async_trait;
    use graham_screener::api::{MarketDataProvider, ProviderError};
    use graham_screener::models::{HistoryPeriod, InfoBundle, PriceBar};
    use mockall::mock;

    mock! {
        pub Provider {}

        #[async_trait]
        impl MarketDataProvider for Provider {
            async fn price_history(&self, symbol: &str, period: HistoryPeriod) -> Result<Vec<PriceBar>, ProviderError>;
            async fn info_bundle(&self, symbol: &str) -> Result<InfoBundle, ProviderError>;
        }
    }
}

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;
    use tracing::{debug, info};

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            if tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("graham_screener=debug,main=debug")
                    .with_test_writer()
                    .finish(),
            )
            .is_err()
            {
                // Another subscriber (test-log) got there first
            }
        });
    }

    pub fn log_test_step(step: &str) {
        info!("🧪 Test Step: {}", step);
    }

    pub fn log_test_data<T: std::fmt::Debug>(label: &str, data: &T) {
        debug!("📊 {}: {:?}", label, data);
    }
}
