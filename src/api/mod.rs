use async_trait::async_trait;

use crate::models::{HistoryPeriod, InfoBundle, PriceBar};

pub mod quotes;
pub mod yahoo_client;

pub use crate::error::ProviderError;
pub use yahoo_client::YahooClient;

/// Remote market-data provider.
///
/// Implementations make one request per call and never retry; callers decide
/// how a failure degrades.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for `symbol` over `period`. A window without trading data
    /// is an empty vector, not an error.
    async fn price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<PriceBar>, ProviderError>;

    /// Flat field map describing the company behind `symbol`
    async fn info_bundle(&self, symbol: &str) -> Result<InfoBundle, ProviderError>;
}
