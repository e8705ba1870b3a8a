use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::concurrent_fetcher::{default_worker_count, BatchFetchConfig};
use crate::error::ScreenError;

/// Default text for provider string fields that are missing
pub const NOT_AVAILABLE: &str = "N/A";

/// Raw provider info payload, keyed by the provider's field names
pub type InfoBundle = serde_json::Map<String, serde_json::Value>;

/// One daily observation from the provider's history endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub close: Option<f64>,
}

/// One row of the working table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Price")]
    pub price: Option<f64>,
    #[serde(rename = "P/E")]
    pub pe: Option<f64>,
    #[serde(rename = "P/B")]
    pub pb: Option<f64>,
    /// Raw provider percentage units (80.0 means 80%)
    #[serde(rename = "Debt/Equity")]
    pub debt_to_equity: Option<f64>,
    /// Already multiplied by 100
    #[serde(rename = "Dividend Yield (%)")]
    pub dividend_yield_pct: Option<f64>,
    /// Already divided by 1e9
    #[serde(rename = "Market Cap (Bn €)")]
    pub market_cap_bn: Option<f64>,
    #[serde(rename = "EPS")]
    pub eps: Option<f64>,
    #[serde(rename = "Net Profit >0")]
    pub net_profit_positive: Option<bool>,
    #[serde(rename = "Dividend/year")]
    pub dividend_per_year: Option<f64>,
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Industry")]
    pub industry: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Graham Score")]
    pub graham_score: u8,
    #[serde(rename = "Graham Pass")]
    pub graham_pass: bool,
}

impl CompanyRecord {
    /// Record substituted when a symbol's data cannot be fetched or extracted
    pub fn placeholder(symbol: &str) -> Self {
        Self {
            name: symbol.to_string(),
            ticker: symbol.to_string(),
            price: None,
            pe: None,
            pb: None,
            debt_to_equity: None,
            dividend_yield_pct: None,
            market_cap_bn: None,
            eps: None,
            net_profit_positive: None,
            dividend_per_year: None,
            sector: NOT_AVAILABLE.to_string(),
            industry: NOT_AVAILABLE.to_string(),
            description: NOT_AVAILABLE.to_string(),
            graham_score: 0,
            graham_pass: false,
        }
    }

    /// A missing price is how the error report identifies failed tickers
    pub fn is_fetch_error(&self) -> bool {
        self.price.is_none()
    }

    pub fn cell(&self, column: Column) -> CellValue {
        match column {
            Column::Name => CellValue::Text(self.name.clone()),
            Column::Ticker => CellValue::Text(self.ticker.clone()),
            Column::Price => CellValue::Number(self.price),
            Column::PriceEarnings => CellValue::Number(self.pe),
            Column::PriceToBook => CellValue::Number(self.pb),
            Column::DebtToEquity => CellValue::Number(self.debt_to_equity),
            Column::DividendYield => CellValue::Number(self.dividend_yield_pct),
            Column::MarketCap => CellValue::Number(self.market_cap_bn),
            Column::Eps => CellValue::Number(self.eps),
            Column::DividendPerYear => CellValue::Number(self.dividend_per_year),
            Column::NetProfitPositive => CellValue::Flag(self.net_profit_positive),
            Column::GrahamScore => CellValue::Score(self.graham_score),
            Column::Sector => CellValue::Text(self.sector.clone()),
            Column::Industry => CellValue::Text(self.industry.clone()),
        }
    }
}

/// A single table cell, keeping absence distinct from zero
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(Option<f64>),
    Flag(Option<bool>),
    Score(u8),
}

impl CellValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Number(None) | CellValue::Flag(None))
    }
}

/// Display and export columns, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Name,
    Ticker,
    Price,
    PriceEarnings,
    PriceToBook,
    DebtToEquity,
    DividendYield,
    MarketCap,
    Eps,
    DividendPerYear,
    NetProfitPositive,
    GrahamScore,
    Sector,
    Industry,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Name,
        Column::Ticker,
        Column::Price,
        Column::PriceEarnings,
        Column::PriceToBook,
        Column::DebtToEquity,
        Column::DividendYield,
        Column::MarketCap,
        Column::Eps,
        Column::DividendPerYear,
        Column::NetProfitPositive,
        Column::GrahamScore,
        Column::Sector,
        Column::Industry,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Ticker => "Ticker",
            Column::Price => "Price",
            Column::PriceEarnings => "P/E",
            Column::PriceToBook => "P/B",
            Column::DebtToEquity => "Debt/Equity",
            Column::DividendYield => "Dividend Yield (%)",
            Column::MarketCap => "Market Cap (Bn €)",
            Column::Eps => "EPS",
            Column::DividendPerYear => "Dividend/year",
            Column::NetProfitPositive => "Net Profit >0",
            Column::GrahamScore => "Graham Score",
            Column::Sector => "Sector",
            Column::Industry => "Industry",
        }
    }

    /// Every column except Sector and Industry
    pub fn default_export() -> Vec<Column> {
        Self::ALL[..Self::ALL.len() - 2].to_vec()
    }

    /// Next column in table order, wrapping around
    pub fn next(&self) -> Column {
        let index = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Column {
    type Err = ScreenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.header().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ScreenError::UnknownColumn(wanted.to_string()))
    }
}

/// User-supplied Graham thresholds. Net profit > 0 is fixed and not listed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrahamThresholds {
    pub max_pe: f64,
    pub max_pb: f64,
    /// Percentage units, matching `CompanyRecord::debt_to_equity`
    pub max_debt_equity: f64,
    pub min_dividend_yield: f64,
    /// Billions
    pub min_market_cap: f64,
}

impl Default for GrahamThresholds {
    fn default() -> Self {
        Self {
            max_pe: 15.0,
            max_pb: 1.5,
            max_debt_equity: 100.0,
            min_dividend_yield: 2.0,
            min_market_cap: 2.0,
        }
    }
}

impl GrahamThresholds {
    /// Allowed ranges for each threshold
    const RANGES: [(&'static str, f64, f64); 5] = [
        ("max_pe", 5.0, 30.0),
        ("max_pb", 0.5, 5.0),
        ("max_debt_equity", 0.0, 300.0),
        ("min_dividend_yield", 0.0, 10.0),
        ("min_market_cap", 0.0, 20.0),
    ];

    pub fn validate(&self) -> Result<(), ScreenError> {
        let values = [
            self.max_pe,
            self.max_pb,
            self.max_debt_equity,
            self.min_dividend_yield,
            self.min_market_cap,
        ];

        for ((name, min, max), value) in Self::RANGES.iter().zip(values) {
            if !value.is_finite() || value < *min || value > *max {
                return Err(ScreenError::ThresholdOutOfRange {
                    name: *name,
                    value,
                    min: *min,
                    max: *max,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for GrahamThresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Graham criteria: P/E < {}, P/B < {}, Debt/Equity < {}%, Dividend Yield > {}%, Market Cap > {} Bn €, Net Profit > 0",
            self.max_pe, self.max_pb, self.max_debt_equity, self.min_dividend_yield, self.min_market_cap
        )
    }
}

/// History window accepted by the provider's chart endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HistoryPeriod {
    OneDay,
    OneMonth,
    ThreeMonths,
    #[default]
    SixMonths,
    OneYear,
    Max,
}

impl HistoryPeriod {
    /// Periods offered for the price chart
    pub const CHART_CHOICES: [HistoryPeriod; 5] = [
        HistoryPeriod::OneMonth,
        HistoryPeriod::ThreeMonths,
        HistoryPeriod::SixMonths,
        HistoryPeriod::OneYear,
        HistoryPeriod::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryPeriod::OneDay => "1d",
            HistoryPeriod::OneMonth => "1mo",
            HistoryPeriod::ThreeMonths => "3mo",
            HistoryPeriod::SixMonths => "6mo",
            HistoryPeriod::OneYear => "1y",
            HistoryPeriod::Max => "max",
        }
    }

    /// Parse a period and require it to be one of [`Self::CHART_CHOICES`]
    pub fn parse_chart_window(s: &str) -> Result<Self, ScreenError> {
        let period: HistoryPeriod = s.parse()?;
        if Self::CHART_CHOICES.contains(&period) {
            Ok(period)
        } else {
            Err(ScreenError::UnknownPeriod(s.trim().to_string()))
        }
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryPeriod {
    type Err = ScreenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(HistoryPeriod::OneDay),
            "1mo" => Ok(HistoryPeriod::OneMonth),
            "3mo" => Ok(HistoryPeriod::ThreeMonths),
            "6mo" => Ok(HistoryPeriod::SixMonths),
            "1y" => Ok(HistoryPeriod::OneYear),
            "max" => Ok(HistoryPeriod::Max),
            other => Err(ScreenError::UnknownPeriod(other.to_string())),
        }
    }
}

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// A strictly positive numeric setting; zero and unparsable values are ignored
fn positive_setting<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    value
        .and_then(|v| v.trim().parse().ok())
        .filter(|n: &T| *n > T::default())
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub yahoo_base_url: String,
    pub yahoo_cookie_url: String,
    pub user_agent: String,
    pub fetch_timeout_secs: u64,
    pub fetch_workers: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Ok(Config {
            yahoo_base_url: std::env::var("YAHOO_BASE_URL")
                .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string()),
            yahoo_cookie_url: std::env::var("YAHOO_COOKIE_URL")
                .unwrap_or_else(|_| "https://fc.yahoo.com".to_string()),
            user_agent: std::env::var("HTTP_USER_AGENT").unwrap_or_else(|_| {
                "Mozilla/5.0 (X11; Linux x86_64) graham-screener/0.1".to_string()
            }),
            fetch_timeout_secs: positive_setting(std::env::var("FETCH_TIMEOUT_SECS").ok())
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
            fetch_workers: positive_setting(std::env::var("FETCH_WORKERS").ok())
                .unwrap_or_else(default_worker_count),
        })
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn batch_config(&self) -> BatchFetchConfig {
        BatchFetchConfig {
            workers: self.fetch_workers,
            per_symbol_timeout: self.fetch_timeout(),
        }
    }
}
