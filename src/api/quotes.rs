//! Latest-quote lookups and the macro indicator header
//!
//! The display helpers return text rather than numbers: they feed the
//! macro header directly and degrade to [`UNAVAILABLE`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::MarketDataProvider;
use crate::error::FetchError;
use crate::models::HistoryPeriod;

/// Shown in place of a value when the provider cannot supply one
pub const UNAVAILABLE: &str = "Data unavailable";

/// Yield symbols whose close is already quoted in percent. Every other yield
/// symbol is a fraction and gets multiplied by 100.
pub const PERCENT_QUOTED_YIELDS: &[&str] = &["^TNX"];

/// Most recent observation for a symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub as_of_price: f64,
    pub as_of_time: DateTime<Utc>,
}

/// Fetch the last close over a one-day window. Single attempt, no retry.
pub async fn fetch_quote(
    provider: &dyn MarketDataProvider,
    symbol: &str,
) -> Result<Quote, FetchError> {
    let bars = provider.price_history(symbol, HistoryPeriod::OneDay).await?;

    bars.iter()
        .rev()
        .find_map(|bar| {
            bar.close.map(|close| Quote {
                as_of_price: close,
                as_of_time: bar.timestamp,
            })
        })
        .ok_or_else(|| FetchError::NoData(symbol.to_string()))
}

pub async fn rate_yield_display(provider: &dyn MarketDataProvider, symbol: &str) -> String {
    match fetch_quote(provider, symbol).await {
        Ok(quote) => {
            let value = if PERCENT_QUOTED_YIELDS.contains(&symbol) {
                quote.as_of_price
            } else {
                quote.as_of_price * 100.0
            };
            format_decimal(round2(value))
        }
        Err(e) => {
            debug!("Yield unavailable for {}: {}", symbol, e);
            UNAVAILABLE.to_string()
        }
    }
}

pub async fn asset_price_display(provider: &dyn MarketDataProvider, symbol: &str) -> String {
    match fetch_quote(provider, symbol).await {
        Ok(quote) => group_thousands(&format_decimal(round2(quote.as_of_price))),
        Err(e) => {
            debug!("Price unavailable for {}: {}", symbol, e);
            UNAVAILABLE.to_string()
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Shortest round-trip rendering that always keeps a decimal point
/// (`4.2`, `3.05`, `4.0`)
pub fn format_decimal(value: f64) -> String {
    format!("{:?}", value)
}

/// Insert `,` separators into the integer part of a decimal string
pub fn group_thousands(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(text.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Bond yields and crypto prices shown above the screener
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroSnapshot {
    pub us_10y: String,
    pub fr_10y: String,
    pub de_10y: String,
    pub btc_usd: String,
    pub eth_usd: String,
}

impl MacroSnapshot {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("US 10Y Yield: {}%", self.us_10y),
            format!("FR 10Y Yield: {}%", self.fr_10y),
            format!("DE 10Y Yield: {}%", self.de_10y),
            format!("BTC/USD: ${}", self.btc_usd),
            format!("ETH/USD: ${}", self.eth_usd),
        ]
    }
}

pub async fn fetch_macro_snapshot(provider: &dyn MarketDataProvider) -> MacroSnapshot {
    let (us_10y, fr_10y, de_10y, btc_usd, eth_usd) = tokio::join!(
        rate_yield_display(provider, "^TNX"),
        rate_yield_display(provider, "^FR10Y"),
        rate_yield_display(provider, "^DE10Y"),
        asset_price_display(provider, "BTC-USD"),
        asset_price_display(provider, "ETH-USD"),
    );

    MacroSnapshot {
        us_10y,
        fr_10y,
        de_10y,
        btc_usd,
        eth_usd,
    }
}
