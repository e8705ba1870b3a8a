//! Company record normalization
//!
//! Turns one provider info bundle into a fixed-shape [`CompanyRecord`].
//! Missing keys and explicit nulls resolve to the field's default one field
//! at a time; only a failed bundle request or a value that cannot be coerced
//! collapses the whole record to a placeholder.

use serde_json::Value;
use tracing::{debug, warn};

use crate::api::MarketDataProvider;
use crate::error::NormalizeError;
use crate::models::{CompanyRecord, InfoBundle, NOT_AVAILABLE};
use crate::registry;

/// Produce exactly one record for `symbol`. Never fails.
pub async fn normalize(provider: &dyn MarketDataProvider, symbol: &str) -> CompanyRecord {
    let bundle = match provider.info_bundle(symbol).await {
        Ok(bundle) => bundle,
        Err(e) => {
            warn!("⚠️ Info request failed for {}: {}", symbol, e);
            return CompanyRecord::placeholder(symbol);
        }
    };

    match extract_record(symbol, &bundle) {
        Ok(record) => {
            debug!("Normalized {} ({} provider fields)", symbol, bundle.len());
            record
        }
        Err(e) => {
            warn!("⚠️ Could not extract fields for {}: {}", symbol, e);
            CompanyRecord::placeholder(symbol)
        }
    }
}

/// Build a record from an info bundle, converting units as fields are read
pub fn extract_record(symbol: &str, bundle: &InfoBundle) -> Result<CompanyRecord, NormalizeError> {
    let profit_margin = numeric(bundle, "profitMargins")?;

    let name = text(bundle, "shortName")
        .or_else(|| registry::display_name(symbol).map(str::to_string))
        .unwrap_or_else(|| symbol.to_string());

    Ok(CompanyRecord {
        name,
        ticker: symbol.to_string(),
        price: numeric(bundle, "currentPrice")?,
        pe: numeric(bundle, "trailingPE")?,
        pb: numeric(bundle, "priceToBook")?,
        debt_to_equity: numeric(bundle, "debtToEquity")?,
        dividend_yield_pct: numeric(bundle, "dividendYield")?.map(|y| y * 100.0),
        market_cap_bn: numeric(bundle, "marketCap")?.map(|cap| cap / 1e9),
        eps: numeric(bundle, "trailingEps")?,
        net_profit_positive: profit_margin.map(|margin| margin > 0.0),
        dividend_per_year: numeric(bundle, "dividendRate")?,
        sector: text_or_default(bundle, "sector"),
        industry: text_or_default(bundle, "industry"),
        description: text_or_default(bundle, "longBusinessSummary"),
        graham_score: 0,
        graham_pass: false,
    })
}

/// Missing key and explicit null are the same thing
fn field<'a>(bundle: &'a InfoBundle, key: &str) -> Option<&'a Value> {
    bundle.get(key).filter(|value| !value.is_null())
}

/// Numeric field as a plain finite decimal. NaN and infinities count as
/// absent; anything that cannot be read as a number is an error.
pub fn numeric(bundle: &InfoBundle, key: &'static str) -> Result<Option<f64>, NormalizeError> {
    let Some(value) = field(bundle, key) else {
        return Ok(None);
    };

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => Some(s.trim().parse::<f64>().map_err(|_| coercion(key, value))?),
        _ => return Err(coercion(key, value)),
    };

    Ok(number.filter(|n| n.is_finite()))
}

fn text(bundle: &InfoBundle, key: &str) -> Option<String> {
    field(bundle, key).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn text_or_default(bundle: &InfoBundle, key: &str) -> String {
    text(bundle, key).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn coercion(field: &'static str, value: &Value) -> NormalizeError {
    NormalizeError::Coercion {
        field,
        value: value.to_string(),
    }
}
