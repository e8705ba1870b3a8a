// Benjamin Graham criteria scoring
// Six independent pass/fail screens, each a strict inequality. A missing
// value fails its screen; it is never skipped and never counts as a pass.

use serde::Serialize;
use std::fmt;

use crate::models::{CompanyRecord, GrahamThresholds};

/// Number of criteria a record must meet to pass
pub const CRITERIA_COUNT: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Criterion {
    PriceEarnings,
    PriceToBook,
    DebtToEquity,
    DividendYield,
    NetProfit,
    MarketCap,
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Criterion::PriceEarnings => "P/E",
            Criterion::PriceToBook => "P/B",
            Criterion::DebtToEquity => "Debt/Equity",
            Criterion::DividendYield => "Dividend Yield (%)",
            Criterion::NetProfit => "Net Profit >0",
            Criterion::MarketCap => "Market Cap (Bn €)",
        };
        f.write_str(label)
    }
}

/// Per-criterion results for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CriteriaOutcome {
    pub passes_pe_filter: bool,
    pub passes_pb_filter: bool,
    pub passes_debt_filter: bool,
    pub passes_dividend_filter: bool,
    pub passes_earnings_filter: bool,
    pub passes_size_filter: bool,
}

impl CriteriaOutcome {
    pub fn results(&self) -> [(Criterion, bool); 6] {
        [
            (Criterion::PriceEarnings, self.passes_pe_filter),
            (Criterion::PriceToBook, self.passes_pb_filter),
            (Criterion::DebtToEquity, self.passes_debt_filter),
            (Criterion::DividendYield, self.passes_dividend_filter),
            (Criterion::NetProfit, self.passes_earnings_filter),
            (Criterion::MarketCap, self.passes_size_filter),
        ]
    }

    pub fn score(&self) -> u8 {
        self.results().iter().filter(|(_, passed)| *passed).count() as u8
    }

    pub fn passes_all(&self) -> bool {
        self.score() == CRITERIA_COUNT
    }

    pub fn failed(&self) -> Vec<Criterion> {
        self.results()
            .iter()
            .filter(|(_, passed)| !*passed)
            .map(|(criterion, _)| *criterion)
            .collect()
    }
}

/// Evaluate the six criteria against one record
pub fn evaluate(record: &CompanyRecord, thresholds: &GrahamThresholds) -> CriteriaOutcome {
    CriteriaOutcome {
        passes_pe_filter: record.pe.map_or(false, |pe| pe < thresholds.max_pe),
        passes_pb_filter: record.pb.map_or(false, |pb| pb < thresholds.max_pb),
        passes_debt_filter: record
            .debt_to_equity
            .map_or(false, |de| de < thresholds.max_debt_equity),
        passes_dividend_filter: record
            .dividend_yield_pct
            .map_or(false, |dy| dy > thresholds.min_dividend_yield),
        passes_earnings_filter: record.net_profit_positive.unwrap_or(false),
        passes_size_filter: record
            .market_cap_bn
            .map_or(false, |cap| cap > thresholds.min_market_cap),
    }
}

/// Annotate one record with its Graham score and pass flag
pub fn score_record(record: &mut CompanyRecord, thresholds: &GrahamThresholds) -> CriteriaOutcome {
    let outcome = evaluate(record, thresholds);
    record.graham_score = outcome.score();
    record.graham_pass = outcome.passes_all();
    outcome
}

/// Score every record. Pure: the same inputs always give the same annotations.
pub fn score(mut records: Vec<CompanyRecord>, thresholds: &GrahamThresholds) -> Vec<CompanyRecord> {
    for record in records.iter_mut() {
        score_record(record, thresholds);
    }
    records
}
