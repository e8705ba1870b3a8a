//! One analysis run: fetch, score, build the view

use serde::Serialize;
use tracing::info;

use crate::analysis::{build_view, score, ScreenView, SortSpec};
use crate::api::MarketDataProvider;
use crate::concurrent_fetcher::{analyze, BatchFetchConfig};
use crate::error::ScreenError;
use crate::models::{Column, CompanyRecord, GrahamThresholds};

/// Resolved parameters for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenRequest {
    pub symbols: Vec<String>,
    pub thresholds: GrahamThresholds,
    pub sort: SortSpec,
    pub export_columns: Vec<Column>,
}

impl ScreenRequest {
    pub fn new(
        symbols: Vec<String>,
        thresholds: GrahamThresholds,
        sort: SortSpec,
        export_columns: Vec<Column>,
    ) -> Result<Self, ScreenError> {
        if symbols.is_empty() {
            return Err(ScreenError::EmptySelection);
        }
        thresholds.validate()?;

        Ok(Self {
            symbols,
            thresholds,
            sort,
            export_columns,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenReport {
    pub thresholds: GrahamThresholds,
    pub view: ScreenView,
    pub fetch_errors: Vec<String>,
    /// Scored records in fetch order, kept for re-sorting
    pub records: Vec<CompanyRecord>,
    pub export_columns: Vec<Column>,
}

impl ScreenReport {
    /// Rebuild the view under a different sort, without refetching
    pub fn resort(&mut self, sort: SortSpec) {
        self.view = build_view(self.records.clone(), &sort, &self.export_columns);
    }
}

pub async fn run_screen(
    provider: &dyn MarketDataProvider,
    request: &ScreenRequest,
    config: &BatchFetchConfig,
) -> Result<ScreenReport, ScreenError> {
    let outcome = analyze(provider, &request.symbols, config).await?;
    let records = score(outcome.records, &request.thresholds);
    let view = build_view(records.clone(), &request.sort, &request.export_columns);

    info!(
        "🎯 {} of {} companies meet all Graham criteria",
        view.passing.len(),
        records.len()
    );

    Ok(ScreenReport {
        thresholds: request.thresholds,
        view,
        fetch_errors: outcome.fetch_errors,
        records,
        export_columns: request.export_columns.clone(),
    })
}
