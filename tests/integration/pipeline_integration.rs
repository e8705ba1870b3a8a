//! Integration tests for the screening pipeline against a mocked provider

use assert_matches::assert_matches;
use chrono::DateTime;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::logging::{init_test_logging, log_test_data, log_test_step};
use crate::common::mock_provider::MockProvider;
use crate::common::test_data::{bundle, graham_info, info_with, symbols};
use graham_screener::analysis::SortSpec;
use graham_screener::api::quotes::{fetch_macro_snapshot, UNAVAILABLE};
use graham_screener::api::ProviderError;
use graham_screener::concurrent_fetcher::{analyze, BatchFetchConfig};
use graham_screener::error::ScreenError;
use graham_screener::export::{write_csv, DEFAULT_EXPORT_FILE};
use graham_screener::history::collect_price_history;
use graham_screener::models::{Column, CompanyRecord, GrahamThresholds, HistoryPeriod, PriceBar};
use graham_screener::pipeline::{run_screen, ScreenRequest};

fn bars(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| PriceBar {
            timestamp: DateTime::from_timestamp(1_700_000_000 + i as i64 * 86_400, 0).unwrap(),
            close: Some(*close),
        })
        .collect()
}

fn small_pool() -> BatchFetchConfig {
    BatchFetchConfig {
        workers: 3,
        ..BatchFetchConfig::default()
    }
}

#[tokio::test]
async fn test_analyze_returns_one_record_per_symbol() {
    init_test_logging();
    log_test_step("Analyze with mixed provider failures");

    let mut provider = MockProvider::new();
    provider.expect_info_bundle().times(5).returning(|symbol| match symbol {
        "BAD.PA" => Err(ProviderError::NotFound(symbol.to_string())),
        "ODD.PA" => Ok(bundle(info_with("Odd SA", json!({ "marketCap": { "nested": true } })))),
        _ => Ok(bundle(graham_info(symbol))),
    });
    provider.expect_price_history().never();

    let requested = symbols(&["AI.PA", "BAD.PA", "OR.PA", "ODD.PA", "AI.PA"]);
    let outcome = analyze(&provider, &requested, &small_pool()).await.unwrap();

    log_test_data("Outcome", &outcome);
    let tickers: Vec<_> = outcome.records.iter().map(|r| r.ticker.clone()).collect();
    assert_eq!(tickers, requested);
    assert_eq!(outcome.records[1], CompanyRecord::placeholder("BAD.PA"));
    assert_eq!(outcome.records[3], CompanyRecord::placeholder("ODD.PA"));
    assert_eq!(outcome.fetch_errors, symbols(&["BAD.PA", "ODD.PA"]));
}

#[tokio::test]
async fn test_empty_selection_is_rejected_without_calls() {
    let mut provider = MockProvider::new();
    provider.expect_info_bundle().never();
    provider.expect_price_history().never();

    let result = analyze(&provider, &[], &small_pool()).await;
    assert_matches!(result, Err(ScreenError::EmptySelection));
}

#[tokio::test]
async fn test_run_screen_and_export_csv() {
    init_test_logging();
    log_test_step("Screen three companies and export the passing ones");

    let mut provider = MockProvider::new();
    provider.expect_info_bundle().times(3).returning(|symbol| match symbol {
        "GOOD.PA" => Ok(bundle(graham_info("Good SA"))),
        "ALSO.PA" => Ok(bundle(info_with("Also SA", json!({ "trailingPE": 7.5 })))),
        _ => Ok(bundle(info_with("Leveraged SA", json!({ "debtToEquity": 250.0 })))),
    });

    let request = ScreenRequest::new(
        symbols(&["GOOD.PA", "DEBT.PA", "ALSO.PA"]),
        GrahamThresholds::default(),
        SortSpec {
            column: Column::PriceEarnings,
            ascending: true,
        },
        vec![],
    )
    .unwrap();

    let report = run_screen(&provider, &request, &small_pool()).await.unwrap();

    let passing: Vec<_> = report.view.passing.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(passing, vec!["ALSO.PA", "GOOD.PA"]);
    assert!(report.fetch_errors.is_empty());
    let debt_row = report.view.full_table.iter().find(|r| r.record.ticker == "DEBT.PA").unwrap();
    assert!(!debt_row.highlight);
    assert_eq!(debt_row.record.graham_score, 5);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_EXPORT_FILE);
    write_csv(report.view.export.as_ref().unwrap(), &path).unwrap();

    let csv = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Name,Ticker,Price,P/E,P/B,Debt/Equity,Dividend Yield (%),Market Cap (Bn €),EPS,Dividend/year,Net Profit >0,Graham Score"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Also SA,ALSO.PA,42.5,7.5,1.1,60.0,"));
    assert!(lines[2].ends_with(",True,6"));
}

#[test]
fn test_macro_snapshot_degrades_per_symbol() {
    let mut provider = MockProvider::new();
    provider.expect_price_history().times(5).returning(|symbol, period| {
        assert_eq!(period, HistoryPeriod::OneDay);
        match symbol {
            "^TNX" => Ok(bars(&[4.28, 4.31])),
            "^FR10Y" => Ok(bars(&[0.0305])),
            "BTC-USD" => Ok(bars(&[67432.1])),
            "ETH-USD" => Ok(Vec::new()),
            _ => Err(ProviderError::Timeout),
        }
    });

    let snapshot = tokio_test::block_on(fetch_macro_snapshot(&provider));

    assert_eq!(snapshot.us_10y, "4.31");
    assert_eq!(snapshot.fr_10y, "3.05");
    assert_eq!(snapshot.de_10y, UNAVAILABLE);
    assert_eq!(snapshot.btc_usd, "67,432.1");
    assert_eq!(snapshot.eth_usd, UNAVAILABLE);
    assert_eq!(snapshot.lines()[0], "US 10Y Yield: 4.31%");
}

#[tokio::test]
async fn test_history_for_passing_companies() {
    let mut provider = MockProvider::new();
    provider.expect_price_history().times(2).returning(|symbol, period| {
        assert_eq!(period, HistoryPeriod::OneYear);
        match symbol {
            "GOOD.PA" => Ok(bars(&[40.0, 44.0, 50.0])),
            _ => Err(ProviderError::Status { status: 500, body: String::new() }),
        }
    });

    let records = vec![CompanyRecord::placeholder("GOOD.PA"), CompanyRecord::placeholder("DOWN.PA")];
    let series = collect_price_history(&provider, &records, HistoryPeriod::OneYear).await;

    assert_eq!(series.len(), 1);
    assert_eq!(series[0].ticker, "GOOD.PA");
    assert_eq!(series[0].change_pct(), Some(25.0));
}
