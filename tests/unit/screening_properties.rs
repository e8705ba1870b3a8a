//! Scoring and view behavior through the public API

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_log::test;

use crate::common::test_data::{bundle, info_with, passing_record};
use graham_screener::analysis::{build_view, evaluate, score, score_record, Criterion, SortSpec};
use graham_screener::error::NormalizeError;
use graham_screener::models::{Column, CompanyRecord, GrahamThresholds};
use graham_screener::normalizer::extract_record;

fn example_record() -> CompanyRecord {
    CompanyRecord {
        pe: Some(10.0),
        pb: Some(1.2),
        debt_to_equity: Some(80.0),
        dividend_yield_pct: Some(3.0),
        net_profit_positive: Some(true),
        market_cap_bn: Some(5.0),
        ..passing_record("EX.PA")
    }
}

#[test]
fn test_example_record_scores_six() {
    let mut record = example_record();
    let outcome = score_record(&mut record, &GrahamThresholds::default());

    assert_eq!(record.graham_score, 6);
    assert!(record.graham_pass);
    assert!(outcome.failed().is_empty());
}

#[test]
fn test_example_record_without_pe_scores_five() {
    let mut record = CompanyRecord {
        pe: None,
        ..example_record()
    };
    let outcome = score_record(&mut record, &GrahamThresholds::default());

    assert_eq!(record.graham_score, 5);
    assert!(!record.graham_pass);
    assert_eq!(outcome.failed(), vec![Criterion::PriceEarnings]);
}

#[test]
fn test_each_absent_field_fails_only_its_criterion() {
    let thresholds = GrahamThresholds::default();
    let cases: Vec<(CompanyRecord, Criterion)> = vec![
        (CompanyRecord { pe: None, ..example_record() }, Criterion::PriceEarnings),
        (CompanyRecord { pb: None, ..example_record() }, Criterion::PriceToBook),
        (CompanyRecord { debt_to_equity: None, ..example_record() }, Criterion::DebtToEquity),
        (CompanyRecord { dividend_yield_pct: None, ..example_record() }, Criterion::DividendYield),
        (CompanyRecord { net_profit_positive: None, ..example_record() }, Criterion::NetProfit),
        (CompanyRecord { market_cap_bn: None, ..example_record() }, Criterion::MarketCap),
    ];

    for (record, criterion) in cases {
        let outcome = evaluate(&record, &thresholds);
        assert_eq!(outcome.failed(), vec![criterion]);
        assert_eq!(outcome.score(), 5);
    }
}

#[test]
fn test_normalized_bundle_flows_into_scoring() {
    let info = info_with("Example SA", json!({ "trailingPE": null, "dividendYield": 0.03 }));
    let record = extract_record("EX.PA", &bundle(info)).unwrap();

    assert_eq!(record.name, "Example SA");
    assert_eq!(record.pe, None);
    assert_eq!(record.dividend_yield_pct.map(|y| (y * 100.0).round() / 100.0), Some(3.0));
    assert_eq!(record.market_cap_bn, Some(8.5));

    let scored = score(vec![record], &GrahamThresholds::default());
    assert_eq!(scored[0].graham_score, 5);
}

#[test]
fn test_uncoercible_field_is_an_error() {
    let info = info_with("Broken SA", json!({ "priceToBook": ["1.0"] }));
    assert_matches!(
        extract_record("BRK.PA", &bundle(info)),
        Err(NormalizeError::Coercion { field: "priceToBook", .. })
    );
}

#[test]
fn test_tighter_threshold_changes_the_verdict() {
    let strict = GrahamThresholds {
        max_pe: 9.0,
        ..Default::default()
    };

    let scored = score(vec![example_record()], &strict);
    assert_eq!(scored[0].graham_score, 5);
    assert!(!scored[0].graham_pass);
}

#[test]
fn test_view_keeps_input_order_on_ties() {
    let thresholds = GrahamThresholds::default();
    let records: Vec<CompanyRecord> = ["T1.PA", "T2.PA", "T3.PA", "T4.PA"]
        .iter()
        .map(|t| passing_record(t))
        .collect();

    let view = build_view(score(records, &thresholds), &SortSpec::default(), &[]);

    let order: Vec<_> = view.full_table.iter().map(|r| r.record.ticker.as_str()).collect();
    assert_eq!(order, vec!["T1.PA", "T2.PA", "T3.PA", "T4.PA"]);
    assert!(view.full_table.iter().all(|r| r.highlight));
}

#[test]
fn test_empty_passing_subset_has_no_export() {
    let records = vec![CompanyRecord::placeholder("A.PA"), CompanyRecord {
        pe: Some(50.0),
        ..passing_record("B.PA")
    }];

    let view = build_view(
        score(records, &GrahamThresholds::default()),
        &SortSpec { column: Column::Name, ascending: true },
        &[Column::Ticker],
    );

    assert!(view.passing.is_empty());
    assert!(view.export.is_none());
    assert_eq!(view.full_table.len(), 2);
}
