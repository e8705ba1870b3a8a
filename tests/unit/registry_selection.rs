use pretty_assertions::assert_eq;
use test_log::test;

use graham_screener::registry;

#[test]
fn test_search_ranks_name_match_first() {
    let hits = registry::search("air liquide", 3);
    assert_eq!(hits.first().map(|h| h.symbol), Some("AI.PA"));
    assert!(hits.len() <= 3);
}

#[test]
fn test_search_hits_are_registry_entries() {
    for hit in registry::search("pa", 10) {
        assert_eq!(registry::display_name(hit.symbol), Some(hit.name));
        let label = registry::choice_label(hit.symbol, hit.name);
        assert_eq!(registry::symbol_from_choice(&label), hit.symbol);
    }
}

#[test]
fn test_search_blank_query_returns_nothing() {
    assert!(registry::search("   ", 5).is_empty());
}
