//! Canonical query-string serialization
//!
//! Keys follow [`VALID_SEARCH_QUERY_PARAM_KEYS`] order and filter tokens are
//! sorted, so equal states always produce the same string. Empty filters are
//! written as `key=` to keep them distinct from absent keys.

use super::params::QueryParams;
use super::vocabulary::{
    FilterName, SortOption, FILTER_DELIMITER, PAGE_KEY, QUERY_KEY, SORT_KEY,
    VALID_SEARCH_QUERY_PARAM_KEYS,
};
use crate::search::SearchQueryState;

/// Canonical query string for a state, without a leading `?`
pub fn serialize(state: &SearchQueryState) -> String {
    let mut pairs: Vec<String> = Vec::with_capacity(VALID_SEARCH_QUERY_PARAM_KEYS.len());

    if !state.query.is_empty() {
        pairs.push(format!("{}={}", QUERY_KEY, urlencoding::encode(&state.query)));
    }

    for name in FilterName::ALL {
        let tokens = state
            .filter(name)
            .iter()
            .map(|token| urlencoding::encode(token).into_owned())
            .collect::<Vec<_>>()
            .join(&FILTER_DELIMITER.to_string());
        pairs.push(format!("{}={}", name.as_str(), tokens));
    }

    if state.page > 1 {
        pairs.push(format!("{}={}", PAGE_KEY, state.page));
    }

    if state.sort_by != SortOption::default() {
        pairs.push(format!("{}={}", SORT_KEY, state.sort_by.as_str()));
    }

    pairs.join("&")
}

/// Same content as [`serialize`], as a parameter map
pub fn to_query_params(state: &SearchQueryState) -> QueryParams {
    QueryParams::from_query_string(&serialize(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{parse_search, DefaultFilters};
    use crate::search::{ActionType, FilterValue};

    fn round_trip(state: &SearchQueryState) -> SearchQueryState {
        parse_search(&serialize(state), &DefaultFilters::default()).0
    }

    #[test]
    fn test_key_order() {
        let state = SearchQueryState::default()
            .with_query("water")
            .with_page(3)
            .with_sort(SortOption::AwardFloorDesc)
            .with_filter(FilterName::Status, FilterValue::from_iter(["posted"]));
        assert_eq!(
            serialize(&state),
            "query=water&status=posted&fundingInstrument=&eligibility=&agency=&category=&page=3&sortby=awardFloorDesc"
        );
    }

    #[test]
    fn test_order_independence() {
        let defaults = DefaultFilters::default();
        let a = parse_search("status=closed,posted", &defaults).0;
        let b = parse_search("status=posted,closed", &defaults).0;
        assert_eq!(serialize(&a), serialize(&b));
        assert!(serialize(&a).contains("status=closed,posted"));
    }

    #[test]
    fn test_round_trip_default_state() {
        let (state, _) = parse_search("", &DefaultFilters::default());
        assert_eq!(round_trip(&state), state);
    }

    #[test]
    fn test_round_trip_preserves_explicit_empty() {
        let state = SearchQueryState::default();
        assert!(state.filter(FilterName::Status).is_empty());
        let again = round_trip(&state);
        assert!(again.filter(FilterName::Status).is_empty());
        assert_eq!(again, state);
    }

    #[test]
    fn test_round_trip_encodes_special_characters() {
        let state = SearchQueryState::default()
            .with_query("health & human services, 100%")
            .with_filter(FilterName::Agency, FilterValue::from_iter(["HHS-NIH11", "A&B", "a b"]))
            .with_filter(FilterName::Category, FilterValue::from_iter(["recovery_act"]))
            .with_page(12)
            .with_sort(SortOption::CloseDateAsc);
        let serialized = serialize(&state);
        assert!(!serialized.contains(' '));
        assert_eq!(round_trip(&state), state);
    }

    #[test]
    fn test_round_trip_every_sort_and_filter() {
        let token_sets: [&[&str]; 3] = [&[], &["posted"], &["b c", "a", "x-y_z", "100%"]];
        for sort in SortOption::ALL {
            for name in FilterName::ALL {
                for tokens in token_sets {
                    let state = SearchQueryState::default()
                        .with_query("grants")
                        .with_page(2)
                        .with_sort(sort)
                        .with_filter(name, FilterValue::from_iter(tokens.iter().copied()));
                    assert_eq!(
                        round_trip(&state),
                        state,
                        "sort {} filter {} tokens {:?}",
                        sort,
                        name,
                        tokens
                    );
                }
            }
        }
    }

    #[test]
    fn test_round_trip_drops_transient_metadata() {
        let state = SearchQueryState::default()
            .with_query("x")
            .with_action(ActionType::Update, Some("query".to_string()));
        assert_eq!(round_trip(&state), state.persistent());
    }

    #[test]
    fn test_serialize_is_a_fixed_point() {
        let (state, _) = parse_search(
            "sortby=postedDateDesc&agency=b,a&page=4&query=rural+broadband&junk=1",
            &DefaultFilters::default(),
        );
        let once = serialize(&state);
        let twice = serialize(&round_trip(&state));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_to_query_params() {
        let params = to_query_params(&SearchQueryState::default().with_query("a b"));
        assert_eq!(params.get("query").and_then(|v| v.first()), Some("a b"));
        assert_eq!(params.get("status").and_then(|v| v.first()), Some(""));
        assert!(!params.contains_key("page"));
    }
}
