//! Search query state and related data models

use crate::query::vocabulary::{FilterName, SortOption, FILTER_DELIMITER};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Selected values of one filter
///
/// Tokens are trimmed, never empty and never contain [`FILTER_DELIMITER`].
/// Iteration order is sorted, which keeps serialization canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FilterValue(BTreeSet<String>);

impl FilterValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split each raw value on the delimiter and collect the non-empty tokens
    pub fn parse<'a>(raw: impl IntoIterator<Item = &'a str>) -> Self {
        Self(
            raw.into_iter()
                .flat_map(|value| value.split(FILTER_DELIMITER))
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|t| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for FilterValue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let tokens: Vec<S> = iter.into_iter().collect();
        Self::parse(tokens.iter().map(|t| t.as_ref()))
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(raw: Vec<String>) -> Self {
        Self::parse(raw.iter().map(|t| t.as_str()))
    }
}

// Tokens read from config or JSON go through `parse` like any query string
impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<String>::deserialize(deserializer).map(Self::from)
    }
}

/// What triggered a search, used by the client to diff result sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    #[default]
    InitialLoad,
    Update,
}

/// `field_changed` value that keeps the requested page on an update
pub const PAGINATION_FIELD: &str = "pagination";

/// Normalized, validated representation of one search
///
/// After default resolution `filters` holds an entry for every
/// [`FilterName`]. Every transformation returns a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryState {
    /// Free-text query, possibly empty
    pub query: String,
    /// Selected values per filter
    pub filters: BTreeMap<FilterName, FilterValue>,
    /// Page number (1-indexed)
    pub page: u32,
    pub sort_by: SortOption,
    /// Transient client diffing metadata, never serialized into a query string
    #[serde(default)]
    pub action_type: ActionType,
    #[serde(default)]
    pub field_changed: Option<String>,
}

impl Default for SearchQueryState {
    fn default() -> Self {
        Self {
            query: String::new(),
            filters: FilterName::ALL
                .into_iter()
                .map(|name| (name, FilterValue::new()))
                .collect(),
            page: 1,
            sort_by: SortOption::default(),
            action_type: ActionType::default(),
            field_changed: None,
        }
    }
}

impl SearchQueryState {
    /// Values of a filter, empty when it has none
    pub fn filter(&self, name: FilterName) -> &FilterValue {
        static EMPTY: FilterValue = FilterValue(BTreeSet::new());
        self.filters.get(&name).unwrap_or(&EMPTY)
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_filter(mut self, name: FilterName, value: FilterValue) -> Self {
        self.filters.insert(name, value);
        self
    }

    /// Set page number, never below 1
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_sort(mut self, sort_by: SortOption) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_action(mut self, action_type: ActionType, field_changed: Option<String>) -> Self {
        self.action_type = action_type;
        self.field_changed = field_changed;
        self
    }

    /// Drop transient metadata, leaving only what a query string carries
    pub fn persistent(mut self) -> Self {
        self.action_type = ActionType::default();
        self.field_changed = None;
        self
    }

    /// Page the backend should be asked for
    ///
    /// An update to anything but pagination starts over at page 1.
    pub fn effective_page(&self) -> u32 {
        match (self.action_type, self.field_changed.as_deref()) {
            (ActionType::Update, Some(PAGINATION_FIELD)) => self.page,
            (ActionType::Update, _) => 1,
            (ActionType::InitialLoad, _) => self.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_value_parse() {
        let value = FilterValue::parse([" posted , closed", "", "posted,,archived"]);
        assert_eq!(value.to_vec(), vec!["archived", "closed", "posted"]);
    }

    #[test]
    fn test_filter_value_deserialize_normalizes() {
        let value: FilterValue =
            serde_json::from_str(r#"["posted,closed", " forecasted", ""]"#).unwrap();
        assert_eq!(value.to_vec(), vec!["closed", "forecasted", "posted"]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            serde_json::json!(["closed", "forecasted", "posted"])
        );
    }

    #[test]
    fn test_filter_value_order_independent() {
        assert_eq!(
            FilterValue::from_iter(["closed", "posted"]),
            FilterValue::from_iter(["posted", "closed"])
        );
    }

    #[test]
    fn test_default_state() {
        let state = SearchQueryState::default();
        assert_eq!(state.page, 1);
        assert_eq!(state.sort_by, SortOption::Relevancy);
        assert_eq!(state.filters.len(), FilterName::ALL.len());
        assert!(state.filter(FilterName::Agency).is_empty());
    }

    #[test]
    fn test_builders_return_new_values() {
        let base = SearchQueryState::default();
        let paged = base.clone().with_page(0);
        assert_eq!(paged.page, 1);
        assert_eq!(base, SearchQueryState::default());

        let filtered = base.with_filter(FilterName::Agency, FilterValue::from_iter(["HHS"]));
        assert!(filtered.filter(FilterName::Agency).contains("HHS"));
    }

    #[test]
    fn test_effective_page() {
        let state = SearchQueryState::default().with_page(5);
        assert_eq!(state.effective_page(), 5);

        let update = state.clone().with_action(ActionType::Update, Some("status".to_string()));
        assert_eq!(update.effective_page(), 1);

        let paging = state
            .clone()
            .with_action(ActionType::Update, Some(PAGINATION_FIELD.to_string()));
        assert_eq!(paging.effective_page(), 5);

        let no_field = state.with_action(ActionType::Update, None);
        assert_eq!(no_field.effective_page(), 1);
    }

    #[test]
    fn test_persistent_drops_metadata() {
        let state = SearchQueryState::default()
            .with_action(ActionType::Update, Some("query".to_string()))
            .persistent();
        assert_eq!(state.action_type, ActionType::InitialLoad);
        assert_eq!(state.field_changed, None);
    }
}
