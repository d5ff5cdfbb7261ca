//! Query parameter parsing
//!
//! Turns a flat [`QueryParams`] map into a [`ParsedQuery`]. Filters keep the
//! difference between an absent key and a key that is present but empty; the
//! default resolver relies on it.

use super::params::QueryParams;
use super::validate::{validate_page, validate_sort};
use super::vocabulary::{FilterName, SortOption, PAGE_KEY, QUERY_KEY, SORT_KEY};
use crate::error::ValidationError;
use crate::search::FilterValue;
use std::collections::BTreeMap;
use tracing::debug;

/// Parsed, not yet default-resolved search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Free-text query (empty when absent)
    pub query: String,
    /// Only the filters whose key was present in the source
    pub filters: BTreeMap<FilterName, FilterValue>,
    /// Page number, 1 when missing or invalid
    pub page: u32,
    pub sort_by: SortOption,
    /// Non-fatal issues found while parsing page and sort
    pub issues: Vec<ValidationError>,
}

impl ParsedQuery {
    /// Parse a parameter map; never fails
    pub fn parse(params: &QueryParams) -> Self {
        let query = params
            .get(QUERY_KEY)
            .and_then(|v| v.first())
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .unwrap_or_default();

        let mut issues = Vec::new();

        let page = match params.get(PAGE_KEY).and_then(|v| v.first()) {
            Some(raw) => {
                let checked = validate_page(raw);
                issues.extend(checked.issue);
                checked.value
            }
            None => 1,
        };

        let sort_by = match params.get(SORT_KEY).and_then(|v| v.first()) {
            Some(raw) => {
                let checked = validate_sort(raw);
                issues.extend(checked.issue);
                checked.value
            }
            None => SortOption::default(),
        };

        let filters = FilterName::ALL
            .into_iter()
            .filter_map(|name| {
                params
                    .get(name.as_str())
                    .map(|raw| (name, FilterValue::parse(raw.iter())))
            })
            .collect();

        let ignored: Vec<&str> = params
            .keys()
            .filter(|key| !super::is_valid_key(key))
            .collect();
        if !ignored.is_empty() {
            debug!("Ignoring unknown query parameters: {:?}", ignored);
        }

        Self {
            query,
            filters,
            page,
            sort_by,
            issues,
        }
    }

    /// Parse a raw URL query string
    pub fn parse_query_string(raw: &str) -> Self {
        Self::parse(&QueryParams::from_query_string(raw))
    }

    /// Whether a filter key was present in the source
    pub fn has_filter(&self, name: FilterName) -> bool {
        self.filters.contains_key(&name)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
