//! Default filter resolution
//!
//! Precedence, lowest to highest: configured default, explicit empty,
//! explicit values. Only a filter whose key was absent picks up its default.

use super::parser::ParsedQuery;
use super::vocabulary::{FilterName, DEFAULT_STATUS_VALUES};
use crate::search::{FilterValue, SearchQueryState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Filter values applied when a filter is absent from the query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultFilters {
    values: BTreeMap<FilterName, FilterValue>,
}

impl Default for DefaultFilters {
    fn default() -> Self {
        Self::none().with(FilterName::Status, FilterValue::from_iter(DEFAULT_STATUS_VALUES))
    }
}

impl DefaultFilters {
    /// No defaults at all
    pub fn none() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: FilterName, value: FilterValue) -> Self {
        self.values.insert(name, value);
        self
    }

    pub fn get(&self, name: FilterName) -> Option<&FilterValue> {
        self.values.get(&name)
    }

    /// Fill every absent filter; never fails
    pub fn resolve(&self, parsed: &ParsedQuery) -> SearchQueryState {
        let filters = FilterName::ALL
            .into_iter()
            .map(|name| {
                let value = parsed
                    .filters
                    .get(&name)
                    .or_else(|| self.values.get(&name))
                    .cloned()
                    .unwrap_or_default();
                (name, value)
            })
            .collect();

        SearchQueryState {
            query: parsed.query.clone(),
            filters,
            page: parsed.page,
            sort_by: parsed.sort_by,
            ..SearchQueryState::default()
        }
    }
}
