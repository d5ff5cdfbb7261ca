//! Query parsing module
//!
//! Handles the textual side of a search:
//! - Vocabulary: filter names, backend names, sort options
//! - Parsing URL/saved query parameters into a [`ParsedQuery`]
//! - Default resolution into a [`SearchQueryState`]
//! - Page and sort validation
//! - Canonical serialization back to a query string

pub mod defaults;
pub mod params;
pub mod parser;
pub mod serialize;
pub mod validate;
pub mod vocabulary;

pub use defaults::DefaultFilters;
pub use params::{ParamValue, QueryParams};
pub use parser::ParsedQuery;
pub use serialize::{serialize, to_query_params};
pub use validate::{clamp_page_to_total, parse_page, validate_page, validate_sort, Checked};
pub use vocabulary::*;

use crate::error::ValidationError;
use crate::search::SearchQueryState;

/// Whether a key is one of the legal query-string keys
pub fn is_valid_key(key: &str) -> bool {
    VALID_SEARCH_QUERY_PARAM_KEYS.contains(&key)
}

/// Parse and resolve parameters in one step
pub fn resolve_params(
    params: &QueryParams,
    defaults: &DefaultFilters,
) -> (SearchQueryState, Vec<ValidationError>) {
    let parsed = ParsedQuery::parse(params);
    let state = defaults.resolve(&parsed);
    (state, parsed.issues)
}

/// Parse and resolve a raw query string in one step
pub fn parse_search(
    raw: &str,
    defaults: &DefaultFilters,
) -> (SearchQueryState, Vec<ValidationError>) {
    resolve_params(&QueryParams::from_query_string(raw), defaults)
}
