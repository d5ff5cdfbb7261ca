//! Saved search records
//!
//! A saved search stores the canonical query string and is read back through
//! the same parser as a live URL. There is no second deserialization path.

use super::models::SearchQueryState;
use super::request::RequestBody;
use crate::error::{Result, SearchError, ValidationError};
use crate::query::{self, DefaultFilters, QueryParams};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Persisted `{ name, query_parameters }` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearchRecord {
    pub name: String,
    /// Canonical serialized form of the search
    pub query_parameters: String,
}

impl SavedSearchRecord {
    /// Record a state under a name; the name must not be blank
    pub fn new(name: impl Into<String>, state: &SearchQueryState) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SearchError::InvalidSavedSearch {
                message: "saved search name is required".to_string(),
            });
        }
        Ok(Self {
            name: trimmed.to_string(),
            query_parameters: query::serialize(state),
        })
    }

    /// Record built from a backend-shaped saved query
    pub fn from_request_body(
        name: impl Into<String>,
        body: &RequestBody,
        defaults: &DefaultFilters,
    ) -> Result<Self> {
        let (state, _) = query::resolve_params(&body.to_query_params(), defaults);
        Self::new(name, &state)
    }

    /// Parse the stored parameters with the live-URL parser
    pub fn to_state(&self, defaults: &DefaultFilters) -> (SearchQueryState, Vec<ValidationError>) {
        query::parse_search(&self.query_parameters, defaults)
    }

    /// Re-serialize the stored parameters into canonical form
    pub fn normalized(&self, defaults: &DefaultFilters) -> Self {
        let (state, _) = self.to_state(defaults);
        Self {
            name: self.name.clone(),
            query_parameters: query::serialize(&state),
        }
    }

    pub fn to_query_params(&self) -> QueryParams {
        QueryParams::from_query_string(&self.query_parameters)
    }

    /// SHA-256 of the canonical query string, used to spot duplicate saves
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.query_parameters.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Whether two records describe the same search, regardless of name
    pub fn same_search(&self, other: &Self) -> bool {
        self.query_parameters == other.query_parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::vocabulary::FilterName;
    use crate::search::request::{build_request_body, BuildOptions};

    #[test]
    fn test_blank_name_is_rejected() {
        let err = SavedSearchRecord::new("   ", &SearchQueryState::default()).unwrap_err();
        assert_eq!(err.code(), "invalid_saved_search");
    }

    #[test]
    fn test_record_reads_back_through_parser() {
        let defaults = DefaultFilters::default();
        let (state, _) = query::parse_search("query=arts&status=&agency=NEA", &defaults);
        let record = SavedSearchRecord::new("  arts  ", &state).unwrap();
        assert_eq!(record.name, "arts");

        let (restored, issues) = record.to_state(&defaults);
        assert!(issues.is_empty());
        assert_eq!(restored, state);
        assert!(restored.filter(FilterName::Status).is_empty());
    }

    #[test]
    fn test_fingerprint_ignores_insertion_order() {
        let defaults = DefaultFilters::default();
        let a = SavedSearchRecord::new("a", &query::parse_search("agency=B,A", &defaults).0).unwrap();
        let b = SavedSearchRecord::new("b", &query::parse_search("agency=A,B", &defaults).0).unwrap();
        assert!(a.same_search(&b));
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let c = SavedSearchRecord::new("c", &query::parse_search("agency=A", &defaults).0).unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_normalized_record() {
        let defaults = DefaultFilters::default();
        let record = SavedSearchRecord {
            name: "legacy".to_string(),
            query_parameters: "?sortby=closeDateAsc&status=posted,closed&junk=1".to_string(),
        };
        let normalized = record.normalized(&defaults);
        assert_eq!(
            normalized.query_parameters,
            "status=closed,posted&fundingInstrument=&eligibility=&agency=&category=&sortby=closeDateAsc"
        );
        assert_eq!(normalized.normalized(&defaults), normalized);
    }

    #[test]
    fn test_from_request_body() {
        let defaults = DefaultFilters::default();
        let (state, _) = query::parse_search("query=water&status=posted", &defaults);
        let body = build_request_body(&state, BuildOptions::default());
        let record = SavedSearchRecord::from_request_body("water", &body, &defaults).unwrap();
        assert_eq!(record.to_state(&defaults).0, state);
    }
}
