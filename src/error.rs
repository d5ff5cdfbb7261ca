//! Error types for the query engine
//!
//! Two families: [`ValidationError`] is recoverable and only ever reported as a
//! warning next to a substituted default; [`SearchError`] is what the backend
//! boundary surfaces to callers.

use serde::Serialize;
use std::fmt;

/// Crate-wide result alias
pub type Result<T, E = SearchError> = std::result::Result<T, E>;

/// A malformed page or sort token in the incoming query
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid page number {raw:?}, using page 1")]
    InvalidPage { raw: String },
    #[error("page {page} is past the last page ({max})")]
    PageOutOfRange { page: u32, max: u32 },
    #[error("unknown sort option {raw:?}, using relevancy")]
    UnknownSort { raw: String },
}

impl ValidationError {
    /// Translation key for the UI layer's `translate(key)` function
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::InvalidPage { .. } => "Search.validation.invalidPage",
            Self::PageOutOfRange { .. } => "Search.validation.pageOutOfRange",
            Self::UnknownSort { .. } => "Search.validation.unknownSort",
        }
    }

    /// Machine-readable discriminator
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPage { .. } => "invalid_page",
            Self::PageOutOfRange { .. } => "page_out_of_range",
            Self::UnknownSort { .. } => "unknown_sort",
        }
    }

    pub fn to_warning(&self) -> Warning {
        Warning {
            code: self.code(),
            message_key: self.message_key(),
            message: self.to_string(),
        }
    }
}

/// Serializable form of a [`ValidationError`]
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Warning {
    pub code: &'static str,
    pub message_key: &'static str,
    pub message: String,
}

/// Why a backend call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "status")]
pub enum NetworkFailure {
    /// Non-2xx response
    Status(u16),
    Timeout,
    /// The caller cancelled the request
    Aborted,
    /// Connection, DNS, TLS or body read failure
    Transport,
}

impl fmt::Display for NetworkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Timeout => write!(f, "timeout"),
            Self::Aborted => write!(f, "aborted"),
            Self::Transport => write!(f, "transport error"),
        }
    }
}

/// Errors surfaced from the backend boundary
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The backend answered 200 without a `data` field
    #[error("search backend returned no data")]
    NoData,

    #[error("search backend returned an unreadable response: {message}")]
    InvalidResponse { message: String },

    #[error("search backend request failed ({reason}): {message}")]
    Network {
        reason: NetworkFailure,
        message: String,
    },

    /// The CSV export response had no body
    #[error("export stream failed: {message}")]
    ExportStream { message: String },

    #[error("invalid saved search: {message}")]
    InvalidSavedSearch { message: String },
}

impl SearchError {
    pub fn network(reason: NetworkFailure, message: impl Into<String>) -> Self {
        Self::Network {
            reason,
            message: message.into(),
        }
    }

    pub fn aborted() -> Self {
        Self::network(NetworkFailure::Aborted, "request cancelled by caller")
    }

    /// Machine-readable discriminator
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoData => "no_data",
            Self::InvalidResponse { .. } => "invalid_response",
            Self::Network { .. } => "network",
            Self::ExportStream { .. } => "export_stream",
            Self::InvalidSavedSearch { .. } => "invalid_saved_search",
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(
            self,
            Self::Network {
                reason: NetworkFailure::Aborted,
                ..
            }
        )
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            NetworkFailure::Timeout
        } else if let Some(status) = err.status() {
            NetworkFailure::Status(status.as_u16())
        } else {
            NetworkFailure::Transport
        };
        Self::network(reason, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            SearchError::NoData,
            SearchError::InvalidResponse {
                message: String::new(),
            },
            SearchError::aborted(),
            SearchError::ExportStream {
                message: String::new(),
            },
            SearchError::InvalidSavedSearch {
                message: String::new(),
            },
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_aborted() {
        assert!(SearchError::aborted().is_aborted());
        assert!(!SearchError::NoData.is_aborted());
    }

    #[test]
    fn test_warning_carries_key() {
        let warning = ValidationError::UnknownSort {
            raw: "nope".to_string(),
        }
        .to_warning();
        assert_eq!(warning.code, "unknown_sort");
        assert_eq!(warning.message_key, "Search.validation.unknownSort");
        assert!(warning.message.contains("nope"));
    }
}
