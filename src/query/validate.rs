//! Page and sort validation
//!
//! Invalid input never fails a search: each check substitutes the default and
//! hands back the issue so the caller can show a notice.

use super::vocabulary::SortOption;
use crate::error::ValidationError;

/// A validated value, plus the issue that forced a substitution (if any)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checked<T> {
    pub value: T,
    pub issue: Option<ValidationError>,
}

impl<T> Checked<T> {
    pub fn ok(value: T) -> Self {
        Self { value, issue: None }
    }

    pub fn substituted(value: T, issue: ValidationError) -> Self {
        Self {
            value,
            issue: Some(issue),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issue.is_none()
    }
}

/// Parse a page number; anything below 1 or non-numeric is an error
pub fn parse_page(raw: &str) -> Result<u32, ValidationError> {
    match raw.trim().parse::<i64>() {
        Ok(page) if page >= 1 => u32::try_from(page).map_err(|_| ValidationError::InvalidPage {
            raw: raw.to_string(),
        }),
        _ => Err(ValidationError::InvalidPage {
            raw: raw.to_string(),
        }),
    }
}

/// Page number, or 1 with a warning
pub fn validate_page(raw: &str) -> Checked<u32> {
    match parse_page(raw) {
        Ok(page) => Checked::ok(page),
        Err(issue) => Checked::substituted(1, issue),
    }
}

/// Sort option, or relevancy with a warning
pub fn validate_sort(raw: &str) -> Checked<SortOption> {
    match raw.parse::<SortOption>() {
        Ok(option) => Checked::ok(option),
        Err(()) => Checked::substituted(
            SortOption::default(),
            ValidationError::UnknownSort {
                raw: raw.to_string(),
            },
        ),
    }
}

/// Pull a page back to the last page once the total is known
///
/// A `total_pages` of 0 (no results) leaves the page alone.
pub fn clamp_page_to_total(page: u32, total_pages: u32) -> Checked<u32> {
    if total_pages > 0 && page > total_pages {
        Checked::substituted(
            total_pages,
            ValidationError::PageOutOfRange {
                page,
                max: total_pages,
            },
        )
    } else {
        Checked::ok(page.max(1))
    }
}
