//! Filter and sort vocabulary
//!
//! Single source of truth for every filter name, backend field name and sort
//! option the engine understands.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Delimiter between values of a multi-valued filter in a query string
pub const FILTER_DELIMITER: char = ',';

/// Legal query-string keys, in canonical serialization order
pub const VALID_SEARCH_QUERY_PARAM_KEYS: [&str; 8] = [
    "query",
    "status",
    "fundingInstrument",
    "eligibility",
    "agency",
    "category",
    "page",
    "sortby",
];

pub const QUERY_KEY: &str = "query";
pub const PAGE_KEY: &str = "page";
pub const SORT_KEY: &str = "sortby";

/// Status values applied when the `status` filter is absent
pub const DEFAULT_STATUS_VALUES: [&str; 2] = ["forecasted", "posted"];

/// Frontend-facing filter keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterName {
    Status,
    FundingInstrument,
    Eligibility,
    Agency,
    Category,
}

impl FilterName {
    pub const ALL: [FilterName; 5] = [
        Self::Status,
        Self::FundingInstrument,
        Self::Eligibility,
        Self::Agency,
        Self::Category,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::FundingInstrument => "fundingInstrument",
            Self::Eligibility => "eligibility",
            Self::Agency => "agency",
            Self::Category => "category",
        }
    }

    pub fn backend(&self) -> BackendFilterName {
        match self {
            Self::Status => BackendFilterName::OpportunityStatus,
            Self::FundingInstrument => BackendFilterName::FundingInstrument,
            Self::Eligibility => BackendFilterName::ApplicantType,
            Self::Agency => BackendFilterName::Agency,
            Self::Category => BackendFilterName::FundingCategory,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == key)
    }
}

impl fmt::Display for FilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire-level filter keys the search backend expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendFilterName {
    OpportunityStatus,
    FundingInstrument,
    ApplicantType,
    Agency,
    FundingCategory,
}

impl BackendFilterName {
    pub const ALL: [BackendFilterName; 5] = [
        Self::OpportunityStatus,
        Self::FundingInstrument,
        Self::ApplicantType,
        Self::Agency,
        Self::FundingCategory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpportunityStatus => "opportunity_status",
            Self::FundingInstrument => "funding_instrument",
            Self::ApplicantType => "applicant_type",
            Self::Agency => "agency",
            Self::FundingCategory => "funding_category",
        }
    }

    pub fn frontend(&self) -> FilterName {
        match self {
            Self::OpportunityStatus => FilterName::Status,
            Self::FundingInstrument => FilterName::FundingInstrument,
            Self::ApplicantType => FilterName::Eligibility,
            Self::Agency => FilterName::Agency,
            Self::FundingCategory => FilterName::Category,
        }
    }
}

/// Sort direction sent to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Backend field a search is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    Relevancy,
    PostDate,
    CloseDate,
    OpportunityTitle,
    AwardFloor,
    AwardCeiling,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevancy => "relevancy",
            Self::PostDate => "post_date",
            Self::CloseDate => "close_date",
            Self::OpportunityTitle => "opportunity_title",
            Self::AwardFloor => "award_floor",
            Self::AwardCeiling => "award_ceiling",
        }
    }
}

/// Sort options accepted in the `sortby` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    #[default]
    Relevancy,
    PostedDateAsc,
    PostedDateDesc,
    CloseDateAsc,
    CloseDateDesc,
    OpportunityTitleAsc,
    OpportunityTitleDesc,
    AwardFloorAsc,
    AwardFloorDesc,
    AwardCeilingAsc,
    AwardCeilingDesc,
}

impl SortOption {
    pub const ALL: [SortOption; 11] = [
        Self::Relevancy,
        Self::PostedDateAsc,
        Self::PostedDateDesc,
        Self::CloseDateAsc,
        Self::CloseDateDesc,
        Self::OpportunityTitleAsc,
        Self::OpportunityTitleDesc,
        Self::AwardFloorAsc,
        Self::AwardFloorDesc,
        Self::AwardCeilingAsc,
        Self::AwardCeilingDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevancy => "relevancy",
            Self::PostedDateAsc => "postedDateAsc",
            Self::PostedDateDesc => "postedDateDesc",
            Self::CloseDateAsc => "closeDateAsc",
            Self::CloseDateDesc => "closeDateDesc",
            Self::OpportunityTitleAsc => "opportunityTitleAsc",
            Self::OpportunityTitleDesc => "opportunityTitleDesc",
            Self::AwardFloorAsc => "awardFloorAsc",
            Self::AwardFloorDesc => "awardFloorDesc",
            Self::AwardCeilingAsc => "awardCeilingAsc",
            Self::AwardCeilingDesc => "awardCeilingDesc",
        }
    }

    pub fn order_by(&self) -> OrderBy {
        match self {
            Self::Relevancy => OrderBy::Relevancy,
            Self::PostedDateAsc | Self::PostedDateDesc => OrderBy::PostDate,
            Self::CloseDateAsc | Self::CloseDateDesc => OrderBy::CloseDate,
            Self::OpportunityTitleAsc | Self::OpportunityTitleDesc => OrderBy::OpportunityTitle,
            Self::AwardFloorAsc | Self::AwardFloorDesc => OrderBy::AwardFloor,
            Self::AwardCeilingAsc | Self::AwardCeilingDesc => OrderBy::AwardCeiling,
        }
    }

    pub fn direction(&self) -> SortDirection {
        match self {
            Self::PostedDateAsc
            | Self::CloseDateAsc
            | Self::OpportunityTitleAsc
            | Self::AwardFloorAsc
            | Self::AwardCeilingAsc => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }

    /// Inverse of [`order_by`](Self::order_by) and [`direction`](Self::direction)
    pub fn from_backend(order_by: OrderBy, direction: SortDirection) -> Self {
        if order_by == OrderBy::Relevancy {
            return Self::Relevancy;
        }
        Self::ALL
            .into_iter()
            .find(|option| option.order_by() == order_by && option.direction() == direction)
            .unwrap_or_default()
    }
}

impl FromStr for SortOption {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_filter_mapping_is_bijective() {
        let backends: HashSet<_> = FilterName::ALL.iter().map(|f| f.backend()).collect();
        assert_eq!(backends.len(), FilterName::ALL.len());
        for name in FilterName::ALL {
            assert_eq!(name.backend().frontend(), name);
        }
        for backend in BackendFilterName::ALL {
            assert_eq!(backend.frontend().backend(), backend);
        }
    }

    #[test]
    fn test_valid_keys_cover_filters() {
        for name in FilterName::ALL {
            assert!(VALID_SEARCH_QUERY_PARAM_KEYS.contains(&name.as_str()));
        }
        assert_eq!(VALID_SEARCH_QUERY_PARAM_KEYS[0], QUERY_KEY);
        assert_eq!(VALID_SEARCH_QUERY_PARAM_KEYS[6], PAGE_KEY);
        assert_eq!(VALID_SEARCH_QUERY_PARAM_KEYS[7], SORT_KEY);
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for name in FilterName::ALL {
            assert_eq!(serde_json::to_value(name).unwrap(), name.as_str());
        }
        for backend in BackendFilterName::ALL {
            assert_eq!(serde_json::to_value(backend).unwrap(), backend.as_str());
        }
        for option in SortOption::ALL {
            assert_eq!(serde_json::to_value(option).unwrap(), option.as_str());
        }
    }

    #[test]
    fn test_sort_option_parsing() {
        assert_eq!("closeDateAsc".parse::<SortOption>(), Ok(SortOption::CloseDateAsc));
        assert_eq!("relevancy".parse::<SortOption>(), Ok(SortOption::Relevancy));
        assert!("closedateasc".parse::<SortOption>().is_err());
    }

    #[test]
    fn test_sort_backend_pairs() {
        assert_eq!(SortOption::CloseDateAsc.order_by(), OrderBy::CloseDate);
        assert_eq!(SortOption::CloseDateAsc.direction(), SortDirection::Ascending);
        assert_eq!(SortOption::Relevancy.direction(), SortDirection::Descending);
        for option in SortOption::ALL {
            assert_eq!(
                SortOption::from_backend(option.order_by(), option.direction()),
                option
            );
        }
    }
}
