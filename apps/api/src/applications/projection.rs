//! Filter/search projection over the in-memory list, plus per-status counts.
//!
//! Both are pure; the dashboard recomputes them on every keystroke.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::application::{ApplicationRecord, ApplicationStatus, UnknownStatus};

/// The status tab currently selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: ApplicationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    pub applied: usize,
    pub processing: usize,
    pub rejected: usize,
    pub accepted: usize,
}

/// Records passing `filter` whose searchable text contains `query`, case-insensitively.
///
/// Searchable: position, company, application_id, referral_name. Missing optionals
/// never match. An empty query keeps everything the filter keeps.
pub fn project<'a>(
    records: &'a [ApplicationRecord],
    filter: StatusFilter,
    query: &str,
) -> Vec<&'a ApplicationRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| filter.matches(r.status))
        .filter(|r| matches_search(r, &needle))
        .collect()
}

fn matches_search(record: &ApplicationRecord, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(&record.position)
        || contains(&record.company)
        || record.application_id.as_deref().is_some_and(contains)
        || record.referral_name.as_deref().is_some_and(contains)
}

pub fn get_counts(records: &[ApplicationRecord]) -> StatusCounts {
    records.iter().fold(
        StatusCounts {
            all: records.len(),
            ..StatusCounts::default()
        },
        |mut counts, record| {
            match record.status {
                ApplicationStatus::Applied => counts.applied += 1,
                ApplicationStatus::Processing => counts.processing += 1,
                ApplicationStatus::Rejected => counts.rejected += 1,
                ApplicationStatus::Accepted => counts.accepted += 1,
            }
            counts
        },
    )
}
