use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use crate::extraction::ExtractionResult;

/// Where an application currently stands. Closed set; stored lowercase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Processing,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Processing,
        ApplicationStatus::Rejected,
        ApplicationStatus::Accepted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Processing => "processing",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown application status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A stored application, as the dashboard sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    pub status: ApplicationStatus,
    pub referral_name: Option<String>,
    pub url: Option<String>,
    pub application_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Raw `applications` row. Status is checked on conversion to `ApplicationRecord`.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    pub status: String,
    pub referral_name: Option<String>,
    pub url: Option<String>,
    pub application_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for ApplicationRecord {
    type Error = UnknownStatus;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(ApplicationRecord {
            status: row.status.parse()?,
            id: row.id,
            user_id: row.user_id,
            company: row.company,
            position: row.position,
            referral_name: row.referral_name,
            url: row.url,
            application_id: row.application_id,
            created_at: row.created_at,
        })
    }
}

/// The creation form. Empty strings in the optional fields mean "not given".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub referral_name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub application_id: String,
}

impl ApplicationDraft {
    pub fn new(company: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            position: position.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_required(&self.company, &self.position)
    }

    /// Stamps the draft with its owner, turning blank optionals into `None`.
    pub fn into_new_application(self, user_id: Uuid) -> NewApplication {
        NewApplication {
            user_id,
            company: self.company,
            position: self.position,
            status: self.status,
            referral_name: non_blank(self.referral_name),
            url: non_blank(self.url),
            application_id: non_blank(self.application_id),
        }
    }
}

impl From<ExtractionResult> for ApplicationDraft {
    fn from(result: ExtractionResult) -> Self {
        Self {
            company: result.company,
            position: result.position,
            status: ApplicationStatus::Applied,
            referral_name: String::new(),
            url: result.application_url,
            application_id: result.application_id,
        }
    }
}

/// Insert input for the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewApplication {
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub referral_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub application_id: Option<String>,
}

impl NewApplication {
    pub fn validate(&self) -> Result<(), String> {
        validate_required(&self.company, &self.position)
    }
}

/// Company and position are required. Whitespace-only counts as missing.
fn validate_required(company: &str, position: &str) -> Result<(), String> {
    if company.trim().is_empty() {
        return Err("company cannot be empty".to_string());
    }
    if position.trim().is_empty() {
        return Err("position cannot be empty".to_string());
    }
    Ok(())
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
