use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::space::SpaceId;
use crate::error::CoworkError;

/// Unique identifier for a submitted report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub Uuid);

impl ReportId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of correction a visitor reports about a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Closed,
    Moved,
    Hours,
    Pricing,
    Services,
    Contact,
    Other,
}

impl ChangeType {
    pub const ALL: [ChangeType; 7] = [
        ChangeType::Closed,
        ChangeType::Moved,
        ChangeType::Hours,
        ChangeType::Pricing,
        ChangeType::Services,
        ChangeType::Contact,
        ChangeType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Closed => "closed",
            ChangeType::Moved => "moved",
            ChangeType::Hours => "hours",
            ChangeType::Pricing => "pricing",
            ChangeType::Services => "services",
            ChangeType::Contact => "contact",
            ChangeType::Other => "other",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = CoworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        ChangeType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| CoworkError::invalid_parameter("changeType", format!("unknown value '{}'", s)))
    }
}

/// Moderation status of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Pending,
    Reviewed,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = CoworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ReportStatus::Pending),
            "reviewed" => Ok(ReportStatus::Reviewed),
            "resolved" => Ok(ReportStatus::Resolved),
            "rejected" => Ok(ReportStatus::Rejected),
            _ => Err(CoworkError::Serialization(format!("Unknown report status: {}", s))),
        }
    }
}

/// Validated report submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub space_id: SpaceId,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

impl NewReport {
    pub fn new(space_id: SpaceId, change_type: ChangeType) -> Self {
        Self {
            space_id,
            change_type,
            current_info: None,
            corrected_info: None,
            additional_details: None,
            contact_email: None,
        }
    }
}

/// A stored report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub space_id: SpaceId,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Materialize a submission with a fresh id and `pending` status
    pub fn from_new(new: NewReport) -> Self {
        Self {
            id: ReportId::new(),
            space_id: new.space_id,
            change_type: new.change_type,
            current_info: new.current_info,
            corrected_info: new.corrected_info,
            additional_details: new.additional_details,
            contact_email: new.contact_email,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
