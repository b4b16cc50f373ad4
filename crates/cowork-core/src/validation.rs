//! Field-level validation of report submissions

use garde::Validate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::models::{ChangeType, NewReport, SpaceId};

/// Longest accepted free-text field
pub const MAX_TEXT_LENGTH: usize = 2000;

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every problem found in one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError { field: field.into(), message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Human-readable one-line summary
    pub fn summary(&self) -> String {
        let details: Vec<String> =
            self.errors.iter().map(|e| format!("{} {}", e.field, e.message)).collect();
        format!("Validation failed: {}", details.join("; "))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for ValidationErrors {}

/// Wire shape of a report submission
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateReportRequest {
    #[garde(required, range(min = 1))]
    space_id: Option<i64>,
    #[garde(required, custom(known_change_type))]
    change_type: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[garde(length(max = 2000))]
    current_info: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[garde(length(max = 2000))]
    corrected_info: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[garde(length(max = 2000))]
    additional_details: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    #[garde(email)]
    contact_email: Option<String>,
}

impl CreateReportRequest {
    fn into_new_report(self) -> Option<NewReport> {
        let change_type = self.change_type?.parse::<ChangeType>().ok()?;
        Some(NewReport {
            space_id: SpaceId(self.space_id?),
            change_type,
            current_info: self.current_info,
            corrected_info: self.corrected_info,
            additional_details: self.additional_details,
            contact_email: self.contact_email,
        })
    }
}

pub struct ReportValidator;

impl ReportValidator {
    /// Validate a raw JSON body into a [`NewReport`]
    pub fn validate(body: &Value) -> Result<NewReport, ValidationErrors> {
        let request = CreateReportRequest::deserialize(body).map_err(from_serde)?;

        if let Err(report) = request.validate() {
            let mut errors = ValidationErrors::default();
            for (path, error) in report.iter() {
                errors.push(camel_case(&path.to_string()), error.to_string());
            }
            return Err(errors);
        }

        request.into_new_report().ok_or_else(|| {
            let mut errors = ValidationErrors::default();
            errors.push("body", "is incomplete");
            errors
        })
    }
}

fn known_change_type(value: &Option<String>, _ctx: &()) -> garde::Result {
    match value {
        Some(raw) if raw.parse::<ChangeType>().is_err() => Err(garde::Error::new(format!(
            "must be one of: {}",
            allowed_change_types()
        ))),
        _ => Ok(()),
    }
}

/// Trimmed text, with blank values treated as absent
fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Shape errors are reported before any field rule runs
fn from_serde(error: serde_json::Error) -> ValidationErrors {
    let message = error.to_string();
    let mut errors = ValidationErrors::default();
    match unknown_field(&message) {
        Some(field) => errors.push(field, "is not a recognised field"),
        None => errors.push("body", message),
    }
    errors
}

fn unknown_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("unknown field `")?;
    rest.split_once('`').map(|(field, _)| field)
}

fn camel_case(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut upper = false;
    for c in path.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn allowed_change_types() -> String {
    ChangeType::ALL.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_report() {
        let body = json!({
            "spaceId": 3,
            "changeType": "hours",
            "currentInfo": "Open 9-17",
            "correctedInfo": "  Open 8-20  ",
            "contactEmail": "reader@example.com"
        });
        let report = ReportValidator::validate(&body).unwrap();
        assert_eq!(report.space_id, SpaceId(3));
        assert_eq!(report.change_type, ChangeType::Hours);
        assert_eq!(report.corrected_info.as_deref(), Some("Open 8-20"));
        assert_eq!(report.additional_details, None);
    }

    #[test]
    fn test_missing_change_type_is_named() {
        let errors = ReportValidator::validate(&json!({ "spaceId": 1 })).unwrap_err();
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.errors[0].field, "changeType");
        assert!(errors.summary().starts_with("Validation failed: changeType"));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let body = json!({ "spaceId": 1, "changeType": "other", "priority": "high" });
        let errors = ReportValidator::validate(&body).unwrap_err();
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.errors[0].field, "priority");
    }

    #[test]
    fn test_collects_every_field_problem() {
        let body = json!({ "spaceId": -1, "changeType": "renamed", "contactEmail": "nope" });
        let errors = ReportValidator::validate(&body).unwrap_err();
        assert!(errors.has_field("spaceId"));
        assert!(errors.has_field("changeType"));
        assert!(errors.has_field("contactEmail"));
        let change_type = errors.errors.iter().find(|e| e.field == "changeType").unwrap();
        assert!(change_type.message.contains("closed, moved"));
    }

    #[test]
    fn test_blank_text_is_dropped() {
        let body = json!({ "spaceId": 1, "changeType": "other", "contactEmail": "  ", "currentInfo": "" });
        let report = ReportValidator::validate(&body).unwrap();
        assert_eq!(report.contact_email, None);
        assert_eq!(report.current_info, None);
    }

    #[test]
    fn test_wrong_type_is_a_body_error() {
        let body = json!({ "spaceId": "three", "changeType": "other" });
        assert!(ReportValidator::validate(&body).unwrap_err().has_field("body"));
    }

    #[test]
    fn test_non_object_body() {
        let errors = ReportValidator::validate(&json!([1, 2])).unwrap_err();
        assert!(errors.has_field("body"));
    }

    #[test]
    fn test_overlong_text() {
        let body = json!({
            "spaceId": 1,
            "changeType": "other",
            "additionalDetails": "x".repeat(MAX_TEXT_LENGTH + 1)
        });
        let errors = ReportValidator::validate(&body).unwrap_err();
        assert!(errors.has_field("additionalDetails"));
    }

    #[test]
    fn test_email_shapes() {
        let valid = json!({ "spaceId": 1, "changeType": "other", "contactEmail": "a@b.co" });
        assert!(ReportValidator::validate(&valid).is_ok());

        for email in ["nope", "@b.co", "a b@c.de"] {
            let body = json!({ "spaceId": 1, "changeType": "other", "contactEmail": email });
            assert!(ReportValidator::validate(&body).unwrap_err().has_field("contactEmail"), "{email}");
        }
    }

    #[test]
    fn test_field_paths_are_camel_case() {
        assert_eq!(camel_case("contact_email"), "contactEmail");
        assert_eq!(camel_case("space_id"), "spaceId");
        assert_eq!(unknown_field("unknown field `priority`, expected one of `spaceId`"), Some("priority"));
    }
}
