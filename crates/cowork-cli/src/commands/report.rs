use crate::cli::ReportArgs;
use crate::output::OutputWriter;
use crate::output_types::ReportOutput;
use anyhow::{bail, Result};
use cowork_client::DirectoryApi;
use cowork_core::models::NewReport;
use cowork_core::validation::ReportValidator;
use serde_json::{json, Value};

pub async fn execute(args: ReportArgs, api: &dyn DirectoryApi, output: &OutputWriter) -> Result<()> {
    let report = match ReportValidator::validate(&submission(&args)) {
        Ok(report) => report,
        Err(errors) => {
            for error in &errors.errors {
                output.error(format!("{} {}", error.field, error.message));
            }
            bail!("Report was not submitted");
        }
    };

    let stored = submit(&report, api).await?;

    if output.is_json() {
        return output.result(stored);
    }

    output.success(format!("Report {} submitted for space {}", stored.report_id, stored.space_id));
    output.info("Status: pending review");
    Ok(())
}

async fn submit(report: &NewReport, api: &dyn DirectoryApi) -> Result<ReportOutput> {
    let stored = api.submit_report(report).await?;
    tracing::debug!(report_id = %stored.id, "Report accepted");

    Ok(ReportOutput {
        report_id: stored.id.to_string(),
        space_id: stored.space_id.0,
        status: stored.status.as_str().to_string(),
        created_at: stored.created_at,
    })
}

/// Request body in the shape the API accepts
fn submission(args: &ReportArgs) -> Value {
    let mut body = json!({
        "spaceId": args.space_id.0,
        "changeType": args.change_type.as_str(),
    });
    let optional = [
        ("currentInfo", &args.current_info),
        ("correctedInfo", &args.corrected_info),
        ("additionalDetails", &args.details),
        ("contactEmail", &args.email),
    ];
    for (field, value) in optional {
        if let Some(value) = value {
            body[field] = Value::String(value.clone());
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use cowork_core::models::{ChangeType, SpaceId};

    fn args() -> ReportArgs {
        ReportArgs {
            space_id: SpaceId(2),
            change_type: ChangeType::Pricing,
            current_info: None,
            corrected_info: Some("Day pass is now 20".to_string()),
            details: None,
            email: None,
        }
    }

    #[test]
    fn test_submission_body() {
        let body = submission(&args());
        assert_eq!(body["spaceId"], 2);
        assert_eq!(body["changeType"], "pricing");
        assert_eq!(body["correctedInfo"], "Day pass is now 20");
        assert!(body.get("currentInfo").is_none());
        assert!(ReportValidator::validate(&body).is_ok());
    }

    #[test]
    fn test_bad_email_fails_local_validation() {
        let mut args = args();
        args.email = Some("not-an-email".to_string());
        let errors = ReportValidator::validate(&submission(&args)).unwrap_err();
        assert!(errors.has_field("contactEmail"));
    }
}
