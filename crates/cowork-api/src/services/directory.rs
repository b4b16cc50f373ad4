use cowork_core::error::CoworkError;
use cowork_core::models::{Report, SpaceDetail, SpaceId};
use cowork_core::query::SpaceQuery;
use cowork_core::validation::ReportValidator;
use serde_json::Value;

use crate::dto::SpaceListResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Directory operations that combine several store calls
pub struct DirectoryService;

impl DirectoryService {
    /// List spaces for decoded query-string pairs
    pub async fn list_spaces(
        state: &AppState,
        params: Vec<(String, String)>,
    ) -> Result<SpaceListResponse, ApiError> {
        let query = SpaceQuery::from_params(params)?;
        let page = state.store.list_spaces(&query).await?;

        tracing::debug!(
            matched = page.total,
            returned = page.spaces.len(),
            bounded = query.bounds.is_some(),
            "Listed spaces"
        );
        Ok(SpaceListResponse::from_page(page, query.is_paginated()))
    }

    /// A space with pricing and its services resolved against the catalog
    pub async fn get_space(state: &AppState, id: SpaceId) -> Result<SpaceDetail, ApiError> {
        let space = state
            .store
            .get_space(id)
            .await?
            .ok_or(CoworkError::SpaceNotFound { id: id.0 })?;
        let catalog = state.store.list_services().await?;
        Ok(SpaceDetail::resolve(space, &catalog))
    }

    /// Validate a report body, check the space and store the report
    pub async fn submit_report(state: &AppState, body: &Value) -> Result<Report, ApiError> {
        let submission = ReportValidator::validate(body)?;

        if state.store.get_space(submission.space_id).await?.is_none() {
            return Err(CoworkError::SpaceNotFound { id: submission.space_id.0 }.into());
        }

        let report = state.store.create_report(submission).await?;
        tracing::info!(
            report_id = %report.id,
            space_id = %report.space_id,
            change_type = %report.change_type,
            "Report submitted"
        );
        Ok(report)
    }
}
