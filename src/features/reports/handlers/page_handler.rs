use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::reports::handlers::ReportState;
use crate::features::reports::models::{Photo, ReportStatus};
use crate::features::reports::services::{ReportSubmission, StoreError, SubmitError};
use crate::features::reports::views::{self, AdminListing, FormValues};
use crate::modules::storage::StorageError;
use crate::shared::templates::TemplateError;

fn template_error(e: TemplateError) -> AppError {
    AppError::Internal(format!("Failed to render page: {}", e))
}

/// Report form with map picker
pub async fn report_form(State(state): State<ReportState>) -> Result<Html<String>> {
    let html = views::render_report_form(
        &state.map,
        state.submission_service.min_photos(),
        None,
        &FormValues::default(),
    )
    .map_err(template_error)?;
    Ok(Html(html))
}

/// Submit a report
///
/// Accepts multipart/form-data with text fields `name`, `pincode`,
/// `description`, `latitude`, `longitude` and one or more `photos` files.
/// A refused submission re-renders the form with an alert.
pub async fn submit_report(
    State(state): State<ReportState>,
    multipart: Multipart,
) -> Result<Response> {
    let submission = read_submission(multipart).await?;
    let values = FormValues::from(&submission);

    let (status, alert) = match state.submission_service.submit(submission).await {
        Ok(report) => {
            let html = views::render_submitted(&report).map_err(template_error)?;
            return Ok(Html(html).into_response());
        }
        Err(SubmitError::Validation(e)) => {
            debug!("Submission refused: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(SubmitError::Store(e)) => {
            tracing::error!("Failed to store report: {}", e);
            (AppError::store_status(&e), store_alert(&e).to_string())
        }
    };

    let html = views::render_report_form(
        &state.map,
        state.submission_service.min_photos(),
        Some(alert.as_str()),
        &values,
    )
    .map_err(template_error)?;
    Ok((status, Html(html)).into_response())
}

fn store_alert(err: &StoreError) -> &'static str {
    match err {
        StoreError::Storage(StorageError::QuotaExceeded { .. }) => {
            "Could not save your report: storage is full. Try a smaller photo."
        }
        _ => "Could not save your report. Please try again.",
    }
}

async fn read_submission(mut multipart: Multipart) -> Result<ReportSubmission> {
    let mut submission = ReportSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "photos" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read photo bytes: {}", e);
                AppError::BadRequest(format!("Failed to read photo data: {}", e))
            })?;

            // An empty file input still posts one nameless, empty part
            if file_name.is_empty() && data.is_empty() {
                continue;
            }

            submission.photos.push(Photo {
                file_name,
                content_type,
                data: data.to_vec(),
            });
            continue;
        }

        let text = field.text().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read {} field: {}", field_name, e))
        })?;

        match field_name.as_str() {
            "name" => submission.name = text,
            "pincode" => submission.pincode = Some(text),
            "description" => submission.description = text,
            "latitude" => submission.latitude = text,
            "longitude" => submission.longitude = text,
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    Ok(submission)
}

/// Public dashboard
pub async fn user_reports(State(state): State<ReportState>) -> Result<Html<String>> {
    let reports = state.store.list_all().await;
    let html = views::render_user_reports(&reports).map_err(template_error)?;
    Ok(Html(html))
}

/// Admin listing; a corrupt collection shows an error instead of an empty list
pub async fn admin_reports(State(state): State<ReportState>) -> Result<Response> {
    let response = match state.store.load().await {
        Ok(reports) => {
            let html = views::render_admin_reports(AdminListing::Loaded(&reports))
                .map_err(template_error)?;
            Html(html).into_response()
        }
        Err(e) => {
            tracing::error!("Error loading reports for admin view: {}", e);
            let html = views::render_admin_reports(AdminListing::LoadFailed)
                .map_err(template_error)?;
            (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
        }
    };
    Ok(response)
}

/// Resolve a pending report and return to the admin listing
pub async fn resolve_report(
    State(state): State<ReportState>,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    if state
        .store
        .update_status(id, ReportStatus::Resolved)
        .await?
        .is_none()
    {
        debug!("Resolve requested for unknown report {}", id);
    }
    Ok(Redirect::to("/admin"))
}
