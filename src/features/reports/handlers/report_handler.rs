use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::reports::dtos::{GeocodeQueryDto, ReportResponseDto, UpdateReportStatusDto};
use crate::features::reports::handlers::ReportState;
use crate::features::reports::services::PlaceSuggestion;
use crate::shared::types::{ApiResponse, Meta};

/// List all reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "List of reports", body = ApiResponse<Vec<ReportResponseDto>>)
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = state.store.list_all().await;
    let total = reports.len() as i64;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get report by ID
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<ReportState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state
        .store
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Update report status (admin only)
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Status cannot move backwards")
    ),
    security(("basic_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_status(
    State(state): State<ReportState>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .store
        .update_status(id, dto.status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Search places for the map picker
#[utoipa::path(
    get,
    path = "/api/geocode",
    params(GeocodeQueryDto),
    responses(
        (status = 200, description = "Place suggestions", body = ApiResponse<Vec<PlaceSuggestion>>),
        (status = 502, description = "Geocoder unavailable")
    ),
    tag = "geocoding"
)]
pub async fn search_places(
    State(state): State<ReportState>,
    Query(query): Query<GeocodeQueryDto>,
) -> Result<Json<ApiResponse<Vec<PlaceSuggestion>>>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let suggestions = state.geocoding_service.search(&query.q).await?;
    Ok(Json(ApiResponse::success(Some(suggestions), None, None)))
}
