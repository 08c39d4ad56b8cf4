use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};

/// Create public routes for the reports feature
///
/// `body_limit` caps the multipart submission, photos included
pub fn routes(state: ReportState, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(handlers::report_form))
        .route(
            "/reports",
            get(handlers::user_reports)
                .post(handlers::submit_report)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/reports/{id}", get(handlers::get_report))
        .route("/api/geocode", get(handlers::search_places))
        .with_state(state)
}

/// Create admin routes for the reports feature
///
/// Basic auth is applied by the caller when admin credentials are configured
pub fn admin_routes(state: ReportState) -> Router {
    Router::new()
        .route("/admin", get(handlers::admin_reports))
        .route(
            "/admin/reports/{id}/resolve",
            post(handlers::resolve_report),
        )
        .route(
            "/api/reports/{id}/status",
            patch(handlers::update_report_status),
        )
        .with_state(state)
}
