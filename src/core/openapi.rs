use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
    services as reports_services,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::report_handler::list_reports,
        reports_handlers::report_handler::get_report,
        reports_handlers::report_handler::update_report_status,
        // Geocoding
        reports_handlers::report_handler::search_places,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Reports
            reports_models::ReportStatus,
            reports_models::Location,
            reports_dtos::UpdateReportStatusDto,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportResponseDto>,
            // Geocoding
            ApiResponse<Vec<reports_services::PlaceSuggestion>>,
        )
    ),
    tags(
        (name = "reports", description = "Citizen issue reports"),
        (name = "geocoding", description = "Place search for the map picker"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Civic Report Desk API",
        version = "0.1.0",
        description = "API documentation for Civic Report Desk",
    )
)]
pub struct ApiDoc;

/// Adds the admin basic auth security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
