use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::reports::models::{Location, Report, ReportStatus};

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: i64,
    pub name: String,
    pub pincode: Option<String>,
    pub description: String,
    pub location: Location,
    pub date: String,
    pub status: ReportStatus,
    pub image: String,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            name: r.name,
            pincode: r.pincode,
            description: r.description,
            location: r.location,
            date: r.date,
            status: r.status,
            image: r.image,
        }
    }
}

/// Request DTO for updating report status
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
}

/// Query parameters for place search
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct GeocodeQueryDto {
    /// Free-text place query; fewer than 3 characters returns no suggestions
    #[serde(default)]
    #[validate(length(max = 200, message = "q must be at most 200 characters"))]
    pub q: String,
}
