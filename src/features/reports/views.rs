//! HTML projections of the report collection.
//!
//! Every free-text value reaches the page through an auto-escaping template,
//! and image sources are passed through [`safe_image_src`] first.

use serde::Serialize;

use crate::core::config::MapConfig;
use crate::features::reports::models::Report;
use crate::features::reports::services::image_encoder::safe_image_src;
use crate::features::reports::services::ReportSubmission;
use crate::shared::templates::{render_page, TemplateError};

#[derive(Debug, Serialize)]
pub struct ReportCardView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: &'static str,
    pub is_pending: bool,
    pub date: String,
    pub location: Option<String>,
    pub image: String,
}

impl From<&Report> for ReportCardView {
    fn from(r: &Report) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            description: r.description.clone(),
            status: r.status.label(),
            is_pending: r.is_pending(),
            date: r.date_label().to_string(),
            location: r.location.display(),
            image: safe_image_src(&r.image).to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MapView<'a> {
    enabled: bool,
    tile_url: &'a str,
    attribution: &'a str,
    center_lat: f64,
    center_lng: f64,
    zoom: u8,
}

impl<'a> From<&'a MapConfig> for MapView<'a> {
    fn from(m: &'a MapConfig) -> Self {
        Self {
            enabled: m.is_enabled(),
            tile_url: m.tile_url.as_deref().unwrap_or_default(),
            attribution: &m.attribution,
            center_lat: m.center_lat,
            center_lng: m.center_lng,
            zoom: m.zoom,
        }
    }
}

/// Text values to put back into the form after a refused submission
#[derive(Debug, Default, Serialize)]
pub struct FormValues {
    pub name: String,
    pub pincode: String,
    pub description: String,
    pub latitude: String,
    pub longitude: String,
}

impl From<&ReportSubmission> for FormValues {
    fn from(s: &ReportSubmission) -> Self {
        Self {
            name: s.name.clone(),
            pincode: s.pincode.clone().unwrap_or_default(),
            description: s.description.clone(),
            latitude: s.latitude.clone(),
            longitude: s.longitude.clone(),
        }
    }
}

#[derive(Serialize)]
struct FormPage<'a> {
    map: MapView<'a>,
    min_photos: usize,
    alert: Option<&'a str>,
    values: &'a FormValues,
}

/// The report form, optionally with a blocking alert and previous input
pub fn render_report_form(
    map: &MapConfig,
    min_photos: usize,
    alert: Option<&str>,
    values: &FormValues,
) -> Result<String, TemplateError> {
    render_page(
        "report_form.html",
        FormPage {
            map: MapView::from(map),
            min_photos,
            alert,
            values,
        },
    )
}

#[derive(Serialize)]
struct SubmittedPage {
    report: ReportCardView,
}

/// Confirmation shown once a report has been stored
pub fn render_submitted(report: &Report) -> Result<String, TemplateError> {
    render_page(
        "submitted.html",
        SubmittedPage {
            report: ReportCardView::from(report),
        },
    )
}

#[derive(Serialize)]
struct ListingPage {
    reports: Vec<ReportCardView>,
    load_failed: bool,
}

/// Public dashboard of all reports, newest first
pub fn render_user_reports(reports: &[Report]) -> Result<String, TemplateError> {
    render_page(
        "reports.html",
        ListingPage {
            reports: reports.iter().map(ReportCardView::from).collect(),
            load_failed: false,
        },
    )
}

/// What the admin listing could read from the store
pub enum AdminListing<'a> {
    Loaded(&'a [Report]),
    LoadFailed,
}

/// Admin listing with a resolve action per pending report
pub fn render_admin_reports(listing: AdminListing<'_>) -> Result<String, TemplateError> {
    let page = match listing {
        AdminListing::Loaded(reports) => ListingPage {
            reports: reports.iter().map(ReportCardView::from).collect(),
            load_failed: false,
        },
        AdminListing::LoadFailed => ListingPage {
            reports: Vec::new(),
            load_failed: true,
        },
    };
    render_page("admin_reports.html", page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{Location, ReportStatus};
    use crate::shared::constants::PLACEHOLDER_IMAGE_URL;

    fn report(id: i64, status: ReportStatus) -> Report {
        Report {
            id,
            name: "Dadar market".to_string(),
            pincode: None,
            description: "Broken footpath".to_string(),
            location: Location::new("19.0178", "72.8478"),
            date: "10/19/2026, 8:15:00 AM".to_string(),
            status,
            image: "data:image/png;base64,iVBORw==".to_string(),
        }
    }

    #[test]
    fn test_markup_in_text_is_escaped() {
        let mut hostile = report(1, ReportStatus::PendingReview);
        hostile.name = "<script>alert('pwned')</script>".to_string();
        hostile.description = "<img src=x onerror=alert(1)>".to_string();

        let user = render_user_reports(std::slice::from_ref(&hostile)).unwrap();
        let admin = render_admin_reports(AdminListing::Loaded(&[hostile])).unwrap();

        for html in [user, admin] {
            assert!(!html.contains("<script>alert"));
            assert!(!html.contains("<img src=x"));
            assert!(html.contains("&lt;script&gt;"));
        }
    }

    #[test]
    fn test_unsafe_image_source_is_replaced() {
        let mut r = report(1, ReportStatus::PendingReview);
        r.image = "javascript:alert(1)".to_string();

        let html = render_user_reports(&[r]).unwrap();
        assert!(!html.contains("javascript:"));
        assert!(html.contains("via.placeholder.com"));
        assert!(PLACEHOLDER_IMAGE_URL.contains("via.placeholder.com"));
    }

    #[test]
    fn test_empty_user_listing() {
        let html = render_user_reports(&[]).unwrap();
        assert!(html.contains("No reports submitted yet."));
    }

    #[test]
    fn test_user_listing_shows_date_part_and_status() {
        let html = render_user_reports(&[report(1, ReportStatus::PendingReview)]).unwrap();
        // slashes come out entity-encoded, so match on the year
        assert!(html.contains("2026"));
        assert!(!html.contains("8:15:00 AM"));
        assert!(html.contains("Pending Review"));
    }

    #[test]
    fn test_admin_listing_states() {
        let empty = render_admin_reports(AdminListing::Loaded(&[])).unwrap();
        assert!(empty.contains("No reports found."));

        let failed = render_admin_reports(AdminListing::LoadFailed).unwrap();
        assert!(failed.contains("Error loading reports."));
        assert!(!failed.contains("No reports found."));
    }

    #[test]
    fn test_admin_resolve_control_follows_status() {
        let pending = render_admin_reports(AdminListing::Loaded(&[report(
            12345,
            ReportStatus::PendingReview,
        )]))
        .unwrap();
        assert!(pending.contains("action=\"/admin/reports/12345/resolve\""));

        let resolved = render_admin_reports(AdminListing::Loaded(&[report(
            12345,
            ReportStatus::Resolved,
        )]))
        .unwrap();
        assert!(!resolved.contains("/admin/reports/12345/resolve"));
        assert!(resolved.contains("disabled"));
    }

    #[test]
    fn test_form_renders_map_or_fallback() {
        let values = FormValues::default();

        let with_map = render_report_form(&MapConfig::default(), 1, None, &values).unwrap();
        assert!(with_map.contains("id=\"map\""));

        let without = MapConfig {
            tile_url: None,
            ..MapConfig::default()
        };
        let html = render_report_form(&without, 1, None, &values).unwrap();
        assert!(html.contains("Map is unavailable"));
        assert!(!html.contains("id=\"map\""));
        assert!(html.contains("name=\"description\""));
    }

    #[test]
    fn test_form_alert_and_values_are_escaped() {
        let values = FormValues {
            name: "\"><b>x</b>".to_string(),
            ..FormValues::default()
        };
        let html = render_report_form(
            &MapConfig::default(),
            2,
            Some("Please upload at least 2 photos."),
            &values,
        )
        .unwrap();

        assert!(html.contains("Please upload at least 2 photos."));
        assert!(!html.contains("\"><b>x</b>"));
    }
}
