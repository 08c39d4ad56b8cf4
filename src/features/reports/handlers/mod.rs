use std::sync::Arc;

use crate::core::config::MapConfig;
use crate::features::reports::services::{GeocodingService, ReportStore, SubmissionService};

pub mod page_handler;
pub mod report_handler;

pub use page_handler::*;
pub use report_handler::*;

/// State shared by every report handler, one instance per running app
#[derive(Clone)]
pub struct ReportState {
    pub store: Arc<ReportStore>,
    pub submission_service: Arc<SubmissionService>,
    pub geocoding_service: Arc<GeocodingService>,
    pub map: Arc<MapConfig>,
}
