mod geocoding_service;
pub mod image_encoder;
mod report_store;
mod submission_service;

pub use geocoding_service::{GeocodingService, PlaceSuggestion};
pub use report_store::{ReportStore, StoreError};
pub use submission_service::{ReportSubmission, SubmissionService, SubmitError};
