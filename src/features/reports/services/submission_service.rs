use chrono::Local;
use std::sync::Arc;
use thiserror::Error;

use crate::core::config::SubmissionConfig;
use crate::features::reports::models::{Location, NewReport, Photo, Report};
use crate::features::reports::services::image_encoder::encode_data_url;
use crate::features::reports::services::{ReportStore, StoreError};
use crate::shared::constants::PLACEHOLDER_IMAGE_URL;

/// Raw input of the report form
#[derive(Debug, Clone, Default)]
pub struct ReportSubmission {
    pub name: String,
    pub pincode: Option<String>,
    pub description: String,
    pub latitude: String,
    pub longitude: String,
    pub photos: Vec<Photo>,
}

/// Reasons a submission is refused before anything is stored
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a location on the map.")]
    MissingLocation,

    #[error("Please upload at least {required} {noun}.", noun = photo_noun(.required))]
    NotEnoughPhotos { required: usize, provided: usize },
}

fn photo_noun(count: &usize) -> &'static str {
    if *count == 1 {
        "photo"
    } else {
        "photos"
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validates form input, assembles the report and stores it
pub struct SubmissionService {
    store: Arc<ReportStore>,
    config: SubmissionConfig,
}

impl SubmissionService {
    pub fn new(store: Arc<ReportStore>, config: SubmissionConfig) -> Self {
        Self { store, config }
    }

    pub fn min_photos(&self) -> usize {
        self.config.min_photos
    }

    /// Checks run in order; the first failure wins.
    /// Text fields are accepted as-is, including empty strings.
    pub fn validate(&self, submission: &ReportSubmission) -> Result<(), ValidationError> {
        if submission.latitude.trim().is_empty() {
            return Err(ValidationError::MissingLocation);
        }

        if submission.photos.len() < self.config.min_photos {
            return Err(ValidationError::NotEnoughPhotos {
                required: self.config.min_photos,
                provided: submission.photos.len(),
            });
        }

        Ok(())
    }

    /// Validate, store, then hold the confirmation for the configured delay.
    ///
    /// The delay only paces user feedback; the report is already persisted
    /// when it starts.
    pub async fn submit(&self, submission: ReportSubmission) -> Result<Report, SubmitError> {
        self.validate(&submission)?;

        let image = submission
            .photos
            .first()
            .map(encode_photo)
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string());

        let new_report = NewReport {
            name: submission.name,
            pincode: submission.pincode.filter(|p| !p.trim().is_empty()),
            description: submission.description,
            location: Location::new(submission.latitude, submission.longitude),
            image,
        };

        let report = self.store.create(new_report, &Local::now()).await?;

        if !self.config.delay.is_zero() {
            tokio::time::sleep(self.config.delay).await;
        }

        tracing::info!(
            "Report {} submitted with {} photo(s)",
            report.id,
            submission.photos.len()
        );
        Ok(report)
    }
}

fn encode_photo(photo: &Photo) -> String {
    match encode_data_url(&photo.content_type, &photo.data) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Error converting image '{}': {}", photo.file_name, e);
            PLACEHOLDER_IMAGE_URL.to_string()
        }
    }
}
