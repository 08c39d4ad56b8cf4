#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
use crate::core::config::{GeocodingConfig, MapConfig, StorageConfig, SubmissionConfig};
#[cfg(test)]
use crate::features::reports::{GeocodingService, ReportState, ReportStore, SubmissionService};
#[cfg(test)]
use crate::modules::storage::KeyValueStorage;

/// Report state over the given storage, with no submission delay and a
/// geocoder that never reaches the network
#[cfg(test)]
pub fn report_state(storage: Arc<dyn KeyValueStorage>, min_photos: usize) -> ReportState {
    let store = Arc::new(ReportStore::new(
        storage,
        StorageConfig::DEFAULT_REPORTS_KEY,
    ));
    let submission_service = Arc::new(SubmissionService::new(
        Arc::clone(&store),
        SubmissionConfig {
            min_photos,
            delay: Duration::ZERO,
        },
    ));
    let geocoding_service = Arc::new(
        GeocodingService::new(&GeocodingConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            country_codes: None,
            user_agent: "civic-report-desk-tests".to_string(),
        })
        .expect("geocoding client"),
    );

    ReportState {
        store,
        submission_service,
        geocoding_service,
        map: Arc::new(MapConfig::default()),
    }
}
