use chrono::{DateTime, TimeZone};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::features::reports::models::{NewReport, Report, ReportStatus};
use crate::modules::storage::{KeyValueStorage, StorageError};

/// Errors raised by the report store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Stored report collection is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("Failed to serialize report collection: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Report {id} cannot move from '{from}' to '{to}'")]
    InvalidTransition {
        id: i64,
        from: ReportStatus,
        to: ReportStatus,
    },

    #[error("Report {0} already exists")]
    DuplicateId(i64),
}

/// Durable, newest-first collection of reports under a single storage key
///
/// Every mutation reads the whole collection, changes it and writes it back.
/// Mutations within this process are serialized; separate processes sharing
/// the same storage race with last-write-wins.
pub struct ReportStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    write_lock: Mutex<()>,
}

impl ReportStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Strict read: an absent or blank value is an empty collection, but
    /// unparsable data is reported as `StoreError::Corrupt`.
    pub async fn load(&self) -> Result<Vec<Report>, StoreError> {
        let Some(raw) = self.storage.get(&self.key).await? else {
            return Ok(Vec::new());
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(StoreError::Corrupt)
    }

    /// Lenient read: any failure is logged and yields an empty collection.
    pub async fn list_all(&self) -> Vec<Report> {
        match self.load().await {
            Ok(reports) => reports,
            Err(e) => {
                tracing::warn!("Treating report collection as empty: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get(&self, id: i64) -> Option<Report> {
        self.list_all().await.into_iter().find(|r| r.id == id)
    }

    /// Prepend `report` and persist the whole collection.
    ///
    /// A corrupt collection is never overwritten, and a failed write leaves
    /// the previously persisted collection in place.
    pub async fn add(&self, report: Report) -> Result<Report, StoreError> {
        let _guard = self.write_lock.lock().await;
        let reports = self.load().await?;
        self.prepend(reports, report).await
    }

    /// Assign a fresh id and creation date to `new` and add it.
    pub async fn create<Tz: TimeZone>(
        &self,
        new: NewReport,
        now: &DateTime<Tz>,
    ) -> Result<Report, StoreError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let _guard = self.write_lock.lock().await;
        let reports = self.load().await?;
        let id = Self::next_id(&reports, now.timestamp_millis());
        self.prepend(reports, new.into_report(id, now)).await
    }

    /// Set the status of the report with `id`.
    ///
    /// Returns `None` (and writes nothing) when no such report exists.
    /// Setting the status a report already has is a no-op.
    pub async fn update_status(
        &self,
        id: i64,
        new_status: ReportStatus,
    ) -> Result<Option<Report>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut reports = self.load().await?;

        let Some(report) = reports.iter_mut().find(|r| r.id == id) else {
            tracing::debug!("Status update for unknown report {}", id);
            return Ok(None);
        };

        if report.status == new_status {
            return Ok(Some(report.clone()));
        }

        if !report.status.can_transition_to(new_status) {
            return Err(StoreError::InvalidTransition {
                id,
                from: report.status,
                to: new_status,
            });
        }

        report.status = new_status;
        let updated = report.clone();
        self.persist(&reports).await?;

        tracing::info!("Report {} status set to '{}'", id, new_status);
        Ok(Some(updated))
    }

    /// Creation time in milliseconds, bumped past the newest existing id
    pub fn next_id(reports: &[Report], now_ms: i64) -> i64 {
        reports
            .iter()
            .map(|r| r.id)
            .max()
            .map_or(now_ms, |max| now_ms.max(max + 1))
    }

    async fn prepend(&self, mut reports: Vec<Report>, report: Report) -> Result<Report, StoreError> {
        if reports.iter().any(|r| r.id == report.id) {
            return Err(StoreError::DuplicateId(report.id));
        }

        reports.insert(0, report);
        self.persist(&reports).await?;

        tracing::info!(
            "Added report {} ({} reports stored)",
            reports[0].id,
            reports.len()
        );
        Ok(reports.swap_remove(0))
    }

    async fn persist(&self, reports: &[Report]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(reports).map_err(StoreError::Serialize)?;
        self.storage.set(&self.key, &raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::Location;
    use crate::modules::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;
    use tokio_test::{assert_err, assert_ok};

    const KEY: &str = "bmc_reports";

    fn store_over(storage: Arc<dyn KeyValueStorage>) -> ReportStore {
        ReportStore::new(storage, KEY)
    }

    fn report(id: i64, status: ReportStatus) -> Report {
        Report {
            id,
            name: "Garbage pile".to_string(),
            pincode: None,
            description: Sentence(3..8).fake(),
            location: Location::new("19.0760", "72.8777"),
            date: "10/19/2026, 9:00:00 AM".to_string(),
            status,
            image: "data:image/jpeg;base64,/9j/4AAQ".to_string(),
        }
    }

    fn new_report(name: &str) -> NewReport {
        NewReport {
            name: name.to_string(),
            pincode: Some("400001".to_string()),
            description: "Overflowing drain".to_string(),
            location: Location::new("18.94", "72.83"),
            image: "data:image/png;base64,iVBORw0KGgo=".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_storage_lists_nothing() {
        let store = store_over(Arc::new(MemoryStorage::new()));

        assert!(store.load().await.unwrap().is_empty());
        assert!(store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_value_is_empty_collection() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(KEY, "").await.unwrap();
        let store = store_over(storage);

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_collection_is_distinguishable() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(KEY, "[{\"id\": 1,").await.unwrap();
        let store = store_over(storage);

        assert!(matches!(store.load().await, Err(StoreError::Corrupt(_))));
        assert!(store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_prepends_and_round_trips() {
        let store = store_over(Arc::new(MemoryStorage::new()));
        let older = report(1, ReportStatus::PendingReview);
        let mut newer = report(2, ReportStatus::PendingReview);
        newer.pincode = Some("400050".to_string());
        newer.name = "<script>alert('x')</script> & co".to_string();

        store.add(older.clone()).await.unwrap();
        store.add(newer.clone()).await.unwrap();

        let reports = store.list_all().await;
        assert_eq!(reports, vec![newer, older]);
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_id() {
        let store = store_over(Arc::new(MemoryStorage::new()));
        assert_ok!(store.add(report(7, ReportStatus::PendingReview)).await);

        let err = assert_err!(store.add(report(7, ReportStatus::PendingReview)).await);
        assert!(matches!(err, StoreError::DuplicateId(7)));
        assert_eq!(store.list_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_does_not_overwrite_corrupt_collection() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(KEY, "not json").await.unwrap();
        let store = store_over(storage.clone());

        let err = store
            .add(report(1, ReportStatus::PendingReview))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Corrupt(_)));
        assert_eq!(storage.get(KEY).await.unwrap().as_deref(), Some("not json"));
    }

    #[tokio::test]
    async fn test_quota_failure_leaves_collection_unchanged() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::with_quota(700));
        let store = store_over(storage);
        let first = report(1, ReportStatus::PendingReview);
        store.add(first.clone()).await.unwrap();

        let mut huge = report(2, ReportStatus::PendingReview);
        huge.image = format!("data:image/png;base64,{}", "A".repeat(4096));
        let err = store.add(huge).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Storage(StorageError::QuotaExceeded { .. })
        ));
        assert_eq!(store.list_all().await, vec![first]);
    }

    #[tokio::test]
    async fn test_create_assigns_strictly_increasing_ids() {
        let store = store_over(Arc::new(MemoryStorage::new()));
        let now = Utc.timestamp_millis_opt(1_760_000_000_000).unwrap();

        let first = store.create(new_report("first"), &now).await.unwrap();
        let second = store.create(new_report("second"), &now).await.unwrap();

        assert_eq!(first.id, 1_760_000_000_000);
        assert!(second.id > first.id);
        assert_eq!(second.status, ReportStatus::PendingReview);

        let ids: Vec<i64> = store.list_all().await.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_next_id_survives_clock_going_back() {
        let existing = vec![report(5_000, ReportStatus::Resolved)];
        assert_eq!(ReportStore::next_id(&existing, 4_000), 5_001);
        assert_eq!(ReportStore::next_id(&existing, 9_000), 9_000);
        assert_eq!(ReportStore::next_id(&[], 123), 123);
    }

    #[tokio::test]
    async fn test_resolve_pending_report() {
        let store = store_over(Arc::new(MemoryStorage::new()));
        store
            .add(report(12345, ReportStatus::PendingReview))
            .await
            .unwrap();

        let updated = store
            .update_status(12345, ReportStatus::Resolved)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, ReportStatus::Resolved);
        assert_eq!(
            store.get(12345).await.unwrap().status,
            ReportStatus::Resolved
        );
    }

    #[tokio::test]
    async fn test_update_status_is_idempotent() {
        let store = store_over(Arc::new(MemoryStorage::new()));
        store
            .add(report(1, ReportStatus::PendingReview))
            .await
            .unwrap();
        store
            .add(report(2, ReportStatus::PendingReview))
            .await
            .unwrap();

        store.update_status(1, ReportStatus::Resolved).await.unwrap();
        let once = store.list_all().await;
        store.update_status(1, ReportStatus::Resolved).await.unwrap();

        assert_eq!(store.list_all().await, once);
    }

    #[tokio::test]
    async fn test_update_unknown_id_changes_nothing() {
        let store = store_over(Arc::new(MemoryStorage::new()));
        store
            .add(report(1, ReportStatus::PendingReview))
            .await
            .unwrap();
        let before = store.list_all().await;

        let result = store.update_status(999, ReportStatus::Resolved).await;

        assert!(matches!(result, Ok(None)));
        assert_eq!(store.list_all().await, before);
    }

    #[tokio::test]
    async fn test_reverse_transition_is_rejected() {
        let store = store_over(Arc::new(MemoryStorage::new()));
        store.add(report(1, ReportStatus::Resolved)).await.unwrap();

        let err = store
            .update_status(1, ReportStatus::PendingReview)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidTransition { id: 1, .. }));
        assert_eq!(store.get(1).await.unwrap().status, ReportStatus::Resolved);
    }

    #[tokio::test]
    async fn test_concurrent_creates_keep_every_report() {
        let store = Arc::new(store_over(Arc::new(MemoryStorage::new())));
        let now = Utc.timestamp_millis_opt(1_000).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create(new_report(&format!("report {}", i)), &now)
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut ids: Vec<i64> = store.list_all().await.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 8);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }
}
