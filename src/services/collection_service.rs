// src/services/collection_service.rs

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::CollectionRecord;
use crate::error::{AppError, AppResult};
use crate::events::{CollectionCleared, EventBus, RecordDeleted};
use crate::export;
use crate::repositories::RecordRepository;

/// Read/maintenance surface over the stored collection: listing, deletion,
/// bulk clear and the pure export transforms applied to current contents.
pub struct CollectionService {
    record_repo: Arc<dyn RecordRepository>,
    event_bus: Arc<EventBus>,
}

impl CollectionService {
    pub fn new(record_repo: Arc<dyn RecordRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            record_repo,
            event_bus,
        }
    }

    /// All records, most recently scanned first
    pub fn list_records(&self) -> AppResult<Vec<CollectionRecord>> {
        self.record_repo.list_all()
    }

    pub fn count(&self) -> AppResult<u64> {
        self.record_repo.count()
    }

    pub fn delete_record(&self, id: Uuid) -> AppResult<()> {
        if self.record_repo.get_by_id(id)?.is_none() {
            return Err(AppError::NotFound);
        }

        self.record_repo.delete(id)?;
        self.event_bus.emit(RecordDeleted::new(id));
        Ok(())
    }

    pub fn clear(&self) -> AppResult<()> {
        let removed = self.record_repo.count()?;
        self.record_repo.clear()?;
        self.event_bus.emit(CollectionCleared::new(removed));
        Ok(())
    }

    /// Current collection as delimited text
    pub fn export_csv(&self) -> AppResult<String> {
        Ok(export::to_csv(&self.record_repo.list_all()?))
    }

    /// Current collection as playlist text.
    /// Errors with NoPlayableEntries when no record carries a catalog URI.
    pub fn export_m3u(&self) -> AppResult<String> {
        export::to_m3u(&self.record_repo.list_all()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::repositories::SqliteRecordRepository;

    fn service() -> (CollectionService, Arc<dyn RecordRepository>, Arc<EventBus>) {
        let pool = Arc::new(create_test_pool());
        let repo: Arc<dyn RecordRepository> = Arc::new(SqliteRecordRepository::new(pool));
        let bus = Arc::new(EventBus::new());
        (CollectionService::new(repo.clone(), bus.clone()), repo, bus)
    }

    fn sample(barcode: &str) -> CollectionRecord {
        CollectionRecord::resolved(
            barcode.to_string(),
            "Radiohead".to_string(),
            "OK Computer".to_string(),
        )
    }

    #[test]
    fn test_delete_missing_record_is_not_found() {
        let (service, _, _) = service();
        assert!(matches!(
            service.delete_record(Uuid::new_v4()),
            Err(AppError::NotFound)
        ));
    }

    #[test]
    fn test_delete_emits_event() {
        let (service, repo, bus) = service();
        let record = sample("0601091975864");
        repo.save(&record).unwrap();

        service.delete_record(record.id).unwrap();

        assert_eq!(repo.count().unwrap(), 0);
        assert_eq!(bus.get_event_log()[0].event_type, "RecordDeleted");
    }

    #[test]
    fn test_clear_reports_removed_count() {
        let (service, repo, bus) = service();
        repo.save(&sample("111111111111")).unwrap();
        repo.save(&sample("222222222222")).unwrap();

        service.clear().unwrap();

        assert_eq!(repo.count().unwrap(), 0);
        assert_eq!(bus.get_event_log()[0].event_type, "CollectionCleared");
    }

    #[test]
    fn test_export_m3u_without_playable_records() {
        let (service, repo, _) = service();
        repo.save(&sample("0601091975864")).unwrap();

        assert!(matches!(
            service.export_m3u(),
            Err(AppError::NoPlayableEntries)
        ));
    }
}
