// src/services/import_service_tests.rs
//
// UNIT TESTS: import pipeline contract
//
// PURPOSE:
// - Prove dedup: one stored record and one set of remote calls per barcode
// - Prove misses are never persisted and leave the barcode re-scannable
// - Prove lookup failures surface and persist nothing
// - Prove enrichment degradation never loses a resolved record

#[cfg(test)]
mod pipeline_tests {
    use std::sync::Arc;

    use crate::db::create_test_pool;
    use crate::domain::record::RecordStatus;
    use crate::domain::ScanEvent;
    use crate::error::AppError;
    use crate::events::EventBus;
    use crate::integrations::{
        AlbumMetadata, AlbumTrack, MockCatalogEnricher, MockMetadataResolver,
    };
    use crate::repositories::{RecordRepository, SqliteRecordRepository};
    use crate::services::{ImportService, ScanOutcome};

    const BARCODE: &str = "0601091975864";

    fn ok_computer() -> AlbumMetadata {
        AlbumMetadata {
            artist: "Radiohead".to_string(),
            title: "OK Computer".to_string(),
            cover_url: Some("https://coverartarchive.org/release/abc/front.jpg".to_string()),
            tracks: Some(vec![AlbumTrack {
                id: "t1".to_string(),
                name: "Airbag".to_string(),
                duration_ms: 284_000,
                track_number: 1,
            }]),
        }
    }

    fn passthrough_enricher() -> MockCatalogEnricher {
        let mut enricher = MockCatalogEnricher::new();
        enricher.expect_enrich().returning(|record| record);
        enricher
    }

    fn build_service(
        resolver: MockMetadataResolver,
        enricher: MockCatalogEnricher,
    ) -> (ImportService, Arc<dyn RecordRepository>, Arc<EventBus>) {
        let pool = Arc::new(create_test_pool());
        let repo: Arc<dyn RecordRepository> = Arc::new(SqliteRecordRepository::new(pool));
        let bus = Arc::new(EventBus::new());
        let service = ImportService::new(
            repo.clone(),
            Arc::new(resolver),
            Arc::new(enricher),
            bus.clone(),
        );
        (service, repo, bus)
    }

    fn scan(code: &str) -> ScanEvent {
        ScanEvent::new(code.to_string(), "ean_13".to_string())
    }

    #[tokio::test]
    async fn test_scan_resolves_and_persists_record() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_lookup_by_barcode()
            .withf(|barcode| barcode == BARCODE)
            .times(1)
            .returning(|_| Ok(Some(ok_computer())));

        let (service, repo, bus) = build_service(resolver, passthrough_enricher());

        let outcome = service.handle_scan(scan(BARCODE)).await.unwrap();

        let record = match outcome {
            ScanOutcome::Added(record) => record,
            other => panic!("expected Added, got {:?}", other),
        };
        assert_eq!(record.artist, "Radiohead");
        assert_eq!(record.title, "OK Computer");
        assert_eq!(record.status, RecordStatus::Found);
        assert_eq!(record.tracks.as_ref().unwrap().len(), 1);
        assert!(record.cover_url.is_some());

        assert_eq!(repo.count().unwrap(), 1);
        let stored = repo.get_by_barcode(BARCODE).unwrap().unwrap();
        assert_eq!(stored.id, record.id);

        let log = bus.get_event_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].event_type, "RecordAdded");
    }

    #[tokio::test]
    async fn test_second_scan_of_same_barcode_is_duplicate() {
        let mut resolver = MockMetadataResolver::new();
        // Exactly one remote lookup for two scans of the same barcode
        resolver
            .expect_lookup_by_barcode()
            .times(1)
            .returning(|_| Ok(Some(ok_computer())));

        let (service, repo, bus) = build_service(resolver, passthrough_enricher());

        service.handle_scan(scan(BARCODE)).await.unwrap();
        let outcome = service.handle_scan(scan(BARCODE)).await.unwrap();

        assert!(matches!(outcome, ScanOutcome::Duplicate));
        assert_eq!(repo.count().unwrap(), 1);

        let log = bus.get_event_log();
        assert_eq!(log.last().unwrap().event_type, "DuplicateScanDetected");
    }

    #[tokio::test]
    async fn test_lookup_miss_is_not_persisted() {
        let mut resolver = MockMetadataResolver::new();
        // The miss must not mark the barcode as scanned: a retry reaches
        // the resolver again
        resolver
            .expect_lookup_by_barcode()
            .withf(|barcode| barcode == "000000000000")
            .times(2)
            .returning(|_| Ok(None));

        let mut enricher = MockCatalogEnricher::new();
        enricher.expect_enrich().never();

        let (service, repo, bus) = build_service(resolver, enricher);

        let outcome = service.handle_scan(scan("000000000000")).await.unwrap();
        assert!(matches!(outcome, ScanOutcome::NotFound));
        assert_eq!(repo.count().unwrap(), 0);
        assert!(!repo.is_duplicate("000000000000").unwrap());

        let outcome = service.handle_scan(scan("000000000000")).await.unwrap();
        assert!(matches!(outcome, ScanOutcome::NotFound));
        assert_eq!(repo.count().unwrap(), 0);

        let log = bus.get_event_log();
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|entry| entry.event_type == "LookupMissed"));
    }

    #[tokio::test]
    async fn test_lookup_failure_surfaces_and_persists_nothing() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_lookup_by_barcode()
            .times(1)
            .returning(|_| Err(AppError::Lookup("registry unreachable".to_string())));

        let mut enricher = MockCatalogEnricher::new();
        enricher.expect_enrich().never();

        let (service, repo, bus) = build_service(resolver, enricher);

        let result = service.handle_scan(scan(BARCODE)).await;
        assert!(matches!(result, Err(AppError::Lookup(_))));
        assert_eq!(repo.count().unwrap(), 0);

        let log = bus.get_event_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].event_type, "LookupFailed");
    }

    #[tokio::test]
    async fn test_failed_run_releases_barcode_for_retry() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_lookup_by_barcode()
            .times(1)
            .returning(|_| Err(AppError::Lookup("registry unreachable".to_string())));
        resolver
            .expect_lookup_by_barcode()
            .times(1)
            .returning(|_| Ok(Some(ok_computer())));

        let (service, repo, _bus) = build_service(resolver, passthrough_enricher());

        assert!(service.handle_scan(scan(BARCODE)).await.is_err());

        let outcome = service.handle_scan(scan(BARCODE)).await.unwrap();
        assert!(matches!(outcome, ScanOutcome::Added(_)));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_enrichment_degradation_keeps_resolved_record() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_lookup_by_barcode()
            .times(1)
            .returning(|_| Ok(Some(ok_computer())));

        // Enricher that had no session / failed internally: record unchanged
        let (service, repo, _bus) = build_service(resolver, passthrough_enricher());

        let outcome = service.handle_scan(scan(BARCODE)).await.unwrap();

        let record = match outcome {
            ScanOutcome::Added(record) => record,
            other => panic!("expected Added, got {:?}", other),
        };
        assert_eq!(record.status, RecordStatus::Found);
        assert!(record.catalog_uri.is_none());

        let stored = repo.get_by_barcode(BARCODE).unwrap().unwrap();
        assert_eq!(stored.status, RecordStatus::Found);
        assert!(stored.catalog_uri.is_none());
    }

    #[tokio::test]
    async fn test_enrichment_attaches_catalog_fields() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_lookup_by_barcode()
            .times(1)
            .returning(|_| Ok(Some(ok_computer())));

        let mut enricher = MockCatalogEnricher::new();
        enricher.expect_enrich().times(1).returning(|record| {
            record.with_catalog(
                "spotify:album:6dVIqQ8qmQ5GBnJ9shOYGE".to_string(),
                "6dVIqQ8qmQ5GBnJ9shOYGE".to_string(),
            )
        });

        let (service, repo, _bus) = build_service(resolver, enricher);

        service.handle_scan(scan(BARCODE)).await.unwrap();

        let stored = repo.get_by_barcode(BARCODE).unwrap().unwrap();
        assert_eq!(
            stored.catalog_uri.as_deref(),
            Some("spotify:album:6dVIqQ8qmQ5GBnJ9shOYGE")
        );
        assert_eq!(stored.catalog_id.as_deref(), Some("6dVIqQ8qmQ5GBnJ9shOYGE"));
        // Enrichment only populates catalog fields; status is untouched
        assert_eq!(stored.status, RecordStatus::Found);
    }
}
