// src/services/import_service.rs
//
// The scan-to-record pipeline:
//
//   decode event → duplicate check → rate-limited metadata resolution
//                → best-effort catalog enrichment → persistence → event out
//
// Failure asymmetry, by contract: metadata resolution is required for a
// record to exist at all and fails the run; enrichment is an enhancement
// and never aborts the pipeline.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::domain::record::{CollectionRecord, Track};
use crate::domain::{validate_record, ScanEvent};
use crate::error::{AppError, AppResult};
use crate::events::{
    DuplicateScanDetected, EventBus, LookupFailed, LookupMissed, RecordAdded,
};
use crate::integrations::{AlbumMetadata, CatalogEnricher, MetadataResolver};
use crate::repositories::RecordRepository;

/// What a single scan produced.
/// `Duplicate` and `NotFound` are informational outcomes, not errors:
/// they stop the pipeline without creating a record.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    Added(CollectionRecord),
    Duplicate,
    NotFound,
}

pub struct ImportService {
    record_repo: Arc<dyn RecordRepository>,
    resolver: Arc<dyn MetadataResolver>,
    enricher: Arc<dyn CatalogEnricher>,
    event_bus: Arc<EventBus>,
    /// Barcodes with a pipeline run currently in flight. Closes the window
    /// where two near-simultaneous scans of the same barcode both pass the
    /// store-backed duplicate check before either persists.
    in_flight: Mutex<HashSet<String>>,
}

impl ImportService {
    pub fn new(
        record_repo: Arc<dyn RecordRepository>,
        resolver: Arc<dyn MetadataResolver>,
        enricher: Arc<dyn CatalogEnricher>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            record_repo,
            resolver,
            enricher,
            event_bus,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Run the full pipeline for one decoded barcode.
    ///
    /// Strictly ordered: enrichment runs only after a confirmed resolver
    /// hit, persistence only after enrichment has had its chance (whether
    /// it succeeded or silently no-oped). Stopping the scan source does not
    /// cancel a run already started for a captured event.
    pub async fn handle_scan(&self, scan: ScanEvent) -> AppResult<ScanOutcome> {
        log::debug!(
            "Processing scan: {} ({}, observed {})",
            scan.code,
            scan.symbology,
            scan.observed_at.to_rfc3339()
        );
        let barcode = scan.code;

        let _guard = match InFlightGuard::try_acquire(&self.in_flight, &barcode) {
            Some(guard) => guard,
            None => {
                // A run for this barcode is already past its duplicate check
                self.event_bus.emit(DuplicateScanDetected::new(barcode));
                return Ok(ScanOutcome::Duplicate);
            }
        };

        if self.record_repo.is_duplicate(&barcode)? {
            self.event_bus.emit(DuplicateScanDetected::new(barcode));
            return Ok(ScanOutcome::Duplicate);
        }

        let metadata = match self.resolver.lookup_by_barcode(&barcode).await {
            Ok(Some(metadata)) => metadata,
            Ok(None) => {
                // Misses are surfaced, never persisted as rows
                self.event_bus.emit(LookupMissed::new(barcode));
                return Ok(ScanOutcome::NotFound);
            }
            Err(e) => {
                self.event_bus
                    .emit(LookupFailed::new(barcode, e.to_string()));
                return Err(e);
            }
        };

        let record = build_record(barcode, metadata);
        let record = self.enricher.enrich(record).await;

        validate_record(&record).map_err(AppError::Domain)?;
        self.record_repo.save(&record)?;

        self.event_bus.emit(RecordAdded::new(
            record.id,
            record.barcode.clone(),
            record.artist.clone(),
            record.title.clone(),
            record.catalog_uri.clone(),
        ));

        log::info!("Added to collection: {} - {}", record.artist, record.title);

        Ok(ScanOutcome::Added(record))
    }
}

/// Map resolved registry metadata onto a fresh record
fn build_record(barcode: String, metadata: AlbumMetadata) -> CollectionRecord {
    let mut record = CollectionRecord::resolved(barcode, metadata.artist, metadata.title);
    record.cover_url = metadata.cover_url;
    record.tracks = metadata.tracks.map(|tracks| {
        tracks
            .into_iter()
            .map(|track| Track {
                id: track.id,
                name: track.name,
                duration_ms: track.duration_ms,
                track_number: track.track_number,
            })
            .collect()
    });
    record
}

/// Removes its barcode from the in-flight set when the run ends, on every
/// exit path including errors.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    barcode: String,
}

impl<'a> InFlightGuard<'a> {
    fn try_acquire(set: &'a Mutex<HashSet<String>>, barcode: &str) -> Option<Self> {
        let mut in_flight = set.lock().unwrap();
        if !in_flight.insert(barcode.to_string()) {
            return None;
        }
        Some(Self {
            set,
            barcode: barcode.to_string(),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.lock().unwrap().remove(&self.barcode);
    }
}
