use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted, resolved collection entry.
/// Created by the import pipeline after a successful metadata lookup and
/// never mutated after persistence, except explicit deletion or bulk clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRecord {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Dedup key: unique within one user's collection, enforced by the
    /// pipeline rather than by storage
    pub barcode: String,

    pub artist: String,

    pub title: String,

    /// Front cover image URL, if the art archive had one
    pub cover_url: Option<String>,

    /// Playable catalog URI, present only after successful enrichment
    pub catalog_uri: Option<String>,

    /// Catalog-side album identifier, present only after successful enrichment
    pub catalog_id: Option<String>,

    /// Set at creation, drives the default most-recent-first ordering
    pub scan_time: DateTime<Utc>,

    pub status: RecordStatus,

    /// Ordered track listing, if the registry's release detail call succeeded
    pub tracks: Option<Vec<Track>>,
}

/// Resolution status of a record.
/// Only `Found` records are ever persisted; `Pending` is transient and
/// `NotFound`/`Error` are surfaced as notifications, not stored rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Pending,
    Found,
    NotFound,
    Error,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Found => "found",
            RecordStatus::NotFound => "not_found",
            RecordStatus::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RecordStatus::Pending),
            "found" => Some(RecordStatus::Found),
            "not_found" => Some(RecordStatus::NotFound),
            "error" => Some(RecordStatus::Error),
            _ => None,
        }
    }
}

/// A single track on a resolved release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    pub track_number: u32,
}

impl CollectionRecord {
    /// Create a resolved record from a successful registry lookup.
    /// This is the only constructor: records never exist in `Pending` form
    /// outside the pipeline run that creates them.
    pub fn resolved(barcode: String, artist: String, title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            barcode,
            artist,
            title,
            cover_url: None,
            catalog_uri: None,
            catalog_id: None,
            scan_time: Utc::now(),
            status: RecordStatus::Found,
            tracks: None,
        }
    }

    /// Attach catalog data from a successful enrichment.
    /// Status is deliberately untouched: enrichment never changes it.
    pub fn with_catalog(mut self, uri: String, id: String) -> Self {
        self.catalog_uri = Some(uri);
        self.catalog_id = Some(id);
        self
    }

    pub fn is_playable(&self) -> bool {
        self.catalog_uri.is_some()
    }
}
