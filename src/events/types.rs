// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// IMPORT PIPELINE EVENTS
// ============================================================================

/// Emitted when a scan hits a barcode that is already in the collection.
/// Informational: the pipeline stops without any remote call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateScanDetected {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub barcode: String,
}

impl DuplicateScanDetected {
    pub fn new(barcode: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            barcode,
        }
    }
}

impl DomainEvent for DuplicateScanDetected {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "DuplicateScanDetected"
    }
}

/// Emitted when the registry reports zero results for a barcode.
/// No record is created for a miss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupMissed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub barcode: String,
}

impl LookupMissed {
    pub fn new(barcode: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            barcode,
        }
    }
}

impl DomainEvent for LookupMissed {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "LookupMissed"
    }
}

/// Emitted when the registry was unreachable or returned a malformed
/// response. Fatal for that pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub barcode: String,
    pub reason: String,
}

impl LookupFailed {
    pub fn new(barcode: String, reason: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            barcode,
            reason,
        }
    }
}

impl DomainEvent for LookupFailed {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "LookupFailed"
    }
}

/// Emitted after a resolved (and possibly enriched) record is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub record_id: Uuid,
    pub barcode: String,
    pub artist: String,
    pub title: String,
    pub catalog_uri: Option<String>,
}

impl RecordAdded {
    pub fn new(
        record_id: Uuid,
        barcode: String,
        artist: String,
        title: String,
        catalog_uri: Option<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            record_id,
            barcode,
            artist,
            title,
            catalog_uri,
        }
    }
}

impl DomainEvent for RecordAdded {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "RecordAdded"
    }
}

// ============================================================================
// COLLECTION MAINTENANCE EVENTS
// ============================================================================

/// Emitted when a record is explicitly deleted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub record_id: Uuid,
}

impl RecordDeleted {
    pub fn new(record_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            record_id,
        }
    }
}

impl DomainEvent for RecordDeleted {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "RecordDeleted"
    }
}

/// Emitted after a bulk clear of the collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionCleared {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub records_removed: u64,
}

impl CollectionCleared {
    pub fn new(records_removed: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            records_removed,
        }
    }
}

impl DomainEvent for CollectionCleared {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "CollectionCleared"
    }
}

// ============================================================================
// SESSION LIFECYCLE EVENTS
// ============================================================================

/// Emitted when a new catalog credential is stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAuthenticated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionAuthenticated {
    pub fn new(expires_at: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            expires_at,
        }
    }
}

impl DomainEvent for SessionAuthenticated {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "SessionAuthenticated"
    }
}

/// Emitted when the credential is removed, either explicitly or because an
/// expired credential was read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCleared {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    /// True when the clear was triggered by lazy expiry rather than sign-out
    pub expired: bool,
}

impl SessionCleared {
    pub fn new(expired: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            expired,
        }
    }
}

impl DomainEvent for SessionCleared {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "SessionCleared"
    }
}
