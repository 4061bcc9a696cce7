// src/lib.rs
// Discbox - local-first CD collection manager
//
// Architecture:
// - Domain-centric: business rules live in domain entities and invariants
// - Event-driven: services report facts through a synchronous event bus
// - Explicit: no implicit behavior, no magic
// - Local-first: the collection lives in the user's SQLite database;
//   external services only ever enrich it

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// INTEGRATIONS & APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod export;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_record,
    CollectionRecord,
    Credential,
    RecordStatus,
    ScanEvent,
    Track,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    CollectionCleared,
    DomainEvent,
    DuplicateScanDetected,
    EventBus,
    EventLogEntry,
    LookupFailed,
    LookupMissed,
    RecordAdded,
    RecordDeleted,
    SessionAuthenticated,
    SessionCleared,
};

// ============================================================================
// PUBLIC API - Services & Integrations
// ============================================================================

pub use services::{CollectionService, ImportService, ScanOutcome, SessionService};

pub use integrations::{
    AccessTokenProvider,
    AlbumMetadata,
    CatalogEnricher,
    MetadataResolver,
    MusicBrainzClient,
    RateLimiter,
    SpotifyAuthConfig,
    SpotifyClient,
    REGISTRY_MIN_INTERVAL,
};
