// src/events/mod.rs
//
// Internal event system - public API
//
// CRITICAL: the type-erased EventHandler alias is internal to the bus
// module and must NOT be exported.

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventLogEntry};
pub use types::DomainEvent;

pub use types::{
    // Collection maintenance
    CollectionCleared,
    // Import pipeline
    DuplicateScanDetected,
    LookupFailed,
    LookupMissed,
    RecordAdded,
    RecordDeleted,
    // Session lifecycle
    SessionAuthenticated,
    SessionCleared,
};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
