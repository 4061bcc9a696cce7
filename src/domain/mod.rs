// src/domain/mod.rs
//
// Domain Root - declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`.

pub mod credential;
pub mod record;
pub mod scan;

pub use credential::Credential;
pub use record::{validate_record, CollectionRecord, RecordStatus, Track};
pub use scan::ScanEvent;

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
