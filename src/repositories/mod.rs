// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - NO cross-repository calls
// - Explicit SQL only

pub mod credential_repository;
pub mod record_repository;

pub use credential_repository::{CredentialRepository, SqliteCredentialRepository};
pub use record_repository::{RecordRepository, SqliteRecordRepository};
