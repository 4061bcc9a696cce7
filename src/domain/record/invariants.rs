use super::entity::{CollectionRecord, RecordStatus};
use crate::domain::{DomainError, DomainResult};

/// Validates all CollectionRecord invariants.
/// Called by the pipeline before any record reaches the repository.
pub fn validate_record(record: &CollectionRecord) -> DomainResult<()> {
    validate_barcode(&record.barcode)?;
    validate_resolved_fields(record)?;
    validate_persistable_status(record)?;
    Ok(())
}

/// Barcode cannot be empty: it is the dedup key
fn validate_barcode(barcode: &str) -> DomainResult<()> {
    if barcode.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Record barcode cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// A `found` record always has a non-empty artist and title
fn validate_resolved_fields(record: &CollectionRecord) -> DomainResult<()> {
    if record.status == RecordStatus::Found {
        if record.artist.trim().is_empty() {
            return Err(DomainError::InvariantViolation(
                "Resolved record must have an artist".to_string(),
            ));
        }
        if record.title.trim().is_empty() {
            return Err(DomainError::InvariantViolation(
                "Resolved record must have a title".to_string(),
            ));
        }
    }
    Ok(())
}

/// Only resolved records are ever persisted; lookup misses and failures are
/// surfaced as notifications and create no row
fn validate_persistable_status(record: &CollectionRecord) -> DomainResult<()> {
    if record.status != RecordStatus::Found {
        return Err(DomainError::InvalidStateTransition(format!(
            "Record with status '{}' cannot be persisted",
            record.status.as_str()
        )));
    }
    Ok(())
}

/// Invariants that must hold for the record domain:
///
/// 1. Identity (UUID) is immutable
/// 2. Barcode is the dedup key and cannot be empty
/// 3. A `found` record has non-empty artist and title
/// 4. Only `found` records reach storage
/// 5. Enrichment may add catalog fields but never changes status
/// 6. Records are never mutated after persistence (delete/clear excepted)

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_record() {
        let record = CollectionRecord::resolved(
            "0601091975864".to_string(),
            "Radiohead".to_string(),
            "OK Computer".to_string(),
        );
        assert!(validate_record(&record).is_ok());
    }

    #[test]
    fn test_empty_artist_fails() {
        let record = CollectionRecord::resolved(
            "0601091975864".to_string(),
            "   ".to_string(),
            "OK Computer".to_string(),
        );
        assert!(validate_record(&record).is_err());
    }

    #[test]
    fn test_empty_barcode_fails() {
        let record = CollectionRecord::resolved(
            "".to_string(),
            "Radiohead".to_string(),
            "OK Computer".to_string(),
        );
        assert!(validate_record(&record).is_err());
    }

    #[test]
    fn test_unresolved_status_cannot_persist() {
        let mut record = CollectionRecord::resolved(
            "0601091975864".to_string(),
            "Radiohead".to_string(),
            "OK Computer".to_string(),
        );
        record.status = RecordStatus::NotFound;
        assert!(validate_record(&record).is_err());
    }

    #[test]
    fn test_enrichment_preserves_status() {
        let record = CollectionRecord::resolved(
            "0601091975864".to_string(),
            "Radiohead".to_string(),
            "OK Computer".to_string(),
        )
        .with_catalog(
            "spotify:album:6dVIqQ8qmQ5GBnJ9shOYGE".to_string(),
            "6dVIqQ8qmQ5GBnJ9shOYGE".to_string(),
        );
        assert_eq!(record.status, RecordStatus::Found);
        assert!(record.is_playable());
        assert!(validate_record(&record).is_ok());
    }
}
