// src/domain/scan.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A decoded-barcode event pushed by the external decoder.
/// Ephemeral: produced once, consumed once by the import pipeline.
/// The decoder gives no minimum inter-event gap guarantee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEvent {
    /// The decoded barcode digits
    pub code: String,
    /// Barcode symbology reported by the decoder (e.g. "ean_13")
    pub symbology: String,
    pub observed_at: DateTime<Utc>,
}

impl ScanEvent {
    pub fn new(code: String, symbology: String) -> Self {
        Self {
            code,
            symbology,
            observed_at: Utc::now(),
        }
    }
}
