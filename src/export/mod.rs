// src/export/mod.rs
//
// Pure, deterministic, side-effect-free transforms between a record set
// and its delimited-text / playlist-text representations. No IO here:
// callers decide where the text goes.

pub mod csv;
pub mod m3u;

pub use csv::{from_csv, to_csv};
pub use m3u::{csv_to_m3u, to_m3u};
