// src/export/m3u.rs

use crate::domain::record::CollectionRecord;
use crate::error::{AppError, AppResult};

/// Render the playable subset of a record set as Extended M3U text:
/// the file-type marker line, then one metadata/URI line pair per record.
/// Album-level entries have no known duration, hence the -1 marker.
pub fn to_m3u(records: &[CollectionRecord]) -> AppResult<String> {
    let playable: Vec<&CollectionRecord> = records
        .iter()
        .filter(|record| record.is_playable())
        .collect();

    if playable.is_empty() {
        return Err(AppError::NoPlayableEntries);
    }

    let mut lines = vec!["#EXTM3U".to_string()];

    for record in playable {
        lines.push(format!("#EXTINF:-1,{} - {}", record.artist, record.title));
        // is_playable() guarantees the URI is present
        lines.push(record.catalog_uri.clone().unwrap_or_default());
    }

    Ok(lines.join("\n"))
}

/// Convert delimited text straight to playlist text
pub fn csv_to_m3u(text: &str) -> AppResult<String> {
    to_m3u(&super::csv::from_csv(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playable(artist: &str, title: &str, uri: &str) -> CollectionRecord {
        let mut record = CollectionRecord::resolved(
            "0601091975864".to_string(),
            artist.to_string(),
            title.to_string(),
        );
        record.catalog_uri = Some(uri.to_string());
        record
    }

    fn unplayable() -> CollectionRecord {
        CollectionRecord::resolved(
            "111111111111".to_string(),
            "Radiohead".to_string(),
            "Kid A".to_string(),
        )
    }

    #[test]
    fn test_playlist_structure() {
        let records = vec![
            playable(
                "Radiohead",
                "OK Computer",
                "spotify:album:6dVIqQ8qmQ5GBnJ9shOYGE",
            ),
            unplayable(),
        ];

        let text = to_m3u(&records).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // Marker line, then one metadata/URI pair for the single playable record
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "#EXTM3U");
        assert_eq!(lines[1], "#EXTINF:-1,Radiohead - OK Computer");
        assert_eq!(lines[2], "spotify:album:6dVIqQ8qmQ5GBnJ9shOYGE");
    }

    #[test]
    fn test_no_playable_entries_is_an_error() {
        assert!(matches!(
            to_m3u(&[unplayable()]),
            Err(AppError::NoPlayableEntries)
        ));
        assert!(matches!(to_m3u(&[]), Err(AppError::NoPlayableEntries)));
    }

    #[test]
    fn test_csv_to_m3u_conversion() {
        let csv = "Artist,Album,Barcode,Catalog_URI\nRadiohead,OK Computer,0601091975864,spotify:album:abc";

        let text = csv_to_m3u(csv).unwrap();

        assert!(text.starts_with("#EXTM3U\n"));
        assert!(text.contains("#EXTINF:-1,Radiohead - OK Computer"));
        assert!(text.ends_with("spotify:album:abc"));
    }

    #[test]
    fn test_csv_without_playable_rows() {
        let csv = "Artist,Album\nRadiohead,Kid A";
        assert!(matches!(csv_to_m3u(csv), Err(AppError::NoPlayableEntries)));
    }
}
