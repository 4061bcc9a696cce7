// src/export/csv.rs

use crate::domain::record::CollectionRecord;
use crate::error::{AppError, AppResult};

/// UTF-8 byte-order mark for spreadsheet-tool compatibility
const BOM: char = '\u{feff}';

const HEADERS: [&str; 8] = [
    "Artist",
    "Album",
    "Barcode",
    "Catalog_URI",
    "Catalog_Id",
    "Cover_URL",
    "Date_Added",
    "Status",
];

/// Render a record set as delimited text, BOM-prefixed
pub fn to_csv(records: &[CollectionRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(HEADERS.join(","));

    for record in records {
        let date = record.scan_time.format("%Y-%m-%d").to_string();
        let row = [
            escape_field(&record.artist),
            escape_field(&record.title),
            escape_field(&record.barcode),
            escape_field(record.catalog_uri.as_deref().unwrap_or("")),
            escape_field(record.catalog_id.as_deref().unwrap_or("")),
            escape_field(record.cover_url.as_deref().unwrap_or("")),
            date,
            record.status.as_str().to_string(),
        ];
        lines.push(row.join(","));
    }

    format!("{}{}", BOM, lines.join("\n"))
}

/// Quote-wrap a field containing a delimiter, quote or newline,
/// doubling internal quotes
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parse delimited text back into records.
///
/// Columns are located by header name, so re-ordered or partial files
/// still import. Parsed records get fresh ids and scan times; artist and
/// album fall back to the registry's unknown markers when a cell is empty.
pub fn from_csv(text: &str) -> AppResult<Vec<CollectionRecord>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header_line = lines
        .next()
        .ok_or_else(|| AppError::Export("CSV file is empty".to_string()))?;

    let headers: Vec<String> = header_line
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .collect();

    let find = |name: &str| headers.iter().position(|h| h.contains(name));

    let artist_idx = find("artist");
    let album_idx = find("album");
    let barcode_idx = find("barcode");
    let catalog_uri_idx = find("catalog_uri");
    let catalog_id_idx = find("catalog_id");
    let cover_idx = find("cover");

    let (Some(artist_idx), Some(album_idx)) = (artist_idx, album_idx) else {
        return Err(AppError::Export(
            "CSV must contain Artist and Album columns".to_string(),
        ));
    };

    let column = |fields: &[String], idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| fields.get(i))
            .filter(|value| !value.is_empty())
            .cloned()
    };

    let mut records = Vec::new();

    for line in lines {
        let fields = parse_line(line);

        let artist = column(&fields, Some(artist_idx)).unwrap_or_else(|| "Unknown Artist".to_string());
        let title = column(&fields, Some(album_idx)).unwrap_or_else(|| "Unknown Album".to_string());
        let barcode = column(&fields, barcode_idx).unwrap_or_default();

        let mut record = CollectionRecord::resolved(barcode, artist, title);
        record.catalog_uri = column(&fields, catalog_uri_idx);
        record.catalog_id = column(&fields, catalog_id_idx);
        record.cover_url = column(&fields, cover_idx);

        records.push(record);
    }

    Ok(records)
}

/// Split one line into fields, honoring quoted fields with embedded
/// delimiters and doubled quotes
fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    // Doubled quote inside a quoted field
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(c),
        }
    }

    fields.push(current.trim().to_string());
    fields
}
