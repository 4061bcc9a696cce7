// src/repositories/record_repository.rs

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::record::{CollectionRecord, RecordStatus, Track};
use crate::error::{AppError, AppResult};

/// Durable keyed store of scanned records: the dedup source of truth.
/// All operations are atomic with respect to a single record; no
/// multi-record transaction guarantee is offered.
pub trait RecordRepository: Send + Sync {
    /// Upsert by id
    fn save(&self, record: &CollectionRecord) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<CollectionRecord>>;
    /// Secondary lookup by the dedup key
    fn get_by_barcode(&self, barcode: &str) -> AppResult<Option<CollectionRecord>>;
    /// All records, most recently scanned first
    fn list_all(&self) -> AppResult<Vec<CollectionRecord>>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
    fn clear(&self) -> AppResult<()>;
    fn count(&self) -> AppResult<u64>;
    fn is_duplicate(&self, barcode: &str) -> AppResult<bool> {
        Ok(self.get_by_barcode(barcode)?.is_some())
    }
}

pub struct SqliteRecordRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteRecordRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &Row) -> Result<CollectionRecord, rusqlite::Error> {
        let id = Uuid::parse_str(&row.get::<_, String>("id")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let scan_time = DateTime::parse_from_rfc3339(&row.get::<_, String>("scan_time")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        let status_str: String = row.get("status")?;
        let status = RecordStatus::parse(&status_str).ok_or_else(|| {
            rusqlite::Error::ToSqlConversionFailure(
                format!("unknown record status '{}'", status_str).into(),
            )
        })?;

        let tracks: Option<Vec<Track>> = match row.get::<_, Option<String>>("tracks")? {
            Some(json) => Some(
                serde_json::from_str(&json)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?,
            ),
            None => None,
        };

        Ok(CollectionRecord {
            id,
            barcode: row.get("barcode")?,
            artist: row.get("artist")?,
            title: row.get("title")?,
            cover_url: row.get("cover_url")?,
            catalog_uri: row.get("catalog_uri")?,
            catalog_id: row.get("catalog_id")?,
            scan_time,
            status,
            tracks,
        })
    }
}

impl RecordRepository for SqliteRecordRepository {
    fn save(&self, record: &CollectionRecord) -> AppResult<()> {
        let conn = self.pool.get()?;

        let tracks_json = match &record.tracks {
            Some(tracks) => Some(serde_json::to_string(tracks)?),
            None => None,
        };

        conn.execute(
            "INSERT OR REPLACE INTO records
             (id, barcode, artist, title, cover_url, catalog_uri, catalog_id, scan_time, status, tracks)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.id.to_string(),
                record.barcode,
                record.artist,
                record.title,
                record.cover_url,
                record.catalog_uri,
                record.catalog_id,
                record.scan_time.to_rfc3339(),
                record.status.as_str(),
                tracks_json,
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<CollectionRecord>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT * FROM records WHERE id = ?1")?;

        match stmt.query_row(params![id.to_string()], Self::row_to_record) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_by_barcode(&self, barcode: &str) -> AppResult<Option<CollectionRecord>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare("SELECT * FROM records WHERE barcode = ?1 ORDER BY scan_time LIMIT 1")?;

        match stmt.query_row(params![barcode], Self::row_to_record) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<CollectionRecord>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT * FROM records ORDER BY scan_time DESC")?;

        let records: Vec<CollectionRecord> = stmt
            .query_map([], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM records WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM records", [])?;
        Ok(())
    }

    fn count(&self) -> AppResult<u64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
