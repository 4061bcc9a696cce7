// src/repositories/credential_repository.rs

use chrono::{DateTime, Utc};
use rusqlite::params;
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::Credential;
use crate::error::{AppError, AppResult};

/// Single-slot durable storage for the catalog credential.
/// Expiry semantics live in the session layer, not here.
pub trait CredentialRepository: Send + Sync {
    /// Replace the stored credential
    fn save(&self, credential: &Credential) -> AppResult<()>;
    fn get(&self) -> AppResult<Option<Credential>>;
    fn clear(&self) -> AppResult<()>;
}

pub struct SqliteCredentialRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCredentialRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl CredentialRepository for SqliteCredentialRepository {
    fn save(&self, credential: &Credential) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR REPLACE INTO credential (slot, access_token, expires_at)
             VALUES (0, ?1, ?2)",
            params![
                credential.access_token,
                credential.expires_at.to_rfc3339()
            ],
        )?;

        Ok(())
    }

    fn get(&self) -> AppResult<Option<Credential>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare("SELECT access_token, expires_at FROM credential WHERE slot = 0")?;

        let row = stmt.query_row([], |row| {
            let access_token: String = row.get(0)?;
            let expires_at: String = row.get(1)?;
            Ok((access_token, expires_at))
        });

        match row {
            Ok((access_token, expires_at)) => {
                let expires_at = DateTime::parse_from_rfc3339(&expires_at)?.with_timezone(&Utc);
                Ok(Some(Credential::new(access_token, expires_at)))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM credential WHERE slot = 0", [])?;
        Ok(())
    }
}
