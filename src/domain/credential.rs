// src/domain/credential.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bearer token plus expiry for the catalog service.
/// Owned exclusively by the session layer. Treated as absent once
/// `now >= expires_at`; there is no refresh — re-authentication fully
/// replaces the stored credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(access_token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token,
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
