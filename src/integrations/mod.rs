// src/integrations/mod.rs
//
// External integrations
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Clients never create or modify domain entities directly, with one
//   deliberate exception: CatalogEnricher is a record -> record transform
//   that only ever adds catalog fields
// - External API concerns (headers, status codes, response shapes) stay here

pub mod musicbrainz;
pub mod rate_limit;
pub mod spotify;

pub use musicbrainz::client::{AlbumMetadata, AlbumTrack, MusicBrainzClient};
pub use rate_limit::{RateLimiter, REGISTRY_MIN_INTERVAL};
pub use spotify::auth::{parse_credential_from_fragment, SpotifyAuthConfig};
pub use spotify::client::{CatalogMatch, SpotifyClient};

use crate::domain::CollectionRecord;
use crate::error::AppResult;
use async_trait::async_trait;

/// Resolves a barcode to album metadata via the external registry.
/// `Ok(None)` is a lookup miss; `Err` means the registry was unreachable or
/// returned a malformed response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn lookup_by_barcode(&self, barcode: &str) -> AppResult<Option<AlbumMetadata>>;
}

/// Best-effort catalog enrichment: attaches a playable URI to a resolved
/// record when an authenticated session exists and the catalog has a match.
/// Infallible by contract — on any failure the input record comes back
/// unchanged and the pipeline continues.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogEnricher: Send + Sync {
    async fn enrich(&self, record: CollectionRecord) -> CollectionRecord;
}

/// Hands out the current bearer token for catalog calls, or `None` when no
/// valid session exists. Implemented by the session layer; kept as a trait
/// here so clients stay free of service dependencies.
pub trait AccessTokenProvider: Send + Sync {
    fn access_token(&self) -> AppResult<Option<String>>;
}
