// src/integrations/musicbrainz/client.rs
//
// MusicBrainz registry integration
//
// ARCHITECTURE:
// - JSON client for the MusicBrainz /ws/2 search + release endpoints and
//   the Cover Art Archive
// - Every outbound registry call goes through the shared RateLimiter
// - Maps external data → AlbumMetadata DTOs (NO domain mutation)
// - Used by ImportService through the MetadataResolver trait
//
// FAILURE CONTRACT:
// - Primary barcode search: transport/non-2xx/parse failure is fatal
//   (AppError::Lookup)
// - Release detail (tracks) and cover art: best-effort, degrade to None

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::integrations::rate_limit::RateLimiter;
use crate::integrations::MetadataResolver;

/// Identifying client tag sent on every registry call
const USER_AGENT: &str = "discbox/0.1.0 (https://github.com/discbox/discbox)";

/// Best-effort album record resolved from a barcode.
/// The registry's release identifier stays internal to this client; it only
/// exists to drive the tracks/cover-art follow-up calls.
#[derive(Debug, Clone)]
pub struct AlbumMetadata {
    pub artist: String,
    pub title: String,
    pub cover_url: Option<String>,
    pub tracks: Option<Vec<AlbumTrack>>,
}

/// One track from the registry's release detail
#[derive(Debug, Clone)]
pub struct AlbumTrack {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    pub track_number: u32,
}

/// Barcode search response wrapper
#[derive(Debug, Deserialize)]
struct ReleaseSearchResponse {
    #[serde(default)]
    releases: Vec<ReleaseData>,
}

/// Release data from the search endpoint
#[derive(Debug, Deserialize)]
struct ReleaseData {
    id: String,
    title: Option<String>,
    #[serde(rename = "artist-credit", default)]
    artist_credit: Vec<ArtistCreditData>,
}

#[derive(Debug, Deserialize)]
struct ArtistCreditData {
    name: String,
}

/// Release detail response (inc=recordings)
#[derive(Debug, Deserialize)]
struct ReleaseDetailResponse {
    #[serde(default)]
    media: Vec<MediumData>,
}

#[derive(Debug, Deserialize)]
struct MediumData {
    #[serde(default)]
    tracks: Vec<TrackData>,
}

#[derive(Debug, Deserialize)]
struct TrackData {
    id: String,
    title: String,
    length: Option<u64>,
    position: u32,
}

/// MusicBrainz API client
pub struct MusicBrainzClient {
    base_url: String,
    cover_art_url: String,
    http_client: Client,
    rate_limiter: Arc<RateLimiter>,
}

impl MusicBrainzClient {
    /// Create a client around a shared rate limiter
    pub fn new(rate_limiter: Arc<RateLimiter>) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: "https://musicbrainz.org/ws/2".to_string(),
            cover_art_url: "https://coverartarchive.org".to_string(),
            http_client,
            rate_limiter,
        }
    }

    /// Resolve a barcode to album metadata.
    ///
    /// Takes the first search result (no multi-candidate matching), then
    /// follows up with a rate-limited release-detail call for the track
    /// listing and a cover-art fetch. Only the primary search can fail the
    /// lookup; the follow-ups degrade to "no tracks" / "no cover".
    pub async fn lookup_by_barcode(&self, barcode: &str) -> AppResult<Option<AlbumMetadata>> {
        self.rate_limiter.acquire().await;

        let response = self
            .http_client
            .get(format!("{}/release", self.base_url))
            .query(&[("query", format!("barcode:{}", barcode)), ("fmt", "json".to_string())])
            .send()
            .await
            .map_err(|e| AppError::Lookup(format!("MusicBrainz request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Lookup(format!(
                "MusicBrainz returned status: {}",
                response.status()
            )));
        }

        let data: ReleaseSearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Lookup(format!("Failed to parse MusicBrainz response: {}", e)))?;

        // First result is the most relevant one
        let Some(release) = data.releases.into_iter().next() else {
            return Ok(None);
        };

        let (artist, title) = release_identity(&release);

        let tracks = match self.fetch_tracks(&release.id).await {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("Could not fetch track listing for {}: {}", release.id, e);
                None
            }
        };

        let cover_url = match self.fetch_cover_art(&release.id).await {
            Ok(url) => url,
            Err(e) => {
                log::warn!("Could not fetch cover art for {}: {}", release.id, e);
                None
            }
        };

        Ok(Some(AlbumMetadata {
            artist,
            title,
            cover_url,
            tracks,
        }))
    }

    /// Fetch the detailed track listing for a release.
    /// Non-2xx degrades to `None` rather than failing the lookup.
    async fn fetch_tracks(&self, release_id: &str) -> AppResult<Option<Vec<AlbumTrack>>> {
        self.rate_limiter.acquire().await;

        let response = self
            .http_client
            .get(format!("{}/release/{}", self.base_url, release_id))
            .query(&[("inc", "recordings"), ("fmt", "json")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let data: ReleaseDetailResponse = response.json().await?;

        Ok(map_tracks(data))
    }

    /// Resolve the front cover image URL from the Cover Art Archive.
    /// The archive answers with a redirect chain; the final URL is the image.
    async fn fetch_cover_art(&self, release_id: &str) -> AppResult<Option<String>> {
        let response = self
            .http_client
            .get(format!("{}/release/{}/front", self.cover_art_url, release_id))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(Some(response.url().to_string()));
        }

        Ok(None)
    }
}

/// Artist and title with the registry's fallbacks for sparse credits
fn release_identity(release: &ReleaseData) -> (String, String) {
    let artist = release
        .artist_credit
        .first()
        .map(|credit| credit.name.clone())
        .unwrap_or_else(|| "Unknown Artist".to_string());

    let title = release
        .title
        .clone()
        .unwrap_or_else(|| "Unknown Album".to_string());

    (artist, title)
}

/// Flatten the first medium's tracks, preserving order.
/// A missing `length` becomes 0 rather than dropping the track.
fn map_tracks(detail: ReleaseDetailResponse) -> Option<Vec<AlbumTrack>> {
    let medium = detail.media.into_iter().next()?;

    let tracks: Vec<AlbumTrack> = medium
        .tracks
        .into_iter()
        .map(|track| AlbumTrack {
            id: track.id,
            name: track.title,
            duration_ms: track.length.unwrap_or(0),
            track_number: track.position,
        })
        .collect();

    Some(tracks)
}

#[async_trait]
impl MetadataResolver for MusicBrainzClient {
    async fn lookup_by_barcode(&self, barcode: &str) -> AppResult<Option<AlbumMetadata>> {
        MusicBrainzClient::lookup_by_barcode(self, barcode).await
    }
}
