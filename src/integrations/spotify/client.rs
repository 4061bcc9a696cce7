// src/integrations/spotify/client.rs
//
// Spotify catalog integration
//
// ARCHITECTURE:
// - Bearer-token JSON client for search, playlist creation and transport
//   control
// - Tokens come from an injected AccessTokenProvider; this client never
//   stores or refreshes credentials itself
// - Used by ImportService through the CatalogEnricher trait
//
// FAILURE CONTRACT:
// - Enrichment swallows every failure and returns the record unchanged
// - All other operations are privileged: no valid token → NotAuthenticated

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::CollectionRecord;
use crate::error::{AppError, AppResult};
use crate::integrations::{AccessTokenProvider, CatalogEnricher};

/// A catalog hit for an album search
#[derive(Debug, Clone)]
pub struct CatalogMatch {
    pub uri: String,
    pub album_id: String,
}

/// Album search response wrapper
#[derive(Debug, Deserialize)]
struct SearchResponse {
    albums: Option<AlbumPage>,
}

#[derive(Debug, Deserialize)]
struct AlbumPage {
    #[serde(default)]
    items: Vec<AlbumItem>,
}

#[derive(Debug, Deserialize)]
struct AlbumItem {
    id: String,
    uri: String,
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    spotify: String,
}

/// Spotify Web API client
pub struct SpotifyClient {
    base_url: String,
    http_client: Client,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl SpotifyClient {
    pub fn new(tokens: Arc<dyn AccessTokenProvider>) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: "https://api.spotify.com/v1".to_string(),
            http_client,
            tokens,
        }
    }

    /// Current bearer token, or NotAuthenticated
    fn bearer(&self) -> AppResult<String> {
        self.tokens
            .access_token()?
            .ok_or(AppError::NotAuthenticated)
    }

    /// Search the catalog for an album and return the first match, if any
    pub async fn search_album(&self, artist: &str, title: &str) -> AppResult<Option<CatalogMatch>> {
        let token = self.bearer()?;

        let response = self
            .http_client
            .get(format!("{}/search", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .query(&[
                ("q", format!("artist:{} album:{}", artist, title)),
                ("type", "album".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Other(format!(
                "Spotify search returned status: {}",
                response.status()
            )));
        }

        let data: SearchResponse = response.json().await?;

        let item = data
            .albums
            .map(|page| page.items)
            .unwrap_or_default()
            .into_iter()
            .next();

        Ok(item.map(|item| CatalogMatch {
            uri: item.uri,
            album_id: item.id,
        }))
    }

    /// Fetch the authenticated user's catalog id
    pub async fn current_user_id(&self) -> AppResult<String> {
        let token = self.bearer()?;

        let response = self
            .http_client
            .get(format!("{}/me", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Other(format!(
                "Spotify user lookup returned status: {}",
                response.status()
            )));
        }

        let profile: UserProfile = response.json().await?;
        Ok(profile.id)
    }

    /// Create a playlist for the authenticated user and return its public URL
    pub async fn create_playlist(&self, name: &str) -> AppResult<String> {
        let token = self.bearer()?;
        let user_id = self.current_user_id().await?;

        let response = self
            .http_client
            .post(format!("{}/users/{}/playlists", self.base_url, user_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .json(&json!({
                "name": name,
                "description": "Created by Discbox",
                "public": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Other(format!(
                "Spotify playlist creation returned status: {}",
                response.status()
            )));
        }

        let playlist: PlaylistResponse = response.json().await?;
        Ok(playlist.external_urls.spotify)
    }

    /// Create a playlist from the playable records in a collection.
    /// Errors with NoPlayableEntries when no record carries a catalog URI.
    pub async fn create_collection_playlist(
        &self,
        name: &str,
        records: &[CollectionRecord],
    ) -> AppResult<String> {
        if !records.iter().any(|record| record.is_playable()) {
            return Err(AppError::NoPlayableEntries);
        }

        self.create_playlist(name).await
    }

    // ========================================================================
    // Transport control
    // ========================================================================

    /// Start or resume playback, optionally of a specific context URI
    pub async fn play(&self, context_uri: Option<&str>) -> AppResult<()> {
        let body = match context_uri {
            Some(uri) => json!({ "context_uri": uri }),
            None => json!({}),
        };
        self.transport_put("me/player/play", Some(body)).await
    }

    pub async fn pause(&self) -> AppResult<()> {
        self.transport_put("me/player/pause", None).await
    }

    pub async fn seek(&self, position_ms: u64) -> AppResult<()> {
        self.transport_put(
            &format!("me/player/seek?position_ms={}", position_ms),
            None,
        )
        .await
    }

    pub async fn set_volume(&self, percent: u8) -> AppResult<()> {
        self.transport_put(
            &format!("me/player/volume?volume_percent={}", percent.min(100)),
            None,
        )
        .await
    }

    pub async fn next_track(&self) -> AppResult<()> {
        self.transport_post("me/player/next").await
    }

    pub async fn previous_track(&self) -> AppResult<()> {
        self.transport_post("me/player/previous").await
    }

    async fn transport_put(&self, path: &str, body: Option<serde_json::Value>) -> AppResult<()> {
        let token = self.bearer()?;

        let mut request = self
            .http_client
            .put(format!("{}/{}", self.base_url, path))
            .header(header::AUTHORIZATION, format!("Bearer {}", token));

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(AppError::Other(format!(
                "Spotify transport call returned status: {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn transport_post(&self, path: &str) -> AppResult<()> {
        let token = self.bearer()?;

        let response = self
            .http_client
            .post(format!("{}/{}", self.base_url, path))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Other(format!(
                "Spotify transport call returned status: {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl CatalogEnricher for SpotifyClient {
    /// Attach a catalog URI to a resolved record, best-effort.
    /// No session → unchanged record, no error. Search failure → unchanged
    /// record, diagnostic log only. Status is never touched.
    async fn enrich(&self, record: CollectionRecord) -> CollectionRecord {
        match self.tokens.access_token() {
            Ok(Some(_)) => {}
            _ => return record,
        }

        match self.search_album(&record.artist, &record.title).await {
            Ok(Some(matched)) => record.with_catalog(matched.uri, matched.album_id),
            Ok(None) => record,
            Err(e) => {
                log::warn!(
                    "Catalog enrichment failed for '{} - {}': {}",
                    record.artist,
                    record.title,
                    e
                );
                record
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoToken;
    impl AccessTokenProvider for NoToken {
        fn access_token(&self) -> AppResult<Option<String>> {
            Ok(None)
        }
    }

    #[test]
    fn test_search_response_mapping() {
        let json = r#"{
            "albums": {
                "items": [
                    { "id": "6dVIqQ8qmQ5GBnJ9shOYGE", "uri": "spotify:album:6dVIqQ8qmQ5GBnJ9shOYGE" }
                ]
            }
        }"#;

        let data: SearchResponse = serde_json::from_str(json).unwrap();
        let item = data.albums.unwrap().items.into_iter().next().unwrap();
        assert_eq!(item.id, "6dVIqQ8qmQ5GBnJ9shOYGE");
        assert_eq!(item.uri, "spotify:album:6dVIqQ8qmQ5GBnJ9shOYGE");
    }

    #[test]
    fn test_empty_search_response_mapping() {
        let data: SearchResponse = serde_json::from_str(r#"{ "albums": { "items": [] } }"#).unwrap();
        assert!(data.albums.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_unauthenticated_search_is_rejected() {
        let client = SpotifyClient::new(Arc::new(NoToken));
        let result = client.search_album("Radiohead", "OK Computer").await;
        assert!(matches!(result, Err(AppError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_unauthenticated_enrich_returns_record_unchanged() {
        let client = SpotifyClient::new(Arc::new(NoToken));
        let record = CollectionRecord::resolved(
            "0601091975864".to_string(),
            "Radiohead".to_string(),
            "OK Computer".to_string(),
        );
        let record_id = record.id;

        let enriched = client.enrich(record).await;

        assert_eq!(enriched.id, record_id);
        assert!(enriched.catalog_uri.is_none());
        assert!(enriched.catalog_id.is_none());
    }

    #[tokio::test]
    async fn test_playlist_from_collection_without_playable_records() {
        let client = SpotifyClient::new(Arc::new(NoToken));
        let records = vec![CollectionRecord::resolved(
            "0601091975864".to_string(),
            "Radiohead".to_string(),
            "OK Computer".to_string(),
        )];

        let result = client.create_collection_playlist("CD Import", &records).await;
        assert!(matches!(result, Err(AppError::NoPlayableEntries)));
    }
}
