// src/integrations/spotify/auth.rs
//
// Implicit-grant authorization helpers.
//
// The flow itself happens outside this process: the user opens the
// authorize URL in a browser, approves, and the catalog service redirects
// with the token in the URL fragment. This module builds that URL and
// parses the fragment back into a Credential. There is no refresh —
// an expired credential deauthenticates until the flow is repeated.

use chrono::{Duration, Utc};
use reqwest::Url;

use crate::domain::Credential;
use crate::error::{AppError, AppResult};

const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";

/// Scopes required for search, playlist creation and transport control
const SCOPES: [&str; 6] = [
    "user-read-private",
    "user-read-email",
    "playlist-modify-public",
    "playlist-modify-private",
    "user-modify-playback-state",
    "user-read-playback-state",
];

/// Client registration for the authorize redirect
#[derive(Debug, Clone)]
pub struct SpotifyAuthConfig {
    pub client_id: String,
    pub redirect_uri: String,
}

impl SpotifyAuthConfig {
    pub fn new(client_id: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            redirect_uri,
        }
    }

    /// Read configuration from DISCBOX_SPOTIFY_CLIENT_ID and
    /// DISCBOX_SPOTIFY_REDIRECT_URI. Returns None when unset: the app runs
    /// without enrichment in that case.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("DISCBOX_SPOTIFY_CLIENT_ID").ok()?;
        let redirect_uri = std::env::var("DISCBOX_SPOTIFY_REDIRECT_URI").ok()?;
        Some(Self::new(client_id, redirect_uri))
    }

    /// Build the implicit-grant authorization URL
    pub fn authorize_url(&self) -> AppResult<String> {
        if self.client_id.trim().is_empty() {
            return Err(AppError::Other(
                "Spotify client id is not configured".to_string(),
            ));
        }

        let scope = SCOPES.join(" ");
        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "token"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("show_dialog", "true"),
            ],
        )
        .map_err(|e| AppError::Other(format!("Failed to build authorize URL: {}", e)))?;

        Ok(url.to_string())
    }
}

/// Parse `access_token` and `expires_in` out of a redirect fragment
/// (`access_token=…&token_type=Bearer&expires_in=3600`).
/// Returns None when either field is missing or malformed.
pub fn parse_credential_from_fragment(fragment: &str) -> Option<Credential> {
    let fragment = fragment.trim_start_matches('#');

    let mut access_token: Option<&str> = None;
    let mut expires_in: Option<i64> = None;

    for pair in fragment.split('&') {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next()?;
        let value = parts.next().unwrap_or("");

        match key {
            "access_token" => access_token = Some(value),
            "expires_in" => expires_in = value.parse().ok(),
            _ => {}
        }
    }

    let access_token = access_token.filter(|t| !t.is_empty())?;
    let expires_in = expires_in?;

    Some(Credential::new(
        access_token.to_string(),
        Utc::now() + Duration::seconds(expires_in),
    ))
}
