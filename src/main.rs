// src/main.rs
//
// Wires the object graph the same way for every entry point: pool →
// repositories → services → event subscriptions, then hands scan events to
// the import pipeline. The barcode decoder is an external collaborator; in
// this binary, stdin lines stand in for its decoded-code events.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use discbox::application::AppState;
use discbox::db::{create_connection_pool, initialize_database};
use discbox::domain::ScanEvent;
use discbox::events::{
    DuplicateScanDetected, EventBus, LookupFailed, LookupMissed, RecordAdded,
};
use discbox::integrations::{
    AccessTokenProvider, MusicBrainzClient, RateLimiter, SpotifyAuthConfig, SpotifyClient,
    REGISTRY_MIN_INTERVAL,
};
use discbox::repositories::{
    CredentialRepository, RecordRepository, SqliteCredentialRepository, SqliteRecordRepository,
};
use discbox::services::{CollectionService, ImportService, SessionService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. INFRASTRUCTURE
    let event_bus = Arc::new(EventBus::new());
    let pool = Arc::new(create_connection_pool()?);

    // Initialize schema (idempotent)
    {
        let conn = pool.get()?;
        initialize_database(&conn)?;
    }

    // 2. REPOSITORIES
    let record_repo: Arc<dyn RecordRepository> =
        Arc::new(SqliteRecordRepository::new(pool.clone()));
    let credential_repo: Arc<dyn CredentialRepository> =
        Arc::new(SqliteCredentialRepository::new(pool.clone()));

    // 3. SERVICES & INTEGRATIONS
    let session_service = Arc::new(SessionService::new(credential_repo, event_bus.clone()));

    let rate_limiter = Arc::new(RateLimiter::new(REGISTRY_MIN_INTERVAL));
    let musicbrainz = Arc::new(MusicBrainzClient::new(rate_limiter));

    let tokens: Arc<dyn AccessTokenProvider> = session_service.clone();
    let spotify = Arc::new(SpotifyClient::new(tokens));

    let import_service = Arc::new(ImportService::new(
        record_repo.clone(),
        musicbrainz,
        spotify.clone(),
        event_bus.clone(),
    ));
    let collection_service = Arc::new(CollectionService::new(record_repo, event_bus.clone()));

    // 4. STATUS EVENT SUBSCRIPTIONS (stand-in for UI toasts)
    event_bus.subscribe::<RecordAdded, _>(|event| {
        println!("Added: {} - {}", event.artist, event.title);
    });
    event_bus.subscribe::<DuplicateScanDetected, _>(|event| {
        println!("Already scanned: {}", event.barcode);
    });
    event_bus.subscribe::<LookupMissed, _>(|event| {
        println!("No album found for barcode {}", event.barcode);
    });
    event_bus.subscribe::<LookupFailed, _>(|event| {
        println!("Lookup failed for {}: {}", event.barcode, event.reason);
    });

    let state = AppState {
        event_bus,
        import_service,
        collection_service,
        session_service,
        spotify,
    };

    if let Some(auth_config) = SpotifyAuthConfig::from_env() {
        if !state.session_service.is_authenticated()? {
            println!(
                "To enable catalog matching, authorize at:\n  {}\nthen paste the redirect fragment as: auth #access_token=...",
                auth_config.authorize_url()?
            );
        }
    }

    // 5. SCAN LOOP
    println!("Scan a barcode (or: auth <fragment>, list, csv, m3u, quit):");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        match input {
            "" => continue,
            "quit" => break,
            "list" => {
                for record in state.collection_service.list_records()? {
                    println!(
                        "{}  {} - {}  [{}]",
                        record.scan_time.format("%Y-%m-%d"),
                        record.artist,
                        record.title,
                        record.catalog_uri.as_deref().unwrap_or("no catalog match")
                    );
                }
            }
            "csv" => match state.collection_service.export_csv() {
                Ok(text) => println!("{}", text),
                Err(e) => println!("Export failed: {}", e),
            },
            "m3u" => match state.collection_service.export_m3u() {
                Ok(text) => println!("{}", text),
                Err(e) => println!("Export failed: {}", e),
            },
            _ if input.starts_with("auth ") => {
                let fragment = input.trim_start_matches("auth ").trim();
                if state.session_service.authenticate_from_fragment(fragment)? {
                    println!("Authenticated with the catalog service");
                } else {
                    println!("No credential found in that fragment");
                }
            }
            barcode => {
                let scan = ScanEvent::new(barcode.to_string(), "ean_13".to_string());
                if let Err(e) = state.import_service.handle_scan(scan).await {
                    log::error!("Scan processing failed: {}", e);
                }
            }
        }
    }

    Ok(())
}
