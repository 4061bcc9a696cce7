// src/application/state.rs

use std::sync::Arc;

use crate::events::EventBus;
use crate::integrations::SpotifyClient;
use crate::services::{CollectionService, ImportService, SessionService};

/// Shared application state.
/// All fields are Arc-wrapped for thread-safe sharing across whatever UI
/// boundary is attached. Services are initialized in main.rs and passed here.
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub import_service: Arc<ImportService>,
    pub collection_service: Arc<CollectionService>,
    pub session_service: Arc<SessionService>,
    pub spotify: Arc<SpotifyClient>,
}
