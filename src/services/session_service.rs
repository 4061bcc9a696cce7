// src/services/session_service.rs

use std::sync::Arc;

use crate::domain::Credential;
use crate::error::AppResult;
use crate::events::{EventBus, SessionAuthenticated, SessionCleared};
use crate::integrations::{parse_credential_from_fragment, AccessTokenProvider};
use crate::repositories::CredentialRepository;

/// Holds the catalog credential and gates every privileged action.
///
/// Expiry is evaluated lazily on every read: reading an expired credential
/// clears the stored slot and reports "absent". There is no background
/// refresh — re-authentication fully replaces the credential.
pub struct SessionService {
    credential_repo: Arc<dyn CredentialRepository>,
    event_bus: Arc<EventBus>,
}

impl SessionService {
    pub fn new(credential_repo: Arc<dyn CredentialRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            credential_repo,
            event_bus,
        }
    }

    /// Current credential, or absent.
    /// Side effect: an expired credential is removed from storage here.
    pub fn get(&self) -> AppResult<Option<Credential>> {
        match self.credential_repo.get()? {
            Some(credential) if credential.is_expired() => {
                log::info!("Catalog credential expired; clearing session");
                self.credential_repo.clear()?;
                self.event_bus.emit(SessionCleared::new(true));
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub fn is_authenticated(&self) -> AppResult<bool> {
        Ok(self.get()?.is_some())
    }

    /// Store a freshly obtained credential, replacing any previous one
    pub fn save(&self, credential: Credential) -> AppResult<()> {
        let expires_at = credential.expires_at;
        self.credential_repo.save(&credential)?;
        self.event_bus.emit(SessionAuthenticated::new(expires_at));
        Ok(())
    }

    /// Explicit sign-out
    pub fn clear(&self) -> AppResult<()> {
        self.credential_repo.clear()?;
        self.event_bus.emit(SessionCleared::new(false));
        Ok(())
    }

    /// Complete the redirect flow: parse the URL fragment the catalog
    /// service redirected with and store the resulting credential.
    /// Returns whether a credential was found in the fragment.
    pub fn authenticate_from_fragment(&self, fragment: &str) -> AppResult<bool> {
        match parse_credential_from_fragment(fragment) {
            Some(credential) => {
                self.save(credential)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl AccessTokenProvider for SessionService {
    fn access_token(&self) -> AppResult<Option<String>> {
        Ok(self.get()?.map(|credential| credential.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::repositories::SqliteCredentialRepository;
    use chrono::{Duration, Utc};

    fn service() -> (SessionService, Arc<dyn CredentialRepository>) {
        let pool = Arc::new(create_test_pool());
        let repo: Arc<dyn CredentialRepository> =
            Arc::new(SqliteCredentialRepository::new(pool));
        let bus = Arc::new(EventBus::new());
        (SessionService::new(repo.clone(), bus), repo)
    }

    #[test]
    fn test_no_credential_means_unauthenticated() {
        let (service, _) = service();
        assert!(!service.is_authenticated().unwrap());
    }

    #[test]
    fn test_valid_credential_authenticates() {
        let (service, _) = service();
        service
            .save(Credential::new(
                "tok".to_string(),
                Utc::now() + Duration::hours(1),
            ))
            .unwrap();

        assert!(service.is_authenticated().unwrap());
        assert_eq!(service.access_token().unwrap().unwrap(), "tok");
    }

    #[test]
    fn test_expired_credential_is_cleared_on_read() {
        let (service, repo) = service();
        repo.save(&Credential::new(
            "stale".to_string(),
            Utc::now() - Duration::seconds(1),
        ))
        .unwrap();

        assert!(!service.is_authenticated().unwrap());
        // The lazy expiry check removed the stored credential
        assert!(repo.get().unwrap().is_none());
    }

    #[test]
    fn test_reauthentication_replaces_credential() {
        let (service, _) = service();
        service
            .save(Credential::new(
                "first".to_string(),
                Utc::now() + Duration::hours(1),
            ))
            .unwrap();
        service
            .save(Credential::new(
                "second".to_string(),
                Utc::now() + Duration::hours(2),
            ))
            .unwrap();

        assert_eq!(service.access_token().unwrap().unwrap(), "second");
    }

    #[test]
    fn test_authenticate_from_fragment() {
        let (service, _) = service();

        let stored = service
            .authenticate_from_fragment("#access_token=tok123&token_type=Bearer&expires_in=3600")
            .unwrap();
        assert!(stored);
        assert!(service.is_authenticated().unwrap());

        let stored = service.authenticate_from_fragment("#error=access_denied").unwrap();
        assert!(!stored);
    }

    #[test]
    fn test_clear_signs_out() {
        let (service, _) = service();
        service
            .save(Credential::new(
                "tok".to_string(),
                Utc::now() + Duration::hours(1),
            ))
            .unwrap();

        service.clear().unwrap();
        assert!(!service.is_authenticated().unwrap());
    }
}
