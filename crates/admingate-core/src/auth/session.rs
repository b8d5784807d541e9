use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::store::TokenStore;

/// Store key for the persisted session entry
pub const AUTH_KEY: &str = "authentication";

/// A successful authentication as returned by the login endpoint and as
/// persisted in the token store.
///
/// Validity is a pure function of the record: the session is live while
/// `now - last_access_time < expires`. Nothing else is consulted, so a
/// page reload or a second consumer of the same store reaches the same
/// verdict without shared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authentication {
    pub token: String,
    /// Relative validity window, in seconds.
    pub expires: i64,
    /// Unix timestamp (seconds) of the last use of this session.
    #[serde(rename = "lastAccessTime")]
    pub last_access_time: i64,
    /// Opaque user-profile payload attached by the login endpoint.
    #[serde(default)]
    pub details: Value,
}

impl Authentication {
    pub fn is_valid_at(&self, now: i64) -> bool {
        now - self.last_access_time < self.expires
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now().timestamp())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// No valid session in memory or storage. Never retried here; the
    /// caller redirects to login.
    #[error("not authenticated - login required")]
    Unauthenticated,
}

/// Owns the authentication state machine: `LoggedOut` when `current` is
/// empty, `Authenticated` otherwise.
///
/// All writes to the live session go through `login`, `logout` and the
/// adopt-on-read step inside `auth_token`. The manager itself is not
/// synchronized; on a multi-threaded runtime wrap it in a mutex.
pub struct SessionManager {
    store: Box<dyn TokenStore>,
    current: Option<Authentication>,
}

impl SessionManager {
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Establish a session, overwriting any prior one in memory and in
    /// the store.
    pub fn login(&mut self, authentication: Authentication) {
        self.persist(&authentication);
        self.current = Some(authentication);
        info!("session established");
    }

    /// Drop the session from memory and remove the persisted entry.
    /// Telling the server is the API client's job and is best-effort.
    pub fn logout(&mut self) {
        self.current = None;
        self.store.remove(AUTH_KEY);
        info!("session cleared");
    }

    /// The bearer token for authenticated requests.
    ///
    /// An in-memory session answers immediately. Otherwise a still-valid
    /// stored session is adopted: its `last_access_time` is bumped to now
    /// and the refreshed record is written back, so other consumers of the
    /// store see the extended window. With no recoverable session this
    /// fails with [`AuthError::Unauthenticated`].
    pub fn auth_token(&mut self) -> Result<String, AuthError> {
        if let Some(auth) = &self.current {
            return Ok(auth.token.clone());
        }
        match self.load_from_storage() {
            Some(mut auth) => {
                auth.last_access_time = Utc::now().timestamp();
                self.persist(&auth);
                let token = auth.token.clone();
                self.current = Some(auth);
                debug!("session adopted from storage");
                Ok(token)
            }
            None => Err(AuthError::Unauthenticated),
        }
    }

    /// Whether a live session exists in memory or could be loaded from
    /// storage. Does not adopt or refresh anything; callers that want the
    /// side-effecting refresh use [`auth_token`](Self::auth_token).
    pub fn is_logged(&mut self) -> bool {
        self.current.is_some() || self.load_from_storage().is_some()
    }

    /// Read the persisted session, if any.
    ///
    /// Absent, unparseable and expired entries all yield `None` — the
    /// latter two after purging the entry, so a bad record is never
    /// consulted twice. A returned `Authentication` is unchanged; bumping
    /// `last_access_time` is the caller's move.
    pub fn load_from_storage(&mut self) -> Option<Authentication> {
        let raw = self.store.get(AUTH_KEY)?;
        let auth: Authentication = match serde_json::from_str(&raw) {
            Ok(auth) => auth,
            Err(e) => {
                warn!(error = %e, "Discarding unparseable stored session");
                self.store.remove(AUTH_KEY);
                return None;
            }
        };
        if !auth.is_valid() {
            debug!("stored session expired; purging");
            self.store.remove(AUTH_KEY);
            return None;
        }
        Some(auth)
    }

    /// The in-memory session, if authenticated.
    pub fn current(&self) -> Option<&Authentication> {
        self.current.as_ref()
    }

    /// The underlying store, for entries that share the session's
    /// persistence medium (e.g. remembered credentials).
    pub fn store_mut(&mut self) -> &mut dyn TokenStore {
        self.store.as_mut()
    }

    fn persist(&mut self, auth: &Authentication) {
        match serde_json::to_string(auth) {
            Ok(raw) => self.store.set(AUTH_KEY, &raw),
            Err(e) => warn!(error = %e, "Failed to serialize session"),
        }
    }
}
