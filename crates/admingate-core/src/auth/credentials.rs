use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::TokenStore;

/// Store key for remembered login credentials
pub const CREDENTIALS_KEY: &str = "credentials";

/// Login credentials, used only to obtain an [`Authentication`].
///
/// Persisted solely through [`CredentialStore`], which wraps the record so
/// it never reaches the store unencoded.
///
/// [`Authentication`]: super::Authentication
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Remember-me persistence for login credentials.
///
/// Entries live under the `"credentials"` key of the injected store as
/// base64-wrapped JSON, enabling auto-login when a UI shell starts with
/// no live session.
pub struct CredentialStore;

impl CredentialStore {
    /// Persist credentials for auto-login.
    pub fn store(store: &mut dyn TokenStore, credentials: &Credentials) {
        match serde_json::to_vec(credentials) {
            Ok(raw) => store.set(CREDENTIALS_KEY, &BASE64.encode(raw)),
            Err(e) => warn!(error = %e, "Failed to serialize credentials"),
        }
    }

    /// Load remembered credentials. An unparseable entry is purged and
    /// treated as absent.
    pub fn load(store: &mut dyn TokenStore) -> Option<Credentials> {
        let wrapped = store.get(CREDENTIALS_KEY)?;
        let parsed = BASE64
            .decode(wrapped.as_bytes())
            .ok()
            .and_then(|raw| serde_json::from_slice(&raw).ok());
        match parsed {
            Some(credentials) => Some(credentials),
            None => {
                warn!("Discarding unparseable stored credentials");
                store.remove(CREDENTIALS_KEY);
                None
            }
        }
    }

    /// Forget remembered credentials.
    pub fn clear(store: &mut dyn TokenStore) {
        store.remove(CREDENTIALS_KEY);
    }
}
