use std::collections::HashSet;

use keyring::Entry;
use tracing::warn;

use super::TokenStore;

/// Token store backed by the OS keychain.
///
/// Each key becomes a keyring entry under the configured service name.
/// The keychain cannot enumerate entries, so `clear` removes the keys
/// written through this instance.
pub struct KeyringTokenStore {
    service: String,
    written: HashSet<String>,
}

impl KeyringTokenStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            written: HashSet::new(),
        }
    }

    fn entry(&self, key: &str) -> Option<Entry> {
        match Entry::new(&self.service, key) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(key, error = %e, "Failed to create keyring entry");
                None
            }
        }
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entry(key)?.get_password().ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        let Some(entry) = self.entry(key) else {
            return;
        };
        match entry.set_password(value) {
            Ok(()) => {
                self.written.insert(key.to_string());
            }
            Err(e) => warn!(key, error = %e, "Failed to store entry in keychain"),
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(entry) = self.entry(key) {
            // Missing entries are fine; anything else is worth a log line.
            if let Err(e) = entry.delete_credential() {
                if !matches!(e, keyring::Error::NoEntry) {
                    warn!(key, error = %e, "Failed to delete entry from keychain");
                }
            }
        }
        self.written.remove(key);
    }

    fn clear(&mut self) {
        let keys: Vec<String> = self.written.drain().collect();
        for key in keys {
            if let Some(entry) = self.entry(&key) {
                if let Err(e) = entry.delete_credential() {
                    if !matches!(e, keyring::Error::NoEntry) {
                        warn!(key = %key, error = %e, "Failed to delete entry from keychain");
                    }
                }
            }
        }
    }
}
