//! Durable storage for the authentication credential.
//!
//! The service hands out an opaque bearer token on login; this store is the
//! only place it lives. Presence of a token is the whole authentication
//! signal — there is no client-side expiry or validation. The token is
//! persisted to a JSON file under the platform data directory so it
//! survives an app restart, and nothing else is ever persisted with it.

use crate::error::{Result, ResultExt as _, SculleryError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    token: Option<String>,
}

/// Holds the bearer token, read-through cached, write-through persisted.
///
/// Shared between the orchestrator (which decides when to set and clear)
/// and the transport layer (which only reads it to build the auth header),
/// usually behind an `Arc`.
pub struct SessionStore {
    path: PathBuf,
    token: Mutex<Option<String>>,
}

impl SessionStore {
    /// Opens the store at the default platform location
    /// (`<data_dir>/scullery/session.json`), loading any saved credential.
    pub fn open() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .ok_or_else(|| SculleryError::Session("no data directory available".to_owned()))?;
        let dir = base_dir.join("scullery");
        std::fs::create_dir_all(&dir).context("Failed to create session directory")?;
        Ok(Self::at_path(dir.join("session.json")))
    }

    /// Opens the store at an explicit path. A missing or unreadable file
    /// just means "not authenticated".
    pub fn at_path(path: PathBuf) -> Self {
        let token = if path.exists()
            && let Ok(content) = std::fs::read_to_string(&path)
            && let Ok(stored) = serde_json::from_str::<StoredSession>(&content)
        {
            stored.token
        } else {
            None
        };

        Self {
            path,
            token: Mutex::new(token),
        }
    }

    /// Persists a credential, overwriting any prior one.
    pub fn set(&self, token: &str) -> Result<()> {
        let stored = StoredSession {
            token: Some(token.to_owned()),
        };
        let content = serde_json::to_string_pretty(&stored)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        std::fs::write(&self.path, content).map_err(|e| {
            SculleryError::Session(format!("could not write {}: {e}", self.path.display()))
        })?;

        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_owned());
        }
        Ok(())
    }

    /// Returns the current credential, if any.
    pub fn get(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    /// Removes the credential. Idempotent: clearing an empty store is fine.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| {
                SculleryError::Session(format!("could not remove {}: {e}", self.path.display()))
            })?;
        }
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
        Ok(())
    }

    /// True iff a credential is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.lock().is_ok_and(|guard| guard.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::at_path(dir.path().join("session.json"))
    }

    #[test]
    fn test_set_get_clear() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        assert!(!store.is_authenticated());
        assert_eq!(store.get(), None);

        store.set("T1")?;
        assert!(store.is_authenticated());
        assert_eq!(store.get(), Some("T1".to_owned()));

        store.set("T2")?;
        assert_eq!(store.get(), Some("T2".to_owned()), "set overwrites");

        store.clear()?;
        assert!(!store.is_authenticated());
        Ok(())
    }

    #[test]
    fn test_survives_reopen() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");

        SessionStore::at_path(path.clone()).set("T1")?;

        let reopened = SessionStore::at_path(path);
        assert!(reopened.is_authenticated(), "credential survives restart");
        assert_eq!(reopened.get(), Some("T1".to_owned()));
        Ok(())
    }

    #[test]
    fn test_clear_is_idempotent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        store.set("T1")?;
        store.clear()?;
        store.clear()?;
        assert!(!store.is_authenticated());
        Ok(())
    }

    #[test]
    fn test_corrupt_file_means_logged_out() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json at all")?;

        let store = SessionStore::at_path(path);
        assert!(!store.is_authenticated());
        Ok(())
    }
}
