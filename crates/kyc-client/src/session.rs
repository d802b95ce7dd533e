//! Admin session gate
//!
//! A fixed username/password pair checked on the client, remembered as a
//! single boolean flag. This keeps casual visitors away from the listing
//! and nothing more: anyone who can call the listing endpoint directly
//! sees the same data.

use kyc_common::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Key of the persisted login flag
pub const LOGIN_FLAG_KEY: &str = "isLoggedIn";

/// A username/password pair
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// Where the login flag lives between runs
pub trait SessionStore {
    fn is_logged_in(&self) -> Result<bool>;
    fn set_logged_in(&self) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Login flag kept in a small JSON file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn is_logged_in(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        let content = std::fs::read(&self.path)?;
        match serde_json::from_slice::<Value>(&content) {
            Ok(state) => Ok(state.get(LOGIN_FLAG_KEY).and_then(Value::as_bool) == Some(true)),
            Err(e) => {
                warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(false)
            }
        }
    }

    fn set_logged_in(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut state = Map::new();
        state.insert(LOGIN_FLAG_KEY.to_string(), Value::Bool(true));
        let content = serde_json::to_vec_pretty(&state)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process login flag
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    logged_in: AtomicBool,
}

impl SessionStore for MemorySessionStore {
    fn is_logged_in(&self) -> Result<bool> {
        Ok(self.logged_in.load(Ordering::SeqCst))
    }

    fn set_logged_in(&self) -> Result<()> {
        self.logged_in.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.logged_in.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Proof of a successful admin login
///
/// Only obtainable through [`AdminSession::login`] or
/// [`AdminSession::restore`]; operations that need the gate take it by
/// reference.
#[derive(Debug)]
pub struct AdminSession {
    _private: (),
}

impl AdminSession {
    /// Check an attempt against the expected pair and persist the flag
    pub fn login(
        expected: &AdminCredentials,
        attempt: &AdminCredentials,
        store: &dyn SessionStore,
    ) -> Result<Self> {
        if expected != attempt {
            warn!("Rejected admin login for '{}'", attempt.username);
            return Err(Error::InvalidCredentials);
        }

        store.set_logged_in()?;
        info!("Admin '{}' logged in", attempt.username);
        Ok(Self { _private: () })
    }

    /// Recreate the session from a previously stored flag
    pub fn restore(store: &dyn SessionStore) -> Result<Option<Self>> {
        Ok(store.is_logged_in()?.then_some(Self { _private: () }))
    }

    /// Like [`AdminSession::restore`], failing when no flag is stored
    pub fn require(store: &dyn SessionStore) -> Result<Self> {
        Self::restore(store)?.ok_or(Error::NotLoggedIn)
    }

    /// End the session and forget the flag
    pub fn logout(self, store: &dyn SessionStore) -> Result<()> {
        store.clear()?;
        info!("Admin logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected() -> AdminCredentials {
        AdminCredentials::new("admin", "password")
    }

    #[test]
    fn test_login_sets_flag() {
        let store = MemorySessionStore::default();
        let session = AdminSession::login(&expected(), &expected(), &store);
        assert!(session.is_ok());
        assert!(store.is_logged_in().unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let store = MemorySessionStore::default();
        let attempt = AdminCredentials::new("admin", "hunter2");

        let result = AdminSession::login(&expected(), &attempt, &store);
        assert!(matches!(result, Err(Error::InvalidCredentials)));
        assert_eq!(result.unwrap_err().to_string(), "Invalid credentials");
        assert!(!store.is_logged_in().unwrap());
    }

    #[test]
    fn test_restore_and_logout() {
        let store = MemorySessionStore::default();
        assert!(AdminSession::restore(&store).unwrap().is_none());
        assert!(matches!(
            AdminSession::require(&store),
            Err(Error::NotLoggedIn)
        ));

        AdminSession::login(&expected(), &expected(), &store).unwrap();
        let session = AdminSession::restore(&store).unwrap().unwrap();
        session.logout(&store).unwrap();

        assert!(AdminSession::restore(&store).unwrap().is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        assert!(!store.is_logged_in().unwrap());
        store.set_logged_in().unwrap();
        assert!(store.is_logged_in().unwrap());

        let raw: Value = serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw[LOGIN_FLAG_KEY], true);

        store.clear().unwrap();
        assert!(!store.is_logged_in().unwrap());
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_ignores_false_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"isLoggedIn": false}"#).unwrap();

        assert!(!FileSessionStore::new(path).is_logged_in().unwrap());
    }

    #[test]
    fn test_file_store_unreadable_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        std::fs::write(store.path(), "{isLoggedIn:").unwrap();

        assert!(!store.is_logged_in().unwrap());
        assert!(matches!(
            AdminSession::require(&store),
            Err(Error::NotLoggedIn)
        ));

        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", AdminCredentials::new("admin", "s3cret"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("s3cret"));
    }
}
