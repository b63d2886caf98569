//! Session store and demo login.
//!
//! The store holds a single current-user record persisted across runs (the
//! browser-session analog). It is always injected as a dependency; nothing in
//! the crate reaches for an ambient global.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SessionError;

/// File name of the persisted session record.
pub const SESSION_FILE: &str = ".mylearningpal_session.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub email: String,
    pub name: String,
    pub role: String,
    pub logged_in_at: DateTime<Utc>,
}

/// Storage for the single current-user record.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<User>, SessionError>;
    fn save(&self, user: &User) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// JSON-file-backed store; survives process restarts.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `$HOME/.mylearningpal_session.json`, falling back to
    /// the working directory when HOME is unset.
    pub fn default_path() -> PathBuf {
        env::var("HOME")
            .map(|home| Path::new(&home).join(SESSION_FILE))
            .unwrap_or_else(|_| PathBuf::from(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<User>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        let user = serde_json::from_str(&raw)?;
        debug!(target = "learning_pal::auth", path = %self.path.display(), "session record loaded");
        Ok(Some(user))
    }

    fn save(&self, user: &User) -> Result<(), SessionError> {
        let raw = serde_json::to_string_pretty(user).map_err(SessionError::Corrupt)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<User>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<User>, SessionError> {
        Ok(self.slot.lock().unwrap().clone())
    }

    fn save(&self, user: &User) -> Result<(), SessionError> {
        *self.slot.lock().unwrap() = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

/// Current-user state over an injected [`SessionStore`]: read once at init,
/// mutated only by explicit login/logout.
pub struct AuthContext<S: SessionStore> {
    store: S,
    current: Option<User>,
}

impl<S: SessionStore> AuthContext<S> {
    pub fn init(store: S) -> Result<Self, SessionError> {
        let current = store.load()?;
        Ok(Self { store, current })
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Demo login: the record is fabricated from the email, not verified
    /// against any backend. The display name is the email's local part.
    pub fn login(&mut self, email: &str, _password: &str) -> Result<&User, SessionError> {
        let email = email.trim();
        let name = email.split('@').next().unwrap_or(email).to_string();
        let user = User {
            email: email.to_string(),
            name,
            role: "student".to_string(),
            logged_in_at: Utc::now(),
        };
        self.store.save(&user)?;
        info!(target = "learning_pal::auth", email = %user.email, "user logged in");
        Ok(self.current.insert(user))
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        if let Some(user) = self.current.take() {
            info!(target = "learning_pal::auth", email = %user.email, "user logged out");
        }
        Ok(())
    }
}
