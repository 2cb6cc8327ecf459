//! Session storage for wizard tasks.
//!
//! Provides a trait-based abstraction over the per-session key-value store so
//! that handlers can load a task at the start of a request, mutate it, and
//! write it back explicitly:
//! - [`MemorySessionStore`] for tests and single-process deployments
//! - [`FileSessionStore`] for state that survives restarts
//!
//! Concurrent writers to the same key are not detected; the last write wins.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::wizard::Transition;

pub mod file;
pub mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

/// Slot the wizard task is stored under inside a session
pub const DEFAULT_SLOT: &str = "wizardTask";

static SESSION_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,128}$").expect("valid session id pattern"));

/// Errors specific to session storage
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("invalid session id '{0}'")]
    InvalidSessionId(String),

    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to (de)serialize session state: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Location of one stored blob: a session id and a slot within the session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionKey {
    session_id: String,
    slot: String,
}

impl SessionKey {
    /// Build a key, rejecting session ids that are not plain tokens
    pub fn new(session_id: &str, slot: &str) -> Result<Self, SessionError> {
        if !SESSION_ID_PATTERN.is_match(session_id) {
            return Err(SessionError::InvalidSessionId(session_id.to_string()));
        }
        if !SESSION_ID_PATTERN.is_match(slot) {
            return Err(SessionError::InvalidSessionId(slot.to_string()));
        }
        Ok(Self {
            session_id: session_id.to_string(),
            slot: slot.to_string(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.session_id, self.slot)
    }
}

/// Key-value store holding serialized session state
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Backend name for logs (e.g., "memory", "file")
    fn name(&self) -> &str;

    /// Read the blob stored under `key`, if any
    async fn load(&self, key: &SessionKey) -> Result<Option<String>, SessionError>;

    /// Replace the blob stored under `key`
    async fn save(&self, key: &SessionKey, blob: &str) -> Result<(), SessionError>;

    /// Delete the blob stored under `key`; missing keys are not an error
    async fn remove(&self, key: &SessionKey) -> Result<(), SessionError>;
}

/// Handle through which callers load and commit wizard tasks.
///
/// Cloning is cheap; all clones share the same store.
#[derive(Clone)]
pub struct TaskSessions {
    store: Arc<dyn SessionStore>,
    slot: String,
}

impl TaskSessions {
    pub fn new(store: Arc<dyn SessionStore>, slot: impl Into<String>) -> Self {
        Self {
            store,
            slot: slot.into(),
        }
    }

    /// Handle over a fresh in-memory store using the default slot
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()), DEFAULT_SLOT)
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Generate an id for a new session
    pub fn new_session_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn key(&self, session_id: &str) -> Result<SessionKey, SessionError> {
        SessionKey::new(session_id, &self.slot)
    }

    /// Load the task stored for `session_id`
    pub async fn load_task<T: DeserializeOwned>(
        &self,
        session_id: &str,
    ) -> Result<Option<T>, SessionError> {
        let key = self.key(session_id)?;
        match self.store.load(&key).await? {
            Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store `task` for `session_id`
    pub async fn save_task<T: Serialize + Sync>(
        &self,
        session_id: &str,
        task: &T,
    ) -> Result<(), SessionError> {
        let key = self.key(session_id)?;
        let blob = serde_json::to_string(task)?;
        self.store.save(&key, &blob).await?;
        tracing::debug!(
            key = %key,
            store = self.store.name(),
            bytes = blob.len(),
            "Saved session state"
        );
        Ok(())
    }

    /// Persist `task` if `transition` navigates somewhere.
    ///
    /// No-op transitions are returned untouched and nothing is written.
    pub async fn commit<T: Serialize + Sync>(
        &self,
        session_id: &str,
        task: &T,
        transition: Transition,
    ) -> Result<Transition, SessionError> {
        if !transition.is_navigation() {
            return Ok(transition);
        }
        self.save_task(session_id, task).await?;
        Ok(transition.mark_persisted())
    }

    /// Drop the task stored for `session_id`
    pub async fn discard(&self, session_id: &str) -> Result<(), SessionError> {
        let key = self.key(session_id)?;
        self.store.remove(&key).await?;
        tracing::debug!(key = %key, "Discarded session state");
        Ok(())
    }
}
