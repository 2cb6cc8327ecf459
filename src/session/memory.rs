//! In-process session store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SessionError, SessionKey, SessionStore};

/// Session store backed by a map in memory; contents are lost on restart
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<SessionKey, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self, key: &SessionKey) -> Result<Option<String>, SessionError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn save(&self, key: &SessionKey, blob: &str) -> Result<(), SessionError> {
        self.entries
            .write()
            .await
            .insert(key.clone(), blob.to_string());
        Ok(())
    }

    async fn remove(&self, key: &SessionKey) -> Result<(), SessionError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
