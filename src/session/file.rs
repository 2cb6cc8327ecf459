//! File-backed session store.
//!
//! Layout: `{root}/{session_id}/{slot}.json`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use super::{SessionError, SessionKey, SessionStore};

/// Session store writing one JSON file per session slot
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &SessionKey) -> PathBuf {
        self.root
            .join(key.session_id())
            .join(format!("{}.json", key.slot()))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self, key: &SessionKey) -> Result<Option<String>, SessionError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &SessionKey, blob: &str) -> Result<(), SessionError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Each writer gets its own sibling file; the rename is the commit point
        let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        if let Err(e) = tokio::fs::write(&tmp, blob).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn remove(&self, key: &SessionKey) -> Result<(), SessionError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        // Drop the session directory once its last slot is gone
        let dir = self.root.join(key.session_id());
        if let Ok(mut entries) = tokio::fs::read_dir(&dir).await {
            if matches!(entries.next_entry().await, Ok(None)) {
                let _ = tokio::fs::remove_dir(&dir).await;
            }
        }
        Ok(())
    }
}
