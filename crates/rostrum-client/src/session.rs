//! Session persisted between runs

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use rostrum_core::User;

use crate::error::{ClientError, ClientResult};

/// What is remembered about the logged-in user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Value of the session cookie
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Cached profile, saves a request on start-up
    #[serde(default)]
    pub user: Option<User>,
}

/// JSON file holding the [`Session`]
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the session. A missing file is an empty session.
    pub async fn load(&self) -> ClientResult<Session> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Session::default()),
            Err(e) => return Err(self.error("read", e)),
        };
        serde_json::from_str(&raw).map_err(|e| self.error("parse", e))
    }

    pub async fn save(&self, session: &Session) -> ClientResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| self.error("create directory for", e))?;
        }
        let raw = serde_json::to_string_pretty(session).map_err(|e| self.error("encode", e))?;
        fs::write(&self.path, raw)
            .await
            .map_err(|e| self.error("write", e))?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Forget the session. Clearing an absent session is not an error.
    pub async fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.error("remove", e)),
        }
    }

    fn error(&self, action: &str, e: impl std::fmt::Display) -> ClientError {
        ClientError::Session(format!("failed to {action} {}: {e}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 3,
            user_name: "sam".to_string(),
            full_name: Some("Sam Lee".to_string()),
            admin: false,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert_eq!(store.load().await.unwrap(), Session::default());
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        let session = Session {
            user_id: Some(3),
            user: Some(user()),
        };

        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), session);

        store.clear().await.unwrap();
        assert!(!store.path().exists());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_session_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        let err = SessionStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, ClientError::Session(_)));
    }
}
