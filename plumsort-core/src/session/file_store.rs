//! File-backed session store
//!
//! Sessions live in memory and are written to a single JSON file on every
//! change, so a restart can hydrate them and restore signed-in users.

use super::store::{Session, SessionStore};
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Session store persisted to a JSON file
#[derive(Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl FileSessionStore {
    /// Open the store, loading any sessions already on disk
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let sessions: HashMap<String, Session> = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read session file {}", path.display()))?;
            let list: Vec<Session> = if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content)
                    .with_context(|| format!("Corrupt session file {}", path.display()))?
            };
            list.into_iter().map(|s| (s.id.clone(), s)).collect()
        } else {
            HashMap::new()
        };

        log::info!("Loaded {} sessions from {}", sessions.len(), path.display());

        Ok(Self { path, sessions: Arc::new(RwLock::new(sessions)) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` and write the result to disk while holding the lock
    fn mutate<T>(&self, change: impl FnOnce(&mut HashMap<String, Session>) -> T) -> Result<T> {
        let mut sessions =
            self.sessions.write().map_err(|_| anyhow!("session store lock poisoned"))?;
        let out = change(&mut sessions);
        self.persist(&sessions)?;
        Ok(out)
    }

    fn persist(&self, sessions: &HashMap<String, Session>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut list: Vec<&Session> = sessions.values().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&list)?)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.read().map_err(|_| anyhow!("session store lock poisoned"))?;
        Ok(sessions.get(id).cloned())
    }

    async fn set(&self, session: Session) -> Result<()> {
        self.mutate(|sessions| {
            sessions.insert(session.id.clone(), session);
        })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.mutate(|sessions| {
            sessions.remove(id);
        })
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        let removed = self.mutate(|sessions| {
            let before = sessions.len();
            sessions.retain(|_, s| !s.is_expired());
            before - sessions.len()
        })?;

        if removed > 0 {
            log::info!("Cleaned up {} expired sessions", removed);
        }
        Ok(removed)
    }

    async fn count(&self) -> Result<usize> {
        let sessions = self.sessions.read().map_err(|_| anyhow!("session store lock poisoned"))?;
        Ok(sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::User;
    use chrono::{Duration, Utc};

    fn session(id: &str, role: &str, expires_in: Duration) -> Session {
        let user = User::new(format!("user-{}", id), "someone@example.com", "Someone", role);
        Session::new(id.to_string(), user, Utc::now() + expires_in)
    }

    #[tokio::test]
    async fn sessions_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/sessions.json");

        let store = FileSessionStore::open(&path).unwrap();
        store.set(session("tok-a", "admin", Duration::hours(1))).await.unwrap();
        store.set(session("tok-b", "farmer", Duration::hours(1))).await.unwrap();
        store.delete("tok-b").await.unwrap();

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
        let restored = reopened.get("tok-a").await.unwrap().unwrap();
        assert_eq!(restored.user.role, "admin");
    }

    #[tokio::test]
    async fn cleanup_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        let store = FileSessionStore::open(&path).unwrap();
        store.set(session("old", "farmer", Duration::seconds(-5))).await.unwrap();
        store.set(session("new", "farmer", Duration::hours(1))).await.unwrap();
        assert_eq!(store.cleanup_expired().await.unwrap(), 1);

        let reopened = FileSessionStore::open(&path).unwrap();
        assert!(!reopened.exists("old").await.unwrap());
        assert!(reopened.exists("new").await.unwrap());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(FileSessionStore::open(&path).is_err());
    }

    #[test]
    fn empty_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        std::fs::write(&path, "").unwrap();
        assert!(FileSessionStore::open(&path).is_ok());
    }
}
