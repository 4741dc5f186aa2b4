// Session storage backends

use super::types::Session;
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Keyed session store capability
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session under its key
    async fn create(&self, session: Session) -> Result<(), StoreError>;

    /// Get a session by key
    async fn get(&self, key: &str) -> Result<Option<Session>, StoreError>;

    /// Set `last_activity` on an existing session
    async fn touch(&self, key: &str, now_ms: i64) -> Result<(), StoreError>;

    /// Remove a session. Missing keys are not an error.
    async fn destroy(&self, key: &str) -> Result<(), StoreError>;

    /// Remove every session idle for longer than `max_idle_ms`
    async fn purge_idle(&self, now_ms: i64, max_idle_ms: i64) -> Result<usize, StoreError>;

    /// Number of stored sessions
    async fn len(&self) -> Result<usize, StoreError>;
}

/// In-memory session store
#[derive(Clone)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: Session) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        info!(
            "Creating session {} for user {}",
            session.key,
            session.user_id.as_deref().unwrap_or("<anonymous>")
        );
        sessions.insert(session.key.clone(), session);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Session>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(key).cloned())
    }

    async fn touch(&self, key: &str, now_ms: i64) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(key) {
            session.renew(now_ms);
        }
        Ok(())
    }

    async fn destroy(&self, key: &str) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(key).is_some() {
            debug!("Destroyed session {}", key);
        }
        Ok(())
    }

    async fn purge_idle(&self, now_ms: i64, max_idle_ms: i64) -> Result<usize, StoreError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, session| !session.is_idle_expired(now_ms, max_idle_ms));

        let count = before - sessions.len();
        if count > 0 {
            debug!("Purged {} idle sessions", count);
        }

        Ok(count)
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.sessions.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::IDLE_TIMEOUT_MS;

    #[tokio::test]
    async fn test_create_and_get_session() {
        let store = MemorySessionStore::new();
        let session = Session::new(Some("user-123".to_string()), 1_000);
        let key = session.key.clone();

        store.create(session).await.unwrap();

        let retrieved = store.get(&key).await.unwrap();
        assert_eq!(retrieved.unwrap().user_id.as_deref(), Some("user-123"));
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_touch_updates_last_activity() {
        let store = MemorySessionStore::new();
        let session = Session::new(Some("user-123".to_string()), 1_000);
        let key = session.key.clone();
        store.create(session).await.unwrap();

        store.touch(&key, 9_000).await.unwrap();

        let touched = store.get(&key).await.unwrap().unwrap();
        assert_eq!(touched.last_activity, 9_000);
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let store = MemorySessionStore::new();
        let session = Session::new(Some("user-123".to_string()), 1_000);
        let key = session.key.clone();
        store.create(session).await.unwrap();

        store.destroy(&key).await.unwrap();
        store.destroy(&key).await.unwrap();

        assert!(store.get(&key).await.unwrap().is_none());
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purge_idle_keeps_fresh_sessions() {
        let store = MemorySessionStore::new();

        store
            .create(Session::new(Some("stale".to_string()), 0))
            .await
            .unwrap();
        store
            .create(Session::new(Some("edge".to_string()), 1))
            .await
            .unwrap();
        store
            .create(Session::new(Some("fresh".to_string()), 1_000_000))
            .await
            .unwrap();

        let purged = store
            .purge_idle(IDLE_TIMEOUT_MS + 1, IDLE_TIMEOUT_MS)
            .await
            .unwrap();

        assert_eq!(purged, 1);
        assert_eq!(store.len().await.unwrap(), 2);
    }
}
