// Optional periodic purge of idle sessions
// Expiry is otherwise detected lazily, when a request arrives for a stale session

use super::guard::SessionGuard;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawn a background task purging idle-expired sessions every `interval`
pub fn spawn_sweeper(guard: Arc<SessionGuard>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match guard.purge_expired().await {
                Ok(0) => {}
                Ok(count) => debug!("Sweeper purged {} idle sessions", count),
                Err(e) => warn!("Session sweep failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::session::storage::{MemorySessionStore, SessionStore};
    use crate::session::types::IDLE_TIMEOUT_MS;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_on_tick() {
        let store = Arc::new(MemorySessionStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let guard = Arc::new(SessionGuard::new(store.clone(), clock.clone()));

        guard.start_session("u1").await.unwrap();
        clock.advance(IDLE_TIMEOUT_MS + 1);

        let handle = spawn_sweeper(guard, Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert_eq!(store.len().await.unwrap(), 0);
        handle.abort();
    }
}
