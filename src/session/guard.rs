// Session guard: sliding-expiration checks for protected requests

use super::storage::SessionStore;
use super::types::{AuthSession, IDLE_TIMEOUT_MS, Session, SessionContext, SessionStatus};
use crate::clock::Clock;
use crate::error::SessionError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Gatekeeper for session presence and freshness
pub struct SessionGuard {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    max_idle_ms: i64,
}

impl SessionGuard {
    /// Create a guard with the fixed 30 minute idle timeout
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            max_idle_ms: IDLE_TIMEOUT_MS,
        }
    }

    pub fn max_idle_ms(&self) -> i64 {
        self.max_idle_ms
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Issue a session for a freshly authenticated subject
    pub async fn start_session(&self, user_id: &str) -> Result<Session, SessionError> {
        let session = Session::new(Some(user_id.to_string()), self.clock.now_ms());
        self.store.create(session.clone()).await?;

        info!("Started session {} for user {}", session.key, user_id);
        Ok(session)
    }

    /// Resolve the session referenced by a request
    pub async fn load(&self, key: Option<&str>) -> Result<SessionContext, SessionError> {
        let Some(key) = key else {
            return Ok(SessionContext::empty());
        };

        let session = self.store.get(key).await?;
        Ok(SessionContext {
            key: Some(key.to_string()),
            session,
        })
    }

    /// Admit the request if the session carries a subject, renewing it.
    ///
    /// Every successful call moves `last_activity` forward; there is no
    /// separate refresh operation. A failed renewal write is logged and
    /// the request still proceeds.
    pub async fn authenticate(
        &self,
        ctx: &mut SessionContext,
    ) -> Result<AuthSession, SessionError> {
        let Some(session) = ctx.session.as_mut() else {
            debug!("Rejecting request without a session");
            return Err(SessionError::NoSession);
        };

        let Some(user_id) = session.user_id.clone() else {
            debug!("Rejecting session {} without a subject", session.key);
            return Err(SessionError::NoSession);
        };

        let last_activity = session.renew(self.clock.now_ms());

        if let Err(e) = self.store.touch(&session.key, last_activity).await {
            warn!("Failed to renew session {}: {}", session.key, e);
        }

        debug!("Renewed session {} for user {}", session.key, user_id);

        Ok(AuthSession {
            session_key: session.key.clone(),
            user_id,
            last_activity,
        })
    }

    /// Reject and destroy the session once it has been idle too long.
    ///
    /// Does not renew the session. Requests without a session pass
    /// through untouched so `authenticate` can reject them.
    pub async fn enforce_idle_timeout(&self, ctx: &mut SessionContext) -> Result<(), SessionError> {
        let Some(session) = ctx.session.as_ref() else {
            return Ok(());
        };

        let now = self.clock.now_ms();
        if !session.is_idle_expired(now, self.max_idle_ms) {
            return Ok(());
        }

        info!(
            "Session {} expired after {} ms idle",
            session.key,
            session.idle_ms(now)
        );

        // Cleanup failure never changes the response
        if let Err(e) = self.store.destroy(&session.key).await {
            warn!("Failed to destroy expired session {}: {}", session.key, e);
        }

        ctx.session = None;
        Err(SessionError::IdleTimeoutExceeded)
    }

    /// Destroy a session on explicit logout
    pub async fn logout(&self, key: &str) -> Result<(), SessionError> {
        self.store.destroy(key).await?;
        info!("Session {} logged out", key);
        Ok(())
    }

    /// Freshness of a session as of now
    pub fn status(&self, session: &Session) -> SessionStatus {
        let idle = session.idle_ms(self.clock.now_ms());

        SessionStatus {
            user_id: session.user_id.clone(),
            last_activity: session.last_activity,
            idle_timeout_ms: self.max_idle_ms,
            expires_in_ms: (self.max_idle_ms - idle).max(0),
        }
    }

    /// Remove all idle-expired sessions from the store
    pub async fn purge_expired(&self) -> Result<usize, SessionError> {
        let count = self
            .store
            .purge_idle(self.clock.now_ms(), self.max_idle_ms)
            .await?;
        Ok(count)
    }
}
