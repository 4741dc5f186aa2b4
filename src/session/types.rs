// Session types and data structures

use serde::{Deserialize, Serialize};

/// Maximum gap between authenticated requests (30 minutes)
pub const IDLE_TIMEOUT_MS: i64 = 1_800_000;

/// Server-side session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque session key, also handed out as the bearer token
    pub key: String,
    /// Authenticated subject, absent for anonymous sessions
    pub user_id: Option<String>,
    /// Epoch milliseconds of the last authenticated request
    pub last_activity: i64,
    /// Epoch milliseconds at creation
    pub created_at: i64,
}

impl Session {
    /// Create a new session for a subject
    pub fn new(user_id: Option<String>, now_ms: i64) -> Self {
        Self {
            key: uuid::Uuid::new_v4().to_string(),
            user_id,
            last_activity: now_ms,
            created_at: now_ms,
        }
    }

    /// Milliseconds since the last authenticated request
    pub fn idle_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.last_activity
    }

    /// Idle time strictly greater than the budget means expired
    pub fn is_idle_expired(&self, now_ms: i64, max_idle_ms: i64) -> bool {
        self.idle_ms(now_ms) > max_idle_ms
    }

    /// Move `last_activity` forward; never moves it backwards
    pub fn renew(&mut self, now_ms: i64) -> i64 {
        self.last_activity = self.last_activity.max(now_ms);
        self.last_activity
    }
}

/// Session reference and record resolved for one request
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub key: Option<String>,
    pub session: Option<Session>,
}

impl SessionContext {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Subject attached to a request that passed the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub session_key: String,
    pub user_id: String,
    pub last_activity: i64,
}

/// Snapshot of a session's freshness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub user_id: Option<String>,
    pub last_activity: i64,
    pub idle_timeout_ms: i64,
    pub expires_in_ms: i64,
}
