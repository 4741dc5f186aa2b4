// Session management module
// Provides the sliding-expiration session guard and its storage backends

pub mod guard;
pub mod storage;
pub mod sweeper;
pub mod types;

pub use guard::SessionGuard;
pub use storage::{MemorySessionStore, SessionStore};
pub use sweeper::spawn_sweeper;
pub use types::{AuthSession, IDLE_TIMEOUT_MS, Session, SessionContext, SessionStatus};
