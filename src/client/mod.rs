// Client session management
// Token persistence and expiry handling for API consumers

pub mod manager;
pub mod storage;

pub use manager::{ClientSessionManager, LAST_ACTIVITY_KEY, SIGN_IN_PATH_KEY, TOKEN_KEY};
pub use storage::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
