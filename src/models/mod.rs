pub mod config;
pub mod user;

pub use config::{AppConfig, ServerConfig, SessionSettings};
pub use user::{LoginRequest, LoginResponse, MessageResponse, UserAccount, UserInfo, UserRole};
