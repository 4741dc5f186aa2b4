use super::user::UserAccount;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub users: Vec<UserAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Session transport settings. The idle timeout itself is fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Where clients are sent to sign in again
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,
    /// Periodic purge of idle sessions; absent means lazy expiry only
    #[serde(default)]
    pub sweep_interval_secs: Option<u64>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cookie_name() -> String {
    "sid".to_string()
}

fn default_sign_in_path() -> String {
    "/signin".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            sign_in_path: default_sign_in_path(),
            sweep_interval_secs: None,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("Invalid listen address: {}", e)))
    }
}

impl AppConfig {
    /// Find an account by email (case-insensitive)
    pub fn find_user_by_email(&self, email: &str) -> Option<&UserAccount> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn find_user(&self, user_id: &str) -> Option<&UserAccount> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;

        if self.session.cookie_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "session.cookie_name must not be empty".to_string(),
            ));
        }

        if !self.session.sign_in_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "session.sign_in_path '{}' must start with '/'",
                self.session.sign_in_path
            )));
        }

        if self.session.sweep_interval_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "session.sweep_interval_secs must be greater than zero".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        let mut emails = HashSet::new();
        for user in &self.users {
            if !ids.insert(user.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "Duplicate user id '{}'",
                    user.id
                )));
            }
            if !emails.insert(user.email.to_lowercase()) {
                return Err(ConfigError::Invalid(format!(
                    "Duplicate user email '{}'",
                    user.email
                )));
            }
        }

        Ok(())
    }
}
