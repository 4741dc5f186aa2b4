// Client-side session manager
// Holds the bearer token, mirrors the server's idle window locally, and
// reacts to `sessionExpired` responses by clearing credentials

use super::storage::CredentialStore;
use crate::clock::Clock;
use crate::error::{AuthFailureBody, ClientError, NO_SESSION_MESSAGE};
use crate::models::{LoginRequest, LoginResponse};
use crate::session::IDLE_TIMEOUT_MS;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const TOKEN_KEY: &str = "token";
pub const LAST_ACTIVITY_KEY: &str = "lastActivity";
pub const SIGN_IN_PATH_KEY: &str = "signInPath";

pub struct ClientSessionManager {
    http: reqwest::Client,
    base_url: String,
    default_sign_in_path: String,
    store: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
    max_idle_ms: i64,
}

impl ClientSessionManager {
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_sign_in_path: "/signin".to_string(),
            store,
            clock,
            max_idle_ms: IDLE_TIMEOUT_MS,
        }
    }

    /// Sign-in path used until a server has announced its own
    pub fn with_sign_in_path(mut self, path: impl Into<String>) -> Self {
        self.default_sign_in_path = path.into();
        self
    }

    /// Where the user is sent after their session expires.
    /// The path returned at login wins over the configured default.
    pub fn sign_in_path(&self) -> String {
        self.store
            .get(SIGN_IN_PATH_KEY)
            .unwrap_or_else(|| self.default_sign_in_path.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sign in and start tracking the issued session
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.failure(response).await);
        }

        let body: LoginResponse = response.json().await?;
        self.store.set(SIGN_IN_PATH_KEY, &body.sign_in_path)?;
        self.start_session(&body.token)?;
        Ok(body)
    }

    /// Persist the bearer token and begin tracking activity
    pub fn start_session(&self, token: &str) -> Result<(), ClientError> {
        self.store.set(TOKEN_KEY, token)?;
        self.record_activity()?;
        info!("Client session started");
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    pub fn last_activity(&self) -> Option<i64> {
        self.store.get(LAST_ACTIVITY_KEY)?.parse().ok()
    }

    pub fn record_activity(&self) -> Result<(), ClientError> {
        self.store
            .set(LAST_ACTIVITY_KEY, &self.clock.now_ms().to_string())
    }

    /// Local view of the idle window, same strict comparison as the server
    pub fn is_locally_expired(&self) -> bool {
        match self.last_activity() {
            Some(last) => self.clock.now_ms() - last > self.max_idle_ms,
            None => true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && !self.is_locally_expired()
    }

    /// Drop all local credentials. The sign-in path is kept.
    pub fn clear(&self) -> Result<(), ClientError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(LAST_ACTIVITY_KEY)?;
        Ok(())
    }

    /// GET a protected resource with the bearer token
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let token = self.active_token()?;

        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.failure(response).await);
        }

        self.record_activity()?;
        Ok(response.json().await?)
    }

    /// Clear local credentials now and ask the server to destroy the
    /// session in the background. The request outcome is only logged.
    /// Outside a Tokio runtime only the local credentials are cleared.
    pub fn logout(&self) -> Option<JoinHandle<()>> {
        let token = self.token();

        if let Err(e) = self.clear() {
            warn!("Failed to clear local credentials: {}", e);
        }
        info!("Client logged out");

        let token = token?;
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("No async runtime, skipping server-side logout");
                return None;
            }
        };

        let request = self
            .http
            .post(self.url("/api/auth/logout"))
            .bearer_auth(token);

        Some(runtime.spawn(async move {
            match request.send().await {
                Ok(response) => debug!("Logout request returned {}", response.status()),
                Err(e) => debug!("Logout request failed: {}", e),
            }
        }))
    }

    fn active_token(&self) -> Result<String, ClientError> {
        match self.token() {
            Some(token) if !self.is_locally_expired() => Ok(token),
            _ => Err(self.expire(NO_SESSION_MESSAGE.to_string())),
        }
    }

    async fn failure(&self, response: reqwest::Response) -> ClientError {
        let status = response.status();

        match response.json::<AuthFailureBody>().await {
            Ok(body) if status == StatusCode::UNAUTHORIZED && body.session_expired => {
                self.expire(body.message)
            }
            Ok(body) => ClientError::Status {
                status: status.as_u16(),
                message: body.message,
            },
            Err(_) => ClientError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("").to_string(),
            },
        }
    }

    fn expire(&self, message: String) -> ClientError {
        if let Err(e) = self.clear() {
            warn!("Failed to clear local credentials: {}", e);
        }
        let redirect_to = self.sign_in_path();
        info!("Session expired, redirecting to {}", redirect_to);

        ClientError::SessionExpired {
            message,
            redirect_to,
        }
    }
}
