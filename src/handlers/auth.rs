use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::SessionError;
use crate::middleware::{cleared_session_cookie, extract_session_key, session_cookie};
use crate::models::{LoginRequest, LoginResponse, MessageResponse, UserInfo};

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, SessionError> {
    let account = state
        .config
        .find_user_by_email(&payload.email)
        .ok_or(SessionError::InvalidCredentials)?;

    let is_valid = bcrypt::verify(&payload.password, &account.password_hash).unwrap_or_else(|e| {
        warn!("Password verification failed for {}: {}", account.id, e);
        false
    });

    if !is_valid {
        info!("Rejected login for {}", payload.email);
        return Err(SessionError::InvalidCredentials);
    }

    let session = state.guard.start_session(&account.id).await?;
    let cookie = session_cookie(&state.config.session.cookie_name, &session.key);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            token: session.key,
            user: UserInfo::from(account),
            sign_in_path: state.config.session.sign_in_path.clone(),
        }),
    )
        .into_response())
}

/// Destroy the referenced session, if any. Never requires a live session.
/// A store failure is logged and the client is still logged out.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let cookie_name = &state.config.session.cookie_name;

    if let Some(key) = extract_session_key(&headers, cookie_name)
        && let Err(e) = state.guard.logout(&key).await
    {
        warn!("Failed to destroy session {} on logout: {}", key, e);
    }

    (
        [(header::SET_COOKIE, cleared_session_cookie(cookie_name))],
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
        .into_response()
}
