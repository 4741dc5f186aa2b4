use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::SessionError;
use crate::session::SessionContext;

/// Resolve the session key from the session cookie or a bearer token.
/// The cookie wins when both are present.
pub fn extract_session_key(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    cookie_value(headers, cookie_name).or_else(|| bearer_token(headers))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, v)| *k == name && !v.is_empty())
        .map(|(_, v)| v.to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// `Set-Cookie` value carrying a session key
pub fn session_cookie(name: &str, key: &str) -> String {
    format!("{}={}; HttpOnly; Path=/; SameSite=Lax", name, key)
}

/// `Set-Cookie` value clearing the session cookie
pub fn cleared_session_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0", name)
}

/// Destroy and reject sessions idle past the timeout.
///
/// Must run before `session_auth`, which renews the session.
pub async fn check_session_timeout(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, SessionError> {
    let key = extract_session_key(request.headers(), &state.config.session.cookie_name);
    let mut ctx = state.guard.load(key.as_deref()).await?;

    state.guard.enforce_idle_timeout(&mut ctx).await?;

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Require a session with a subject and renew it.
/// Attaches `AuthSession` and the refreshed `SessionContext` to the request.
pub async fn session_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, SessionError> {
    let mut ctx = match request.extensions_mut().remove::<SessionContext>() {
        Some(ctx) => ctx,
        None => {
            let key = extract_session_key(request.headers(), &state.config.session.cookie_name);
            state.guard.load(key.as_deref()).await?
        }
    };

    let auth = state.guard.authenticate(&mut ctx).await?;

    request.extensions_mut().insert(auth);
    request.extensions_mut().insert(ctx);

    Ok(next.run(request).await)
}
