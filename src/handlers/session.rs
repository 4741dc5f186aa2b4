use axum::{Extension, Json, extract::State};

use crate::app::AppState;
use crate::error::SessionError;
use crate::session::{SessionContext, SessionStatus};

/// Freshness of the caller's session, after this request renewed it
pub async fn session_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<Json<SessionStatus>, SessionError> {
    let session = ctx.session.as_ref().ok_or(SessionError::NoSession)?;
    Ok(Json(state.guard.status(session)))
}
