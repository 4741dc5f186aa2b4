use axum::{Extension, Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::app::AppState;
use crate::models::UserInfo;
use crate::session::AuthSession;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> Result<Json<UserInfo>, (StatusCode, Json<Value>)> {
    let account = state.config.find_user(&auth.user_id).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "message": "User not found"
            })),
        )
    })?;

    Ok(Json(UserInfo::from(account)))
}
