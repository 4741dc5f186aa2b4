use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::clock::Clock;
use crate::handlers;
use crate::middleware::{check_session_timeout, session_auth};
use crate::models::AppConfig;
use crate::session::{SessionGuard, SessionStore};

/// Shared state for handlers and guard middleware
#[derive(Clone)]
pub struct AppState {
    pub guard: Arc<SessionGuard>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            guard: Arc::new(SessionGuard::new(store, clock)),
            config,
        }
    }
}

/// Build the HTTP router
pub fn build_router(state: AppState) -> Router {
    // Idle check runs first so renewal cannot mask an expired session
    let guarded = ServiceBuilder::new()
        .layer(from_fn_with_state(state.clone(), check_session_timeout))
        .layer(from_fn_with_state(state.clone(), session_auth));

    let protected = Router::new()
        .route("/api/session", get(handlers::session::session_status))
        .route("/api/me", get(handlers::user::get_profile))
        .route_layer(guarded);

    Router::new()
        .route("/", get(handlers::health::health_check))
        .route("/health", get(handlers::health::health_check))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .merge(protected)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
