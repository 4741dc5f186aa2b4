use session_guard_api::app::{AppState, build_router};
use session_guard_api::clock::SystemClock;
use session_guard_api::config;
use session_guard_api::models::AppConfig;
use session_guard_api::session::{IDLE_TIMEOUT_MS, MemorySessionStore, spawn_sweeper};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "session_guard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = match config::load_config_with_fallback() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                "Failed to load configuration: {}. Starting with defaults and no accounts.",
                e
            );
            Arc::new(AppConfig::default())
        }
    };

    let store = Arc::new(MemorySessionStore::new());
    let state = AppState::new(config.clone(), store, Arc::new(SystemClock));

    if let Some(secs) = config.session.sweep_interval_secs {
        spawn_sweeper(state.guard.clone(), Duration::from_secs(secs));
        tracing::info!("Idle session sweeper running every {}s", secs);
    } else {
        tracing::info!("Idle sessions expire lazily on next request");
    }

    let app = build_router(state);

    let addr = config
        .server
        .socket_addr()
        .expect("listen address is validated at load");

    tracing::info!(
        "Starting session guard API on {} (idle timeout {} ms)",
        addr,
        IDLE_TIMEOUT_MS
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app).await.expect("server error");
}
