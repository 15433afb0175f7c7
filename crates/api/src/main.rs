use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inspectra_api::config::ServerConfig;
use inspectra_api::router::build_app_router;
use inspectra_api::sessions::{start_idle_sweep, SessionStore};
use inspectra_api::state::AppState;
use inspectra_client::{Backend, HttpWorkflowApi, InMemoryWorkflowApi};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inspectra_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Workflow backend ---
    let backend_kind = match config.workflow_api_url {
        Some(_) => "http",
        None => "memory",
    };
    let backend: Arc<dyn Backend> = match &config.workflow_api_url {
        Some(url) => {
            tracing::info!(url = %url, "Using workflow API");
            Arc::new(HttpWorkflowApi::new(
                url.clone(),
                config.workflow_api_token.clone(),
            ))
        }
        None => {
            tracing::warn!("WORKFLOW_API_URL not set, using in-memory workflow store");
            Arc::new(InMemoryWorkflowApi::new())
        }
    };

    // --- App state ---
    let sessions = Arc::new(SessionStore::new());
    let state = AppState {
        config: Arc::new(config.clone()),
        sessions: Arc::clone(&sessions),
        backend,
        backend_kind,
    };

    // --- Idle session sweep ---
    // `tokio::time::interval` panics on a zero period.
    let sweep = start_idle_sweep(
        Arc::clone(&sessions),
        Duration::from_secs(config.session_sweep_interval_secs.max(1)),
        Duration::from_secs(config.session_idle_ttl_secs),
    );
    tracing::info!(
        ttl_secs = config.session_idle_ttl_secs,
        interval_secs = config.session_sweep_interval_secs,
        "Idle session sweep started"
    );

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    let drain = Duration::from_secs(config.shutdown_timeout_secs);

    // In-flight requests get `shutdown_timeout_secs` after the signal.
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Server error");
            }
        }
        _ = async {
            shutdown_signal().await;
            tokio::time::sleep(drain).await;
        } => {
            tracing::warn!(timeout_secs = drain.as_secs(), "Shutdown drain timed out");
        }
    }

    sweep.abort();
    let open = sessions.count().await;
    if open > 0 {
        tracing::warn!(open_sessions = open, "Discarding unsaved journey sessions");
    }
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
