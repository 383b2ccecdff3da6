//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Graceful shutdown on ctrl-c or an external shutdown signal

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::audit::CsvAuditLog;
use crate::config::AppConfig;
use crate::http::handlers;
use crate::http::request::RequestIdLayer;
use crate::registry::FlowRegistry;
use crate::security::SlidingWindowLimiter;
use crate::trigger::TriggerDispatcher;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<FlowRegistry>,
    pub limiter: Arc<SlidingWindowLimiter>,
    pub dispatcher: Arc<TriggerDispatcher>,
    pub audit: Arc<CsvAuditLog>,
    pub rate_limit_enabled: bool,
}

/// HTTP server for the flow trigger front end.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server resolving flows from the process environment.
    pub fn new(config: AppConfig) -> Self {
        let registry = FlowRegistry::from_process_env(&config.registry);
        Self::with_registry(config, registry)
    }

    /// Create a server with an explicitly built registry (tests inject a
    /// synthetic environment here).
    pub fn with_registry(config: AppConfig, registry: FlowRegistry) -> Self {
        let state = AppState {
            registry: Arc::new(registry),
            limiter: Arc::new(SlidingWindowLimiter::new(&config.rate_limit)),
            dispatcher: Arc::new(TriggerDispatcher::new(&config.trigger)),
            audit: Arc::new(CsvAuditLog::new(config.audit.log_path.clone())),
            rate_limit_enabled: config.rate_limit.enabled,
        };

        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::dashboard))
            .route("/flow/{id}", get(handlers::flow_form))
            .route("/trigger/{id}", post(handlers::trigger))
            .route("/healthz", get(handlers::healthz))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for ctrl-c or an external shutdown trigger.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(error) = result {
                tracing::error!(%error, "Failed to install ctrl-c handler");
            }
        }
        _ = shutdown.recv() => {}
    }
    tracing::info!("Shutdown signal received");
}
