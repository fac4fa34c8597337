//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the public-route registry and strategy from config
//! - Create the Axum Router with the demo application handlers
//! - Install the gate, then wire up middleware (timeout, request ID, tracing)
//! - Apply reloaded public routes while serving
//! - Graceful shutdown

use std::time::Duration;

use axum::{
    extract::{Path, Request, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::{self, SharedStrategy, StrategyError};
use crate::config::GateConfig;
use crate::gate::Gate;
use crate::routing::{PatternError, PublicRoutes};

/// Errors that prevent the server from starting or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid public route: {0}")]
    Pattern(#[from] PatternError),

    #[error("authorization strategy: {0}")]
    Strategy(#[from] StrategyError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub strategy: SharedStrategy,
}

/// HTTP server hosting the gated application.
pub struct GateServer {
    router: Router,
    gate: Gate,
    config: GateConfig,
}

impl GateServer {
    /// Build the registry and the configured strategy, then the router.
    pub fn new(config: GateConfig) -> Result<Self, ServerError> {
        let routes = PublicRoutes::new(&config.gate.public_routes)?;
        let strategy = auth::from_config(&config.auth)?;
        Ok(Self::with_strategy(config, routes, strategy))
    }

    /// Build a server around a caller-supplied strategy.
    pub fn with_strategy(config: GateConfig, routes: PublicRoutes, strategy: SharedStrategy) -> Self {
        let gate = Gate::new(routes, strategy);
        let router = Self::build_router(&config, gate.clone());
        Self {
            router,
            gate,
            config,
        }
    }

    /// Build the Axum router: handlers, gate, then outer middleware.
    #[allow(deprecated)]
    fn build_router(config: &GateConfig, gate: Gate) -> Router {
        let state = AppState {
            strategy: gate.strategy().clone(),
        };

        let app = Router::new()
            .route("/", gate.wrap_index(get(index_handler)))
            .route("/health", get(health_handler))
            .route("/login", get(login_handler))
            .route("/user/{id}/public", get(public_profile_handler))
            .route("/api/whoami", gate.wrap_protected(get(whoami_handler)))
            .with_state(state);

        gate.install(app)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `shutdown` fires, applying reloaded configs as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GateConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            public_routes = self.gate.public_routes().len(),
            scheme = self.gate.strategy().scheme(),
            "Auth gate listening"
        );

        let routes = self.gate.public_routes().clone();
        let mut reload_shutdown = shutdown.resubscribe();
        let reloader = tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => apply_reload(&routes, &config),
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Append public routes from a reloaded config to the live registry.
fn apply_reload(routes: &PublicRoutes, config: &GateConfig) {
    match routes.sync_from_config(&config.gate.public_routes) {
        Ok(0) => tracing::debug!("Config reload added no public routes"),
        Ok(added) => tracing::info!(added, "Public routes updated from config"),
        Err(e) => tracing::error!(error = %e, "Reloaded public routes rejected"),
    }
    tracing::debug!("Only public routes are applied on reload; other settings need a restart");
}

async fn index_handler() -> &'static str {
    "auth-gate"
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn login_handler() -> &'static str {
    "Sign in by sending credentials in the Authorization header"
}

async fn public_profile_handler(Path(id): Path<String>) -> impl IntoResponse {
    Json(json!({ "user": id, "visibility": "public" }))
}

/// Reports whether the caller's credentials pass; the route may be public.
async fn whoami_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse, StrategyError> {
    let (parts, _) = request.into_parts();
    let authenticated = state.strategy.authorize(&parts)?;
    Ok(Json(json!({
        "authenticated": authenticated,
        "scheme": state.strategy.scheme(),
    })))
}
