//! Shared helpers for integration tests.

use std::sync::Arc;

use auth_gate::auth::{AuthHooks, AuthStrategy, SharedStrategy, StrategyError};
use auth_gate::{Gate, PublicRoutes};
use axum::{
    body::Body,
    http::{request::Parts, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower::ServiceExt;

/// Strategy with a fixed answer and a recognizable challenge.
#[derive(Debug, Default)]
pub struct Fixed {
    pub allow: bool,
    pub hooks: AuthHooks,
}

impl AuthStrategy for Fixed {
    fn scheme(&self) -> &'static str {
        "fixed"
    }

    fn is_authorized(&self, _parts: &Parts) -> Result<bool, StrategyError> {
        Ok(self.allow)
    }

    fn challenge_response(&self, _parts: &Parts) -> Result<Response, StrategyError> {
        Ok((
            StatusCode::UNAUTHORIZED,
            [("x-challenge", "fixed")],
            "please sign in",
        )
            .into_response())
    }

    fn hooks(&self) -> &AuthHooks {
        &self.hooks
    }
}

/// Strategy whose credential backend is always down.
#[derive(Debug, Default)]
pub struct Broken {
    pub hooks: AuthHooks,
}

impl AuthStrategy for Broken {
    fn scheme(&self) -> &'static str {
        "broken"
    }

    fn is_authorized(&self, _parts: &Parts) -> Result<bool, StrategyError> {
        Err(StrategyError::Backend("credential store unreachable".into()))
    }

    fn challenge_response(&self, _parts: &Parts) -> Result<Response, StrategyError> {
        Err(StrategyError::Response("no challenge available".into()))
    }

    fn hooks(&self) -> &AuthHooks {
        &self.hooks
    }
}

#[allow(dead_code)]
pub fn broken() -> SharedStrategy {
    Arc::new(Broken::default())
}

#[allow(dead_code)]
pub fn deny_all() -> SharedStrategy {
    Arc::new(Fixed::default())
}

#[allow(dead_code)]
pub fn allow_all() -> SharedStrategy {
    Arc::new(Fixed {
        allow: true,
        ..Default::default()
    })
}

/// An application answering 200 "handled" on any path, behind `gate`.
#[allow(dead_code)]
pub fn gated_app(gate: Gate) -> Router {
    let app = Router::new()
        .route("/", get(|| async { "handled" }))
        .fallback(|| async { "handled" });
    gate.install(app)
}

/// Send a GET through `app` and return the response.
#[allow(dead_code)]
pub async fn send(app: &Router, path: &str) -> Response {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub fn gate(routes: &[&str], strategy: SharedStrategy) -> Gate {
    Gate::new(PublicRoutes::new(routes).unwrap(), strategy)
}
