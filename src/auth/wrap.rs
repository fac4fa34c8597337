//! Per-handler authorization wrappers.
//!
//! The gate already guards every request. These wrappers guard individual
//! handlers again for routers that may be mounted outside the gated tree.
//! A wrapper built with [`Guard::honoring`] lets public routes through just as
//! the gate does, so listing a wrapped path as public makes it public.

use axum::{
    extract::{Request, State},
    http::request::Parts,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use super::{SharedStrategy, StrategyError};
use crate::routing::PublicRoutes;

/// What a wrapped handler checks before it runs.
#[derive(Clone)]
pub struct Guard {
    strategy: SharedStrategy,
    public_routes: Option<PublicRoutes>,
}

impl Guard {
    /// Check every call against `strategy`.
    pub fn new(strategy: SharedStrategy) -> Self {
        Self {
            strategy,
            public_routes: None,
        }
    }

    /// Skip the check for paths `routes` marks public.
    pub fn honoring(strategy: SharedStrategy, routes: PublicRoutes) -> Self {
        Self {
            strategy,
            public_routes: Some(routes),
        }
    }

    /// Enforce `authorize` before `route` runs; refusals get `rejection_response`.
    pub fn protect<S>(self, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        route.route_layer(middleware::from_fn_with_state(self, enforce_protected))
    }

    /// Enforce `authorize` before the index handler runs; refusals get `challenge_response`.
    pub fn protect_index<S>(self, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        route.route_layer(middleware::from_fn_with_state(self, enforce_index))
    }

    fn is_public(&self, parts: &Parts) -> bool {
        self.public_routes
            .as_ref()
            .is_some_and(|routes| routes.is_public(parts.uri.path()))
    }
}

/// Enforce `authorize` before `route` runs; refusals get `rejection_response`.
pub fn wrap_protected<S>(strategy: SharedStrategy, route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    Guard::new(strategy).protect(route)
}

/// Enforce `authorize` before the index handler runs; refusals get `challenge_response`.
pub fn wrap_index<S>(strategy: SharedStrategy, route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    Guard::new(strategy).protect_index(route)
}

/// Method-call form of [`wrap_protected`] and [`wrap_index`].
pub trait StrategyExt {
    fn wrap_protected<S>(&self, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static;

    fn wrap_index<S>(&self, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static;
}

impl StrategyExt for SharedStrategy {
    fn wrap_protected<S>(&self, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        wrap_protected(self.clone(), route)
    }

    fn wrap_index<S>(&self, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        wrap_index(self.clone(), route)
    }
}

async fn enforce_protected(
    State(guard): State<Guard>,
    request: Request,
    next: Next,
) -> Result<Response, StrategyError> {
    let (parts, body) = request.into_parts();
    if !guard.is_public(&parts) && !guard.strategy.authorize(&parts)? {
        tracing::debug!(path = %parts.uri.path(), "Protected handler refused");
        return guard.strategy.rejection_response(&parts);
    }
    Ok(next.run(Request::from_parts(parts, body)).await)
}

async fn enforce_index(
    State(guard): State<Guard>,
    request: Request,
    next: Next,
) -> Result<Response, StrategyError> {
    let (parts, body) = request.into_parts();
    if !guard.is_public(&parts) && !guard.strategy.authorize(&parts)? {
        tracing::debug!(path = %parts.uri.path(), "Index refused, challenging");
        return guard.strategy.challenge_response(&parts);
    }
    Ok(next.run(Request::from_parts(parts, body)).await)
}
