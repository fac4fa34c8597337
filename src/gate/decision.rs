//! Per-request authorization decision.

use std::fmt;
use std::time::Instant;

use axum::{http::request::Parts, response::Response};

use crate::auth::{SharedStrategy, StrategyError};
use crate::observability::metrics;
use crate::routing::PublicRoutes;

/// Outcome of evaluating one request.
pub enum Decision {
    /// Path matched a public route.
    Public,
    /// The strategy (and its hooks) accepted the request.
    Authorized,
    /// Refused; carries the strategy's challenge response.
    Challenged(Response),
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Public => "public",
            Decision::Authorized => "authorized",
            Decision::Challenged(_) => "challenged",
        }
    }

    /// True when the request may proceed to its handler.
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Decision::Challenged(_))
    }
}

impl fmt::Debug for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Challenged(response) => f
                .debug_tuple("Challenged")
                .field(&response.status())
                .finish(),
            other => f.write_str(other.as_str()),
        }
    }
}

/// The authentication gate: public routes plus one authorization strategy.
#[derive(Clone)]
pub struct Gate {
    routes: PublicRoutes,
    strategy: SharedStrategy,
}

impl Gate {
    pub fn new(routes: PublicRoutes, strategy: SharedStrategy) -> Self {
        Self { routes, strategy }
    }

    pub fn public_routes(&self) -> &PublicRoutes {
        &self.routes
    }

    pub fn strategy(&self) -> &SharedStrategy {
        &self.strategy
    }

    /// Decide whether a request may proceed.
    pub fn evaluate(&self, parts: &Parts) -> Result<Decision, StrategyError> {
        let start = Instant::now();
        let path = parts.uri.path();

        let decision = if self.routes.is_public(path) {
            Decision::Public
        } else if self.authorize(parts)? {
            Decision::Authorized
        } else {
            Decision::Challenged(self.challenge(parts)?)
        };

        match &decision {
            Decision::Challenged(response) => tracing::info!(
                method = %parts.method,
                path = %path,
                scheme = self.strategy.scheme(),
                status = response.status().as_u16(),
                "Request challenged"
            ),
            allowed => tracing::debug!(
                method = %parts.method,
                path = %path,
                decision = allowed.as_str(),
                "Request allowed"
            ),
        }
        metrics::record_decision(decision.as_str(), start);
        Ok(decision)
    }

    fn authorize(&self, parts: &Parts) -> Result<bool, StrategyError> {
        self.strategy.authorize(parts).inspect_err(|_| {
            metrics::record_strategy_error(self.strategy.scheme());
        })
    }

    fn challenge(&self, parts: &Parts) -> Result<Response, StrategyError> {
        self.strategy.challenge_response(parts).inspect_err(|_| {
            metrics::record_strategy_error(self.strategy.scheme());
        })
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("public_routes", &self.routes.len())
            .field("strategy", &self.strategy)
            .finish()
    }
}
