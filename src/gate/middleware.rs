//! Pre-dispatch hook and registration API.

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
    Router,
};

use super::decision::{Decision, Gate};
use crate::auth::{Guard, StrategyError};
use crate::routing::PatternError;

/// Axum middleware run before every handler behind [`Gate::install`].
pub async fn gate_middleware(
    State(gate): State<Gate>,
    request: Request,
    next: Next,
) -> Result<Response, StrategyError> {
    let (parts, body) = request.into_parts();
    let decision = gate.evaluate(&parts)?;
    match decision {
        Decision::Challenged(challenge) => Ok(challenge),
        Decision::Public | Decision::Authorized => {
            Ok(next.run(Request::from_parts(parts, body)).await)
        }
    }
}

impl Gate {
    /// Put the gate in front of every route and the fallback of `router`.
    ///
    /// Routes added to the router afterwards are not covered, so install last.
    pub fn install<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        tracing::info!(
            public_routes = self.public_routes().len(),
            scheme = self.strategy().scheme(),
            "Authentication gate installed"
        );
        router.layer(middleware::from_fn_with_state(self, gate_middleware))
    }

    /// Re-check `route` against the strategy unless its path is public.
    pub fn wrap_protected<S>(&self, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.guard().protect(route)
    }

    /// Like [`Gate::wrap_protected`], but refusals get the challenge.
    pub fn wrap_index<S>(&self, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.guard().protect_index(route)
    }

    fn guard(&self) -> Guard {
        Guard::honoring(self.strategy().clone(), self.public_routes().clone())
    }
}

/// Register more public routes on a gate. Accumulates; never removes.
pub fn add_public_routes<I, S>(gate: &Gate, routes: I) -> Result<usize, PatternError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    gate.public_routes().add_routes(routes)
}
