//! Authorization strategies.
//!
//! # Data Flow
//! ```text
//! gate (or a wrapped handler)
//!     → AuthStrategy::authorize(parts)
//!         → is_authorized(parts)   scheme-specific credential check
//!         → hooks.rs               extra predicates, AND-combined
//!     → false: challenge_response / rejection_response
//! ```
//!
//! # Design Decisions
//! - The gate only ever sees `Arc<dyn AuthStrategy>`
//! - Credential checks are synchronous and perform no I/O of their own
//! - "Not authorized" is a value (`Ok(false)`); `Err` means the check itself broke

use std::fmt;
use std::sync::Arc;

use axum::{
    http::{request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::config::schema::{AuthConfig, AuthScheme};

pub mod basic;
pub mod bearer;
pub mod hooks;
pub mod wrap;

pub use basic::BasicAuth;
pub use bearer::BearerAuth;
pub use hooks::{AuthHook, AuthHooks};
pub use wrap::{wrap_index, wrap_protected, Guard, StrategyExt};

/// Shared handle to the active strategy.
pub type SharedStrategy = Arc<dyn AuthStrategy>;

/// Errors raised inside a strategy. The gate never recovers them.
#[derive(Debug, Clone, Error)]
pub enum StrategyError {
    /// A credential backend could not be consulted.
    #[error("credential backend error: {0}")]
    Backend(String),

    /// The strategy was built with unusable settings.
    #[error("strategy misconfigured: {0}")]
    Misconfigured(String),

    /// The challenge or rejection response could not be built.
    #[error("failed to build response: {0}")]
    Response(String),
}

impl IntoResponse for StrategyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Authorization strategy failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// Contract every authorization scheme implements.
pub trait AuthStrategy: Send + Sync + fmt::Debug {
    /// Short scheme name for logs and metrics (e.g. "basic").
    fn scheme(&self) -> &'static str;

    /// Scheme-specific credential check for the current request.
    fn is_authorized(&self, parts: &Parts) -> Result<bool, StrategyError>;

    /// Terminal response for a request the gate refuses.
    fn challenge_response(&self, parts: &Parts) -> Result<Response, StrategyError>;

    /// Response for a refused call to a handler wrapped with [`wrap_protected`].
    fn rejection_response(&self, _parts: &Parts) -> Result<Response, StrategyError> {
        Ok(StatusCode::FORBIDDEN.into_response())
    }

    /// Extra predicates registered through [`AuthStrategy::register_authorized_check`].
    fn hooks(&self) -> &AuthHooks;

    /// Add a predicate to the authorization decision and return it unchanged.
    fn register_authorized_check(&self, hook: AuthHook) -> AuthHook {
        self.hooks().push(hook)
    }

    /// Combined decision: `is_authorized` first, then every hook.
    ///
    /// Hooks only run once the credential check has passed.
    fn authorize(&self, parts: &Parts) -> Result<bool, StrategyError> {
        if !self.is_authorized(parts)? {
            return Ok(false);
        }
        Ok(self.hooks().all_pass(parts))
    }
}

/// `WWW-Authenticate` value for `scheme` with `realm` as a quoted-string.
pub(crate) fn challenge_header(scheme: &str, realm: &str) -> Result<HeaderValue, StrategyError> {
    let mut quoted = String::with_capacity(realm.len() + 2);
    for c in realm.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    HeaderValue::from_str(&format!("{scheme} realm=\"{quoted}\""))
        .map_err(|e| StrategyError::Response(format!("invalid realm {realm:?}: {e}")))
}

/// Build the strategy selected by configuration.
pub fn from_config(config: &AuthConfig) -> Result<SharedStrategy, StrategyError> {
    let strategy: SharedStrategy = match config.scheme {
        AuthScheme::Basic => {
            if config.users.is_empty() {
                return Err(StrategyError::Misconfigured(
                    "basic auth requires at least one user".into(),
                ));
            }
            let users = config
                .users
                .iter()
                .map(|u| (u.username.clone(), u.password.clone()));
            Arc::new(BasicAuth::new(config.realm.clone(), users))
        }
        AuthScheme::Bearer => {
            if config.tokens.is_empty() {
                return Err(StrategyError::Misconfigured(
                    "bearer auth requires at least one token".into(),
                ));
            }
            Arc::new(BearerAuth::new(config.realm.clone(), config.tokens.clone()))
        }
    };

    tracing::info!(scheme = strategy.scheme(), realm = %config.realm, "Authorization strategy ready");
    Ok(strategy)
}
