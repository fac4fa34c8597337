//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Compile every public route so malformed patterns fail at load time
//! - Check the selected scheme has credentials
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AuthScheme, GateConfig};
use crate::routing::{PatternError, RoutePattern};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroTimeout,

    #[error("invalid public route: {0}")]
    PublicRoute(PatternError),

    #[error("auth.realm must not be empty")]
    EmptyRealm,

    #[error("auth.realm {0:?} contains control characters")]
    InvalidRealm(String),

    #[error("basic auth requires at least one user")]
    NoUsers,

    #[error("basic auth user at index {0} has an empty username")]
    EmptyUsername(usize),

    #[error("basic auth user {0:?} is defined more than once")]
    DuplicateUser(String),

    #[error("bearer auth requires at least one token")]
    NoTokens,

    #[error("bearer token at index {0} is empty")]
    EmptyToken(usize),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for route in &config.gate.public_routes {
        if let Err(e) = RoutePattern::compile(route) {
            errors.push(ValidationError::PublicRoute(e));
        }
    }

    let auth = &config.auth;
    if auth.realm.trim().is_empty() {
        errors.push(ValidationError::EmptyRealm);
    } else if auth.realm.chars().any(char::is_control) {
        errors.push(ValidationError::InvalidRealm(auth.realm.clone()));
    }
    match auth.scheme {
        AuthScheme::Basic => {
            if auth.users.is_empty() {
                errors.push(ValidationError::NoUsers);
            }
            let mut seen = HashSet::new();
            for (i, user) in auth.users.iter().enumerate() {
                if user.username.is_empty() {
                    errors.push(ValidationError::EmptyUsername(i));
                } else if !seen.insert(user.username.as_str()) {
                    errors.push(ValidationError::DuplicateUser(user.username.clone()));
                }
            }
        }
        AuthScheme::Bearer => {
            if auth.tokens.is_empty() {
                errors.push(ValidationError::NoTokens);
            }
            for (i, token) in auth.tokens.iter().enumerate() {
                if token.trim().is_empty() {
                    errors.push(ValidationError::EmptyToken(i));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
