//! HTTP Basic authentication.
//!
//! # Responsibilities
//! - Decode `Authorization: Basic <base64(user:password)>`
//! - Verify against a credential table or a custom verifier
//! - Challenge with `WWW-Authenticate: Basic realm="..."`
//!
//! # Design Decisions
//! - Missing or garbled headers are "not authorized", never an error
//! - Split on the first ':' so passwords may contain colons
//! - Passwords compared in constant time

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::{
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use subtle::ConstantTimeEq;

use super::{challenge_header, AuthHooks, AuthStrategy, StrategyError};

/// Custom credential check: `(username, password) -> authorized?`.
pub type Verifier = Arc<dyn Fn(&str, &str) -> Result<bool, StrategyError> + Send + Sync>;

enum Credentials {
    Table(HashMap<String, String>),
    Verifier(Verifier),
}

/// Basic auth strategy.
pub struct BasicAuth {
    realm: String,
    credentials: Credentials,
    hooks: AuthHooks,
}

impl BasicAuth {
    /// Authenticate against a fixed `username -> password` table.
    pub fn new<I, U, P>(realm: impl Into<String>, users: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        let table = users
            .into_iter()
            .map(|(u, p)| (u.into(), p.into()))
            .collect();
        Self {
            realm: realm.into(),
            credentials: Credentials::Table(table),
            hooks: AuthHooks::new(),
        }
    }

    /// Authenticate with a caller-supplied check, e.g. against an external store.
    pub fn with_verifier<F>(realm: impl Into<String>, verifier: F) -> Self
    where
        F: Fn(&str, &str) -> Result<bool, StrategyError> + Send + Sync + 'static,
    {
        Self {
            realm: realm.into(),
            credentials: Credentials::Verifier(Arc::new(verifier)),
            hooks: AuthHooks::new(),
        }
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    fn verify(&self, username: &str, password: &str) -> Result<bool, StrategyError> {
        match &self.credentials {
            Credentials::Table(table) => Ok(table
                .get(username)
                .map(|expected| bool::from(expected.as_bytes().ct_eq(password.as_bytes())))
                .unwrap_or(false)),
            Credentials::Verifier(verify) => verify(username, password),
        }
    }
}

/// Extract `(username, password)` from a Basic `Authorization` header.
fn decode_credentials(parts: &Parts) -> Option<(String, String)> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

impl AuthStrategy for BasicAuth {
    fn scheme(&self) -> &'static str {
        "basic"
    }

    fn is_authorized(&self, parts: &Parts) -> Result<bool, StrategyError> {
        match decode_credentials(parts) {
            Some((username, password)) => {
                let authorized = self.verify(&username, &password)?;
                if !authorized {
                    tracing::debug!(username = %username, "Basic auth credentials rejected");
                }
                Ok(authorized)
            }
            None => Ok(false),
        }
    }

    fn challenge_response(&self, _parts: &Parts) -> Result<Response, StrategyError> {
        let challenge = challenge_header("Basic", &self.realm)?;
        Ok((
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, challenge)],
            "Login Required",
        )
            .into_response())
    }

    fn hooks(&self) -> &AuthHooks {
        &self.hooks
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let users = match &self.credentials {
            Credentials::Table(table) => table.len().to_string(),
            Credentials::Verifier(_) => "custom".to_string(),
        };
        f.debug_struct("BasicAuth")
            .field("realm", &self.realm)
            .field("users", &users)
            .field("hooks", &self.hooks)
            .finish()
    }
}
