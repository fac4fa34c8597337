//! Static bearer-token authentication for service clients.

use std::fmt;

use axum::{
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use super::{challenge_header, AuthHooks, AuthStrategy, StrategyError};

/// Accepts `Authorization: Bearer <token>` for any configured token.
pub struct BearerAuth {
    realm: String,
    tokens: Vec<String>,
    hooks: AuthHooks,
}

impl BearerAuth {
    pub fn new<I, T>(realm: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            realm: realm.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
            hooks: AuthHooks::new(),
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl AuthStrategy for BearerAuth {
    fn scheme(&self) -> &'static str {
        "bearer"
    }

    fn is_authorized(&self, parts: &Parts) -> Result<bool, StrategyError> {
        let Some(provided) = bearer_token(parts) else {
            return Ok(false);
        };
        // Compare against every token so timing does not reveal which one matched.
        let matched = self
            .tokens
            .iter()
            .fold(0u8, |acc, t| acc | t.as_bytes().ct_eq(provided.as_bytes()).unwrap_u8());
        Ok(matched == 1)
    }

    fn challenge_response(&self, _parts: &Parts) -> Result<Response, StrategyError> {
        let challenge = challenge_header("Bearer", &self.realm)?;
        Ok((
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, challenge)],
            "Unauthorized",
        )
            .into_response())
    }

    fn hooks(&self) -> &AuthHooks {
        &self.hooks
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth")
            .field("realm", &self.realm)
            .field("tokens", &self.tokens.len())
            .field("hooks", &self.hooks)
            .finish()
    }
}
