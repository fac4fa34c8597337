//! Pluggable authentication gate for Axum applications.
//!
//! Every request passes the [`gate::Gate`] before reaching a handler. A path
//! matching a registered public route goes straight through; anything else
//! must be accepted by the active [`auth::AuthStrategy`] or receives that
//! strategy's challenge response.

pub mod auth;
pub mod config;
pub mod gate;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use auth::{AuthStrategy, SharedStrategy, StrategyError};
pub use config::GateConfig;
pub use gate::{add_public_routes, Decision, Gate};
pub use http::GateServer;
pub use lifecycle::Shutdown;
pub use routing::{PatternError, PublicRoutes, RoutePattern};
