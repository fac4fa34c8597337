//! Public-route subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (setup code, config reload):
//!     ["/login", "/user/{id}/public", ...]
//!     → pattern.rs (compile each pattern, reject malformed batch)
//!     → registry.rs (append batch, publish new RouteSet atomically)
//!
//! Per request:
//!     request path
//!     → registry.rs (load current RouteSet snapshot)
//!     → pattern.rs (structural match against each pattern)
//!     → Return: public or not
//! ```
//!
//! # Design Decisions
//! - Patterns compiled at registration time, never per request
//! - Registry grows at runtime; readers never block on writers
//! - Existential match: order of registration is irrelevant

pub mod pattern;
pub mod registry;

pub use pattern::{PatternError, RoutePattern, Segment};
pub use registry::{PublicRoutes, RouteSet};
