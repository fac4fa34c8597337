//! Request gate subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (before any handler)
//!     → middleware.rs (pre-dispatch hook, split request into parts)
//!     → decision.rs (evaluate)
//!         → PublicRoutes::is_public(path)      → Public
//!         → AuthStrategy::authorize(parts)     → Authorized
//!         → AuthStrategy::challenge_response   → Challenged
//!     → Public | Authorized: run the handler
//!     → Challenged: return the challenge, handler never runs
//! ```
//!
//! # Design Decisions
//! - A public match always wins; the strategy is not even consulted
//! - Each request is evaluated independently, no cross-request state
//! - Strategy errors are returned, never mapped to allow or deny

pub mod decision;
pub mod middleware;

pub use decision::{Decision, Gate};
pub use middleware::{add_public_routes, gate_middleware};
