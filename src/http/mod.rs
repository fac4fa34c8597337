//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup)
//!     → TraceLayer → SetRequestId → PropagateRequestId → Timeout
//!     → gate (public / authorized / challenged)
//!     → application handler (optionally wrapped again per handler)
//! ```

pub mod server;

pub use server::{AppState, GateServer, ServerError};
