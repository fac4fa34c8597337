//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, compile public routes)
//!     → GateConfig (validated)
//!     → server builds PublicRoutes + AuthStrategy + Gate
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server appends new public routes to the live registry
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Only public routes are hot-reloaded; they can only be added

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AuthConfig, AuthScheme, GateConfig, ListenerConfig, ObservabilityConfig, PublicRoutesConfig,
    TimeoutConfig, UserConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
