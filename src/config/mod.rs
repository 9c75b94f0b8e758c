//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (TOKEN, TOKEN_PATH, GH_* ...)
//!     → validation.rs (normalize & semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → compiled into Authorizer / Resolver / UpstreamClient at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once; changes require a restart
//! - All fields have defaults to allow an empty environment
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AuthConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::PathTokenRule;
pub use schema::ProxyConfig;
pub use schema::UpstreamConfig;
pub use validation::ValidationError;
