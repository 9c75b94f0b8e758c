//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → resolver.rs (strip slashes, classify, expand)
//!     → UpstreamTarget (url + how it was inferred)
//!
//! Path token rules (at startup):
//!     PathTokenRule[]
//!     → matcher.rs (compile root-anchored, lowercase prefixes)
//!     → used by the authorizer in declaration order
//! ```
//!
//! # Design Decisions
//! - Everything compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always resolves to the same target

pub mod matcher;
pub mod resolver;

pub use matcher::PathPrefixMatcher;
pub use resolver::{PathKind, Resolver, UpstreamTarget, FULL_URL_MARKER};
