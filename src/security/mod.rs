//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → authorizer.rs (path-scoped tokens, then global token)
//!     → Pass to routing
//!
//! Upstream response:
//!     → headers.rs (strip security policies and hop-by-hop headers, add CORS)
//!     → Pass to client
//! ```
//!
//! # Design Decisions
//! - Fail closed: once any token is configured, unauthorized requests are rejected
//! - Tokens are compared exactly and never logged

pub mod authorizer;
pub mod headers;

pub use authorizer::{AuthOutcome, Authorizer, DenyReason};
pub use headers::sanitize_response_headers;
