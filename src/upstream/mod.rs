//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! UpstreamTarget
//!     → client.rs (GET with injected credential and fixed User-Agent)
//!     → success: sanitized headers + streamed body
//!     → failure status: configured or default error body, status preserved
//!     → network failure: 500 with the failure description
//! ```
//!
//! # Design Decisions
//! - Exactly one attempt per request, no retries
//! - Bodies are never buffered

pub mod client;

pub use client::{ClientBuildError, UpstreamClient};
