//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, token extraction)
//!     → "/" → response.rs (decoy page)
//!     → security::authorizer → routing::resolver → upstream::client
//!     → response.rs (errors → status + plain text)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{extract_token, X_REQUEST_ID};
pub use response::ProxyError;
pub use server::{AppState, HttpServer};
