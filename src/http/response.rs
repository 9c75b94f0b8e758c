//! Response handling and transformation.
//!
//! # Responsibilities
//! - Map every failure category to a status code and plain-text body
//! - Serve the decoy page at the root path
//! - Turn caught panics into ordinary 500 responses
//!
//! # Design Decisions
//! - Every code path produces a response; nothing propagates past the handler
//! - Error bodies are plain text so they read well in a browser or curl

use std::any::Any;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::security::DenyReason;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Static page served at `/`, indistinguishable from a fresh web server install.
pub const DECOY_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Welcome to nginx!</title>
<style>
    body { width: 35em; margin: 0 auto; font-family: Tahoma, Verdana, Arial, sans-serif; }
</style>
</head>
<body>
<h1>Welcome to nginx!</h1>
<p>If you see this page, the nginx web server is successfully installed and
working. Further configuration is required.</p>
<p><em>Thank you for using nginx.</em></p>
</body>
</html>
"#;

/// Errors that end a proxied request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The authorizer rejected the request.
    #[error("{}", .0.message())]
    AuthDenied(DenyReason),

    /// Upstream answered with a non-success status.
    #[error("{message}")]
    UpstreamNonSuccess { status: StatusCode, message: String },

    /// Upstream could not be reached (DNS, refused, timeout).
    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Anything else that went wrong while handling the request.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::AuthDenied(reason) => reason.status(),
            ProxyError::UpstreamNonSuccess { status, .. } => *status,
            ProxyError::UpstreamUnreachable(_) | ProxyError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short label used for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ProxyError::AuthDenied(_) => "denied",
            ProxyError::UpstreamNonSuccess { .. } => "upstream_error",
            ProxyError::UpstreamUnreachable(_) => "unreachable",
            ProxyError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN))],
            self.to_string(),
        )
            .into_response()
    }
}

/// Body used for a failed upstream response when no custom message is set.
pub fn default_error_message(status: StatusCode) -> String {
    format!("Failed to fetch from upstream (Status: {})", status.as_u16())
}

/// The decoy page response.
pub fn decoy_page() -> Response {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=UTF-8"),
        )],
        DECOY_HTML,
    )
        .into_response()
}

/// Response for a handler that panicked, used with `CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");
    ProxyError::Internal(detail).into_response()
}
