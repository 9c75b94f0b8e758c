//! Request handling helpers.
//!
//! # Responsibilities
//! - Name the request ID header and read it back for logging
//! - Extract the access token from the query string
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The query string is only read for `token`; it is never logged or forwarded

use axum::http::{HeaderMap, HeaderName};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Query parameter carrying the access token.
pub const TOKEN_PARAM: &str = "token";

pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// The request ID of a request, or "unknown" if none was assigned.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// First `token` parameter of a query string, URL-decoded.
pub fn extract_token(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
}
