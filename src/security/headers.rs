//! Response header sanitization.
//!
//! # Responsibilities
//! - Strip upstream security policies that break embedding the content
//! - Strip hop-by-hop headers before the response is re-framed
//! - Allow cross-origin reads

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Upstream headers that are never relayed to the client.
const STRIPPED_HEADERS: &[HeaderName] = &[
    header::CONTENT_SECURITY_POLICY,
    header::X_FRAME_OPTIONS,
    header::X_CONTENT_TYPE_OPTIONS,
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
];

/// Non-standard hop-by-hop headers.
const STRIPPED_HEADER_NAMES: &[&str] = &["keep-alive", "proxy-connection"];

/// Apply the relay policy to a successful upstream response's headers.
pub fn sanitize_response_headers(headers: &mut HeaderMap) {
    for name in STRIPPED_HEADERS {
        headers.remove(name);
    }
    for name in STRIPPED_HEADER_NAMES {
        headers.remove(*name);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
}
