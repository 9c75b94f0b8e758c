//! Upstream HTTP client.
//!
//! Issues a single GET per request to the resolved target and relays the
//! answer. Successful bodies are streamed straight through; dropping the
//! returned response (client went away) drops the upstream stream with it.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use reqwest::Client;
use thiserror::Error;

use crate::config::schema::{TimeoutConfig, UpstreamConfig};
use crate::http::response::{default_error_message, ProxyError};
use crate::routing::UpstreamTarget;
use crate::security::sanitize_response_headers;

/// Errors raised while building the client at startup.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid upstream credential: not a valid header value")]
    InvalidCredential,

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Forwards resolved targets to the upstream content host.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    authorization: Option<HeaderValue>,
    error_message: Option<String>,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, ClientBuildError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        if timeouts.connect_secs > 0 {
            builder = builder.connect_timeout(Duration::from_secs(timeouts.connect_secs));
        }

        let authorization = config
            .credential
            .as_deref()
            .map(|credential| {
                let mut value = HeaderValue::from_str(&format!("token {credential}"))
                    .map_err(|_| ClientBuildError::InvalidCredential)?;
                value.set_sensitive(true);
                Ok::<_, ClientBuildError>(value)
            })
            .transpose()?;

        Ok(Self {
            http: builder.build()?,
            authorization,
            error_message: config.error_message.clone(),
        })
    }

    /// Fetch `target` and turn the upstream answer into a client response.
    pub async fn forward(&self, target: &UpstreamTarget) -> Result<Response, ProxyError> {
        let mut request = self.http.get(target.url());
        if let Some(authorization) = &self.authorization {
            request = request.header(header::AUTHORIZATION, authorization.clone());
        }

        let upstream = request.send().await.map_err(|e| {
            tracing::warn!(target_kind = target.kind().as_str(), error = %e, "Upstream request failed");
            ProxyError::UpstreamUnreachable(e.to_string())
        })?;

        let status = upstream.status();
        if !is_relayable(status) {
            tracing::debug!(status = %status, "Upstream returned failure status");
            return Err(ProxyError::UpstreamNonSuccess {
                status,
                message: self
                    .error_message
                    .clone()
                    .unwrap_or_else(|| default_error_message(status)),
            });
        }

        let mut headers = upstream.headers().clone();
        sanitize_response_headers(&mut headers);

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// Upstream statuses whose body is relayed as-is.
fn is_relayable(status: StatusCode) -> bool {
    status.is_success() || status.is_redirection()
}
