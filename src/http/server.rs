//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the decoy and proxy handlers
//! - Wire up middleware (request ID, tracing, panic catching)
//! - Authorize, resolve and forward each request
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::request::{extract_token, request_id, request_id_header};
use crate::http::response::{decoy_page, panic_response, ProxyError};
use crate::observability::metrics;
use crate::routing::Resolver;
use crate::security::{AuthOutcome, Authorizer};
use crate::upstream::{ClientBuildError, UpstreamClient};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub authorizer: Arc<Authorizer>,
    pub resolver: Arc<Resolver>,
    pub upstream: UpstreamClient,
}

impl AppState {
    /// Compile a validated configuration into request-time state.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ClientBuildError> {
        Ok(Self {
            authorizer: Arc::new(Authorizer::from_config(&config.auth)),
            resolver: Arc::new(Resolver::from_config(&config.upstream)),
            upstream: UpstreamClient::new(&config.upstream, &config.timeouts)?,
        })
    }
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    authorizer: Arc<Authorizer>,
}

impl HttpServer {
    /// Create a new HTTP server with the given (validated) configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ClientBuildError> {
        let state = AppState::from_config(&config)?;
        let authorizer = state.authorizer.clone();
        let router = Self::build_router(state);
        Ok(Self {
            router,
            config,
            authorizer,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
            .layer(
                // Span carries the path only: the query holds the access token.
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id(request.headers()),
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::new(request_id_header()))
            .layer(CatchPanicLayer::custom(panic_response));

        Router::new()
            .route("/", any(decoy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(middleware)
    }

    /// A clone of the router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            auth_enabled = self.authorizer.is_enabled(),
            path_rules = self.config.auth.path_tokens.len(),
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

async fn decoy_handler() -> Response {
    decoy_page()
}

/// Main proxy handler: authorize, resolve, forward.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let token = extract_token(request.uri().query());

    match handle(&state, &path, token.as_deref()).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), "proxied", start_time);
            response
        }
        Err(err) => {
            let status = err.status();
            match &err {
                ProxyError::AuthDenied(reason) => {
                    tracing::info!(status = status.as_u16(), reason = reason.message(), "Request denied");
                }
                ProxyError::UpstreamNonSuccess { .. } => {
                    tracing::info!(status = status.as_u16(), "Upstream returned failure status");
                }
                _ => tracing::error!(status = status.as_u16(), error = %err, "Request failed"),
            }
            metrics::record_request(&method, status.as_u16(), err.outcome(), start_time);
            err.into_response()
        }
    }
}

async fn handle(state: &AppState, path: &str, token: Option<&str>) -> Result<Response, ProxyError> {
    if let AuthOutcome::Denied(reason) = state.authorizer.authorize(path, token) {
        return Err(ProxyError::AuthDenied(reason));
    }

    let target = state.resolver.resolve(path);
    tracing::debug!(upstream_url = %target, kind = target.kind().as_str(), "Forwarding request");

    state.upstream.forward(&target).await
}
