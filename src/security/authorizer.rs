//! Request authorization.
//!
//! Two independent schemes: path-scoped tokens (`TOKEN_PATH`) and a global
//! token (`TOKEN`). Path rules are checked first, in declaration order; the
//! first rule whose prefix matches decides the request on its own. Only when
//! no rule matches does the global token get a say. If either scheme is
//! configured at all, a request that nothing authorized is denied.

use axum::http::StatusCode;

use crate::config::AuthConfig;
use crate::routing::PathPrefixMatcher;

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The path matched a rule but the token was not the rule's token.
    InvalidPathToken,
    /// A token was supplied but it is not the global token.
    GlobalTokenRequired,
    /// Auth is configured and no token (or no applicable scheme) was found.
    TokenMissing,
}

impl DenyReason {
    pub fn status(&self) -> StatusCode {
        match self {
            DenyReason::InvalidPathToken => StatusCode::FORBIDDEN,
            DenyReason::GlobalTokenRequired => StatusCode::UNAUTHORIZED,
            DenyReason::TokenMissing => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::InvalidPathToken => "Access denied: invalid path token",
            DenyReason::GlobalTokenRequired => "Access denied: global token required",
            DenyReason::TokenMissing => "Unauthorized: token missing",
        }
    }
}

/// Result of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Authorized,
    Denied(DenyReason),
}

#[derive(Debug, Clone)]
struct PathRule {
    matcher: PathPrefixMatcher,
    token: String,
}

/// Compiled form of [`AuthConfig`].
#[derive(Debug, Clone)]
pub struct Authorizer {
    global_token: Option<String>,
    rules: Vec<PathRule>,
}

impl Authorizer {
    pub fn from_config(config: &AuthConfig) -> Self {
        let rules = config
            .path_tokens
            .iter()
            .map(|rule| PathRule {
                matcher: PathPrefixMatcher::new(&rule.path),
                token: rule.token.clone(),
            })
            .collect();

        Self {
            global_token: config.token.clone(),
            rules,
        }
    }

    /// Whether any scheme is configured.
    pub fn is_enabled(&self) -> bool {
        self.global_token.is_some() || !self.rules.is_empty()
    }

    /// Decide whether a request for `path` carrying `token` may proceed.
    pub fn authorize(&self, path: &str, token: Option<&str>) -> AuthOutcome {
        if let Some(rule) = self.rules.iter().find(|rule| rule.matcher.matches(path)) {
            return if token == Some(rule.token.as_str()) {
                AuthOutcome::Authorized
            } else {
                AuthOutcome::Denied(DenyReason::InvalidPathToken)
            };
        }

        if let Some(global) = &self.global_token {
            return match token {
                Some(t) if t == global => AuthOutcome::Authorized,
                Some(_) => AuthOutcome::Denied(DenyReason::GlobalTokenRequired),
                None => AuthOutcome::Denied(DenyReason::TokenMissing),
            };
        }

        if self.is_enabled() {
            AuthOutcome::Denied(DenyReason::TokenMissing)
        } else {
            AuthOutcome::Authorized
        }
    }
}
