//! Upstream URL resolution.
//!
//! # Responsibilities
//! - Turn the request path into a fully-qualified upstream URL
//! - Infer what the caller meant without an explicit mode flag:
//!   a pasted full URL, a short path to expand with the default
//!   account/repository/branch, or an already-qualified path
//!
//! # Design Decisions
//! - Pure and total: every path resolves, none fail
//! - Leading slashes are insignificant
//! - The query string never participates

use std::fmt;

use crate::config::UpstreamConfig;

/// Host marker searched for in pasted full URLs.
pub const FULL_URL_MARKER: &str = "githubusercontent.com/";

/// How the resolver interpreted a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// The path was a full http(s) URL; its suffix after the host marker was kept.
    FullUrl,
    /// The path was expanded with the default account/repository/branch.
    Expanded,
    /// The path was used as-is.
    Passthrough,
}

impl PathKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathKind::FullUrl => "full_url",
            PathKind::Expanded => "expanded",
            PathKind::Passthrough => "passthrough",
        }
    }
}

/// A resolved upstream URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    url: String,
    kind: PathKind,
}

impl UpstreamTarget {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Resolves request paths against the configured upstream.
#[derive(Debug, Clone)]
pub struct Resolver {
    base_url: String,
    account: Option<String>,
    repository: String,
    branch: String,
}

impl Resolver {
    /// Build a resolver from a normalized upstream configuration.
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            account: config.account.clone(),
            repository: config.repository.clone().unwrap_or_default(),
            branch: config.branch.clone(),
        }
    }

    /// Resolve `path` into an upstream target.
    pub fn resolve(&self, path: &str) -> UpstreamTarget {
        let clean_path = path.trim_start_matches('/');

        let (suffix, kind) = if has_http_scheme(clean_path) {
            let suffix = clean_path
                .split_once(FULL_URL_MARKER)
                .map(|(_, rest)| rest)
                .unwrap_or_default();
            (suffix.to_string(), PathKind::FullUrl)
        } else {
            match &self.account {
                Some(account) if !clean_path.starts_with(account.as_str()) => (
                    format!("{}/{}/{}/{}", account, self.repository, self.branch, clean_path),
                    PathKind::Expanded,
                ),
                _ => (clean_path.to_string(), PathKind::Passthrough),
            }
        };

        UpstreamTarget {
            url: format!("{}{}", self.base_url, suffix),
            kind,
        }
    }
}

fn has_http_scheme(path: &str) -> bool {
    let lower = path.get(..6).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http:") || lower.starts_with("https:")
}
