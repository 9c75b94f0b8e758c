//! Configuration validation.
//!
//! # Responsibilities
//! - Parse the compact `TOKEN_PATH` rule syntax into typed rules
//! - Normalize values (empty strings mean "unset", base URL ends with '/')
//! - Validate value ranges (addresses parse, base URL is http(s))
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Malformed rules are fatal: a rule that cannot be parsed is never skipped
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::{PathTokenRule, ProxyConfig, DEFAULT_BRANCH};

/// Characters separating entries in `TOKEN_PATH`.
const RULE_SEPARATORS: [char; 3] = [',', '，', '\n'];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed path token entry {entry:?}: expected token@path")]
    MalformedPathToken { entry: String },

    #[error("path token rule for {path:?} has an empty token")]
    EmptyRuleToken { path: String },

    #[error("invalid upstream base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid {field} {value:?}: expected host:port")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} is not a valid HTTP header value")]
    InvalidHeaderValue { field: &'static str },
}

/// Parse `token1@path1,token2@path2` into ordered rules.
///
/// Entries may be separated by ASCII commas, full-width commas or newlines.
/// Blank entries are ignored; anything else that does not split into exactly
/// one token and one path is an error.
pub fn parse_path_token_rules(raw: &str) -> Result<Vec<PathTokenRule>, ValidationError> {
    raw.split(&RULE_SEPARATORS[..])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_rule)
        .collect()
}

fn parse_rule(entry: &str) -> Result<PathTokenRule, ValidationError> {
    let parts: Vec<&str> = entry.split('@').map(str::trim).collect();
    let [token, path] = parts.as_slice() else {
        return Err(ValidationError::MalformedPathToken {
            entry: entry.to_string(),
        });
    };
    let rule = PathTokenRule::new(*token, normalize_prefix(path));
    if rule.token.is_empty() {
        return Err(ValidationError::EmptyRuleToken { path: rule.path });
    }
    Ok(rule)
}

fn normalize_prefix(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}

/// Bring a loaded configuration into canonical form.
///
/// Empty optional strings become `None`, an empty branch falls back to the
/// default, rule prefixes lose their leading slash and the base URL gains a
/// trailing one.
pub fn normalize(config: &mut ProxyConfig) {
    fn non_empty(value: &mut Option<String>) {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            *value = None;
        }
    }

    non_empty(&mut config.auth.token);
    for rule in &mut config.auth.path_tokens {
        rule.token = rule.token.trim().to_string();
        rule.path = normalize_prefix(rule.path.trim());
    }

    let upstream = &mut config.upstream;
    non_empty(&mut upstream.account);
    non_empty(&mut upstream.repository);
    non_empty(&mut upstream.credential);
    non_empty(&mut upstream.error_message);
    if upstream.branch.trim().is_empty() {
        upstream.branch = DEFAULT_BRANCH.to_string();
    }
    if !upstream.base_url.ends_with('/') {
        upstream.base_url.push('/');
    }
}

/// Validate a normalized configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    for rule in &config.auth.path_tokens {
        if rule.token.is_empty() {
            errors.push(ValidationError::EmptyRuleToken {
                path: rule.path.clone(),
            });
        }
    }

    let base_url = &config.upstream.base_url;
    match Url::parse(base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: format!("unsupported scheme {}", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if let Some(credential) = &config.upstream.credential {
        if HeaderValue::from_str(&format!("token {credential}")).is_err() {
            errors.push(ValidationError::InvalidHeaderValue {
                field: "upstream.credential",
            });
        }
    }

    if HeaderValue::from_str(&config.upstream.user_agent).is_err() {
        errors.push(ValidationError::InvalidHeaderValue {
            field: "upstream.user_agent",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_separators() {
        let rules = parse_path_token_rules("a1@docs,b2@img，c3@private\nd4@/notes").unwrap();
        assert_eq!(
            rules,
            vec![
                PathTokenRule::new("a1", "docs"),
                PathTokenRule::new("b2", "img"),
                PathTokenRule::new("c3", "private"),
                PathTokenRule::new("d4", "notes"),
            ]
        );
    }

    #[test]
    fn test_parse_trims_and_skips_blank_entries() {
        let rules = parse_path_token_rules(" a1 @ docs ,,\r\n\n  ,b2@img\n").unwrap();
        assert_eq!(
            rules,
            vec![PathTokenRule::new("a1", "docs"), PathTokenRule::new("b2", "img")]
        );
        assert!(parse_path_token_rules("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_entries() {
        let err = parse_path_token_rules("a1@docs,missing-separator").unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedPathToken {
                entry: "missing-separator".into()
            }
        );

        assert!(matches!(
            parse_path_token_rules("a@b@c"),
            Err(ValidationError::MalformedPathToken { .. })
        ));
        assert!(matches!(
            parse_path_token_rules("@docs"),
            Err(ValidationError::EmptyRuleToken { .. })
        ));
    }

    #[test]
    fn test_normalize_treats_empty_as_unset() {
        let mut config = ProxyConfig::default();
        config.auth.token = Some("".into());
        config.upstream.account = Some("  ".into());
        config.upstream.branch = String::new();
        config.upstream.base_url = "http://127.0.0.1:9000".into();
        config.auth.path_tokens.push(PathTokenRule::new(" t ", "/docs"));

        normalize(&mut config);

        assert_eq!(config.auth.token, None);
        assert_eq!(config.upstream.account, None);
        assert_eq!(config.upstream.branch, "main");
        assert_eq!(config.upstream.base_url, "http://127.0.0.1:9000/");
        assert_eq!(config.auth.path_tokens[0], PathTokenRule::new("t", "docs"));
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.upstream.base_url = "ftp://example.com/".into();
        config.upstream.credential = Some("bad\nvalue".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::InvalidAddress { .. }));
        assert!(matches!(errors[1], ValidationError::InvalidBaseUrl { .. }));
        assert!(matches!(errors[2], ValidationError::InvalidHeaderValue { .. }));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }
}
