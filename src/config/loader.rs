//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{LogFormat, ProxyConfig};
use crate::config::validation::{normalize, parse_path_token_rules, validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a TOML document into a configuration, without validation.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Overlay environment-style variables onto a configuration.
///
/// Empty values are treated as unset so that a blank `GH_BRANCH=` keeps the
/// default branch.
pub fn apply_env<I, K, V>(config: &mut ProxyConfig, vars: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    for (key, value) in vars {
        let value: String = value.into();
        if value.trim().is_empty() {
            continue;
        }
        match key.as_ref() {
            "TOKEN" => config.auth.token = Some(value),
            "TOKEN_PATH" => {
                config.auth.path_tokens = parse_path_token_rules(&value)
                    .map_err(|e| ConfigError::Validation(vec![e]))?;
            }
            "GH_NAME" => config.upstream.account = Some(value),
            "GH_REPO" => config.upstream.repository = Some(value),
            "GH_BRANCH" => config.upstream.branch = value,
            "GH_TOKEN" => config.upstream.credential = Some(value),
            "ERROR" => config.upstream.error_message = Some(value),
            "BIND_ADDRESS" => config.listener.bind_address = value,
            "UPSTREAM_BASE_URL" => config.upstream.base_url = value,
            "USER_AGENT" => config.upstream.user_agent = value,
            "LOG_FORMAT" => {
                config.observability.log_format = if value.eq_ignore_ascii_case("json") {
                    LogFormat::Json
                } else {
                    LogFormat::Text
                };
            }
            "METRICS_ADDRESS" => {
                config.observability.metrics_enabled = true;
                config.observability.metrics_address = value;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Normalize and validate, turning the result into a load error.
pub fn finalize(mut config: ProxyConfig) -> Result<ProxyConfig, ConfigError> {
    normalize(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load configuration from an optional TOML file, then the given variables.
pub fn load_config<I, K, V>(path: Option<&Path>, vars: I) -> Result<ProxyConfig, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            parse_config(&content)?
        }
        None => ProxyConfig::default(),
    };

    apply_env(&mut config, vars)?;
    finalize(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::PathTokenRule;

    #[test]
    fn test_env_overlay() {
        let vars = [
            ("TOKEN", "admin"),
            ("TOKEN_PATH", "t1@docs,t2@img"),
            ("GH_NAME", "foo"),
            ("GH_REPO", "bar"),
            ("GH_BRANCH", ""),
            ("GH_TOKEN", "ghp_secret"),
            ("ERROR", "nope"),
            ("PATH", "/usr/bin"),
        ];
        let config = load_config(None, vars).unwrap();

        assert_eq!(config.auth.token.as_deref(), Some("admin"));
        assert_eq!(
            config.auth.path_tokens,
            vec![PathTokenRule::new("t1", "docs"), PathTokenRule::new("t2", "img")]
        );
        assert_eq!(config.upstream.account.as_deref(), Some("foo"));
        assert_eq!(config.upstream.repository.as_deref(), Some("bar"));
        assert_eq!(config.upstream.branch, "main");
        assert_eq!(config.upstream.credential.as_deref(), Some("ghp_secret"));
        assert_eq!(config.upstream.error_message.as_deref(), Some("nope"));
    }

    #[test]
    fn test_malformed_token_path_is_fatal() {
        let err = load_config(None, [("TOKEN_PATH", "t1@docs,broken")]).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_toml_file_sections() {
        let toml = r#"
            [listener]
            bind_address = "127.0.0.1:3000"

            [auth]
            token = "admin"

            [[auth.path_tokens]]
            token = "t1"
            path = "/docs"

            [upstream]
            account = "foo"
            branch = "dev"

            [observability]
            log_format = "json"
        "#;
        let mut config = parse_config(toml).unwrap();
        apply_env(&mut config, [("GH_BRANCH", "release")]).unwrap();
        let config = finalize(config).unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert_eq!(config.auth.path_tokens, vec![PathTokenRule::new("t1", "docs")]);
        assert_eq!(config.upstream.account.as_deref(), Some("foo"));
        assert_eq!(config.upstream.branch, "release");
        assert_eq!(config.upstream.base_url, "https://raw.githubusercontent.com/");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let vars: [(&str, &str); 0] = [];
        let err = load_config(Some(Path::new("/nonexistent/raw-proxy.toml")), vars).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
