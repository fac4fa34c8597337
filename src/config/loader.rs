//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::GateConfig;
use crate::config::validation::{validate_config, ValidationError};

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

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GateConfig, ConfigError> {
    let config: GateConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::AuthScheme;

    const SAMPLE: &str = r#"
        [listener]
        bind_address = "127.0.0.1:9000"

        [gate]
        public_routes = ["/health", "/login", "/user/{id}/public"]

        [auth]
        scheme = "basic"
        realm = "staff"
        users = [
            { username = "hello", password = "world" },
            { username = "hello2", password = "wo:rld" },
        ]
    "#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.gate.public_routes.len(), 3);
        assert_eq!(config.auth.scheme, AuthScheme::Basic);
        assert_eq!(config.auth.realm, "staff");
        assert_eq!(config.auth.users[1].password, "wo:rld");
        // untouched sections fall back to defaults
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_bearer_config() {
        let config = parse_config(
            r#"
            [auth]
            scheme = "bearer"
            tokens = ["t0k3n"]
            "#,
        )
        .unwrap();
        assert_eq!(config.auth.scheme, AuthScheme::Bearer);
        assert_eq!(config.gate.public_routes, vec!["/health".to_string()]);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[auth]\nscheme = \"kerberos\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error() {
        let err = parse_config(
            r#"
            [gate]
            public_routes = ["/user/{id"]
            [auth]
            users = [{ username = "a", password = "b" }]
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/auth-gate.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
