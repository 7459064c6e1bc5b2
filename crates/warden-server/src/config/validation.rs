//! Configuration validation.

use super::types::ServerConfig;
use thiserror::Error;

/// Configuration errors reported by [`validate_config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JWT secret: must be at least 32 characters")]
    InvalidJwtSecret,

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid port: {0}")]
    InvalidPort(u16),

    #[error("Invalid token expiry: must be greater than zero")]
    InvalidTokenExpiry,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

/// Validate server configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate JWT secret
    if config.auth.jwt_secret.len() < 32 {
        errors.push(ConfigError::InvalidJwtSecret);
    }

    // Validate database URL
    if config.database.url.is_empty() {
        errors.push(ConfigError::InvalidDatabaseUrl);
    }

    // Validate port
    if config.server.port == 0 {
        errors.push(ConfigError::InvalidPort(0));
    }

    // Validate token expiry
    if config.auth.token_expiry_secs == 0 {
        errors.push(ConfigError::InvalidTokenExpiry);
    }

    // Validate log level
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigError::InvalidLogLevel(config.logging.level.clone()));
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
    use crate::config::types::*;

    #[test]
    fn test_invalid_jwt_secret() {
        let mut config = test_config();
        config.auth.jwt_secret = "short".to_string();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidJwtSecret)));
    }

    #[test]
    fn test_invalid_database_url() {
        let mut config = test_config();
        config.database.url = "".to_string();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidDatabaseUrl)));
    }

    #[test]
    fn test_invalid_port() {
        let mut config = test_config();
        config.server.port = 0;

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidPort(0))));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = test_config();
        config.logging.level = "loud".to_string();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidLogLevel(_))));
    }

    #[test]
    fn test_valid_config() {
        let config = test_config();
        let result = validate_config(&config);
        assert!(result.is_ok());
    }

    fn test_config() -> ServerConfig {
        ServerConfig {
            server: ServerBindConfig {
                host: "localhost".to_string(),
                port: 4000,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/warden".to_string(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 10,
                idle_timeout_secs: 600,
            },
            auth: AuthConfig {
                jwt_secret: "a".repeat(32),
                token_expiry_secs: 14400,
            },
            logging: LoggingConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}
