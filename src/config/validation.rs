//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port, limits, timeouts non-zero)
//! - Check required paths are present
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::ServerConfig;

/// A single semantic violation in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The listener port is zero.
    ZeroPort,
    /// The admission limit is zero, which would serve nothing.
    ZeroMaxConnections,
    /// A deadline is zero; every connection would time out immediately.
    ZeroTimeout(&'static str),
    /// The certificate path is empty.
    EmptyCertPath,
    /// The private key path is empty.
    EmptyKeyPath,
    /// Content serving is enabled but the root is empty.
    EmptyContentRoot,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::ZeroPort => write!(f, "listener.port must be non-zero"),
            ValidationError::ZeroMaxConnections => {
                write!(f, "listener.max_connections must be non-zero")
            }
            ValidationError::ZeroTimeout(which) => {
                write!(f, "timeouts.{} must be non-zero", which)
            }
            ValidationError::EmptyCertPath => write!(f, "tls.cert_path must not be empty"),
            ValidationError::EmptyKeyPath => write!(f, "tls.key_path must not be empty"),
            ValidationError::EmptyContentRoot => {
                write!(f, "content.root must not be empty when content.enabled")
            }
        }
    }
}

/// Check a configuration for semantic violations, collecting every
/// error rather than stopping at the first.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }
    if config.timeouts.handshake_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("handshake_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.timeouts.response_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("response_secs"));
    }
    if config.tls.cert_path.is_empty() {
        errors.push(ValidationError::EmptyCertPath);
    }
    if config.tls.key_path.is_empty() {
        errors.push(ValidationError::EmptyKeyPath);
    }
    if config.content.enabled && config.content.root.is_empty() {
        errors.push(ValidationError::EmptyContentRoot);
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
    fn default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let mut config = ServerConfig::default();
        config.listener.port = 0;
        config.listener.max_connections = 0;
        config.timeouts.request_secs = 0;
        config.tls.cert_path.clear();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroPort));
        assert!(errors.contains(&ValidationError::ZeroMaxConnections));
        assert!(errors.contains(&ValidationError::ZeroTimeout("request_secs")));
        assert!(errors.contains(&ValidationError::EmptyCertPath));
    }

    #[test]
    fn content_root_checked_only_when_enabled() {
        let mut config = ServerConfig::default();
        config.content.root.clear();
        assert!(validate_config(&config).is_ok());

        config.content.enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyContentRoot]);
    }
}
