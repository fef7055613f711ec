//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! server. All types derive Serde traits for deserialization from
//! config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol::DEFAULT_PORT;

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, admission limit).
    pub listener: ListenerConfig,

    /// TLS identity presented to clients.
    pub tls: TlsConfig,

    /// Per-connection deadlines.
    pub timeouts: TimeoutConfig,

    /// Static content serving.
    pub content: ContentConfig,

    /// Log peer address and path on each successful dispatch.
    pub log_dispatch: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            tls: TlsConfig::default(),
            timeouts: TimeoutConfig::default(),
            content: ContentConfig::default(),
            log_dispatch: true,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl ListenerConfig {
    /// The bind address as `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_connections: 1_024,
        }
    }
}

/// TLS identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to certificate chain file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: "cert.pem".to_string(),
            key_path: "key.pem".to_string(),
        }
    }
}

/// Per-connection deadlines.
///
/// Each bounds one stage of the connection lifecycle so a stalled
/// client cannot hold a worker slot indefinitely.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// TLS handshake deadline in seconds.
    pub handshake_secs: u64,

    /// Request-line read deadline in seconds.
    pub request_secs: u64,

    /// Handler execution and response write deadline in seconds.
    pub response_secs: u64,
}

impl TimeoutConfig {
    pub fn handshake(&self) -> Duration {
        Duration::from_secs(self.handshake_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    pub fn response(&self) -> Duration {
        Duration::from_secs(self.response_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            handshake_secs: 10,
            request_secs: 30,
            response_secs: 60,
        }
    }
}

/// Static content serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Index the content root at startup.
    pub enabled: bool,

    /// Directory whose files become routes.
    pub root: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            root: "content".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_the_protocol_port() {
        let config = ServerConfig::default();
        assert_eq!(config.listener.port, 1965);
        assert_eq!(config.listener.address(), "0.0.0.0:1965");
        assert!(config.listener.max_connections > 0);
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.port, 1965);
        assert_eq!(config.tls.cert_path, "cert.pem");
        assert!(!config.content.enabled);
    }

    #[test]
    fn partial_toml_overrides() {
        let config: ServerConfig = toml::from_str(
            r#"
            [listener]
            port = 1966
            max_connections = 8

            [content]
            enabled = true
            root = "/srv/gemini"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.port, 1966);
        assert_eq!(config.listener.max_connections, 8);
        assert_eq!(config.listener.host, "0.0.0.0");
        assert!(config.content.enabled);
        assert_eq!(config.content.root, "/srv/gemini");
    }
}
