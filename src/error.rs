//! Error taxonomy for the server.
//!
//! # Responsibilities
//! - One variant per failure class named in the connection lifecycle
//! - Keep per-connection failures distinguishable from listener failures
//!
//! # Design Decisions
//! - Per-connection errors are contained at the worker boundary and
//!   logged; only bind errors abort startup
//! - Request errors carry enough context to pick the wire status

use thiserror::Error;

/// Failures raised while parsing a single request line.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request line exceeded the protocol's 1024-byte maximum.
    #[error("request line exceeds {limit} bytes")]
    TooLong {
        /// The enforced maximum, excluding the CRLF terminator.
        limit: usize,
    },

    /// The request line is not a valid absolute URI.
    #[error("malformed request line: {0}")]
    Malformed(String),

    /// The URI parsed but its scheme is not `gemini`.
    ///
    /// Routing must not be attempted after this; the worker answers 59
    /// and closes.
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// The connection failed while the request line was being read.
    ///
    /// A transport fault, not a protocol violation; the worker closes
    /// without attempting a response.
    #[error("request read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure raised by a handler while producing its response.
///
/// Caught at the worker boundary; never crosses into sibling workers or
/// the accept loop.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Writing the response to the connection failed.
    #[error("connection write failed: {0}")]
    Io(#[from] std::io::Error),

    /// Application-level failure inside the handler.
    #[error("{0}")]
    Other(String),
}

/// Top-level server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind the listening socket.
    #[error("failed to bind: {0}")]
    Bind(std::io::Error),

    /// Failed to accept a TCP connection.
    #[error("failed to accept: {0}")]
    Accept(std::io::Error),

    /// TLS negotiation with a client failed or timed out.
    #[error("TLS handshake failed: {0}")]
    Handshake(std::io::Error),

    /// The certificate/key pair could not be loaded or was rejected.
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::loader::ConfigError),

    /// Filesystem indexing failed while registering content handlers.
    #[error("content indexing failed: {0}")]
    Index(std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let e = RequestError::TooLong { limit: 1024 };
        assert!(e.to_string().contains("1024"));

        let e = RequestError::UnsupportedScheme("https".into());
        assert!(e.to_string().contains("https"));
    }
}
