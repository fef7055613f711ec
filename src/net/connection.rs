//! Per-connection state and lifecycle.
//!
//! # Responsibilities
//! - Complete the TLS handshake and capture the peer certificate
//! - Generate unique connection IDs for tracing
//! - Expose the outbound byte sink handlers write to
//! - Guarantee flush-then-close on teardown
//!
//! # Design Decisions
//! - Exactly one request is served per connection; the stream is
//!   consumed by the worker and never shared
//! - The peer certificate is captured once after the handshake so
//!   handlers get an owned view without touching the session

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use rustls_pki_types::CertificateDer;
use tokio::io::{AsyncWriteExt, DuplexStream};
use tokio::net::TcpStream;
use tokio_rustls::server::TlsStream;
use tokio_rustls::TlsAcceptor;

use crate::error::{RequestError, ServerError};
use crate::protocol::response::{status_line, Status};
use crate::protocol::{read_request, Request};

/// Global atomic counter for connection IDs.
/// Relaxed ordering is sufficient since we only need uniqueness.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

enum Stream {
    Tls(TlsStream<TcpStream>),
    /// In-memory stream used by handler unit tests.
    #[allow(dead_code)]
    Mem(DuplexStream),
}

/// An accepted TLS session carrying exactly one request.
///
/// Created after the handshake completes, destroyed after the response
/// is flushed and the session closed, regardless of handler outcome.
pub struct Connection {
    id: ConnectionId,
    peer_addr: SocketAddr,
    peer_cert: Option<CertificateDer<'static>>,
    stream: Stream,
}

impl Connection {
    /// Perform the TLS handshake on an accepted TCP stream.
    ///
    /// The peer's end-entity certificate, if one was offered, is
    /// captured here. Handshake failure drops the connection.
    pub async fn establish(
        acceptor: &TlsAcceptor,
        stream: TcpStream,
        peer_addr: SocketAddr,
    ) -> Result<Self, ServerError> {
        let tls = acceptor
            .accept(stream)
            .await
            .map_err(ServerError::Handshake)?;

        let peer_cert = tls
            .get_ref()
            .1
            .peer_certificates()
            .and_then(|certs| certs.first())
            .cloned();

        Ok(Self {
            id: ConnectionId::new(),
            peer_addr,
            peer_cert,
            stream: Stream::Tls(tls),
        })
    }

    /// Build a connection over an in-memory duplex stream, for tests.
    #[allow(dead_code)]
    pub(crate) fn in_memory(
        stream: DuplexStream,
        peer_cert: Option<CertificateDer<'static>>,
    ) -> Self {
        Self {
            id: ConnectionId::new(),
            peer_addr: ([127, 0, 0, 1], 0).into(),
            peer_cert,
            stream: Stream::Mem(stream),
        }
    }

    /// This connection's ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The peer's socket address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// The certificate the client offered during the handshake, if any.
    ///
    /// Present whenever the client sent one; the transport never
    /// rejects a certificate, so trust checks belong to the caller.
    pub fn peer_certificate(&self) -> Option<&CertificateDer<'static>> {
        self.peer_cert.as_ref()
    }

    /// Read and parse the connection's single request line.
    pub(crate) async fn read_request(&mut self) -> Result<Request, RequestError> {
        match &mut self.stream {
            Stream::Tls(s) => read_request(s).await,
            Stream::Mem(s) => read_request(s).await,
        }
    }

    /// Write raw bytes to the outbound sink.
    pub async fn send(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        match &mut self.stream {
            Stream::Tls(s) => s.write_all(bytes).await,
            Stream::Mem(s) => s.write_all(bytes).await,
        }
    }

    /// Write a response header: `<status> <meta>CRLF`.
    pub async fn send_header(&mut self, status: Status, meta: &str) -> std::io::Result<()> {
        self.send(status_line(status, meta).as_bytes()).await
    }

    /// Flush buffered output and close the session.
    ///
    /// Runs on every exit path of the connection worker, including
    /// after handler failure.
    pub async fn close(&mut self) -> std::io::Result<()> {
        match &mut self.stream {
            Stream::Tls(s) => {
                s.flush().await?;
                s.shutdown().await
            }
            Stream::Mem(s) => {
                s.flush().await?;
                s.shutdown().await
            }
        }
    }
}
