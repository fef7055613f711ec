//! Server setup and the per-connection worker.
//!
//! # Responsibilities
//! - Load the TLS identity and build the acceptor
//! - Expose the administrative surface (register/copy/remove routes,
//!   replace the not-found handler)
//! - Run the accept loop, one spawned worker per connection
//! - Drive each connection through parse → route → handle → close
//!
//! # Design Decisions
//! - Every worker exit path flushes and closes its connection; a
//!   handler failure is logged at the worker boundary and never
//!   reaches siblings or the accept loop
//! - After a 59 for an unsupported scheme the worker stops; no routing
//!   lookup happens for a request that was never valid

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsAcceptor;

use crate::config::{ServerConfig, TimeoutConfig};
use crate::error::{RequestError, ServerError};
use crate::net::connection::Connection;
use crate::net::listener::{ConnectionPermit, Listener};
use crate::net::tls::build_server_config;
use crate::protocol::Status;
use crate::routing::{Handler, Router};

/// A server instance: TLS identity, route table, and accept loop.
pub struct Server {
    config: ServerConfig,
    router: Arc<Router>,
    acceptor: TlsAcceptor,
}

impl Server {
    /// Build a server from a validated configuration.
    ///
    /// Reads the certificate/key pair from the configured paths; a
    /// broken identity aborts construction rather than surfacing per
    /// connection.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let cert_pem = std::fs::read(&config.tls.cert_path)
            .map_err(|e| ServerError::Tls(format!("failed to read {}: {e}", config.tls.cert_path)))?;
        let key_pem = std::fs::read(&config.tls.key_path)
            .map_err(|e| ServerError::Tls(format!("failed to read {}: {e}", config.tls.key_path)))?;
        let tls_config = build_server_config(&cert_pem, &key_pem)?;

        Ok(Self {
            config,
            router: Arc::new(Router::new()),
            acceptor: TlsAcceptor::from(tls_config),
        })
    }

    /// The shared route table.
    ///
    /// Clone the `Arc` to keep administering routes after the server
    /// has been consumed by [`Server::serve`].
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Bind `path` to `handler`, overwriting any existing binding.
    pub fn register(&self, path: impl Into<String>, handler: Arc<dyn Handler>) {
        self.router.register(path, handler);
    }

    /// Bind `new_path` to the handler currently at `path`.
    pub fn copy(&self, path: &str, new_path: impl Into<String>) -> bool {
        self.router.copy(path, new_path)
    }

    /// Remove the binding for `path`.
    pub fn remove(&self, path: &str) -> bool {
        self.router.remove(path)
    }

    /// Replace the not-found handler.
    pub fn set_not_found(&self, handler: Arc<dyn Handler>) {
        self.router.set_not_found(handler)
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the configured address and serve until interrupted.
    pub async fn listen(self) -> Result<(), ServerError> {
        let listener = Listener::bind(&self.config.listener).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already-bound listener.
    ///
    /// Blocks until ctrl-c. Accept failures are logged and the loop
    /// continues; no per-connection failure ever stops it.
    pub async fn serve(self, listener: Listener) -> Result<(), ServerError> {
        tracing::info!(
            address = ?listener.local_addr().ok(),
            max_connections = listener.max_connections(),
            "Server starting"
        );

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, addr, permit)) => {
                            let ctx = WorkerContext {
                                acceptor: self.acceptor.clone(),
                                router: Arc::clone(&self.router),
                                timeouts: self.config.timeouts.clone(),
                                log_dispatch: self.config.log_dispatch,
                            };
                            tokio::spawn(serve_connection(ctx, stream, addr, permit));
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Accept failed");
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received");
                    return Ok(());
                }
            }
        }
    }
}

/// Everything a connection worker needs, detached from the server.
struct WorkerContext {
    acceptor: TlsAcceptor,
    router: Arc<Router>,
    timeouts: TimeoutConfig,
    log_dispatch: bool,
}

/// One accepted connection, end to end.
///
/// Accepted → Parsing → Routing → Handling → Closed, with every error
/// path still reaching Closed.
async fn serve_connection(
    ctx: WorkerContext,
    stream: TcpStream,
    peer_addr: SocketAddr,
    permit: ConnectionPermit,
) {
    // Held until the worker finishes, releasing the admission slot
    // even if a handler panics.
    let _permit = permit;

    let handshake = Connection::establish(&ctx.acceptor, stream, peer_addr);
    let mut conn = match timeout(ctx.timeouts.handshake(), handshake).await {
        Ok(Ok(conn)) => conn,
        Ok(Err(e)) => {
            tracing::debug!(peer = %peer_addr, error = %e, "TLS handshake failed");
            return;
        }
        Err(_) => {
            tracing::debug!(peer = %peer_addr, "TLS handshake timed out");
            return;
        }
    };

    run_request(&mut conn, &ctx).await;

    if let Err(e) = conn.close().await {
        tracing::debug!(id = %conn.id(), error = %e, "Connection close failed");
    }
}

/// Parse the request, resolve a handler, invoke it exactly once.
async fn run_request(conn: &mut Connection, ctx: &WorkerContext) {
    let request = match timeout(ctx.timeouts.request(), conn.read_request()).await {
        Ok(Ok(request)) => request,
        Ok(Err(RequestError::UnsupportedScheme(scheme))) => {
            tracing::debug!(id = %conn.id(), scheme = %scheme, "Unsupported scheme");
            let _ = conn.send_header(Status::BadRequest, "Unsupported scheme").await;
            return;
        }
        Ok(Err(RequestError::Io(e))) => {
            // Transport fault while reading; nothing to answer.
            tracing::debug!(id = %conn.id(), error = %e, "Request read failed");
            return;
        }
        Ok(Err(err)) => {
            // TooLong or Malformed: answer a generic 59, then close.
            tracing::debug!(id = %conn.id(), error = %err, "Rejected request line");
            let _ = conn.send_header(Status::BadRequest, "Bad request").await;
            return;
        }
        Err(_) => {
            tracing::debug!(id = %conn.id(), "Request read timed out");
            return;
        }
    };

    let handler = ctx.router.lookup(request.path());
    let cert = conn.peer_certificate().cloned();

    let outcome = timeout(
        ctx.timeouts.response(),
        handler.handle(conn, cert.as_ref(), request.input()),
    )
    .await;

    match outcome {
        Ok(Ok(())) => {
            if ctx.log_dispatch {
                tracing::info!(
                    id = %conn.id(),
                    peer = %conn.peer_addr(),
                    path = %request.path(),
                    "Dispatched"
                );
            }
        }
        Ok(Err(e)) => {
            tracing::warn!(id = %conn.id(), path = %request.path(), error = %e, "Handler failed");
        }
        Err(_) => {
            tracing::warn!(id = %conn.id(), path = %request.path(), "Handler timed out");
        }
    }
}
