//! The handler contract every route target satisfies.

use async_trait::async_trait;
use rustls_pki_types::CertificateDer;

use crate::error::HandlerError;
use crate::net::connection::Connection;

/// A unit of behavior bound to a path.
///
/// A handler writes a complete response (status line first, body bytes
/// after) to the connection's outbound sink. It is invoked at most
/// once per connection, with the peer's certificate (if one was
/// offered) and the decoded query input. Failures propagate to the
/// connection worker, which logs them and closes the connection; they
/// never reach sibling connections.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(
        &self,
        conn: &mut Connection,
        cert: Option<&CertificateDer<'static>>,
        input: &str,
    ) -> Result<(), HandlerError>;
}
