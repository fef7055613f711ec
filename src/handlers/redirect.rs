//! Redirect handlers.

use async_trait::async_trait;
use rustls_pki_types::CertificateDer;

use crate::error::HandlerError;
use crate::net::connection::Connection;
use crate::protocol::Status;
use crate::routing::Handler;

/// Body-less redirect to another location.
pub struct Redirect {
    location: String,
    status: Status,
}

impl Redirect {
    /// `30 <location>`: the client should retry here this once.
    pub fn temporary(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            status: Status::RedirectTemporary,
        }
    }

    /// `31 <location>`: the client should update its references.
    pub fn permanent(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            status: Status::RedirectPermanent,
        }
    }
}

#[async_trait]
impl Handler for Redirect {
    async fn handle(
        &self,
        conn: &mut Connection,
        _cert: Option<&CertificateDer<'static>>,
        _input: &str,
    ) -> Result<(), HandlerError> {
        conn.send_header(self.status, &self.location).await?;
        Ok(())
    }
}
