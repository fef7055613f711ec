//! Fixed-content handler.

use async_trait::async_trait;
use rustls_pki_types::CertificateDer;

use crate::error::HandlerError;
use crate::net::connection::Connection;
use crate::protocol::Status;
use crate::routing::Handler;

/// Always writes the same status line and body, ignoring certificate
/// and input.
///
/// Doubles as the default not-found page
/// (`StaticPage::new(Status::NotFound, "Not found", Vec::new())`).
pub struct StaticPage {
    status: Status,
    meta: String,
    body: Vec<u8>,
}

impl StaticPage {
    pub fn new(status: Status, meta: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            meta: meta.into(),
            body: body.into(),
        }
    }

    /// Success page carrying `text/gemini` content.
    pub fn gemtext(body: impl Into<Vec<u8>>) -> Self {
        Self::new(Status::Success, "text/gemini", body)
    }
}

#[async_trait]
impl Handler for StaticPage {
    async fn handle(
        &self,
        conn: &mut Connection,
        _cert: Option<&CertificateDer<'static>>,
        _input: &str,
    ) -> Result<(), HandlerError> {
        conn.send_header(self.status, &self.meta).await?;
        conn.send(&self.body).await?;
        Ok(())
    }
}
