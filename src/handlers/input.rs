//! Two-phase input-prompt gate.

use std::sync::Arc;

use async_trait::async_trait;
use rustls_pki_types::CertificateDer;

use crate::error::HandlerError;
use crate::net::connection::Connection;
use crate::protocol::Status;
use crate::routing::Handler;

/// Prompts for input, then delegates.
///
/// First phase: an empty query answers `10 <prompt>` (`11` when the
/// input is sensitive), telling the client to resubmit the same path
/// with the user's input as the query. Second phase: a non-empty query
/// is passed through to the inner handler unchanged. No state is kept
/// between the phases; the client round-trip carries it.
pub struct InputGate {
    inner: Arc<dyn Handler>,
    prompt: String,
    sensitive: bool,
}

impl InputGate {
    pub fn new(inner: Arc<dyn Handler>, prompt: impl Into<String>, sensitive: bool) -> Self {
        Self {
            inner,
            prompt: prompt.into(),
            sensitive,
        }
    }
}

#[async_trait]
impl Handler for InputGate {
    async fn handle(
        &self,
        conn: &mut Connection,
        cert: Option<&CertificateDer<'static>>,
        input: &str,
    ) -> Result<(), HandlerError> {
        if input.is_empty() {
            let status = if self.sensitive {
                Status::SensitiveInput
            } else {
                Status::Input
            };
            conn.send_header(status, &self.prompt).await?;
            return Ok(());
        }

        self.inner.handle(conn, cert, input).await
    }
}
