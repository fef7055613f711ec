//! Request-line reading and parsing.
//!
//! # Responsibilities
//! - Read one CRLF-terminated line, enforcing the 1024-byte cap
//! - Parse the line as an absolute URI and check the scheme
//! - Decode the query into the handler input string
//!
//! # Design Decisions
//! - The cap is checked while reading, before any parsing (early rejection)
//! - Scheme mismatch is its own error so the worker can answer 59 and
//!   stop without a routing lookup
//! - Query decoding is form-style: `+` → space first, then
//!   percent-decoding, lossy on invalid UTF-8

use percent_encoding::percent_decode_str;
use tokio::io::{AsyncRead, AsyncReadExt};
use url::Url;

use crate::error::RequestError;
use crate::protocol::SCHEME;

/// Maximum request-line length in bytes, excluding the CRLF terminator.
pub const MAX_REQUEST_LEN: usize = 1024;

/// A parsed request. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    host: String,
    path: String,
    input: String,
}

impl Request {
    /// Hostname the client addressed, as written in the request URI.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Path component, matched verbatim against the route table.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Decoded query string; empty when the request carried no query.
    ///
    /// This is the protocol's only channel for client-supplied data.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Parse a request line with its CRLF terminator already stripped.
    pub fn parse(line: &str) -> Result<Self, RequestError> {
        let url = Url::parse(line).map_err(|e| RequestError::Malformed(e.to_string()))?;

        if url.scheme() != SCHEME {
            return Err(RequestError::UnsupportedScheme(url.scheme().to_string()));
        }

        Ok(Self {
            host: url.host_str().unwrap_or_default().to_string(),
            path: url.path().to_string(),
            input: url.query().map(decode_query).unwrap_or_default(),
        })
    }
}

/// Read one request line from `reader` and parse it.
///
/// Enforces [`MAX_REQUEST_LEN`] while reading, so an unbounded line can
/// never buffer more than the cap plus the terminator.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, RequestError>
where
    R: AsyncRead + Unpin,
{
    let line = read_line(reader).await?;
    let line = std::str::from_utf8(&line)
        .map_err(|_| RequestError::Malformed("request line is not valid UTF-8".into()))?;
    Request::parse(line)
}

/// Read bytes until CRLF, returning the line without its terminator.
async fn read_line<R>(reader: &mut R) -> Result<Vec<u8>, RequestError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(128);
    let mut chunk = [0u8; 256];

    loop {
        if let Some(pos) = buf.windows(2).position(|w| w == b"\r\n") {
            if pos > MAX_REQUEST_LEN {
                return Err(RequestError::TooLong { limit: MAX_REQUEST_LEN });
            }
            buf.truncate(pos);
            return Ok(buf);
        }
        if buf.len() > MAX_REQUEST_LEN + 1 {
            return Err(RequestError::TooLong { limit: MAX_REQUEST_LEN });
        }

        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(RequestError::Malformed(
                "connection closed before request terminator".into(),
            ));
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Form-style decoding: plus-as-space, then percent-decoding.
///
/// `+` is replaced before percent-decoding so an encoded `%2B` survives
/// as a literal plus.
fn decode_query(query: &str) -> String {
    let spaced = query.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
