//! Response status codes and header encoding.
//!
//! # Responsibilities
//! - Model the two-digit status registry
//! - Encode the mandatory `<status> <meta>CRLF` header line
//!
//! # Design Decisions
//! - The core only ever emits 51 and 59 itself; everything else is
//!   handler-level, so the full registry is available but unenforced
//! - Body bytes are written verbatim after the header, never reformatted

use std::fmt;

use crate::protocol::CRLF;

/// Two-digit response status.
///
/// The first digit selects the response class; the second refines it.
/// Handlers are free to emit any of these; the server core does not
/// restrict which statuses a response may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 10: client should resubmit with user input as the query.
    Input,
    /// 11: as `Input`, but the input is sensitive (not echoed).
    SensitiveInput,
    /// 20: success; meta is the body's mimetype.
    Success,
    /// 30: temporary redirect; meta is the new location.
    RedirectTemporary,
    /// 31: permanent redirect; meta is the new location.
    RedirectPermanent,
    /// 40: temporary failure.
    TemporaryFailure,
    /// 41: server unavailable.
    ServerUnavailable,
    /// 42: CGI error.
    CgiError,
    /// 43: proxy error.
    ProxyError,
    /// 44: slow down; meta is a retry delay in seconds.
    SlowDown,
    /// 50: permanent failure.
    PermanentFailure,
    /// 51: resource not found.
    NotFound,
    /// 52: resource gone.
    Gone,
    /// 53: proxy request refused.
    ProxyRequestRefused,
    /// 59: bad request (malformed line or unsupported scheme).
    BadRequest,
    /// 60: client certificate required.
    CertificateRequired,
    /// 61: client certificate not authorised.
    CertificateNotAuthorised,
    /// 62: client certificate not valid.
    CertificateNotValid,
}

impl Status {
    /// The wire value of this status.
    pub fn code(self) -> u8 {
        match self {
            Status::Input => 10,
            Status::SensitiveInput => 11,
            Status::Success => 20,
            Status::RedirectTemporary => 30,
            Status::RedirectPermanent => 31,
            Status::TemporaryFailure => 40,
            Status::ServerUnavailable => 41,
            Status::CgiError => 42,
            Status::ProxyError => 43,
            Status::SlowDown => 44,
            Status::PermanentFailure => 50,
            Status::NotFound => 51,
            Status::Gone => 52,
            Status::ProxyRequestRefused => 53,
            Status::BadRequest => 59,
            Status::CertificateRequired => 60,
            Status::CertificateNotAuthorised => 61,
            Status::CertificateNotValid => 62,
        }
    }

    /// True for the 2x class, where body bytes follow the header.
    pub fn is_success(self) -> bool {
        self.code() / 10 == 2
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Encode the mandatory response header: `<status> <meta>CRLF`.
pub fn status_line(status: Status, meta: &str) -> String {
    format!("{} {}{}", status.code(), meta, CRLF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(Status::Input.code(), 10);
        assert_eq!(Status::SensitiveInput.code(), 11);
        assert_eq!(Status::Success.code(), 20);
        assert_eq!(Status::RedirectTemporary.code(), 30);
        assert_eq!(Status::RedirectPermanent.code(), 31);
        assert_eq!(Status::NotFound.code(), 51);
        assert_eq!(Status::BadRequest.code(), 59);
        assert_eq!(Status::CertificateRequired.code(), 60);
    }

    #[test]
    fn header_encoding() {
        assert_eq!(status_line(Status::Success, "text/gemini"), "20 text/gemini\r\n");
        assert_eq!(status_line(Status::NotFound, "Not found"), "51 Not found\r\n");
        assert_eq!(status_line(Status::RedirectTemporary, "/x"), "30 /x\r\n");
    }

    #[test]
    fn success_class() {
        assert!(Status::Success.is_success());
        assert!(!Status::NotFound.is_success());
        assert!(!Status::Input.is_success());
    }
}
