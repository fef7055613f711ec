//! Gemini wire protocol subsystem.
//!
//! # Data Flow
//! ```text
//! TLS connection (first line)
//!     → request.rs (cap check, CRLF strip, absolute-URI parse, query decode)
//!     → [routing layer picks handler]
//!     → response.rs (status line encoding)
//!     → Send to client, close
//! ```
//!
//! # Design Decisions
//! - One request per connection; no framing beyond the single CRLF line
//! - Request lines capped at 1024 bytes before the terminator
//! - Query decoding is form-style: plus-as-space, then percent-decoding

pub mod request;
pub mod response;

pub use request::{read_request, Request, MAX_REQUEST_LEN};
pub use response::{status_line, Status};

/// The only scheme this server speaks.
pub const SCHEME: &str = "gemini";

/// Default port for the protocol.
pub const DEFAULT_PORT: u16 = 1965;

/// Line terminator for requests and response headers.
pub const CRLF: &str = "\r\n";
