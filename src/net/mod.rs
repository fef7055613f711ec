//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, admission semaphore)
//!     → tls.rs (server config: cert/key, client-cert policy)
//!     → connection.rs (handshake, peer certificate capture, lifecycle)
//!     → Hand off to the connection worker
//!
//! Connection States:
//!     Accepted → Parsing → Routing → Handling → Closed
//! ```
//!
//! # Design Decisions
//! - Bounded admission prevents resource exhaustion under floods
//! - The handshake runs on the connection's own task so a stalled
//!   client never blocks the accept loop
//! - Client certificates are requested but never rejected here; trust
//!   is a handler-level decision

pub mod connection;
pub mod listener;
pub mod tls;
