//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Parsed request (path)
//!     → router.rs (exact-match table lookup)
//!     → matched handler, or the not-found slot
//!     → handler.rs contract (write response to connection)
//!
//! Administration (any time, including while serving):
//!     register / copy / remove / set_not_found
//!     → atomic table and slot mutation
//! ```
//!
//! # Design Decisions
//! - Exact string equality only: no wildcards, no trailing-slash
//!   canonicalization, no pattern segments
//! - Table and slot are safe under concurrent dispatch; readers never
//!   block writers
//! - No-match falls through to a replaceable not-found handler rather
//!   than an error

pub mod handler;
pub mod router;

pub use handler::Handler;
pub use router::Router;
