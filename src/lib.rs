//! Gemini protocol server library.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────┐
//!                      │                 GEMINID                    │
//!                      │                                            │
//!   TLS connection     │  ┌─────────┐   ┌──────────┐   ┌─────────┐ │
//!   ──────────────────►│  │   net   │──►│ protocol │──►│ routing │ │
//!                      │  │listener │   │  parser  │   │  table  │ │
//!                      │  └─────────┘   └──────────┘   └────┬────┘ │
//!                      │                                    │      │
//!                      │                                    ▼      │
//!   Response           │  ┌─────────┐                 ┌─────────┐  │
//!   ◄──────────────────┼──│ status  │◄────────────────│ handler │  │
//!                      │  │  line   │                 │         │  │
//!                      │  └─────────┘                 └─────────┘  │
//!                      │                                           │
//!                      │  Cross-cutting: config, error taxonomy    │
//!                      └───────────────────────────────────────────┘
//! ```
//!
//! One request per connection: the worker parses the single request
//! line, resolves a handler by exact path match, lets it write the
//! response, then closes the session.

// Core subsystems
pub mod config;
pub mod error;
pub mod net;
pub mod protocol;
pub mod routing;
pub mod server;

// Handler factories
pub mod handlers;

pub use config::ServerConfig;
pub use error::{HandlerError, RequestError, ServerError};
pub use protocol::{Request, Status};
pub use routing::{Handler, Router};
pub use server::Server;
