//! Reusable handler constructors.
//!
//! # Data Flow
//! ```text
//! Registration time:
//!     StaticPage / InputGate / Redirect / FilePage
//!     → Arc<dyn Handler> into the route table
//!
//! Dispatch time:
//!     handler.handle(connection, certificate, input)
//!     → status line (+ body) written to the connection
//! ```
//!
//! # Design Decisions
//! - Factories are constructors returning concrete handler types, so
//!   composition (gate around page, gate around gate) is explicit
//! - Content bytes pass through verbatim: no escaping, no reformatting

pub mod files;
pub mod input;
pub mod page;
pub mod redirect;

pub use files::{index_directory, FilePage};
pub use input::InputGate;
pub use page::StaticPage;
pub use redirect::Redirect;
