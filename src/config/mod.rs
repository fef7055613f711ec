//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → consumed at server construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; routing changes go through the
//!   router's own operations, not config reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ContentConfig;
pub use schema::ListenerConfig;
pub use schema::ServerConfig;
pub use schema::TimeoutConfig;
pub use schema::TlsConfig;
