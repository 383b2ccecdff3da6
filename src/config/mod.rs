//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so a minimal or missing config file works
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;

pub use schema::AppConfig;
pub use schema::AuditConfig;
pub use schema::RateLimitConfig;
pub use schema::RegistryConfig;
pub use schema::TriggerConfig;
