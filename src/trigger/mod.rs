//! Trigger dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! RECEIVED (handler: flow lookup, rate check)
//!     → dispatcher.rs (validate → secret check → outbound GET)
//!     → terminal outcome (OK | VALIDATION_ERROR | ACCESS_DENIED |
//!       HTTP_ERROR | EXCEPTION)
//!     → audit log + user notice
//! ```

pub mod dispatcher;

pub use dispatcher::{FailureKind, TriggerDispatcher, TriggerOutcome, TriggerRequest};
