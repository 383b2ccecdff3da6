//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming trigger request:
//!     → rate_limit.rs (check per-IP sliding window)
//!     → handler validation (form fields, access code)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a throttled client gets a notice, never a dispatch
//! - No trust in client input

pub mod rate_limit;

pub use rate_limit::{Clock, SlidingWindowLimiter, SystemClock};
