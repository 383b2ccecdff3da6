//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`, initialized in `main`
//! - Metrics are cheap counter increments; the Prometheus endpoint is
//!   opt-in via config
//! - Request ID flows through all log lines via the tracing middleware

pub mod metrics;
