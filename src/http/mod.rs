//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (dashboard, form, trigger state machine)
//!     → pages.rs (minimal server-rendered HTML)
//! ```

pub mod handlers;
pub mod pages;
pub mod request;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
