//! Audit logging subsystem.
//!
//! Every trigger attempt that reaches validation ends as exactly one row in
//! an append-only CSV file. Rows are never rewritten or deleted.

pub mod log;
pub mod record;

pub use log::{AuditError, CsvAuditLog};
pub use record::{AuditRecord, AuditStatus};
