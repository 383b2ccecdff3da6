//! Append-only CSV audit log.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

use crate::audit::record::AuditRecord;

const HEADER: [&str; 8] = [
    "time_utc",
    "flow_id",
    "flow_title",
    "name",
    "status",
    "http_status",
    "ip",
    "ua",
];

/// Error type for audit log appends.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only CSV file with a fixed header row.
///
/// The file and its parent directories are created on first append. Writers
/// serialize behind a mutex so concurrent requests cannot interleave rows.
pub struct CsvAuditLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvAuditLog {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Append exactly one row. Prior rows are never touched.
    pub fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let new_file = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if new_file {
            writer.write_record(HEADER)?;
        }
        let http_status = record
            .http_status
            .map(|s| s.to_string())
            .unwrap_or_default();
        writer.write_record([
            record.time_utc.as_str(),
            record.flow_id.as_str(),
            record.flow_title.as_str(),
            record.name.as_str(),
            record.status.as_str(),
            http_status.as_str(),
            record.client_ip.as_deref().unwrap_or(""),
            record.user_agent.as_deref().unwrap_or(""),
        ])?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::record::AuditStatus;
    use crate::registry::Flow;
    use url::Url;

    fn flow() -> Flow {
        Flow {
            id: "deploy".into(),
            title: "Deploy".into(),
            description: String::new(),
            flow_url: Url::parse("https://example.com/hook").unwrap(),
            launch_key: "k".into(),
        }
    }

    fn read_lines(log: &CsvAuditLog) -> Vec<String> {
        fs::read_to_string(log.path())
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn first_append_creates_dirs_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvAuditLog::new(dir.path().join("logs/trigger_log.csv"));

        let record = AuditRecord::new(&flow(), "Ola", AuditStatus::Ok).with_http_status(200);
        log.append(&record).unwrap();

        let lines = read_lines(&log);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "time_utc,flow_id,flow_title,name,status,http_status,ip,ua"
        );
        assert!(lines[1].contains("deploy,Deploy,Ola,OK,200,,"));
    }

    #[test]
    fn header_is_written_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvAuditLog::new(dir.path().join("trigger_log.csv"));

        let record = AuditRecord::new(&flow(), "Ola", AuditStatus::AccessDenied);
        log.append(&record).unwrap();
        log.append(&record).unwrap();

        let lines = read_lines(&log);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with("time_utc")).count(), 1);
    }

    #[test]
    fn missing_optional_fields_serialize_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvAuditLog::new(dir.path().join("trigger_log.csv"));

        let record = AuditRecord::new(&flow(), "", AuditStatus::ValidationError);
        log.append(&record).unwrap();

        let lines = read_lines(&log);
        assert!(lines[1].ends_with("VALIDATION_ERROR,,,"));
        assert!(lines[1].contains(",EMPTY,"));
    }

    #[test]
    fn client_fields_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvAuditLog::new(dir.path().join("trigger_log.csv"));

        let record = AuditRecord::new(&flow(), "Ola", AuditStatus::Ok)
            .with_http_status(202)
            .with_client(Some("10.0.0.1".into()), Some("curl/8.0"));
        log.append(&record).unwrap();

        let lines = read_lines(&log);
        assert!(lines[1].ends_with("OK,202,10.0.0.1,curl/8.0"));
    }
}
