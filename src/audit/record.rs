//! Audit record types.

use chrono::{SecondsFormat, Utc};

use crate::registry::Flow;

/// User agents are truncated to this many characters before persisting.
const MAX_USER_AGENT_CHARS: usize = 200;

/// Terminal outcome of a trigger attempt, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    Ok,
    ValidationError,
    AccessDenied,
    HttpError,
    Exception,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Ok => "OK",
            AuditStatus::ValidationError => "VALIDATION_ERROR",
            AuditStatus::AccessDenied => "ACCESS_DENIED",
            AuditStatus::HttpError => "HTTP_ERROR",
            AuditStatus::Exception => "EXCEPTION",
        }
    }
}

/// One persisted line describing a trigger attempt.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    /// UTC timestamp, second precision, trailing `Z`.
    pub time_utc: String,
    pub flow_id: String,
    pub flow_title: String,
    /// Submitted name, or the literal `EMPTY` when it was blank.
    pub name: String,
    pub status: AuditStatus,
    pub http_status: Option<u16>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl AuditRecord {
    /// Build a record for `flow` stamped with the current time.
    pub fn new(flow: &Flow, name: &str, status: AuditStatus) -> Self {
        let name = name.trim();
        Self {
            time_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            flow_id: flow.id.clone(),
            flow_title: flow.title.clone(),
            name: if name.is_empty() {
                "EMPTY".to_string()
            } else {
                name.to_string()
            },
            status,
            http_status: None,
            client_ip: None,
            user_agent: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_client(mut self, ip: Option<String>, user_agent: Option<&str>) -> Self {
        self.client_ip = ip;
        self.user_agent = user_agent.map(|ua| ua.chars().take(MAX_USER_AGENT_CHARS).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn blank_name_becomes_empty_marker() {
        let record = AuditRecord::new(&flow(), "   ", AuditStatus::ValidationError);
        assert_eq!(record.name, "EMPTY");
    }

    #[test]
    fn long_user_agent_truncates_to_200_chars() {
        let ua = "x".repeat(500);
        let record =
            AuditRecord::new(&flow(), "Ola", AuditStatus::Ok).with_client(None, Some(&ua));
        assert_eq!(record.user_agent.unwrap().chars().count(), 200);
    }

    #[test]
    fn timestamp_ends_with_z() {
        let record = AuditRecord::new(&flow(), "Ola", AuditStatus::Ok);
        assert!(record.time_utc.ends_with('Z'));
    }
}
