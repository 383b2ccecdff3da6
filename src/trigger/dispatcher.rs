//! Trigger validation, dispatch, and outcome classification.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};

use crate::config::TriggerConfig;
use crate::registry::Flow;

/// Coarse classification of a transport-level dispatch failure.
///
/// The raw error text goes to the tracing log only; users see a generic
/// notice, never internal error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connect,
    Other,
}

/// Terminal state of one trigger attempt, past the rate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Target answered 200 or 202.
    Ok { status: u16 },

    /// Name or access code blank after trimming. No outbound call made.
    ValidationError,

    /// Access code did not match the flow's launch key. No outbound call
    /// made.
    AccessDenied,

    /// Target answered with any other status.
    HttpError { status: u16 },

    /// The call itself failed (timeout, DNS, connection refused, ...).
    Exception { kind: FailureKind },
}

/// Submitted trigger form, untrusted.
#[derive(Debug, Clone)]
pub struct TriggerRequest {
    pub name: String,
    pub key: String,
}

impl TriggerRequest {
    /// Submitted name after trimming.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }
}

/// Validates a trigger request and issues the single outbound call.
pub struct TriggerDispatcher {
    client: reqwest::Client,
    timeout: Duration,
    source_tag: String,
}

impl TriggerDispatcher {
    pub fn new(config: &TriggerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(config.timeout_secs),
            source_tag: config.source_tag.clone(),
        }
    }

    /// Run the attempt to a terminal outcome. Exactly one outbound call is
    /// made, and only when validation and the secret check pass. No retry.
    pub async fn run(&self, flow: &Flow, request: &TriggerRequest) -> TriggerOutcome {
        let name = request.name.trim();
        let key = request.key.trim();

        if name.is_empty() || key.is_empty() {
            return TriggerOutcome::ValidationError;
        }
        if key != flow.launch_key {
            return TriggerOutcome::AccessDenied;
        }

        self.dispatch(flow, name).await
    }

    async fn dispatch(&self, flow: &Flow, name: &str) -> TriggerOutcome {
        let trigger_time = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let result = self
            .client
            .get(flow.flow_url.clone())
            .timeout(self.timeout)
            .query(&[
                ("triggered_by", name),
                ("trigger_time", trigger_time.as_str()),
                ("source", self.source_tag.as_str()),
                ("flow_id", flow.id.as_str()),
            ])
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                if status == 200 || status == 202 {
                    tracing::info!(flow_id = %flow.id, status, "Flow triggered");
                    TriggerOutcome::Ok { status }
                } else {
                    tracing::warn!(flow_id = %flow.id, status, "Flow target rejected trigger");
                    TriggerOutcome::HttpError { status }
                }
            }
            Err(error) => {
                let kind = if error.is_timeout() {
                    FailureKind::Timeout
                } else if error.is_connect() {
                    FailureKind::Connect
                } else {
                    FailureKind::Other
                };
                tracing::error!(flow_id = %flow.id, %error, ?kind, "Flow dispatch failed");
                TriggerOutcome::Exception { kind }
            }
        }
    }
}
