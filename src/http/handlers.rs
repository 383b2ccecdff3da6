//! Request handlers: dashboard, trigger form, and the trigger state machine.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Form, Path, Query, State};
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::audit::{AuditRecord, AuditStatus};
use crate::http::pages::{self, Notice};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::trigger::{TriggerOutcome, TriggerRequest};

/// Transient notice parameters carried back through a redirect.
#[derive(Debug, Deserialize)]
pub struct NoticeParams {
    notice: Option<String>,
    level: Option<String>,
}

impl NoticeParams {
    fn into_notice(self) -> Option<Notice> {
        let message = self.notice?;
        Some(Notice {
            level: self.level.unwrap_or_else(|| "info".to_string()),
            message,
        })
    }
}

/// Trigger form body. Missing fields are treated as empty, not rejected.
#[derive(Debug, Deserialize)]
pub struct TriggerForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    key: String,
}

/// `GET /`: dashboard listing all flows.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<NoticeParams>,
) -> Response {
    match state.registry.resolve() {
        Ok(flows) => Html(pages::dashboard(&flows, params.into_notice().as_ref())).into_response(),
        Err(error) => {
            tracing::error!(%error, "Flow registry resolution failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::dashboard(
                    &[],
                    Some(&Notice::new("danger", "Kunne ikke laste flyter.")),
                )),
            )
                .into_response()
        }
    }
}

/// `GET /flow/{id}`: trigger form for one flow.
pub async fn flow_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<NoticeParams>,
) -> Response {
    match state.registry.find(&id) {
        Ok(Some(flow)) => {
            Html(pages::flow_form(&flow, params.into_notice().as_ref())).into_response()
        }
        Ok(None) => redirect_home(Notice::new("warning", "Ukjent flyt.")),
        Err(error) => {
            tracing::error!(%error, "Flow registry resolution failed");
            redirect_home(Notice::new("danger", "Kunne ikke laste flyter."))
        }
    }
}

/// `GET /healthz`: liveness probe.
pub async fn healthz() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
    }))
}

/// `POST /trigger/{id}`: run one trigger attempt to a terminal state.
///
/// Every branch ends in a redirect carrying a notice. Not-found and
/// rate-limited attempts are deliberately absent from the audit log; every
/// other terminal state appends exactly one record.
pub async fn trigger(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Form(form): Form<TriggerForm>,
) -> Response {
    let flow = match state.registry.find(&id) {
        Ok(Some(flow)) => flow,
        Ok(None) => {
            tracing::warn!(flow_id = %id, "Trigger for unknown flow");
            return redirect_home(Notice::new("warning", "Ukjent flyt."));
        }
        Err(error) => {
            tracing::error!(%error, "Flow registry resolution failed");
            return redirect_home(Notice::new("danger", "Kunne ikke laste flyter."));
        }
    };

    let client_ip = addr.ip().to_string();
    if state.rate_limit_enabled && !state.limiter.allow(&client_ip) {
        tracing::warn!(client = %client_ip, flow_id = %flow.id, "Rate limit exceeded");
        metrics::record_rate_limited();
        return redirect_to_flow(
            &flow.id,
            Notice::new("warning", "For mange forsøk. Vent litt og prøv igjen."),
        );
    }

    let request = TriggerRequest {
        name: form.name,
        key: form.key,
    };
    let outcome = state.dispatcher.run(&flow, &request).await;

    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());
    let (status, http_status, notice) = match outcome {
        TriggerOutcome::Ok { status } => (
            AuditStatus::Ok,
            Some(status),
            Notice::new("success", "Flyten ble trigget og logget!"),
        ),
        TriggerOutcome::ValidationError => (
            AuditStatus::ValidationError,
            None,
            Notice::new("warning", "Vennligst fyll ut begge felt"),
        ),
        TriggerOutcome::AccessDenied => (
            AuditStatus::AccessDenied,
            None,
            Notice::new("danger", "Feil kode. Prøv igjen."),
        ),
        TriggerOutcome::HttpError { status } => (
            AuditStatus::HttpError,
            Some(status),
            Notice::new(
                "danger",
                format!("Feil ved kjøring. Statuskode: {status}"),
            ),
        ),
        TriggerOutcome::Exception { .. } => (
            AuditStatus::Exception,
            None,
            Notice::new("danger", "En feil oppstod under kjøring av flyten."),
        ),
    };

    metrics::record_trigger(status.as_str());

    let mut record = AuditRecord::new(&flow, request.trimmed_name(), status)
        .with_client(Some(client_ip), user_agent);
    if let Some(code) = http_status {
        record = record.with_http_status(code);
    }
    if let Err(error) = state.audit.append(&record) {
        // The attempt already ran; losing the log line must not take the
        // service down.
        tracing::error!(%error, flow_id = %flow.id, "Audit log append failed");
    }

    redirect_to_flow(&flow.id, notice)
}

fn redirect_home(notice: Notice) -> Response {
    Redirect::to(&format!("/?{}", notice.to_query())).into_response()
}

fn redirect_to_flow(id: &str, notice: Notice) -> Response {
    Redirect::to(&format!("/flow/{}?{}", id, notice.to_query())).into_response()
}
