//! HTTP surface: webhook reply, simulation, outbound send.
//!
//! Thin glue over the automation engine. The webhook always answers with a
//! TwiML document; handoff dispatch runs on its own task and can never alter
//! or delay the reply.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::automation::{
    AutomationConfig, Flow, build_twiml, find_handoff_target, find_matching_flow, handoff_summary,
    validate,
};
use crate::error::{TransportError, Violation};
use crate::transport::MessageTransport;

/// Shared state for all routes.
#[derive(Clone)]
pub struct AppState {
    /// Immutable config snapshot; every request evaluates against it.
    pub config: Arc<AutomationConfig>,
    /// Outbound transport, absent when Twilio credentials are not set.
    pub transport: Option<Arc<dyn MessageTransport>>,
}

/// Build the service routes.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .route("/api/simulate", post(simulate))
        .route("/api/send", post(send_message))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// Inbound webhook form fields (Twilio posts many more; the rest are ignored).
#[derive(Debug, Deserialize)]
struct WebhookParams {
    #[serde(default, rename = "From")]
    from: String,
    #[serde(default, rename = "Body")]
    body: String,
}

/// POST /webhook
///
/// Match the inbound message, answer with the rendered TwiML document, and
/// fire the handoff notification (if any) on a separate task.
async fn webhook(
    State(state): State<AppState>,
    Form(params): Form<WebhookParams>,
) -> impl IntoResponse {
    let matched = find_matching_flow(&params.body, &state.config.flows);
    let responses = matched.map(|flow| flow.responses.as_slice()).unwrap_or(&[]);
    let twiml = build_twiml(responses, &state.config.fallback_message);

    if let Some(flow) = matched {
        info!(flow_id = %flow.id, sender = %params.from, "Inbound message matched flow");
    } else {
        info!(sender = %params.from, "Inbound message fell back");
    }

    dispatch_handoff(&state, responses, &params.from, &params.body);

    ([(header::CONTENT_TYPE, "text/xml")], twiml)
}

/// Spawn the agent notification for the first response requesting a handoff.
/// Best-effort: missing credentials or a failed send is logged only.
fn dispatch_handoff(state: &AppState, responses: &[crate::automation::Response], from: &str, body: &str) {
    let Some(target) = find_handoff_target(responses) else {
        return;
    };

    let Some(transport) = &state.transport else {
        warn!(target = %target, "Handoff requested but no transport is configured");
        return;
    };

    let transport = Arc::clone(transport);
    let target = target.to_string();
    let summary = handoff_summary(from, body);
    tokio::spawn(async move {
        match transport.send(&target, &summary, &[]).await {
            Ok(sent) => {
                info!(sid = %sent.sid, status = %sent.status, target = %target, "Handoff notification sent");
            }
            Err(e) => {
                error!(error = %e, target = %target, "Handoff dispatch failed");
            }
        }
    });
}

/// Simulation payload: a full config document plus the test message.
#[derive(Debug, Deserialize)]
struct SimulatePayload {
    message: String,
    #[serde(flatten)]
    config: AutomationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResult {
    matched: bool,
    flow: Option<Flow>,
    twiml: String,
    fallback_message: String,
    notes: Option<String>,
}

/// POST /api/simulate
///
/// Same matcher + renderer as the live webhook, against a caller-supplied
/// config. No divergence permitted between simulate and live behavior.
async fn simulate(Json(payload): Json<SimulatePayload>) -> impl IntoResponse {
    let mut violations = Vec::new();
    if payload.message.is_empty() {
        violations.push(Violation {
            path: "message".into(),
            message: "Message content is required for simulation.".into(),
        });
    }
    if let Err(e) = validate(&payload.config) {
        violations.extend(e.violations);
    }
    if !violations.is_empty() {
        return validation_failed(violations).into_response();
    }

    let matched = find_matching_flow(&payload.message, &payload.config.flows);
    let responses = matched.map(|flow| flow.responses.as_slice()).unwrap_or(&[]);
    let twiml = build_twiml(responses, &payload.config.fallback_message);

    Json(SimulateResult {
        matched: matched.is_some(),
        flow: matched.cloned(),
        twiml,
        fallback_message: payload.config.fallback_message,
        notes: payload.config.notes,
    })
    .into_response()
}

/// Outbound send payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendPayload {
    to: String,
    message: String,
    #[serde(default)]
    media_urls: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SendResult {
    success: bool,
    sid: String,
    status: String,
}

/// POST /api/send
///
/// Direct outbound message through the transport. 500 when credentials are
/// missing, 422 on payload violations, 502 when the provider rejects it.
async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<SendPayload>,
) -> impl IntoResponse {
    let Some(transport) = &state.transport else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": TransportError::MissingCredentials.to_string(),
            })),
        )
            .into_response();
    };

    let violations = send_payload_violations(&payload);
    if !violations.is_empty() {
        return validation_failed(violations).into_response();
    }

    match transport
        .send(&payload.to, &payload.message, &payload.media_urls)
        .await
    {
        Ok(sent) => Json(SendResult {
            success: true,
            sid: sent.sid,
            status: sent.status,
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, to = %payload.to, "Outbound send failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "error": "Unable to send WhatsApp message. Check logs for details.",
                })),
            )
                .into_response()
        }
    }
}

fn send_payload_violations(payload: &SendPayload) -> Vec<Violation> {
    let mut violations = Vec::new();
    if payload.to.chars().count() < 5 {
        violations.push(Violation {
            path: "to".into(),
            message: "destination must be at least 5 characters".into(),
        });
    }
    if payload.message.is_empty() {
        violations.push(Violation {
            path: "message".into(),
            message: "message must not be empty".into(),
        });
    }
    for (i, url) in payload.media_urls.iter().enumerate() {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            violations.push(Violation {
                path: format!("mediaUrls[{i}]"),
                message: format!("\"{url}\" is not an absolute http(s) URL"),
            });
        }
    }
    violations
}

fn validation_failed(violations: Vec<Violation>) -> impl IntoResponse {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({
            "error": "Payload validation failed.",
            "details": violations,
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_payload_checks_destination_and_body() {
        let payload = SendPayload {
            to: "+1".into(),
            message: String::new(),
            media_urls: vec!["not-a-url".into()],
        };
        let violations = send_payload_violations(&payload);
        let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["to", "message", "mediaUrls[0]"]);
    }

    #[test]
    fn valid_send_payload_has_no_violations() {
        let payload = SendPayload {
            to: "+15551234567".into(),
            message: "hello".into(),
            media_urls: vec!["https://cdn.example.com/a.png".into()],
        };
        assert!(send_payload_violations(&payload).is_empty());
    }

    #[test]
    fn simulate_payload_parses_config_alongside_message() {
        let mut value = serde_json::to_value(AutomationConfig::sample()).unwrap();
        value["message"] = serde_json::json!("hi there");
        let payload: SimulatePayload = serde_json::from_value(value).unwrap();
        assert_eq!(payload.message, "hi there");
        assert_eq!(payload.config, AutomationConfig::sample());
    }
}
