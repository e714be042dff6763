//! Inbound webhook receivers.
//!
//! Both endpoints log what they received and acknowledge. The payload is
//! not authenticated (no signature check) and deliveries are not
//! deduplicated.

use axum::body::Bytes;
use axum::Json;
use serde::Serialize;

/// Acknowledgement returned to every webhook sender.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// POST /webhook/n8n
pub async fn n8n(body: Bytes) -> Json<WebhookAck> {
    log_payload("n8n", &body);
    Json(WebhookAck { received: true })
}

/// POST /webhook/line
pub async fn line(body: Bytes) -> Json<WebhookAck> {
    log_payload("line", &body);
    Json(WebhookAck { received: true })
}

fn log_payload(source: &'static str, body: &[u8]) {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(payload) => tracing::info!(source, %payload, "Webhook received"),
        Err(_) => tracing::info!(source, bytes = body.len(), "Webhook received (non-JSON body)"),
    }
}
