use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WebhookQuery {
    #[serde(default)]
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub message: String,
    pub event: String,
}

/// Processor webhook. The signature header is checked against the raw
/// body with the webhook secret before the payload is even parsed.
pub async fn payment_webhook(
    State(state): State<AppState>,
    Query(query): Query<WebhookQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookResponse>> {
    let provider = state.payment_service.provider(query.provider.as_deref())?;

    let signature = headers
        .get(provider.webhook_signature_header())
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            tracing::warn!(provider = provider.name(), "Missing webhook signature");
            AppError::Validation("Missing webhook signature".to_string())
        })?;

    if !provider.verify_webhook_signature(&body, signature) {
        tracing::warn!(provider = provider.name(), "Invalid webhook signature");
        return Err(AppError::WebhookVerification(
            "Invalid webhook signature".to_string(),
        ));
    }

    let event = provider.parse_webhook_event(&body)?;

    tracing::info!(provider = provider.name(), event = event.name(), "Received webhook event");
    event.log();

    Ok(Json(WebhookResponse {
        success: true,
        message: "Webhook received successfully".to_string(),
        event: event.name().to_string(),
    }))
}
