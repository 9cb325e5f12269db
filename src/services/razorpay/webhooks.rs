use serde::Deserialize;

use crate::crypto_utils::HmacSignature;
use crate::error::{AppError, AppResult};
use crate::models::WebhookEvent;

pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

pub struct RazorpayWebhookVerifier;

impl RazorpayWebhookVerifier {
    /// Verify webhook signature from Razorpay.
    /// signature = HMAC-SHA256(raw body, webhook secret), sent in X-Razorpay-Signature
    pub fn verify_webhook_signature(payload: &[u8], signature: &str, secret: &str) -> bool {
        if secret.is_empty() {
            tracing::warn!("Webhook secret not configured; rejecting webhook");
            return false;
        }

        HmacSignature::verify_hex(payload, signature, secret.as_bytes()).unwrap_or(false)
    }

    /// Verify payment signature for checkout verification.
    /// signature = HMAC-SHA256(order_id + "|" + payment_id, key secret)
    pub fn verify_payment_signature(
        order_id: &str,
        payment_id: &str,
        signature: &str,
        secret: &str,
    ) -> bool {
        let payload = format!("{}|{}", order_id, payment_id);

        HmacSignature::verify_hex(payload.as_bytes(), signature, secret.as_bytes())
            .unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
struct WebhookEnvelope {
    event: String,
    #[serde(default)]
    payload: WebhookPayload,
}

#[derive(Debug, Default, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    payment: Option<EntityWrapper<PaymentEntity>>,
    #[serde(default)]
    order: Option<EntityWrapper<OrderEntity>>,
}

#[derive(Debug, Deserialize)]
struct EntityWrapper<T> {
    entity: T,
}

#[derive(Debug, Deserialize)]
struct PaymentEntity {
    id: String,
    #[serde(default)]
    order_id: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderEntity {
    id: String,
}

/// Decode a Razorpay webhook body. Entities missing from the payload show
/// up as `None` rather than failing the whole notification.
pub fn parse_webhook_event(payload: &[u8]) -> AppResult<WebhookEvent> {
    let envelope: WebhookEnvelope = serde_json::from_slice(payload)
        .map_err(|e| AppError::Validation(format!("Invalid webhook payload: {}", e)))?;

    let payment = envelope.payload.payment.map(|p| p.entity);
    let order = envelope.payload.order.map(|o| o.entity);

    let event = match envelope.event.as_str() {
        "payment.captured" => WebhookEvent::PaymentCaptured {
            order_id: payment.as_ref().and_then(|p| p.order_id.clone()),
            payment_id: payment.map(|p| p.id),
        },
        "payment.failed" => match payment {
            Some(p) => WebhookEvent::PaymentFailed {
                payment_id: Some(p.id),
                error_code: p.error_code,
                error_description: p.error_description,
            },
            None => WebhookEvent::PaymentFailed {
                payment_id: None,
                error_code: None,
                error_description: None,
            },
        },
        "order.paid" => WebhookEvent::OrderPaid {
            order_id: order.map(|o| o.id),
        },
        other => WebhookEvent::Unhandled {
            name: other.to_string(),
        },
    };

    Ok(event)
}
