mod amount;
mod client;
mod orders;
mod payments;
mod webhooks;

pub use amount::{to_major_units, to_minor_units};
pub use client::RazorpayClient;
pub use orders::*;
pub use payments::*;
pub use webhooks::*;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::RazorpayConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateOrderRequest, Order, Refund, RefundPaymentRequest, VerificationResult,
    VerifyPaymentRequest, WebhookEvent, INVALID_SIGNATURE, VERIFICATION_FAILED,
};
use crate::services::provider::{PaymentProvider, ProviderKind};

type Notes = serde_json::Map<String, serde_json::Value>;

/// Razorpay implementation of [`PaymentProvider`].
///
/// Checkout signatures are checked with the API key secret; webhook bodies
/// with the separate webhook secret. Both are read once at construction.
pub struct RazorpayProvider {
    client: RazorpayClient,
    available: bool,
}

impl RazorpayProvider {
    pub fn new(config: &RazorpayConfig, timeout: Duration) -> AppResult<Self> {
        let available = !config.key_id.trim().is_empty() && !config.key_secret.trim().is_empty();

        Ok(Self {
            client: RazorpayClient::new(config, timeout)?,
            available,
        })
    }
}

#[async_trait]
impl PaymentProvider for RazorpayProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Razorpay
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> AppResult<Order> {
        tracing::info!(
            amount = %request.amount,
            currency = %request.currency,
            receipt = %request.receipt,
            "Creating Razorpay order"
        );

        let order_request = RazorpayOrderRequest {
            amount: to_minor_units(request.amount)?,
            currency: request.currency.to_uppercase(),
            receipt: request.receipt.clone(),
            notes: merge_notes(request.notes.as_deref(), request.metadata.as_ref()),
        };

        let order = self.client.create_order(&order_request).await.map_err(|e| {
            tracing::error!(error = %e, receipt = %request.receipt, "Error creating Razorpay order");
            AppError::ProviderOperation(format!(
                "Failed to create payment order: {}",
                upstream_message(&e)
            ))
        })?;

        tracing::info!(order_id = %order.id, status = %order.status, "Razorpay order created");

        Ok(Order {
            provider_order_id: order.id,
            amount: to_major_units(order.amount),
            currency: order.currency,
            receipt: order.receipt.unwrap_or_else(|| request.receipt.clone()),
            status: order.status,
            created_at: timestamp_or_now(order.created_at),
        })
    }

    async fn verify_payment(&self, request: &VerifyPaymentRequest) -> VerificationResult {
        tracing::info!(
            payment_id = %request.payment_id,
            order_id = %request.order_id,
            has_webhook_data = request.webhook_data.is_some(),
            "Verifying Razorpay payment"
        );

        if !RazorpayWebhookVerifier::verify_payment_signature(
            &request.order_id,
            &request.payment_id,
            &request.signature,
            self.client.key_secret(),
        ) {
            tracing::warn!(payment_id = %request.payment_id, "Invalid payment signature");
            return VerificationResult::rejected(
                request,
                INVALID_SIGNATURE,
                "Payment signature verification failed",
            );
        }

        // Signature matched; the processor's record is authoritative for the details
        let payment = match self.client.get_payment(&request.payment_id).await {
            Ok(payment) => payment,
            Err(e) => {
                tracing::error!(
                    payment_id = %request.payment_id,
                    error = %e,
                    "Error fetching payment after signature verification"
                );
                return VerificationResult::rejected(
                    request,
                    VERIFICATION_FAILED,
                    format!("Payment verification failed: {}", upstream_message(&e)),
                );
            }
        };

        tracing::info!(payment_id = %payment.id, status = %payment.status, "Payment verified");

        VerificationResult {
            is_valid: true,
            order_id: payment
                .order_id
                .unwrap_or_else(|| request.order_id.clone()),
            payment_id: payment.id,
            amount: to_major_units(payment.amount),
            currency: payment.currency,
            status: payment.status,
            method: payment.method,
            email: payment.email,
            contact: payment.contact,
            error_code: payment.error_code,
            error_description: payment.error_description,
        }
    }

    async fn refund_payment(&self, request: &RefundPaymentRequest) -> AppResult<Refund> {
        tracing::info!(
            payment_id = %request.payment_id,
            amount = ?request.amount,
            "Processing Razorpay refund"
        );

        let amount = request.amount.map(to_minor_units).transpose()?;

        let mut notes = merge_notes(request.notes.as_deref(), None).unwrap_or_default();
        if let Some(reason) = &request.reason {
            notes.insert("reason".to_string(), serde_json::Value::String(reason.clone()));
        }

        let refund_request = RazorpayRefundRequest {
            amount,
            speed: "normal".to_string(),
            notes: (!notes.is_empty()).then_some(notes),
        };

        let refund = self
            .client
            .refund_payment(&request.payment_id, &refund_request)
            .await
            .map_err(|e| {
                tracing::error!(payment_id = %request.payment_id, error = %e, "Error processing refund");
                AppError::RefundFailed(format!(
                    "Failed to process refund: {}",
                    upstream_message(&e)
                ))
            })?;

        tracing::info!(refund_id = %refund.id, amount = refund.amount, "Refund processed");

        Ok(Refund {
            refund_id: refund.id.clone(),
            payment_id: refund.payment_id,
            amount: to_major_units(refund.amount),
            currency: refund.currency,
            status: refund.status,
            reason: request.reason.clone(),
            provider_refund_id: refund.id,
            created_at: timestamp_or_now(refund.created_at),
        })
    }

    fn webhook_signature_header(&self) -> &'static str {
        SIGNATURE_HEADER
    }

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> bool {
        RazorpayWebhookVerifier::verify_webhook_signature(
            payload,
            signature,
            self.client.webhook_secret(),
        )
    }

    fn parse_webhook_event(&self, payload: &[u8]) -> AppResult<WebhookEvent> {
        parse_webhook_event(payload)
    }
}

/// `notes` lands under the `notes` key; `metadata` entries are written after
/// it and win on key collision.
fn merge_notes(notes: Option<&str>, metadata: Option<&Notes>) -> Option<Notes> {
    let mut merged = Notes::new();

    if let Some(notes) = notes {
        merged.insert("notes".to_string(), serde_json::Value::String(notes.to_string()));
    }

    if let Some(metadata) = metadata {
        for (key, value) in metadata {
            merged.insert(key.clone(), value.clone());
        }
    }

    (!merged.is_empty()).then_some(merged)
}

fn upstream_message(error: &AppError) -> String {
    match error {
        AppError::Razorpay(msg) => msg.clone(),
        AppError::HttpClient(e) if e.is_timeout() => "request to processor timed out".to_string(),
        other => other.to_string(),
    }
}

fn timestamp_or_now(unix: Option<i64>) -> DateTime<Utc> {
    unix.and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now)
}
