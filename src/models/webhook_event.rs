use serde::Serialize;

/// Provider-independent view of an authenticated webhook notification.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WebhookEvent {
    PaymentCaptured {
        payment_id: Option<String>,
        order_id: Option<String>,
    },
    PaymentFailed {
        payment_id: Option<String>,
        error_code: Option<String>,
        error_description: Option<String>,
    },
    OrderPaid {
        order_id: Option<String>,
    },
    Unhandled {
        name: String,
    },
}

impl WebhookEvent {
    pub fn name(&self) -> &str {
        match self {
            WebhookEvent::PaymentCaptured { .. } => "payment.captured",
            WebhookEvent::PaymentFailed { .. } => "payment.failed",
            WebhookEvent::OrderPaid { .. } => "order.paid",
            WebhookEvent::Unhandled { name } => name,
        }
    }

    /// Record the event. No event triggers a processor call.
    pub fn log(&self) {
        match self {
            WebhookEvent::PaymentCaptured { payment_id, order_id } => {
                tracing::info!(
                    payment_id = payment_id.as_deref().unwrap_or("unknown"),
                    order_id = order_id.as_deref().unwrap_or("unknown"),
                    "Payment captured"
                );
            }
            WebhookEvent::PaymentFailed {
                payment_id,
                error_code,
                error_description,
            } => {
                tracing::warn!(
                    payment_id = payment_id.as_deref().unwrap_or("unknown"),
                    error_code = error_code.as_deref().unwrap_or(""),
                    error_description = error_description.as_deref().unwrap_or(""),
                    "Payment failed"
                );
            }
            WebhookEvent::OrderPaid { order_id } => {
                tracing::info!(
                    order_id = order_id.as_deref().unwrap_or("unknown"),
                    "Order paid"
                );
            }
            WebhookEvent::Unhandled { name } => {
                tracing::info!(event = %name, "Unhandled webhook event");
            }
        }
    }
}
