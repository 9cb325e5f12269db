use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error code reported when the supplied signature does not match.
pub const INVALID_SIGNATURE: &str = "INVALID_SIGNATURE";
/// Error code reported when the signature matched but the payment could not be fetched.
pub const VERIFICATION_FAILED: &str = "VERIFICATION_FAILED";

/// Input to [`PaymentProvider::create_order`](crate::services::PaymentProvider::create_order).
/// Amounts are always in major currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: Decimal,
    pub currency: String,
    pub receipt: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// A processor order. The processor is the system of record; this value is
/// never mutated after the adapter returns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub provider_order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub receipt: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub payment_id: String,
    pub order_id: String,
    pub signature: String,
    #[serde(default)]
    pub webhook_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationResult {
    pub is_valid: bool,
    pub payment_id: String,
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl VerificationResult {
    /// A negative result that carries no processor data.
    pub fn rejected(
        request: &VerifyPaymentRequest,
        code: &str,
        description: impl Into<String>,
    ) -> Self {
        Self {
            is_valid: false,
            payment_id: request.payment_id.clone(),
            order_id: request.order_id.clone(),
            amount: Decimal::ZERO,
            currency: String::new(),
            status: "failed".to_string(),
            method: None,
            email: None,
            contact: None,
            error_code: Some(code.to_string()),
            error_description: Some(description.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundPaymentRequest {
    pub payment_id: String,
    /// `None` refunds the full captured amount.
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Refund {
    pub refund_id: String,
    pub payment_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub provider_refund_id: String,
    pub created_at: DateTime<Utc>,
}
