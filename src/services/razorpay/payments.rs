use serde::{Deserialize, Deserializer, Serialize};

use super::RazorpayClient;
use crate::error::AppResult;

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayPayment {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub contact: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RazorpayRefundRequest {
    /// Minor units; omitted for a full refund.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    pub speed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayRefund {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub payment_id: String,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl RazorpayClient {
    pub async fn get_payment(&self, payment_id: &str) -> AppResult<RazorpayPayment> {
        self.get(&format!("/payments/{}", payment_id)).await
    }

    pub async fn refund_payment(
        &self,
        payment_id: &str,
        request: &RazorpayRefundRequest,
    ) -> AppResult<RazorpayRefund> {
        self.post(&format!("/payments/{}/refund", payment_id), request)
            .await
    }
}

/// Razorpay reports `contact` as either a string or a bare number.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_accepts_number_or_string() {
        let numeric: RazorpayPayment = serde_json::from_value(serde_json::json!({
            "id": "pay_1", "amount": 100, "currency": "INR", "status": "captured",
            "contact": 919876543210u64
        }))
        .unwrap();
        assert_eq!(numeric.contact.as_deref(), Some("919876543210"));

        let text: RazorpayPayment = serde_json::from_value(serde_json::json!({
            "id": "pay_1", "amount": 100, "currency": "INR", "status": "captured",
            "contact": "+919876543210"
        }))
        .unwrap();
        assert_eq!(text.contact.as_deref(), Some("+919876543210"));
    }

    #[test]
    fn test_full_refund_omits_amount() {
        let body = serde_json::to_value(RazorpayRefundRequest {
            amount: None,
            speed: "normal".to_string(),
            notes: None,
        })
        .unwrap();
        assert!(body.get("amount").is_none());
        assert!(body.get("notes").is_none());
    }
}
