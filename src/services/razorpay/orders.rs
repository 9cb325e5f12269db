use serde::{Deserialize, Serialize};

use super::RazorpayClient;
use crate::error::AppResult;

#[derive(Debug, Clone, Serialize)]
pub struct RazorpayOrderRequest {
    /// Minor units (paise).
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl RazorpayClient {
    pub async fn create_order(&self, request: &RazorpayOrderRequest) -> AppResult<RazorpayOrder> {
        self.post("/orders", request).await
    }
}
