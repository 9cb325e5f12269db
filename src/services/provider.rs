use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{
    CreateOrderRequest, Order, Refund, RefundPaymentRequest, VerificationResult,
    VerifyPaymentRequest, WebhookEvent,
};

/// Every processor integration the gateway knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Razorpay,
}

impl ProviderKind {
    pub const ALL: &'static [ProviderKind] = &[ProviderKind::Razorpay];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Razorpay => "razorpay",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::ProviderUnavailable(s.to_string()))
    }
}

/// Capability set of a payment processor integration.
///
/// Amounts crossing this boundary are in major currency units. Expected
/// business outcomes (bad signature, processor rejection) are values, not
/// errors: `verify_payment` cannot fail at all, and `create_order` /
/// `refund_payment` only fail when the processor call itself did not succeed.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Whether the required credentials were present at construction.
    fn is_available(&self) -> bool;

    async fn create_order(&self, request: &CreateOrderRequest) -> AppResult<Order>;

    async fn verify_payment(&self, request: &VerifyPaymentRequest) -> VerificationResult;

    async fn refund_payment(&self, request: &RefundPaymentRequest) -> AppResult<Refund>;

    /// Header carrying the webhook signature for this processor.
    fn webhook_signature_header(&self) -> &'static str;

    /// Authenticate a raw webhook body against its signature header.
    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> bool;

    /// Decode an authenticated webhook body into a normalized event.
    fn parse_webhook_event(&self, payload: &[u8]) -> AppResult<WebhookEvent>;
}
