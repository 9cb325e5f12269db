use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateOrderRequest, Order, Refund, RefundPaymentRequest, VerificationResult,
    VerifyPaymentRequest,
};
use crate::services::provider::{PaymentProvider, ProviderKind};
use crate::services::razorpay::RazorpayProvider;

pub type SharedProvider = Arc<dyn PaymentProvider>;

/// Provider registry and dispatcher.
///
/// Built once at startup and read-only afterwards, so it is shared across
/// requests without locking. Only adapters that report themselves available
/// at construction are registered.
pub struct PaymentService {
    providers: BTreeMap<ProviderKind, SharedProvider>,
    default_provider: ProviderKind,
}

impl PaymentService {
    pub fn new(
        default_provider: ProviderKind,
        adapters: impl IntoIterator<Item = SharedProvider>,
    ) -> Self {
        let mut providers = BTreeMap::new();

        for adapter in adapters {
            if adapter.is_available() {
                tracing::info!(provider = adapter.name(), "Registered payment provider");
                providers.insert(adapter.kind(), adapter);
            } else {
                tracing::warn!(
                    provider = adapter.name(),
                    "Payment provider is not available (missing credentials)"
                );
            }
        }

        tracing::info!(
            providers = ?providers.keys().map(ProviderKind::as_str).collect::<Vec<_>>(),
            default = %default_provider,
            "Payment service initialized"
        );

        Self {
            providers,
            default_provider,
        }
    }

    /// Build every known adapter from configuration.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let default_provider: ProviderKind = config
            .payment
            .default_provider
            .parse()
            .map_err(|_| {
                AppError::Config(format!(
                    "Unknown default payment provider: {}",
                    config.payment.default_provider
                ))
            })?;

        let timeout = config.payment.timeout();

        let adapters = ProviderKind::ALL
            .iter()
            .map(|kind| -> AppResult<SharedProvider> {
                match kind {
                    ProviderKind::Razorpay => {
                        Ok(Arc::new(RazorpayProvider::new(&config.razorpay, timeout)?))
                    }
                }
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self::new(default_provider, adapters))
    }

    /// Resolve a provider by name, falling back to the default when omitted.
    pub fn provider(&self, name: Option<&str>) -> AppResult<SharedProvider> {
        let kind = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.parse::<ProviderKind>()?,
            None => self.default_provider,
        };

        self.providers
            .get(&kind)
            .cloned()
            .ok_or_else(|| AppError::ProviderUnavailable(kind.as_str().to_string()))
    }

    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
        provider: Option<&str>,
    ) -> AppResult<Order> {
        let provider = self.provider(provider)?;

        tracing::info!(
            provider = provider.name(),
            amount = %request.amount,
            currency = %request.currency,
            receipt = %request.receipt,
            "Creating payment order"
        );

        let order = provider.create_order(request).await?;

        tracing::info!(
            provider = provider.name(),
            provider_order_id = %order.provider_order_id,
            "Payment order created"
        );

        Ok(order)
    }

    /// Fails only when the provider cannot be resolved; verification
    /// outcomes are carried in the result.
    pub async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
        provider: Option<&str>,
    ) -> AppResult<VerificationResult> {
        let provider = self.provider(provider)?;

        let result = provider.verify_payment(request).await;

        if result.is_valid {
            tracing::info!(
                provider = provider.name(),
                payment_id = %request.payment_id,
                "Payment verification successful"
            );
        } else {
            tracing::warn!(
                provider = provider.name(),
                payment_id = %request.payment_id,
                error_code = result.error_code.as_deref().unwrap_or(""),
                error = result.error_description.as_deref().unwrap_or(""),
                "Payment verification failed"
            );
        }

        Ok(result)
    }

    pub async fn refund_payment(
        &self,
        request: &RefundPaymentRequest,
        provider: Option<&str>,
    ) -> AppResult<Refund> {
        let provider = self.provider(provider)?;

        let refund = provider.refund_payment(request).await?;

        tracing::info!(
            provider = provider.name(),
            payment_id = %request.payment_id,
            refund_id = %refund.refund_id,
            "Refund processed"
        );

        Ok(refund)
    }

    pub fn available_providers(&self) -> Vec<&'static str> {
        self.providers.keys().map(ProviderKind::as_str).collect()
    }

    pub fn is_provider_available(&self, name: &str) -> bool {
        name.parse::<ProviderKind>()
            .map(|kind| self.providers.contains_key(&kind))
            .unwrap_or(false)
    }

    pub fn default_provider(&self) -> ProviderKind {
        self.default_provider
    }
}
