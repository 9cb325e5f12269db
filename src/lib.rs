pub mod api;
pub mod config;
pub mod crypto_utils;
pub mod error;
pub mod models;
pub mod services;

use std::sync::Arc;
use std::time::Instant;

use crate::api::middleware::rate_limit::IpRateLimiter;
use crate::config::Config;
use crate::services::PaymentService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub payment_service: Arc<PaymentService>,
    pub rate_limiter: Arc<IpRateLimiter>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, payment_service: PaymentService) -> Self {
        let rate_limiter = IpRateLimiter::new(&config.rate_limit);

        Self {
            config: Arc::new(config),
            payment_service: Arc::new(payment_service),
            rate_limiter: Arc::new(rate_limiter),
            started_at: Instant::now(),
        }
    }
}
