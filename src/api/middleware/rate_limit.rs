use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{net::IpAddr, net::SocketAddr, num::NonZeroU32, time::Duration};

use crate::config::RateLimitConfig;
use crate::error::AppError;
use crate::AppState;

/// Per-IP token bucket: `max_requests` per `window_ms`, with the full
/// allowance available as a burst.
pub struct IpRateLimiter {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
}

impl IpRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
        let period = Duration::from_millis(config.window_ms) / burst.get();

        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    pub fn check(&self, ip: IpAddr) -> bool {
        self.limiter.check_key(&ip).is_ok()
    }

    /// Drop buckets that have refilled completely. Call periodically.
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Rate limiting middleware. Requests without connection info (in-process
/// calls) and health checks are not limited.
pub async fn rate_limit_by_ip(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.uri().path() == "/api/health" {
        return next.run(request).await;
    }

    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if let Some(ip) = ip {
        if !state.rate_limiter.check(ip) {
            tracing::warn!(
                client_ip = %ip,
                path = %request.uri().path(),
                "Rate limit exceeded"
            );
            return AppError::RateLimitExceeded.into_response();
        }
    }

    next.run(request).await
}
