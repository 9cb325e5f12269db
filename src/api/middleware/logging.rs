use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tower_http::request_id::RequestId;
use tracing::{info, warn, Instrument};

use crate::config::Environment;

/// Request logging middleware
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // Same id the response carries in x-request-id
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(RequestId::header_value)
        .or_else(|| request.headers().get("X-Request-Id"))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "request",
        method = %method,
        path = %path,
        request_id = %request_id,
    );

    async move {
        let response = next.run(request).await;

        let duration = start.elapsed();
        let status = response.status();

        if status.is_success() {
            info!(
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Request completed"
            );
        } else if status.is_client_error() {
            warn!(
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Client error"
            );
        } else {
            warn!(
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Server error"
            );
        }

        response
    }
    .instrument(span)
    .await
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured
/// level; production logs are JSON, development logs are pretty printed.
pub fn init_tracing(level: &str, environment: Environment) {
    use tracing_subscriber::{
        fmt::{self, format::FmtSpan},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{},payment_hub={}", level, level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if environment.is_development() {
        registry
            .with(fmt::layer().with_target(true).with_span_events(FmtSpan::CLOSE).pretty())
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .json(),
            )
            .init();
    }
}
