use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    BoxError, Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::api::handlers;
use crate::api::middleware::{rate_limit_by_ip, request_logging};
use crate::error::AppError;
use crate::AppState;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
const HSTS: &str = "max-age=15552000; includeSubDomains";

pub fn create_router(state: AppState) -> Router {
    let payment_routes = Router::new()
        .route("/create-order", post(handlers::create_order))
        .route("/verify-signature", post(handlers::verify_signature))
        .route("/refund", post(handlers::refund_payment))
        .route("/webhook", post(handlers::payment_webhook));

    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/providers", get(handlers::list_providers))
        .nest("/payment", payment_routes)
        // Legacy paths kept for older clients
        .route("/create-order", post(handlers::create_order))
        .route("/verify-signature", post(handlers::verify_signature));

    // A verification is at most two sequential processor calls
    let request_timeout = state.config.payment.timeout() * 2 + Duration::from_secs(5);

    let router = Router::new()
        .route("/", get(handlers::service_info))
        .nest("/api", api_routes)
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_by_ip))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config.security.cors_origin));

    with_request_timeout(router, request_timeout)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("no-referrer"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::STRICT_TRANSPORT_SECURITY,
                    HeaderValue::from_static(HSTS),
                )),
        )
        .with_state(state)
}

/// Bound the whole request. Elapsed requests get the usual JSON error body.
fn with_request_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout_error))
            .timeout(timeout),
    )
}

async fn handle_timeout_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request timed out");
        AppError::RequestTimeout
    } else {
        AppError::Internal(format!("Unhandled middleware error: {}", err))
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin.trim() == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origin
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true)
}
