use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Provider dispatch
    #[error("Payment provider '{0}' is not available")]
    ProviderUnavailable(String),

    // Upstream processor failures
    #[error("Provider operation failed: {0}")]
    ProviderOperation(String),

    #[error("Refund failed: {0}")]
    RefundFailed(String),

    #[error("Razorpay error: {0}")]
    Razorpay(String),

    // HTTP errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    // Webhook errors
    #[error("Webhook verification failed: {0}")]
    WebhookVerification(String),

    // Rate limiting
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    // Not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Request timed out")]
    RequestTimeout,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

static EXPOSE_INTERNAL_DETAILS: AtomicBool = AtomicBool::new(false);

/// Controls whether internal error details reach the client. Only enabled
/// when the process runs in development mode.
pub fn expose_internal_details(enabled: bool) {
    EXPOSE_INTERNAL_DETAILS.store(enabled, Ordering::Relaxed);
}

fn internal_message(generic: &str, detail: String) -> String {
    if EXPOSE_INTERNAL_DETAILS.load(Ordering::Relaxed) {
        detail
    } else {
        generic.to_string()
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::ProviderUnavailable(_) => "PROVIDER_NOT_AVAILABLE",
            AppError::ProviderOperation(_) => "PROVIDER_ERROR",
            AppError::RefundFailed(_) => "REFUND_FAILED",
            AppError::Razorpay(_) => "RAZORPAY_ERROR",
            AppError::HttpClient(_) => "EXTERNAL_SERVICE_ERROR",
            AppError::WebhookVerification(_) => "WEBHOOK_VERIFICATION_FAILED",
            AppError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::RequestTimeout => "REQUEST_TIMEOUT",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ProviderUnavailable(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::ProviderOperation(msg) | AppError::RefundFailed(msg) => {
                tracing::error!(code = self.code(), "Provider operation failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Razorpay(msg) => {
                tracing::error!("Razorpay error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::HttpClient(e) => {
                tracing::error!("HTTP client error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    internal_message(
                        "Failed to communicate with external service",
                        e.to_string(),
                    ),
                )
            }
            AppError::WebhookVerification(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::RateLimitExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests from this IP, please try again later".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::RequestTimeout => (
                StatusCode::REQUEST_TIMEOUT,
                "Request took too long to complete".to_string(),
            ),
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    internal_message("Server configuration error", msg.clone()),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    internal_message("Something went wrong", msg.clone()),
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
