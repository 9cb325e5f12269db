use axum::{extract::State, http::Uri, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ApiResponse;
use crate::error::AppError;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub providers: Vec<&'static str>,
    pub uptime_seconds: u64,
}

#[derive(Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<&'static str>,
    pub count: usize,
    pub default: &'static str,
}

#[derive(Serialize)]
pub struct ServiceInfo {
    pub success: bool,
    pub message: String,
    pub version: String,
    pub default_currency: String,
    pub documentation: String,
}

/// Always 200. An empty registry is a valid configuration and is reported
/// as `degraded` with an empty provider list.
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let providers = state.payment_service.available_providers();

    let status = if providers.is_empty() {
        tracing::warn!("Health check: no payment providers available");
        "degraded"
    } else {
        "healthy"
    };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        providers,
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

pub async fn list_providers(State(state): State<AppState>) -> Json<ApiResponse<ProvidersResponse>> {
    let providers = state.payment_service.available_providers();

    Json(ApiResponse::ok(ProvidersResponse {
        count: providers.len(),
        providers,
        default: state.payment_service.default_provider().as_str(),
    }))
}

pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        success: true,
        message: "Payment Hub API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        default_currency: state.config.payment.default_currency.clone(),
        documentation: "/api/health".to_string(),
    })
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Endpoint not found: {}", uri.path()))
}
