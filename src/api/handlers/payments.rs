use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::ApiResponse;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateOrderRequest, Order, Refund, RefundPaymentRequest, VerifyPaymentRequest,
};
use crate::AppState;

fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_positive() && !amount.is_zero() {
        Ok(())
    } else {
        let mut error = ValidationError::new("positive_amount");
        error.message = Some("Amount must be greater than 0".into());
        Err(error)
    }
}

fn missing_fields(fields: &[(&str, bool)]) -> AppResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderBody {
    #[serde(default)]
    #[validate(custom = "validate_positive_amount")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    #[validate(length(equal = 3, message = "Currency must be a 3-letter ISO code"))]
    pub currency: Option<String>,
    #[serde(default)]
    #[validate(length(max = 40, message = "Receipt must be at most 40 characters"))]
    pub receipt: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub provider: Option<String>,
}

pub async fn create_order(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<CreateOrderBody>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    missing_fields(&[
        ("amount", body.amount.is_some()),
        ("currency", present(&body.currency)),
        ("receipt", present(&body.receipt)),
    ])?;

    body.validate()
        .map_err(|e| AppError::Validation(format!("Invalid request: {}", e)))?;

    let request = CreateOrderRequest {
        amount: body.amount.unwrap_or_default(),
        currency: body.currency.unwrap_or_default().to_uppercase(),
        receipt: body.receipt.unwrap_or_default(),
        notes: body.notes,
        metadata: body.metadata,
    };

    let order = state
        .payment_service
        .create_order(&request, body.provider.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

#[derive(Debug, Deserialize)]
pub struct VerifySignatureBody {
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub webhook_data: Option<serde_json::Value>,
    #[serde(default)]
    pub provider: Option<String>,
}

/// 200 with the result when the signature checks out, 400 with the same
/// result shape otherwise.
pub async fn verify_signature(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<VerifySignatureBody>, AppError>,
) -> AppResult<Response> {
    missing_fields(&[
        ("payment_id", present(&body.payment_id)),
        ("order_id", present(&body.order_id)),
        ("signature", present(&body.signature)),
    ])?;

    let request = VerifyPaymentRequest {
        payment_id: body.payment_id.unwrap_or_default(),
        order_id: body.order_id.unwrap_or_default(),
        signature: body.signature.unwrap_or_default(),
        webhook_data: body.webhook_data,
    };

    let verification = state
        .payment_service
        .verify_payment(&request, body.provider.as_deref())
        .await?;

    let response = if verification.is_valid {
        (StatusCode::OK, Json(ApiResponse::ok(verification))).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failed("Payment verification failed", verification)),
        )
            .into_response()
    };

    Ok(response)
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefundBody {
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_positive_amount")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Reason too long"))]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
}

pub async fn refund_payment(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RefundBody>, AppError>,
) -> AppResult<Json<ApiResponse<Refund>>> {
    if !present(&body.payment_id) {
        return Err(AppError::Validation(
            "Missing required field: payment_id".to_string(),
        ));
    }

    body.validate()
        .map_err(|e| AppError::Validation(format!("Invalid request: {}", e)))?;

    let request = RefundPaymentRequest {
        payment_id: body.payment_id.unwrap_or_default(),
        amount: body.amount,
        reason: body.reason,
        notes: body.notes,
    };

    let refund = state
        .payment_service
        .refund_payment(&request, body.provider.as_deref())
        .await?;

    Ok(Json(ApiResponse::ok(refund)))
}
