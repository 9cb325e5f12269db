use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::RazorpayConfig;
use crate::error::{AppError, AppResult};

/// Thin authenticated REST client. Every request is attempted exactly once
/// and bounded by the configured timeout.
#[derive(Clone)]
pub struct RazorpayClient {
    http_client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
    webhook_secret: String,
}

impl RazorpayClient {
    pub fn new(config: &RazorpayConfig, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            webhook_secret: config.webhook_secret.clone(),
        })
    }

    /// Secret for checkout signatures (`order_id|payment_id`).
    pub fn key_secret(&self) -> &str {
        &self.key_secret
    }

    /// Secret for webhook body signatures.
    pub fn webhook_secret(&self) -> &str {
        &self.webhook_secret
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?;

        self.handle_response(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| {
                tracing::error!("Failed to parse Razorpay response: {} - Body: {}", e, body);
                AppError::Razorpay(format!("Failed to parse response: {}", e))
            })
        } else {
            tracing::error!("Razorpay API error: {} - {}", status, body);

            let described = serde_json::from_str::<RazorpayError>(&body)
                .ok()
                .map(|error| error.error.description)
                .filter(|description| !description.is_empty());

            let error_msg = match (status, described) {
                (_, Some(description)) => description,
                (StatusCode::BAD_REQUEST, None) => "Bad request".to_string(),
                (StatusCode::UNAUTHORIZED, None) => "Invalid API credentials".to_string(),
                (StatusCode::NOT_FOUND, None) => "Resource not found".to_string(),
                (StatusCode::TOO_MANY_REQUESTS, None) => "Rate limit exceeded".to_string(),
                (_, None) => format!("API error: {}", status),
            };

            Err(AppError::Razorpay(error_msg))
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct RazorpayError {
    error: RazorpayErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
struct RazorpayErrorDetail {
    #[serde(default)]
    description: String,
}
