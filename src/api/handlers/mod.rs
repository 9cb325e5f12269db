pub mod health;
pub mod payments;
pub mod webhooks;

pub use health::*;
pub use payments::*;
pub use webhooks::*;

use serde::Serialize;

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: None,
            data,
        }
    }

    pub fn failed(error: impl Into<String>, data: T) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data,
        }
    }
}
