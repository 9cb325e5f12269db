#![allow(dead_code)]

use payment_hub::config::{
    Config, Environment, LoggingConfig, PaymentConfig, RateLimitConfig, RazorpayConfig,
    SecurityConfig, ServerConfig,
};
use payment_hub::crypto_utils::HmacSignature;

pub const KEY_ID: &str = "rzp_test_key";
pub const KEY_SECRET: &str = "test_key_secret";
pub const WEBHOOK_SECRET: &str = "test_webhook_secret";

pub fn test_config(api_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: Environment::Test,
        },
        razorpay: RazorpayConfig {
            key_id: KEY_ID.to_string(),
            key_secret: KEY_SECRET.to_string(),
            webhook_secret: WEBHOOK_SECRET.to_string(),
            api_url: api_url.to_string(),
        },
        payment: PaymentConfig {
            default_currency: "INR".to_string(),
            timeout_secs: 5,
            default_provider: "razorpay".to_string(),
        },
        logging: LoggingConfig {
            level: "info".to_string(),
        },
        security: SecurityConfig {
            cors_origin: "*".to_string(),
        },
        rate_limit: RateLimitConfig {
            window_ms: 900_000,
            max_requests: 100,
        },
    }
}

pub fn config_without_credentials(api_url: &str) -> Config {
    let mut config = test_config(api_url);
    config.razorpay.key_id = String::new();
    config.razorpay.key_secret = String::new();
    config
}

pub fn checkout_signature(order_id: &str, payment_id: &str) -> String {
    HmacSignature::sign_hex(
        format!("{}|{}", order_id, payment_id).as_bytes(),
        KEY_SECRET.as_bytes(),
    )
    .unwrap()
}

pub fn webhook_signature(body: &[u8]) -> String {
    HmacSignature::sign_hex(body, WEBHOOK_SECRET.as_bytes()).unwrap()
}

/// Change one hex character of a signature.
pub fn tamper(signature: &str) -> String {
    let mut bytes = signature.as_bytes().to_vec();
    bytes[0] = if bytes[0] == b'a' { b'b' } else { b'a' };
    String::from_utf8(bytes).unwrap()
}

pub fn payment_json(payment_id: &str, order_id: &str, amount: i64) -> serde_json::Value {
    serde_json::json!({
        "id": payment_id,
        "entity": "payment",
        "amount": amount,
        "currency": "INR",
        "status": "captured",
        "order_id": order_id,
        "method": "upi",
        "email": "buyer@example.com",
        "contact": "+919876543210",
        "created_at": 1700000000
    })
}
