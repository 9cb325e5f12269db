mod common;

use std::time::Duration;

use payment_hub::error::AppError;
use payment_hub::models::{
    CreateOrderRequest, RefundPaymentRequest, VerifyPaymentRequest, INVALID_SIGNATURE,
    VERIFICATION_FAILED,
};
use payment_hub::services::{PaymentProvider, RazorpayProvider};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::{
    matchers::{basic_auth, body_partial_json, method, path},
    Match, Mock, MockServer, Request, ResponseTemplate,
};

use common::{checkout_signature, payment_json, tamper, test_config, KEY_ID, KEY_SECRET};

fn provider(server: &MockServer) -> RazorpayProvider {
    let config = test_config(&server.uri());
    RazorpayProvider::new(&config.razorpay, Duration::from_secs(5)).unwrap()
}

struct BodyLacks(&'static str);

impl Match for BodyLacks {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<serde_json::Value>(&request.body)
            .map(|body| body.get(self.0).is_none())
            .unwrap_or(false)
    }
}

// ============================================================================
// createOrder
// ============================================================================

#[tokio::test]
async fn test_create_order_sends_minor_units_and_maps_back() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(basic_auth(KEY_ID, KEY_SECRET))
        .and(body_partial_json(json!({
            "amount": 50000,
            "currency": "INR",
            "receipt": "receipt-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "order_EKwxwAgItmmXdp",
            "entity": "order",
            "amount": 50000,
            "amount_paid": 0,
            "amount_due": 50000,
            "currency": "INR",
            "receipt": "receipt-1",
            "status": "created",
            "attempts": 0,
            "created_at": 1700000000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = provider(&server)
        .create_order(&CreateOrderRequest {
            amount: dec!(500.00),
            currency: "INR".to_string(),
            receipt: "receipt-1".to_string(),
            notes: None,
            metadata: None,
        })
        .await
        .unwrap();

    assert_eq!(order.provider_order_id, "order_EKwxwAgItmmXdp");
    assert_eq!(order.amount, dec!(500.00));
    assert_eq!(order.currency, "INR");
    assert_eq!(order.receipt, "receipt-1");
    assert_eq!(order.status, "created");
    assert_eq!(order.created_at.timestamp(), 1700000000);
}

#[tokio::test]
async fn test_create_order_merges_notes_and_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_partial_json(json!({
            "amount": 12345,
            "notes": { "notes": "from metadata", "customer_id": "cust_1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "order_1",
            "amount": 12345,
            "currency": "INR",
            "receipt": "r-2",
            "status": "created"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let metadata = json!({ "notes": "from metadata", "customer_id": "cust_1" });

    let order = provider(&server)
        .create_order(&CreateOrderRequest {
            amount: dec!(123.45),
            currency: "inr".to_string(),
            receipt: "r-2".to_string(),
            notes: Some("from notes".to_string()),
            metadata: metadata.as_object().cloned(),
        })
        .await
        .unwrap();

    assert_eq!(order.amount, dec!(123.45));
}

#[tokio::test]
async fn test_create_order_processor_rejection_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": "BAD_REQUEST_ERROR",
                "description": "The amount must be atleast INR 1.00"
            }
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .create_order(&CreateOrderRequest {
            amount: dec!(0.5),
            currency: "INR".to_string(),
            receipt: "r-3".to_string(),
            notes: None,
            metadata: None,
        })
        .await
        .unwrap_err();

    match err {
        AppError::ProviderOperation(msg) => {
            assert!(msg.contains("The amount must be atleast INR 1.00"), "{}", msg)
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

// ============================================================================
// verifyPayment
// ============================================================================

#[tokio::test]
async fn test_verify_valid_signature_fetches_authoritative_payment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/payments/pay_29QQoUBi66xm2f"))
        .and(basic_auth(KEY_ID, KEY_SECRET))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(payment_json("pay_29QQoUBi66xm2f", "order_9A33XWu170gUtm", 50000)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = provider(&server)
        .verify_payment(&VerifyPaymentRequest {
            payment_id: "pay_29QQoUBi66xm2f".to_string(),
            order_id: "order_9A33XWu170gUtm".to_string(),
            signature: checkout_signature("order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f"),
            webhook_data: None,
        })
        .await;

    assert!(result.is_valid);
    assert_eq!(result.payment_id, "pay_29QQoUBi66xm2f");
    assert_eq!(result.order_id, "order_9A33XWu170gUtm");
    assert_eq!(result.amount, dec!(500.00));
    assert_eq!(result.currency, "INR");
    assert_eq!(result.status, "captured");
    assert_eq!(result.method.as_deref(), Some("upi"));
    assert_eq!(result.email.as_deref(), Some("buyer@example.com"));
    assert_eq!(result.contact.as_deref(), Some("+919876543210"));
    assert!(result.error_code.is_none());
}

#[tokio::test]
async fn test_verify_tampered_signature_fails_fast_without_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_json("pay_1", "order_1", 100)))
        .expect(0)
        .mount(&server)
        .await;

    let result = provider(&server)
        .verify_payment(&VerifyPaymentRequest {
            payment_id: "pay_1".to_string(),
            order_id: "order_1".to_string(),
            signature: tamper(&checkout_signature("order_1", "pay_1")),
            webhook_data: Some(json!({ "amount": 999999 })),
        })
        .await;

    assert!(!result.is_valid);
    assert_eq!(result.status, "failed");
    assert_eq!(result.error_code.as_deref(), Some(INVALID_SIGNATURE));
    assert_eq!(result.amount, dec!(0));
}

#[tokio::test]
async fn test_verify_signed_with_webhook_secret_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let wrong_secret_signature = payment_hub::crypto_utils::HmacSignature::sign_hex(
        b"order_1|pay_1",
        common::WEBHOOK_SECRET.as_bytes(),
    )
    .unwrap();

    let result = provider(&server)
        .verify_payment(&VerifyPaymentRequest {
            payment_id: "pay_1".to_string(),
            order_id: "order_1".to_string(),
            signature: wrong_secret_signature,
            webhook_data: None,
        })
        .await;

    assert!(!result.is_valid);
    assert_eq!(result.error_code.as_deref(), Some(INVALID_SIGNATURE));
}

#[tokio::test]
async fn test_verify_fetch_failure_becomes_structured_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/payments/pay_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": "BAD_REQUEST_ERROR",
                "description": "The id provided does not exist"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider(&server)
        .verify_payment(&VerifyPaymentRequest {
            payment_id: "pay_missing".to_string(),
            order_id: "order_1".to_string(),
            signature: checkout_signature("order_1", "pay_missing"),
            webhook_data: None,
        })
        .await;

    assert!(!result.is_valid);
    assert_eq!(result.error_code.as_deref(), Some(VERIFICATION_FAILED));
    assert!(result
        .error_description
        .unwrap()
        .contains("The id provided does not exist"));
}

#[tokio::test]
async fn test_verify_timeout_becomes_structured_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(payment_json("pay_slow", "order_1", 100))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let provider = RazorpayProvider::new(&config.razorpay, Duration::from_millis(200)).unwrap();

    let result = provider
        .verify_payment(&VerifyPaymentRequest {
            payment_id: "pay_slow".to_string(),
            order_id: "order_1".to_string(),
            signature: checkout_signature("order_1", "pay_slow"),
            webhook_data: None,
        })
        .await;

    assert!(!result.is_valid);
    assert_eq!(result.error_code.as_deref(), Some(VERIFICATION_FAILED));
}

// ============================================================================
// refundPayment
// ============================================================================

#[tokio::test]
async fn test_full_refund_omits_amount() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments/pay_1/refund"))
        .and(BodyLacks("amount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "rfnd_FP8QHiV938haTz",
            "entity": "refund",
            "amount": 50000,
            "currency": "INR",
            "payment_id": "pay_1",
            "status": "processed",
            "created_at": 1700000100
        })))
        .expect(1)
        .mount(&server)
        .await;

    let refund = provider(&server)
        .refund_payment(&RefundPaymentRequest {
            payment_id: "pay_1".to_string(),
            amount: None,
            reason: None,
            notes: None,
        })
        .await
        .unwrap();

    assert_eq!(refund.refund_id, "rfnd_FP8QHiV938haTz");
    assert_eq!(refund.provider_refund_id, "rfnd_FP8QHiV938haTz");
    assert_eq!(refund.payment_id, "pay_1");
    assert_eq!(refund.amount, dec!(500.00));
    assert_eq!(refund.status, "processed");
    assert!(refund.reason.is_none());
}

#[tokio::test]
async fn test_partial_refund_sends_exact_minor_amount() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments/pay_1/refund"))
        .and(body_partial_json(json!({
            "amount": 10050,
            "speed": "normal",
            "notes": { "notes": "partial", "reason": "damaged item" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "rfnd_2",
            "amount": 10050,
            "currency": "INR",
            "payment_id": "pay_1",
            "status": "pending"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let refund = provider(&server)
        .refund_payment(&RefundPaymentRequest {
            payment_id: "pay_1".to_string(),
            amount: Some(dec!(100.50)),
            reason: Some("damaged item".to_string()),
            notes: Some("partial".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(refund.amount, dec!(100.50));
    assert_eq!(refund.reason.as_deref(), Some("damaged item"));
}

#[tokio::test]
async fn test_refund_rejection_is_a_refund_error_attempted_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments/pay_1/refund"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": "BAD_REQUEST_ERROR",
                "description": "The payment has been fully refunded already"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider(&server)
        .refund_payment(&RefundPaymentRequest {
            payment_id: "pay_1".to_string(),
            amount: None,
            reason: None,
            notes: None,
        })
        .await
        .unwrap_err();

    match err {
        AppError::RefundFailed(msg) => {
            assert!(msg.contains("fully refunded already"), "{}", msg)
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
