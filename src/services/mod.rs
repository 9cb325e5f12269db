pub mod payment_service;
pub mod provider;
pub mod razorpay;

pub use payment_service::{PaymentService, SharedProvider};
pub use provider::{PaymentProvider, ProviderKind};
pub use razorpay::RazorpayProvider;
