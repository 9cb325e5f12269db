pub mod payment;
pub mod webhook_event;

pub use payment::*;
pub use webhook_event::*;
