//! A uniform payment gateway API over the processor adapters.

pub mod errors;
pub mod payments;
pub mod transformers;
pub mod types;
pub mod utils;

pub use errors::{GatewayError, GatewayResult};
pub use payments::Gateway;
pub use types::{GatewayConfig, PaymentOptions};
