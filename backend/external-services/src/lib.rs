pub mod service;
pub mod shared_metrics;
pub mod transcript;

pub use service::*;
