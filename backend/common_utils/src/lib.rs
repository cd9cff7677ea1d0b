//! Common utilities shared by the gateway adapters

pub mod consts;
pub mod errors;
pub mod ext_traits;
pub mod request;
pub mod scrubber;
pub mod types;

pub use types::MinorUnit;
