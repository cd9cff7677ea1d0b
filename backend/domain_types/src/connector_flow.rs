#[derive(Debug, Clone)]
pub struct Authorize;

#[derive(Debug, Clone)]
pub struct Capture;

#[derive(Debug, Clone)]
pub struct Void;

#[derive(Debug, Clone)]
pub struct Refund;

/// Opens a processor session ahead of tokenization.
#[derive(Debug, Clone)]
pub struct CreateSessionToken;

/// Exchanges raw card data for a reusable processor token.
#[derive(Debug, Clone)]
pub struct PaymentMethodToken;

#[derive(Debug, Clone)]
pub struct CreateConnectorCustomer;

#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum FlowName {
    Authorize,
    Capture,
    Void,
    Refund,
    CreateSessionToken,
    PaymentMethodToken,
    CreateConnectorCustomer,
}
