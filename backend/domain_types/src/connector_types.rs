use common_enums::{AttemptStatus, CaptureMethod, Currency, RefundStatus};
use common_utils::MinorUnit;
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};

use crate::{
    errors,
    payment_method_data::PaymentMethodData,
    router_data::Address,
    types::Connectors,
    utils::missing_field_err,
};

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConnectorEnum {
    Adyen,
    Nmi,
    Square,
    Stax,
    Worldpay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseId {
    ConnectorTransactionId(String),
    NoResponseId,
}

impl ResponseId {
    pub fn get_connector_transaction_id(
        &self,
    ) -> error_stack::Result<String, errors::ConnectorError> {
        match self {
            Self::ConnectorTransactionId(txn_id) => Ok(txn_id.to_string()),
            Self::NoResponseId => Err(errors::ConnectorError::MissingConnectorTransactionID.into()),
        }
    }
}

/// Lets the service loop store the raw reply on any flow's common data.
pub trait RawConnectorResponse {
    fn set_raw_connector_response(&mut self, response: Option<String>);

    fn get_raw_connector_response(&self) -> Option<String>;

    fn set_connector_http_status_code(&mut self, status_code: u16);
}

#[derive(Debug, Clone)]
pub struct PaymentFlowData {
    /// Merchant order reference sent to the processor
    pub connector_request_reference_id: String,
    pub status: AttemptStatus,
    pub description: Option<String>,
    pub email: Option<String>,
    pub ip_address: Option<String>,
    pub address: Option<Address>,
    pub connectors: Connectors,
    pub test_mode: Option<bool>,
    pub connector_customer: Option<String>,
    pub session_token: Option<String>,
    pub payment_method_token: Option<Secret<String>>,
    pub raw_connector_response: Option<Secret<String>>,
    pub connector_http_status_code: Option<u16>,
}

impl PaymentFlowData {
    pub fn new(connector_request_reference_id: impl Into<String>, connectors: Connectors) -> Self {
        Self {
            connector_request_reference_id: connector_request_reference_id.into(),
            status: AttemptStatus::Started,
            description: None,
            email: None,
            ip_address: None,
            address: None,
            connectors,
            test_mode: None,
            connector_customer: None,
            session_token: None,
            payment_method_token: None,
            raw_connector_response: None,
            connector_http_status_code: None,
        }
    }

    pub fn get_connector_customer_id(&self) -> Result<String, error_stack::Report<errors::ConnectorError>> {
        self.connector_customer
            .clone()
            .ok_or_else(missing_field_err("connector_customer_id"))
    }

    pub fn get_session_token(&self) -> Result<String, error_stack::Report<errors::ConnectorError>> {
        self.session_token
            .clone()
            .ok_or_else(missing_field_err("session_token"))
    }

    pub fn get_payment_method_token(
        &self,
    ) -> Result<Secret<String>, error_stack::Report<errors::ConnectorError>> {
        self.payment_method_token
            .clone()
            .ok_or_else(missing_field_err("payment_method_token"))
    }

    pub fn get_optional_billing(&self) -> Option<&Address> {
        self.address.as_ref()
    }
}

impl RawConnectorResponse for PaymentFlowData {
    fn set_raw_connector_response(&mut self, response: Option<String>) {
        self.raw_connector_response = response.map(Secret::new);
    }

    fn get_raw_connector_response(&self) -> Option<String> {
        use hyperswitch_masking::PeekInterface;
        self.raw_connector_response
            .as_ref()
            .map(|raw| raw.peek().to_owned())
    }

    fn set_connector_http_status_code(&mut self, status_code: u16) {
        self.connector_http_status_code = Some(status_code);
    }
}

#[derive(Debug, Clone)]
pub struct RefundFlowData {
    pub status: RefundStatus,
    pub refund_id: Option<String>,
    pub connectors: Connectors,
    pub test_mode: Option<bool>,
    pub raw_connector_response: Option<Secret<String>>,
    pub connector_http_status_code: Option<u16>,
}

impl RefundFlowData {
    pub fn new(refund_id: Option<String>, connectors: Connectors) -> Self {
        Self {
            status: RefundStatus::Pending,
            refund_id,
            connectors,
            test_mode: None,
            raw_connector_response: None,
            connector_http_status_code: None,
        }
    }
}

impl RawConnectorResponse for RefundFlowData {
    fn set_raw_connector_response(&mut self, response: Option<String>) {
        self.raw_connector_response = response.map(Secret::new);
    }

    fn get_raw_connector_response(&self) -> Option<String> {
        use hyperswitch_masking::PeekInterface;
        self.raw_connector_response
            .as_ref()
            .map(|raw| raw.peek().to_owned())
    }

    fn set_connector_http_status_code(&mut self, status_code: u16) {
        self.connector_http_status_code = Some(status_code);
    }
}

#[derive(Debug, Clone)]
pub struct PaymentsAuthorizeData {
    pub payment_method_data: PaymentMethodData,
    pub amount: MinorUnit,
    pub currency: Currency,
    pub capture_method: Option<CaptureMethod>,
    pub customer_name: Option<Secret<String>>,
    /// Ask the processor to keep the card on file and return a reusable reference
    pub setup_future_usage: bool,
    pub metadata: Option<serde_json::Value>,
}

impl PaymentsAuthorizeData {
    pub fn is_auto_capture(&self) -> bool {
        matches!(
            self.capture_method,
            Some(CaptureMethod::Automatic) | None
        )
    }
}

/// Capture, void and refund carry the authorization token returned by an earlier call
/// in `connector_transaction_id`. Adapters that compose tokens split it themselves.
#[derive(Debug, Clone)]
pub struct PaymentsCaptureData {
    pub amount_to_capture: MinorUnit,
    pub currency: Currency,
    pub connector_transaction_id: String,
}

#[derive(Debug, Clone)]
pub struct PaymentVoidData {
    pub connector_transaction_id: String,
    pub cancellation_reason: Option<String>,
    pub amount: Option<MinorUnit>,
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone)]
pub struct RefundsData {
    pub refund_id: String,
    pub connector_transaction_id: String,
    pub refund_amount: MinorUnit,
    pub currency: Currency,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessionTokenRequestData {
    pub amount: MinorUnit,
    pub currency: Currency,
}

#[derive(Debug, Clone)]
pub struct SessionTokenResponseData {
    pub session_token: String,
}

#[derive(Debug, Clone)]
pub struct PaymentMethodTokenizationData {
    pub payment_method_data: PaymentMethodData,
    pub amount: MinorUnit,
    pub currency: Currency,
}

#[derive(Debug, Clone)]
pub struct PaymentMethodTokenResponse {
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct ConnectorCustomerData {
    pub email: Option<String>,
    pub name: Option<Secret<String>>,
    pub description: Option<String>,
    pub phone: Option<Secret<String>>,
}

#[derive(Debug, Clone)]
pub struct ConnectorCustomerResponse {
    pub connector_customer_id: String,
}

#[derive(Debug, Clone)]
pub enum PaymentsResponseData {
    TransactionResponse {
        resource_id: ResponseId,
        /// Opaque token for follow-up calls when it is more than the bare transaction id
        authorization: Option<String>,
        /// Reusable reference when the card was kept on file
        mandate_reference: Option<String>,
        connector_metadata: Option<serde_json::Value>,
        network_txn_id: Option<String>,
        connector_response_reference_id: Option<String>,
        message: Option<String>,
        avs_result: Option<String>,
        cvv_result: Option<String>,
        status_code: u16,
    },
}

impl PaymentsResponseData {
    /// A plain transaction response with only the transaction id set.
    pub fn transaction(connector_transaction_id: impl Into<String>, status_code: u16) -> Self {
        Self::TransactionResponse {
            resource_id: ResponseId::ConnectorTransactionId(connector_transaction_id.into()),
            authorization: None,
            mandate_reference: None,
            connector_metadata: None,
            network_txn_id: None,
            connector_response_reference_id: None,
            message: None,
            avs_result: None,
            cvv_result: None,
            status_code,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RefundsResponseData {
    pub connector_refund_id: String,
    pub refund_status: RefundStatus,
    pub message: Option<String>,
    pub status_code: u16,
}
