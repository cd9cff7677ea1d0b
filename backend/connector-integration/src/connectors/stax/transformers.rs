use common_enums::{AttemptStatus, RefundStatus, StandardErrorCode};
use common_utils::{
    consts,
    types::{FloatMajorUnit, FloatMajorUnitForConnector, MinorUnit},
};
use domain_types::{
    connector_flow::{Authorize, Capture, CreateConnectorCustomer, PaymentMethodToken, Refund, Void},
    connector_types::{
        ConnectorCustomerData, ConnectorCustomerResponse, PaymentFlowData,
        PaymentMethodTokenResponse, PaymentMethodTokenizationData, PaymentVoidData,
        PaymentsAuthorizeData, PaymentsCaptureData, PaymentsResponseData, RefundFlowData,
        RefundsData, RefundsResponseData, ResponseId,
    },
    errors,
    gateway_response::AuthorizationToken,
    payment_method_data::PaymentMethodData,
    router_data::{ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
};
use hyperswitch_masking::{ExposeInterface, PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use crate::{types::ResponseRouterData, utils};

type Error = error_stack::Report<errors::ConnectorError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaxTransactionType {
    Charge,
    PreAuth,
    Refund,
    Void,
}

// ===== AUTH TYPE =====

#[derive(Debug, Clone)]
pub struct StaxAuthType {
    pub api_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for StaxAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::HeaderKey { api_key } => Ok(Self {
                api_key: api_key.to_owned(),
            }),
            _ => Err(error_stack::report!(
                errors::ConnectorError::FailedToObtainAuthType
            )),
        }
    }
}

// ===== ERROR RESPONSE =====

/// Stax reports failures in several shapes: a plain `message`, an `id` or `error` array,
/// a `validation` block, or per-field arrays such as `{"card_number": ["Invalid"]}`.
#[derive(Debug, Deserialize)]
pub struct StaxErrorResponse {
    #[serde(default)]
    pub success: bool,
    pub id: Option<serde_json::Value>,
    pub message: Option<String>,
    pub validation: Option<serde_json::Value>,
    pub error: Option<serde_json::Value>,
    pub code: Option<String>,
    #[serde(flatten)]
    pub other: std::collections::BTreeMap<String, serde_json::Value>,
}

impl StaxErrorResponse {
    pub fn get_error_message(&self) -> String {
        let first_text = |value: &serde_json::Value| -> Option<String> {
            value.as_str().map(String::from).or_else(|| {
                value
                    .as_array()
                    .and_then(|values| values.first())
                    .and_then(serde_json::Value::as_str)
                    .map(String::from)
            })
        };

        self.message
            .clone()
            .or_else(|| {
                self.id
                    .as_ref()
                    .filter(|id| id.is_array())
                    .and_then(first_text)
            })
            .or_else(|| self.error.as_ref().and_then(first_text))
            .or_else(|| self.validation.as_ref().and_then(first_text))
            .or_else(|| self.other.values().find_map(first_text))
            .unwrap_or_else(|| consts::NO_ERROR_MESSAGE.to_string())
    }

    /// Validation failures name the offending field; anything else falls back on the status.
    pub fn standard_code(&self, http_code: u16) -> StandardErrorCode {
        let field_code = |field: &str| match field {
            "card_number" => Some(StandardErrorCode::InvalidNumber),
            "card_exp" => Some(StandardErrorCode::InvalidExpiryDate),
            "card_cvv" => Some(StandardErrorCode::InvalidCvc),
            "address_zip" => Some(StandardErrorCode::IncorrectZip),
            "address_1" | "address_city" | "address_state" => {
                Some(StandardErrorCode::IncorrectAddress)
            }
            _ => None,
        };
        let validation_fields = self
            .validation
            .as_ref()
            .and_then(serde_json::Value::as_object)
            .into_iter()
            .flat_map(|fields| fields.keys());

        self.other
            .keys()
            .chain(validation_fields)
            .find_map(|field| field_code(field.as_str()))
            .unwrap_or_else(|| StandardErrorCode::from_http_status(http_code))
    }

    pub fn get_connector_transaction_id(&self) -> Option<String> {
        self.id
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .map(String::from)
    }
}

// ===== CREATE CUSTOMER =====

#[derive(Debug, Serialize)]
pub struct StaxCustomerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<Secret<String>>,
}

impl
    TryFrom<
        &RouterDataV2<
            CreateConnectorCustomer,
            PaymentFlowData,
            ConnectorCustomerData,
            ConnectorCustomerResponse,
        >,
    > for StaxCustomerRequest
{
    type Error = Error;

    fn try_from(
        router_data: &RouterDataV2<
            CreateConnectorCustomer,
            PaymentFlowData,
            ConnectorCustomerData,
            ConnectorCustomerResponse,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &router_data.request;
        if request.email.is_none() && request.name.is_none() {
            return Err(utils::missing_field_err("email or name")());
        }
        Ok(Self {
            email: request.email.clone(),
            firstname: request.name.clone(),
        })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StaxCustomerResponse {
    pub id: Secret<String>,
}

impl
    TryFrom<
        ResponseRouterData<
            StaxCustomerResponse,
            RouterDataV2<
                CreateConnectorCustomer,
                PaymentFlowData,
                ConnectorCustomerData,
                ConnectorCustomerResponse,
            >,
        >,
    >
    for RouterDataV2<
        CreateConnectorCustomer,
        PaymentFlowData,
        ConnectorCustomerData,
        ConnectorCustomerResponse,
    >
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            StaxCustomerResponse,
            RouterDataV2<
                CreateConnectorCustomer,
                PaymentFlowData,
                ConnectorCustomerData,
                ConnectorCustomerResponse,
            >,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            response: Ok(ConnectorCustomerResponse {
                connector_customer_id: item.response.id.expose(),
            }),
            ..item.router_data
        })
    }
}

// ===== PAYMENT METHOD TOKENIZATION =====

#[derive(Debug, Serialize)]
pub struct StaxCardTokenizeData {
    pub person_name: Secret<String>,
    pub card_number: Secret<String>,
    /// MMYY
    pub card_exp: Secret<String>,
    pub card_cvv: Secret<String>,
    pub customer_id: Secret<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum StaxTokenRequest {
    Card(StaxCardTokenizeData),
}

impl
    TryFrom<
        &RouterDataV2<
            PaymentMethodToken,
            PaymentFlowData,
            PaymentMethodTokenizationData,
            PaymentMethodTokenResponse,
        >,
    > for StaxTokenRequest
{
    type Error = Error;

    fn try_from(
        router_data: &RouterDataV2<
            PaymentMethodToken,
            PaymentFlowData,
            PaymentMethodTokenizationData,
            PaymentMethodTokenResponse,
        >,
    ) -> Result<Self, Self::Error> {
        let customer_id = router_data
            .resource_common_data
            .get_connector_customer_id()?;
        let card = router_data.request.payment_method_data.get_card()?;

        Ok(Self::Card(StaxCardTokenizeData {
            person_name: card.get_card_holder_name()?,
            card_number: card.get_card_number(),
            card_exp: card.get_expiry_date_as_mmyy(),
            card_cvv: card.card_cvc.clone(),
            customer_id: Secret::new(customer_id),
        }))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StaxTokenResponse {
    pub id: Secret<String>,
}

impl
    TryFrom<
        ResponseRouterData<
            StaxTokenResponse,
            RouterDataV2<
                PaymentMethodToken,
                PaymentFlowData,
                PaymentMethodTokenizationData,
                PaymentMethodTokenResponse,
            >,
        >,
    >
    for RouterDataV2<
        PaymentMethodToken,
        PaymentFlowData,
        PaymentMethodTokenizationData,
        PaymentMethodTokenResponse,
    >
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            StaxTokenResponse,
            RouterDataV2<
                PaymentMethodToken,
                PaymentFlowData,
                PaymentMethodTokenizationData,
                PaymentMethodTokenResponse,
            >,
        >,
    ) -> Result<Self, Self::Error> {
        // the stored card is addressed as `customer_id|payment_method_id`
        let customer_id = item
            .router_data
            .resource_common_data
            .get_connector_customer_id()?;
        let token = AuthorizationToken::new([customer_id, item.response.id.expose()]);
        Ok(Self {
            response: Ok(PaymentMethodTokenResponse {
                token: token.to_string(),
            }),
            ..item.router_data
        })
    }
}

// ===== AUTHORIZE =====

#[derive(Debug, Serialize)]
pub struct StaxAuthorizeRequest {
    pub total: FloatMajorUnit,
    pub payment_method_id: Secret<String>,
    pub is_refundable: bool,
    pub pre_auth: bool,
    pub meta: StaxMeta,
    pub idempotency_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StaxMeta {
    pub tax: MinorUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

fn payment_method_id(
    router_data: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
) -> Result<Secret<String>, Error> {
    let token = match &router_data.request.payment_method_data {
        // a fresh card has just been tokenized for this charge
        PaymentMethodData::Card(_) => router_data.resource_common_data.get_payment_method_token()?,
        PaymentMethodData::Token(token) => token.clone(),
    };
    utils::authorization_part(token.peek(), 1, "payment_method_id").map(Secret::new)
}

impl TryFrom<&RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>>
    for StaxAuthorizeRequest
{
    type Error = Error;

    fn try_from(
        router_data: &RouterDataV2<
            Authorize,
            PaymentFlowData,
            PaymentsAuthorizeData,
            PaymentsResponseData,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &router_data.request;
        let common = &router_data.resource_common_data;
        Ok(Self {
            total: utils::convert_amount(
                &FloatMajorUnitForConnector,
                request.amount,
                request.currency,
            )?,
            payment_method_id: payment_method_id(router_data)?,
            is_refundable: true,
            pre_auth: !request.is_auto_capture(),
            meta: StaxMeta {
                tax: MinorUnit::zero(),
                reference: Some(common.connector_request_reference_id.clone()),
                memo: common.description.clone(),
            },
            idempotency_id: Some(common.connector_request_reference_id.clone()),
        })
    }
}

/// Every transaction endpoint answers with the full transaction, refunds and voids included.
#[derive(Debug, Deserialize, Serialize)]
pub struct StaxPaymentResponse {
    pub success: bool,
    pub id: String,
    #[serde(default)]
    pub is_captured: i8,
    #[serde(default)]
    pub is_voided: bool,
    #[serde(default)]
    pub child_captures: Vec<ChildCapture>,
    #[serde(rename = "type")]
    pub transaction_type: StaxTransactionType,
    #[serde(default)]
    pub pre_auth: bool,
    #[serde(default)]
    pub child_transactions: Vec<ChildTransaction>,
    pub message: Option<String>,
}

pub type StaxAuthorizeResponse = StaxPaymentResponse;
pub type StaxCaptureResponse = StaxPaymentResponse;
pub type StaxVoidResponse = StaxPaymentResponse;
pub type StaxRefundResponse = StaxPaymentResponse;

#[derive(Debug, Deserialize, Serialize)]
pub struct ChildCapture {
    pub id: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ChildTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: StaxTransactionType,
    pub success: bool,
    pub total: Option<FloatMajorUnit>,
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StaxMetaData {
    pub capture_id: String,
}

/// Declined transactions only carry the gateway's message.
fn decline_standard_code(message: &str) -> StandardErrorCode {
    let message = message.to_ascii_lowercase();
    if message.contains("expired") {
        StandardErrorCode::ExpiredCard
    } else if message.contains("cvv") || message.contains("cvc") {
        StandardErrorCode::IncorrectCvc
    } else if message.contains("zip") || message.contains("postal") {
        StandardErrorCode::IncorrectZip
    } else if message.contains("address") {
        StandardErrorCode::IncorrectAddress
    } else if message.contains("call issuer") {
        StandardErrorCode::CallIssuer
    } else if message.contains("pick up") {
        StandardErrorCode::PickupCard
    } else {
        StandardErrorCode::CardDeclined
    }
}

impl StaxPaymentResponse {
    fn payment_status(&self) -> AttemptStatus {
        if self.is_voided {
            return AttemptStatus::Voided;
        }
        match self.transaction_type {
            StaxTransactionType::PreAuth if self.is_captured == 0 => AttemptStatus::Authorized,
            StaxTransactionType::PreAuth | StaxTransactionType::Charge => AttemptStatus::Charged,
            StaxTransactionType::Refund | StaxTransactionType::Void => AttemptStatus::Pending,
        }
    }

    fn error_response(&self, http_code: u16, attempt_status: Option<AttemptStatus>) -> ErrorResponse {
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| consts::NO_ERROR_MESSAGE.to_string());
        // only payment declines carry card reasons, a failed refund is a processing error
        let standard_code = attempt_status.map_or(StandardErrorCode::ProcessingError, |_| {
            decline_standard_code(&message)
        });
        ErrorResponse {
            code: consts::NO_ERROR_CODE.to_string(),
            message: message.clone(),
            reason: Some(message),
            status_code: http_code,
            attempt_status,
            connector_transaction_id: Some(self.id.clone()),
            standard_code: Some(standard_code),
        }
    }

    fn transaction_response(&self, http_code: u16) -> PaymentsResponseData {
        let connector_metadata = (self.transaction_type == StaxTransactionType::PreAuth
            && self.is_captured != 0)
            .then(|| self.child_captures.first())
            .flatten()
            .map(|capture| {
                serde_json::json!(StaxMetaData {
                    capture_id: capture.id.clone()
                })
            });
        PaymentsResponseData::TransactionResponse {
            resource_id: ResponseId::ConnectorTransactionId(self.id.clone()),
            authorization: Some(self.id.clone()),
            mandate_reference: None,
            connector_metadata,
            network_txn_id: None,
            connector_response_reference_id: None,
            message: self.message.clone(),
            avs_result: None,
            cvv_result: None,
            status_code: http_code,
        }
    }

    /// The newest refund child for `amount`. Stax answers a refund with the parent charge.
    fn refund_child(&self, amount: FloatMajorUnit) -> Option<&ChildTransaction> {
        self.child_transactions
            .iter()
            .filter(|child| {
                child.transaction_type == StaxTransactionType::Refund && child.total == Some(amount)
            })
            .max_by(|left, right| left.created_at.cmp(&right.created_at))
    }
}

fn map_payment_response<F, Req>(
    item: ResponseRouterData<
        StaxPaymentResponse,
        RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData>,
    >,
    is_approved: impl FnOnce(&StaxPaymentResponse) -> bool,
    declined: AttemptStatus,
) -> RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData> {
    let response = &item.response;
    let (status, result) = if response.success && is_approved(response) {
        (
            response.payment_status(),
            Ok(response.transaction_response(item.http_code)),
        )
    } else {
        (
            declined,
            Err(response.error_response(item.http_code, Some(declined))),
        )
    };
    RouterDataV2 {
        response: result,
        resource_common_data: PaymentFlowData {
            status,
            ..item.router_data.resource_common_data
        },
        ..item.router_data
    }
}

impl
    TryFrom<
        ResponseRouterData<
            StaxPaymentResponse,
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            StaxPaymentResponse,
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(map_payment_response(
            item,
            |response| {
                matches!(
                    response.transaction_type,
                    StaxTransactionType::Charge | StaxTransactionType::PreAuth
                )
            },
            AttemptStatus::AuthorizationFailed,
        ))
    }
}

// ===== CAPTURE =====

#[derive(Debug, Serialize)]
pub struct StaxCaptureRequest {
    pub total: FloatMajorUnit,
}

impl TryFrom<&RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>>
    for StaxCaptureRequest
{
    type Error = Error;

    fn try_from(
        router_data: &RouterDataV2<
            Capture,
            PaymentFlowData,
            PaymentsCaptureData,
            PaymentsResponseData,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            total: utils::convert_amount(
                &FloatMajorUnitForConnector,
                router_data.request.amount_to_capture,
                router_data.request.currency,
            )?,
        })
    }
}

impl
    TryFrom<
        ResponseRouterData<
            StaxPaymentResponse,
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            StaxPaymentResponse,
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(map_payment_response(
            item,
            |response| response.payment_status() == AttemptStatus::Charged,
            AttemptStatus::CaptureFailed,
        ))
    }
}

// ===== VOID =====

impl
    TryFrom<
        ResponseRouterData<
            StaxPaymentResponse,
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            StaxPaymentResponse,
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(map_payment_response(
            item,
            |response| response.is_voided,
            AttemptStatus::VoidFailed,
        ))
    }
}

// ===== REFUND =====

#[derive(Debug, Serialize)]
pub struct StaxRefundRequest {
    pub total: FloatMajorUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TryFrom<&RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>>
    for StaxRefundRequest
{
    type Error = Error;

    fn try_from(
        router_data: &RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            total: utils::convert_amount(
                &FloatMajorUnitForConnector,
                router_data.request.refund_amount,
                router_data.request.currency,
            )?,
            reason: router_data.request.reason.clone(),
        })
    }
}

impl
    TryFrom<
        ResponseRouterData<
            StaxPaymentResponse,
            RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
        >,
    > for RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            StaxPaymentResponse,
            RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let amount = utils::convert_amount(
            &FloatMajorUnitForConnector,
            request.refund_amount,
            request.currency,
        )?;
        let response = &item.response;

        let (refund_status, result) = match response.refund_child(amount) {
            Some(child) if response.success && child.success => (
                RefundStatus::Success,
                Ok(RefundsResponseData {
                    connector_refund_id: child.id.clone(),
                    refund_status: RefundStatus::Success,
                    message: response.message.clone(),
                    status_code: item.http_code,
                }),
            ),
            _ => (
                RefundStatus::Failure,
                Err(response.error_response(item.http_code, None)),
            ),
        };

        Ok(Self {
            response: result,
            resource_common_data: RefundFlowData {
                status: refund_status,
                ..item.router_data.resource_common_data
            },
            ..item.router_data
        })
    }
}
