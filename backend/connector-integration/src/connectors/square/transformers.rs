use common_enums::{AttemptStatus, Currency, RefundStatus, StandardErrorCode};
use common_utils::{consts, MinorUnit};
use domain_types::{
    connector_flow::{Authorize, Capture, CreateSessionToken, PaymentMethodToken, Refund, Void},
    connector_types::{
        PaymentFlowData, PaymentMethodTokenResponse, PaymentMethodTokenizationData,
        PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, PaymentsResponseData,
        RefundFlowData, RefundsData, RefundsResponseData, ResponseId, SessionTokenRequestData,
        SessionTokenResponseData,
    },
    errors,
    payment_method_data::PaymentMethodData,
    router_data::{ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
};
use error_stack::ResultExt;
use hyperswitch_masking::{ExposeInterface, PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use crate::types::ResponseRouterData;

type Error = error_stack::Report<errors::ConnectorError>;

// Auth Struct
pub struct SquareAuthType {
    pub(super) api_key: Secret<String>,
    /// application id, needed by the card-nonce endpoint
    pub(super) key1: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for SquareAuthType {
    type Error = Error;
    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::BodyKey { api_key, key1 } => Ok(Self {
                api_key: api_key.to_owned(),
                key1: key1.to_owned(),
            }),
            _ => Err(errors::ConnectorError::FailedToObtainAuthType.into()),
        }
    }
}

fn idempotency_key() -> Secret<String> {
    Secret::new(uuid::Uuid::new_v4().to_string())
}

// ===== SESSION =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareSessionResponse {
    session_id: String,
}

impl
    TryFrom<
        ResponseRouterData<
            SquareSessionResponse,
            RouterDataV2<
                CreateSessionToken,
                PaymentFlowData,
                SessionTokenRequestData,
                SessionTokenResponseData,
            >,
        >,
    >
    for RouterDataV2<
        CreateSessionToken,
        PaymentFlowData,
        SessionTokenRequestData,
        SessionTokenResponseData,
    >
{
    type Error = Error;
    fn try_from(
        item: ResponseRouterData<
            SquareSessionResponse,
            RouterDataV2<
                CreateSessionToken,
                PaymentFlowData,
                SessionTokenRequestData,
                SessionTokenResponseData,
            >,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            response: Ok(SessionTokenResponseData {
                session_token: item.response.session_id,
            }),
            ..item.router_data
        })
    }
}

// ===== CARD NONCE =====

#[derive(Debug, Serialize)]
pub struct SquareCardData {
    cvv: Secret<String>,
    exp_month: Secret<u16>,
    exp_year: Secret<u16>,
    number: Secret<String>,
}

#[derive(Debug, Serialize)]
pub struct SquareTokenizeData {
    client_id: Secret<String>,
    session_id: Secret<String>,
    card_data: SquareCardData,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SquareTokenRequest {
    Card(SquareTokenizeData),
}

fn parse_date_part(value: &Secret<String>) -> Result<Secret<u16>, Error> {
    value
        .peek()
        .trim()
        .parse::<u16>()
        .map(Secret::new)
        .change_context(errors::ConnectorError::InvalidDataFormat)
}

impl
    TryFrom<
        &RouterDataV2<
            PaymentMethodToken,
            PaymentFlowData,
            PaymentMethodTokenizationData,
            PaymentMethodTokenResponse,
        >,
    > for SquareTokenRequest
{
    type Error = Error;
    fn try_from(
        item: &RouterDataV2<
            PaymentMethodToken,
            PaymentFlowData,
            PaymentMethodTokenizationData,
            PaymentMethodTokenResponse,
        >,
    ) -> Result<Self, Self::Error> {
        let card = item.request.payment_method_data.get_card()?;
        let auth = SquareAuthType::try_from(&item.connector_auth_type)?;
        // the hydrate call runs first and leaves its session id behind
        let session_id = Secret::new(item.resource_common_data.get_session_token()?);

        Ok(Self::Card(SquareTokenizeData {
            client_id: auth.key1,
            session_id,
            card_data: SquareCardData {
                exp_year: parse_date_part(&card.get_expiry_year_4_digit())?,
                exp_month: parse_date_part(&card.card_exp_month)?,
                number: card.get_card_number(),
                cvv: card.card_cvc.clone(),
            },
        }))
    }
}

#[derive(Debug, Deserialize)]
pub struct SquareTokenResponse {
    card_nonce: Secret<String>,
}

impl
    TryFrom<
        ResponseRouterData<
            SquareTokenResponse,
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
            SquareTokenResponse,
            RouterDataV2<
                PaymentMethodToken,
                PaymentFlowData,
                PaymentMethodTokenizationData,
                PaymentMethodTokenResponse,
            >,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            response: Ok(PaymentMethodTokenResponse {
                token: item.response.card_nonce.expose(),
            }),
            ..item.router_data
        })
    }
}

// ===== PAYMENTS =====

#[derive(Debug, Deserialize, Serialize)]
pub struct SquarePaymentsAmountData {
    amount: MinorUnit,
    currency: Currency,
}

#[derive(Debug, Serialize)]
pub struct SquarePaymentsRequestExternalDetails {
    source: String,
    #[serde(rename = "type")]
    source_type: String,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct SquarePaymentsRequest {
    amount_money: SquarePaymentsAmountData,
    idempotency_key: Secret<String>,
    source_id: Secret<String>,
    autocomplete: bool,
    reference_id: Option<String>,
    note: Option<String>,
    buyer_email_address: Option<String>,
}

impl TryFrom<&RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>>
    for SquarePaymentsRequest
{
    type Error = Error;
    fn try_from(
        item: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
    ) -> Result<Self, Self::Error> {
        let common = &item.resource_common_data;
        match item.request.payment_method_data {
            PaymentMethodData::Card(_) => Ok(Self {
                idempotency_key: idempotency_key(),
                // the card nonce from the tokenization step
                source_id: common.get_payment_method_token()?,
                amount_money: SquarePaymentsAmountData {
                    amount: item.request.amount,
                    currency: item.request.currency,
                },
                autocomplete: item.request.is_auto_capture(),
                reference_id: Some(common.connector_request_reference_id.clone()),
                note: common.description.clone(),
                buyer_email_address: common.email.clone(),
            }),
            PaymentMethodData::Token(_) => Err(errors::ConnectorError::NotSupported {
                message: "Stored card".to_string(),
                connector: "square",
            })?,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SquarePaymentStatus {
    Completed,
    Failed,
    Approved,
    Canceled,
    Pending,
    #[default]
    Processing,
}

impl SquarePaymentStatus {
    /// A canceled payment is only the expected outcome of a void; other flows report it
    /// with their own failure status.
    fn attempt_status(&self, canceled: AttemptStatus) -> AttemptStatus {
        match self {
            Self::Completed => AttemptStatus::Charged,
            Self::Approved => AttemptStatus::Authorized,
            Self::Failed => AttemptStatus::Failure,
            Self::Canceled => canceled,
            Self::Processing | Self::Pending => AttemptStatus::Pending,
        }
    }
}

/// Maps the `code` of the first entry in a Square `errors` array.
pub fn standard_error_code(code: &str, http_code: u16) -> StandardErrorCode {
    match code {
        "CARD_DECLINED"
        | "GENERIC_DECLINE"
        | "INSUFFICIENT_FUNDS"
        | "CARD_NOT_SUPPORTED"
        | "TRANSACTION_LIMIT"
        | "CARD_DECLINED_VERIFICATION_REQUIRED"
        | "ALLOWABLE_PIN_TRIES_EXCEEDED" => StandardErrorCode::CardDeclined,
        "CVV_FAILURE" | "VERIFY_CVV_FAILURE" => StandardErrorCode::IncorrectCvc,
        "ADDRESS_VERIFICATION_FAILURE" | "VERIFY_AVS_FAILURE" => {
            StandardErrorCode::IncorrectAddress
        }
        "INVALID_POSTAL_CODE" => StandardErrorCode::IncorrectZip,
        "INVALID_CARD" | "INVALID_ACCOUNT" | "INVALID_CARD_DATA" => {
            StandardErrorCode::InvalidNumber
        }
        "INVALID_EXPIRATION" | "INVALID_EXPIRATION_DATE" | "INVALID_EXPIRATION_YEAR"
        | "BAD_EXPIRATION" => StandardErrorCode::InvalidExpiryDate,
        "EXPIRATION_FAILURE" | "CARD_EXPIRED" => StandardErrorCode::ExpiredCard,
        "CARD_DECLINED_CALL_ISSUER" => StandardErrorCode::CallIssuer,
        "UNAUTHORIZED"
        | "FORBIDDEN"
        | "ACCESS_TOKEN_EXPIRED"
        | "ACCESS_TOKEN_REVOKED"
        | "INSUFFICIENT_SCOPES"
        | "CARD_PROCESSING_NOT_ENABLED" => StandardErrorCode::ConfigError,
        _ => StandardErrorCode::from_http_status(http_code),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SquareCardDetails {
    avs_status: Option<String>,
    cvv_status: Option<String>,
    auth_result_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SquarePaymentsResponseDetails {
    #[serde(default)]
    status: SquarePaymentStatus,
    id: String,
    reference_id: Option<String>,
    card_details: Option<SquareCardDetails>,
}

#[derive(Debug, Deserialize)]
pub struct SquarePaymentsResponse {
    payment: SquarePaymentsResponseDetails,
}

pub type SquareCaptureResponse = SquarePaymentsResponse;
pub type SquareVoidResponse = SquarePaymentsResponse;

fn map_payment_response<F, Req>(
    item: ResponseRouterData<
        SquarePaymentsResponse,
        RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData>,
    >,
    canceled: AttemptStatus,
) -> RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData> {
    let ResponseRouterData {
        response,
        router_data,
        http_code,
    } = item;
    let payment = response.payment;
    let status = payment.status.attempt_status(canceled);
    let card_details = payment.card_details.unwrap_or_default();

    let result = if !status.is_success() {
        let (message, standard_code) = match payment.status {
            SquarePaymentStatus::Canceled => ("Payment canceled", StandardErrorCode::ProcessingError),
            _ => ("Payment failed", StandardErrorCode::CardDeclined),
        };
        Err(ErrorResponse {
            code: card_details
                .auth_result_code
                .unwrap_or_else(|| consts::NO_ERROR_CODE.to_string()),
            message: message.to_string(),
            reason: None,
            status_code: http_code,
            attempt_status: Some(status),
            connector_transaction_id: Some(payment.id),
            standard_code: Some(standard_code),
        })
    } else {
        Ok(PaymentsResponseData::TransactionResponse {
            resource_id: ResponseId::ConnectorTransactionId(payment.id.clone()),
            authorization: Some(payment.id),
            mandate_reference: None,
            connector_metadata: None,
            network_txn_id: card_details.auth_result_code,
            connector_response_reference_id: payment.reference_id,
            message: None,
            avs_result: card_details.avs_status,
            cvv_result: card_details.cvv_status,
            status_code: http_code,
        })
    };

    RouterDataV2 {
        response: result,
        resource_common_data: PaymentFlowData {
            status,
            ..router_data.resource_common_data
        },
        ..router_data
    }
}

impl
    TryFrom<
        ResponseRouterData<
            SquarePaymentsResponse,
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>
{
    type Error = Error;
    fn try_from(
        item: ResponseRouterData<
            SquarePaymentsResponse,
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(map_payment_response(item, AttemptStatus::AuthorizationFailed))
    }
}

impl
    TryFrom<
        ResponseRouterData<
            SquareCaptureResponse,
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>
{
    type Error = Error;
    fn try_from(
        item: ResponseRouterData<
            SquareCaptureResponse,
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(map_payment_response(item, AttemptStatus::CaptureFailed))
    }
}

impl
    TryFrom<
        ResponseRouterData<
            SquareVoidResponse,
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>
{
    type Error = Error;
    fn try_from(
        item: ResponseRouterData<
            SquareVoidResponse,
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(map_payment_response(item, AttemptStatus::Voided))
    }
}

// ===== REFUND =====

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct SquareRefundRequest {
    amount_money: SquarePaymentsAmountData,
    idempotency_key: Secret<String>,
    payment_id: Secret<String>,
    reason: Option<String>,
}

impl TryFrom<&RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>>
    for SquareRefundRequest
{
    type Error = Error;
    fn try_from(
        item: &RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            amount_money: SquarePaymentsAmountData {
                amount: item.request.refund_amount,
                currency: item.request.currency,
            },
            idempotency_key: idempotency_key(),
            payment_id: Secret::new(item.request.connector_transaction_id.clone()),
            reason: item.request.reason.clone(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SquareRefundStatus {
    Completed,
    Failed,
    Rejected,
    Pending,
    #[default]
    Processing,
}

impl From<SquareRefundStatus> for RefundStatus {
    fn from(item: SquareRefundStatus) -> Self {
        match item {
            SquareRefundStatus::Completed => Self::Success,
            SquareRefundStatus::Failed | SquareRefundStatus::Rejected => Self::Failure,
            SquareRefundStatus::Processing | SquareRefundStatus::Pending => Self::Pending,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SquareRefundResponseDetails {
    #[serde(default)]
    status: SquareRefundStatus,
    id: String,
}

#[derive(Debug, Deserialize)]
pub struct SquareRefundResponse {
    refund: SquareRefundResponseDetails,
}

impl
    TryFrom<
        ResponseRouterData<
            SquareRefundResponse,
            RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
        >,
    > for RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>
{
    type Error = Error;
    fn try_from(
        item: ResponseRouterData<
            SquareRefundResponse,
            RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let refund_status = RefundStatus::from(item.response.refund.status);
        let result = if refund_status == RefundStatus::Failure {
            Err(ErrorResponse {
                code: consts::NO_ERROR_CODE.to_string(),
                message: "Refund rejected".to_string(),
                reason: None,
                status_code: item.http_code,
                attempt_status: None,
                connector_transaction_id: Some(item.response.refund.id),
                standard_code: Some(StandardErrorCode::ProcessingError),
            })
        } else {
            Ok(RefundsResponseData {
                connector_refund_id: item.response.refund.id,
                refund_status,
                message: None,
                status_code: item.http_code,
            })
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

// ===== ERRORS =====

#[derive(Clone, Default, Debug, Serialize, Deserialize, PartialEq)]
pub struct SquareErrorDetails {
    pub category: Option<String>,
    pub code: Option<String>,
    pub detail: Option<String>,
}

#[derive(Clone, Default, Debug, Serialize, Deserialize, PartialEq)]
pub struct SquareErrorResponse {
    pub errors: Vec<SquareErrorDetails>,
}
