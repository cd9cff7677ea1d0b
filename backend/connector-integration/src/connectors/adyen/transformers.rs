use common_enums::{AttemptStatus, CardNetwork, Currency, RefundStatus, StandardErrorCode};
use common_utils::MinorUnit;
use domain_types::{
    connector_flow::{Authorize, Capture, Refund, Void},
    connector_types::{
        PaymentFlowData, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        PaymentsResponseData, RefundFlowData, RefundsData, RefundsResponseData, ResponseId,
    },
    errors,
    gateway_response::AuthorizationToken,
    payment_method_data::{Card, PaymentMethodData},
    router_data::{Address, ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
};
use hyperswitch_masking::{ExposeInterface, Secret};
use serde::{Deserialize, Serialize};

use crate::{types::ResponseRouterData, utils};

type Error = error_stack::Report<errors::ConnectorError>;

/// Used when the billing address has no second line.
const HOUSE_NUMBER_PLACEHOLDER: &str = "NA";

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct Amount {
    pub currency: Currency,
    pub value: MinorUnit,
}

pub struct AdyenAuthType {
    pub(super) api_key: Secret<String>,
    pub(super) merchant_account: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for AdyenAuthType {
    type Error = errors::ConnectorError;
    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::BodyKey { api_key, key1 }
            | ConnectorAuthType::SignatureKey { api_key, key1, .. } => Ok(Self {
                api_key: api_key.to_owned(),
                merchant_account: key1.to_owned(),
            }),
            _ => Err(errors::ConnectorError::FailedToObtainAuthType),
        }
    }
}

// ===== AUTHORIZE REQUEST =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    MC,
    Amex,
    Jcb,
    Diners,
    Discover,
}

fn get_adyen_card_network(card_network: CardNetwork) -> Option<CardBrand> {
    match card_network {
        CardNetwork::Visa => Some(CardBrand::Visa),
        CardNetwork::Mastercard => Some(CardBrand::MC),
        CardNetwork::AmericanExpress => Some(CardBrand::Amex),
        CardNetwork::JCB => Some(CardBrand::Jcb),
        CardNetwork::DinersClub => Some(CardBrand::Diners),
        CardNetwork::Discover => Some(CardBrand::Discover),
        CardNetwork::Unknown => None,
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenCard {
    number: Secret<String>,
    expiry_month: Secret<String>,
    expiry_year: Secret<String>,
    cvc: Option<Secret<String>>,
    holder_name: Option<Secret<String>>,
    brand: Option<CardBrand>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenStoredCard {
    stored_payment_method_id: Secret<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum AdyenPaymentMethod {
    #[serde(rename = "scheme")]
    AdyenCard(Box<AdyenCard>),
    #[serde(rename = "scheme")]
    StoredCard(AdyenStoredCard),
}

#[derive(Default, Debug, Serialize, Deserialize)]
pub enum AdyenShopperInteraction {
    #[default]
    Ecommerce,
    #[serde(rename = "ContAuth")]
    ContinuedAuthentication,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum AdyenRecurringModel {
    CardOnFile,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Default, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalData {
    manual_capture: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopperName {
    first_name: Option<Secret<String>>,
    last_name: Option<Secret<String>>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenAddress {
    city: String,
    country: String,
    house_number_or_name: Secret<String>,
    postal_code: Secret<String>,
    state_or_province: Option<Secret<String>>,
    street: Secret<String>,
}

impl AdyenAddress {
    /// Adyen rejects partial addresses, so one is only sent when every required part is known.
    fn from_billing(address: &Address) -> Option<Self> {
        Some(Self {
            city: address.city.clone()?,
            country: address.country.clone()?,
            house_number_or_name: address
                .line2
                .clone()
                .unwrap_or_else(|| Secret::new(HOUSE_NUMBER_PLACEHOLDER.to_string())),
            postal_code: address.zip.clone()?,
            state_or_province: address.state.clone(),
            street: address.line1.clone()?,
        })
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenPaymentRequest {
    amount: Amount,
    merchant_account: Secret<String>,
    payment_method: AdyenPaymentMethod,
    reference: String,
    shopper_interaction: AdyenShopperInteraction,
    recurring_processing_model: Option<AdyenRecurringModel>,
    additional_data: Option<AdditionalData>,
    shopper_reference: Option<String>,
    store_payment_method: Option<bool>,
    shopper_name: Option<ShopperName>,
    #[serde(rename = "shopperIP")]
    shopper_ip: Option<String>,
    shopper_email: Option<String>,
    shopper_statement: Option<String>,
    billing_address: Option<AdyenAddress>,
    metadata: Option<serde_json::Value>,
}

impl From<&Card> for AdyenCard {
    fn from(card: &Card) -> Self {
        Self {
            number: card.get_card_number(),
            expiry_month: card.get_card_expiry_month_2_digit(),
            expiry_year: card.get_expiry_year_4_digit(),
            cvc: Some(card.card_cvc.clone()).filter(|cvc| !cvc.clone().expose().is_empty()),
            holder_name: card.card_holder_name.clone(),
            brand: get_adyen_card_network(card.get_card_network()),
        }
    }
}

fn shopper_name(card: Option<&Card>, customer_name: Option<&Secret<String>>) -> Option<ShopperName> {
    let (first_name, last_name) = match card.filter(|card| card.card_holder_name.is_some()) {
        Some(card) => (card.get_first_name(), card.get_last_name()),
        None => {
            let name = customer_name?.clone().expose();
            let mut parts = name.split_whitespace();
            let first = parts.next().map(|first| Secret::new(first.to_string()));
            let rest = parts.collect::<Vec<_>>().join(" ");
            (first, (!rest.is_empty()).then(|| Secret::new(rest)))
        }
    };
    (first_name.is_some() || last_name.is_some()).then_some(ShopperName {
        first_name,
        last_name,
    })
}

impl TryFrom<&RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>>
    for AdyenPaymentRequest
{
    type Error = Error;

    fn try_from(
        item: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
    ) -> Result<Self, Self::Error> {
        let auth_type = AdyenAuthType::try_from(&item.connector_auth_type)?;
        let common = &item.resource_common_data;
        let request = &item.request;

        let (payment_method, shopper_interaction, shopper_reference, recurring_processing_model, card) =
            match &request.payment_method_data {
                PaymentMethodData::Card(card) => {
                    let shopper_reference = request.setup_future_usage.then(|| {
                        common
                            .connector_customer
                            .clone()
                            .unwrap_or_else(|| common.connector_request_reference_id.clone())
                    });
                    (
                        AdyenPaymentMethod::AdyenCard(Box::new(AdyenCard::from(card))),
                        AdyenShopperInteraction::Ecommerce,
                        shopper_reference,
                        request
                            .setup_future_usage
                            .then_some(AdyenRecurringModel::CardOnFile),
                        Some(card),
                    )
                }
                PaymentMethodData::Token(token) => {
                    // psp_reference|recurring_detail_reference|shopper_reference
                    let token = token.clone().expose();
                    let stored_payment_method_id =
                        utils::authorization_part(&token, 1, "recurring_detail_reference")?;
                    let shopper_reference =
                        utils::authorization_part(&token, 2, "shopper_reference")?;
                    (
                        AdyenPaymentMethod::StoredCard(AdyenStoredCard {
                            stored_payment_method_id: Secret::new(stored_payment_method_id),
                        }),
                        AdyenShopperInteraction::ContinuedAuthentication,
                        Some(shopper_reference),
                        Some(AdyenRecurringModel::CardOnFile),
                        None,
                    )
                }
            };

        let additional_data = (!request.is_auto_capture()).then(|| AdditionalData {
            manual_capture: Some(true.to_string()),
        });

        Ok(Self {
            amount: Amount {
                currency: request.currency,
                value: request.amount,
            },
            merchant_account: auth_type.merchant_account,
            payment_method,
            reference: common.connector_request_reference_id.clone(),
            shopper_interaction,
            recurring_processing_model,
            additional_data,
            store_payment_method: request.setup_future_usage.then_some(true),
            shopper_reference,
            shopper_name: shopper_name(card, request.customer_name.as_ref()),
            shopper_ip: common.ip_address.clone(),
            shopper_email: common.email.clone(),
            shopper_statement: common.description.clone(),
            billing_address: common
                .get_optional_billing()
                .and_then(AdyenAddress::from_billing),
            metadata: request.metadata.clone(),
        })
    }
}

// ===== AUTHORIZE RESPONSE =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AdyenStatus {
    AuthenticationFinished,
    AuthenticationNotRequired,
    Authorised,
    Cancelled,
    ChallengeShopper,
    Error,
    Pending,
    Received,
    RedirectShopper,
    Refused,
    PresentToShopper,
}

#[derive(Clone, Default, Debug, Deserialize)]
pub struct AdyenResponseAdditionalData {
    #[serde(rename = "recurring.recurringDetailReference")]
    recurring_detail_reference: Option<String>,
    #[serde(rename = "recurring.shopperReference")]
    recurring_shopper_reference: Option<String>,
    #[serde(rename = "avsResult")]
    avs_result: Option<String>,
    #[serde(rename = "cvcResult")]
    cvc_result: Option<String>,
    #[serde(rename = "authCode")]
    auth_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenPaymentResponse {
    psp_reference: String,
    result_code: AdyenStatus,
    merchant_reference: Option<String>,
    refusal_reason: Option<String>,
    refusal_reason_code: Option<String>,
    additional_data: Option<AdyenResponseAdditionalData>,
}

fn get_adyen_payment_status(is_manual_capture: bool, adyen_status: &AdyenStatus) -> AttemptStatus {
    match adyen_status {
        AdyenStatus::Authorised => match is_manual_capture {
            true => AttemptStatus::Authorized,
            // In case of Automatic capture Authorized is the final status of the payment
            false => AttemptStatus::Charged,
        },
        AdyenStatus::Cancelled => AttemptStatus::Voided,
        AdyenStatus::AuthenticationFinished
        | AdyenStatus::AuthenticationNotRequired
        | AdyenStatus::Received
        | AdyenStatus::Pending => AttemptStatus::Pending,
        // shopper redirects are not followed
        AdyenStatus::ChallengeShopper
        | AdyenStatus::RedirectShopper
        | AdyenStatus::PresentToShopper => AttemptStatus::AuthorizationFailed,
        AdyenStatus::Error | AdyenStatus::Refused => AttemptStatus::AuthorizationFailed,
    }
}

impl AdyenPaymentResponse {
    /// `pspReference`, extended with the recurring detail and shopper when the card was stored.
    fn authorization(&self) -> String {
        let additional_data = self.additional_data.clone().unwrap_or_default();
        match (
            additional_data.recurring_detail_reference,
            additional_data.recurring_shopper_reference,
        ) {
            (Some(recurring_detail_reference), Some(shopper_reference)) => AuthorizationToken::new([
                self.psp_reference.clone(),
                recurring_detail_reference,
                shopper_reference,
            ])
            .to_string(),
            _ => self.psp_reference.clone(),
        }
    }

    fn is_stored(&self) -> bool {
        self.additional_data
            .as_ref()
            .is_some_and(|data| data.recurring_detail_reference.is_some())
    }
}

impl
    TryFrom<
        ResponseRouterData<
            AdyenPaymentResponse,
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>
{
    type Error = Error;

    fn try_from(
        value: ResponseRouterData<
            AdyenPaymentResponse,
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code,
        } = value;
        let status = get_adyen_payment_status(
            !router_data.request.is_auto_capture(),
            &response.result_code,
        );

        let result = if status == AttemptStatus::AuthorizationFailed {
            let message = response
                .refusal_reason
                .clone()
                .unwrap_or_else(|| format!("{:?}", response.result_code));
            Err(ErrorResponse {
                code: response
                    .refusal_reason_code
                    .clone()
                    .unwrap_or_else(|| common_utils::consts::NO_ERROR_CODE.to_string()),
                message: message.clone(),
                reason: Some(message),
                status_code: http_code,
                attempt_status: Some(status),
                connector_transaction_id: Some(response.psp_reference.clone()),
                standard_code: Some(refusal_standard_code(
                    response.refusal_reason_code.as_deref(),
                )),
            })
        } else {
            let authorization = response.authorization();
            let additional_data = response.additional_data.clone().unwrap_or_default();
            Ok(PaymentsResponseData::TransactionResponse {
                resource_id: ResponseId::ConnectorTransactionId(response.psp_reference.clone()),
                mandate_reference: response.is_stored().then(|| authorization.clone()),
                authorization: Some(authorization),
                connector_metadata: None,
                network_txn_id: additional_data.auth_code,
                connector_response_reference_id: response.merchant_reference.clone(),
                message: Some(format!("{:?}", response.result_code)),
                avs_result: additional_data.avs_result,
                cvv_result: additional_data.cvc_result,
                status_code: http_code,
            })
        };

        Ok(Self {
            response: result,
            resource_common_data: PaymentFlowData {
                status,
                ..router_data.resource_common_data
            },
            ..router_data
        })
    }
}

// ===== MODIFICATIONS =====

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenCaptureRequest {
    merchant_account: Secret<String>,
    amount: Amount,
    reference: String,
}

impl TryFrom<&RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>>
    for AdyenCaptureRequest
{
    type Error = Error;
    fn try_from(
        item: &RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
    ) -> Result<Self, Self::Error> {
        let auth_type = AdyenAuthType::try_from(&item.connector_auth_type)?;
        Ok(Self {
            merchant_account: auth_type.merchant_account,
            reference: item
                .resource_common_data
                .connector_request_reference_id
                .clone(),
            amount: Amount {
                currency: item.request.currency,
                value: item.request.amount_to_capture,
            },
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenVoidRequest {
    merchant_account: Secret<String>,
    reference: String,
}

impl TryFrom<&RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>>
    for AdyenVoidRequest
{
    type Error = Error;
    fn try_from(
        item: &RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
    ) -> Result<Self, Self::Error> {
        let auth_type = AdyenAuthType::try_from(&item.connector_auth_type)?;
        Ok(Self {
            merchant_account: auth_type.merchant_account,
            reference: item
                .resource_common_data
                .connector_request_reference_id
                .clone(),
        })
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenRefundRequest {
    merchant_account: Secret<String>,
    amount: Amount,
    merchant_refund_reason: Option<String>,
    reference: String,
}

impl TryFrom<&RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>>
    for AdyenRefundRequest
{
    type Error = Error;
    fn try_from(
        item: &RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
    ) -> Result<Self, Self::Error> {
        let auth_type = AdyenAuthType::try_from(&item.connector_auth_type)?;
        Ok(Self {
            merchant_account: auth_type.merchant_account,
            amount: Amount {
                currency: item.request.currency,
                value: item.request.refund_amount,
            },
            merchant_refund_reason: item.request.reason.clone(),
            reference: item.request.refund_id.clone(),
        })
    }
}

/// Reply to a capture, cancel or refund. Adyen only acknowledges receipt here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenModificationResponse {
    psp_reference: String,
    payment_psp_reference: String,
    reference: Option<String>,
    status: AdyenModificationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdyenModificationStatus {
    Received,
    #[serde(other)]
    Unknown,
}

pub type AdyenCaptureResponse = AdyenModificationResponse;
pub type AdyenVoidResponse = AdyenModificationResponse;
pub type AdyenRefundResponse = AdyenModificationResponse;

fn map_modification_response<F, Req>(
    value: ResponseRouterData<
        AdyenModificationResponse,
        RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData>,
    >,
    received: AttemptStatus,
    rejected: AttemptStatus,
) -> RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData> {
    let ResponseRouterData {
        response,
        router_data,
        http_code,
    } = value;

    let (status, result) = if response.status == AdyenModificationStatus::Received {
        (
            received,
            Ok(PaymentsResponseData::TransactionResponse {
                resource_id: ResponseId::ConnectorTransactionId(
                    response.payment_psp_reference.clone(),
                ),
                authorization: Some(response.psp_reference),
                mandate_reference: None,
                connector_metadata: None,
                network_txn_id: None,
                connector_response_reference_id: response.reference,
                message: Some("[received]".to_string()),
                avs_result: None,
                cvv_result: None,
                status_code: http_code,
            }),
        )
    } else {
        (
            rejected,
            Err(ErrorResponse {
                code: common_utils::consts::NO_ERROR_CODE.to_string(),
                message: common_utils::consts::NO_ERROR_MESSAGE.to_string(),
                reason: None,
                status_code: http_code,
                attempt_status: Some(rejected),
                connector_transaction_id: Some(response.payment_psp_reference),
                standard_code: Some(StandardErrorCode::ProcessingError),
            }),
        )
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
            AdyenCaptureResponse,
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>
{
    type Error = Error;
    fn try_from(
        value: ResponseRouterData<
            AdyenCaptureResponse,
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(map_modification_response(
            value,
            AttemptStatus::Charged,
            AttemptStatus::CaptureFailed,
        ))
    }
}

impl
    TryFrom<
        ResponseRouterData<
            AdyenVoidResponse,
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>
{
    type Error = Error;
    fn try_from(
        value: ResponseRouterData<
            AdyenVoidResponse,
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(map_modification_response(
            value,
            AttemptStatus::Voided,
            AttemptStatus::VoidFailed,
        ))
    }
}

impl
    TryFrom<
        ResponseRouterData<
            AdyenRefundResponse,
            RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
        >,
    > for RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>
{
    type Error = Error;
    fn try_from(
        value: ResponseRouterData<
            AdyenRefundResponse,
            RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code,
        } = value;

        // the refund settles asynchronously after it is received
        let (status, result) = match response.status {
            AdyenModificationStatus::Received => (
                RefundStatus::Pending,
                Ok(RefundsResponseData {
                    connector_refund_id: response.psp_reference,
                    refund_status: RefundStatus::Pending,
                    message: Some("[received]".to_string()),
                    status_code: http_code,
                }),
            ),
            AdyenModificationStatus::Unknown => (
                RefundStatus::Failure,
                Err(ErrorResponse {
                    code: common_utils::consts::NO_ERROR_CODE.to_string(),
                    message: common_utils::consts::NO_ERROR_MESSAGE.to_string(),
                    reason: None,
                    status_code: http_code,
                    attempt_status: None,
                    connector_transaction_id: Some(response.payment_psp_reference),
                    standard_code: Some(StandardErrorCode::ProcessingError),
                }),
            ),
        };

        Ok(Self {
            resource_common_data: RefundFlowData {
                status,
                ..router_data.resource_common_data
            },
            response: result,
            ..router_data
        })
    }
}

// ===== ERRORS =====

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenErrorResponse {
    pub status: i32,
    pub error_code: String,
    pub message: String,
    pub error_type: String,
    pub psp_reference: Option<String>,
}

impl AdyenErrorResponse {
    pub fn standard_code(&self, http_code: u16) -> StandardErrorCode {
        match self.error_code.as_str() {
            "101" => StandardErrorCode::IncorrectNumber,
            "102" | "140" => StandardErrorCode::InvalidNumber,
            "103" => StandardErrorCode::InvalidCvc,
            "104" => StandardErrorCode::IncorrectAddress,
            "129" => StandardErrorCode::InvalidExpiryDate,
            "010" | "901" | "905" => StandardErrorCode::ConfigError,
            _ => StandardErrorCode::from_http_status(http_code),
        }
    }
}

/// Maps `refusalReasonCode` from a refused payment.
pub fn refusal_standard_code(code: Option<&str>) -> StandardErrorCode {
    match code {
        Some("3") => StandardErrorCode::CallIssuer,
        Some("6") => StandardErrorCode::ExpiredCard,
        Some("8") => StandardErrorCode::IncorrectNumber,
        Some("24") => StandardErrorCode::IncorrectCvc,
        Some("32") => StandardErrorCode::IncorrectAddress,
        Some("4" | "9" | "21") => StandardErrorCode::ProcessingError,
        _ => StandardErrorCode::CardDeclined,
    }
}
