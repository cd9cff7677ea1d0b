use std::collections::BTreeMap;

use common_enums::{AttemptStatus, Currency, RefundStatus, StandardErrorCode};
use common_utils::types::{FloatMajorUnit, FloatMajorUnitForConnector};
use domain_types::{
    connector_flow::{Authorize, Capture, PaymentMethodToken, Refund, Void},
    connector_types::{
        PaymentFlowData, PaymentMethodTokenResponse, PaymentMethodTokenizationData,
        PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, PaymentsResponseData,
        RefundFlowData, RefundsData, RefundsResponseData, ResponseId,
    },
    errors,
    gateway_response::AuthorizationToken,
    payment_method_data::{Card, PaymentMethodData},
    router_data::{ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
};
use hyperswitch_masking::{ExposeInterface, PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use crate::{types::ResponseRouterData, utils};

type Error = error_stack::Report<errors::ConnectorError>;

// ===== AUTHENTICATION =====

#[derive(Debug, Clone)]
pub struct NmiAuthType {
    pub api_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for NmiAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::HeaderKey { api_key }
            | ConnectorAuthType::BodyKey { api_key, .. } => Ok(Self {
                api_key: api_key.to_owned(),
            }),
            _ => Err(error_stack::report!(
                errors::ConnectorError::FailedToObtainAuthType
            )),
        }
    }
}

// ===== TRANSACTION TYPES =====

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Auth,
    Sale,
    Capture,
    Refund,
    Void,
}

/// Second half of an NMI authorization, e.g. `4567890|creditcard`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentType {
    Creditcard,
    Check,
}

// ===== PAYMENT METHOD DATA =====

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NmiPaymentMethod {
    Card(Box<CardData>),
    Vault(VaultData),
}

#[derive(Debug, Serialize)]
pub struct CardData {
    ccnumber: Secret<String>,
    ccexp: Secret<String>,
    cvv: Secret<String>,
}

#[derive(Debug, Serialize)]
pub struct VaultData {
    customer_vault_id: Secret<String>,
}

impl From<&Card> for CardData {
    fn from(card: &Card) -> Self {
        Self {
            ccnumber: card.get_card_number(),
            ccexp: card.get_expiry_date_as_mmyy(),
            cvv: card.card_cvc.clone(),
        }
    }
}

impl From<&PaymentMethodData> for NmiPaymentMethod {
    fn from(pm_data: &PaymentMethodData) -> Self {
        match pm_data {
            PaymentMethodData::Card(card) => Self::Card(Box::new(CardData::from(card))),
            // a stored card is referenced by the vault id `store` returned
            PaymentMethodData::Token(token) => Self::Vault(VaultData {
                customer_vault_id: Secret::new(
                    AuthorizationToken::parse(token.peek()).first().to_string(),
                ),
            }),
        }
    }
}

// ===== CUSTOMER DETAILS =====

#[derive(Debug, Default, Serialize)]
pub struct NmiCustomerDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address1: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address2: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    zip: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

impl NmiCustomerDetails {
    fn new(common: &PaymentFlowData, pm_data: &PaymentMethodData) -> Self {
        let card = match pm_data {
            PaymentMethodData::Card(card) => Some(card),
            PaymentMethodData::Token(_) => None,
        };
        let address = common.get_optional_billing();
        Self {
            first_name: card.and_then(Card::get_first_name),
            last_name: card.and_then(Card::get_last_name),
            address1: address.and_then(|address| address.line1.clone()),
            address2: address.and_then(|address| address.line2.clone()),
            city: address.and_then(|address| address.city.clone()),
            state: address.and_then(|address| address.state.clone()),
            zip: address.and_then(|address| address.zip.clone()),
            country: address.and_then(|address| address.country.clone()),
            phone: address.and_then(|address| address.phone.clone()),
            email: common.email.clone(),
        }
    }
}

// ===== MERCHANT DEFINED FIELDS =====

#[derive(Debug, Serialize)]
pub struct NmiMerchantDefinedField {
    #[serde(flatten)]
    inner: BTreeMap<String, Secret<String>>,
}

impl NmiMerchantDefinedField {
    pub fn new(metadata: &serde_json::Value) -> Self {
        let inner = metadata
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .enumerate()
                    .map(|(index, (key, value))| {
                        let value = value
                            .as_str()
                            .map_or_else(|| value.to_string(), str::to_string);
                        (
                            format!("merchant_defined_field_{}", index + 1),
                            Secret::new(format!("{key}={value}")),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { inner }
    }
}

// ===== PAYMENT REQUEST =====

#[derive(Debug, Serialize)]
pub struct NmiPaymentsRequest {
    security_key: Secret<String>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    amount: FloatMajorUnit,
    currency: Currency,
    orderid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ipaddress: Option<String>,
    #[serde(flatten)]
    payment_method: NmiPaymentMethod,
    #[serde(flatten)]
    customer: NmiCustomerDetails,
    #[serde(flatten)]
    merchant_defined_field: Option<NmiMerchantDefinedField>,
}

impl TryFrom<&RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>>
    for NmiPaymentsRequest
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
        let auth = NmiAuthType::try_from(&router_data.connector_auth_type)?;
        let request = &router_data.request;
        let common = &router_data.resource_common_data;

        let transaction_type = if request.is_auto_capture() {
            TransactionType::Sale
        } else {
            TransactionType::Auth
        };

        let amount = utils::convert_amount(
            &FloatMajorUnitForConnector,
            request.amount,
            request.currency,
        )?;

        Ok(Self {
            security_key: auth.api_key,
            transaction_type,
            amount,
            currency: request.currency,
            orderid: common.connector_request_reference_id.clone(),
            order_description: common.description.clone(),
            ipaddress: common.ip_address.clone(),
            payment_method: NmiPaymentMethod::from(&request.payment_method_data),
            customer: NmiCustomerDetails::new(common, &request.payment_method_data),
            merchant_defined_field: request.metadata.as_ref().map(NmiMerchantDefinedField::new),
        })
    }
}

// ===== PAYMENT RESPONSE =====

/// Every transact.php reply, success or not, comes back in this url-encoded shape.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StandardResponse {
    /// "1" approved, "2" declined, "3" error
    pub response: String,
    pub responsetext: String,
    pub authcode: Option<String>,
    #[serde(default)]
    pub transactionid: String,
    pub avsresponse: Option<String>,
    pub cvvresponse: Option<String>,
    pub orderid: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub response_code: Option<String>,
    #[serde(default)]
    pub customer_vault_id: Option<Secret<String>>,
}

impl StandardResponse {
    pub fn is_approved(&self) -> bool {
        self.response == "1"
    }

    pub(crate) fn error_response(
        &self,
        http_code: u16,
        attempt_status: Option<AttemptStatus>,
    ) -> ErrorResponse {
        ErrorResponse {
            code: self
                .response_code
                .clone()
                .unwrap_or_else(|| self.response.clone()),
            message: self.responsetext.clone(),
            reason: Some(self.responsetext.clone()),
            status_code: http_code,
            attempt_status,
            connector_transaction_id: Some(self.transactionid.clone())
                .filter(|transaction_id| !transaction_id.is_empty()),
            standard_code: Some(self.standard_error_code()),
        }
    }

    /// `response` is 2 for declines and 3 for errors; `response_code` narrows it down.
    fn standard_error_code(&self) -> StandardErrorCode {
        match self.response_code.as_deref() {
            Some("220") => StandardErrorCode::IncorrectNumber,
            Some("221" | "222") => StandardErrorCode::InvalidNumber,
            Some("223") => StandardErrorCode::ExpiredCard,
            Some("224") => StandardErrorCode::InvalidExpiryDate,
            Some("225") => StandardErrorCode::IncorrectCvc,
            Some("240") => StandardErrorCode::CallIssuer,
            Some("250" | "251" | "252" | "253") => StandardErrorCode::PickupCard,
            Some("410" | "411" | "412" | "413" | "414") => StandardErrorCode::ConfigError,
            Some("300" | "400" | "420" | "421" | "430" | "440" | "441" | "460" | "461") => {
                StandardErrorCode::ProcessingError
            }
            _ if self.response == "2" => StandardErrorCode::CardDeclined,
            _ => StandardErrorCode::ProcessingError,
        }
    }

    fn transaction_response(&self, http_code: u16) -> PaymentsResponseData {
        PaymentsResponseData::TransactionResponse {
            resource_id: ResponseId::ConnectorTransactionId(self.transactionid.clone()),
            authorization: Some(
                AuthorizationToken::new([
                    self.transactionid.clone(),
                    PaymentType::Creditcard.to_string(),
                ])
                .to_string(),
            ),
            mandate_reference: self
                .customer_vault_id
                .as_ref()
                .map(|vault_id| vault_id.clone().expose()),
            connector_metadata: None,
            network_txn_id: None,
            connector_response_reference_id: self.orderid.clone(),
            message: Some(self.responsetext.clone()),
            avs_result: self.avsresponse.clone().filter(|code| !code.is_empty()),
            cvv_result: self.cvvresponse.clone().filter(|code| !code.is_empty()),
            status_code: http_code,
        }
    }
}

pub type NmiPaymentsResponse = StandardResponse;
pub type NmiCaptureResponse = StandardResponse;
pub type NmiVoidResponse = StandardResponse;
pub type NmiRefundResponse = StandardResponse;
pub type NmiVaultResponse = StandardResponse;

fn map_payment_response<F, Req>(
    item: ResponseRouterData<
        StandardResponse,
        RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData>,
    >,
    approved: AttemptStatus,
    declined: AttemptStatus,
) -> RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData> {
    let response = &item.response;
    let (status, result) = if response.is_approved() {
        (approved, Ok(response.transaction_response(item.http_code)))
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
            StandardResponse,
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            StandardResponse,
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let approved = if item.router_data.request.is_auto_capture() {
            AttemptStatus::Charged
        } else {
            AttemptStatus::Authorized
        };
        Ok(map_payment_response(
            item,
            approved,
            AttemptStatus::AuthorizationFailed,
        ))
    }
}

// ===== CAPTURE =====

#[derive(Debug, Serialize)]
pub struct NmiCaptureRequest {
    security_key: Secret<String>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    transactionid: String,
    amount: FloatMajorUnit,
}

impl TryFrom<&RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>>
    for NmiCaptureRequest
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
        let auth = NmiAuthType::try_from(&router_data.connector_auth_type)?;
        let request = &router_data.request;
        Ok(Self {
            security_key: auth.api_key,
            transaction_type: TransactionType::Capture,
            transactionid: AuthorizationToken::parse(&request.connector_transaction_id)
                .first()
                .to_string(),
            amount: utils::convert_amount(
                &FloatMajorUnitForConnector,
                request.amount_to_capture,
                request.currency,
            )?,
        })
    }
}

impl
    TryFrom<
        ResponseRouterData<
            StandardResponse,
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            StandardResponse,
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(map_payment_response(
            item,
            AttemptStatus::Charged,
            AttemptStatus::CaptureFailed,
        ))
    }
}

// ===== VOID =====

#[derive(Debug, Serialize)]
pub struct NmiVoidRequest {
    security_key: Secret<String>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    transactionid: String,
    void_reason: VoidReason,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoidReason {
    Fraud,
    UserCancel,
    IccRejected,
}

impl TryFrom<&RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>>
    for NmiVoidRequest
{
    type Error = Error;

    fn try_from(
        router_data: &RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
    ) -> Result<Self, Self::Error> {
        let auth = NmiAuthType::try_from(&router_data.connector_auth_type)?;
        let void_reason = router_data
            .request
            .cancellation_reason
            .as_deref()
            .map_or(VoidReason::UserCancel, |reason| match reason {
                "fraud" => VoidReason::Fraud,
                "icc_rejected" => VoidReason::IccRejected,
                _ => VoidReason::UserCancel,
            });

        Ok(Self {
            security_key: auth.api_key,
            transaction_type: TransactionType::Void,
            transactionid: AuthorizationToken::parse(&router_data.request.connector_transaction_id)
                .first()
                .to_string(),
            void_reason,
        })
    }
}

impl
    TryFrom<
        ResponseRouterData<
            StandardResponse,
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            StandardResponse,
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(map_payment_response(
            item,
            AttemptStatus::Voided,
            AttemptStatus::VoidFailed,
        ))
    }
}

// ===== REFUND =====

#[derive(Debug, Serialize)]
pub struct NmiRefundRequest {
    security_key: Secret<String>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    transactionid: String,
    amount: FloatMajorUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment: Option<PaymentType>,
}

impl TryFrom<&RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>>
    for NmiRefundRequest
{
    type Error = Error;

    fn try_from(
        router_data: &RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
    ) -> Result<Self, Self::Error> {
        let auth = NmiAuthType::try_from(&router_data.connector_auth_type)?;
        let request = &router_data.request;
        let authorization = AuthorizationToken::parse(&request.connector_transaction_id);
        Ok(Self {
            security_key: auth.api_key,
            transaction_type: TransactionType::Refund,
            transactionid: authorization.first().to_string(),
            amount: utils::convert_amount(
                &FloatMajorUnitForConnector,
                request.refund_amount,
                request.currency,
            )?,
            payment: authorization
                .part(1)
                .and_then(|payment_type| payment_type.parse().ok()),
        })
    }
}

impl
    TryFrom<
        ResponseRouterData<
            StandardResponse,
            RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
        >,
    > for RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            StandardResponse,
            RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let response = &item.response;
        let (refund_status, result) = if response.is_approved() {
            (
                RefundStatus::Success,
                Ok(RefundsResponseData {
                    connector_refund_id: response.transactionid.clone(),
                    refund_status: RefundStatus::Success,
                    message: Some(response.responsetext.clone()),
                    status_code: item.http_code,
                }),
            )
        } else {
            (
                RefundStatus::Failure,
                Err(response.error_response(item.http_code, None)),
            )
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

// ===== CUSTOMER VAULT =====

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerVaultAction {
    AddCustomer,
}

/// Keeps a card in the NMI customer vault without charging it.
#[derive(Debug, Serialize)]
pub struct NmiVaultRequest {
    security_key: Secret<String>,
    customer_vault: CustomerVaultAction,
    #[serde(flatten)]
    card: CardData,
    #[serde(flatten)]
    customer: NmiCustomerDetails,
}

impl
    TryFrom<
        &RouterDataV2<
            PaymentMethodToken,
            PaymentFlowData,
            PaymentMethodTokenizationData,
            PaymentMethodTokenResponse,
        >,
    > for NmiVaultRequest
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
        let auth = NmiAuthType::try_from(&router_data.connector_auth_type)?;
        let pm_data = &router_data.request.payment_method_data;
        let card = pm_data.get_card()?;
        Ok(Self {
            security_key: auth.api_key,
            customer_vault: CustomerVaultAction::AddCustomer,
            card: CardData::from(card),
            customer: NmiCustomerDetails::new(&router_data.resource_common_data, pm_data),
        })
    }
}

impl
    TryFrom<
        ResponseRouterData<
            StandardResponse,
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
            StandardResponse,
            RouterDataV2<
                PaymentMethodToken,
                PaymentFlowData,
                PaymentMethodTokenizationData,
                PaymentMethodTokenResponse,
            >,
        >,
    ) -> Result<Self, Self::Error> {
        let response = &item.response;
        let result = match (&response.customer_vault_id, response.is_approved()) {
            (Some(vault_id), true) => Ok(PaymentMethodTokenResponse {
                token: vault_id.clone().expose(),
            }),
            _ => Err(response.error_response(item.http_code, Some(AttemptStatus::Failure))),
        };
        Ok(Self {
            response: result,
            ..item.router_data
        })
    }
}
