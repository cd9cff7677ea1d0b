use common_enums::{AttemptStatus, CardNetwork, Currency, RefundStatus, StandardErrorCode};
use common_utils::{consts, types::StringMinorUnitForConnector, MinorUnit};
use domain_types::{
    connector_flow::{Authorize, Capture, Refund, Void},
    connector_types::{
        PaymentFlowData, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        PaymentsResponseData, RefundFlowData, RefundsData, RefundsResponseData, ResponseId,
    },
    errors,
    payment_method_data::{Card, PaymentMethodData},
    router_data::{Address, ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
};
use hyperswitch_masking::Secret;

use super::{
    requests::{
        WorldpayAddress, WorldpayAmount, WorldpayBody, WorldpayCard, WorldpayCardAddress,
        WorldpayDate, WorldpayExpiryDate, WorldpayModification, WorldpayModify, WorldpayOrder,
        WorldpayOrderModification, WorldpayPaymentDetails, WorldpayPaymentMethod,
        WorldpayPaymentService, WorldpayRequest, WorldpaySession, WorldpayShopper,
        WorldpaySubmit,
    },
    responses::{
        WorldpayError, WorldpayLastEvent, WorldpayOk, WorldpayPayment, WorldpayReceived,
        WorldpayResponse,
    },
};
use crate::{types::ResponseRouterData, utils};

type Error = error_stack::Report<errors::ConnectorError>;

const API_VERSION: &str = "1.4";
const DEFAULT_DESCRIPTION: &str = "Purchase";

// ===== AUTHENTICATION =====

#[derive(Debug, Clone)]
pub struct WorldpayAuthType {
    pub username: Secret<String>,
    pub password: Secret<String>,
    pub merchant_code: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for WorldpayAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::SignatureKey {
                api_key,
                key1,
                api_secret,
            } => Ok(Self {
                username: api_key.to_owned(),
                password: key1.to_owned(),
                merchant_code: api_secret.to_owned(),
            }),
            // the login doubles as merchant code when none is configured
            ConnectorAuthType::BodyKey { api_key, key1 } => Ok(Self {
                username: api_key.to_owned(),
                password: key1.to_owned(),
                merchant_code: api_key.to_owned(),
            }),
            _ => Err(error_stack::report!(
                errors::ConnectorError::FailedToObtainAuthType
            )),
        }
    }
}

fn payment_service(auth_type: &ConnectorAuthType, body: WorldpayBody) -> Result<WorldpayRequest, Error> {
    let auth = WorldpayAuthType::try_from(auth_type)?;
    Ok(WorldpayPaymentService {
        version: API_VERSION,
        merchant_code: auth.merchant_code,
        body,
    })
}

fn worldpay_amount(amount: MinorUnit, currency: Currency) -> Result<WorldpayAmount, Error> {
    Ok(WorldpayAmount {
        value: utils::convert_amount(&StringMinorUnitForConnector, amount, currency)?,
        currency_code: currency,
        exponent: currency.number_of_digits_after_decimal_point(),
    })
}

fn modify(
    auth_type: &ConnectorAuthType,
    authorization: &str,
    modification: WorldpayModification,
) -> Result<WorldpayRequest, Error> {
    payment_service(
        auth_type,
        WorldpayBody::Modify(WorldpayModify {
            order_modification: WorldpayOrderModification {
                order_code: authorization.to_string(),
                modification,
            },
        }),
    )
}

// ===== AUTHORIZE REQUEST =====

impl From<&Address> for WorldpayCardAddress {
    fn from(address: &Address) -> Self {
        Self {
            address: WorldpayAddress {
                address1: address.line1.clone(),
                address2: address.line2.clone(),
                postal_code: address.zip.clone(),
                city: address.city.clone(),
                state: address.state.clone(),
                country_code: address.country.clone(),
                telephone_number: address.phone.clone(),
            },
        }
    }
}

fn payment_method(
    card: &Card,
    customer_name: Option<&Secret<String>>,
    address: Option<&Address>,
) -> Result<WorldpayPaymentMethod, Error> {
    let card_holder_name = card
        .card_holder_name
        .as_ref()
        .or(customer_name)
        .cloned()
        .ok_or_else(utils::missing_field_err("card_holder_name"))?;
    let card_data = WorldpayCard {
        card_number: card.get_card_number(),
        expiry_date: WorldpayExpiryDate {
            date: WorldpayDate {
                month: card.get_card_expiry_month_2_digit(),
                year: card.get_expiry_year_4_digit(),
            },
        },
        card_holder_name,
        cvc: card.card_cvc.clone(),
        card_address: address.map(WorldpayCardAddress::from),
    };

    Ok(match card.get_card_network() {
        CardNetwork::Visa => WorldpayPaymentMethod::Visa(card_data),
        CardNetwork::Mastercard => WorldpayPaymentMethod::Mastercard(card_data),
        CardNetwork::AmericanExpress => WorldpayPaymentMethod::Amex(card_data),
        CardNetwork::Discover => WorldpayPaymentMethod::Discover(card_data),
        CardNetwork::JCB => WorldpayPaymentMethod::Jcb(card_data),
        CardNetwork::DinersClub => WorldpayPaymentMethod::Diners(card_data),
        CardNetwork::Unknown => WorldpayPaymentMethod::Card(card_data),
    })
}

impl TryFrom<&RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>>
    for WorldpayRequest
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
        let common = &router_data.resource_common_data;
        let request = &router_data.request;
        let card = match &request.payment_method_data {
            PaymentMethodData::Card(card) => card,
            PaymentMethodData::Token(_) => Err(errors::ConnectorError::NotSupported {
                message: "Stored card".to_string(),
                connector: "worldpay",
            })?,
        };

        let order = WorldpayOrder {
            order_code: common.connector_request_reference_id.clone(),
            description: common
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            amount: worldpay_amount(request.amount, request.currency)?,
            payment_details: WorldpayPaymentDetails {
                payment_method: payment_method(
                    card,
                    request.customer_name.as_ref(),
                    common.get_optional_billing(),
                )?,
                session: common.ip_address.clone().map(|ip| WorldpaySession {
                    shopper_ip_address: ip,
                    id: common.connector_request_reference_id.clone(),
                }),
            },
            shopper: WorldpayShopper {
                shopper_email_address: common.email.clone(),
            },
        };

        payment_service(
            &router_data.connector_auth_type,
            WorldpayBody::Submit(WorldpaySubmit { order }),
        )
    }
}

// ===== MODIFICATION REQUESTS =====

impl TryFrom<&RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>>
    for WorldpayRequest
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
        let request = &router_data.request;
        modify(
            &router_data.connector_auth_type,
            &request.connector_transaction_id,
            WorldpayModification::Capture {
                amount: worldpay_amount(request.amount_to_capture, request.currency)?,
            },
        )
    }
}

impl TryFrom<&RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>>
    for WorldpayRequest
{
    type Error = Error;

    fn try_from(
        router_data: &RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
    ) -> Result<Self, Self::Error> {
        modify(
            &router_data.connector_auth_type,
            &router_data.request.connector_transaction_id,
            WorldpayModification::Cancel,
        )
    }
}

impl TryFrom<&RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>>
    for WorldpayRequest
{
    type Error = Error;

    fn try_from(
        router_data: &RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
    ) -> Result<Self, Self::Error> {
        let request = &router_data.request;
        modify(
            &router_data.connector_auth_type,
            &request.connector_transaction_id,
            WorldpayModification::Refund {
                amount: worldpay_amount(request.refund_amount, request.currency)?,
            },
        )
    }
}

// ===== RESPONSES =====

impl WorldpayError {
    fn to_error_response(
        &self,
        http_code: u16,
        attempt_status: Option<AttemptStatus>,
        order_code: Option<String>,
    ) -> ErrorResponse {
        let message = self.message.trim().to_string();
        ErrorResponse {
            code: self.code.clone(),
            message: message.clone(),
            reason: Some(message),
            status_code: http_code,
            attempt_status,
            connector_transaction_id: order_code,
            standard_code: Some(self.standard_code(http_code)),
        }
    }

    /// Codes of the `error` element. They describe the request, never the card, except 7.
    pub fn standard_code(&self, http_code: u16) -> StandardErrorCode {
        match self.code.as_str() {
            "4" => StandardErrorCode::ConfigError,
            "7" => StandardErrorCode::InvalidNumber,
            _ => StandardErrorCode::from_http_status(http_code),
        }
    }
}

/// A modification reply that neither acknowledges the request nor names an error.
fn unacknowledged(http_code: u16, attempt_status: Option<AttemptStatus>) -> ErrorResponse {
    ErrorResponse {
        code: consts::NO_ERROR_CODE.to_string(),
        message: "Request not acknowledged".to_string(),
        reason: None,
        status_code: http_code,
        attempt_status,
        connector_transaction_id: None,
        standard_code: Some(StandardErrorCode::ProcessingError),
    }
}

/// Maps the ISO 8583 return code of a refused authorisation.
pub fn refusal_standard_code(return_code: Option<&str>) -> StandardErrorCode {
    match return_code {
        Some("2") => StandardErrorCode::CallIssuer,
        Some("4" | "7" | "41" | "43") => StandardErrorCode::PickupCard,
        Some("14" | "15") => StandardErrorCode::InvalidNumber,
        Some("33" | "54") => StandardErrorCode::ExpiredCard,
        Some("82" | "N7") => StandardErrorCode::IncorrectCvc,
        _ => StandardErrorCode::CardDeclined,
    }
}

impl WorldpayResponse {
    /// The first `error` element, whether it sits under `reply` or under `orderStatus`.
    pub fn error(&self) -> Option<(&WorldpayError, Option<String>)> {
        self.reply
            .error
            .as_ref()
            .map(|error| (error, None))
            .or_else(|| {
                self.reply.order_status.as_ref().and_then(|status| {
                    status
                        .error
                        .as_ref()
                        .map(|error| (error, Some(status.order_code.clone())))
                })
            })
    }
}

impl WorldpayPayment {
    fn declined_response(&self, http_code: u16, order_code: &str) -> ErrorResponse {
        let (code, message) = self.iso8583_return_code.as_ref().map_or_else(
            || (consts::NO_ERROR_CODE.to_string(), self.last_event.clone()),
            |return_code| (return_code.code.clone(), return_code.description.clone()),
        );
        let standard_code = refusal_standard_code(
            self.iso8583_return_code
                .as_ref()
                .map(|return_code| return_code.code.as_str()),
        );
        ErrorResponse {
            code,
            standard_code: Some(standard_code),
            message: message.clone(),
            reason: Some(message),
            status_code: http_code,
            attempt_status: Some(AttemptStatus::AuthorizationFailed),
            connector_transaction_id: Some(order_code.to_string()),
        }
    }
}

fn authorize_status(last_event: Option<WorldpayLastEvent>) -> Option<AttemptStatus> {
    match last_event? {
        WorldpayLastEvent::Authorised => Some(AttemptStatus::Authorized),
        WorldpayLastEvent::Captured
        | WorldpayLastEvent::Settled
        | WorldpayLastEvent::SentForRefund
        | WorldpayLastEvent::Refunded => Some(AttemptStatus::Charged),
        WorldpayLastEvent::SentForAuthorisation => Some(AttemptStatus::Pending),
        WorldpayLastEvent::Cancelled => Some(AttemptStatus::Voided),
        WorldpayLastEvent::Refused | WorldpayLastEvent::Expired | WorldpayLastEvent::Error => None,
    }
}

impl
    TryFrom<
        ResponseRouterData<
            WorldpayResponse,
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            WorldpayResponse,
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let http_code = item.http_code;
        let (status, result) = if let Some((error, order_code)) = item.response.error() {
            (
                AttemptStatus::Failure,
                Err(error.to_error_response(http_code, Some(AttemptStatus::Failure), order_code)),
            )
        } else {
            let order_status = item
                .response
                .reply
                .order_status
                .as_ref()
                .ok_or(errors::ConnectorError::ResponseHandlingFailed)?;
            let payment = order_status
                .payment
                .as_ref()
                .ok_or(errors::ConnectorError::ResponseHandlingFailed)?;
            let order_code = order_status.order_code.clone();

            match authorize_status(payment.last_event.parse().ok()) {
                Some(status) => (
                    status,
                    Ok(PaymentsResponseData::TransactionResponse {
                        resource_id: ResponseId::ConnectorTransactionId(order_code.clone()),
                        authorization: Some(order_code.clone()),
                        mandate_reference: None,
                        connector_metadata: None,
                        network_txn_id: payment
                            .authorisation_id
                            .as_ref()
                            .map(|authorisation| authorisation.id.clone()),
                        connector_response_reference_id: Some(order_code),
                        message: Some(payment.last_event.clone()),
                        avs_result: payment
                            .avs_result_code
                            .as_ref()
                            .map(|avs| avs.description.clone()),
                        cvv_result: payment
                            .cvc_result_code
                            .as_ref()
                            .map(|cvc| cvc.description.clone()),
                        status_code: http_code,
                    }),
                ),
                None => (
                    AttemptStatus::AuthorizationFailed,
                    Err(payment.declined_response(http_code, &order_code)),
                ),
            }
        };

        Ok(Self {
            response: result,
            resource_common_data: PaymentFlowData {
                status,
                ..item.router_data.resource_common_data
            },
            ..item.router_data
        })
    }
}

/// Maps the `<ok>` acknowledgement of a capture or cancel.
fn map_modification_response<F, Req>(
    item: ResponseRouterData<WorldpayResponse, RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData>>,
    received: fn(&WorldpayOk) -> Option<&WorldpayReceived>,
    approved: AttemptStatus,
    declined: AttemptStatus,
) -> RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData> {
    let http_code = item.http_code;
    let acknowledged = item.response.reply.ok.as_ref().and_then(received);

    let (status, result) = match (acknowledged, item.response.error()) {
        (Some(receipt), _) => (
            approved,
            Ok(PaymentsResponseData::transaction(
                receipt.order_code.clone(),
                http_code,
            )),
        ),
        (None, Some((error, order_code))) => (
            declined,
            Err(error.to_error_response(http_code, Some(declined), order_code)),
        ),
        (None, None) => (declined, Err(unacknowledged(http_code, Some(declined)))),
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
            WorldpayResponse,
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            WorldpayResponse,
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(map_modification_response(
            item,
            |ok| ok.capture_received.as_ref(),
            AttemptStatus::Charged,
            AttemptStatus::CaptureFailed,
        ))
    }
}

impl
    TryFrom<
        ResponseRouterData<
            WorldpayResponse,
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    > for RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            WorldpayResponse,
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(map_modification_response(
            item,
            |ok| ok.cancel_received.as_ref(),
            AttemptStatus::Voided,
            AttemptStatus::VoidFailed,
        ))
    }
}

impl
    TryFrom<
        ResponseRouterData<
            WorldpayResponse,
            RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
        >,
    > for RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            WorldpayResponse,
            RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let http_code = item.http_code;
        let acknowledged = item
            .response
            .reply
            .ok
            .as_ref()
            .and_then(|ok| ok.refund_received.as_ref());

        let (refund_status, result) = match (acknowledged, item.response.error()) {
            (Some(receipt), _) => (
                RefundStatus::Success,
                Ok(RefundsResponseData {
                    connector_refund_id: receipt.order_code.clone(),
                    refund_status: RefundStatus::Success,
                    message: None,
                    status_code: http_code,
                }),
            ),
            (None, Some((error, order_code))) => (
                RefundStatus::Failure,
                Err(error.to_error_response(http_code, None, order_code)),
            ),
            (None, None) => (RefundStatus::Failure, Err(unacknowledged(http_code, None))),
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
