//! Fixtures shared by the connector unit tests.

use common_enums::{CaptureMethod, Currency};
use common_utils::{request::Request, MinorUnit};
use domain_types::{
    connector_flow::{
        Authorize, Capture, CreateConnectorCustomer, CreateSessionToken, PaymentMethodToken,
        Refund, Void,
    },
    connector_types::{
        ConnectorCustomerData, ConnectorCustomerResponse, PaymentFlowData,
        PaymentMethodTokenResponse, PaymentMethodTokenizationData, PaymentVoidData,
        PaymentsAuthorizeData, PaymentsCaptureData, PaymentsResponseData, RefundFlowData,
        RefundsData, RefundsResponseData, SessionTokenRequestData, SessionTokenResponseData,
    },
    payment_method_data::{Card, PaymentMethodData},
    router_data::{Address, ConnectorAuthType},
    router_data_v2::RouterDataV2,
    router_response_types::Response,
    types::{ConnectorParams, Connectors},
};
use hyperswitch_masking::{ExposeInterface, Secret};

pub(crate) const BASE_URL: &str = "https://gateway.test/";
pub(crate) const SECONDARY_URL: &str = "https://connect.gateway.test/";

pub(crate) fn connectors() -> Connectors {
    let params = ConnectorParams::new(BASE_URL).with_secondary_base_url(SECONDARY_URL);
    Connectors {
        adyen: params.clone(),
        nmi: params.clone(),
        square: params.clone(),
        stax: params.clone(),
        worldpay: params,
    }
}

pub(crate) fn secret(value: &str) -> Secret<String> {
    Secret::new(value.to_string())
}

pub(crate) fn card() -> Card {
    Card::new("4111111111111111", "3", "2030", "737").with_holder_name("Ada Lovelace")
}

pub(crate) fn flow_data() -> PaymentFlowData {
    let mut data = PaymentFlowData::new("order-1", connectors());
    data.description = Some("Store purchase".to_string());
    data.email = Some("ada@example.com".to_string());
    data.ip_address = Some("127.0.0.1".to_string());
    data.address = Some(Address {
        line1: Some(secret("1 Analytical Way")),
        city: Some("London".to_string()),
        zip: Some(secret("N1 9GU")),
        country: Some("GB".to_string()),
        ..Address::default()
    });
    data
}

pub(crate) fn authorize_data(
    auth: ConnectorAuthType,
    payment_method_data: PaymentMethodData,
    capture_method: CaptureMethod,
) -> RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData> {
    RouterDataV2::new(
        flow_data(),
        auth,
        PaymentsAuthorizeData {
            payment_method_data,
            amount: MinorUnit::new(1050),
            currency: Currency::USD,
            capture_method: Some(capture_method),
            customer_name: Some(secret("Ada Lovelace")),
            setup_future_usage: false,
            metadata: None,
        },
    )
}

pub(crate) fn capture_data(
    auth: ConnectorAuthType,
    authorization: &str,
) -> RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData> {
    RouterDataV2::new(
        flow_data(),
        auth,
        PaymentsCaptureData {
            amount_to_capture: MinorUnit::new(1050),
            currency: Currency::USD,
            connector_transaction_id: authorization.to_string(),
        },
    )
}

pub(crate) fn void_data(
    auth: ConnectorAuthType,
    authorization: &str,
) -> RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData> {
    RouterDataV2::new(
        flow_data(),
        auth,
        PaymentVoidData {
            connector_transaction_id: authorization.to_string(),
            cancellation_reason: None,
            amount: Some(MinorUnit::new(1050)),
            currency: Some(Currency::USD),
        },
    )
}

pub(crate) fn refund_data(
    auth: ConnectorAuthType,
    authorization: &str,
) -> RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData> {
    RouterDataV2::new(
        RefundFlowData::new(Some("refund-1".to_string()), connectors()),
        auth,
        RefundsData {
            refund_id: "refund-1".to_string(),
            connector_transaction_id: authorization.to_string(),
            refund_amount: MinorUnit::new(500),
            currency: Currency::USD,
            reason: Some("requested_by_customer".to_string()),
        },
    )
}

pub(crate) fn token_data(
    auth: ConnectorAuthType,
) -> RouterDataV2<
    PaymentMethodToken,
    PaymentFlowData,
    PaymentMethodTokenizationData,
    PaymentMethodTokenResponse,
> {
    RouterDataV2::new(
        flow_data(),
        auth,
        PaymentMethodTokenizationData {
            payment_method_data: PaymentMethodData::Card(card()),
            amount: MinorUnit::new(1050),
            currency: Currency::USD,
        },
    )
}

pub(crate) fn customer_data(
    auth: ConnectorAuthType,
) -> RouterDataV2<
    CreateConnectorCustomer,
    PaymentFlowData,
    ConnectorCustomerData,
    ConnectorCustomerResponse,
> {
    RouterDataV2::new(
        flow_data(),
        auth,
        ConnectorCustomerData {
            email: Some("ada@example.com".to_string()),
            name: Some(secret("Ada Lovelace")),
            description: None,
            phone: None,
        },
    )
}

pub(crate) fn session_data(
    auth: ConnectorAuthType,
) -> RouterDataV2<CreateSessionToken, PaymentFlowData, SessionTokenRequestData, SessionTokenResponseData>
{
    RouterDataV2::new(
        flow_data(),
        auth,
        SessionTokenRequestData {
            amount: MinorUnit::new(1050),
            currency: Currency::USD,
        },
    )
}

pub(crate) fn response(status_code: u16, body: &str) -> Response {
    Response {
        headers: None,
        response: bytes::Bytes::from(body.to_string()),
        status_code,
    }
}

#[allow(clippy::expect_used)]
pub(crate) fn body_of(request: &Request) -> String {
    request
        .body
        .as_ref()
        .expect("request has a body")
        .get_inner_value()
        .expect("body serializes")
        .expose()
}
