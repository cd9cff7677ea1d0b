pub mod requests;
pub mod responses;
pub mod transformers;


use base64::Engine;
use common_enums::{AttemptStatus, CurrencyUnit};
use common_utils::{consts, errors::CustomResult, scrubber::ScrubRule};
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
    errors,
    router_data::{ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
    router_response_types::Response,
    types::Connectors,
};
use hyperswitch_masking::{Mask, Maskable, PeekInterface};
use interfaces::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2, connector_types,
};

use self::{
    requests::WorldpayRequest,
    responses::{
        WorldpayCaptureResponse, WorldpayPaymentsResponse, WorldpayRefundResponse,
        WorldpayResponse, WorldpayVoidResponse,
    },
    transformers::WorldpayAuthType,
};
use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const AUTHORIZATION: &str = "Authorization";
}

pub const BASE64_ENGINE: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

#[derive(Debug, Clone)]
pub struct Worldpay;

impl Worldpay {
    pub const fn new() -> &'static Self {
        &Self
    }

    pub fn build_headers<F, FCD, Req, Res>(
        &self,
        req: &RouterDataV2<F, FCD, Req, Res>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let mut header = vec![(
            headers::CONTENT_TYPE.to_string(),
            self.common_get_content_type().to_string().into(),
        )];
        let mut auth_header = self.get_auth_header(&req.connector_auth_type)?;
        header.append(&mut auth_header);
        Ok(header)
    }

    // every message, order or modification, is posted to the same endpoint
    fn payment_service_url(&self, connectors: &Connectors) -> String {
        self.base_url(connectors).to_string()
    }
}

impl ConnectorCommon for Worldpay {
    fn id(&self) -> &'static str {
        "worldpay"
    }

    fn get_currency_unit(&self) -> CurrencyUnit {
        CurrencyUnit::Minor
    }

    fn common_get_content_type(&self) -> &'static str {
        "text/xml"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.worldpay.base_url.as_ref()
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let auth = WorldpayAuthType::try_from(auth_type)?;
        let credentials = format!("{}:{}", auth.username.peek(), auth.password.peek());
        Ok(vec![(
            headers::AUTHORIZATION.to_string(),
            format!("Basic {}", BASE64_ENGINE.encode(credentials)).into_masked(),
        )])
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let response: WorldpayResponse =
            match macros::ResponseFormat::Xml.parse(&res.response, "WorldpayResponse") {
                Ok(response) => response,
                Err(_) => {
                    return utils::handle_json_response_deserialization_failure(res, "worldpay")
                }
            };

        Ok(match response.error() {
            Some((error, order_code)) => ErrorResponse {
                code: error.code.clone(),
                message: error.message.trim().to_string(),
                reason: Some(res.body_text()),
                status_code: res.status_code,
                attempt_status: Some(AttemptStatus::Failure),
                connector_transaction_id: order_code,
                standard_code: Some(error.standard_code(res.status_code)),
            },
            None => ErrorResponse {
                code: consts::NO_ERROR_CODE.to_string(),
                message: consts::NO_ERROR_MESSAGE.to_string(),
                reason: Some(res.body_text()),
                status_code: res.status_code,
                attempt_status: Some(AttemptStatus::Failure),
                connector_transaction_id: None,
                standard_code: None,
            },
        })
    }

    fn scrub_rules(&self) -> &'static [ScrubRule] {
        &[
            ScrubRule::Header("Authorization"),
            ScrubRule::XmlElement("cardNumber"),
            ScrubRule::XmlElement("cvc"),
        ]
    }
}

impl connector_types::ValidationTrait for Worldpay {
    // orders are always authorised first and captured with a modification
    fn is_auto_capture_supported(&self) -> bool {
        false
    }
}

impl connector_types::ConnectorServiceTrait for Worldpay {}
impl connector_types::PaymentAuthorizeV2 for Worldpay {}
impl connector_types::PaymentCapture for Worldpay {}
impl connector_types::PaymentVoidV2 for Worldpay {}
impl connector_types::RefundV2 for Worldpay {}
impl connector_types::PaymentSessionToken for Worldpay {}
impl connector_types::PaymentTokenV2 for Worldpay {}
impl connector_types::CreateConnectorCustomer for Worldpay {}

impl
    ConnectorIntegrationV2<
        CreateSessionToken,
        PaymentFlowData,
        SessionTokenRequestData,
        SessionTokenResponseData,
    > for Worldpay
{
}

impl
    ConnectorIntegrationV2<
        PaymentMethodToken,
        PaymentFlowData,
        PaymentMethodTokenizationData,
        PaymentMethodTokenResponse,
    > for Worldpay
{
}

impl
    ConnectorIntegrationV2<
        CreateConnectorCustomer,
        PaymentFlowData,
        ConnectorCustomerData,
        ConnectorCustomerResponse,
    > for Worldpay
{
}

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Worldpay,
    curl_request: Xml(WorldpayRequest),
    curl_response: Xml(WorldpayPaymentsResponse),
    flow_name: Authorize,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentsAuthorizeData,
    flow_response: PaymentsResponseData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.payment_service_url(&req.resource_common_data.connectors))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Worldpay,
    curl_request: Xml(WorldpayRequest),
    curl_response: Xml(WorldpayCaptureResponse),
    flow_name: Capture,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentsCaptureData,
    flow_response: PaymentsResponseData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.payment_service_url(&req.resource_common_data.connectors))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Worldpay,
    curl_request: Xml(WorldpayRequest),
    curl_response: Xml(WorldpayVoidResponse),
    flow_name: Void,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentVoidData,
    flow_response: PaymentsResponseData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.payment_service_url(&req.resource_common_data.connectors))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Worldpay,
    curl_request: Xml(WorldpayRequest),
    curl_response: Xml(WorldpayRefundResponse),
    flow_name: Refund,
    resource_common_data: RefundFlowData,
    flow_request: RefundsData,
    flow_response: RefundsResponseData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.payment_service_url(&req.resource_common_data.connectors))
        }
    }
);
