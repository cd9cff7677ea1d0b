pub mod transformers;

#[cfg(test)]
mod test;

use common_enums::CurrencyUnit;
use common_utils::{errors::CustomResult, scrubber::ScrubRule};
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
use error_stack::ResultExt;
use hyperswitch_masking::{Mask, Maskable, PeekInterface};
use interfaces::{
    api::ConnectorCommon,
    connector_integration_v2::ConnectorIntegrationV2,
    connector_types::{self, StoreMethod},
};

use self::transformers::{
    StaxAuthType, StaxAuthorizeRequest, StaxAuthorizeResponse, StaxCaptureRequest,
    StaxCaptureResponse, StaxCustomerRequest, StaxCustomerResponse, StaxErrorResponse,
    StaxRefundRequest, StaxRefundResponse, StaxTokenRequest, StaxTokenResponse, StaxVoidResponse,
};
use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const AUTHORIZATION: &str = "Authorization";
}

#[derive(Debug, Clone)]
pub struct Stax;

impl Stax {
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

    fn transaction_url(&self, connectors: &Connectors, authorization: &str, action: &str) -> String {
        format!(
            "{}transaction/{authorization}/{action}",
            self.base_url(connectors)
        )
    }
}

impl ConnectorCommon for Stax {
    fn id(&self) -> &'static str {
        "stax"
    }

    fn get_currency_unit(&self) -> CurrencyUnit {
        CurrencyUnit::Base
    }

    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.stax.base_url.as_ref()
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let auth = StaxAuthType::try_from(auth_type)
            .change_context(errors::ConnectorError::FailedToObtainAuthType)?;
        Ok(vec![(
            headers::AUTHORIZATION.to_string(),
            format!("Bearer {}", auth.api_key.peek()).into_masked(),
        )])
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let response: StaxErrorResponse =
            match macros::ResponseFormat::Json.parse(&res.response, "StaxErrorResponse") {
                Ok(response) => response,
                Err(_) => return utils::handle_json_response_deserialization_failure(res, "stax"),
            };

        Ok(ErrorResponse {
            status_code: res.status_code,
            code: response
                .code
                .clone()
                .unwrap_or_else(|| res.status_code.to_string()),
            message: response.get_error_message(),
            reason: Some(res.body_text()),
            attempt_status: None,
            connector_transaction_id: response.get_connector_transaction_id(),
            standard_code: Some(response.standard_code(res.status_code)),
        })
    }

    fn scrub_rules(&self) -> &'static [ScrubRule] {
        &[
            ScrubRule::Header("Authorization"),
            ScrubRule::JsonField("card_number"),
            ScrubRule::JsonField("card_cvv"),
            ScrubRule::JsonField("bank_account"),
        ]
    }
}

impl connector_types::ValidationTrait for Stax {
    fn should_create_connector_customer(&self) -> bool {
        true
    }

    fn should_do_payment_method_token(&self) -> bool {
        true
    }

    fn store_method(&self) -> StoreMethod {
        StoreMethod::Tokenize
    }
}

impl connector_types::ConnectorServiceTrait for Stax {}
impl connector_types::PaymentAuthorizeV2 for Stax {}
impl connector_types::PaymentCapture for Stax {}
impl connector_types::PaymentVoidV2 for Stax {}
impl connector_types::RefundV2 for Stax {}
impl connector_types::PaymentSessionToken for Stax {}
impl connector_types::PaymentTokenV2 for Stax {}
impl connector_types::CreateConnectorCustomer for Stax {}

impl
    ConnectorIntegrationV2<
        CreateSessionToken,
        PaymentFlowData,
        SessionTokenRequestData,
        SessionTokenResponseData,
    > for Stax
{
}

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Stax,
    curl_request: Json(StaxCustomerRequest),
    curl_response: Json(StaxCustomerResponse),
    flow_name: CreateConnectorCustomer,
    resource_common_data: PaymentFlowData,
    flow_request: ConnectorCustomerData,
    flow_response: ConnectorCustomerResponse,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<CreateConnectorCustomer, PaymentFlowData, ConnectorCustomerData, ConnectorCustomerResponse>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!("{}customer", self.base_url(&req.resource_common_data.connectors)))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Stax,
    curl_request: Json(StaxTokenRequest),
    curl_response: Json(StaxTokenResponse),
    flow_name: PaymentMethodToken,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentMethodTokenizationData,
    flow_response: PaymentMethodTokenResponse,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<PaymentMethodToken, PaymentFlowData, PaymentMethodTokenizationData, PaymentMethodTokenResponse>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!("{}payment-method/", self.base_url(&req.resource_common_data.connectors)))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Stax,
    curl_request: Json(StaxAuthorizeRequest),
    curl_response: Json(StaxAuthorizeResponse),
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
            Ok(format!("{}charge", self.base_url(&req.resource_common_data.connectors)))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Stax,
    curl_request: Json(StaxCaptureRequest),
    curl_response: Json(StaxCaptureResponse),
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
            Ok(self.transaction_url(
                &req.resource_common_data.connectors,
                &req.request.connector_transaction_id,
                "capture",
            ))
        }
    }
);

// void has no body
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Stax,
    curl_response: Json(StaxVoidResponse),
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
            Ok(self.transaction_url(
                &req.resource_common_data.connectors,
                &req.request.connector_transaction_id,
                "void",
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Stax,
    curl_request: Json(StaxRefundRequest),
    curl_response: Json(StaxRefundResponse),
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
            Ok(self.transaction_url(
                &req.resource_common_data.connectors,
                &req.request.connector_transaction_id,
                "refund",
            ))
        }
    }
);
