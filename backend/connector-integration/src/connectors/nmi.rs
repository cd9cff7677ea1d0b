pub mod transformers;

#[cfg(test)]
mod test;

use common_enums::{AttemptStatus, CurrencyUnit};
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
    router_data::ErrorResponse,
    router_data_v2::RouterDataV2,
    router_response_types::Response,
    types::Connectors,
};
use hyperswitch_masking::Maskable;
use interfaces::{
    api::ConnectorCommon,
    connector_integration_v2::ConnectorIntegrationV2,
    connector_types::{self, StoreMethod},
};

use self::transformers::{
    NmiCaptureRequest, NmiCaptureResponse, NmiPaymentsRequest, NmiPaymentsResponse,
    NmiRefundRequest, NmiRefundResponse, NmiVaultRequest, NmiVaultResponse, NmiVoidRequest,
    NmiVoidResponse, StandardResponse,
};
use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
}

const TRANSACT_PATH: &str = "api/transact.php";

#[derive(Debug, Clone)]
pub struct Nmi;

impl Nmi {
    pub const fn new() -> &'static Self {
        &Self
    }

    pub fn build_headers<F, FCD, Req, Res>(
        &self,
        _req: &RouterDataV2<F, FCD, Req, Res>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        // the security key travels in the body
        Ok(vec![(
            headers::CONTENT_TYPE.to_string(),
            self.common_get_content_type().to_string().into(),
        )])
    }

    fn transact_url(&self, connectors: &Connectors) -> String {
        format!("{}{TRANSACT_PATH}", self.base_url(connectors))
    }
}

impl ConnectorCommon for Nmi {
    fn id(&self) -> &'static str {
        "nmi"
    }

    fn get_currency_unit(&self) -> CurrencyUnit {
        CurrencyUnit::Base
    }

    fn common_get_content_type(&self) -> &'static str {
        "application/x-www-form-urlencoded"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.nmi.base_url.as_ref()
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let response: StandardResponse =
            match macros::ResponseFormat::FormUrlEncoded.parse(&res.response, "StandardResponse") {
                Ok(response) => response,
                Err(_) => return utils::handle_json_response_deserialization_failure(res, "nmi"),
            };

        Ok(response.error_response(res.status_code, Some(AttemptStatus::Failure)))
    }

    fn scrub_rules(&self) -> &'static [ScrubRule] {
        &[
            ScrubRule::FormField("security_key"),
            ScrubRule::FormField("ccnumber"),
            ScrubRule::FormField("cvv"),
            ScrubRule::FormField("checkaccount"),
            ScrubRule::FormField("checkaba"),
        ]
    }
}

impl connector_types::ValidationTrait for Nmi {
    fn store_method(&self) -> StoreMethod {
        StoreMethod::Tokenize
    }
}

impl connector_types::ConnectorServiceTrait for Nmi {}
impl connector_types::PaymentAuthorizeV2 for Nmi {}
impl connector_types::PaymentCapture for Nmi {}
impl connector_types::PaymentVoidV2 for Nmi {}
impl connector_types::RefundV2 for Nmi {}
impl connector_types::PaymentSessionToken for Nmi {}
impl connector_types::PaymentTokenV2 for Nmi {}
impl connector_types::CreateConnectorCustomer for Nmi {}

impl
    ConnectorIntegrationV2<
        CreateSessionToken,
        PaymentFlowData,
        SessionTokenRequestData,
        SessionTokenResponseData,
    > for Nmi
{
}

impl
    ConnectorIntegrationV2<
        CreateConnectorCustomer,
        PaymentFlowData,
        ConnectorCustomerData,
        ConnectorCustomerResponse,
    > for Nmi
{
}

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiPaymentsRequest),
    curl_response: FormUrlEncoded(NmiPaymentsResponse),
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
            Ok(self.transact_url(&req.resource_common_data.connectors))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiCaptureRequest),
    curl_response: FormUrlEncoded(NmiCaptureResponse),
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
            Ok(self.transact_url(&req.resource_common_data.connectors))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiVoidRequest),
    curl_response: FormUrlEncoded(NmiVoidResponse),
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
            Ok(self.transact_url(&req.resource_common_data.connectors))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiRefundRequest),
    curl_response: FormUrlEncoded(NmiRefundResponse),
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
            Ok(self.transact_url(&req.resource_common_data.connectors))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiVaultRequest),
    curl_response: FormUrlEncoded(NmiVaultResponse),
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
            Ok(self.transact_url(&req.resource_common_data.connectors))
        }
    }
);
