pub mod transformers;

#[cfg(test)]
mod test;

use common_enums::{Currency, CurrencyUnit};
use common_utils::{errors::CustomResult, scrubber::ScrubRule, MinorUnit};
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
    gateway_response::AuthorizationToken,
    router_data::{ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
    router_response_types::Response,
    types::Connectors,
};
use hyperswitch_masking::{Mask, Maskable};
use interfaces::{
    api::ConnectorCommon,
    connector_integration_v2::ConnectorIntegrationV2,
    connector_types::{self, StoreMethod},
};

use self::transformers::{
    AdyenAuthType, AdyenCaptureRequest, AdyenCaptureResponse, AdyenErrorResponse,
    AdyenPaymentRequest, AdyenPaymentResponse, AdyenRefundRequest, AdyenRefundResponse,
    AdyenVoidRequest, AdyenVoidResponse,
};
use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const X_API_KEY: &str = "X-API-Key";
}

const ADYEN_API_VERSION: &str = "v68";

#[derive(Debug, Clone)]
pub struct Adyen;

impl Adyen {
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
        let mut api_key = self.get_auth_header(&req.connector_auth_type)?;
        header.append(&mut api_key);
        Ok(header)
    }

    /// Modifications address the original payment by its `pspReference`, the first part of the
    /// authorization.
    fn modification_url(
        &self,
        connectors: &Connectors,
        authorization: &str,
        modification: &str,
    ) -> String {
        format!(
            "{}{ADYEN_API_VERSION}/payments/{}/{modification}",
            self.base_url(connectors),
            AuthorizationToken::parse(authorization).first()
        )
    }
}

impl ConnectorCommon for Adyen {
    fn id(&self) -> &'static str {
        "adyen"
    }

    fn get_currency_unit(&self) -> CurrencyUnit {
        CurrencyUnit::Minor
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let auth = AdyenAuthType::try_from(auth_type)
            .map_err(|_| errors::ConnectorError::FailedToObtainAuthType)?;
        Ok(vec![(
            headers::X_API_KEY.to_string(),
            auth.api_key.into_masked(),
        )])
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.adyen.base_url.as_ref()
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let response: AdyenErrorResponse =
            match macros::ResponseFormat::Json.parse(&res.response, "AdyenErrorResponse") {
                Ok(response) => response,
                Err(_) => return utils::handle_json_response_deserialization_failure(res, "adyen"),
            };

        tracing::info!(
            error_type = %response.error_type,
            status = response.status,
            "adyen rejected the request"
        );

        Ok(ErrorResponse {
            status_code: res.status_code,
            standard_code: Some(response.standard_code(res.status_code)),
            code: response.error_code,
            message: response.message.to_owned(),
            reason: Some(response.message),
            attempt_status: None,
            connector_transaction_id: response.psp_reference,
        })
    }

    fn scrub_rules(&self) -> &'static [ScrubRule] {
        &[
            ScrubRule::Header("X-API-Key"),
            ScrubRule::JsonField("number"),
            ScrubRule::JsonField("cvc"),
            ScrubRule::JsonField("encryptedCardNumber"),
            ScrubRule::JsonField("encryptedSecurityCode"),
        ]
    }
}

impl connector_types::ValidationTrait for Adyen {
    // zero-value authorisations are supported for card checks
    fn verify_amount(&self, _currency: Currency) -> MinorUnit {
        MinorUnit::new(0)
    }

    fn store_method(&self) -> StoreMethod {
        StoreMethod::AuthorizeAndVoid
    }
}

impl connector_types::ConnectorServiceTrait for Adyen {}
impl connector_types::PaymentAuthorizeV2 for Adyen {}
impl connector_types::PaymentCapture for Adyen {}
impl connector_types::PaymentVoidV2 for Adyen {}
impl connector_types::RefundV2 for Adyen {}
impl connector_types::PaymentSessionToken for Adyen {}
impl connector_types::PaymentTokenV2 for Adyen {}
impl connector_types::CreateConnectorCustomer for Adyen {}

impl
    ConnectorIntegrationV2<
        CreateSessionToken,
        PaymentFlowData,
        SessionTokenRequestData,
        SessionTokenResponseData,
    > for Adyen
{
}

impl
    ConnectorIntegrationV2<
        PaymentMethodToken,
        PaymentFlowData,
        PaymentMethodTokenizationData,
        PaymentMethodTokenResponse,
    > for Adyen
{
}

impl
    ConnectorIntegrationV2<
        CreateConnectorCustomer,
        PaymentFlowData,
        ConnectorCustomerData,
        ConnectorCustomerResponse,
    > for Adyen
{
}

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Adyen,
    curl_request: Json(AdyenPaymentRequest),
    curl_response: Json(AdyenPaymentResponse),
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
            Ok(format!(
                "{}{ADYEN_API_VERSION}/payments",
                self.base_url(&req.resource_common_data.connectors)
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Adyen,
    curl_request: Json(AdyenCaptureRequest),
    curl_response: Json(AdyenCaptureResponse),
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
            Ok(self.modification_url(
                &req.resource_common_data.connectors,
                &req.request.connector_transaction_id,
                "captures",
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Adyen,
    curl_request: Json(AdyenVoidRequest),
    curl_response: Json(AdyenVoidResponse),
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
            Ok(self.modification_url(
                &req.resource_common_data.connectors,
                &req.request.connector_transaction_id,
                "cancels",
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Adyen,
    curl_request: Json(AdyenRefundRequest),
    curl_response: Json(AdyenRefundResponse),
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
            Ok(self.modification_url(
                &req.resource_common_data.connectors,
                &req.request.connector_transaction_id,
                "refunds",
            ))
        }
    }
);
