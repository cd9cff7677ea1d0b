pub mod transformers;

#[cfg(test)]
mod test;

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
use error_stack::ResultExt;
use hyperswitch_masking::{Mask, Maskable, PeekInterface};
use interfaces::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2, connector_types,
};

use self::transformers::{
    SquareAuthType, SquareCaptureResponse, SquareErrorResponse, SquarePaymentsRequest,
    SquarePaymentsResponse, SquareRefundRequest, SquareRefundResponse, SquareSessionResponse,
    SquareTokenRequest, SquareTokenResponse, SquareVoidResponse,
};
use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const AUTHORIZATION: &str = "Authorization";
}

#[derive(Debug, Clone)]
pub struct Square;

impl Square {
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

    /// The browser-facing endpoints (hydrate and card-nonce) take no bearer token.
    fn build_public_headers(&self) -> Vec<(String, Maskable<String>)> {
        vec![(
            headers::CONTENT_TYPE.to_string(),
            self.common_get_content_type().to_string().into(),
        )]
    }

    fn secondary_base_url<'a>(
        &self,
        connectors: &'a Connectors,
    ) -> CustomResult<&'a str, errors::ConnectorError> {
        connectors
            .square
            .secondary_base_url
            .as_deref()
            .ok_or(errors::ConnectorError::FailedToObtainIntegrationUrl.into())
    }
}

impl ConnectorCommon for Square {
    fn id(&self) -> &'static str {
        "square"
    }

    fn get_currency_unit(&self) -> CurrencyUnit {
        CurrencyUnit::Minor
    }

    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.square.base_url.as_ref()
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let auth = SquareAuthType::try_from(auth_type)
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
        let response: SquareErrorResponse =
            match macros::ResponseFormat::Json.parse(&res.response, "SquareErrorResponse") {
                Ok(response) => response,
                Err(_) => return utils::handle_json_response_deserialization_failure(res, "square"),
            };

        let reason = response
            .errors
            .iter()
            .filter_map(|error| error.detail.clone())
            .collect::<Vec<_>>()
            .join(" ");
        let first = response.errors.first();

        Ok(ErrorResponse {
            status_code: res.status_code,
            code: first
                .and_then(|error| error.code.clone())
                .unwrap_or(consts::NO_ERROR_CODE.to_string()),
            message: first
                .and_then(|error| error.detail.clone().or_else(|| error.category.clone()))
                .unwrap_or(consts::NO_ERROR_MESSAGE.to_string()),
            reason: Some(reason),
            attempt_status: Some(AttemptStatus::Failure),
            connector_transaction_id: None,
            standard_code: first
                .and_then(|error| error.code.as_deref())
                .map(|code| transformers::standard_error_code(code, res.status_code)),
        })
    }

    fn scrub_rules(&self) -> &'static [ScrubRule] {
        &[
            ScrubRule::Header("Authorization"),
            ScrubRule::JsonField("number"),
            ScrubRule::JsonField("cvv"),
        ]
    }
}

impl connector_types::ValidationTrait for Square {
    fn should_do_session_token(&self) -> bool {
        true
    }

    fn should_do_payment_method_token(&self) -> bool {
        true
    }
}

impl connector_types::ConnectorServiceTrait for Square {}
impl connector_types::PaymentAuthorizeV2 for Square {}
impl connector_types::PaymentCapture for Square {}
impl connector_types::PaymentVoidV2 for Square {}
impl connector_types::RefundV2 for Square {}
impl connector_types::PaymentSessionToken for Square {}
impl connector_types::PaymentTokenV2 for Square {}
impl connector_types::CreateConnectorCustomer for Square {}

impl
    ConnectorIntegrationV2<
        CreateConnectorCustomer,
        PaymentFlowData,
        ConnectorCustomerData,
        ConnectorCustomerResponse,
    > for Square
{
}

macros::macro_connector_implementation!(
    connector_default_implementations: [get_content_type, get_error_response_v2],
    connector: Square,
    curl_response: Json(SquareSessionResponse),
    flow_name: CreateSessionToken,
    resource_common_data: PaymentFlowData,
    flow_request: SessionTokenRequestData,
    flow_response: SessionTokenResponseData,
    http_method: Get,
    other_functions: {
        fn get_headers(
            &self,
            _req: &RouterDataV2<CreateSessionToken, PaymentFlowData, SessionTokenRequestData, SessionTokenResponseData>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            Ok(self.build_public_headers())
        }

        fn get_url(
            &self,
            req: &RouterDataV2<CreateSessionToken, PaymentFlowData, SessionTokenRequestData, SessionTokenResponseData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            let auth = SquareAuthType::try_from(&req.connector_auth_type)
                .change_context(errors::ConnectorError::FailedToObtainAuthType)?;
            Ok(format!(
                "{}payments/hydrate?applicationId={}",
                self.secondary_base_url(&req.resource_common_data.connectors)?,
                auth.key1.peek()
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_content_type, get_error_response_v2],
    connector: Square,
    curl_request: Json(SquareTokenRequest),
    curl_response: Json(SquareTokenResponse),
    flow_name: PaymentMethodToken,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentMethodTokenizationData,
    flow_response: PaymentMethodTokenResponse,
    http_method: Post,
    other_functions: {
        fn get_headers(
            &self,
            _req: &RouterDataV2<PaymentMethodToken, PaymentFlowData, PaymentMethodTokenizationData, PaymentMethodTokenResponse>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            Ok(self.build_public_headers())
        }

        fn get_url(
            &self,
            req: &RouterDataV2<PaymentMethodToken, PaymentFlowData, PaymentMethodTokenizationData, PaymentMethodTokenResponse>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!(
                "{}v2/card-nonce",
                self.secondary_base_url(&req.resource_common_data.connectors)?
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Square,
    curl_request: Json(SquarePaymentsRequest),
    curl_response: Json(SquarePaymentsResponse),
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
            Ok(format!("{}v2/payments", self.base_url(&req.resource_common_data.connectors)))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Square,
    curl_response: Json(SquareCaptureResponse),
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
            Ok(format!(
                "{}v2/payments/{}/complete",
                self.base_url(&req.resource_common_data.connectors),
                req.request.connector_transaction_id,
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Square,
    curl_response: Json(SquareVoidResponse),
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
            Ok(format!(
                "{}v2/payments/{}/cancel",
                self.base_url(&req.resource_common_data.connectors),
                req.request.connector_transaction_id,
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response_v2],
    connector: Square,
    curl_request: Json(SquareRefundRequest),
    curl_response: Json(SquareRefundResponse),
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
            Ok(format!("{}v2/refunds", self.base_url(&req.resource_common_data.connectors)))
        }
    }
);
