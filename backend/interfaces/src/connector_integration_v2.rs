//! Per-flow request building and response handling for a connector.

use common_utils::{
    errors::CustomResult,
    request::{Method, Request, RequestBuilder, RequestContent},
};
use domain_types::{
    errors, router_data::ErrorResponse, router_data_v2::RouterDataV2,
    router_response_types::Response,
};
use hyperswitch_masking::Maskable;

use crate::api::ConnectorCommon;

/// alias for Box of a type that implements trait ConnectorIntegrationV2
pub type BoxedConnectorIntegrationV2<'a, Flow, ResourceCommonData, Req, Resp> =
    Box<&'a (dyn ConnectorIntegrationV2<Flow, ResourceCommonData, Req, Resp> + Send + Sync)>;

/// trait with a function that returns BoxedConnectorIntegrationV2
pub trait ConnectorIntegrationAnyV2<Flow, ResourceCommonData, Req, Resp>:
    Send + Sync + 'static
{
    /// function what returns BoxedConnectorIntegrationV2
    fn get_connector_integration_v2(
        &self,
    ) -> BoxedConnectorIntegrationV2<'_, Flow, ResourceCommonData, Req, Resp>;
}

impl<S, Flow, ResourceCommonData, Req, Resp>
    ConnectorIntegrationAnyV2<Flow, ResourceCommonData, Req, Resp> for S
where
    S: ConnectorIntegrationV2<Flow, ResourceCommonData, Req, Resp> + Send + Sync,
{
    fn get_connector_integration_v2(
        &self,
    ) -> BoxedConnectorIntegrationV2<'_, Flow, ResourceCommonData, Req, Resp> {
        Box::new(self)
    }
}

/// The new connector integration trait with an additional ResourceCommonData generic parameter
pub trait ConnectorIntegrationV2<Flow, ResourceCommonData, Req, Resp>:
    ConnectorIntegrationAnyV2<Flow, ResourceCommonData, Req, Resp> + Sync + ConnectorCommon
{
    /// returns a vec of tuple of header key and value
    fn get_headers(
        &self,
        _req: &RouterDataV2<Flow, ResourceCommonData, Req, Resp>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        Ok(vec![])
    }

    /// returns content type
    fn get_content_type(&self) -> &'static str {
        mime::APPLICATION_JSON.essence_str()
    }

    /// primarily used when creating signature based on request method of payment flow
    fn get_http_method(&self) -> Method {
        Method::Post
    }

    /// returns url. A connector that does not override this does not support the flow.
    fn get_url(
        &self,
        _req: &RouterDataV2<Flow, ResourceCommonData, Req, Resp>,
    ) -> CustomResult<String, errors::ConnectorError> {
        Err(errors::ConnectorError::FlowNotSupported {
            flow: flow_name::<Flow>(),
            connector: self.id().to_string(),
        }
        .into())
    }

    /// returns request body
    fn get_request_body(
        &self,
        _req: &RouterDataV2<Flow, ResourceCommonData, Req, Resp>,
    ) -> CustomResult<Option<RequestContent>, errors::ConnectorError> {
        Ok(None)
    }

    /// builds the request and returns it
    fn build_request_v2(
        &self,
        req: &RouterDataV2<Flow, ResourceCommonData, Req, Resp>,
    ) -> CustomResult<Option<Request>, errors::ConnectorError> {
        Ok(Some(
            RequestBuilder::new()
                .method(self.get_http_method())
                .url(self.get_url(req)?.as_str())
                .attach_default_headers()
                .headers(self.get_headers(req)?)
                .set_optional_body(self.get_request_body(req)?)
                .build(),
        ))
    }

    /// accepts the raw api response and decodes it
    fn handle_response_v2(
        &self,
        _data: &RouterDataV2<Flow, ResourceCommonData, Req, Resp>,
        _res: Response,
    ) -> CustomResult<RouterDataV2<Flow, ResourceCommonData, Req, Resp>, errors::ConnectorError>
    {
        Err(errors::ConnectorError::NotImplemented(format!(
            "response handling for {} in {}",
            flow_name::<Flow>(),
            self.id()
        ))
        .into())
    }

    /// accepts the raw api error response and decodes it
    fn get_error_response_v2(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        self.build_error_response(res)
    }

    /// accepts the raw 5xx error response and decodes it
    fn get_5xx_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let error_message = match res.status_code {
            500 => "internal_server_error",
            501 => "not_implemented",
            502 => "bad_gateway",
            503 => "service_unavailable",
            504 => "gateway_timeout",
            505 => "http_version_not_supported",
            506 => "variant_also_negotiates",
            507 => "insufficient_storage",
            508 => "loop_detected",
            510 => "not_extended",
            511 => "network_authentication_required",
            _ => "unknown_error",
        };
        Ok(ErrorResponse {
            code: res.status_code.to_string(),
            message: error_message.to_string(),
            reason: String::from_utf8(res.response.to_vec()).ok(),
            status_code: res.status_code,
            attempt_status: None,
            connector_transaction_id: None,
            standard_code: Some(common_enums::StandardErrorCode::ProcessingError),
        })
    }
}

/// Last path segment of the flow marker type, e.g. `Authorize`.
pub fn flow_name<Flow>() -> String {
    let full = std::any::type_name::<Flow>();
    full.rsplit("::").next().unwrap_or(full).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use common_utils::consts;
    use domain_types::{
        connector_flow::{Authorize, Void},
        connector_types::{PaymentFlowData, PaymentVoidData, PaymentsResponseData},
        router_data::ConnectorAuthType,
        types::Connectors,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    struct Dummy;

    impl ConnectorCommon for Dummy {
        fn id(&self) -> &'static str {
            "dummy"
        }

        fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
            connectors.stax.base_url.as_ref()
        }
    }

    impl ConnectorIntegrationV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>
        for Dummy
    {
        fn get_url(
            &self,
            req: &RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!(
                "https://dummy.test/void/{}",
                req.request.connector_transaction_id
            ))
        }
    }

    fn void_data() -> RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData> {
        RouterDataV2::new(
            PaymentFlowData::new("order-1", Connectors::default()),
            ConnectorAuthType::NoKey,
            PaymentVoidData {
                connector_transaction_id: "txn_1".to_string(),
                cancellation_reason: None,
                amount: None,
                currency: None,
            },
        )
    }

    #[test]
    fn default_build_request_uses_url_and_method() {
        let request = Dummy.build_request_v2(&void_data()).unwrap().unwrap();
        assert_eq!(request.url, "https://dummy.test/void/txn_1");
        assert_eq!(request.method, Method::Post);
        assert!(request.body.is_none());
    }

    #[test]
    fn flow_name_is_last_segment() {
        assert_eq!(flow_name::<Authorize>(), "Authorize");
    }

    #[test]
    fn server_errors_are_named_by_status() {
        let integration: BoxedConnectorIntegrationV2<
            '_,
            Void,
            PaymentFlowData,
            PaymentVoidData,
            PaymentsResponseData,
        > = Dummy.get_connector_integration_v2();
        let error = integration
            .get_5xx_error_response(Response {
                headers: None,
                response: bytes::Bytes::from_static(b"upstream down"),
                status_code: 503,
            })
            .unwrap();
        assert_eq!(error.code, "503");
        assert_eq!(error.message, "service_unavailable");
        assert_eq!(error.reason.as_deref(), Some("upstream down"));
        assert_eq!(
            error.get_standard_code(),
            common_enums::StandardErrorCode::ProcessingError
        );

        let error = integration
            .get_error_response_v2(Response {
                headers: None,
                response: bytes::Bytes::new(),
                status_code: 400,
            })
            .unwrap();
        assert_eq!(error.message, consts::NO_ERROR_MESSAGE);
    }
}
