use common_utils::{errors::CustomResult, ext_traits::ByteSliceExt, request::RequestContent};
use domain_types::errors;
use error_stack::ResultExt;
use serde::de::DeserializeOwned;

/// How a connector encodes its replies.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ResponseFormat {
    Json,
    FormUrlEncoded,
    Xml,
}

impl ResponseFormat {
    pub(crate) fn parse<T: DeserializeOwned>(
        self,
        body: &[u8],
        type_name: &'static str,
    ) -> CustomResult<T, errors::ConnectorError> {
        let parsed = match self {
            // some connectors answer a void or capture with an empty body
            Self::Json if body.is_empty() => "{}".as_bytes().parse_struct(type_name),
            Self::Json => body.parse_struct(type_name),
            Self::FormUrlEncoded => body.parse_form(type_name),
            Self::Xml => body.parse_xml(type_name),
        };
        parsed.change_context(errors::ConnectorError::ResponseDeserializationFailed)
    }
}

/// Request bodies that are sent as a complete XML document, with a prolog written ahead of
/// the serialized root element.
pub(crate) trait XmlDocument: serde::Serialize {
    const PROLOG: &'static str;

    fn to_xml_document(&self) -> CustomResult<RequestContent, errors::ConnectorError> {
        let body = quick_xml::se::to_string(self)
            .change_context(errors::ConnectorError::RequestEncodingFailed)?;
        Ok(RequestContent::RawBytes(
            format!("{}{body}", Self::PROLOG).into_bytes(),
        ))
    }
}

macro_rules! expand_request_content {
    (Json, $connector_req: ident) => {
        common_utils::request::RequestContent::Json(Box::new($connector_req))
    };
    (FormUrlEncoded, $connector_req: ident) => {
        common_utils::request::RequestContent::FormUrlEncoded(Box::new($connector_req))
    };
    (Xml, $connector_req: ident) => {
        $crate::connectors::macros::XmlDocument::to_xml_document(&$connector_req)?
    };
}

macro_rules! expand_default_functions {
    (
        function: get_headers,
        flow_name: $flow: ident,
        resource_common_data: $resource_common_data: ty,
        flow_request: $request: ty,
        flow_response: $response: ty
    ) => {
        fn get_headers(
            &self,
            req: &domain_types::router_data_v2::RouterDataV2<
                $flow,
                $resource_common_data,
                $request,
                $response,
            >,
        ) -> common_utils::errors::CustomResult<
            Vec<(String, hyperswitch_masking::Maskable<String>)>,
            domain_types::errors::ConnectorError,
        > {
            self.build_headers(req)
        }
    };
    (
        function: get_content_type,
        flow_name: $flow: ident,
        resource_common_data: $resource_common_data: ty,
        flow_request: $request: ty,
        flow_response: $response: ty
    ) => {
        fn get_content_type(&self) -> &'static str {
            self.common_get_content_type()
        }
    };
    (
        function: get_error_response_v2,
        flow_name: $flow: ident,
        resource_common_data: $resource_common_data: ty,
        flow_request: $request: ty,
        flow_response: $response: ty
    ) => {
        fn get_error_response_v2(
            &self,
            res: domain_types::router_response_types::Response,
        ) -> common_utils::errors::CustomResult<
            domain_types::router_data::ErrorResponse,
            domain_types::errors::ConnectorError,
        > {
            self.build_error_response(res)
        }
    };
}

/// Implements `ConnectorIntegrationV2` for one flow of a connector.
///
/// The request body is built with `TryFrom<&RouterDataV2<..>>` on `curl_request` and the reply
/// is mapped back with `TryFrom<ResponseRouterData<curl_response, RouterDataV2<..>>>`. Flows
/// without a body leave `curl_request` out. Anything else the flow needs, at least `get_url`,
/// goes in `other_functions`.
macro_rules! macro_connector_implementation {
    (
        connector_default_implementations: [$($default_fn: ident),* $(,)?],
        connector: $connector: ident,
        $(curl_request: $request_format: ident($curl_req: ty),)?
        curl_response: $response_format: ident($curl_res: ty),
        flow_name: $flow: ident,
        resource_common_data: $resource_common_data: ty,
        flow_request: $request: ty,
        flow_response: $response: ty,
        http_method: $http_method: ident,
        other_functions: {
            $($function_def: tt)*
        }
    ) => {
        impl interfaces::connector_integration_v2::ConnectorIntegrationV2<
            $flow,
            $resource_common_data,
            $request,
            $response,
        > for $connector
        {
            fn get_http_method(&self) -> common_utils::request::Method {
                common_utils::request::Method::$http_method
            }

            $(
                fn get_request_body(
                    &self,
                    req: &domain_types::router_data_v2::RouterDataV2<
                        $flow,
                        $resource_common_data,
                        $request,
                        $response,
                    >,
                ) -> common_utils::errors::CustomResult<
                    Option<common_utils::request::RequestContent>,
                    domain_types::errors::ConnectorError,
                > {
                    let connector_req = <$curl_req>::try_from(req)?;
                    Ok(Some($crate::connectors::macros::expand_request_content!(
                        $request_format,
                        connector_req
                    )))
                }
            )?

            fn handle_response_v2(
                &self,
                data: &domain_types::router_data_v2::RouterDataV2<
                    $flow,
                    $resource_common_data,
                    $request,
                    $response,
                >,
                res: domain_types::router_response_types::Response,
            ) -> common_utils::errors::CustomResult<
                domain_types::router_data_v2::RouterDataV2<
                    $flow,
                    $resource_common_data,
                    $request,
                    $response,
                >,
                domain_types::errors::ConnectorError,
            > {
                let response: $curl_res = $crate::connectors::macros::ResponseFormat::$response_format
                    .parse(&res.response, stringify!($curl_res))?;
                tracing::debug!(connector = self.id(), flow = stringify!($flow), "connector response parsed");
                error_stack::ResultExt::change_context(
                    domain_types::router_data_v2::RouterDataV2::try_from(
                        $crate::types::ResponseRouterData {
                            response,
                            router_data: data.clone(),
                            http_code: res.status_code,
                        },
                    ),
                    domain_types::errors::ConnectorError::ResponseHandlingFailed,
                )
            }

            $(
                $crate::connectors::macros::expand_default_functions!(
                    function: $default_fn,
                    flow_name: $flow,
                    resource_common_data: $resource_common_data,
                    flow_request: $request,
                    flow_response: $response
                );
            )*

            $($function_def)*
        }
    };
}

pub(crate) use expand_default_functions;
pub(crate) use expand_request_content;
pub(crate) use macro_connector_implementation;
