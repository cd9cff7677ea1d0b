use std::{str::FromStr, time::Duration};

use common_utils::{
    errors::CustomResult,
    request::{Headers, Method, Request, RequestContent},
};
use domain_types::{
    connector_types::RawConnectorResponse,
    errors::{ApiClientError, ConnectorError},
    router_data_v2::RouterDataV2,
    router_response_types::Response,
    types::Proxy,
};
use error_stack::{report, ResultExt};
use hyperswitch_masking::{ErasedMaskSerialize, ExposeInterface, Maskable, PeekInterface};
use interfaces::connector_integration_v2::BoxedConnectorIntegrationV2;
use once_cell::sync::OnceCell;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::field::Empty;

use crate::{shared_metrics as metrics, transcript::Transcript};

/// Sends one flow's request to the processor and folds the reply back into the router data.
///
/// 2xx replies go to the flow's response handler, 5xx replies become a status-named error and
/// every other reply goes through the connector's error parser. A processor decline is
/// therefore `Ok` with `router_data.response` set to `Err`. Only transport and encoding
/// failures surface as `Err`.
#[tracing::instrument(
    name = "execute_connector_processing_step",
    skip_all,
    fields(
        request.headers = Empty,
        request.body = Empty,
        request.url = Empty,
        request.method = Empty,
        response.body = Empty,
        response.headers = Empty,
        response.error_message = Empty,
        response.status_code = Empty,
        message_ = "Golden Log Line (outgoing)",
        latency = Empty,
    )
)]
pub async fn execute_connector_processing_step<F, ResourceCommonData, Req, Resp>(
    proxy: &Proxy,
    connector: BoxedConnectorIntegrationV2<'_, F, ResourceCommonData, Req, Resp>,
    router_data: RouterDataV2<F, ResourceCommonData, Req, Resp>,
    connector_name: &str,
    transcript: Option<&mut Transcript>,
) -> CustomResult<RouterDataV2<F, ResourceCommonData, Req, Resp>, ConnectorError>
where
    F: 'static,
    ResourceCommonData: RawConnectorResponse + 'static,
    Req: 'static,
    Resp: 'static,
{
    let start = tokio::time::Instant::now();
    let connector_request = connector.build_request_v2(&router_data)?;

    let Some(request) = connector_request else {
        return Ok(router_data);
    };

    let masked_headers = request
        .headers
        .iter()
        .fold(serde_json::Map::new(), |mut acc, (k, v)| {
            let value = match v {
                Maskable::Masked(_) => Value::String("*** alloc::string::String ***".to_string()),
                Maskable::Normal(iv) => Value::String(iv.to_owned()),
            };
            acc.insert(k.clone(), value);
            acc
        });
    let headers_for_logging = Value::Object(masked_headers);
    tracing::Span::current().record(
        "request.headers",
        tracing::field::display(&headers_for_logging),
    );

    let masked_request = request
        .body
        .as_ref()
        .map(RequestContent::masked_value)
        .unwrap_or(Value::Null);
    tracing::info!(request=?masked_request, "request of connector");
    tracing::Span::current().record("request.body", tracing::field::display(&masked_request));

    let mut transcript = transcript;
    if let Some(transcript) = transcript.as_deref_mut() {
        let body = request
            .body
            .as_ref()
            .map(RequestContent::get_inner_value)
            .transpose()
            .change_context(ConnectorError::RequestEncodingFailed)?;
        transcript.record_request(&request, body.as_ref().map(|body| body.peek().as_str()));
    }

    let url = request.url.clone();
    let method = request.method;
    metrics::EXTERNAL_SERVICE_TOTAL_API_CALLS
        .with_label_values(&[&method.to_string(), connector_name])
        .inc();
    tracing::Span::current().record("request.url", tracing::field::display(&url));
    tracing::Span::current().record("request.method", tracing::field::display(method));

    let external_service_start_latency = tokio::time::Instant::now();
    let response = call_connector_api(proxy, request).await;
    metrics::EXTERNAL_SERVICE_API_CALLS_LATENCY
        .with_label_values(&[&method.to_string(), connector_name])
        .observe(external_service_start_latency.elapsed().as_secs_f64());

    let result = match response {
        Ok(body) => {
            let body = match body {
                Ok(body) | Err(body) => body,
            };
            if let Some(transcript) = transcript.as_deref_mut() {
                transcript.record_response(&body);
            }
            tracing::Span::current().record(
                "response.status_code",
                tracing::field::display(body.status_code),
            );
            record_response_headers(&body);
            if let Ok(parsed) = parse_json_with_bom_handling(&body.response) {
                tracing::Span::current().record(
                    "response.body",
                    tracing::field::display(parsed.masked_serialize().unwrap_or(
                        json!({ "error": "failed to mask serialize connector response"}),
                    )),
                );
            }

            let mut updated_router_data = router_data;
            updated_router_data
                .resource_common_data
                .set_raw_connector_response(strip_bom_and_convert_to_string(&body.response));
            updated_router_data
                .resource_common_data
                .set_connector_http_status_code(body.status_code);

            match body.status_code {
                200..=299 | 302 => connector.handle_response_v2(&updated_router_data, body),
                status_code => {
                    metrics::EXTERNAL_SERVICE_API_CALLS_ERRORS
                        .with_label_values(&[
                            &method.to_string(),
                            connector_name,
                            status_code.to_string().as_str(),
                        ])
                        .inc();
                    let error = match status_code {
                        500..=511 => connector.get_5xx_error_response(body)?,
                        _ => connector.get_error_response_v2(body)?,
                    };
                    tracing::Span::current().record(
                        "response.error_message",
                        tracing::field::display(&error.message),
                    );
                    updated_router_data.response = Err(error);
                    Ok(updated_router_data)
                }
            }
        }
        Err(err) => {
            if let Some(transcript) = transcript.as_deref_mut() {
                transcript.record_failure(&err.current_context().to_string());
            }
            info_log(
                "NETWORK_ERROR",
                &json!(format!(
                    "Failed getting response from connector. Error: {:?}",
                    err
                )),
            );
            Err(err.change_context(ConnectorError::ProcessingStepFailed(None)))
        }
    };

    tracing::Span::current().record("latency", start.elapsed().as_millis());
    tracing::info!(tag = ?Tag::OutgoingApi, log_type = "api", "Outgoing Request completed");
    result
}

fn record_response_headers(body: &Response) {
    let headers = body.headers.clone().unwrap_or_default();
    let map = headers
        .iter()
        .fold(serde_json::Map::new(), |mut acc, (left, right)| {
            let header_value = if right.is_sensitive() {
                Value::String("*** alloc::string::String ***".to_string())
            } else if let Ok(x) = right.to_str() {
                Value::String(x.to_string())
            } else {
                return acc;
            };
            acc.insert(left.as_str().to_string(), header_value);
            acc
        });
    tracing::Span::current().record("response.headers", tracing::field::display(Value::Object(map)));
}

pub async fn call_connector_api(
    proxy: &Proxy,
    request: Request,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let url =
        reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;

    let should_bypass_proxy = proxy.bypass_proxy_urls.contains(&url.to_string());

    let client = get_base_client(proxy, should_bypass_proxy)?;

    let has_content_type = request
        .headers
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case(reqwest::header::CONTENT_TYPE.as_str()));
    let content_type = request
        .body
        .as_ref()
        .and_then(RequestContent::content_type)
        .filter(|_| !has_content_type);
    let body = request
        .body
        .as_ref()
        .map(RequestContent::get_inner_value)
        .transpose()
        .change_context(ApiClientError::UrlEncodingFailed)?;

    let headers = request.headers.construct_header_map()?;

    let request = match request.method {
        Method::Get => client.get(url),
        Method::Post => client.post(url),
        Method::Put => client.put(url),
        Method::Delete => client.delete(url),
        Method::Patch => client.patch(url),
    };
    let request = match (body, content_type) {
        (Some(body), Some(content_type)) => request
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body.expose()),
        (Some(body), None) => request.body(body.expose()),
        (None, _) => request,
    }
    .add_headers(headers);

    let response = request.send().await.map_err(|error| {
        let api_error = match error {
            error if error.is_timeout() => ApiClientError::RequestTimeoutReceived,
            _ => ApiClientError::RequestNotSent(error.to_string()),
        };
        info_log(
            "REQUEST_FAILURE",
            &json!(format!("Unable to send request to connector.",)),
        );
        report!(api_error)
    });

    handle_response(response).await
}

static NON_PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();
static PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();

fn get_base_client(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<Client, ApiClientError> {
    Ok(if proxy_config.is_proxy_configured(should_bypass_proxy) {
        &PROXIED_CLIENT
    } else {
        &NON_PROXIED_CLIENT
    }
    .get_or_try_init(|| {
        get_client_builder(proxy_config, should_bypass_proxy)?
            .build()
            .change_context(ApiClientError::ClientConstructionFailed)
            .inspect_err(|err| {
                info_log(
                    "ERROR",
                    &json!(format!("Failed to construct base client. Error: {:?}", err)),
                );
            })
    })?
    .clone())
}

fn get_client_builder(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_idle_timeout(Duration::from_secs(
            proxy_config
                .idle_pool_connection_timeout
                .unwrap_or_default(),
        ));

    if let Some(timeout) = proxy_config.request_timeout {
        client_builder = client_builder.timeout(Duration::from_secs(timeout));
    }

    if should_bypass_proxy {
        return Ok(client_builder);
    }

    // Proxy all HTTPS traffic through the configured HTTPS proxy
    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTPS proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    // Proxy all HTTP traffic through the configured HTTP proxy
    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTP proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    Ok(client_builder)
}

async fn handle_response(
    response: CustomResult<reqwest::Response, ApiClientError>,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let resp = response?;
    let status_code = resp.status().as_u16();
    let headers = Some(resp.headers().to_owned());
    match status_code {
        200..=202 | 204 | 302 => {
            let response = resp
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;
            Ok(Ok(Response {
                headers,
                response,
                status_code,
            }))
        }
        400..=599 => {
            let response = resp
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;
            Ok(Err(Response {
                headers,
                response,
                status_code,
            }))
        }
        _ => {
            info_log(
                "UNEXPECTED_RESPONSE",
                &json!("Unexpected response from server."),
            );
            Err(report!(ApiClientError::UnexpectedServerResponse))
        }
    }
}

/// Helper function to remove BOM from response bytes and convert to string
fn strip_bom_and_convert_to_string(response_bytes: &[u8]) -> Option<String> {
    String::from_utf8(response_bytes.to_vec())
        .ok()
        .map(|s| s.trim_start_matches('\u{FEFF}').to_string())
}

/// Helper function to parse JSON from response bytes with BOM handling
fn parse_json_with_bom_handling(response_bytes: &[u8]) -> Result<Value, serde_json::Error> {
    let cleaned_response = response_bytes
        .strip_prefix(&[0xEF, 0xBB, 0xBF])
        .unwrap_or(response_bytes);
    serde_json::from_slice::<Value>(cleaned_response)
}

pub(super) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                let header_value = header_value.into_inner();
                let header_value = HeaderValue::from_str(&header_value)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}

pub(super) trait RequestBuilderExt {
    fn add_headers(self, headers: reqwest::header::HeaderMap) -> Self;
}

impl RequestBuilderExt for reqwest::RequestBuilder {
    fn add_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self = self.headers(headers);
        self
    }
}

#[derive(Debug, Default, Clone, strum::EnumString)]
pub enum Tag {
    /// General.
    #[default]
    General,
    /// Api Outgoing Request
    OutgoingApi,
}

#[inline]
pub fn info_log(action: &str, message: &Value) {
    tracing::info!(tags = %action, json_value= %message);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use common_utils::request::RequestBuilder;
    use pretty_assertions::assert_eq;
    use wiremock::{
        matchers::{body_string, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    #[tokio::test]
    async fn form_body_is_sent_with_its_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/transact.php"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("type=sale&amount=1.00"))
            .respond_with(ResponseTemplate::new(200).set_body_string("response=1"))
            .mount(&server)
            .await;

        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&format!("{}/api/transact.php", server.uri()))
            .set_body(RequestContent::FormUrlEncoded(Box::new(vec![
                ("type", "sale"),
                ("amount", "1.00"),
            ])))
            .build();

        let response = call_connector_api(&Proxy::default(), request)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body_text(), "response=1");
    }

    #[tokio::test]
    async fn client_errors_are_returned_as_error_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(422).set_body_string("{\"error\":\"bad\"}"))
            .mount(&server)
            .await;

        let request = RequestBuilder::new()
            .method(Method::Get)
            .url(&server.uri())
            .build();
        let response = call_connector_api(&Proxy::default(), request).await.unwrap();
        let error = response.unwrap_err();
        assert_eq!(error.status_code, 422);
    }

    #[tokio::test]
    async fn unparseable_url_is_rejected() {
        let request = RequestBuilder::new().url("not a url").build();
        let error = call_connector_api(&Proxy::default(), request)
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &ApiClientError::UrlEncodingFailed);
    }

    #[test]
    fn bom_is_ignored_when_parsing() {
        let parsed = parse_json_with_bom_handling(b"\xEF\xBB\xBF{\"a\":1}").unwrap();
        assert_eq!(parsed, json!({"a": 1}));
        assert_eq!(
            strip_bom_and_convert_to_string("\u{FEFF}ok".as_bytes()).as_deref(),
            Some("ok")
        );
    }
}
