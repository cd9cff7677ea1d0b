use hyperswitch_masking::{ErasedMaskSerialize, Maskable, Secret};
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, ParsingError};

pub type Headers = std::collections::HashSet<(String, Maskable<String>)>;

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

fn default_request_headers() -> [(String, Maskable<String>); 1] {
    use http::header;

    [(header::VIA.to_string(), "payment-gateways".to_string().into())]
}

#[derive(Debug)]
pub struct Request {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

impl std::fmt::Debug for RequestContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Json(_) => "JsonRequestBody",
            Self::FormUrlEncoded(_) => "FormUrlEncodedRequestBody",
            Self::Xml(_) => "XmlRequestBody",
            Self::RawBytes(_) => "RawBytesRequestBody",
        })
    }
}

/// Body of an outgoing request. Structured bodies stay typed until they hit the wire so
/// that logging can go through the masked serializer instead of the raw bytes.
pub enum RequestContent {
    Json(Box<dyn ErasedMaskSerialize + Send>),
    FormUrlEncoded(Box<dyn ErasedMaskSerialize + Send>),
    Xml(Box<dyn ErasedMaskSerialize + Send>),
    /// Preformatted payloads such as SOAP envelopes or XML with a DOCTYPE header.
    RawBytes(Vec<u8>),
}

impl RequestContent {
    /// Serializes the body exactly as it will be sent.
    pub fn get_inner_value(&self) -> CustomResult<Secret<String>, ParsingError> {
        use error_stack::ResultExt;

        let body = match self {
            Self::Json(i) => serde_json::to_string(&i)
                .change_context(ParsingError::EncodeError("json"))?,
            Self::FormUrlEncoded(i) => serde_urlencoded::to_string(i)
                .change_context(ParsingError::EncodeError("x-www-form-urlencoded"))?,
            Self::Xml(i) => {
                quick_xml::se::to_string(&i).change_context(ParsingError::EncodeError("xml"))?
            }
            Self::RawBytes(bytes) => String::from_utf8(bytes.clone())
                .change_context(ParsingError::EncodeError("utf-8"))?,
        };
        Ok(body.into())
    }

    /// The body with every `Secret` field replaced, for logs.
    pub fn masked_value(&self) -> serde_json::Value {
        match self {
            Self::Json(i) | Self::FormUrlEncoded(i) | Self::Xml(i) => i
                .masked_serialize()
                .unwrap_or(serde_json::json!({ "error": "failed to mask serialize connector request"})),
            Self::RawBytes(_) => serde_json::json!({ "request_type": "RAW_BYTES" }),
        }
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Json(_) => Some("application/json"),
            Self::FormUrlEncoded(_) => Some("application/x-www-form-urlencoded"),
            Self::Xml(_) => Some("application/xml"),
            Self::RawBytes(_) => None,
        }
    }
}

impl Request {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: String::from(url),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    pub fn set_body<T: Into<RequestContent>>(&mut self, body: T) {
        self.body.replace(body.into());
    }

    pub fn add_default_headers(&mut self) {
        self.headers.extend(default_request_headers());
    }

    pub fn add_header(&mut self, header: &str, value: Maskable<String>) {
        self.headers.insert((String::from(header), value));
    }
}

#[derive(Debug)]
pub struct RequestBuilder {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: String::with_capacity(1024),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.into();
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn attach_default_headers(mut self) -> Self {
        self.headers.extend(default_request_headers());
        self
    }

    pub fn header(mut self, header: &str, value: &str) -> Self {
        self.headers.insert((header.into(), value.into()));
        self
    }

    pub fn headers(mut self, headers: Vec<(String, Maskable<String>)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn set_optional_body<T: Into<RequestContent>>(mut self, body: Option<T>) -> Self {
        body.map(|body| self.body.replace(body.into()));
        self
    }

    pub fn set_body<T: Into<RequestContent>>(mut self, body: T) -> Self {
        self.body.replace(body.into());
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hyperswitch_masking::{PeekInterface, Secret};

    use super::*;

    #[derive(Serialize)]
    struct Sale {
        #[serde(rename = "type")]
        kind: &'static str,
        ccnumber: Secret<String>,
    }

    fn sale() -> Sale {
        Sale {
            kind: "sale",
            ccnumber: Secret::new("4111111111111111".to_string()),
        }
    }

    #[test]
    fn form_body_is_encoded_unmasked_on_the_wire() {
        let body = RequestContent::FormUrlEncoded(Box::new(sale()));
        assert_eq!(
            body.get_inner_value().unwrap().peek(),
            "type=sale&ccnumber=4111111111111111"
        );
    }

    #[test]
    fn masked_value_hides_secrets() {
        let body = RequestContent::Json(Box::new(sale()));
        let masked = body.masked_value().to_string();
        assert!(!masked.contains("4111111111111111"));
        assert!(masked.contains("sale"));
    }

    #[test]
    fn builder_collects_headers() {
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url("https://example.test/api")
            .attach_default_headers()
            .header("Content-Type", "application/json")
            .build();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.method.to_string(), "POST");
    }
}
