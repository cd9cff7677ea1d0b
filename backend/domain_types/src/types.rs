use serde::{Deserialize, Serialize};

#[derive(Clone, Deserialize, Serialize, Debug, Default, PartialEq)]
pub struct Connectors {
    #[serde(default)]
    pub adyen: ConnectorParams,
    #[serde(default)]
    pub nmi: ConnectorParams,
    #[serde(default)]
    pub square: ConnectorParams,
    #[serde(default)]
    pub stax: ConnectorParams,
    #[serde(default)]
    pub worldpay: ConnectorParams,
}

#[derive(Clone, Deserialize, Serialize, Debug, Default, PartialEq)]
pub struct ConnectorParams {
    /// base url
    #[serde(default)]
    pub base_url: String,
    /// second host some processors split their API across, e.g. a tokenization endpoint
    #[serde(default)]
    pub secondary_base_url: Option<String>,
}

impl ConnectorParams {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            secondary_base_url: None,
        }
    }

    pub fn with_secondary_base_url(mut self, url: impl Into<String>) -> Self {
        self.secondary_base_url = Some(url.into());
        self
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    /// overall timeout for a single gateway call, in seconds
    pub request_timeout: Option<u64>,
    pub bypass_proxy_urls: Vec<String>,
}

impl Proxy {
    pub fn is_proxy_configured(&self, should_bypass_proxy: bool) -> bool {
        !should_bypass_proxy && (self.http_url.is_some() || self.https_url.is_some())
    }
}
