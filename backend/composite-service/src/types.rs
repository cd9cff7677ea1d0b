use common_enums::Currency;
use domain_types::{
    router_data::Address,
    types::{Connectors, Proxy},
};
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};

/// Everything a [`Gateway`](crate::Gateway) needs besides the credentials.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub connectors: Connectors,
    pub proxy: Proxy,
    /// Marks every response as a test transaction
    pub test_mode: bool,
    /// Capture the raw wire conversation on every response
    pub record_transcripts: bool,
}

/// Optional details sent along with an operation. Each processor picks the ones it
/// understands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentOptions {
    pub order_id: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub customer_name: Option<Secret<String>>,
    pub billing_address: Option<Address>,
    pub currency: Option<Currency>,
    pub ip: Option<String>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl PaymentOptions {
    pub fn currency(&self) -> Currency {
        self.currency.unwrap_or_default()
    }

    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub(crate) fn metadata_value(&self) -> Option<serde_json::Value> {
        (!self.metadata.is_empty()).then(|| serde_json::Value::Object(self.metadata.clone()))
    }
}
