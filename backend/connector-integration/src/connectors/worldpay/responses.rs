use serde::Deserialize;

/// `paymentService/reply`, the root element itself is not named here.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldpayResponse {
    pub reply: WorldpayReply,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldpayReply {
    pub order_status: Option<WorldpayOrderStatus>,
    pub ok: Option<WorldpayOk>,
    pub error: Option<WorldpayError>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldpayOrderStatus {
    #[serde(rename = "@orderCode")]
    pub order_code: String,
    pub payment: Option<WorldpayPayment>,
    pub error: Option<WorldpayError>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldpayPayment {
    pub payment_method: Option<String>,
    pub last_event: String,
    #[serde(rename = "AuthorisationId")]
    pub authorisation_id: Option<WorldpayAuthorisationId>,
    #[serde(rename = "CVCResultCode")]
    pub cvc_result_code: Option<WorldpayResultCode>,
    #[serde(rename = "AVSResultCode")]
    pub avs_result_code: Option<WorldpayResultCode>,
    #[serde(rename = "ISO8583ReturnCode")]
    pub iso8583_return_code: Option<WorldpayReturnCode>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldpayAuthorisationId {
    #[serde(rename = "@id")]
    pub id: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldpayResultCode {
    #[serde(rename = "@description")]
    pub description: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldpayReturnCode {
    #[serde(rename = "@code")]
    pub code: String,
    #[serde(rename = "@description")]
    pub description: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldpayError {
    #[serde(rename = "@code")]
    pub code: String,
    #[serde(rename = "$text", default)]
    pub message: String,
}

/// Acknowledgement of an order modification.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldpayOk {
    pub capture_received: Option<WorldpayReceived>,
    pub cancel_received: Option<WorldpayReceived>,
    pub refund_received: Option<WorldpayReceived>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldpayReceived {
    #[serde(rename = "@orderCode")]
    pub order_code: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum WorldpayLastEvent {
    Authorised,
    Refused,
    Cancelled,
    Captured,
    Settled,
    SentForAuthorisation,
    SentForRefund,
    Refunded,
    Expired,
    Error,
}

pub type WorldpayPaymentsResponse = WorldpayResponse;
pub type WorldpayCaptureResponse = WorldpayResponse;
pub type WorldpayVoidResponse = WorldpayResponse;
pub type WorldpayRefundResponse = WorldpayResponse;
