use common_enums::Currency;
use common_utils::types::StringMinorUnit;
use hyperswitch_masking::Secret;
use serde::Serialize;

use crate::connectors::macros::XmlDocument;

/// Every message is a `paymentService` document carrying either an order or a modification.
#[derive(Debug, Serialize)]
#[serde(rename = "paymentService")]
pub struct WorldpayPaymentService<Body> {
    #[serde(rename = "@version")]
    pub version: &'static str,
    #[serde(rename = "@merchantCode")]
    pub merchant_code: Secret<String>,
    #[serde(rename = "$value")]
    pub body: Body,
}

impl<Body: Serialize> XmlDocument for WorldpayPaymentService<Body> {
    const PROLOG: &'static str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        "\n",
        r#"<!DOCTYPE paymentService PUBLIC "-//WorldPay//DTD WorldPay PaymentService v1//EN" "http://dtd.worldpay.com/paymentService_v1.dtd">"#,
        "\n"
    );
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorldpayBody {
    Submit(WorldpaySubmit),
    Modify(WorldpayModify),
}

#[derive(Debug, Serialize)]
pub struct WorldpaySubmit {
    pub order: WorldpayOrder,
}

#[derive(Debug, Serialize)]
pub struct WorldpayOrder {
    #[serde(rename = "@orderCode")]
    pub order_code: String,
    pub description: String,
    pub amount: WorldpayAmount,
    #[serde(rename = "paymentDetails")]
    pub payment_details: WorldpayPaymentDetails,
    pub shopper: WorldpayShopper,
}

#[derive(Debug, Serialize)]
pub struct WorldpayAmount {
    #[serde(rename = "@value")]
    pub value: StringMinorUnit,
    #[serde(rename = "@currencyCode")]
    pub currency_code: Currency,
    #[serde(rename = "@exponent")]
    pub exponent: u8,
}

#[derive(Debug, Serialize)]
pub struct WorldpayPaymentDetails {
    #[serde(rename = "$value")]
    pub payment_method: WorldpayPaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<WorldpaySession>,
}

/// The element name tells Worldpay the card brand.
#[derive(Debug, Serialize)]
pub enum WorldpayPaymentMethod {
    #[serde(rename = "VISA-SSL")]
    Visa(WorldpayCard),
    #[serde(rename = "ECMC-SSL")]
    Mastercard(WorldpayCard),
    #[serde(rename = "AMEX-SSL")]
    Amex(WorldpayCard),
    #[serde(rename = "DISCOVER-SSL")]
    Discover(WorldpayCard),
    #[serde(rename = "JCB-SSL")]
    Jcb(WorldpayCard),
    #[serde(rename = "DINERS-SSL")]
    Diners(WorldpayCard),
    #[serde(rename = "CARD-SSL")]
    Card(WorldpayCard),
}

#[derive(Debug, Serialize)]
pub struct WorldpayCard {
    #[serde(rename = "cardNumber")]
    pub card_number: Secret<String>,
    #[serde(rename = "expiryDate")]
    pub expiry_date: WorldpayExpiryDate,
    #[serde(rename = "cardHolderName")]
    pub card_holder_name: Secret<String>,
    pub cvc: Secret<String>,
    #[serde(rename = "cardAddress", skip_serializing_if = "Option::is_none")]
    pub card_address: Option<WorldpayCardAddress>,
}

#[derive(Debug, Serialize)]
pub struct WorldpayExpiryDate {
    pub date: WorldpayDate,
}

#[derive(Debug, Serialize)]
pub struct WorldpayDate {
    #[serde(rename = "@month")]
    pub month: Secret<String>,
    #[serde(rename = "@year")]
    pub year: Secret<String>,
}

#[derive(Debug, Serialize)]
pub struct WorldpayCardAddress {
    pub address: WorldpayAddress,
}

#[derive(Debug, Serialize)]
pub struct WorldpayAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<Secret<String>>,
    #[serde(rename = "postalCode", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Secret<String>>,
    #[serde(rename = "countryCode", skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(rename = "telephoneNumber", skip_serializing_if = "Option::is_none")]
    pub telephone_number: Option<Secret<String>>,
}

#[derive(Debug, Serialize)]
pub struct WorldpaySession {
    #[serde(rename = "@shopperIPAddress")]
    pub shopper_ip_address: String,
    #[serde(rename = "@id")]
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct WorldpayShopper {
    #[serde(rename = "shopperEmailAddress", skip_serializing_if = "Option::is_none")]
    pub shopper_email_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WorldpayModify {
    #[serde(rename = "orderModification")]
    pub order_modification: WorldpayOrderModification,
}

#[derive(Debug, Serialize)]
pub struct WorldpayOrderModification {
    #[serde(rename = "@orderCode")]
    pub order_code: String,
    #[serde(rename = "$value")]
    pub modification: WorldpayModification,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorldpayModification {
    Capture { amount: WorldpayAmount },
    Cancel,
    Refund { amount: WorldpayAmount },
}

pub type WorldpayRequest = WorldpayPaymentService<WorldpayBody>;
