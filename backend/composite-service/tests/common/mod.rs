#![allow(dead_code)]

use std::sync::Arc;

use composite_service::{Gateway, GatewayConfig, PaymentOptions};
use domain_types::{
    connector_types::ConnectorEnum,
    payment_method_data::{Card, PaymentMethodData},
    router_data::{Address, ConnectorAuthType},
    types::{ConnectorParams, Connectors},
};
use hyperswitch_masking::Secret;
use wiremock::MockServer;

pub fn secret(value: &str) -> Secret<String> {
    Secret::new(value.to_string())
}

/// A gateway whose every endpoint points at the mock server, recording transcripts.
pub fn gateway(connector: ConnectorEnum, auth: ConnectorAuthType, server: &MockServer) -> Gateway {
    gateway_at(connector, auth, &format!("{}/", server.uri()))
}

pub fn gateway_at(connector: ConnectorEnum, auth: ConnectorAuthType, base_url: &str) -> Gateway {
    let params = ConnectorParams::new(base_url).with_secondary_base_url(base_url);
    let config = GatewayConfig {
        connectors: Connectors {
            adyen: params.clone(),
            nmi: params.clone(),
            square: params.clone(),
            stax: params.clone(),
            worldpay: params,
        },
        test_mode: true,
        record_transcripts: true,
        ..GatewayConfig::default()
    };
    Gateway::new(connector, auth, Arc::new(config))
}

pub fn card() -> PaymentMethodData {
    PaymentMethodData::Card(
        Card::new("4111111111111111", "3", "2030", "737").with_holder_name("Ada Lovelace"),
    )
}

pub fn options() -> PaymentOptions {
    PaymentOptions {
        order_id: Some("order-1".to_string()),
        description: Some("Store purchase".to_string()),
        email: Some("ada@example.com".to_string()),
        customer_name: Some(secret("Ada Lovelace")),
        ip: Some("127.0.0.1".to_string()),
        billing_address: Some(Address {
            line1: Some(secret("1 Analytical Way")),
            city: Some("London".to_string()),
            zip: Some(secret("N1 9GU")),
            country: Some("GB".to_string()),
            ..Address::default()
        }),
        ..PaymentOptions::default()
    }
}

pub fn worldpay_reply(inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE paymentService PUBLIC "-//WorldPay//DTD WorldPay PaymentService v1//EN" "http://dtd.worldpay.com/paymentService_v1.dtd">
<paymentService version="1.4" merchantCode="MERCHANT1"><reply>{inner}</reply></paymentService>"#
    )
}
