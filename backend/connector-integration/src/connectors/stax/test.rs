#![allow(clippy::unwrap_used)]

use common_enums::{AttemptStatus, CaptureMethod, RefundStatus, StandardErrorCode};
use domain_types::{
    connector_types::PaymentsResponseData, payment_method_data::PaymentMethodData,
    router_data::ConnectorAuthType,
};
use hyperswitch_masking::Secret;
use interfaces::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2,
    connector_types::ValidationTrait,
};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::Stax;
use crate::test_utils::{self, body_of, response};

fn auth() -> ConnectorAuthType {
    ConnectorAuthType::HeaderKey {
        api_key: Secret::new("stax_api_key".to_string()),
    }
}

fn body_json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap()
}

#[test]
fn test_store_chain_is_customer_then_payment_method() {
    assert!(Stax::new().should_create_connector_customer());
    assert!(Stax::new().should_do_payment_method_token());

    let customer = test_utils::customer_data(auth());
    let request = Stax::new().build_request_v2(&customer).unwrap().unwrap();
    assert_eq!(request.url, "https://gateway.test/customer");
    assert_eq!(
        body_json(&body_of(&request)),
        json!({"email": "ada@example.com", "firstname": "Ada Lovelace"})
    );

    let created = Stax::new()
        .handle_response_v2(&customer, response(200, r#"{"id":"cus_77","firstname":"Ada"}"#))
        .unwrap();
    assert_eq!(created.response.unwrap().connector_customer_id, "cus_77");

    let mut token = test_utils::token_data(auth());
    token.resource_common_data.connector_customer = Some("cus_77".to_string());
    let request = Stax::new().build_request_v2(&token).unwrap().unwrap();
    assert_eq!(request.url, "https://gateway.test/payment-method/");
    assert_eq!(
        body_json(&body_of(&request)),
        json!({
            "method": "card",
            "person_name": "Ada Lovelace",
            "card_number": "4111111111111111",
            "card_exp": "0330",
            "card_cvv": "737",
            "customer_id": "cus_77"
        })
    );

    let stored = Stax::new()
        .handle_response_v2(&token, response(200, r#"{"id":"pm_901","nickname":"VISA"}"#))
        .unwrap();
    assert_eq!(stored.response.unwrap().token, "cus_77|pm_901");
}

#[test]
fn test_tokenizing_without_a_customer_fails() {
    let token = test_utils::token_data(auth());
    assert!(Stax::new().build_request_v2(&token).is_err());
}

#[test]
fn test_charge_uses_the_tokenized_payment_method() {
    let mut data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Manual,
    );
    data.resource_common_data.payment_method_token = Some(Secret::new("cus_77|pm_901".to_string()));
    let request = Stax::new().build_request_v2(&data).unwrap().unwrap();
    let body = body_json(&body_of(&request));

    assert_eq!(request.url, "https://gateway.test/charge");
    assert_eq!(body["payment_method_id"], "pm_901");
    assert_eq!(body["total"], 10.5);
    assert_eq!(body["pre_auth"], true);
    assert_eq!(body["meta"]["tax"], 0);
}

#[test]
fn test_charge_with_a_stored_card() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Token(Secret::new("cus_77|pm_901".to_string())),
        CaptureMethod::Automatic,
    );
    let body = body_json(&body_of(&Stax::new().build_request_v2(&data).unwrap().unwrap()));
    assert_eq!(body["payment_method_id"], "pm_901");
    assert_eq!(body["pre_auth"], false);
}

#[test]
fn test_pre_auth_response_is_authorized() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Token(Secret::new("cus_77|pm_901".to_string())),
        CaptureMethod::Manual,
    );
    let body = r#"{"id":"txn_5","success":true,"type":"pre_auth","pre_auth":true,"is_captured":0,"is_voided":false,"child_captures":[],"child_transactions":[],"message":null,"total":10.5}"#;
    let result = Stax::new()
        .handle_response_v2(&data, response(200, body))
        .unwrap();

    assert_eq!(result.resource_common_data.status, AttemptStatus::Authorized);
    let PaymentsResponseData::TransactionResponse { authorization, .. } = result.response.unwrap();
    assert_eq!(authorization.as_deref(), Some("txn_5"));
}

#[test]
fn test_unsuccessful_charge_is_declined() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Token(Secret::new("cus_77|pm_901".to_string())),
        CaptureMethod::Automatic,
    );
    let body = r#"{"id":"txn_6","success":false,"type":"charge","message":"Card declined by issuer"}"#;
    let result = Stax::new()
        .handle_response_v2(&data, response(200, body))
        .unwrap();

    assert_eq!(
        result.resource_common_data.status,
        AttemptStatus::AuthorizationFailed
    );
    let error = result.response.unwrap_err();
    assert_eq!(error.message, "Card declined by issuer");
    assert_eq!(error.standard_code, Some(StandardErrorCode::CardDeclined));
    assert_eq!(error.connector_transaction_id.as_deref(), Some("txn_6"));
}

#[test]
fn test_capture_void_and_refund_urls() {
    let capture = test_utils::capture_data(auth(), "txn_5");
    let request = Stax::new().build_request_v2(&capture).unwrap().unwrap();
    assert_eq!(request.url, "https://gateway.test/transaction/txn_5/capture");
    assert_eq!(body_json(&body_of(&request)), json!({"total": 10.5}));

    let void = test_utils::void_data(auth(), "txn_5");
    let request = Stax::new().build_request_v2(&void).unwrap().unwrap();
    assert_eq!(request.url, "https://gateway.test/transaction/txn_5/void");
    assert!(request.body.is_none());

    let refund = test_utils::refund_data(auth(), "txn_5");
    let request = Stax::new().build_request_v2(&refund).unwrap().unwrap();
    assert_eq!(request.url, "https://gateway.test/transaction/txn_5/refund");
}

#[test]
fn test_refund_reads_the_newest_matching_child() {
    let refund = test_utils::refund_data(auth(), "txn_5");
    let body = json!({
        "id": "txn_5",
        "success": true,
        "type": "charge",
        "is_captured": 1,
        "child_transactions": [
            {"id": "ref_old", "type": "refund", "success": true, "total": 5.0, "created_at": "2024-01-01 10:00:00"},
            {"id": "ref_new", "type": "refund", "success": true, "total": 5.0, "created_at": "2024-01-02 10:00:00"},
            {"id": "ref_other", "type": "refund", "success": true, "total": 2.0, "created_at": "2024-01-03 10:00:00"}
        ]
    })
    .to_string();
    let result = Stax::new()
        .handle_response_v2(&refund, response(200, &body))
        .unwrap();

    assert_eq!(result.resource_common_data.status, RefundStatus::Success);
    assert_eq!(result.response.unwrap().connector_refund_id, "ref_new");
}

#[test]
fn test_void_response() {
    let void = test_utils::void_data(auth(), "txn_5");
    let body = r#"{"id":"txn_5","success":true,"type":"pre_auth","is_voided":true}"#;
    let result = Stax::new()
        .handle_response_v2(&void, response(200, body))
        .unwrap();
    assert_eq!(result.resource_common_data.status, AttemptStatus::Voided);
}

#[test]
fn test_field_validation_errors_are_surfaced() {
    let error = Stax::new()
        .build_error_response(response(
            422,
            r#"{"card_number":["The card number is not a valid credit card number."]}"#,
        ))
        .unwrap();
    assert_eq!(error.code, "422");
    assert_eq!(error.standard_code, Some(StandardErrorCode::InvalidNumber));
    assert_eq!(
        error.message,
        "The card number is not a valid credit card number."
    );
}

#[test]
fn test_expired_card_decline() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Token(Secret::new("cus_77|pm_901".to_string())),
        CaptureMethod::Automatic,
    );
    let body = r#"{"id":"txn_7","success":false,"type":"charge","message":"Expired card"}"#;
    let error = Stax::new()
        .handle_response_v2(&data, response(200, body))
        .unwrap()
        .response
        .unwrap_err();
    assert_eq!(error.standard_code, Some(StandardErrorCode::ExpiredCard));
}

#[test]
fn test_unauthorized_is_a_config_error() {
    let error = Stax::new()
        .build_error_response(response(401, r#"{"error":"Unauthenticated."}"#))
        .unwrap();
    assert_eq!(error.standard_code, Some(StandardErrorCode::ConfigError));
}

#[test]
fn test_bearer_header_and_scrubbing() {
    let data = test_utils::capture_data(auth(), "txn_5");
    let request = Stax::new().build_request_v2(&data).unwrap().unwrap();
    assert!(request
        .headers
        .iter()
        .any(|(name, _)| name == "Authorization"));

    let transcript = "<- Authorization: Bearer stax_api_key\n<- {\"card_number\":\"4111111111111111\",\"card_cvv\":\"737\",\"person_name\":\"Ada\"}";
    assert_eq!(
        Stax::new().scrub(transcript).unwrap(),
        "<- Authorization: [FILTERED]\n<- {\"card_number\":\"[FILTERED]\",\"card_cvv\":\"[FILTERED]\",\"person_name\":\"Ada\"}"
    );
}
