#![allow(clippy::unwrap_used)]

use common_enums::{AttemptStatus, CaptureMethod, Currency, RefundStatus, StandardErrorCode};
use common_utils::MinorUnit;
use domain_types::{
    connector_types::PaymentsResponseData, payment_method_data::PaymentMethodData,
    router_data::ConnectorAuthType,
};
use hyperswitch_masking::Secret;
use interfaces::{
    api::ConnectorCommon,
    connector_integration_v2::ConnectorIntegrationV2,
    connector_types::{StoreMethod, ValidationTrait},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::Adyen;
use crate::test_utils::{self, body_of, response};

fn auth() -> ConnectorAuthType {
    ConnectorAuthType::BodyKey {
        api_key: Secret::new("adyen_api_key".to_string()),
        key1: Secret::new("StoreMerchantECOM".to_string()),
    }
}

fn body_json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap()
}

#[test]
fn test_card_payment_request() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Automatic,
    );
    let request = Adyen::new().build_request_v2(&data).unwrap().unwrap();

    assert_eq!(request.url, "https://gateway.test/v68/payments");
    assert_eq!(
        body_json(&body_of(&request)),
        json!({
            "amount": {"currency": "USD", "value": 1050},
            "merchantAccount": "StoreMerchantECOM",
            "paymentMethod": {
                "type": "scheme",
                "number": "4111111111111111",
                "expiryMonth": "03",
                "expiryYear": "2030",
                "cvc": "737",
                "holderName": "Ada Lovelace",
                "brand": "visa"
            },
            "reference": "order-1",
            "shopperInteraction": "Ecommerce",
            "shopperName": {"firstName": "Ada", "lastName": "Lovelace"},
            "shopperIP": "127.0.0.1",
            "shopperEmail": "ada@example.com",
            "shopperStatement": "Store purchase",
            "billingAddress": {
                "city": "London",
                "country": "GB",
                "houseNumberOrName": "NA",
                "postalCode": "N1 9GU",
                "street": "1 Analytical Way"
            }
        })
    );
}

#[test]
fn test_manual_capture_flag() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Manual,
    );
    let body = body_json(&body_of(&Adyen::new().build_request_v2(&data).unwrap().unwrap()));
    assert_eq!(body["additionalData"], json!({"manualCapture": "true"}));
}

#[test]
fn test_store_is_a_zero_value_authorisation() {
    assert_eq!(Adyen::new().store_method(), StoreMethod::AuthorizeAndVoid);
    assert_eq!(Adyen::new().verify_amount(Currency::USD), MinorUnit::new(0));

    let mut data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Manual,
    );
    data.request.setup_future_usage = true;
    let body = body_json(&body_of(&Adyen::new().build_request_v2(&data).unwrap().unwrap()));

    assert_eq!(body["storePaymentMethod"], true);
    assert_eq!(body["recurringProcessingModel"], "CardOnFile");
    assert_eq!(body["shopperReference"], "order-1");
}

#[test]
fn test_stored_card_payment() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Token(Secret::new("881|8415|shopper-9".to_string())),
        CaptureMethod::Automatic,
    );
    let body = body_json(&body_of(&Adyen::new().build_request_v2(&data).unwrap().unwrap()));

    assert_eq!(
        body["paymentMethod"],
        json!({"type": "scheme", "storedPaymentMethodId": "8415"})
    );
    assert_eq!(body["shopperInteraction"], "ContAuth");
    assert_eq!(body["shopperReference"], "shopper-9");
    assert_eq!(body["shopperName"], json!({"firstName": "Ada", "lastName": "Lovelace"}));
}

#[test]
fn test_malformed_stored_card_token() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Token(Secret::new("881".to_string())),
        CaptureMethod::Automatic,
    );
    assert!(Adyen::new().build_request_v2(&data).is_err());
}

#[rstest]
#[case(CaptureMethod::Automatic, AttemptStatus::Charged)]
#[case(CaptureMethod::Manual, AttemptStatus::Authorized)]
fn test_authorised_result(#[case] capture_method: CaptureMethod, #[case] expected: AttemptStatus) {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        capture_method,
    );
    let body = json!({
        "pspReference": "881",
        "resultCode": "Authorised",
        "merchantReference": "order-1",
        "additionalData": {"avsResult": "4 AVS not supported for this card type", "cvcResult": "1 Matches", "authCode": "065696"}
    })
    .to_string();
    let result = Adyen::new()
        .handle_response_v2(&data, response(200, &body))
        .unwrap();

    assert_eq!(result.resource_common_data.status, expected);
    let PaymentsResponseData::TransactionResponse {
        authorization,
        avs_result,
        cvv_result,
        mandate_reference,
        ..
    } = result.response.unwrap();
    assert_eq!(authorization.as_deref(), Some("881"));
    assert_eq!(avs_result.as_deref(), Some("4 AVS not supported for this card type"));
    assert_eq!(cvv_result.as_deref(), Some("1 Matches"));
    assert_eq!(mandate_reference, None);
}

#[test]
fn test_stored_card_authorization_is_composed() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Manual,
    );
    let body = json!({
        "pspReference": "881",
        "resultCode": "Authorised",
        "additionalData": {
            "recurring.recurringDetailReference": "8415",
            "recurring.shopperReference": "order-1"
        }
    })
    .to_string();
    let result = Adyen::new()
        .handle_response_v2(&data, response(200, &body))
        .unwrap();

    let PaymentsResponseData::TransactionResponse {
        authorization,
        mandate_reference,
        ..
    } = result.response.unwrap();
    assert_eq!(authorization.as_deref(), Some("881|8415|order-1"));
    assert_eq!(mandate_reference.as_deref(), Some("881|8415|order-1"));
}

#[test]
fn test_refused_result() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Automatic,
    );
    let body = r#"{"pspReference":"882","resultCode":"Refused","refusalReason":"CVC Declined","refusalReasonCode":"24"}"#;
    let result = Adyen::new()
        .handle_response_v2(&data, response(200, body))
        .unwrap();

    assert_eq!(
        result.resource_common_data.status,
        AttemptStatus::AuthorizationFailed
    );
    let error = result.response.unwrap_err();
    assert_eq!(error.code, "24");
    assert_eq!(error.standard_code, Some(StandardErrorCode::IncorrectCvc));
    assert_eq!(error.message, "CVC Declined");
    assert_eq!(error.connector_transaction_id.as_deref(), Some("882"));
}

#[test]
fn test_modifications_use_the_psp_reference() {
    let capture = test_utils::capture_data(auth(), "881|8415|order-1");
    let request = Adyen::new().build_request_v2(&capture).unwrap().unwrap();
    assert_eq!(request.url, "https://gateway.test/v68/payments/881/captures");
    assert_eq!(
        body_json(&body_of(&request)),
        json!({
            "merchantAccount": "StoreMerchantECOM",
            "amount": {"currency": "USD", "value": 1050},
            "reference": "order-1"
        })
    );

    let void = test_utils::void_data(auth(), "881");
    let request = Adyen::new().build_request_v2(&void).unwrap().unwrap();
    assert_eq!(request.url, "https://gateway.test/v68/payments/881/cancels");

    let refund = test_utils::refund_data(auth(), "881");
    let request = Adyen::new().build_request_v2(&refund).unwrap().unwrap();
    assert_eq!(request.url, "https://gateway.test/v68/payments/881/refunds");
    assert_eq!(
        body_json(&body_of(&request)),
        json!({
            "merchantAccount": "StoreMerchantECOM",
            "amount": {"currency": "USD", "value": 500},
            "merchantRefundReason": "requested_by_customer",
            "reference": "refund-1"
        })
    );
}

#[test]
fn test_received_modifications() {
    let body = r#"{"merchantAccount":"StoreMerchantECOM","paymentPspReference":"881","pspReference":"883","reference":"order-1","status":"received"}"#;

    let capture = test_utils::capture_data(auth(), "881");
    let result = Adyen::new()
        .handle_response_v2(&capture, response(201, body))
        .unwrap();
    assert_eq!(result.resource_common_data.status, AttemptStatus::Charged);
    let PaymentsResponseData::TransactionResponse { authorization, .. } = result.response.unwrap();
    assert_eq!(authorization.as_deref(), Some("883"));

    let void = test_utils::void_data(auth(), "881");
    let result = Adyen::new()
        .handle_response_v2(&void, response(201, body))
        .unwrap();
    assert_eq!(result.resource_common_data.status, AttemptStatus::Voided);

    let refund = test_utils::refund_data(auth(), "881");
    let result = Adyen::new()
        .handle_response_v2(&refund, response(201, body))
        .unwrap();
    assert_eq!(result.resource_common_data.status, RefundStatus::Pending);
    assert_eq!(result.response.unwrap().connector_refund_id, "883");
}

#[test]
fn test_error_body() {
    let error = Adyen::new()
        .build_error_response(response(
            422,
            r#"{"status":422,"errorCode":"167","message":"Original pspReference required for this operation","errorType":"validation"}"#,
        ))
        .unwrap();
    assert_eq!(error.code, "167");
    assert_eq!(error.standard_code, Some(StandardErrorCode::ProcessingError));
    assert_eq!(
        error.message,
        "Original pspReference required for this operation"
    );
    assert_eq!(error.status_code, 422);
}

#[test]
fn test_card_errors_in_the_error_body() {
    let error = Adyen::new()
        .build_error_response(response(
            422,
            r#"{"status":422,"errorCode":"101","message":"Invalid card number","errorType":"validation"}"#,
        ))
        .unwrap();
    assert_eq!(error.standard_code, Some(StandardErrorCode::IncorrectNumber));

    let error = Adyen::new()
        .build_error_response(response(
            401,
            r#"{"status":401,"errorCode":"000","message":"HTTP Status Response - Unauthorized","errorType":"security"}"#,
        ))
        .unwrap();
    assert_eq!(error.standard_code, Some(StandardErrorCode::ConfigError));
}

#[test]
fn test_refusal_reasons_map_to_standard_codes() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Automatic,
    );
    let body = r#"{"pspReference":"884","resultCode":"Refused","refusalReason":"Expired Card","refusalReasonCode":"6"}"#;
    let error = Adyen::new()
        .handle_response_v2(&data, response(200, body))
        .unwrap()
        .response
        .unwrap_err();
    assert_eq!(error.standard_code, Some(StandardErrorCode::ExpiredCard));

    let body = r#"{"pspReference":"885","resultCode":"Refused","refusalReason":"Refused","refusalReasonCode":"2"}"#;
    let error = Adyen::new()
        .handle_response_v2(&data, response(200, body))
        .unwrap()
        .response
        .unwrap_err();
    assert_eq!(error.standard_code, Some(StandardErrorCode::CardDeclined));
}

#[test]
fn test_api_key_header_and_scrubbing() {
    let capture = test_utils::capture_data(auth(), "881");
    let request = Adyen::new().build_request_v2(&capture).unwrap().unwrap();
    assert!(request.headers.iter().any(|(name, _)| name == "X-API-Key"));

    let transcript = "<- X-API-Key: adyen_api_key\n<- {\"paymentMethod\":{\"type\":\"scheme\",\"number\":\"4111111111111111\",\"cvc\":\"737\"}}";
    assert_eq!(
        Adyen::new().scrub(transcript).unwrap(),
        "<- X-API-Key: [FILTERED]\n<- {\"paymentMethod\":{\"type\":\"scheme\",\"number\":\"[FILTERED]\",\"cvc\":\"[FILTERED]\"}}"
    );
}
