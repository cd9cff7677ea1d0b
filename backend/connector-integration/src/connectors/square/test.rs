#![allow(clippy::unwrap_used)]

use common_enums::{AttemptStatus, CaptureMethod, RefundStatus, StandardErrorCode};
use common_utils::request::Method;
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

use super::Square;
use crate::test_utils::{self, body_of, response};

fn auth() -> ConnectorAuthType {
    ConnectorAuthType::BodyKey {
        api_key: Secret::new("square_access_token".to_string()),
        key1: Secret::new("sq0idp-app".to_string()),
    }
}

fn body_json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap()
}

fn has_bearer(request: &common_utils::request::Request) -> bool {
    request
        .headers
        .iter()
        .any(|(name, _)| name == "Authorization")
}

#[test]
fn test_session_then_nonce_chain() {
    assert!(Square::new().should_do_session_token());
    assert!(Square::new().should_do_payment_method_token());

    let session = test_utils::session_data(auth());
    let request = Square::new().build_request_v2(&session).unwrap().unwrap();
    assert_eq!(request.method, Method::Get);
    assert_eq!(
        request.url,
        "https://connect.gateway.test/payments/hydrate?applicationId=sq0idp-app"
    );
    assert!(request.body.is_none());
    assert!(!has_bearer(&request));

    let hydrated = Square::new()
        .handle_response_v2(&session, response(200, r#"{"sessionId":"sess-42"}"#))
        .unwrap();
    assert_eq!(hydrated.response.unwrap().session_token, "sess-42");

    let mut token = test_utils::token_data(auth());
    token.resource_common_data.session_token = Some("sess-42".to_string());
    let request = Square::new().build_request_v2(&token).unwrap().unwrap();
    assert_eq!(request.url, "https://connect.gateway.test/v2/card-nonce");
    assert!(!has_bearer(&request));
    assert_eq!(
        body_json(&body_of(&request)),
        json!({
            "client_id": "sq0idp-app",
            "session_id": "sess-42",
            "card_data": {"cvv": "737", "exp_month": 3, "exp_year": 2030, "number": "4111111111111111"}
        })
    );

    let nonce = Square::new()
        .handle_response_v2(&token, response(200, r#"{"card_nonce":"cnon:abc"}"#))
        .unwrap();
    assert_eq!(nonce.response.unwrap().token, "cnon:abc");
}

#[test]
fn test_nonce_needs_a_session() {
    let token = test_utils::token_data(auth());
    assert!(Square::new().build_request_v2(&token).is_err());
}

#[test]
fn test_payment_request() {
    let mut data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Manual,
    );
    data.resource_common_data.payment_method_token = Some(Secret::new("cnon:abc".to_string()));
    let request = Square::new().build_request_v2(&data).unwrap().unwrap();
    let body = body_json(&body_of(&request));

    assert_eq!(request.url, "https://gateway.test/v2/payments");
    assert!(has_bearer(&request));
    assert_eq!(body["source_id"], "cnon:abc");
    assert_eq!(body["amount_money"], json!({"amount": 1050, "currency": "USD"}));
    assert_eq!(body["autocomplete"], false);
    assert_eq!(body["reference_id"], "order-1");
    assert!(uuid::Uuid::parse_str(body["idempotency_key"].as_str().unwrap()).is_ok());
}

#[test]
fn test_each_payment_gets_a_fresh_idempotency_key() {
    let mut data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Automatic,
    );
    data.resource_common_data.payment_method_token = Some(Secret::new("cnon:abc".to_string()));
    let first = body_json(&body_of(&Square::new().build_request_v2(&data).unwrap().unwrap()));
    let second = body_json(&body_of(&Square::new().build_request_v2(&data).unwrap().unwrap()));
    assert_ne!(first["idempotency_key"], second["idempotency_key"]);
}

#[test]
fn test_payment_response() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Manual,
    );
    let body = json!({
        "payment": {
            "id": "GQTFp1ZlXdpoW4o6eGiZhbjosiDFf",
            "status": "APPROVED",
            "amount_money": {"amount": 1050, "currency": "USD"},
            "reference_id": "order-1",
            "card_details": {"status": "AUTHORIZED", "avs_status": "AVS_ACCEPTED", "cvv_status": "CVV_ACCEPTED", "auth_result_code": "ZSDmSK"}
        }
    })
    .to_string();
    let result = Square::new()
        .handle_response_v2(&data, response(200, &body))
        .unwrap();

    assert_eq!(result.resource_common_data.status, AttemptStatus::Authorized);
    let PaymentsResponseData::TransactionResponse {
        authorization,
        avs_result,
        cvv_result,
        ..
    } = result.response.unwrap();
    assert_eq!(authorization.as_deref(), Some("GQTFp1ZlXdpoW4o6eGiZhbjosiDFf"));
    assert_eq!(avs_result.as_deref(), Some("AVS_ACCEPTED"));
    assert_eq!(cvv_result.as_deref(), Some("CVV_ACCEPTED"));
}

#[test]
fn test_complete_and_cancel() {
    let capture = test_utils::capture_data(auth(), "pay_1");
    let request = Square::new().build_request_v2(&capture).unwrap().unwrap();
    assert_eq!(request.url, "https://gateway.test/v2/payments/pay_1/complete");
    assert!(request.body.is_none());

    let completed = Square::new()
        .handle_response_v2(
            &capture,
            response(200, r#"{"payment":{"id":"pay_1","status":"COMPLETED"}}"#),
        )
        .unwrap();
    assert_eq!(completed.resource_common_data.status, AttemptStatus::Charged);

    let void = test_utils::void_data(auth(), "pay_1");
    let request = Square::new().build_request_v2(&void).unwrap().unwrap();
    assert_eq!(request.url, "https://gateway.test/v2/payments/pay_1/cancel");

    let canceled = Square::new()
        .handle_response_v2(
            &void,
            response(200, r#"{"payment":{"id":"pay_1","status":"CANCELED"}}"#),
        )
        .unwrap();
    assert_eq!(canceled.resource_common_data.status, AttemptStatus::Voided);
    assert!(canceled.response.is_ok());
}

#[test]
fn test_canceled_payment_is_not_an_authorization() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Manual,
    );
    let canceled = r#"{"payment":{"id":"pay_2","status":"CANCELED"}}"#;
    let result = Square::new()
        .handle_response_v2(&data, response(200, canceled))
        .unwrap();
    assert_eq!(
        result.resource_common_data.status,
        AttemptStatus::AuthorizationFailed
    );
    assert!(!result.resource_common_data.status.is_success());
    let error = result.response.unwrap_err();
    assert_eq!(error.message, "Payment canceled");
    assert_eq!(error.connector_transaction_id.as_deref(), Some("pay_2"));

    let capture = test_utils::capture_data(auth(), "pay_2");
    let result = Square::new()
        .handle_response_v2(&capture, response(200, canceled))
        .unwrap();
    assert_eq!(result.resource_common_data.status, AttemptStatus::CaptureFailed);
    assert!(result.response.is_err());
}

#[test]
fn test_failed_payment_is_a_card_decline() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Automatic,
    );
    let error = Square::new()
        .handle_response_v2(
            &data,
            response(200, r#"{"payment":{"id":"pay_3","status":"FAILED"}}"#),
        )
        .unwrap()
        .response
        .unwrap_err();
    assert_eq!(error.standard_code, Some(StandardErrorCode::CardDeclined));
}

#[test]
fn test_refund() {
    let refund = test_utils::refund_data(auth(), "pay_1");
    let request = Square::new().build_request_v2(&refund).unwrap().unwrap();
    let body = body_json(&body_of(&request));
    assert_eq!(request.url, "https://gateway.test/v2/refunds");
    assert_eq!(body["payment_id"], "pay_1");
    assert_eq!(body["amount_money"], json!({"amount": 500, "currency": "USD"}));

    let result = Square::new()
        .handle_response_v2(
            &refund,
            response(200, r#"{"refund":{"id":"ref_1","status":"PENDING"}}"#),
        )
        .unwrap();
    assert_eq!(result.resource_common_data.status, RefundStatus::Pending);
    assert_eq!(result.response.unwrap().connector_refund_id, "ref_1");
}

#[test]
fn test_error_response() {
    let body = r#"{"errors":[{"category":"PAYMENT_METHOD_ERROR","code":"CVV_FAILURE","detail":"Authorization error: 'CVV_FAILURE'"}]}"#;
    let error = Square::new()
        .build_error_response(response(400, body))
        .unwrap();
    assert_eq!(error.code, "CVV_FAILURE");
    assert_eq!(error.standard_code, Some(StandardErrorCode::IncorrectCvc));
    assert_eq!(error.message, "Authorization error: 'CVV_FAILURE'");
    assert_eq!(error.attempt_status, Some(AttemptStatus::Failure));
}

#[test]
fn test_scrubbing() {
    let transcript = "<- Authorization: Bearer square_access_token\n<- {\"card_data\":{\"cvv\":\"737\",\"exp_month\":3,\"number\":\"4111111111111111\"}}";
    assert_eq!(
        Square::new().scrub(transcript).unwrap(),
        "<- Authorization: [FILTERED]\n<- {\"card_data\":{\"cvv\":\"[FILTERED]\",\"exp_month\":3,\"number\":\"[FILTERED]\"}}"
    );
}
