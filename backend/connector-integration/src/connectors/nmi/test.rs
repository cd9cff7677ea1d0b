#![allow(clippy::unwrap_used)]

use common_enums::{AttemptStatus, CaptureMethod, RefundStatus, StandardErrorCode};
use domain_types::{
    connector_types::PaymentsResponseData, payment_method_data::PaymentMethodData,
    router_data::ConnectorAuthType,
};
use hyperswitch_masking::Secret;
use interfaces::{api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2};
use pretty_assertions::assert_eq;

use super::Nmi;
use crate::test_utils::{self, body_of, response};

fn auth() -> ConnectorAuthType {
    ConnectorAuthType::HeaderKey {
        api_key: Secret::new("nmi_security_key".to_string()),
    }
}

const APPROVED: &str = "response=1&responsetext=SUCCESS&authcode=123456&transactionid=8812345&avsresponse=Y&cvvresponse=M&orderid=order-1&type=sale&response_code=100";

#[test]
fn test_sale_request_is_form_encoded() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Automatic,
    );
    let request = Nmi::new().build_request_v2(&data).unwrap().unwrap();
    let body = body_of(&request);

    assert_eq!(request.url, "https://gateway.test/api/transact.php");
    assert!(body.starts_with("security_key=nmi_security_key&type=sale&amount=10.5&currency=USD&orderid=order-1"));
    assert!(body.contains("ccnumber=4111111111111111&ccexp=0330&cvv=737"));
    assert!(body.contains("first_name=Ada&last_name=Lovelace"));
    assert!(body.contains("email=ada%40example.com"));
}

#[test]
fn test_manual_capture_sends_auth() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Manual,
    );
    let body = body_of(&Nmi::new().build_request_v2(&data).unwrap().unwrap());
    assert!(body.contains("type=auth"));
}

#[test]
fn test_stored_card_is_charged_through_the_vault() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Token(Secret::new("vault_4411".to_string())),
        CaptureMethod::Automatic,
    );
    let body = body_of(&Nmi::new().build_request_v2(&data).unwrap().unwrap());
    assert!(body.contains("customer_vault_id=vault_4411"));
    assert!(!body.contains("ccnumber"));
}

#[test]
fn test_approved_sale_carries_authorization_and_checks() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Automatic,
    );
    let result = Nmi::new()
        .handle_response_v2(&data, response(200, APPROVED))
        .unwrap();

    assert_eq!(result.resource_common_data.status, AttemptStatus::Charged);
    match result.response.unwrap() {
        PaymentsResponseData::TransactionResponse {
            authorization,
            avs_result,
            cvv_result,
            message,
            ..
        } => {
            assert_eq!(authorization.as_deref(), Some("8812345|creditcard"));
            assert_eq!(avs_result.as_deref(), Some("Y"));
            assert_eq!(cvv_result.as_deref(), Some("M"));
            assert_eq!(message.as_deref(), Some("SUCCESS"));
        }
    }
}

#[test]
fn test_declined_sale_is_an_error_response() {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Automatic,
    );
    let declined = "response=2&responsetext=DECLINE&authcode=&transactionid=8812346&avsresponse=N&cvvresponse=N&orderid=order-1&type=sale&response_code=200";
    let result = Nmi::new()
        .handle_response_v2(&data, response(200, declined))
        .unwrap();

    assert_eq!(
        result.resource_common_data.status,
        AttemptStatus::AuthorizationFailed
    );
    let error = result.response.unwrap_err();
    assert_eq!(error.code, "200");
    assert_eq!(error.standard_code, Some(StandardErrorCode::CardDeclined));
    assert_eq!(error.message, "DECLINE");
    assert_eq!(error.connector_transaction_id.as_deref(), Some("8812346"));
}

#[rstest::rstest]
#[case("2", "223", StandardErrorCode::ExpiredCard)]
#[case("2", "225", StandardErrorCode::IncorrectCvc)]
#[case("2", "250", StandardErrorCode::PickupCard)]
#[case("2", "299", StandardErrorCode::CardDeclined)]
#[case("3", "410", StandardErrorCode::ConfigError)]
#[case("3", "300", StandardErrorCode::ProcessingError)]
fn test_response_codes_map_to_standard_codes(
    #[case] outcome: &str,
    #[case] response_code: &str,
    #[case] expected: StandardErrorCode,
) {
    let data = test_utils::authorize_data(
        auth(),
        PaymentMethodData::Card(test_utils::card()),
        CaptureMethod::Automatic,
    );
    let body = format!(
        "response={outcome}&responsetext=REFUSED&authcode=&transactionid=8812347&type=sale&response_code={response_code}"
    );
    let error = Nmi::new()
        .handle_response_v2(&data, response(200, &body))
        .unwrap()
        .response
        .unwrap_err();

    assert_eq!(error.code, response_code);
    assert_eq!(error.standard_code, Some(expected));
}

#[test]
fn test_capture_and_void_use_the_transaction_id() {
    let capture = test_utils::capture_data(auth(), "8812345|creditcard");
    let body = body_of(&Nmi::new().build_request_v2(&capture).unwrap().unwrap());
    assert_eq!(
        body,
        "security_key=nmi_security_key&type=capture&transactionid=8812345&amount=10.5"
    );

    let void = test_utils::void_data(auth(), "8812345|creditcard");
    let body = body_of(&Nmi::new().build_request_v2(&void).unwrap().unwrap());
    assert_eq!(
        body,
        "security_key=nmi_security_key&type=void&transactionid=8812345&void_reason=user_cancel"
    );
}

#[test]
fn test_refund_names_the_payment_type() {
    let data = test_utils::refund_data(auth(), "8812345|creditcard");
    let body = body_of(&Nmi::new().build_request_v2(&data).unwrap().unwrap());
    assert_eq!(
        body,
        "security_key=nmi_security_key&type=refund&transactionid=8812345&amount=5.0&payment=creditcard"
    );

    let refunded = Nmi::new()
        .handle_response_v2(
            &data,
            response(
                200,
                "response=1&responsetext=SUCCESS&authcode=&transactionid=8812399&type=refund&response_code=100",
            ),
        )
        .unwrap();
    assert_eq!(refunded.resource_common_data.status, RefundStatus::Success);
    assert_eq!(refunded.response.unwrap().connector_refund_id, "8812399");
}

#[test]
fn test_vault_returns_customer_vault_id() {
    let data = test_utils::token_data(auth());
    let body = body_of(&Nmi::new().build_request_v2(&data).unwrap().unwrap());
    assert!(body.contains("customer_vault=add_customer"));

    let stored = Nmi::new()
        .handle_response_v2(
            &data,
            response(
                200,
                "response=1&responsetext=Customer+Added&transactionid=&response_code=100&customer_vault_id=vault_4411",
            ),
        )
        .unwrap();
    assert_eq!(stored.response.unwrap().token, "vault_4411");
}

#[test]
fn test_unsupported_flows_are_reported() {
    let data = test_utils::session_data(auth());
    assert!(Nmi::new().build_request_v2(&data).is_err());
}

#[test]
fn test_transcript_scrubbing() {
    let transcript = "<- POST https://secure.nmi.com/api/transact.php\n<- security_key=6457Thfj624V5r7WUwc5v6a68Zsd6YEm&type=sale&amount=1.00&ccnumber=4111111111111111&ccexp=1025&cvv=999\n-> response=1&responsetext=SUCCESS&cvvresponse=M";
    assert!(Nmi::new().supports_scrubbing());
    assert_eq!(
        Nmi::new().scrub(transcript).unwrap(),
        "<- POST https://secure.nmi.com/api/transact.php\n<- security_key=[FILTERED]&type=sale&amount=1.00&ccnumber=[FILTERED]&ccexp=1025&cvv=[FILTERED]\n-> response=1&responsetext=SUCCESS&cvvresponse=M"
    );
}
