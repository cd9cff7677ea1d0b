use std::collections::BTreeMap;

use common_enums::{AttemptStatus, RefundStatus};
use domain_types::{
    connector_types::{
        ConnectorCustomerResponse, PaymentFlowData, PaymentMethodTokenResponse,
        PaymentsResponseData, RefundFlowData, RefundsResponseData, SessionTokenResponseData,
    },
    gateway_response::{GatewayResponse, TransactionStatus},
    router_data::ErrorResponse,
    router_data_v2::RouterDataV2,
};
use hyperswitch_masking::{PeekInterface, Secret};
use serde_json::Value;

pub trait ForeignFrom<F>: Sized {
    fn foreign_from(item: F) -> Self;
}

pub(crate) fn with_transcript<T>(router_data: T, transcript: Option<Secret<String>>) -> GatewayResponse
where
    GatewayResponse: ForeignFrom<T>,
{
    let mut response = GatewayResponse::foreign_from(router_data);
    response.transcript = transcript;
    response
}

/// The processor reply as structured data: JSON as is, form replies as a flat object,
/// anything else (XML, HTML error pages) as a plain string.
pub(crate) fn reply_params(raw: Option<&Secret<String>>) -> Value {
    let Some(raw) = raw.map(PeekInterface::peek) else {
        return Value::Null;
    };
    if let Ok(json) = serde_json::from_str::<Value>(raw) {
        return json;
    }
    let looks_like_form = !raw.trim_start().starts_with('<') && raw.contains('=');
    looks_like_form
        .then(|| serde_urlencoded::from_str::<BTreeMap<String, String>>(raw).ok())
        .flatten()
        .and_then(|form| serde_json::to_value(form).ok())
        .unwrap_or_else(|| Value::String(raw.clone()))
}

fn declined(error: ErrorResponse, status: Option<TransactionStatus>, base: GatewayResponse) -> GatewayResponse {
    let error_code = error.get_standard_code();
    GatewayResponse {
        success: false,
        message: error.message,
        error_code: Some(error_code),
        authorization: error.connector_transaction_id,
        processor_error_code: Some(error.code),
        status,
        ..base
    }
}

fn base_response(test_mode: Option<bool>, http_status: Option<u16>, raw: Option<&Secret<String>>) -> GatewayResponse {
    GatewayResponse {
        test: test_mode.unwrap_or_default(),
        http_status,
        params: reply_params(raw),
        ..GatewayResponse::default()
    }
}

impl<F, Req> ForeignFrom<RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData>>
    for GatewayResponse
{
    fn foreign_from(router_data: RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData>) -> Self {
        let RouterDataV2 {
            resource_common_data: common,
            response,
            ..
        } = router_data;
        let base = base_response(
            common.test_mode,
            common.connector_http_status_code,
            common.raw_connector_response.as_ref(),
        );

        match response {
            Ok(PaymentsResponseData::TransactionResponse {
                resource_id,
                authorization,
                message,
                avs_result,
                cvv_result,
                ..
            }) => Self {
                success: common.status.is_success(),
                message: message.unwrap_or_else(|| common.status.to_string()),
                authorization: authorization
                    .or_else(|| resource_id.get_connector_transaction_id().ok()),
                status: Some(TransactionStatus::Payment(common.status)),
                avs_result,
                cvv_result,
                ..base
            },
            Err(error) => {
                let status = error.attempt_status.unwrap_or(match common.status {
                    AttemptStatus::Pending => AttemptStatus::Failure,
                    status => status,
                });
                declined(error, Some(TransactionStatus::Payment(status)), base)
            }
        }
    }
}

impl<F, Req> ForeignFrom<RouterDataV2<F, RefundFlowData, Req, RefundsResponseData>>
    for GatewayResponse
{
    fn foreign_from(router_data: RouterDataV2<F, RefundFlowData, Req, RefundsResponseData>) -> Self {
        let RouterDataV2 {
            resource_common_data: common,
            response,
            ..
        } = router_data;
        let base = base_response(
            common.test_mode,
            common.connector_http_status_code,
            common.raw_connector_response.as_ref(),
        );

        match response {
            Ok(refund) => Self {
                success: refund.refund_status.is_success(),
                message: refund
                    .message
                    .unwrap_or_else(|| refund.refund_status.to_string()),
                authorization: Some(refund.connector_refund_id),
                status: Some(TransactionStatus::Refund(refund.refund_status)),
                ..base
            },
            Err(error) => {
                let status = match common.status {
                    RefundStatus::Pending => RefundStatus::Failure,
                    status => status,
                };
                declined(error, Some(TransactionStatus::Refund(status)), base)
            }
        }
    }
}

// session, customer and tokenization calls carry no transaction status
fn intermediate<F, Req, Resp>(
    router_data: RouterDataV2<F, PaymentFlowData, Req, Resp>,
    message: &str,
    authorization: impl FnOnce(Resp) -> Option<String>,
) -> GatewayResponse {
    let RouterDataV2 {
        resource_common_data: common,
        response,
        ..
    } = router_data;
    let base = base_response(
        common.test_mode,
        common.connector_http_status_code,
        common.raw_connector_response.as_ref(),
    );

    match response {
        Ok(response) => GatewayResponse {
            success: true,
            message: message.to_string(),
            authorization: authorization(response),
            ..base
        },
        Err(error) => declined(error, None, base),
    }
}

impl<F, Req> ForeignFrom<RouterDataV2<F, PaymentFlowData, Req, SessionTokenResponseData>>
    for GatewayResponse
{
    fn foreign_from(
        router_data: RouterDataV2<F, PaymentFlowData, Req, SessionTokenResponseData>,
    ) -> Self {
        intermediate(router_data, "Session created", |_| None)
    }
}

impl<F, Req> ForeignFrom<RouterDataV2<F, PaymentFlowData, Req, ConnectorCustomerResponse>>
    for GatewayResponse
{
    fn foreign_from(
        router_data: RouterDataV2<F, PaymentFlowData, Req, ConnectorCustomerResponse>,
    ) -> Self {
        intermediate(router_data, "Customer created", |response| {
            Some(response.connector_customer_id)
        })
    }
}

impl<F, Req> ForeignFrom<RouterDataV2<F, PaymentFlowData, Req, PaymentMethodTokenResponse>>
    for GatewayResponse
{
    fn foreign_from(
        router_data: RouterDataV2<F, PaymentFlowData, Req, PaymentMethodTokenResponse>,
    ) -> Self {
        intermediate(router_data, "Payment method stored", |response| {
            Some(response.token)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use common_enums::StandardErrorCode;
    use common_utils::MinorUnit;
    use domain_types::{
        connector_flow::{Authorize, Refund},
        connector_types::{PaymentsAuthorizeData, RefundsData},
        payment_method_data::{Card, PaymentMethodData},
        router_data::ConnectorAuthType,
        types::Connectors,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn authorize(
        status: AttemptStatus,
        response: Result<PaymentsResponseData, ErrorResponse>,
    ) -> RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData> {
        let mut flow = PaymentFlowData::new("order-1", Connectors::default());
        flow.status = status;
        flow.test_mode = Some(true);
        flow.raw_connector_response = Some(Secret::new(
            "response=1&responsetext=SUCCESS&transactionid=77".to_string(),
        ));
        RouterDataV2::new(
            flow,
            ConnectorAuthType::NoKey,
            PaymentsAuthorizeData {
                payment_method_data: PaymentMethodData::Card(Card::new(
                    "4111111111111111",
                    "3",
                    "2030",
                    "737",
                )),
                amount: MinorUnit::new(100),
                currency: common_enums::Currency::USD,
                capture_method: None,
                customer_name: None,
                setup_future_usage: false,
                metadata: None,
            },
        )
        .set_response(response)
    }

    #[test]
    fn approved_payment_falls_back_to_the_transaction_id() {
        let response = GatewayResponse::foreign_from(authorize(
            AttemptStatus::Charged,
            Ok(PaymentsResponseData::transaction("77", 200)),
        ));
        assert!(response.success);
        assert!(response.test);
        assert_eq!(response.authorization.as_deref(), Some("77"));
        assert_eq!(response.message, "charged");
        assert_eq!(
            response.params,
            json!({"response": "1", "responsetext": "SUCCESS", "transactionid": "77"})
        );
    }

    #[test]
    fn error_response_is_a_decline() {
        let error = ErrorResponse {
            code: "05".to_string(),
            message: "Do not honor".to_string(),
            connector_transaction_id: Some("78".to_string()),
            standard_code: Some(StandardErrorCode::CardDeclined),
            ..ErrorResponse::default()
        };
        let response =
            GatewayResponse::foreign_from(authorize(AttemptStatus::Pending, Err(error)));
        assert!(!response.success);
        assert_eq!(response.error_code, Some(StandardErrorCode::CardDeclined));
        assert_eq!(response.processor_error_code.as_deref(), Some("05"));
        assert_eq!(response.authorization.as_deref(), Some("78"));
        assert_eq!(
            response.status,
            Some(TransactionStatus::Payment(AttemptStatus::Failure))
        );
    }

    #[test]
    fn unmapped_errors_fall_back_on_the_http_status() {
        let error = ErrorResponse {
            code: "AUTH".to_string(),
            message: "Invalid credentials".to_string(),
            status_code: 401,
            ..ErrorResponse::default()
        };
        let response =
            GatewayResponse::foreign_from(authorize(AttemptStatus::Failure, Err(error)));
        assert_eq!(response.error_code, Some(StandardErrorCode::ConfigError));
        assert_eq!(response.processor_error_code.as_deref(), Some("AUTH"));
    }

    #[test]
    fn refund_carries_the_refund_id() {
        let router_data: RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData> =
            RouterDataV2::new(
                RefundFlowData::new(Some("refund-1".to_string()), Connectors::default()),
                ConnectorAuthType::NoKey,
                RefundsData {
                    refund_id: "refund-1".to_string(),
                    connector_transaction_id: "77".to_string(),
                    refund_amount: MinorUnit::new(50),
                    currency: common_enums::Currency::USD,
                    reason: None,
                },
            )
            .set_response(Ok(RefundsResponseData {
                connector_refund_id: "ref_9".to_string(),
                refund_status: RefundStatus::Pending,
                message: None,
                status_code: 201,
            }));
        let response = GatewayResponse::foreign_from(router_data);
        assert!(response.success);
        assert_eq!(response.authorization.as_deref(), Some("ref_9"));
        assert_eq!(response.message, "pending");
    }

    #[test]
    fn xml_replies_are_kept_verbatim() {
        let raw = Secret::new("<reply><ok/></reply>".to_string());
        assert_eq!(reply_params(Some(&raw)), json!("<reply><ok/></reply>"));
        assert_eq!(reply_params(None), Value::Null);
    }
}
