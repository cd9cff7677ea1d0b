use common_enums::Currency;
use common_utils::MinorUnit;
use domain_types::{
    connector_flow,
    connector_types::{
        ConnectorCustomerData, ConnectorCustomerResponse, PaymentFlowData,
        PaymentMethodTokenResponse, PaymentMethodTokenizationData, PaymentVoidData,
        PaymentsAuthorizeData, PaymentsCaptureData, PaymentsResponseData, RefundFlowData,
        RefundsData, RefundsResponseData, SessionTokenRequestData, SessionTokenResponseData,
    },
};

use crate::{api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2};

pub trait ConnectorServiceTrait:
    ConnectorCommon
    + ValidationTrait
    + PaymentAuthorizeV2
    + PaymentCapture
    + PaymentVoidV2
    + RefundV2
    + PaymentSessionToken
    + PaymentTokenV2
    + CreateConnectorCustomer
{
}

pub type BoxedConnector = Box<&'static (dyn ConnectorServiceTrait + Sync)>;

/// How a connector keeps a card on file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMethod {
    /// Pre-steps followed by the tokenization flow, whose token becomes the authorization
    Tokenize,
    /// An authorization flagged for future use, immediately voided
    AuthorizeAndVoid,
    NotSupported,
}

/// Orchestration hints read by the gateway before and around the main flow.
pub trait ValidationTrait {
    fn should_do_session_token(&self) -> bool {
        false
    }

    fn should_create_connector_customer(&self) -> bool {
        false
    }

    fn should_do_payment_method_token(&self) -> bool {
        false
    }

    /// When false, a purchase is sent as an authorization followed by a capture.
    fn is_auto_capture_supported(&self) -> bool {
        true
    }

    /// Amount authorized and then voided to check a card: one major unit of `currency`.
    fn verify_amount(&self, currency: Currency) -> MinorUnit {
        MinorUnit::new(10_i64.pow(u32::from(
            currency.number_of_digits_after_decimal_point(),
        )))
    }

    fn store_method(&self) -> StoreMethod {
        StoreMethod::NotSupported
    }
}

pub trait PaymentAuthorizeV2:
    ConnectorIntegrationV2<
    connector_flow::Authorize,
    PaymentFlowData,
    PaymentsAuthorizeData,
    PaymentsResponseData,
>
{
}

pub trait PaymentCapture:
    ConnectorIntegrationV2<
    connector_flow::Capture,
    PaymentFlowData,
    PaymentsCaptureData,
    PaymentsResponseData,
>
{
}

pub trait PaymentVoidV2:
    ConnectorIntegrationV2<connector_flow::Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>
{
}

pub trait RefundV2:
    ConnectorIntegrationV2<connector_flow::Refund, RefundFlowData, RefundsData, RefundsResponseData>
{
}

pub trait PaymentSessionToken:
    ConnectorIntegrationV2<
    connector_flow::CreateSessionToken,
    PaymentFlowData,
    SessionTokenRequestData,
    SessionTokenResponseData,
>
{
}

pub trait PaymentTokenV2:
    ConnectorIntegrationV2<
    connector_flow::PaymentMethodToken,
    PaymentFlowData,
    PaymentMethodTokenizationData,
    PaymentMethodTokenResponse,
>
{
}

pub trait CreateConnectorCustomer:
    ConnectorIntegrationV2<
    connector_flow::CreateConnectorCustomer,
    PaymentFlowData,
    ConnectorCustomerData,
    ConnectorCustomerResponse,
>
{
}
