use std::sync::Arc;

use common_enums::{CaptureMethod, Currency};
use common_utils::MinorUnit;
use connector_integration::types::ConnectorData;
use domain_types::{
    connector_flow::{
        Authorize, Capture, CreateConnectorCustomer, CreateSessionToken, PaymentMethodToken,
        Refund, Void,
    },
    connector_types::{
        ConnectorCustomerData, ConnectorCustomerResponse, ConnectorEnum, PaymentFlowData,
        PaymentMethodTokenResponse, PaymentMethodTokenizationData, PaymentVoidData,
        PaymentsAuthorizeData, PaymentsCaptureData, PaymentsResponseData, RawConnectorResponse,
        RefundFlowData, RefundsData, RefundsResponseData, SessionTokenRequestData,
        SessionTokenResponseData,
    },
    gateway_response::{GatewayResponse, MultiResponse},
    payment_method_data::PaymentMethodData,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
};
use error_stack::{report, ResultExt};
use external_services::{service::execute_connector_processing_step, transcript::Transcript};
use hyperswitch_masking::Secret;
use interfaces::{
    connector_integration_v2::BoxedConnectorIntegrationV2, connector_types::StoreMethod,
};

use crate::{
    errors::{GatewayError, GatewayResult},
    transformers::with_transcript,
    types::{GatewayConfig, PaymentOptions},
    utils::generate_reference,
};

/// One processor account: an adapter, its credentials and the endpoints to reach it.
///
/// Every operation returns a [`GatewayResponse`]. Declines are unsuccessful responses;
/// only failures to build a request, reach the processor or read its reply are errors.
#[derive(Debug, Clone)]
pub struct Gateway {
    connector_data: ConnectorData,
    auth: ConnectorAuthType,
    config: Arc<GatewayConfig>,
}

impl Gateway {
    pub fn new(connector: ConnectorEnum, auth: ConnectorAuthType, config: Arc<GatewayConfig>) -> Self {
        Self {
            connector_data: ConnectorData::get_connector_by_name(&connector),
            auth,
            config,
        }
    }

    pub fn connector(&self) -> ConnectorEnum {
        self.connector_data.connector_name
    }

    fn connector_id(&self) -> &'static str {
        self.connector_data.connector.id()
    }

    /// Authorizes and captures in one go. Processors without auto-capture get an
    /// authorization followed by a capture of the same amount.
    #[tracing::instrument(skip_all, fields(connector = %self.connector(), amount = money.get_amount_as_i64()))]
    pub async fn purchase(
        &self,
        money: MinorUnit,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult<GatewayResponse> {
        if self.connector_data.connector.is_auto_capture_supported() {
            return self
                .authorize_with(money, payment_method, options, CaptureMethod::Automatic, false)
                .await;
        }

        tracing::info!("no auto-capture, sending authorize then capture");
        let mut multi = MultiResponse::run(false);
        multi
            .process(move || self.authorize(money, payment_method, options))
            .await?;
        if let Some(authorization) = self.chained_authorization(&multi, "purchase")? {
            let authorization = authorization.as_str();
            multi
                .process(move || self.capture(money, authorization, options))
                .await?;
        }
        Ok(multi.into_response())
    }

    #[tracing::instrument(skip_all, fields(connector = %self.connector(), amount = money.get_amount_as_i64()))]
    pub async fn authorize(
        &self,
        money: MinorUnit,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult<GatewayResponse> {
        self.authorize_with(money, payment_method, options, CaptureMethod::Manual, false)
            .await
    }

    #[tracing::instrument(skip_all, fields(connector = %self.connector(), amount = money.get_amount_as_i64()))]
    pub async fn capture(
        &self,
        money: MinorUnit,
        authorization: &str,
        options: &PaymentOptions,
    ) -> GatewayResult<GatewayResponse> {
        let integration: BoxedConnectorIntegrationV2<
            '_,
            Capture,
            PaymentFlowData,
            PaymentsCaptureData,
            PaymentsResponseData,
        > = self.connector_data.connector.get_connector_integration_v2();
        let router_data = RouterDataV2::new(
            self.payment_flow_data(options),
            self.auth.clone(),
            PaymentsCaptureData {
                amount_to_capture: money,
                currency: options.currency(),
                connector_transaction_id: authorization.to_string(),
            },
        );
        let (router_data, transcript) = self.execute("capture", integration, router_data).await?;
        Ok(with_transcript(router_data, transcript))
    }

    #[tracing::instrument(skip_all, fields(connector = %self.connector(), amount = money.get_amount_as_i64()))]
    pub async fn refund(
        &self,
        money: MinorUnit,
        authorization: &str,
        options: &PaymentOptions,
    ) -> GatewayResult<GatewayResponse> {
        let integration: BoxedConnectorIntegrationV2<
            '_,
            Refund,
            RefundFlowData,
            RefundsData,
            RefundsResponseData,
        > = self.connector_data.connector.get_connector_integration_v2();
        let refund_id = options.order_id.clone().unwrap_or_else(generate_reference);
        let mut flow = RefundFlowData::new(Some(refund_id.clone()), self.config.connectors.clone());
        flow.test_mode = Some(self.config.test_mode);
        let router_data = RouterDataV2::new(
            flow,
            self.auth.clone(),
            RefundsData {
                refund_id,
                connector_transaction_id: authorization.to_string(),
                refund_amount: money,
                currency: options.currency(),
                reason: options.description.clone(),
            },
        );
        let (router_data, transcript) = self.execute("refund", integration, router_data).await?;
        Ok(with_transcript(router_data, transcript))
    }

    #[tracing::instrument(skip_all, fields(connector = %self.connector()))]
    pub async fn void(
        &self,
        authorization: &str,
        options: &PaymentOptions,
    ) -> GatewayResult<GatewayResponse> {
        self.void_with_amount(authorization, None, options).await
    }

    /// Keeps the card on file and returns a reusable authorization for later payments.
    #[tracing::instrument(skip_all, fields(connector = %self.connector()))]
    pub async fn store(
        &self,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult<GatewayResponse> {
        if !matches!(payment_method, PaymentMethodData::Card(_)) {
            return Err(report!(GatewayError::InvalidRequest {
                operation: "store",
                reason: "only card details can be stored".to_string(),
            }));
        }

        match self.connector_data.connector.store_method() {
            StoreMethod::Tokenize => {
                let mut flow = self.payment_flow_data(options);
                let mut multi = MultiResponse::run(false);
                self.run_pre_steps(
                    &mut multi,
                    &mut flow,
                    payment_method,
                    MinorUnit::zero(),
                    options,
                    true,
                )
                .await?;
                Ok(multi.into_response())
            }
            StoreMethod::AuthorizeAndVoid => {
                let amount = self
                    .connector_data
                    .connector
                    .verify_amount(options.currency());
                let mut multi = MultiResponse::run(true);
                multi
                    .process(move || {
                        self.authorize_with(amount, payment_method, options, CaptureMethod::Manual, true)
                    })
                    .await?;
                if let Some(authorization) = self.chained_authorization(&multi, "store")? {
                    let authorization = authorization.as_str();
                    multi
                        .process_ignoring_result(move || {
                            self.void_with_amount(authorization, Some(amount), options)
                        })
                        .await?;
                }
                Ok(multi.into_response())
            }
            StoreMethod::NotSupported => Err(report!(GatewayError::NotSupported {
                operation: "store",
                connector: self.connector_id(),
            })),
        }
    }

    /// Checks a card by authorizing a small amount and voiding it straight away. The
    /// outcome is the authorization's; the void only releases the hold.
    #[tracing::instrument(skip_all, fields(connector = %self.connector()))]
    pub async fn verify(
        &self,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult<GatewayResponse> {
        let amount = self
            .connector_data
            .connector
            .verify_amount(options.currency());
        let mut multi = MultiResponse::run(true);
        multi
            .process(move || self.authorize(amount, payment_method, options))
            .await?;
        if let Some(authorization) = self.chained_authorization(&multi, "verify")? {
            let authorization = authorization.as_str();
            multi
                .process_ignoring_result(move || {
                    self.void_with_amount(authorization, Some(amount), options)
                })
                .await?;
        }
        Ok(multi.into_response())
    }

    /// The authorization a follow-up step acts on, `None` once the chain has failed.
    /// An approval without a transaction id is an unreadable reply.
    fn chained_authorization(
        &self,
        multi: &MultiResponse,
        operation: &'static str,
    ) -> GatewayResult<Option<String>> {
        if !multi.is_success() {
            return Ok(None);
        }
        multi
            .primary_response()
            .filter(|response| {
                response
                    .authorization_token()
                    .is_some_and(|token| !token.first().is_empty())
            })
            .and_then(|response| response.authorization.clone())
            .map(Some)
            .ok_or_else(|| {
                tracing::warn!(operation, "approved without an authorization");
                report!(GatewayError::InvalidResponse {
                    operation,
                    connector: self.connector_id(),
                })
            })
    }

    pub fn supports_scrubbing(&self) -> bool {
        self.connector_data.connector.supports_scrubbing()
    }

    pub fn scrub(&self, transcript: &str) -> GatewayResult<String> {
        self.connector_data
            .connector
            .scrub(transcript)
            .change_context(GatewayError::ScrubbingFailed)
    }

    async fn authorize_with(
        &self,
        money: MinorUnit,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
        capture_method: CaptureMethod,
        setup_future_usage: bool,
    ) -> GatewayResult<GatewayResponse> {
        let mut flow = self.payment_flow_data(options);
        let mut multi = MultiResponse::run(false);
        self.run_pre_steps(&mut multi, &mut flow, payment_method, money, options, false)
            .await?;

        let flow = &flow;
        multi
            .process(move || {
                self.authorize_step(
                    flow,
                    money,
                    payment_method,
                    options,
                    capture_method,
                    setup_future_usage,
                )
            })
            .await?;
        Ok(multi.into_response())
    }

    /// Session, customer and tokenization calls a processor needs before it accepts raw
    /// card details. Stored cards skip them.
    async fn run_pre_steps(
        &self,
        multi: &mut MultiResponse,
        flow: &mut PaymentFlowData,
        payment_method: &PaymentMethodData,
        money: MinorUnit,
        options: &PaymentOptions,
        always_tokenize: bool,
    ) -> GatewayResult<()> {
        if !matches!(payment_method, PaymentMethodData::Card(_)) {
            return Ok(());
        }
        let connector = &self.connector_data.connector;
        let currency = options.currency();

        if connector.should_do_session_token() {
            let flow = &mut *flow;
            multi
                .process(move || async move {
                    self.create_session_token(flow, money, currency).await
                })
                .await?;
        }
        if connector.should_create_connector_customer() {
            let flow = &mut *flow;
            multi
                .process(move || async move {
                    self.create_customer(flow, payment_method, options).await
                })
                .await?;
        }
        if always_tokenize || connector.should_do_payment_method_token() {
            let flow = &mut *flow;
            multi
                .process(move || async move {
                    self.tokenize(flow, payment_method, money, currency).await
                })
                .await?;
        }
        Ok(())
    }

    async fn create_session_token(
        &self,
        flow: &mut PaymentFlowData,
        amount: MinorUnit,
        currency: Currency,
    ) -> GatewayResult<GatewayResponse> {
        let integration: BoxedConnectorIntegrationV2<
            '_,
            CreateSessionToken,
            PaymentFlowData,
            SessionTokenRequestData,
            SessionTokenResponseData,
        > = self.connector_data.connector.get_connector_integration_v2();
        let router_data = RouterDataV2::new(
            flow.clone(),
            self.auth.clone(),
            SessionTokenRequestData { amount, currency },
        );
        let (router_data, transcript) = self.execute("session", integration, router_data).await?;
        if let Ok(response) = &router_data.response {
            flow.session_token = Some(response.session_token.clone());
        }
        Ok(with_transcript(router_data, transcript))
    }

    async fn create_customer(
        &self,
        flow: &mut PaymentFlowData,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult<GatewayResponse> {
        let integration: BoxedConnectorIntegrationV2<
            '_,
            CreateConnectorCustomer,
            PaymentFlowData,
            ConnectorCustomerData,
            ConnectorCustomerResponse,
        > = self.connector_data.connector.get_connector_integration_v2();
        let card_holder = match payment_method {
            PaymentMethodData::Card(card) => card.card_holder_name.clone(),
            PaymentMethodData::Token(_) => None,
        };
        let router_data = RouterDataV2::new(
            flow.clone(),
            self.auth.clone(),
            ConnectorCustomerData {
                email: options.email.clone(),
                name: options.customer_name.clone().or(card_holder),
                description: options.description.clone(),
                phone: options
                    .billing_address
                    .as_ref()
                    .and_then(|address| address.phone.clone()),
            },
        );
        let (router_data, transcript) = self.execute("customer", integration, router_data).await?;
        if let Ok(response) = &router_data.response {
            flow.connector_customer = Some(response.connector_customer_id.clone());
        }
        Ok(with_transcript(router_data, transcript))
    }

    async fn tokenize(
        &self,
        flow: &mut PaymentFlowData,
        payment_method: &PaymentMethodData,
        amount: MinorUnit,
        currency: Currency,
    ) -> GatewayResult<GatewayResponse> {
        let integration: BoxedConnectorIntegrationV2<
            '_,
            PaymentMethodToken,
            PaymentFlowData,
            PaymentMethodTokenizationData,
            PaymentMethodTokenResponse,
        > = self.connector_data.connector.get_connector_integration_v2();
        let router_data = RouterDataV2::new(
            flow.clone(),
            self.auth.clone(),
            PaymentMethodTokenizationData {
                payment_method_data: payment_method.clone(),
                amount,
                currency,
            },
        );
        let (router_data, transcript) = self.execute("tokenize", integration, router_data).await?;
        if let Ok(response) = &router_data.response {
            flow.payment_method_token = Some(Secret::new(response.token.clone()));
        }
        Ok(with_transcript(router_data, transcript))
    }

    async fn authorize_step(
        &self,
        flow: &PaymentFlowData,
        money: MinorUnit,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
        capture_method: CaptureMethod,
        setup_future_usage: bool,
    ) -> GatewayResult<GatewayResponse> {
        let integration: BoxedConnectorIntegrationV2<
            '_,
            Authorize,
            PaymentFlowData,
            PaymentsAuthorizeData,
            PaymentsResponseData,
        > = self.connector_data.connector.get_connector_integration_v2();
        let router_data = RouterDataV2::new(
            flow.clone(),
            self.auth.clone(),
            PaymentsAuthorizeData {
                payment_method_data: payment_method.clone(),
                amount: money,
                currency: options.currency(),
                capture_method: Some(capture_method),
                customer_name: options.customer_name.clone(),
                setup_future_usage,
                metadata: options.metadata_value(),
            },
        );
        let (router_data, transcript) = self.execute("authorize", integration, router_data).await?;
        Ok(with_transcript(router_data, transcript))
    }

    async fn void_with_amount(
        &self,
        authorization: &str,
        amount: Option<MinorUnit>,
        options: &PaymentOptions,
    ) -> GatewayResult<GatewayResponse> {
        let integration: BoxedConnectorIntegrationV2<
            '_,
            Void,
            PaymentFlowData,
            PaymentVoidData,
            PaymentsResponseData,
        > = self.connector_data.connector.get_connector_integration_v2();
        let router_data = RouterDataV2::new(
            self.payment_flow_data(options),
            self.auth.clone(),
            PaymentVoidData {
                connector_transaction_id: authorization.to_string(),
                cancellation_reason: options.description.clone(),
                amount,
                currency: Some(options.currency()),
            },
        );
        let (router_data, transcript) = self.execute("void", integration, router_data).await?;
        Ok(with_transcript(router_data, transcript))
    }

    async fn execute<F, ResourceCommonData, Req, Resp>(
        &self,
        operation: &'static str,
        integration: BoxedConnectorIntegrationV2<'_, F, ResourceCommonData, Req, Resp>,
        router_data: RouterDataV2<F, ResourceCommonData, Req, Resp>,
    ) -> GatewayResult<(
        RouterDataV2<F, ResourceCommonData, Req, Resp>,
        Option<Secret<String>>,
    )>
    where
        F: 'static,
        ResourceCommonData: RawConnectorResponse + 'static,
        Req: 'static,
        Resp: 'static,
    {
        let connector = self.connector_id();
        let mut transcript = self.config.record_transcripts.then(Transcript::new);
        let router_data = execute_connector_processing_step(
            &self.config.proxy,
            integration,
            router_data,
            connector,
            transcript.as_mut(),
        )
        .await
        .map_err(|report| {
            let error =
                GatewayError::from_connector_error(report.current_context(), operation, connector);
            report.change_context(error)
        })?;

        let succeeded = router_data.response.is_ok();
        tracing::info!(operation, connector, succeeded, "gateway call finished");
        Ok((
            router_data,
            transcript.map(|transcript| Secret::new(transcript.into_inner())),
        ))
    }

    fn payment_flow_data(&self, options: &PaymentOptions) -> PaymentFlowData {
        let reference = options.order_id.clone().unwrap_or_else(generate_reference);
        let mut flow = PaymentFlowData::new(reference, self.config.connectors.clone());
        flow.description = options.description.clone();
        flow.email = options.email.clone();
        flow.ip_address = options.ip.clone();
        flow.address = options.billing_address.clone();
        flow.test_mode = Some(self.config.test_mode);
        flow
    }
}
