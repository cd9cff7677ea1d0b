//!
//! The normalized outcome of a gateway call, and the aggregate used when one logical
//! operation needs several dependent calls.
//!

use std::future::Future;

use common_enums::{AttemptStatus, RefundStatus, StandardErrorCode};
use common_utils::consts::AUTHORIZATION_DELIMITER;
use hyperswitch_masking::{PeekInterface, Secret};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TransactionStatus {
    Payment(AttemptStatus),
    Refund(RefundStatus),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GatewayResponse {
    pub success: bool,
    pub message: String,
    /// Opaque token identifying the transaction for later capture, refund or void
    pub authorization: Option<String>,
    /// Processor-neutral reason, set on every failed response
    pub error_code: Option<StandardErrorCode>,
    /// The code exactly as the processor sent it
    pub processor_error_code: Option<String>,
    pub test: bool,
    pub status: Option<TransactionStatus>,
    pub avs_result: Option<String>,
    pub cvv_result: Option<String>,
    pub http_status: Option<u16>,
    /// The processor reply as parsed data
    pub params: serde_json::Value,
    /// Individual calls that were folded into this response, in call order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<GatewayResponse>,
    /// Raw wire transcript, only present when transcript capture is on
    #[serde(skip)]
    pub transcript: Option<Secret<String>>,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn authorization_token(&self) -> Option<AuthorizationToken> {
        self.authorization.as_deref().map(AuthorizationToken::parse)
    }
}

/// An authorization string built from several identifiers, e.g. `customer|card`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationToken(Vec<String>);

impl AuthorizationToken {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parse(authorization: &str) -> Self {
        Self(
            authorization
                .split(AUTHORIZATION_DELIMITER)
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn part(&self, index: usize) -> Option<&str> {
        self.0
            .get(index)
            .map(String::as_str)
            .filter(|part| !part.is_empty())
    }

    pub fn first(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }
}

impl std::fmt::Display for AuthorizationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut delimiter = [0u8; 4];
        f.write_str(&self.0.join(AUTHORIZATION_DELIMITER.encode_utf8(&mut delimiter)))
    }
}

/// A chain of dependent gateway calls.
///
/// Steps run only while the chain is successful, so the first failure short-circuits
/// the rest. The primary response decides the outcome: normally the latest one, or with
/// `use_first_response` the first successful one.
#[derive(Debug, Clone, Default)]
pub struct MultiResponse {
    responses: Vec<GatewayResponse>,
    primary: Option<usize>,
    use_first_response: bool,
}

impl MultiResponse {
    pub fn run(use_first_response: bool) -> Self {
        Self {
            use_first_response,
            ..Self::default()
        }
    }

    /// Runs `step` if the chain is still successful and makes its response count.
    pub async fn process<F, Fut, E>(&mut self, step: F) -> Result<(), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<GatewayResponse, E>>,
    {
        if self.is_success() {
            let response = step().await?;
            self.push(response, false);
        }
        Ok(())
    }

    /// Runs `step` if the chain is still successful but keeps its response out of the
    /// outcome, e.g. the void that follows a verification authorize.
    pub async fn process_ignoring_result<F, Fut, E>(&mut self, step: F) -> Result<(), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<GatewayResponse, E>>,
    {
        if self.is_success() {
            let response = step().await?;
            self.push(response, true);
        }
        Ok(())
    }

    pub fn push(&mut self, response: GatewayResponse, ignore_result: bool) {
        let succeeded = response.success;
        self.responses.push(response);
        if ignore_result {
            return;
        }
        let index = self.responses.len() - 1;
        if self.use_first_response && succeeded {
            self.primary.get_or_insert(index);
        } else {
            self.primary = Some(index);
        }
    }

    pub fn primary_response(&self) -> Option<&GatewayResponse> {
        self.primary.and_then(|index| self.responses.get(index))
    }

    pub fn responses(&self) -> &[GatewayResponse] {
        &self.responses
    }

    /// An empty chain, or one whose steps were all ignored, counts as successful.
    pub fn is_success(&self) -> bool {
        self.primary_response()
            .map_or(true, |response| response.success)
    }

    /// Folds the chain into one response carrying the primary outcome, every step, and
    /// the transcripts of all steps joined in call order. A chain of a single call is just
    /// that call's response.
    pub fn into_response(mut self) -> GatewayResponse {
        if self.responses.len() == 1 && self.primary == Some(0) {
            if let Some(response) = self.responses.pop() {
                return response;
            }
        }
        let success = self.is_success();
        let transcript = self
            .responses
            .iter()
            .filter_map(|response| response.transcript.as_ref())
            .map(|transcript| transcript.peek().as_str())
            .collect::<Vec<_>>()
            .join("");
        let mut response = self.primary_response().cloned().unwrap_or(GatewayResponse {
            success,
            ..GatewayResponse::default()
        });
        response.transcript = (!transcript.is_empty()).then(|| Secret::new(transcript));
        response.responses = self.responses;
        response
    }
}
