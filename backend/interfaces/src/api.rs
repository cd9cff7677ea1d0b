use common_enums::CurrencyUnit;
use common_utils::{
    consts,
    errors::CustomResult,
    scrubber::{ScrubRule, Scrubber},
};
use domain_types::{
    errors, router_data::ConnectorAuthType, router_data::ErrorResponse,
    router_response_types::Response, types::Connectors,
};
use error_stack::ResultExt;
use hyperswitch_masking::Maskable;

/// The trait that provides the common
pub trait ConnectorCommon {
    /// Name of the connector (in lowercase).
    fn id(&self) -> &'static str;

    /// Connector accepted currency unit as either "Base" or "Minor"
    fn get_currency_unit(&self) -> CurrencyUnit {
        CurrencyUnit::Minor
    }

    /// HTTP header used for authorization.
    fn get_auth_header(
        &self,
        _auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        Ok(Vec::new())
    }

    /// HTTP `Content-Type` to be used for POST requests.
    /// Defaults to `application/json`.
    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    /// The base URL for interacting with the connector's API.
    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str;

    /// common error response for a connector if it is same in all case
    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        Ok(ErrorResponse {
            status_code: res.status_code,
            code: consts::NO_ERROR_CODE.to_string(),
            message: consts::NO_ERROR_MESSAGE.to_string(),
            reason: None,
            attempt_status: None,
            connector_transaction_id: None,
            standard_code: None,
        })
    }

    /// Fields redacted from wire transcripts, applied in order.
    fn scrub_rules(&self) -> &'static [ScrubRule] {
        &[]
    }

    fn supports_scrubbing(&self) -> bool {
        !self.scrub_rules().is_empty()
    }

    /// Redacts card data and credentials from a captured transcript.
    fn scrub(&self, transcript: &str) -> CustomResult<String, errors::ConnectorError> {
        let scrubber = Scrubber::new(self.scrub_rules())
            .change_context(errors::ConnectorError::ScrubbingFailed)
            .attach_printable_lazy(|| format!("invalid scrub rule for {}", self.id()))?;
        Ok(scrubber.scrub(transcript))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Plain;

    impl ConnectorCommon for Plain {
        fn id(&self) -> &'static str {
            "plain"
        }

        fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
            connectors.adyen.base_url.as_ref()
        }
    }

    struct Redacting;

    impl ConnectorCommon for Redacting {
        fn id(&self) -> &'static str {
            "redacting"
        }

        fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
            connectors.nmi.base_url.as_ref()
        }

        fn scrub_rules(&self) -> &'static [ScrubRule] {
            &[ScrubRule::FormField("ccnumber"), ScrubRule::Header("Authorization")]
        }
    }

    #[test]
    fn connector_without_rules_does_not_scrub() {
        assert!(!Plain.supports_scrubbing());
        assert_eq!(Plain.scrub("<- ccnumber=4111").unwrap(), "<- ccnumber=4111");
    }

    #[test]
    fn declared_rules_are_applied() {
        let transcript = "<- Authorization: Basic abc\n<- ccnumber=4111111111111111&cvv=123\n";
        assert!(Redacting.supports_scrubbing());
        assert_eq!(
            Redacting.scrub(transcript).unwrap(),
            "<- Authorization: [FILTERED]\n<- ccnumber=[FILTERED]&cvv=123\n"
        );
    }

    #[test]
    fn default_error_response_keeps_status() {
        let response = Response {
            headers: None,
            response: bytes::Bytes::from_static(b"oops"),
            status_code: 418,
        };
        let error = Plain.build_error_response(response).unwrap();
        assert_eq!(error.status_code, 418);
        assert_eq!(error.code, consts::NO_ERROR_CODE);
    }
}
