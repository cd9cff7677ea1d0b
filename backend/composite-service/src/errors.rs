use domain_types::errors::ConnectorError;

pub type GatewayResult<T> = error_stack::Result<T, GatewayError>;

/// Failures that stop an operation before the processor gave an answer.
///
/// A processor decline is not one of these: it comes back as an unsuccessful
/// [`GatewayResponse`](domain_types::gateway_response::GatewayResponse).
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum GatewayError {
    #[error("{operation} is not supported by {connector}")]
    NotSupported {
        operation: &'static str,
        connector: &'static str,
    },
    #[error("Invalid {operation} request: {reason}")]
    InvalidRequest {
        operation: &'static str,
        reason: String,
    },
    #[error("Failed to reach {connector} during {operation}")]
    ConnectionFailed {
        operation: &'static str,
        connector: &'static str,
    },
    #[error("Unreadable reply from {connector} during {operation}")]
    InvalidResponse {
        operation: &'static str,
        connector: &'static str,
    },
    #[error("Failed to scrub transcript")]
    ScrubbingFailed,
}

impl GatewayError {
    pub(crate) fn from_connector_error(
        error: &ConnectorError,
        operation: &'static str,
        connector: &'static str,
    ) -> Self {
        match error {
            ConnectorError::NotSupported { .. }
            | ConnectorError::FlowNotSupported { .. }
            | ConnectorError::NotImplemented(_) => Self::NotSupported {
                operation,
                connector,
            },
            ConnectorError::ProcessingStepFailed(_) => Self::ConnectionFailed {
                operation,
                connector,
            },
            ConnectorError::ResponseDeserializationFailed
            | ConnectorError::ResponseHandlingFailed
            | ConnectorError::ParsingFailed => Self::InvalidResponse {
                operation,
                connector,
            },
            ConnectorError::ScrubbingFailed => Self::ScrubbingFailed,
            other => Self::InvalidRequest {
                operation,
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_fields_are_invalid_requests() {
        let error = GatewayError::from_connector_error(
            &ConnectorError::MissingRequiredField {
                field_name: "card_holder_name",
            },
            "purchase",
            "worldpay",
        );
        assert_eq!(
            error.to_string(),
            "Invalid purchase request: Missing required field: card_holder_name"
        );
    }

    #[test]
    fn unimplemented_flows_are_not_supported() {
        let error = GatewayError::from_connector_error(
            &ConnectorError::FlowNotSupported {
                flow: "Void".to_string(),
                connector: "square".to_string(),
            },
            "void",
            "square",
        );
        assert_eq!(
            error,
            GatewayError::NotSupported {
                operation: "void",
                connector: "square"
            }
        );
    }
}
