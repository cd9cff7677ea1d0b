use common_enums::Currency;
use common_utils::{
    consts,
    errors::CustomResult,
    types::{AmountConvertor, MinorUnit},
};
use domain_types::{
    errors, gateway_response::AuthorizationToken, router_data::ErrorResponse,
    router_response_types::Response,
};
use error_stack::{Report, ResultExt};
use serde_json::Value;

pub use domain_types::utils::missing_field_err;

type Error = Report<errors::ConnectorError>;

pub(crate) fn get_unimplemented_payment_method_error_message(connector: &str) -> String {
    format!("Selected payment method through {connector}")
}

pub(crate) fn convert_amount<T>(
    amount_convertor: &dyn AmountConvertor<Output = T>,
    amount: MinorUnit,
    currency: Currency,
) -> Result<T, Error> {
    amount_convertor
        .convert(amount, currency)
        .change_context(errors::ConnectorError::AmountConversionFailed)
}

/// Splits the authorization handed back by an earlier call and returns the part at `index`.
pub(crate) fn authorization_part(
    authorization: &str,
    index: usize,
    field_name: &'static str,
) -> Result<String, Error> {
    AuthorizationToken::parse(authorization)
        .part(index)
        .map(str::to_string)
        .ok_or_else(missing_field_err(field_name))
}

/// Used when an error body is not in the shape the connector documents.
pub(crate) fn handle_json_response_deserialization_failure(
    res: Response,
    _connector: &'static str,
) -> CustomResult<ErrorResponse, errors::ConnectorError> {
    let response_data = String::from_utf8(res.response.to_vec())
        .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;

    // check for whether the response is in json format
    match serde_json::from_str::<Value>(&response_data) {
        // in case of unexpected response but in json format
        Ok(_) => Err(errors::ConnectorError::ResponseDeserializationFailed)?,
        // in case of unexpected response but in html or string format
        Err(_error_msg) => Ok(ErrorResponse {
            status_code: res.status_code,
            code: consts::NO_ERROR_CODE.to_string(),
            message: "Unsupported response type".to_string(),
            reason: Some(response_data),
            attempt_status: None,
            connector_transaction_id: None,
            standard_code: None,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use common_utils::types::StringMajorUnitForConnector;

    use super::*;

    #[test]
    fn amount_conversion_honours_currency_exponent() {
        let jpy = convert_amount(&StringMajorUnitForConnector, MinorUnit::new(1500), Currency::JPY)
            .unwrap();
        assert_eq!(jpy.get_amount_as_string(), "1500");
        let kwd = convert_amount(&StringMajorUnitForConnector, MinorUnit::new(1500), Currency::KWD)
            .unwrap();
        assert_eq!(kwd.get_amount_as_string(), "1.500");
    }

    #[test]
    fn missing_authorization_part_is_reported() {
        assert_eq!(
            authorization_part("cus_1|pm_2", 1, "payment_method_id").unwrap(),
            "pm_2"
        );
        let error = authorization_part("cus_1", 1, "payment_method_id").unwrap_err();
        assert_eq!(
            error.current_context(),
            &errors::ConnectorError::MissingRequiredField {
                field_name: "payment_method_id"
            }
        );
    }

    #[test]
    fn html_error_body_becomes_error_response() {
        let response = Response {
            headers: None,
            response: bytes::Bytes::from_static(b"<html>Bad Gateway</html>"),
            status_code: 502,
        };
        let error = handle_json_response_deserialization_failure(response, "test").unwrap();
        assert_eq!(error.message, "Unsupported response type");
        assert_eq!(error.reason.as_deref(), Some("<html>Bad Gateway</html>"));
    }
}
