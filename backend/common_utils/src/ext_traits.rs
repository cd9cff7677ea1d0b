//!
//! This module holds traits for extending functionalities for existing datatypes
//! & inbuilt datatypes.
//!

use error_stack::ResultExt;
use serde::Deserialize;

use crate::errors::{self, CustomResult};

///
/// Extending functionalities of `bytes::Bytes`
///
pub trait BytesExt {
    ///
    /// Convert `bytes::Bytes` into type `<T>` using `serde::Deserialize`
    ///
    fn parse_struct<'de, T>(&'de self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: Deserialize<'de>;
}

impl BytesExt for bytes::Bytes {
    fn parse_struct<'de, T>(&'de self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: Deserialize<'de>,
    {
        use bytes::Buf;

        serde_json::from_slice::<T>(self.chunk())
            .change_context(errors::ParsingError::StructParseFailure(type_name))
            .attach_printable_lazy(|| format!("Unable to parse {type_name} from bytes"))
    }
}

///
/// Extending functionalities of `[u8]` for performing parsing
///
pub trait ByteSliceExt {
    ///
    /// Convert a JSON body into type `<T>`
    ///
    fn parse_struct<'de, T>(&'de self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: Deserialize<'de>;

    ///
    /// Convert an XML body into type `<T>`. A leading UTF-8 byte order mark is tolerated.
    ///
    fn parse_xml<T>(&self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: serde::de::DeserializeOwned;

    ///
    /// Convert an `application/x-www-form-urlencoded` body into type `<T>`
    ///
    fn parse_form<'de, T>(&'de self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: Deserialize<'de>;
}

impl ByteSliceExt for [u8] {
    fn parse_struct<'de, T>(&'de self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: Deserialize<'de>,
    {
        serde_json::from_slice(self)
            .change_context(errors::ParsingError::StructParseFailure(type_name))
            .attach_printable_lazy(|| format!("Unable to parse {type_name} from &[u8]"))
    }

    fn parse_xml<T>(&self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: serde::de::DeserializeOwned,
    {
        let body = std::str::from_utf8(self)
            .change_context(errors::ParsingError::StructParseFailure(type_name))?;
        quick_xml::de::from_str(body.trim_start_matches('\u{FEFF}'))
            .change_context(errors::ParsingError::StructParseFailure(type_name))
            .attach_printable_lazy(|| format!("Unable to parse {type_name} from xml"))
    }

    fn parse_form<'de, T>(&'de self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: Deserialize<'de>,
    {
        serde_urlencoded::from_bytes(self)
            .change_context(errors::ParsingError::StructParseFailure(type_name))
            .attach_printable_lazy(|| format!("Unable to parse {type_name} from form body"))
    }
}

///
/// Extending functionalities of `serde_json::Value` for performing parsing
///
pub trait ValueExt {
    ///
    /// Convert `serde_json::Value` into type `<T>` by using `serde::Deserialize`
    ///
    fn parse_value<T>(self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: serde::de::DeserializeOwned;
}

impl ValueExt for serde_json::Value {
    fn parse_value<T>(self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_value::<T>(self)
            .change_context(errors::ParsingError::StructParseFailure(type_name))
            .attach_printable_lazy(|| format!("Unable to parse {type_name} from serde_json::Value"))
    }
}

///
/// Extending functionalities of `Option`
///
pub trait OptionExt<T> {
    /// Returns the contained value or a `MissingRequiredField` report naming the field
    fn get_required_value(
        self,
        field_name: &'static str,
    ) -> CustomResult<T, errors::ValidationError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn get_required_value(
        self,
        field_name: &'static str,
    ) -> CustomResult<T, errors::ValidationError> {
        match self {
            Some(value) => Ok(value),
            None => Err(error_stack::report!(
                errors::ValidationError::MissingRequiredField {
                    field_name: field_name.to_string(),
                }
            ))
            .attach_printable(format!("Missing required field {field_name}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reply {
        response: String,
        transactionid: String,
    }

    #[test]
    fn parses_form_bodies() {
        let reply: Reply = b"response=1&transactionid=123&responsetext=SUCCESS"
            .as_slice()
            .parse_form("Reply")
            .unwrap();
        assert_eq!(reply.response, "1");
        assert_eq!(reply.transactionid, "123");
    }

    #[test]
    fn parse_failure_names_the_type() {
        let result: CustomResult<Reply, _> = b"{not json".as_slice().parse_struct("Reply");
        let report = result.unwrap_err();
        assert!(matches!(
            report.current_context(),
            errors::ParsingError::StructParseFailure("Reply")
        ));
    }

    #[test]
    fn missing_value_is_reported() {
        let err = None::<u8>.get_required_value("order_id").unwrap_err();
        assert_eq!(
            err.current_context(),
            &errors::ValidationError::MissingRequiredField {
                field_name: "order_id".to_string()
            }
        );
    }
}
