//! Amount representations used across connectors

use common_enums::enums;
use error_stack::ResultExt;
use serde::{Deserialize, Serialize};

use crate::errors::ParsingError;

/// Amount convertor trait for connector
pub trait AmountConvertor: Send {
    /// Output type for the connector
    type Output;
    /// helps in conversion of connector required amount type
    fn convert(
        &self,
        amount: MinorUnit,
        currency: enums::Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>>;

    /// helps in converting back connector required amount type to core minor unit
    fn convert_back(
        &self,
        amount: Self::Output,
        currency: enums::Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>>;
}

/// Connector required amount type
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct StringMinorUnitForConnector;

impl AmountConvertor for StringMinorUnitForConnector {
    type Output = StringMinorUnit;
    fn convert(
        &self,
        amount: MinorUnit,
        _currency: enums::Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        Ok(StringMinorUnit(amount.0.to_string()))
    }

    fn convert_back(
        &self,
        amount: Self::Output,
        _currency: enums::Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        amount
            .0
            .parse::<i64>()
            .map(MinorUnit)
            .change_context(ParsingError::AmountParseFailure(amount.0))
    }
}

/// Connector required amount type
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct StringMajorUnitForConnector;

impl AmountConvertor for StringMajorUnitForConnector {
    type Output = StringMajorUnit;
    fn convert(
        &self,
        amount: MinorUnit,
        currency: enums::Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        amount.to_major_unit_as_string(currency)
    }

    fn convert_back(
        &self,
        amount: StringMajorUnit,
        currency: enums::Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        amount.to_minor_unit(currency)
    }
}

/// Connector required amount type
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct FloatMajorUnitForConnector;

impl AmountConvertor for FloatMajorUnitForConnector {
    type Output = FloatMajorUnit;
    fn convert(
        &self,
        amount: MinorUnit,
        currency: enums::Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        Ok(amount.to_major_unit_as_f64(currency))
    }

    fn convert_back(
        &self,
        amount: FloatMajorUnit,
        currency: enums::Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        amount.to_minor_unit(currency)
    }
}

/// Connector required amount type
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct MinorUnitForConnector;

impl AmountConvertor for MinorUnitForConnector {
    type Output = MinorUnit;
    fn convert(
        &self,
        amount: MinorUnit,
        _currency: enums::Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        Ok(amount)
    }

    fn convert_back(
        &self,
        amount: MinorUnit,
        _currency: enums::Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        Ok(amount)
    }
}

/// This Unit struct represents MinorUnit in which core amount works
#[derive(Default, Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MinorUnit(pub i64);

impl MinorUnit {
    /// gets amount as i64 value
    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }

    /// forms a new minor default unit i.e zero
    pub fn zero() -> Self {
        Self(0)
    }

    /// forms a new minor unit from amount
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    fn scale(currency: enums::Currency) -> i64 {
        10_i64.pow(u32::from(currency.number_of_digits_after_decimal_point()))
    }

    /// Renders the amount with exactly as many decimals as the currency has,
    /// e.g. 1000 USD becomes "10.00" and 1000 JPY stays "1000"
    pub fn to_major_unit_as_string(
        self,
        currency: enums::Currency,
    ) -> Result<StringMajorUnit, error_stack::Report<ParsingError>> {
        let digits = usize::from(currency.number_of_digits_after_decimal_point());
        let scale = Self::scale(currency);
        let sign = if self.0 < 0 { "-" } else { "" };
        let absolute = self.0.checked_abs().ok_or(ParsingError::AmountOverflow)?;
        let amount = if digits == 0 {
            format!("{sign}{absolute}")
        } else {
            format!(
                "{sign}{}.{:0digits$}",
                absolute / scale,
                absolute % scale,
                digits = digits
            )
        };
        Ok(StringMajorUnit(amount))
    }

    #[allow(clippy::as_conversions, clippy::cast_precision_loss)]
    pub fn to_major_unit_as_f64(self, currency: enums::Currency) -> FloatMajorUnit {
        FloatMajorUnit(self.0 as f64 / Self::scale(currency) as f64)
    }
}

impl std::fmt::Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add for MinorUnit {
    type Output = Self;
    fn add(self, a2: Self) -> Self {
        Self(self.0 + a2.0)
    }
}

/// Connector specific types to send
#[derive(Default, Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
#[serde(transparent)]
pub struct FloatMajorUnit(pub f64);

impl FloatMajorUnit {
    /// forms a new major unit with zero amount
    pub fn zero() -> Self {
        Self(0.0)
    }

    #[allow(clippy::as_conversions, clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn to_minor_unit(self, currency: enums::Currency) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        let scaled = (self.0 * MinorUnit::scale(currency) as f64).round();
        if !scaled.is_finite() || scaled.abs() > i64::MAX as f64 {
            return Err(error_stack::report!(ParsingError::AmountOverflow));
        }
        Ok(MinorUnit(scaled as i64))
    }
}

/// Connector specific types to send
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct StringMajorUnit(String);

impl StringMajorUnit {
    /// Converts to minor unit from StringMajorUnit
    fn to_minor_unit(
        &self,
        currency: enums::Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        let digits = usize::from(currency.number_of_digits_after_decimal_point());
        let parse_error = || ParsingError::AmountParseFailure(self.0.clone());
        let (negative, unsigned) = match self.0.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, self.0.as_str()),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if fraction.len() > digits {
            return Err(error_stack::report!(parse_error()));
        }
        let padded = format!("{whole}{fraction:0<digits$}", digits = digits);
        let value = padded.parse::<i64>().change_context_lazy(parse_error)?;
        Ok(MinorUnit(if negative { -value } else { value }))
    }

    /// Get string amount from struct to be removed in future
    pub fn get_amount_as_string(&self) -> String {
        self.0.clone()
    }
}

/// Connector specific types to send
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct StringMinorUnit(String);

impl StringMinorUnit {
    pub fn get_amount_as_string(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use common_enums::enums::Currency;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1000, Currency::USD, "10.00")]
    #[case(5, Currency::USD, "0.05")]
    #[case(1000, Currency::JPY, "1000")]
    #[case(1234, Currency::KWD, "1.234")]
    #[case(-250, Currency::EUR, "-2.50")]
    fn renders_major_unit_strings(#[case] minor: i64, #[case] currency: Currency, #[case] expected: &str) {
        let converted = StringMajorUnitForConnector
            .convert(MinorUnit::new(minor), currency)
            .unwrap();
        assert_eq!(converted.get_amount_as_string(), expected);
        assert_eq!(
            StringMajorUnitForConnector
                .convert_back(converted, currency)
                .unwrap(),
            MinorUnit::new(minor)
        );
    }

    #[test]
    fn float_major_unit_uses_currency_exponent() {
        let amount = FloatMajorUnitForConnector
            .convert(MinorUnit::new(1050), Currency::USD)
            .unwrap();
        assert_eq!(amount, FloatMajorUnit(10.5));
        assert_eq!(
            FloatMajorUnitForConnector
                .convert_back(FloatMajorUnit(0.1 + 0.2), Currency::USD)
                .unwrap(),
            MinorUnit::new(30)
        );
    }

    #[test]
    fn rejects_excess_precision() {
        let amount = StringMajorUnit("1.005".to_string());
        assert!(StringMajorUnitForConnector
            .convert_back(amount, Currency::USD)
            .is_err());
    }
}
