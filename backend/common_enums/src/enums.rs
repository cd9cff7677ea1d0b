/// Status of a payment attempt as reported back by a gateway.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Hash,
    Eq,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttemptStatus {
    Started,
    Authorized,
    AuthorizationFailed,
    Charged,
    Voided,
    CaptureFailed,
    VoidFailed,
    #[default]
    Pending,
    Failure,
}

impl AttemptStatus {
    /// Whether the gateway accepted the operation. Pending counts as accepted since the
    /// processor has taken the request and returned a reference for it.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Authorized | Self::Charged | Self::Voided
        )
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RefundStatus {
    Success,
    #[default]
    Pending,
    Failure,
}

impl RefundStatus {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::Pending)
    }
}

/// Processor-neutral reason for a failed operation. Every adapter maps its own decline and
/// error codes onto this set.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StandardErrorCode {
    IncorrectNumber,
    InvalidNumber,
    InvalidExpiryDate,
    InvalidCvc,
    ExpiredCard,
    IncorrectCvc,
    IncorrectZip,
    IncorrectAddress,
    CardDeclined,
    CallIssuer,
    PickupCard,
    ProcessingError,
    ConfigError,
    TestModeLiveCard,
}

impl StandardErrorCode {
    /// Used when a processor code has no mapping of its own.
    pub fn from_http_status(status_code: u16) -> Self {
        match status_code {
            401 | 403 => Self::ConfigError,
            _ => Self::ProcessingError,
        }
    }
}

/// Specifies how the payment is captured.
/// - `automatic`: funds are captured as part of the authorization.
/// - `manual`: funds are only held; a separate capture call settles them.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaptureMethod {
    #[default]
    Automatic,
    Manual,
}

/// Connector accepted currency unit as either "Base" or "Minor"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyUnit {
    /// Base currency unit
    Base,
    /// Minor currency unit
    Minor,
}

#[allow(clippy::upper_case_acronyms)]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Currency {
    AED,
    AUD,
    BHD,
    BRL,
    CAD,
    CHF,
    CLP,
    CNY,
    CZK,
    DKK,
    EUR,
    GBP,
    HKD,
    INR,
    JOD,
    JPY,
    KRW,
    KWD,
    MXN,
    NOK,
    NZD,
    OMR,
    PLN,
    SEK,
    SGD,
    TND,
    #[default]
    USD,
    VND,
    ZAR,
}

impl Currency {
    pub fn is_zero_decimal_currency(self) -> bool {
        matches!(self, Self::CLP | Self::JPY | Self::KRW | Self::VND)
    }

    pub fn is_three_decimal_currency(self) -> bool {
        matches!(
            self,
            Self::BHD | Self::JOD | Self::KWD | Self::OMR | Self::TND
        )
    }

    pub fn number_of_digits_after_decimal_point(self) -> u8 {
        if self.is_zero_decimal_currency() {
            0
        } else if self.is_three_decimal_currency() {
            3
        } else {
            2
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CardNetwork {
    Visa,
    Mastercard,
    AmericanExpress,
    Discover,
    #[allow(clippy::upper_case_acronyms)]
    JCB,
    DinersClub,
    #[default]
    Unknown,
}

impl CardNetwork {
    /// Detects the network from the leading digits of a card number. Non-digit
    /// characters such as spaces are ignored.
    pub fn from_card_number(number: &str) -> Self {
        let digits: String = number.chars().filter(char::is_ascii_digit).collect();
        let prefix = |len: usize| -> u32 {
            digits
                .get(..len)
                .and_then(|p| p.parse().ok())
                .unwrap_or_default()
        };

        match (prefix(1), prefix(2), prefix(3), prefix(4), prefix(6)) {
            (4, ..) => Self::Visa,
            (_, 34 | 37, ..) => Self::AmericanExpress,
            (_, 51..=55, ..) | (.., 222_100..=272_099) => Self::Mastercard,
            (_, 36 | 38 | 39, ..) | (_, _, 300..=305, ..) => Self::DinersClub,
            (_, 65, ..) | (.., 6011, _) | (_, _, 644..=649, ..) => Self::Discover,
            (.., 3528..=3589, _) => Self::JCB,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("4111111111111111", CardNetwork::Visa)]
    #[case("5555 5555 5555 4444", CardNetwork::Mastercard)]
    #[case("2223000048400011", CardNetwork::Mastercard)]
    #[case("378282246310005", CardNetwork::AmericanExpress)]
    #[case("6011111111111117", CardNetwork::Discover)]
    #[case("3530111333300000", CardNetwork::JCB)]
    #[case("36227206271667", CardNetwork::DinersClub)]
    #[case("9999", CardNetwork::Unknown)]
    #[case("", CardNetwork::Unknown)]
    fn detects_card_network(#[case] number: &str, #[case] expected: CardNetwork) {
        assert_eq!(CardNetwork::from_card_number(number), expected);
    }

    #[test]
    fn currency_exponents() {
        assert_eq!(Currency::USD.number_of_digits_after_decimal_point(), 2);
        assert_eq!(Currency::JPY.number_of_digits_after_decimal_point(), 0);
        assert_eq!(Currency::KWD.number_of_digits_after_decimal_point(), 3);
    }

    #[test]
    fn pending_attempts_count_as_success() {
        assert!(AttemptStatus::Pending.is_success());
        assert!(!AttemptStatus::AuthorizationFailed.is_success());
        assert_eq!(AttemptStatus::Charged.to_string(), "charged");
    }

    #[rstest]
    #[case(401, StandardErrorCode::ConfigError)]
    #[case(403, StandardErrorCode::ConfigError)]
    #[case(422, StandardErrorCode::ProcessingError)]
    #[case(503, StandardErrorCode::ProcessingError)]
    fn unmapped_codes_fall_back_on_the_http_status(
        #[case] status_code: u16,
        #[case] expected: StandardErrorCode,
    ) {
        assert_eq!(StandardErrorCode::from_http_status(status_code), expected);
    }

    #[test]
    fn error_codes_use_snake_case_names() {
        assert_eq!(StandardErrorCode::IncorrectCvc.to_string(), "incorrect_cvc");
        assert_eq!(
            "test_mode_live_card".parse::<StandardErrorCode>().ok(),
            Some(StandardErrorCode::TestModeLiveCard)
        );
    }
}
