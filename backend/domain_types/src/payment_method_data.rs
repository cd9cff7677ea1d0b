use common_enums::CardNetwork;
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use crate::{errors, utils::missing_field_err};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PaymentMethodData {
    Card(Card),
    /// A reusable authorization token previously returned by `store`.
    Token(Secret<String>),
}

impl PaymentMethodData {
    pub fn get_card(&self) -> Result<&Card, error_stack::Report<errors::ConnectorError>> {
        match self {
            Self::Card(card) => Ok(card),
            Self::Token(_) => Err(missing_field_err("payment_method_data.card")()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Card {
    pub card_number: Secret<String>,
    pub card_exp_month: Secret<String>,
    pub card_exp_year: Secret<String>,
    pub card_cvc: Secret<String>,
    pub card_holder_name: Option<Secret<String>>,
    pub card_network: Option<CardNetwork>,
}

impl Card {
    pub fn new(
        number: impl Into<String>,
        exp_month: impl Into<String>,
        exp_year: impl Into<String>,
        cvc: impl Into<String>,
    ) -> Self {
        Self {
            card_number: Secret::new(number.into()),
            card_exp_month: Secret::new(exp_month.into()),
            card_exp_year: Secret::new(exp_year.into()),
            card_cvc: Secret::new(cvc.into()),
            card_holder_name: None,
            card_network: None,
        }
    }

    pub fn with_holder_name(mut self, name: impl Into<String>) -> Self {
        self.card_holder_name = Some(Secret::new(name.into()));
        self
    }

    /// Card number with separators removed.
    pub fn get_card_number(&self) -> Secret<String> {
        Secret::new(
            self.card_number
                .peek()
                .chars()
                .filter(char::is_ascii_digit)
                .collect(),
        )
    }

    pub fn get_card_network(&self) -> CardNetwork {
        self.card_network
            .unwrap_or_else(|| CardNetwork::from_card_number(self.card_number.peek()))
    }

    pub fn get_card_expiry_month_2_digit(&self) -> Secret<String> {
        Secret::new(format!("{:0>2}", self.card_exp_month.peek().trim()))
    }

    pub fn get_expiry_year_4_digit(&self) -> Secret<String> {
        let year = self.card_exp_year.peek().trim();
        Secret::new(if year.len() == 2 {
            format!("20{year}")
        } else {
            year.to_string()
        })
    }

    pub fn get_card_expiry_year_2_digit(&self) -> Secret<String> {
        let year = self.get_expiry_year_4_digit();
        let year = year.peek();
        Secret::new(year.get(year.len().saturating_sub(2)..).unwrap_or_default().to_string())
    }

    /// `MMYY`, as form-based processors expect it
    pub fn get_expiry_date_as_mmyy(&self) -> Secret<String> {
        Secret::new(format!(
            "{}{}",
            self.get_card_expiry_month_2_digit().peek(),
            self.get_card_expiry_year_2_digit().peek()
        ))
    }

    pub fn get_card_holder_name(&self) -> Result<Secret<String>, error_stack::Report<errors::ConnectorError>> {
        self.card_holder_name
            .clone()
            .ok_or_else(missing_field_err("payment_method_data.card.card_holder_name"))
    }

    /// First word of the holder name
    pub fn get_first_name(&self) -> Option<Secret<String>> {
        self.card_holder_name.as_ref().and_then(|name| {
            name.peek()
                .split_whitespace()
                .next()
                .map(|first| Secret::new(first.to_string()))
        })
    }

    /// Everything after the first word of the holder name
    pub fn get_last_name(&self) -> Option<Secret<String>> {
        self.card_holder_name.as_ref().and_then(|name| {
            let mut parts = name.peek().split_whitespace();
            parts.next();
            let rest = parts.collect::<Vec<_>>().join(" ");
            (!rest.is_empty()).then(|| Secret::new(rest))
        })
    }

    pub fn last_four(&self) -> String {
        let number = self.get_card_number();
        let number = number.peek();
        number
            .get(number.len().saturating_sub(4)..)
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn formats_expiry_variants() {
        let card = Card::new("4111 1111 1111 1111", "3", "30", "737");
        assert_eq!(card.get_card_expiry_month_2_digit().peek(), "03");
        assert_eq!(card.get_expiry_year_4_digit().peek(), "2030");
        assert_eq!(card.get_card_expiry_year_2_digit().peek(), "30");
        assert_eq!(card.get_expiry_date_as_mmyy().peek(), "0330");
        assert_eq!(card.get_card_number().peek(), "4111111111111111");
        assert_eq!(card.last_four(), "1111");
        assert_eq!(card.get_card_network(), CardNetwork::Visa);
    }

    #[test]
    fn splits_holder_name() {
        let card = Card::new("5555555555554444", "12", "2031", "123").with_holder_name("Ada M Lovelace");
        assert_eq!(card.get_first_name().unwrap().peek(), "Ada");
        assert_eq!(card.get_last_name().unwrap().peek(), "M Lovelace");
        assert!(Card::new("1", "1", "1", "1").get_card_holder_name().is_err());
    }

    #[test]
    fn token_has_no_card() {
        let pm = PaymentMethodData::Token(Secret::new("cus_1|pm_1".to_string()));
        assert!(pm.get_card().is_err());
    }
}
