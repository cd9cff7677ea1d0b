use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use common_enums::Currency;
use common_utils::MinorUnit;
use composite_service::PaymentOptions;
use domain_types::{
    connector_types::ConnectorEnum,
    payment_method_data::{Card, PaymentMethodData},
    router_data::Address,
};
use hyperswitch_masking::Secret;

/// Run payment operations against a processor.
///
/// Credentials and endpoints are read from `config/<env>.toml` and `GATEWAY__*` variables.
#[derive(Debug, Parser)]
#[command(name = "gateway", version)]
pub struct Cli {
    /// Configuration file to use instead of the one picked by GATEWAY__ENV
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Processor to talk to, e.g. adyen or worldpay
    #[arg(short, long)]
    pub connector: ConnectorEnum,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authorize and capture in one step
    Purchase(ChargeArgs),
    /// Hold funds without capturing them
    Authorize(ChargeArgs),
    Capture(ModifyArgs),
    Refund(ModifyArgs),
    /// Release an authorization
    Void {
        #[arg(long)]
        authorization: String,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Keep a card on file and print the reusable authorization
    Store {
        #[command(flatten)]
        card: CardArgs,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Check a card with an authorization that is voided straight away
    Verify {
        #[command(flatten)]
        card: CardArgs,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Redact a transcript; reads stdin when no file is given
    Scrub { file: Option<PathBuf> },
}

#[derive(Debug, Args)]
pub struct ChargeArgs {
    /// Amount in minor units, e.g. 1050 for 10.50 USD
    #[arg(long)]
    pub amount: i64,
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub options: OptionArgs,
}

#[derive(Debug, Args)]
pub struct ModifyArgs {
    #[arg(long)]
    pub amount: i64,
    /// Authorization returned by the original payment
    #[arg(long)]
    pub authorization: String,
    #[command(flatten)]
    pub options: OptionArgs,
}

/// A card, or a token returned by `store`.
#[derive(Debug, Args)]
pub struct SourceArgs {
    #[arg(long, required_unless_present = "token", requires_all = ["exp_month", "exp_year", "cvc"])]
    pub number: Option<String>,
    #[arg(long)]
    pub exp_month: Option<String>,
    #[arg(long)]
    pub exp_year: Option<String>,
    #[arg(long)]
    pub cvc: Option<String>,
    #[arg(long)]
    pub holder: Option<String>,
    /// Stored card authorization
    #[arg(long, conflicts_with = "number")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CardArgs {
    #[arg(long)]
    pub number: String,
    #[arg(long)]
    pub exp_month: String,
    #[arg(long)]
    pub exp_year: String,
    #[arg(long)]
    pub cvc: String,
    #[arg(long)]
    pub holder: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct OptionArgs {
    #[arg(long)]
    pub order_id: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub customer_name: Option<String>,
    #[arg(long)]
    pub currency: Option<Currency>,
    #[arg(long)]
    pub ip: Option<String>,
    #[arg(long)]
    pub address_line1: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub zip: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    #[arg(long)]
    pub country: Option<String>,
    /// Extra `key=value` pairs passed to processors that accept metadata
    #[arg(long = "metadata", value_parser = parse_key_value)]
    pub metadata: Vec<(String, String)>,
}

fn parse_key_value(pair: &str) -> Result<(String, String), String> {
    pair.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected key=value, got `{pair}`"))
}

impl From<CardArgs> for PaymentMethodData {
    fn from(args: CardArgs) -> Self {
        let card = Card::new(args.number, args.exp_month, args.exp_year, args.cvc);
        Self::Card(match args.holder {
            Some(holder) => card.with_holder_name(holder),
            None => card,
        })
    }
}

impl SourceArgs {
    pub fn into_payment_method(self) -> Option<PaymentMethodData> {
        if let Some(token) = self.token {
            return Some(PaymentMethodData::Token(Secret::new(token)));
        }
        let card = CardArgs {
            number: self.number?,
            exp_month: self.exp_month?,
            exp_year: self.exp_year?,
            cvc: self.cvc?,
            holder: self.holder,
        };
        Some(card.into())
    }
}

impl ChargeArgs {
    pub fn money(&self) -> MinorUnit {
        MinorUnit::new(self.amount)
    }
}

impl ModifyArgs {
    pub fn money(&self) -> MinorUnit {
        MinorUnit::new(self.amount)
    }
}

impl From<OptionArgs> for PaymentOptions {
    fn from(args: OptionArgs) -> Self {
        let has_address = args.address_line1.is_some()
            || args.city.is_some()
            || args.zip.is_some()
            || args.country.is_some();
        let billing_address = has_address.then(|| Address {
            line1: args.address_line1.map(Secret::new),
            city: args.city,
            zip: args.zip.map(Secret::new),
            country: args.country,
            ..Address::default()
        });

        Self {
            order_id: args.order_id,
            description: args.description,
            email: args.email,
            customer_name: args.customer_name.map(Secret::new),
            billing_address,
            currency: args.currency,
            ip: args.ip,
            metadata: args
                .metadata
                .into_iter()
                .map(|(key, value)| (key, serde_json::Value::String(value)))
                .collect(),
        }
    }
}
