use std::{io::Read, sync::Arc};

use clap::Parser;
use composite_service::Gateway;
use domain_types::gateway_response::GatewayResponse;
use error_stack::{report, ResultExt};
use gateway_cli::{
    cli::{Cli, Command},
    configs,
    error::{CliError, ConfigurationError},
    logger,
};

#[tokio::main]
async fn main() -> error_stack::Result<(), CliError> {
    let cli = Cli::parse();
    let config = configs::Config::new_with_config_path(cli.config.clone())
        .change_context(ConfigurationError::LoadFailed)
        .change_context(CliError::Configuration)?;
    let _guard = logger::setup(
        &config.log,
        ["gateway-cli", "composite_service", "external_services", "connector_integration"],
    );

    let auth = match cli.command {
        // scrubbing only needs the connector's rules
        Command::Scrub { .. } => Default::default(),
        _ => config
            .credentials(cli.connector)
            .change_context(CliError::Configuration)?,
    };
    let gateway = Gateway::new(cli.connector, auth, Arc::new(config.gateway_config()));
    tracing::debug!(connector = %cli.connector, "gateway ready");

    let response = match cli.command {
        Command::Purchase(charge) => {
            let money = charge.money();
            let payment_method = charge
                .source
                .into_payment_method()
                .ok_or_else(|| report!(CliError::Configuration))?;
            gateway
                .purchase(money, &payment_method, &charge.options.into())
                .await
        }
        Command::Authorize(charge) => {
            let money = charge.money();
            let payment_method = charge
                .source
                .into_payment_method()
                .ok_or_else(|| report!(CliError::Configuration))?;
            gateway
                .authorize(money, &payment_method, &charge.options.into())
                .await
        }
        Command::Capture(modify) => {
            gateway
                .capture(modify.money(), &modify.authorization, &modify.options.into())
                .await
        }
        Command::Refund(modify) => {
            gateway
                .refund(modify.money(), &modify.authorization, &modify.options.into())
                .await
        }
        Command::Void {
            authorization,
            options,
        } => gateway.void(&authorization, &options.into()).await,
        Command::Store { card, options } => gateway.store(&card.into(), &options.into()).await,
        Command::Verify { card, options } => gateway.verify(&card.into(), &options.into()).await,
        Command::Scrub { file } => {
            let transcript = match file {
                Some(path) => std::fs::read_to_string(path),
                None => {
                    let mut transcript = String::new();
                    std::io::stdin()
                        .read_to_string(&mut transcript)
                        .map(|_| transcript)
                }
            }
            .change_context(CliError::TranscriptUnreadable)?;
            let scrubbed = gateway
                .scrub(&transcript)
                .change_context(CliError::Gateway)?;
            print_out(&scrubbed);
            return Ok(());
        }
    }
    .change_context(CliError::Gateway)?;

    print_response(&response, &gateway)
}

/// Prints the response as JSON, followed by its scrubbed transcript when one was recorded.
fn print_response(response: &GatewayResponse, gateway: &Gateway) -> error_stack::Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(response).change_context(CliError::Output)?;
    print_out(&rendered);

    if let Some(transcript) = &response.transcript {
        use hyperswitch_masking::PeekInterface;

        let scrubbed = gateway
            .scrub(transcript.peek())
            .change_context(CliError::Output)?;
        print_err(&scrubbed);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_out(text: &str) {
    println!("{text}");
}

#[allow(clippy::print_stderr)]
fn print_err(text: &str) {
    eprintln!("{text}");
}
