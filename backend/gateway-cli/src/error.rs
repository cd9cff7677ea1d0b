use domain_types::connector_types::ConnectorEnum;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration")]
    LoadFailed,
    #[error("No credentials configured for {0}")]
    MissingCredentials(ConnectorEnum),
}

/// Why a command exited without printing a response.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid configuration")]
    Configuration,
    #[error("Gateway call did not complete")]
    Gateway,
    #[error("Failed to read the transcript")]
    TranscriptUnreadable,
    #[error("Failed to render the response")]
    Output,
}
