/// Error code used when a gateway reply carries no code of its own
pub const NO_ERROR_CODE: &str = "No error code";
/// Error message used when a gateway reply carries no message of its own
pub const NO_ERROR_MESSAGE: &str = "No error message";

/// Prefix for environment variable overrides of the configuration
pub const ENV_PREFIX: &str = "GATEWAY";

/// Replacement written over every scrubbed value
pub const FILTERED: &str = "[FILTERED]";

/// Delimiter joining the parts of a composite authorization token
pub const AUTHORIZATION_DELIMITER: char = '|';

/// Runtime environment. Every environment other than production talks to sandbox
/// endpoints, so responses produced there are flagged as test responses.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Env {
    #[default]
    Development,
    Sandbox,
    Production,
}

impl Env {
    /// Reads `GATEWAY__ENV`, falling back to development.
    pub fn current_env() -> Self {
        std::env::var(format!("{ENV_PREFIX}__ENV"))
            .ok()
            .and_then(|env| env.parse().ok())
            .unwrap_or_default()
    }

    pub const fn config_path(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Sandbox => "sandbox.toml",
            Self::Production => "production.toml",
        }
    }

    pub const fn is_test_mode(self) -> bool {
        !matches!(self, Self::Production)
    }
}
