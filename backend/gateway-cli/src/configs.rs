use std::{collections::HashMap, path::PathBuf};

use common_utils::consts;
use composite_service::GatewayConfig;
use domain_types::{
    connector_types::ConnectorEnum,
    router_data::ConnectorAuthType,
    types::{Connectors, Proxy},
};
use error_stack::report;

use crate::{error::ConfigurationError, logger::config::Log};

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Config {
    pub common: Common,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub proxy: Proxy,
    pub connectors: Connectors,
    #[serde(default)]
    pub credentials: HashMap<ConnectorEnum, ConnectorAuthType>,
    #[serde(default)]
    pub gateway: GatewaySettings,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Common {
    pub environment: consts::Env,
}

#[derive(Clone, serde::Deserialize, Debug, Default)]
#[serde(default)]
pub struct GatewaySettings {
    /// Attach the raw wire transcript to every response
    pub record_transcripts: bool,
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::new_with_config_path(None)
    }

    /// Layers the TOML file for the current environment, or `explicit_config_path`, under
    /// `GATEWAY__*` environment variables.
    pub fn new_with_config_path(
        explicit_config_path: Option<PathBuf>,
    ) -> Result<Self, config::ConfigError> {
        let env = consts::Env::current_env();
        let config_path = Self::config_path(env, explicit_config_path);

        let config = Self::builder(env)?
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(consts::ENV_PREFIX)
                    .try_parsing(true)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("proxy.bypass_proxy_urls"),
            )
            .build()?;

        #[allow(clippy::print_stderr)]
        let config: Self = serde_path_to_error::deserialize(config).map_err(|error| {
            eprintln!("Unable to deserialize gateway configuration: {error}");
            error.into_inner()
        })?;

        Ok(config)
    }

    pub fn builder(
        environment: consts::Env,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            // "env" is decided by GATEWAY__ENV alone, files cannot change it
            .set_override("env", environment.to_string())?
            .set_default("common.environment", environment.to_string())
    }

    pub fn config_path(environment: consts::Env, explicit_config_path: Option<PathBuf>) -> PathBuf {
        explicit_config_path.unwrap_or_else(|| {
            let mut config_path = workspace_path();
            config_path.push("config");
            config_path.push(environment.config_path());
            config_path
        })
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            connectors: self.connectors.clone(),
            proxy: self.proxy.clone(),
            test_mode: self.common.environment.is_test_mode(),
            record_transcripts: self.gateway.record_transcripts,
        }
    }

    pub fn credentials(
        &self,
        connector: ConnectorEnum,
    ) -> error_stack::Result<ConnectorAuthType, ConfigurationError> {
        self.credentials
            .get(&connector)
            .cloned()
            .ok_or_else(|| report!(ConfigurationError::MissingCredentials(connector)))
    }
}

pub fn workspace_path() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let mut path = PathBuf::from(manifest_dir);
        path.pop();
        path.pop();
        path
    } else {
        PathBuf::from(".")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hyperswitch_masking::PeekInterface;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    fn development() -> Config {
        let path = workspace_path().join("config").join("development.toml");
        Config::new_with_config_path(Some(path)).unwrap()
    }

    #[test]
    #[serial]
    fn development_file_points_at_sandboxes() {
        let config = development();
        assert_eq!(config.common.environment, consts::Env::Development);
        assert_eq!(
            config.connectors.adyen.base_url,
            "https://checkout-test.adyen.com/"
        );
        assert!(config.connectors.square.secondary_base_url.is_some());

        let gateway = config.gateway_config();
        assert!(gateway.test_mode);
    }

    #[test]
    #[serial]
    fn credentials_come_from_the_environment() {
        std::env::set_var("GATEWAY__CREDENTIALS__NMI__AUTH_TYPE", "HeaderKey");
        std::env::set_var("GATEWAY__CREDENTIALS__NMI__API_KEY", "6457Thfj624V5r7WUwc5v6a68Zsd6YEm");
        let config = development();
        std::env::remove_var("GATEWAY__CREDENTIALS__NMI__AUTH_TYPE");
        std::env::remove_var("GATEWAY__CREDENTIALS__NMI__API_KEY");

        match config.credentials(ConnectorEnum::Nmi).unwrap() {
            ConnectorAuthType::HeaderKey { api_key } => {
                assert_eq!(api_key.peek(), "6457Thfj624V5r7WUwc5v6a68Zsd6YEm");
            }
            other => panic!("unexpected credentials: {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn missing_credentials_name_the_connector() {
        let error = development()
            .credentials(ConnectorEnum::Worldpay)
            .unwrap_err();
        assert_eq!(
            error.current_context().to_string(),
            "No credentials configured for worldpay"
        );
    }
}
