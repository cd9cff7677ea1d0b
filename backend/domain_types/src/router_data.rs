use common_utils::consts;
use hyperswitch_masking::{ExposeInterface, PeekInterface, Secret};

pub type Error = error_stack::Report<crate::errors::ConnectorError>;

/// Credentials for one processor. Each adapter accepts exactly one of these shapes.
#[derive(Default, Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(tag = "auth_type")]
pub enum ConnectorAuthType {
    HeaderKey {
        api_key: Secret<String>,
    },
    BodyKey {
        api_key: Secret<String>,
        key1: Secret<String>,
    },
    SignatureKey {
        api_key: Secret<String>,
        key1: Secret<String>,
        api_secret: Secret<String>,
    },
    MultiAuthKey {
        api_key: Secret<String>,
        key1: Secret<String>,
        api_secret: Secret<String>,
        key2: Secret<String>,
    },
    #[default]
    NoKey,
}

impl ConnectorAuthType {
    // show only first and last two digits of the key and mask others with *
    // mask the entire key if it's length is less than or equal to 4
    fn mask_key(key: &str) -> Secret<String> {
        let key_len = key.chars().count();
        let masked_key = if key_len <= 4 {
            "*".repeat(key_len)
        } else {
            key.chars()
                .enumerate()
                .map(|(index, character)| {
                    if index < 2 || index >= key_len - 2 {
                        character
                    } else {
                        '*'
                    }
                })
                .collect()
        };
        Secret::new(masked_key)
    }

    // Mask the keys in the auth_type
    pub fn get_masked_keys(&self) -> Self {
        let mask = |secret: &Secret<String>| Self::mask_key(secret.peek());
        match self {
            Self::NoKey => Self::NoKey,
            Self::HeaderKey { api_key } => Self::HeaderKey {
                api_key: mask(api_key),
            },
            Self::BodyKey { api_key, key1 } => Self::BodyKey {
                api_key: mask(api_key),
                key1: mask(key1),
            },
            Self::SignatureKey {
                api_key,
                key1,
                api_secret,
            } => Self::SignatureKey {
                api_key: mask(api_key),
                key1: mask(key1),
                api_secret: mask(api_secret),
            },
            Self::MultiAuthKey {
                api_key,
                key1,
                api_secret,
                key2,
            } => Self::MultiAuthKey {
                api_key: mask(api_key),
                key1: mask(key1),
                api_secret: mask(api_secret),
                key2: mask(key2),
            },
        }
    }

    /// Every credential value, used to build transcript rules for credentials that do
    /// not sit in a well-known field.
    pub fn secret_values(&self) -> Vec<String> {
        match self.clone() {
            Self::NoKey => Vec::new(),
            Self::HeaderKey { api_key } => vec![api_key.expose()],
            Self::BodyKey { api_key, key1 } => vec![api_key.expose(), key1.expose()],
            Self::SignatureKey {
                api_key,
                key1,
                api_secret,
            } => vec![api_key.expose(), key1.expose(), api_secret.expose()],
            Self::MultiAuthKey {
                api_key,
                key1,
                api_secret,
                key2,
            } => vec![
                api_key.expose(),
                key1.expose(),
                api_secret.expose(),
                key2.expose(),
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub reason: Option<String>,
    pub status_code: u16,
    pub attempt_status: Option<common_enums::AttemptStatus>,
    pub connector_transaction_id: Option<String>,
    /// `code` translated by the adapter, when it knows the code
    pub standard_code: Option<common_enums::StandardErrorCode>,
}

impl Default for ErrorResponse {
    fn default() -> Self {
        Self {
            code: consts::NO_ERROR_CODE.to_string(),
            message: consts::NO_ERROR_MESSAGE.to_string(),
            reason: None,
            status_code: 500,
            attempt_status: None,
            connector_transaction_id: None,
            standard_code: None,
        }
    }
}

impl ErrorResponse {
    /// Human readable text for the failure: the reason when the processor gave one,
    /// the message otherwise.
    pub fn get_display_message(&self) -> String {
        self.reason
            .clone()
            .filter(|reason| !reason.is_empty())
            .unwrap_or_else(|| self.message.clone())
    }

    pub fn get_standard_code(&self) -> common_enums::StandardErrorCode {
        self.standard_code.unwrap_or_else(|| {
            common_enums::StandardErrorCode::from_http_status(self.status_code)
        })
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Address {
    pub line1: Option<Secret<String>>,
    pub line2: Option<Secret<String>>,
    pub city: Option<String>,
    pub state: Option<Secret<String>>,
    pub zip: Option<Secret<String>>,
    /// ISO 3166-1 alpha-2
    pub country: Option<String>,
    pub phone: Option<Secret<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_keys_keeping_edges() {
        let auth = ConnectorAuthType::BodyKey {
            api_key: Secret::new("sk_live_123456".to_string()),
            key1: Secret::new("abc".to_string()),
        };
        match auth.get_masked_keys() {
            ConnectorAuthType::BodyKey { api_key, key1 } => {
                assert_eq!(api_key.peek(), "sk**********56");
                assert_eq!(key1.peek(), "***");
            }
            other => panic!("unexpected auth type {other:?}"),
        }
    }

    #[test]
    fn deserializes_tagged_credentials() {
        let auth: ConnectorAuthType = serde_json::from_value(serde_json::json!({
            "auth_type": "HeaderKey",
            "api_key": "secret"
        }))
        .unwrap_or_default();
        assert_eq!(auth.secret_values(), vec!["secret".to_string()]);
    }
}
