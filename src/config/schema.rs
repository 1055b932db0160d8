//! Gateway configuration schema.
//!
//! The secret store hands back loosely typed key/value pairs; this module
//! performs the single explicit deserialization step into a typed struct,
//! failing fast when a required field is absent or empty.

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// Secret-store key for the Home Assistant base URL.
pub const KEY_HA_BASE_URL: &str = "HA_BASE_URL";
/// Secret-store key for the shared Alexa skill secret.
pub const KEY_ALEXA_SECRET: &str = "ALEXA_SECRET";
/// Secret-store key for the CloudFlare Access client id.
pub const KEY_CF_CLIENT_ID: &str = "CF_CLIENT_ID";
/// Secret-store key for the CloudFlare Access client secret.
pub const KEY_CF_CLIENT_SECRET: &str = "CF_CLIENT_SECRET";
/// Secret-store key for the optional long-lived fallback token.
pub const KEY_HA_TOKEN: &str = "HA_TOKEN";

/// Typed gateway settings loaded from the secret store.
#[derive(Debug, Clone)]
pub struct GatewayConfiguration {
    /// Base URL of the protected Home Assistant instance.
    pub home_assistant_base_url: String,

    /// Shared secret between the skill and the gateway.
    pub shared_secret: String,

    /// CloudFlare Access service-token client id.
    pub cloudflare_client_id: String,

    /// CloudFlare Access service-token client secret.
    pub cloudflare_client_secret: String,

    /// Optional long-lived token used when the client sent no credentials.
    pub fallback_token: Option<String>,
}

impl GatewayConfiguration {
    /// Build a configuration from secret-store parameters.
    ///
    /// Fails unless all four core fields are present and non-empty.
    pub fn from_params(params: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        Ok(Self {
            home_assistant_base_url: required(params, KEY_HA_BASE_URL)?,
            shared_secret: required(params, KEY_ALEXA_SECRET)?,
            cloudflare_client_id: required(params, KEY_CF_CLIENT_ID)?,
            cloudflare_client_secret: required(params, KEY_CF_CLIENT_SECRET)?,
            fallback_token: params
                .get(KEY_HA_TOKEN)
                .filter(|v| !v.is_empty())
                .cloned(),
        })
    }

    /// Whether both CloudFlare Access credentials are configured.
    pub fn has_cloudflare_credentials(&self) -> bool {
        !self.cloudflare_client_id.is_empty() && !self.cloudflare_client_secret.is_empty()
    }
}

fn required(params: &BTreeMap<String, String>, key: &'static str) -> Result<String, ConfigError> {
    match params.get(key) {
        None => Err(ConfigError::MissingKey(key)),
        Some(v) if v.is_empty() => Err(ConfigError::EmptyValue(key)),
        Some(v) => Ok(v.clone()),
    }
}
