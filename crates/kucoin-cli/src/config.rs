/*
[INPUT]:  YAML configuration file, KUCOIN_API_* environment variables
[OUTPUT]: Parsed CLI configuration and adapter client/ws settings
[POS]:    Configuration layer - connection setup
[UPDATE]: When adding new configuration options
*/

use std::time::Duration;

use anyhow::{Context, Result, bail};
use kucoin_adapter::{
    ApiKeyVersion, ClientConfig, Credentials, Environment, KucoinClient, ReconnectPolicy, WsConfig,
};
use serde::{Deserialize, Serialize};

/// Top-level configuration for the CLI
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Exchange deployment: "production" or "sandbox"
    #[serde(default)]
    pub environment: EnvironmentSetting,
    /// Overrides the environment's base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// API credentials; falls back to KUCOIN_API_* when absent
    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,
    #[serde(default)]
    pub ws: WsSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentSetting {
    #[default]
    Production,
    Sandbox,
}

impl From<EnvironmentSetting> for Environment {
    fn from(value: EnvironmentSetting) -> Self {
        match value {
            EnvironmentSetting::Production => Environment::Production,
            EnvironmentSetting::Sandbox => Environment::Sandbox,
        }
    }
}

/// API key triple as written in the config file
#[derive(Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    pub api_key: String,
    pub api_secret: String,
    pub passphrase: String,
    #[serde(default = "default_key_version")]
    pub key_version: u8,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &self.api_key)
            .field("key_version", &self.key_version)
            .finish_non_exhaustive()
    }
}

/// Private WebSocket settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WsSettings {
    #[serde(default = "default_keepalive")]
    pub keepalive: bool,
    /// Overrides the server's advertised ping timeout
    #[serde(default)]
    pub ping_timeout_ms: Option<u64>,
    #[serde(default = "default_welcome_timeout_secs")]
    pub welcome_timeout_secs: u64,
    /// 0 disables reconnecting
    #[serde(default)]
    pub reconnect_attempts: u32,
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

impl Default for WsSettings {
    fn default() -> Self {
        Self {
            keepalive: default_keepalive(),
            ping_timeout_ms: None,
            welcome_timeout_secs: default_welcome_timeout_secs(),
            reconnect_attempts: 0,
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_key_version() -> u8 {
    2
}

fn default_keepalive() -> bool {
    true
}

fn default_welcome_timeout_secs() -> u64 {
    10
}

fn default_reconnect_delay_ms() -> u64 {
    1000
}

impl CliConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("parse yaml config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if self.ws.welcome_timeout_secs == 0 {
            bail!("ws.welcome_timeout_secs must be greater than zero");
        }
        if let Some(credentials) = &self.credentials {
            ApiKeyVersion::try_from(credentials.key_version)?;
            if credentials.api_key.trim().is_empty() {
                bail!("credentials.api_key must not be empty");
            }
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            environment: self.environment.into(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..ClientConfig::default()
        }
    }

    /// Credentials from the file, else from the environment, else none
    pub fn credentials(&self) -> Result<Option<Credentials>> {
        match &self.credentials {
            Some(file) => Ok(Some(Credentials {
                api_key: file.api_key.clone(),
                api_secret: file.api_secret.clone(),
                passphrase: file.passphrase.clone(),
                key_version: ApiKeyVersion::try_from(file.key_version)?,
            })),
            None => Ok(Credentials::from_env().ok()),
        }
    }

    /// REST client with credentials attached when available
    pub fn build_client(&self) -> Result<KucoinClient> {
        let client = KucoinClient::with_config(self.client_config()).context("create http client")?;
        Ok(match self.credentials()? {
            Some(credentials) => client.with_credentials(credentials),
            None => client,
        })
    }

    pub fn ws_config(&self) -> WsConfig {
        let reconnect = match self.ws.reconnect_attempts {
            0 => ReconnectPolicy::Disabled,
            max_attempts => ReconnectPolicy::Automatic {
                max_attempts,
                delay: Duration::from_millis(self.ws.reconnect_delay_ms),
            },
        };
        WsConfig {
            keepalive: self.ws.keepalive,
            ping_timeout: self.ws.ping_timeout_ms.map(Duration::from_millis),
            welcome_timeout: Duration::from_secs(self.ws.welcome_timeout_secs),
            reconnect,
        }
    }
}
