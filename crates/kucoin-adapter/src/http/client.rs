/*
[INPUT]:  HTTP configuration (environment, base URL, timeouts, credentials)
[OUTPUT]: Configured reqwest client, signed request builders, envelope decoding
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::http::signature::RequestSigner;
use crate::http::{KucoinError, Result};
use crate::types::ApiResponse;

/// Base URLs for the KuCoin spot API
const PRODUCTION_BASE_URL: &str = "https://api.kucoin.com";
const SANDBOX_BASE_URL: &str = "https://openapi-sandbox.kucoin.com";

const ENV_API_KEY: &str = "KUCOIN_API_KEY";
const ENV_API_SECRET: &str = "KUCOIN_API_SECRET";
const ENV_API_PASSPHRASE: &str = "KUCOIN_API_PASSPHRASE";
const ENV_API_KEY_VERSION: &str = "KUCOIN_API_KEY_VERSION";

/// Which exchange deployment to talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_BASE_URL,
            Environment::Sandbox => SANDBOX_BASE_URL,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: Environment,
    /// Overrides the environment's base URL (proxies, test servers)
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            base_url: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// API key format version; v2 keys send an HMAC of the passphrase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiKeyVersion {
    V1,
    #[default]
    V2,
}

impl ApiKeyVersion {
    pub fn as_header(&self) -> &'static str {
        match self {
            ApiKeyVersion::V1 => "1",
            ApiKeyVersion::V2 => "2",
        }
    }
}

impl TryFrom<u8> for ApiKeyVersion {
    type Error = KucoinError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(ApiKeyVersion::V1),
            2 => Ok(ApiKeyVersion::V2),
            other => Err(KucoinError::Config(format!(
                "unsupported API key version: {other}"
            ))),
        }
    }
}

/// Credentials for authenticated requests
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub passphrase: String,
    pub key_version: ApiKeyVersion,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .field("key_version", &self.key_version)
            .finish()
    }
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            passphrase: passphrase.into(),
            key_version: ApiKeyVersion::V2,
        }
    }

    /// Load credentials from `KUCOIN_API_KEY`, `KUCOIN_API_SECRET`,
    /// `KUCOIN_API_PASSPHRASE` and optionally `KUCOIN_API_KEY_VERSION`.
    pub fn from_env() -> Result<Self> {
        let read = |name: &str| {
            std::env::var(name)
                .map_err(|e| KucoinError::Config(format!("{name} not available: {e}")))
        };

        let key_version = match std::env::var(ENV_API_KEY_VERSION) {
            Ok(raw) => {
                let version: u8 = raw.trim().parse().map_err(|_| {
                    KucoinError::Config(format!("{ENV_API_KEY_VERSION} must be 1 or 2, got {raw}"))
                })?;
                ApiKeyVersion::try_from(version)?
            }
            Err(_) => ApiKeyVersion::default(),
        };

        Ok(Self {
            api_key: read(ENV_API_KEY)?,
            api_secret: read(ENV_API_SECRET)?,
            passphrase: read(ENV_API_PASSPHRASE)?,
            key_version,
        })
    }
}

/// Main HTTP client for the KuCoin REST API
#[derive(Debug, Clone)]
pub struct KucoinClient {
    http_client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl KucoinClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| config.environment.base_url().to_string());
        Self::with_config_and_base_url(config, &base_url)
    }

    /// Create a client against an explicit base URL
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            credentials: None,
        })
    }

    /// Attach credentials, consuming the client
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set credentials for authenticated requests
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Get credentials if set
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an endpoint with percent-encoded query pairs
    fn url(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.join(endpoint)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Build request builder for public endpoints
    pub(crate) fn public_request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<RequestBuilder> {
        let url = self.url(endpoint, query)?;
        debug!(method = %method, path = %url.path(), "kucoin public request");
        Ok(self.http_client.request(method, url))
    }

    /// URL for `endpoint` with `id` appended as a single percent-encoded segment
    fn resource_url(&self, endpoint: &str, id: &str) -> Result<Url> {
        if id.trim().is_empty() || id == "." || id == ".." {
            return Err(KucoinError::Config(format!(
                "invalid path id {id:?} for {endpoint}"
            )));
        }
        let mut url = self.base_url.join(endpoint)?;
        url.path_segments_mut()
            .map_err(|_| KucoinError::Config(format!("cannot append path to {endpoint}")))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// Build a signed request builder for private endpoints
    pub(crate) fn private_request<B>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<RequestBuilder>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(endpoint, query)?;
        self.signed_request(method, url, body)
    }

    /// Signed request against `{endpoint}/{id}`; the id never changes the route
    pub(crate) fn private_resource_request(
        &self,
        method: Method,
        endpoint: &str,
        id: &str,
    ) -> Result<RequestBuilder> {
        let url = self.resource_url(endpoint, id)?;
        self.signed_request::<()>(method, url, None)
    }

    fn signed_request<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<RequestBuilder>
    where
        B: Serialize + ?Sized,
    {
        let credentials = self.credentials.as_ref().ok_or_else(|| KucoinError::Authentication {
            message: format!("credentials required for {}", url.path()),
        })?;

        let path_and_query = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let body = body.map(serde_json::to_string).transpose()?;
        let timestamp = chrono::Utc::now().timestamp_millis();

        let headers = auth_headers(
            credentials,
            timestamp,
            method.as_str(),
            &path_and_query,
            body.as_deref().unwrap_or(""),
        )?;

        debug!(method = %method, path = %url.path(), "kucoin private request");

        let mut builder = self.http_client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body);
        }
        Ok(builder)
    }

    /// Send a request and return the envelope's `data`, which must be present
    pub(crate) async fn send_json<T>(&self, builder: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_optional(builder).await?.ok_or_else(|| {
            KucoinError::InvalidResponse("success envelope without data".to_string())
        })
    }

    /// Send a request and return the envelope's `data`, which may be empty
    pub(crate) async fn send_optional<T>(&self, builder: RequestBuilder) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope = match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
            Ok(envelope) => envelope,
            Err(err) if status.is_success() => return Err(KucoinError::Serialization(err)),
            Err(_) => {
                warn!(status = status.as_u16(), bytes = body.len(), "kucoin non-envelope error");
                return Err(KucoinError::api_error(status, body));
            }
        };

        if !envelope.is_success() {
            let message = envelope.msg.unwrap_or_default();
            warn!(status = status.as_u16(), code = %envelope.code, message = %message, "kucoin api error");
            return Err(KucoinError::Api {
                code: envelope.code,
                message,
            });
        }

        match envelope.data {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
        }
    }
}

fn auth_headers(
    credentials: &Credentials,
    timestamp: i64,
    method: &str,
    path_and_query: &str,
    body: &str,
) -> Result<HeaderMap> {
    let signer = RequestSigner::new(credentials.api_secret.clone());
    let signature = signer.sign_request(timestamp, method, path_and_query, body)?;
    let passphrase = match credentials.key_version {
        ApiKeyVersion::V1 => credentials.passphrase.clone(),
        ApiKeyVersion::V2 => signer.sign_passphrase(&credentials.passphrase)?,
    };

    let mut headers = HeaderMap::new();
    headers.insert("KC-API-KEY", header_value(&credentials.api_key)?);
    headers.insert("KC-API-SIGN", header_value(&signature)?);
    headers.insert("KC-API-TIMESTAMP", header_value(&timestamp.to_string())?);
    headers.insert("KC-API-PASSPHRASE", header_value(&passphrase)?);
    headers.insert(
        "KC-API-KEY-VERSION",
        HeaderValue::from_static(credentials.key_version.as_header()),
    );
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| KucoinError::Config(format!("invalid header value: {e}")))
}
