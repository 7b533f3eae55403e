/*
[INPUT]:  Error sources (HTTP, API envelope, serialization, auth, WebSocket)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the KuCoin adapter
#[derive(Error, Debug)]
pub enum KucoinError {
    /// Transport failure (connectivity, TLS, timeout reported by reqwest)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The exchange answered with a non-success code
    #[error("API error (code {code}): {message}")]
    Api { code: String, message: String },

    /// Authentication failed or credentials are missing
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Payload did not match the expected shape
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// WebSocket transport error or use of a closed connection
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Unexpected WebSocket frame shape
    #[error("Protocol violation: {0}")]
    Protocol(String),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation timed out
    #[error("Timeout after {duration}s")]
    Timeout { duration: u64 },
}

impl KucoinError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            KucoinError::Http(_)
            | KucoinError::Timeout { .. }
            | KucoinError::WebSocket(_)
            | KucoinError::InvalidResponse(_) => true,
            // 429000: request rate limit exceeded
            KucoinError::Api { code, .. } => code == "429000",
            _ => false,
        }
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        match self {
            KucoinError::Authentication { .. } => true,
            // 4000xx: KC-API-* header problems (key, sign, timestamp, passphrase)
            KucoinError::Api { code, .. } => {
                matches!(code.as_str(), "400001" | "400002" | "400003" | "400004" | "400005" | "400006" | "400007")
            }
            _ => false,
        }
    }

    /// Exchange error code, if the error came from the exchange
    pub fn api_code(&self) -> Option<&str> {
        match self {
            KucoinError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Create an API error from an HTTP status and raw body
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        KucoinError::Api {
            code: status.as_u16().to_string(),
            message: message.into(),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for KucoinError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        KucoinError::WebSocket(err.to_string())
    }
}

/// Result type alias for KuCoin operations
pub type Result<T> = std::result::Result<T, KucoinError>;
