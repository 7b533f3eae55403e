/*
[INPUT]:  Request method, path+query, body, timestamp and API secret
[OUTPUT]: Signed request headers (KC-API-SIGN, KC-API-PASSPHRASE)
[POS]:    HTTP layer - request signing for authenticated endpoints
[UPDATE]: When changing signing algorithm or header format
*/

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::http::{KucoinError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Signs HTTP requests for private endpoints
pub struct RequestSigner {
    secret: String,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner").finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// Create a new request signer with the given API secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Signature for the `KC-API-SIGN` header
    ///
    /// Format: "{timestamp}{METHOD}{path_and_query}{body}"
    /// Returns base64-encoded HMAC-SHA256
    pub fn sign_request(
        &self,
        timestamp: i64,
        method: &str,
        path_and_query: &str,
        body: &str,
    ) -> Result<String> {
        let message = format!("{timestamp}{}{path_and_query}{body}", method.to_ascii_uppercase());
        self.hmac_base64(message.as_bytes())
    }

    /// Encrypt the passphrase as required by API key version 2
    pub fn sign_passphrase(&self, passphrase: &str) -> Result<String> {
        self.hmac_base64(passphrase.as_bytes())
    }

    fn hmac_base64(&self, payload: &[u8]) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| KucoinError::Config(format!("invalid API secret: {e}")))?;
        mac.update(payload);
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_request_is_deterministic() {
        let signer = RequestSigner::new("secret");

        let first = signer
            .sign_request(1_547_015_186_532, "post", "/api/v1/orders", r#"{"symbol":"ETH-BTC"}"#)
            .unwrap();
        let second = signer
            .sign_request(1_547_015_186_532, "POST", "/api/v1/orders", r#"{"symbol":"ETH-BTC"}"#)
            .unwrap();

        assert_eq!(first, second);
        let decoded = BASE64.decode(&first).unwrap();
        assert_eq!(decoded.len(), 32);
    }

    #[test]
    fn test_sign_request_changes_with_payload() {
        let signer = RequestSigner::new("secret");

        let get = signer
            .sign_request(1, "GET", "/api/v1/accounts?currency=BTC", "")
            .unwrap();
        let other = signer
            .sign_request(1, "GET", "/api/v1/accounts?currency=ETH", "")
            .unwrap();

        assert_ne!(get, other);
    }

    #[test]
    fn test_sign_passphrase_known_vector() {
        // HMAC-SHA256(key="key", msg="The quick brown fox jumps over the lazy dog")
        let signer = RequestSigner::new("key");
        let signature = signer
            .sign_passphrase("The quick brown fox jumps over the lazy dog")
            .unwrap();
        let expected = BASE64.encode([
            0xf7, 0xbc, 0x83, 0xf4, 0x30, 0x53, 0x84, 0x24, 0xb1, 0x32, 0x98, 0xe6, 0xaa, 0x6f,
            0xb1, 0x43, 0xef, 0x4d, 0x59, 0xa1, 0x49, 0x46, 0x17, 0x59, 0x97, 0x47, 0x9d, 0xbc,
            0x2d, 0x1a, 0x3c, 0xd8,
        ]);
        assert_eq!(signature, expected);
    }

    #[test]
    fn test_debug_hides_secret() {
        let signer = RequestSigner::new("super-secret");
        assert!(!format!("{signer:?}").contains("super-secret"));
    }
}
