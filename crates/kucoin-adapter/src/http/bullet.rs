/*
[INPUT]:  Optional credentials
[OUTPUT]: WebSocket connection tokens and instance servers
[POS]:    HTTP layer - WebSocket bootstrap endpoints
[UPDATE]: When the token handshake changes
*/

use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use crate::http::{KucoinClient, KucoinError, Result};
use crate::types::WsToken;

impl KucoinClient {
    /// Token for the public feed
    ///
    /// POST /api/v1/bullet-public
    pub async fn public_ws_token(&self) -> Result<WsToken> {
        let builder = self.public_request(Method::POST, "/api/v1/bullet-public", &[])?;
        let token: WsToken = self.send_json(builder).await?;
        debug!(servers = token.instance_servers.len(), "public ws token issued");
        Ok(token)
    }

    /// Token for the private feed, signed with the client's credentials
    ///
    /// POST /api/v1/bullet-private
    pub async fn private_ws_token(&self) -> Result<WsToken> {
        let builder = self.private_request::<()>(Method::POST, "/api/v1/bullet-private", &[], None)?;
        let token: WsToken = self.send_json(builder).await?;
        if token.instance_servers.is_empty() {
            return Err(KucoinError::InvalidResponse(
                "bullet-private returned no instance servers".to_string(),
            ));
        }
        debug!(servers = token.instance_servers.len(), "private ws token issued");
        Ok(token)
    }
}

/// Source of WebSocket connection tokens.
///
/// Implemented by [`KucoinClient`]; tests and alternative transports may
/// supply their own.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn private_token(&self) -> Result<WsToken>;
}

#[async_trait]
impl TokenProvider for KucoinClient {
    async fn private_token(&self) -> Result<WsToken> {
        self.private_ws_token().await
    }
}
