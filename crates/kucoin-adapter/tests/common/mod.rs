/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for kucoin-adapter tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::{SinkExt as _, StreamExt as _};
use kucoin_adapter::{ClientConfig, Credentials, KucoinClient};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLOSE_SIGNAL: &str = "__close__";
const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn test_credentials() -> Credentials {
    Credentials::new("test-key", "test-secret", "test-passphrase")
}

/// REST client pointed at the mock server, with credentials attached
pub fn client_for(server: &MockServer) -> KucoinClient {
    KucoinClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
        .with_credentials(test_credentials())
}

/// Serve `POST /api/v1/bullet-private` pointing at `ws_url`
pub async fn mount_bullet_private(server: &MockServer, ws_url: &str, ping_interval_ms: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v1/bullet-private"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200000",
            "data": {
                "token": "test-ws-token",
                "instanceServers": [{
                    "endpoint": ws_url,
                    "encrypt": false,
                    "protocol": "websocket",
                    "pingInterval": ping_interval_ms,
                    "pingTimeout": 1000
                }]
            }
        })))
        .mount(server)
        .await;
}

/// How the mock answers `ping` frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PongMode {
    Echo,
    Manual,
}

/// Mock WebSocket server speaking the private feed's frame protocol.
pub struct MockWsServer {
    addr: SocketAddr,
    /// Frames pushed to every connected client
    outgoing: broadcast::Sender<String>,
    /// Frames received from clients
    incoming: mpsc::UnboundedReceiver<Value>,
    /// Request URIs of accepted handshakes
    handshakes: mpsc::UnboundedReceiver<String>,
    connections: Arc<AtomicUsize>,
}

impl MockWsServer {
    pub async fn start(pong: PongMode) -> Self {
        Self::start_with_greeting(pong, welcome_frame()).await
    }

    /// Start a server that sends `greeting` as the first frame of every connection
    pub async fn start_with_greeting(pong: PongMode, greeting: Value) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (outgoing, _) = broadcast::channel::<String>(100);
        let (incoming_tx, incoming) = mpsc::unbounded_channel::<Value>();
        let (handshake_tx, handshakes) = mpsc::unbounded_channel::<String>();
        let connections = Arc::new(AtomicUsize::new(0));

        let broadcast_tx = outgoing.clone();
        let connection_count = connections.clone();
        let greeting = greeting.to_string();

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };

                let handshake_tx = handshake_tx.clone();
                let record_uri = move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                    let _ = handshake_tx.send(request.uri().to_string());
                    Ok(response)
                };
                let Ok(ws_stream) = tokio_tungstenite::accept_hdr_async(stream, record_uri).await else {
                    continue;
                };
                connection_count.fetch_add(1, Ordering::SeqCst);

                let (mut write, mut read) = ws_stream.split();
                let incoming_tx = incoming_tx.clone();
                let mut outgoing_rx = broadcast_tx.subscribe();
                let greeting = greeting.clone();

                tokio::spawn(async move {
                    if write.send(Message::Text(greeting.into())).await.is_err() {
                        return;
                    }
                    loop {
                        tokio::select! {
                            msg = read.next() => {
                                match msg {
                                    Some(Ok(Message::Text(text))) => {
                                        let Ok(frame) = serde_json::from_str::<Value>(text.as_str()) else {
                                            continue;
                                        };
                                        if pong == PongMode::Echo && frame["type"] == "ping" {
                                            let reply = json!({"id": frame["id"], "type": "pong"});
                                            if write.send(Message::Text(reply.to_string().into())).await.is_err() {
                                                break;
                                            }
                                        }
                                        let _ = incoming_tx.send(frame);
                                    }
                                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                                    Some(Ok(_)) => {}
                                }
                            }
                            msg = outgoing_rx.recv() => {
                                match msg {
                                    Ok(text) if text == CLOSE_SIGNAL => {
                                        let _ = write.send(Message::Close(None)).await;
                                        break;
                                    }
                                    Ok(text) => {
                                        if write.send(Message::Text(text.into())).await.is_err() {
                                            break;
                                        }
                                    }
                                    Err(_) => break,
                                }
                            }
                        }
                    }
                });
            }
        });

        Self {
            addr,
            outgoing,
            incoming,
            handshakes,
            connections,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Send a frame to all connected clients
    pub fn send(&self, frame: Value) {
        drop(self.outgoing.send(frame.to_string()));
    }

    /// Send raw text to all connected clients
    pub fn send_raw(&self, text: &str) {
        drop(self.outgoing.send(text.to_owned()));
    }

    /// Close every open connection from the server side
    pub fn drop_connections(&self) {
        drop(self.outgoing.send(CLOSE_SIGNAL.to_owned()));
    }

    /// Next frame received from a client
    pub async fn next_frame(&mut self) -> Option<Value> {
        timeout(RECV_TIMEOUT, self.incoming.recv()).await.ok().flatten()
    }

    /// Next client frame of the given `type`, skipping everything else
    pub async fn next_frame_of_type(&mut self, kind: &str) -> Option<Value> {
        loop {
            let frame = self.next_frame().await?;
            if frame["type"] == kind {
                return Some(frame);
            }
        }
    }

    /// Next subscribe frame, acknowledged immediately
    pub async fn ack_next_subscribe(&mut self) -> Option<Value> {
        let frame = self.next_frame_of_type("subscribe").await?;
        self.send(ack_frame(frame["id"].as_str()?));
        Some(frame)
    }

    pub async fn next_handshake(&mut self) -> Option<String> {
        timeout(RECV_TIMEOUT, self.handshakes.recv()).await.ok().flatten()
    }
}

pub fn welcome_frame() -> Value {
    json!({"id": "hQvf8jkno", "type": "welcome"})
}

pub fn ack_frame(id: &str) -> Value {
    json!({"id": id, "type": "ack"})
}

pub fn order_change_frame(symbol: &str, order_id: &str) -> Value {
    json!({
        "type": "message",
        "topic": "/spotMarket/tradeOrders",
        "subject": "orderChange",
        "channelType": "private",
        "data": {
            "symbol": symbol,
            "orderType": "limit",
            "side": "buy",
            "orderId": order_id,
            "type": "open",
            "orderTime": 1593487481683297666_i64,
            "size": "1",
            "filledSize": "0",
            "price": "0.000001",
            "clientOid": "5efab07953bdea00089965d1",
            "remainSize": "1",
            "status": "open",
            "ts": 1593487481683297666_i64
        }
    })
}

pub fn order_activate_frame(symbol: &str, order_id: &str) -> Value {
    json!({
        "type": "message",
        "topic": format!("/market/level3:{symbol}"),
        "subject": "trade.l3received",
        "data": {
            "sequence": "1545896669291",
            "symbol": symbol,
            "side": "buy",
            "orderId": order_id,
            "price": "0.000001",
            "size": "1",
            "ts": 1545896669291_i64
        }
    })
}

pub fn account_balance_frame(currency: &str) -> Value {
    json!({
        "type": "message",
        "topic": "/account/balance",
        "subject": "account.balance",
        "channelType": "private",
        "data": {
            "total": "88",
            "available": "88",
            "availableChange": "88",
            "currency": currency,
            "hold": "0",
            "holdChange": "0",
            "relationEvent": "trade.setted",
            "relationEventId": "5c21e80303aa677bd09d7dff",
            "time": "1545743136994"
        }
    })
}

pub fn advanced_order_frame(symbol: &str, order_id: &str) -> Value {
    json!({
        "type": "message",
        "topic": "/spotMarket/advancedOrders",
        "subject": "stopOrder",
        "channelType": "private",
        "data": {
            "createdAt": 1589789942337_i64,
            "orderId": order_id,
            "orderPrice": "0.000001",
            "orderType": "stop",
            "side": "buy",
            "size": "1",
            "stop": "loss",
            "stopPrice": "0.0002",
            "symbol": symbol,
            "tradeType": "TRADE",
            "ts": 1589790121382281286_i64,
            "type": "open"
        }
    })
}
