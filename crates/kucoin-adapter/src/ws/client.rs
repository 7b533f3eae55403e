/*
[INPUT]:  Token provider (bullet-private), WsConfig, typed callbacks
[OUTPUT]: Private channel events delivered to callbacks, ping results
[POS]:    WebSocket layer - private event client and connection supervisor
[UPDATE]: When changing the handshake, keepalive or reconnect behavior
*/

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::http::{KucoinClient, KucoinError, Result, TokenProvider};
use crate::ws::channel::{PrivateChannel, SubscriptionKey};
use crate::ws::dispatch::{
    EventHandler, Registry, SharedRegistry, SubscriptionStatus, lock_registry, spawn_dispatcher,
};
use crate::ws::message::{
    AccountChangeEvent, AdvancedOrderEvent, InboundFrame, KucoinEvent, OrderActivateEvent,
    OrderChangeEvent, OutboundFrame, RawEvent, truncate_for_log,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(10);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);
const PARSE_FAIL_LOG_LIMIT: usize = 3;
const RAW_LOG_MAX_BYTES: usize = 1024;

static PARSE_FAIL_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);

/// What to do when the socket drops without `close()` being called
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconnectPolicy {
    /// Move to `Closed` and stay there
    #[default]
    Disabled,
    /// Fetch a fresh token, reconnect and resend every subscription
    Automatic { max_attempts: u32, delay: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsConfig {
    /// Ping at the server's advertised interval
    pub keepalive: bool,
    /// Overrides the server's advertised ping timeout
    pub ping_timeout: Option<Duration>,
    pub welcome_timeout: Duration,
    pub reconnect: ReconnectPolicy,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            keepalive: true,
            ping_timeout: None,
            welcome_timeout: Duration::from_secs(10),
            reconnect: ReconnectPolicy::Disabled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Reconnecting { attempt: u32 },
    Closing,
    Closed,
}

/// Result of a ping round trip. Only transport failures are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    Pong { id: String },
    Mismatched { expected: String, echoed: String },
    TimedOut { expected: String },
}

struct Session {
    stream: WsStream,
    endpoint: String,
    ping_interval: Duration,
    ping_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Shutdown,
    Lost,
}

struct Shared {
    config: WsConfig,
    registry: SharedRegistry,
    outbound: Mutex<Option<mpsc::UnboundedSender<WsMessage>>>,
    pending_ping: Mutex<Option<oneshot::Sender<String>>>,
    ping_gate: tokio::sync::Mutex<()>,
    server_ping_timeout_ms: AtomicU64,
    state: watch::Sender<ConnectionState>,
    shutdown: CancellationToken,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

/// Client for the private WebSocket feed.
///
/// Cloning is cheap and every clone drives the same connection, so a
/// callback may capture a clone and unsubscribe from inside itself.
#[derive(Clone)]
pub struct KucoinPrivateWebSocket {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for KucoinPrivateWebSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KucoinPrivateWebSocket")
            .field("state", &self.state())
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

impl KucoinPrivateWebSocket {
    /// Bootstrap a token, connect and wait for the welcome frame
    pub async fn connect(provider: Arc<dyn TokenProvider>, config: WsConfig) -> Result<Self> {
        let session = open_session(provider.as_ref(), config.welcome_timeout).await?;

        let (state, _) = watch::channel(ConnectionState::Connecting);
        let shared = Arc::new(Shared {
            config,
            registry: Arc::new(Mutex::new(Registry::default())),
            outbound: Mutex::new(None),
            pending_ping: Mutex::new(None),
            ping_gate: tokio::sync::Mutex::new(()),
            server_ping_timeout_ms: AtomicU64::new(0),
            state,
            shutdown: CancellationToken::new(),
            supervisor: Mutex::new(None),
        });

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        spawn_dispatcher(shared.registry.clone(), event_rx).map_err(|err| {
            KucoinError::WebSocket(format!("failed to start dispatch thread: {err}"))
        })?;

        let outbound_rx = shared.install_session(&session);
        shared.state.send_replace(ConnectionState::Open);
        info!(endpoint = %session.endpoint, "ws private connection open");

        let handle = tokio::spawn(supervise(
            shared.clone(),
            provider,
            session,
            outbound_rx,
            event_tx,
        ));
        *lock(&shared.supervisor) = Some(handle);

        Ok(Self { shared })
    }

    /// Connect using a REST client's credentials for the token request
    pub async fn from_client(client: &KucoinClient, config: WsConfig) -> Result<Self> {
        Self::connect(Arc::new(client.clone()), config).await
    }

    pub fn state(&self) -> ConnectionState {
        *self.shared.state.borrow()
    }

    /// Receiver that observes every connection state transition
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state.subscribe()
    }

    pub fn subscription_status(&self, key: &SubscriptionKey) -> Option<SubscriptionStatus> {
        lock_registry(&self.shared.registry).status(key)
    }

    pub fn subscription_count(&self) -> usize {
        lock_registry(&self.shared.registry).len()
    }

    /// Order lifecycle events, filtered to `symbols` (empty = all)
    pub fn on_order_change<F>(&self, symbols: &[&str], callback: F) -> Result<SubscriptionKey>
    where
        F: Fn(KucoinEvent<OrderChangeEvent>) + Send + Sync + 'static,
    {
        self.subscribe(
            SubscriptionKey::new(PrivateChannel::OrderChange, symbols.iter().copied()),
            EventHandler::OrderChange(Arc::new(callback)),
        )
    }

    /// Own orders entering the book. At least one symbol is required.
    pub fn on_order_activate<F>(&self, symbols: &[&str], callback: F) -> Result<SubscriptionKey>
    where
        F: Fn(KucoinEvent<OrderActivateEvent>) + Send + Sync + 'static,
    {
        self.subscribe(
            SubscriptionKey::new(PrivateChannel::OrderActivate, symbols.iter().copied()),
            EventHandler::OrderActivate(Arc::new(callback)),
        )
    }

    pub fn on_account_balance<F>(&self, callback: F) -> Result<SubscriptionKey>
    where
        F: Fn(KucoinEvent<AccountChangeEvent>) + Send + Sync + 'static,
    {
        self.subscribe(
            SubscriptionKey::new(PrivateChannel::AccountBalance, Vec::<String>::new()),
            EventHandler::AccountBalance(Arc::new(callback)),
        )
    }

    /// Stop order events, filtered to `symbols` (empty = all)
    pub fn on_advanced_order<F>(&self, symbols: &[&str], callback: F) -> Result<SubscriptionKey>
    where
        F: Fn(KucoinEvent<AdvancedOrderEvent>) + Send + Sync + 'static,
    {
        self.subscribe(
            SubscriptionKey::new(PrivateChannel::AdvancedOrder, symbols.iter().copied()),
            EventHandler::AdvancedOrder(Arc::new(callback)),
        )
    }

    fn subscribe(&self, key: SubscriptionKey, handler: EventHandler) -> Result<SubscriptionKey> {
        self.ensure_usable()?;
        if key.channel.is_symbol_scoped() && key.symbols.is_empty() {
            return Err(KucoinError::Config(format!(
                "{} requires at least one symbol",
                key.channel
            )));
        }

        // Frames are queued while the registry guard is held so that wire
        // order always matches registry order across threads.
        let request_id = new_request_id();
        let mut registry = lock_registry(&self.shared.registry);
        if !registry.register(key.clone(), handler, &request_id) {
            debug!(subscription = %key, "ws handler added to existing subscription");
            return Ok(key);
        }

        match self.shared.send_frame(&OutboundFrame::subscribe(&request_id, key.topic())) {
            Ok(()) => {
                info!(subscription = %key, request_id = %request_id, "ws subscribe sent");
                Ok(key)
            }
            Err(_) if matches!(self.state(), ConnectionState::Reconnecting { .. }) => {
                debug!(subscription = %key, "ws subscribe deferred until reconnect");
                Ok(key)
            }
            Err(err) => {
                registry.remove(&key);
                Err(err)
            }
        }
    }

    /// Drop a subscription. Unknown keys are a no-op; safe to call from a
    /// callback.
    pub fn unsubscribe(&self, key: &SubscriptionKey) {
        let mut registry = lock_registry(&self.shared.registry);
        if !registry.remove(key) {
            return;
        }
        info!(subscription = %key, "ws unsubscribed");

        let Some(topic) = registry.released_topic(key) else {
            return;
        };
        if let Err(err) = self
            .shared
            .send_frame(&OutboundFrame::unsubscribe(new_request_id(), topic))
        {
            debug!(subscription = %key, error = %err, "ws unsubscribe frame not sent");
        }
    }

    /// Send `{id, type:"ping"}` and wait for the next pong
    pub async fn ping(&self, request_id: &str) -> Result<PingOutcome> {
        self.ensure_usable()?;
        self.shared.ping(request_id).await
    }

    /// Close the connection for good. Subscriptions are dropped and the
    /// reader, keepalive and dispatch thread stop.
    pub async fn close(&self) -> Result<()> {
        if self.state() == ConnectionState::Closed {
            return Ok(());
        }
        self.shared.state.send_replace(ConnectionState::Closing);

        let dropped = {
            let mut registry = lock_registry(&self.shared.registry);
            let count = registry.len();
            registry.clear();
            count
        };
        self.shared.shutdown.cancel();

        let handle = lock(&self.shared.supervisor).take();
        if let Some(handle) = handle {
            match tokio::time::timeout(CLOSE_TIMEOUT, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(error = %err, "ws supervisor task failed"),
                Err(_) => {
                    self.shared.state.send_replace(ConnectionState::Closed);
                    return Err(KucoinError::Timeout {
                        duration: CLOSE_TIMEOUT.as_secs(),
                    });
                }
            }
        }

        self.shared.state.send_replace(ConnectionState::Closed);
        info!(dropped_subscriptions = dropped, "ws private client closed");
        Ok(())
    }

    fn ensure_usable(&self) -> Result<()> {
        match self.state() {
            ConnectionState::Closing | ConnectionState::Closed => {
                Err(KucoinError::WebSocket("connection closed".to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl Shared {
    /// Point the outbound queue at a fresh session
    fn install_session(&self, session: &Session) -> mpsc::UnboundedReceiver<WsMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        *lock(&self.outbound) = Some(tx);
        self.server_ping_timeout_ms
            .store(session.ping_timeout.as_millis() as u64, Ordering::Relaxed);
        rx
    }

    fn send_frame(&self, frame: &OutboundFrame) -> Result<()> {
        let payload = serde_json::to_string(frame)?;
        let sender = lock(&self.outbound)
            .clone()
            .ok_or_else(|| KucoinError::WebSocket("not connected".to_string()))?;
        sender
            .send(WsMessage::Text(payload.into()))
            .map_err(|_| KucoinError::WebSocket("ws writer stopped".to_string()))?;
        debug!(
            kind = ?frame.kind,
            id = %frame.id,
            topic = frame.topic.as_deref().unwrap_or(""),
            "ws frame queued"
        );
        Ok(())
    }

    fn ping_timeout(&self) -> Duration {
        self.config.ping_timeout.unwrap_or_else(|| {
            match self.server_ping_timeout_ms.load(Ordering::Relaxed) {
                0 => DEFAULT_PING_TIMEOUT,
                ms => Duration::from_millis(ms),
            }
        })
    }

    async fn ping(&self, request_id: &str) -> Result<PingOutcome> {
        let _gate = self.ping_gate.lock().await;

        let (tx, rx) = oneshot::channel();
        *lock(&self.pending_ping) = Some(tx);
        if let Err(err) = self.send_frame(&OutboundFrame::ping(request_id)) {
            lock(&self.pending_ping).take();
            return Err(err);
        }

        let outcome = match tokio::time::timeout(self.ping_timeout(), rx).await {
            Ok(Ok(echoed)) if echoed == request_id => PingOutcome::Pong { id: echoed },
            Ok(Ok(echoed)) => PingOutcome::Mismatched {
                expected: request_id.to_string(),
                echoed,
            },
            Ok(Err(_)) => {
                return Err(KucoinError::WebSocket(
                    "connection lost while awaiting pong".to_string(),
                ));
            }
            Err(_) => {
                lock(&self.pending_ping).take();
                PingOutcome::TimedOut {
                    expected: request_id.to_string(),
                }
            }
        };
        Ok(outcome)
    }

    fn handle_text(&self, text: &str, events: &mpsc::UnboundedSender<RawEvent>) {
        let frame = match serde_json::from_str::<InboundFrame>(text) {
            Ok(frame) => frame,
            Err(err) => {
                log_parse_fail_once(&err, text);
                return;
            }
        };

        match frame {
            InboundFrame::Message(event) => {
                debug!(topic = %event.topic, subject = %event.subject, "ws event received");
                if events.send(event).is_err() {
                    debug!("ws dispatch thread gone, event dropped");
                }
            }
            InboundFrame::Ack { id } => {
                let acked = lock_registry(&self.registry).acknowledge(&id);
                match acked {
                    Some(key) => info!(subscription = %key, request_id = %id, "ws subscription active"),
                    None => debug!(request_id = %id, "ws ack without pending subscription"),
                }
            }
            InboundFrame::Pong { id } => {
                let waiter = lock(&self.pending_ping).take();
                match waiter {
                    Some(waiter) => {
                        let _ = waiter.send(id);
                    }
                    None => debug!(id = %id, "ws unsolicited pong"),
                }
            }
            InboundFrame::Welcome { id } => debug!(id = %id, "ws repeated welcome ignored"),
            InboundFrame::Error { id, code, data } => {
                let pending = id
                    .as_deref()
                    .and_then(|id| lock_registry(&self.registry).pending_key(id));
                let code = describe(code.as_ref());
                let data = describe(data.as_ref());
                match pending {
                    Some(key) => warn!(subscription = %key, code = %code, data = %data, "ws subscription rejected"),
                    None => warn!(id = id.as_deref().unwrap_or(""), code = %code, data = %data, "ws error frame"),
                }
            }
        }
    }
}

async fn supervise(
    shared: Arc<Shared>,
    provider: Arc<dyn TokenProvider>,
    mut session: Session,
    mut outbound_rx: mpsc::UnboundedReceiver<WsMessage>,
    events: mpsc::UnboundedSender<RawEvent>,
) {
    loop {
        let end = drive_session(&shared, session, outbound_rx, &events).await;
        lock(&shared.outbound).take();
        lock(&shared.pending_ping).take();

        if end == SessionEnd::Shutdown || shared.shutdown.is_cancelled() {
            break;
        }
        warn!("ws private connection lost");

        match reconnect(&shared, provider.as_ref()).await {
            Some((next, next_rx)) => {
                session = next;
                outbound_rx = next_rx;
            }
            None => break,
        }
    }

    lock_registry(&shared.registry).clear();
    shared.state.send_replace(ConnectionState::Closed);
    info!("ws private connection closed");
}

async fn reconnect(
    shared: &Arc<Shared>,
    provider: &dyn TokenProvider,
) -> Option<(Session, mpsc::UnboundedReceiver<WsMessage>)> {
    let ReconnectPolicy::Automatic {
        max_attempts,
        delay,
    } = shared.config.reconnect
    else {
        return None;
    };

    for attempt in 1..=max_attempts {
        shared
            .state
            .send_replace(ConnectionState::Reconnecting { attempt });
        tokio::select! {
            _ = shared.shutdown.cancelled() => return None,
            _ = tokio::time::sleep(delay) => {}
        }

        match open_session(provider, shared.config.welcome_timeout).await {
            Ok(session) => {
                if shared.shutdown.is_cancelled() {
                    return None;
                }
                let rx = shared.install_session(&session);
                shared.state.send_replace(ConnectionState::Open);
                resubscribe_all(shared);
                info!(attempt, endpoint = %session.endpoint, "ws reconnected");
                return Some((session, rx));
            }
            Err(err) => warn!(attempt, max_attempts, error = %err, "ws reconnect attempt failed"),
        }
    }

    warn!(max_attempts, "ws reconnect attempts exhausted");
    None
}

fn resubscribe_all(shared: &Shared) {
    let mut registry = lock_registry(&shared.registry);
    for (key, request_id) in registry.resubscribe_all(new_request_id) {
        if let Err(err) = shared.send_frame(&OutboundFrame::subscribe(&request_id, key.topic())) {
            warn!(subscription = %key, error = %err, "ws resubscribe failed");
        }
    }
}

async fn drive_session(
    shared: &Arc<Shared>,
    session: Session,
    mut outbound_rx: mpsc::UnboundedReceiver<WsMessage>,
    events: &mpsc::UnboundedSender<RawEvent>,
) -> SessionEnd {
    let (mut write, mut read) = session.stream.split();
    let session_cancel = shared.shutdown.child_token();
    if shared.config.keepalive {
        tokio::spawn(keepalive(
            shared.clone(),
            session.ping_interval,
            session_cancel.clone(),
        ));
    }

    let end = loop {
        tokio::select! {
            _ = shared.shutdown.cancelled() => {
                let _ = write.send(WsMessage::Close(None)).await;
                break SessionEnd::Shutdown;
            }
            outbound = outbound_rx.recv() => {
                let Some(message) = outbound else {
                    break SessionEnd::Lost;
                };
                if let Err(err) = write.send(message).await {
                    warn!(error = %err, "ws send failed");
                    break SessionEnd::Lost;
                }
            }
            incoming = read.next() => {
                match incoming {
                    Some(Ok(WsMessage::Text(text))) => shared.handle_text(text.as_str(), events),
                    Some(Ok(WsMessage::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => shared.handle_text(text, events),
                        Err(_) => debug!(bytes = bytes.len(), "ws binary frame ignored"),
                    },
                    Some(Ok(WsMessage::Close(frame))) => {
                        debug!(?frame, "ws close frame received");
                        break SessionEnd::Lost;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(error = %err, "ws read failed");
                        break SessionEnd::Lost;
                    }
                    None => break SessionEnd::Lost,
                }
            }
        }
    };

    session_cancel.cancel();
    end
}

async fn keepalive(shared: Arc<Shared>, period: Duration, cancel: CancellationToken) {
    if period.is_zero() {
        return;
    }
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        match shared.ping(&new_request_id()).await {
            Ok(PingOutcome::Pong { id }) => debug!(id = %id, "ws keepalive pong"),
            Ok(outcome) => warn!(?outcome, "ws keepalive liveness failure"),
            Err(err) => {
                debug!(error = %err, "ws keepalive stopped");
                break;
            }
        }
    }
}

async fn open_session(provider: &dyn TokenProvider, welcome_timeout: Duration) -> Result<Session> {
    let token = provider.private_token().await?;
    let server = token.primary_server().cloned().ok_or_else(|| {
        KucoinError::InvalidResponse("ws token without instance servers".to_string())
    })?;

    let mut url = Url::parse(&server.endpoint)?;
    url.query_pairs_mut()
        .append_pair("token", &token.token)
        .append_pair("connectId", &new_request_id());

    debug!(endpoint = %server.endpoint, "ws connecting");
    let (mut stream, _response) = connect_async(url.as_str()).await?;

    match tokio::time::timeout(welcome_timeout, await_welcome(&mut stream)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(KucoinError::Timeout {
                duration: welcome_timeout.as_secs(),
            });
        }
    }

    Ok(Session {
        stream,
        endpoint: server.endpoint,
        ping_interval: Duration::from_millis(server.ping_interval),
        ping_timeout: Duration::from_millis(server.ping_timeout),
    })
}

async fn await_welcome(stream: &mut WsStream) -> Result<()> {
    while let Some(message) = stream.next().await {
        let text = match message? {
            WsMessage::Text(text) => text,
            WsMessage::Close(frame) => {
                return Err(KucoinError::WebSocket(format!(
                    "connection closed before welcome: {frame:?}"
                )));
            }
            _ => continue,
        };

        match serde_json::from_str::<InboundFrame>(text.as_str()) {
            Ok(InboundFrame::Welcome { id }) => {
                debug!(id = %id, "ws welcome received");
                return Ok(());
            }
            Ok(InboundFrame::Error { code, data, .. }) => {
                return Err(KucoinError::Authentication {
                    message: format!(
                        "ws handshake rejected (code {}): {}",
                        describe(code.as_ref()),
                        describe(data.as_ref())
                    ),
                });
            }
            Ok(other) => debug!(?other, "ws frame before welcome ignored"),
            Err(err) => {
                return Err(KucoinError::Protocol(format!(
                    "unexpected frame before welcome: {err}"
                )));
            }
        }
    }
    Err(KucoinError::WebSocket(
        "connection closed before welcome".to_string(),
    ))
}

fn new_request_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn describe(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}

fn log_parse_fail_once(err: &serde_json::Error, raw: &str) {
    let count = PARSE_FAIL_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < PARSE_FAIL_LOG_LIMIT {
        warn!(
            sample_index = count + 1,
            sample_limit = PARSE_FAIL_LOG_LIMIT,
            error = %err,
            bytes = raw.len(),
            "ws frame parse failed"
        );
        let preview = truncate_for_log(raw, RAW_LOG_MAX_BYTES);
        debug!(
            sample_index = count + 1,
            sample_limit = PARSE_FAIL_LOG_LIMIT,
            message = %preview,
            "ws frame parse failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WsToken;
    use async_trait::async_trait;

    struct FailingProvider;

    #[async_trait]
    impl TokenProvider for FailingProvider {
        async fn private_token(&self) -> Result<WsToken> {
            Err(KucoinError::Api {
                code: "400003".to_string(),
                message: "KC-API-KEY not exists".to_string(),
            })
        }
    }

    struct EmptyProvider;

    #[async_trait]
    impl TokenProvider for EmptyProvider {
        async fn private_token(&self) -> Result<WsToken> {
            Ok(WsToken {
                token: "t".to_string(),
                instance_servers: vec![],
            })
        }
    }

    #[test]
    fn default_config() {
        let config = WsConfig::default();
        assert!(config.keepalive);
        assert_eq!(config.ping_timeout, None);
        assert_eq!(config.reconnect, ReconnectPolicy::Disabled);
    }

    #[test]
    fn describe_renders_frame_fields() {
        assert_eq!(describe(Some(&serde_json::json!(401))), "401");
        assert_eq!(describe(Some(&serde_json::json!("token is expired"))), "token is expired");
        assert_eq!(describe(None), "-");
    }

    #[tokio::test]
    async fn connect_surfaces_bootstrap_auth_failure() {
        let err = KucoinPrivateWebSocket::connect(Arc::new(FailingProvider), WsConfig::default())
            .await
            .unwrap_err();
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn connect_requires_instance_server() {
        let err = KucoinPrivateWebSocket::connect(Arc::new(EmptyProvider), WsConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, KucoinError::InvalidResponse(_)));
    }
}
