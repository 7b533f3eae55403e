/*
[INPUT]:  Decoded message frames and registered callbacks
[OUTPUT]: Typed callback invocations on the dispatch thread
[POS]:    WebSocket layer - subscription registry and event fan-out
[UPDATE]: When adding channels or changing callback delivery
*/

use std::collections::{BTreeMap, BTreeSet};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::ws::channel::{PrivateChannel, SubscriptionKey};
use crate::ws::message::{
    AccountChangeEvent, AdvancedOrderEvent, KucoinEvent, OrderActivateEvent, OrderChangeEvent,
    RawEvent, truncate_for_log,
};

pub const DISPATCH_THREAD_NAME: &str = "kucoin-ws-dispatch";

const DECODE_FAIL_LOG_LIMIT: usize = 5;
const UNKNOWN_TOPIC_LOG_LIMIT: usize = 5;
const RAW_LOG_MAX_BYTES: usize = 512;

static DECODE_FAIL_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);
static UNKNOWN_TOPIC_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);

pub type Callback<T> = Arc<dyn Fn(KucoinEvent<T>) + Send + Sync>;

/// A registered callback, typed by channel
#[derive(Clone)]
pub enum EventHandler {
    OrderActivate(Callback<OrderActivateEvent>),
    OrderChange(Callback<OrderChangeEvent>),
    AccountBalance(Callback<AccountChangeEvent>),
    AdvancedOrder(Callback<AdvancedOrderEvent>),
}

impl std::fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EventHandler").field(&self.channel()).finish()
    }
}

impl EventHandler {
    pub fn channel(&self) -> PrivateChannel {
        match self {
            EventHandler::OrderActivate(_) => PrivateChannel::OrderActivate,
            EventHandler::OrderChange(_) => PrivateChannel::OrderChange,
            EventHandler::AccountBalance(_) => PrivateChannel::AccountBalance,
            EventHandler::AdvancedOrder(_) => PrivateChannel::AdvancedOrder,
        }
    }

    /// Decode the payload for this handler's channel and run the callback
    pub fn invoke(&self, event: &RawEvent) -> Result<(), serde_json::Error> {
        match self {
            EventHandler::OrderActivate(callback) => call(callback, event),
            EventHandler::OrderChange(callback) => call(callback, event),
            EventHandler::AccountBalance(callback) => call(callback, event),
            EventHandler::AdvancedOrder(callback) => call(callback, event),
        }
    }
}

fn call<T: DeserializeOwned>(callback: &Callback<T>, event: &RawEvent) -> Result<(), serde_json::Error> {
    let typed = event.decode::<T>()?;
    callback(typed);
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionStatus {
    /// Subscribe frame sent, ack not seen yet
    Pending { request_id: String },
    Active,
}

#[derive(Debug)]
struct Subscription {
    status: SubscriptionStatus,
    handlers: Vec<EventHandler>,
}

/// Subscriptions keyed by channel and symbol set
#[derive(Debug, Default)]
pub struct Registry {
    subscriptions: BTreeMap<SubscriptionKey, Subscription>,
}

impl Registry {
    /// Add a handler. Returns `true` when the key is new and a subscribe
    /// frame must go out under `request_id`.
    pub fn register(&mut self, key: SubscriptionKey, handler: EventHandler, request_id: &str) -> bool {
        match self.subscriptions.get_mut(&key) {
            Some(existing) => {
                existing.handlers.push(handler);
                false
            }
            None => {
                self.subscriptions.insert(
                    key,
                    Subscription {
                        status: SubscriptionStatus::Pending {
                            request_id: request_id.to_string(),
                        },
                        handlers: vec![handler],
                    },
                );
                true
            }
        }
    }

    pub fn remove(&mut self, key: &SubscriptionKey) -> bool {
        self.subscriptions.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn status(&self, key: &SubscriptionKey) -> Option<SubscriptionStatus> {
        self.subscriptions.get(key).map(|sub| sub.status.clone())
    }

    pub fn handler_count(&self, key: &SubscriptionKey) -> usize {
        self.subscriptions.get(key).map_or(0, |sub| sub.handlers.len())
    }

    fn find_pending(&mut self, request_id: &str) -> Option<(&SubscriptionKey, &mut Subscription)> {
        self.subscriptions.iter_mut().find(|(_, sub)| {
            matches!(&sub.status, SubscriptionStatus::Pending { request_id: id } if id == request_id)
        })
    }

    /// Mark the subscription waiting on `request_id` as active
    pub fn acknowledge(&mut self, request_id: &str) -> Option<SubscriptionKey> {
        let (key, sub) = self.find_pending(request_id)?;
        sub.status = SubscriptionStatus::Active;
        Some(key.clone())
    }

    /// Key of the subscription still waiting on `request_id`
    pub fn pending_key(&mut self, request_id: &str) -> Option<SubscriptionKey> {
        self.find_pending(request_id).map(|(key, _)| key.clone())
    }

    /// Put every subscription back to pending with a fresh request id and
    /// return the frames to resend.
    pub fn resubscribe_all<F>(&mut self, mut next_id: F) -> Vec<(SubscriptionKey, String)>
    where
        F: FnMut() -> String,
    {
        self.subscriptions
            .iter_mut()
            .map(|(key, sub)| {
                let request_id = next_id();
                sub.status = SubscriptionStatus::Pending {
                    request_id: request_id.clone(),
                };
                (key.clone(), request_id)
            })
            .collect()
    }

    /// Topic to unsubscribe on the wire after `removed` left the registry,
    /// or `None` if the remaining subscriptions still need all of it.
    pub fn released_topic(&self, removed: &SubscriptionKey) -> Option<String> {
        let channel = removed.channel;
        let others = self.subscriptions.keys().filter(|key| key.channel == channel);

        if !channel.is_symbol_scoped() {
            return match others.count() {
                0 => Some(channel.topic(std::iter::empty())),
                _ => None,
            };
        }

        let still_needed: BTreeSet<&str> = others
            .flat_map(|key| key.symbols.iter().map(String::as_str))
            .collect();
        let released: Vec<&str> = removed
            .symbols
            .iter()
            .map(String::as_str)
            .filter(|symbol| !still_needed.contains(symbol))
            .collect();
        if released.is_empty() {
            None
        } else {
            Some(channel.topic(released))
        }
    }

    /// Clone out every handler whose subscription matches the event
    pub fn handlers_for(&self, channel: PrivateChannel, symbol: Option<&str>) -> Vec<EventHandler> {
        self.subscriptions
            .iter()
            .filter(|(key, _)| key.matches(channel, symbol))
            .flat_map(|(_, sub)| sub.handlers.iter().cloned())
            .collect()
    }
}

pub type SharedRegistry = Arc<Mutex<Registry>>;

pub fn lock_registry(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Deliver one message frame to every matching handler.
///
/// The registry lock is released before any callback runs.
pub fn dispatch_event(registry: &Mutex<Registry>, event: &RawEvent) -> usize {
    let Some((channel, topic_symbol)) = PrivateChannel::from_topic(&event.topic) else {
        log_unknown_topic_once(&event.topic);
        return 0;
    };
    let symbol = topic_symbol.or_else(|| event.payload_symbol());

    let handlers = lock_registry(registry).handlers_for(channel, symbol);
    let mut delivered = 0;
    for handler in handlers {
        match catch_unwind(AssertUnwindSafe(|| handler.invoke(event))) {
            Ok(Ok(())) => delivered += 1,
            Ok(Err(err)) => log_decode_fail_once(channel, &err, event),
            Err(_) => warn!(channel = %channel, topic = %event.topic, "ws callback panicked"),
        }
    }
    delivered
}

/// Start the dispatch thread. It exits once every sender is dropped.
pub fn spawn_dispatcher(
    registry: SharedRegistry,
    mut events: mpsc::UnboundedReceiver<RawEvent>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(DISPATCH_THREAD_NAME.to_string())
        .spawn(move || {
            debug!("ws dispatch thread started");
            while let Some(event) = events.blocking_recv() {
                dispatch_event(&registry, &event);
            }
            info!("ws dispatch thread stopped");
        })
}

fn log_decode_fail_once(channel: PrivateChannel, err: &serde_json::Error, event: &RawEvent) {
    let count = DECODE_FAIL_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < DECODE_FAIL_LOG_LIMIT {
        let preview = truncate_for_log(&event.data.to_string(), RAW_LOG_MAX_BYTES);
        warn!(
            sample_index = count + 1,
            sample_limit = DECODE_FAIL_LOG_LIMIT,
            channel = %channel,
            error = %err,
            data = %preview,
            "ws event payload dropped"
        );
    }
}

fn log_unknown_topic_once(topic: &str) {
    let count = UNKNOWN_TOPIC_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < UNKNOWN_TOPIC_LOG_LIMIT {
        warn!(
            sample_index = count + 1,
            sample_limit = UNKNOWN_TOPIC_LOG_LIMIT,
            topic,
            "ws event for unknown topic dropped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counting_order_change(counter: &Arc<AtomicUsize>) -> EventHandler {
        let counter = counter.clone();
        EventHandler::OrderChange(Arc::new(move |_event| {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
    }

    fn order_change(symbol: &str) -> RawEvent {
        RawEvent {
            topic: "/spotMarket/tradeOrders".to_string(),
            subject: "orderChange".to_string(),
            channel_type: Some("private".to_string()),
            data: json!({
                "symbol": symbol,
                "orderId": "o-1",
                "side": "buy",
                "type": "open"
            }),
        }
    }

    #[test]
    fn duplicate_registration_appends_handler() {
        let counter = Arc::new(AtomicUsize::new(0));
        let key = SubscriptionKey::new(PrivateChannel::OrderChange, ["ETH-BTC"]);
        let mut registry = Registry::default();

        assert!(registry.register(key.clone(), counting_order_change(&counter), "1"));
        assert!(!registry.register(key.clone(), counting_order_change(&counter), "2"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.handler_count(&key), 2);
        assert_eq!(
            registry.status(&key),
            Some(SubscriptionStatus::Pending { request_id: "1".to_string() })
        );
    }

    #[test]
    fn acknowledge_activates_pending_subscription() {
        let counter = Arc::new(AtomicUsize::new(0));
        let key = SubscriptionKey::new(PrivateChannel::OrderChange, ["ETH-BTC"]);
        let mut registry = Registry::default();
        registry.register(key.clone(), counting_order_change(&counter), "7");

        assert_eq!(registry.acknowledge("unknown"), None);
        assert_eq!(registry.acknowledge("7"), Some(key.clone()));
        assert_eq!(registry.status(&key), Some(SubscriptionStatus::Active));
    }

    #[test]
    fn overlapping_subscriptions_each_receive_once() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let registry = Mutex::new(Registry::default());
        {
            let mut guard = lock_registry(&registry);
            guard.register(
                SubscriptionKey::new(PrivateChannel::OrderChange, ["ETH-BTC", "KCS-BTC"]),
                counting_order_change(&first),
                "1",
            );
            guard.register(
                SubscriptionKey::new(PrivateChannel::OrderChange, ["ETH-BTC"]),
                counting_order_change(&second),
                "2",
            );
        }

        assert_eq!(dispatch_event(&registry, &order_change("ETH-BTC")), 2);
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);

        assert_eq!(dispatch_event(&registry, &order_change("KCS-BTC")), 1);
        assert_eq!(first.load(Ordering::SeqCst), 2);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removed_subscription_gets_nothing() {
        let counter = Arc::new(AtomicUsize::new(0));
        let key = SubscriptionKey::new(PrivateChannel::OrderChange, ["ETH-BTC"]);
        let registry = Mutex::new(Registry::default());
        lock_registry(&registry).register(key.clone(), counting_order_change(&counter), "1");

        assert!(lock_registry(&registry).remove(&key));
        assert!(!lock_registry(&registry).remove(&key));

        assert_eq!(dispatch_event(&registry, &order_change("ETH-BTC")), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn bad_payload_and_unknown_topic_do_not_stop_dispatch() {
        let counter = Arc::new(AtomicUsize::new(0));
        let registry = Mutex::new(Registry::default());
        lock_registry(&registry).register(
            SubscriptionKey::new(PrivateChannel::OrderChange, Vec::<String>::new()),
            counting_order_change(&counter),
            "1",
        );

        let mut broken = order_change("ETH-BTC");
        broken.data = json!({"symbol": "ETH-BTC", "side": 42});
        assert_eq!(dispatch_event(&registry, &broken), 0);

        let mut unknown = order_change("ETH-BTC");
        unknown.topic = "/market/ticker:ETH-BTC".to_string();
        assert_eq!(dispatch_event(&registry, &unknown), 0);

        assert_eq!(dispatch_event(&registry, &order_change("ETH-BTC")), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_callback_is_contained() {
        let counter = Arc::new(AtomicUsize::new(0));
        let registry = Mutex::new(Registry::default());
        {
            let mut guard = lock_registry(&registry);
            guard.register(
                SubscriptionKey::new(PrivateChannel::OrderChange, ["ETH-BTC"]),
                EventHandler::OrderChange(Arc::new(|_event| panic!("callback failure"))),
                "1",
            );
            guard.register(
                SubscriptionKey::new(PrivateChannel::OrderChange, Vec::<String>::new()),
                counting_order_change(&counter),
                "2",
            );
        }

        assert_eq!(dispatch_event(&registry, &order_change("ETH-BTC")), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let registry: SharedRegistry = Arc::new(Mutex::new(Registry::default()));
        let key = SubscriptionKey::new(PrivateChannel::OrderChange, ["ETH-BTC"]);
        let counter = Arc::new(AtomicUsize::new(0));

        let handler = {
            let registry = registry.clone();
            let key = key.clone();
            let counter = counter.clone();
            EventHandler::OrderChange(Arc::new(move |_event| {
                counter.fetch_add(1, Ordering::SeqCst);
                lock_registry(&registry).remove(&key);
            }))
        };
        lock_registry(&registry).register(key, handler, "1");

        dispatch_event(&registry, &order_change("ETH-BTC"));
        dispatch_event(&registry, &order_change("ETH-BTC"));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(lock_registry(&registry).is_empty());
    }

    #[test]
    fn released_topic_keeps_shared_symbols() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut registry = Registry::default();
        let wide = SubscriptionKey::new(PrivateChannel::OrderActivate, ["ETH-BTC", "KCS-BTC"]);
        let narrow = SubscriptionKey::new(PrivateChannel::OrderActivate, ["ETH-BTC"]);
        let handler = || EventHandler::OrderActivate(Arc::new(|_event| {}));
        registry.register(wide.clone(), handler(), "1");
        registry.register(narrow.clone(), handler(), "2");

        registry.remove(&wide);
        assert_eq!(
            registry.released_topic(&wide),
            Some("/market/level3:KCS-BTC".to_string())
        );

        registry.remove(&narrow);
        assert_eq!(
            registry.released_topic(&narrow),
            Some("/market/level3:ETH-BTC".to_string())
        );

        let orders = SubscriptionKey::new(PrivateChannel::OrderChange, ["ETH-BTC"]);
        let others = SubscriptionKey::new(PrivateChannel::OrderChange, ["BTC-USDT"]);
        registry.register(orders.clone(), counting_order_change(&counter), "3");
        registry.register(others.clone(), counting_order_change(&counter), "4");
        registry.remove(&orders);
        assert_eq!(registry.released_topic(&orders), None);
        registry.remove(&others);
        assert_eq!(
            registry.released_topic(&others),
            Some("/spotMarket/tradeOrders".to_string())
        );
    }

    #[test]
    fn resubscribe_resets_status() {
        let counter = Arc::new(AtomicUsize::new(0));
        let key = SubscriptionKey::new(PrivateChannel::OrderChange, ["ETH-BTC"]);
        let mut registry = Registry::default();
        registry.register(key.clone(), counting_order_change(&counter), "1");
        registry.acknowledge("1");

        let mut seq = 10;
        let frames = registry.resubscribe_all(|| {
            seq += 1;
            seq.to_string()
        });

        assert_eq!(frames, vec![(key.clone(), "11".to_string())]);
        assert_eq!(
            registry.status(&key),
            Some(SubscriptionStatus::Pending { request_id: "11".to_string() })
        );
    }

    #[test]
    fn dispatcher_thread_delivers_and_stops() {
        let counter = Arc::new(AtomicUsize::new(0));
        let registry: SharedRegistry = Arc::new(Mutex::new(Registry::default()));
        lock_registry(&registry).register(
            SubscriptionKey::new(PrivateChannel::OrderChange, ["ETH-BTC"]),
            counting_order_change(&counter),
            "1",
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = spawn_dispatcher(registry, rx).expect("spawn dispatcher");
        assert_eq!(handle.thread().name(), Some(DISPATCH_THREAD_NAME));

        tx.send(order_change("ETH-BTC")).unwrap();
        tx.send(order_change("ETH-BTC")).unwrap();
        drop(tx);

        handle.join().expect("dispatcher panicked");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
