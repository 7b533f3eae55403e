/*
[INPUT]:  WebSocket token provider, configuration and channel callbacks
[OUTPUT]: Private order, balance and stop order events
[POS]:    WebSocket layer - private real-time event streams
[UPDATE]: When adding new channels or changing connection logic
*/

pub mod channel;
pub mod client;
pub mod dispatch;
pub mod message;

pub use channel::{PrivateChannel, SubscriptionKey};
pub use client::{ConnectionState, KucoinPrivateWebSocket, PingOutcome, ReconnectPolicy, WsConfig};
pub use dispatch::{EventHandler, SubscriptionStatus};
pub use message::{
    AccountChangeEvent, AdvancedOrderEvent, AdvancedOrderType, InboundFrame, KucoinEvent,
    OrderActivateEvent, OrderChangeEvent, OrderChangeType, OutboundFrame, RawEvent,
};
