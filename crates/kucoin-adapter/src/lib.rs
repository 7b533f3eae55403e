/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public KuCoin adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod types;
pub mod ws;

// Re-export commonly used types from http
pub use http::{
    ApiKeyVersion,
    ClientConfig,
    Credentials,
    Environment,
    KucoinClient,
    KucoinError,
    RequestSigner,
    Result,
    TokenProvider,
};

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{
    AccountChangeEvent,
    AdvancedOrderEvent,
    ConnectionState,
    KucoinEvent,
    KucoinPrivateWebSocket,
    OrderActivateEvent,
    OrderChangeEvent,
    PingOutcome,
    PrivateChannel,
    ReconnectPolicy,
    SubscriptionKey,
    WsConfig,
};
