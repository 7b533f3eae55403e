/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod account;
pub mod bullet;
pub mod client;
pub mod error;
pub mod order;
pub mod signature;
pub mod stop_order;
pub mod symbol;

pub use bullet::TokenProvider;
pub use error::{KucoinError, Result};
pub use signature::RequestSigner;

pub use client::{ApiKeyVersion, ClientConfig, Credentials, Environment, KucoinClient};
