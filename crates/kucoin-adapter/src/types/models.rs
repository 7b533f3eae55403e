/*
[INPUT]:  KuCoin API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{AccountType, OrderType, Side, TimeInForce};
use super::serde_helpers::{decimal_opt, decimal_or_zero};

/// Trading pair metadata, shared by the v1 and v2 symbol listings.
///
/// `market`, `min_funds` and `is_margin_enabled` are only populated by v2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolResponse {
    pub symbol: String,
    pub name: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub fee_currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_min_size: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub quote_min_size: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_max_size: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub quote_max_size: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_increment: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub quote_increment: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_increment: Decimal,
    #[serde(default, with = "decimal_opt")]
    pub price_limit_rate: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub min_funds: Option<Decimal>,
    #[serde(default)]
    pub is_margin_enabled: bool,
    pub enable_trading: bool,
}

/// Level-1 order book snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerResponse {
    pub sequence: String,
    #[serde(with = "decimal_opt")]
    pub price: Option<Decimal>,
    #[serde(with = "decimal_opt")]
    pub size: Option<Decimal>,
    #[serde(with = "decimal_opt")]
    pub best_bid: Option<Decimal>,
    #[serde(with = "decimal_opt")]
    pub best_bid_size: Option<Decimal>,
    #[serde(with = "decimal_opt")]
    pub best_ask: Option<Decimal>,
    #[serde(with = "decimal_opt")]
    pub best_ask_size: Option<Decimal>,
    pub time: i64,
}

/// 24h statistics for a single symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolTickResponse {
    pub time: i64,
    pub symbol: String,
    #[serde(default, with = "decimal_opt")]
    pub buy: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub sell: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub change_rate: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub change_price: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub high: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub low: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub vol: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub vol_value: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub last: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub average_price: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub taker_fee_rate: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub maker_fee_rate: Option<Decimal>,
}

/// One entry of the all-tickers snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerItem {
    pub symbol: String,
    #[serde(default)]
    pub symbol_name: Option<String>,
    #[serde(default, with = "decimal_opt")]
    pub buy: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub sell: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub change_rate: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub change_price: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub high: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub low: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub vol: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub vol_value: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub last: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub average_price: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub taker_fee_rate: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub maker_fee_rate: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllTickersResponse {
    pub time: i64,
    pub ticker: Vec<TickerItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub op_type: Option<String>,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    #[serde(with = "decimal_or_zero")]
    pub price: Decimal,
    #[serde(with = "decimal_or_zero")]
    pub size: Decimal,
    #[serde(default, with = "decimal_or_zero")]
    pub funds: Decimal,
    #[serde(default, with = "decimal_or_zero")]
    pub deal_funds: Decimal,
    #[serde(default, with = "decimal_or_zero")]
    pub deal_size: Decimal,
    #[serde(default, with = "decimal_or_zero")]
    pub fee: Decimal,
    #[serde(default)]
    pub fee_currency: Option<String>,
    #[serde(default)]
    pub stp: Option<String>,
    #[serde(default)]
    pub stop: Option<String>,
    #[serde(default)]
    pub stop_triggered: bool,
    #[serde(default, with = "decimal_opt")]
    pub stop_price: Option<Decimal>,
    pub time_in_force: TimeInForce,
    #[serde(default)]
    pub post_only: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub iceberg: bool,
    #[serde(default, with = "decimal_opt")]
    pub visible_size: Option<Decimal>,
    #[serde(default)]
    pub cancel_after: i64,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub client_oid: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub cancel_exist: bool,
    pub created_at: i64,
    #[serde(default)]
    pub trade_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopOrderResponse {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub status: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    #[serde(default, with = "decimal_opt")]
    pub price: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub size: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub funds: Option<Decimal>,
    #[serde(default)]
    pub stp: Option<String>,
    #[serde(default)]
    pub time_in_force: Option<TimeInForce>,
    #[serde(default)]
    pub cancel_after: i64,
    #[serde(default)]
    pub post_only: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub iceberg: bool,
    #[serde(default, with = "decimal_opt")]
    pub visible_size: Option<Decimal>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub client_oid: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub order_time: Option<i64>,
    #[serde(default)]
    pub trade_type: Option<String>,
    #[serde(default)]
    pub fee_currency: Option<String>,
    #[serde(default, with = "decimal_opt")]
    pub taker_fee_rate: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub maker_fee_rate: Option<Decimal>,
    pub created_at: i64,
    pub stop: String,
    #[serde(default)]
    pub stop_trigger_time: Option<i64>,
    #[serde(with = "decimal_or_zero")]
    pub stop_price: Decimal,
}

/// Entry of the account listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalancesResponse {
    pub id: String,
    pub currency: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub available: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub holds: Decimal,
}

/// Balance of a single account looked up by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalanceResponse {
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub available: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub holds: Decimal,
}

/// A WebSocket instance server returned by the bullet endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceServer {
    pub endpoint: String,
    #[serde(default)]
    pub encrypt: bool,
    pub protocol: String,
    /// Milliseconds between client pings
    pub ping_interval: u64,
    /// Milliseconds before the server drops a silent connection
    pub ping_timeout: u64,
}

/// Connection token for the WebSocket feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsToken {
    pub token: String,
    pub instance_servers: Vec<InstanceServer>,
}

impl WsToken {
    /// First instance server, which the exchange lists as preferred.
    pub fn primary_server(&self) -> Option<&InstanceServer> {
        self.instance_servers.first()
    }
}
