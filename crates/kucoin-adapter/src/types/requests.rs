/*
[INPUT]:  KuCoin API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AccountType, OrderStatus, OrderType, Side, StopCondition, Stp, TimeInForce, TradeType};

/// Generate a client order id in the format the exchange accepts (<= 40 chars).
pub fn new_client_oid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Body of `POST /api/v1/orders`.
///
/// Optional fields are omitted from the body when `None`, which leaves the
/// exchange default in effect (`tradeType=TRADE`, `timeInForce=GTC`, no STP).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    pub client_oid: String,
    pub side: Side,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stp: Option<Stp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_type: Option<TradeType>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub size: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    /// Seconds until a GTT order is cancelled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iceberg: Option<bool>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub visible_size: Option<Decimal>,
    /// Quote amount for market orders placed by funds instead of size
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub funds: Option<Decimal>,
}

impl OrderCreateRequest {
    /// Limit order with a freshly generated client order id.
    pub fn limit(symbol: impl Into<String>, side: Side, price: Decimal, size: Decimal) -> Self {
        Self {
            client_oid: new_client_oid(),
            side,
            symbol: symbol.into(),
            order_type: OrderType::Limit,
            remark: None,
            stp: None,
            trade_type: None,
            price: Some(price),
            size: Some(size),
            time_in_force: None,
            cancel_after: None,
            post_only: None,
            hidden: None,
            iceberg: None,
            visible_size: None,
            funds: None,
        }
    }

    /// Market order sized in base currency.
    pub fn market(symbol: impl Into<String>, side: Side, size: Decimal) -> Self {
        Self {
            order_type: OrderType::Market,
            price: None,
            ..Self::limit(symbol, side, Decimal::ZERO, size)
        }
    }
}

/// Body of `POST /api/v1/stop-order`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopOrderCreateRequest {
    pub client_oid: String,
    pub side: Side,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// Defaults to `loss` on the exchange side when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<StopCondition>,
    #[serde(with = "rust_decimal::serde::str")]
    pub stop_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stp: Option<Stp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_type: Option<TradeType>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub size: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iceberg: Option<bool>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub visible_size: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub funds: Option<Decimal>,
}

impl StopOrderCreateRequest {
    /// Stop-limit order with a freshly generated client order id.
    pub fn limit(
        symbol: impl Into<String>,
        side: Side,
        stop: StopCondition,
        stop_price: Decimal,
        price: Decimal,
        size: Decimal,
    ) -> Self {
        Self {
            client_oid: new_client_oid(),
            side,
            symbol: symbol.into(),
            order_type: OrderType::Limit,
            remark: None,
            stop: Some(stop),
            stop_price,
            stp: None,
            trade_type: None,
            price: Some(price),
            size: Some(size),
            time_in_force: None,
            cancel_after: None,
            post_only: None,
            hidden: None,
            iceberg: None,
            visible_size: None,
            funds: None,
        }
    }
}

/// Filters for `GET /api/v1/orders`. Every field is optional; the exchange
/// defaults to `status=done` within the last 7 days, page 1, 50 per page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub symbol: Option<String>,
    pub side: Option<Side>,
    pub order_type: Option<OrderType>,
    pub trade_type: Option<TradeType>,
    /// Milliseconds since epoch
    pub start_at: Option<i64>,
    /// Milliseconds since epoch
    pub end_at: Option<i64>,
    pub current_page: Option<u32>,
    pub page_size: Option<u32>,
}

impl OrderListQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(symbol) = &self.symbol {
            pairs.push(("symbol", symbol.clone()));
        }
        if let Some(side) = self.side {
            pairs.push(("side", side.as_str().to_string()));
        }
        if let Some(order_type) = self.order_type {
            pairs.push(("type", order_type.as_str().to_string()));
        }
        if let Some(trade_type) = self.trade_type {
            pairs.push(("tradeType", trade_type.as_str().to_string()));
        }
        push_paging(
            &mut pairs,
            self.start_at,
            self.end_at,
            self.current_page,
            self.page_size,
        );
        pairs
    }
}

/// Filters for `GET /api/v1/stop-order`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopOrderListQuery {
    pub symbol: Option<String>,
    pub side: Option<Side>,
    pub order_type: Option<OrderType>,
    pub trade_type: Option<TradeType>,
    /// Comma separated order ids
    pub order_ids: Option<String>,
    pub start_at: Option<i64>,
    pub end_at: Option<i64>,
    pub current_page: Option<u32>,
    pub page_size: Option<u32>,
}

impl StopOrderListQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(symbol) = &self.symbol {
            pairs.push(("symbol", symbol.clone()));
        }
        if let Some(side) = self.side {
            pairs.push(("side", side.as_str().to_string()));
        }
        if let Some(order_type) = self.order_type {
            pairs.push(("type", order_type.as_str().to_string()));
        }
        if let Some(trade_type) = self.trade_type {
            pairs.push(("tradeType", trade_type.as_str().to_string()));
        }
        if let Some(order_ids) = &self.order_ids {
            pairs.push(("orderIds", order_ids.clone()));
        }
        push_paging(
            &mut pairs,
            self.start_at,
            self.end_at,
            self.current_page,
            self.page_size,
        );
        pairs
    }
}

fn push_paging(
    pairs: &mut Vec<(&'static str, String)>,
    start_at: Option<i64>,
    end_at: Option<i64>,
    current_page: Option<u32>,
    page_size: Option<u32>,
) {
    if let Some(start_at) = start_at {
        pairs.push(("startAt", start_at.to_string()));
    }
    if let Some(end_at) = end_at {
        pairs.push(("endAt", end_at.to_string()));
    }
    if let Some(current_page) = current_page {
        pairs.push(("currentPage", current_page.to_string()));
    }
    if let Some(page_size) = page_size {
        pairs.push(("pageSize", page_size.to_string()));
    }
}

/// Body of `POST /api/v2/accounts/inner-transfer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InnerTransferRequest {
    pub client_oid: String,
    pub currency: String,
    pub from: AccountType,
    pub to: AccountType,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Isolated margin trading pair, required when `from` is isolated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_tag: Option<String>,
    /// Isolated margin trading pair, required when `to` is isolated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_tag: Option<String>,
}

/// Body of the deprecated `POST /api/v1/accounts/inner-transfer`, which
/// addresses accounts by id rather than by type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyInnerTransferRequest {
    pub client_oid: String,
    pub pay_account_id: String,
    pub rec_account_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Body of `POST /api/v1/accounts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountCreateRequest {
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub currency: String,
}
