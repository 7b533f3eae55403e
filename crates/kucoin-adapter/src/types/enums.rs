/*
[INPUT]:  KuCoin API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    #[serde(rename = "GTC")]
    Gtc,
    #[serde(rename = "GTT")]
    Gtt,
    #[serde(rename = "IOC")]
    Ioc,
    #[serde(rename = "FOK")]
    Fok,
}

/// Self-trade prevention strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stp {
    /// Cancel newest
    #[serde(rename = "CN")]
    CancelNewest,
    /// Cancel oldest
    #[serde(rename = "CO")]
    CancelOldest,
    /// Cancel both
    #[serde(rename = "CB")]
    CancelBoth,
    /// Decrease and cancel
    #[serde(rename = "DC")]
    DecreaseAndCancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeType {
    #[serde(rename = "TRADE")]
    Trade,
    #[serde(rename = "MARGIN_TRADE")]
    MarginTrade,
    #[serde(rename = "MARGIN_ISOLATED_TRADE")]
    MarginIsolatedTrade,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Trade => "TRADE",
            TradeType::MarginTrade => "MARGIN_TRADE",
            TradeType::MarginIsolatedTrade => "MARGIN_ISOLATED_TRADE",
        }
    }
}

/// Filter for order listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Active,
    Done,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Active => "active",
            OrderStatus::Done => "done",
        }
    }
}

/// Trigger direction of a stop order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopCondition {
    /// Triggers when the last trade price falls to or below the stop price
    Loss,
    /// Triggers when the last trade price rises to or above the stop price
    Entry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Main,
    Trade,
    TradeHf,
    Margin,
    Isolated,
    Contract,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Main => "main",
            AccountType::Trade => "trade",
            AccountType::TradeHf => "trade_hf",
            AccountType::Margin => "margin",
            AccountType::Isolated => "isolated",
            AccountType::Contract => "contract",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_matches_wire_value() {
        assert_eq!(
            serde_json::to_value(AccountType::TradeHf).unwrap(),
            serde_json::json!(AccountType::TradeHf.as_str())
        );
        assert_eq!(
            serde_json::to_value(TradeType::MarginIsolatedTrade).unwrap(),
            serde_json::json!(TradeType::MarginIsolatedTrade.as_str())
        );
        assert_eq!(serde_json::to_value(Side::Sell).unwrap(), serde_json::json!("sell"));
    }

    #[test]
    fn time_in_force_uses_upper_case() {
        let tif: TimeInForce = serde_json::from_str("\"IOC\"").unwrap();
        assert_eq!(tif, TimeInForce::Ioc);
        assert_eq!(serde_json::to_string(&Stp::CancelBoth).unwrap(), "\"CB\"");
    }
}
