/*
[INPUT]:  Raw WebSocket JSON frames from the private feed
[OUTPUT]: Typed inbound frames, outbound control frames, event payloads
[POS]:    WebSocket layer - wire format
[UPDATE]: When the exchange adds frame types or event fields
*/

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Side;
use crate::types::serde_helpers::{decimal_opt, i64_or_string};

/// Outbound control frame (`subscribe`, `unsubscribe`, `ping`)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundFrame {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: OutboundKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_channel: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboundKind {
    Subscribe,
    Unsubscribe,
    Ping,
}

impl OutboundFrame {
    pub fn subscribe(id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: OutboundKind::Subscribe,
            topic: Some(topic.into()),
            private_channel: Some(true),
            response: Some(true),
        }
    }

    pub fn unsubscribe(id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            kind: OutboundKind::Unsubscribe,
            ..Self::subscribe(id, topic)
        }
    }

    pub fn ping(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: OutboundKind::Ping,
            topic: None,
            private_channel: None,
            response: None,
        }
    }
}

/// Every frame the server may send, discriminated by `type`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundFrame {
    Welcome {
        id: String,
    },
    Ack {
        id: String,
    },
    Pong {
        id: String,
    },
    Message(RawEvent),
    Error {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        code: Option<Value>,
        #[serde(default)]
        data: Option<Value>,
    },
}

/// A channel event as delivered to callbacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KucoinEvent<T> {
    pub topic: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_type: Option<String>,
    pub data: T,
}

/// Event whose payload has not been decoded yet
pub type RawEvent = KucoinEvent<Value>;

impl RawEvent {
    /// Decode the payload into a channel's event type
    pub fn decode<T: DeserializeOwned>(&self) -> Result<KucoinEvent<T>, serde_json::Error> {
        Ok(KucoinEvent {
            topic: self.topic.clone(),
            subject: self.subject.clone(),
            channel_type: self.channel_type.clone(),
            data: T::deserialize(&self.data)?,
        })
    }

    /// `symbol` field of the payload, if it carries one
    pub fn payload_symbol(&self) -> Option<&str> {
        self.data.get("symbol").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderChangeType {
    Open,
    Match,
    Filled,
    Canceled,
    Update,
    #[serde(other)]
    Unknown,
}

/// `/spotMarket/tradeOrders` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderChangeEvent {
    pub symbol: String,
    pub order_id: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub change_type: OrderChangeType,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub client_oid: Option<String>,
    #[serde(default, with = "decimal_opt")]
    pub price: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub size: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub filled_size: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub remain_size: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub old_size: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub match_price: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub match_size: Option<Decimal>,
    #[serde(default)]
    pub trade_id: Option<String>,
    #[serde(default)]
    pub liquidity: Option<String>,
    #[serde(default, with = "i64_or_string")]
    pub order_time: i64,
    #[serde(default, with = "i64_or_string")]
    pub ts: i64,
}

/// `/market/level3:{symbols}` payload for the user's own orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderActivateEvent {
    pub symbol: String,
    #[serde(default)]
    pub sequence: Option<String>,
    #[serde(default)]
    pub side: Option<Side>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub client_oid: Option<String>,
    #[serde(default, with = "decimal_opt")]
    pub price: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub size: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub remain_size: Option<Decimal>,
    #[serde(default)]
    pub stp: Option<String>,
    #[serde(default)]
    pub taker_order_id: Option<String>,
    #[serde(default)]
    pub maker_order_id: Option<String>,
    #[serde(default)]
    pub trade_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, with = "i64_or_string")]
    pub order_time: i64,
    #[serde(default, with = "i64_or_string")]
    pub ts: i64,
}

/// `/account/balance` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountChangeEvent {
    pub currency: String,
    #[serde(default, with = "decimal_opt")]
    pub total: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub available: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub available_change: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub hold: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub hold_change: Option<Decimal>,
    #[serde(default)]
    pub relation_event: Option<String>,
    #[serde(default)]
    pub relation_event_id: Option<String>,
    #[serde(default)]
    pub relation_context: Option<Value>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default, with = "i64_or_string")]
    pub time: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvancedOrderType {
    Open,
    Triggered,
    Cancel,
    #[serde(other)]
    Unknown,
}

/// `/spotMarket/advancedOrders` payload (stop orders)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedOrderEvent {
    pub symbol: String,
    pub order_id: String,
    #[serde(rename = "type")]
    pub event_type: AdvancedOrderType,
    #[serde(default)]
    pub side: Option<Side>,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub trade_type: Option<String>,
    #[serde(default)]
    pub stop: Option<String>,
    #[serde(default, with = "decimal_opt")]
    pub stop_price: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub order_price: Option<Decimal>,
    #[serde(default, with = "decimal_opt")]
    pub size: Option<Decimal>,
    #[serde(default)]
    pub trigger_success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, with = "i64_or_string")]
    pub created_at: i64,
    #[serde(default, with = "i64_or_string")]
    pub ts: i64,
}

/// Cut a frame down for log output without splitting a UTF-8 sequence
pub(crate) fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn subscribe_frame_wire_shape() {
        let frame = OutboundFrame::subscribe("42", "/spotMarket/tradeOrders");
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({
                "id": "42",
                "type": "subscribe",
                "topic": "/spotMarket/tradeOrders",
                "privateChannel": true,
                "response": true
            })
        );

        let unsub = OutboundFrame::unsubscribe("43", "/account/balance");
        assert_eq!(serde_json::to_value(&unsub).unwrap()["type"], json!("unsubscribe"));
    }

    #[test]
    fn ping_frame_has_only_id_and_type() {
        let frame = OutboundFrame::ping("12345");
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({"id": "12345", "type": "ping"})
        );
    }

    #[test]
    fn inbound_control_frames() {
        let welcome: InboundFrame =
            serde_json::from_str(r#"{"id":"hQvf8jkno","type":"welcome"}"#).unwrap();
        assert_eq!(welcome, InboundFrame::Welcome { id: "hQvf8jkno".to_string() });

        let pong: InboundFrame = serde_json::from_str(r#"{"id":"12345","type":"pong"}"#).unwrap();
        assert_eq!(pong, InboundFrame::Pong { id: "12345".to_string() });

        let error: InboundFrame =
            serde_json::from_str(r#"{"id":"1","type":"error","code":401,"data":"token is expired"}"#)
                .unwrap();
        match error {
            InboundFrame::Error { id, code, data } => {
                assert_eq!(id.as_deref(), Some("1"));
                assert_eq!(code, Some(json!(401)));
                assert_eq!(data, Some(json!("token is expired")));
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn unknown_frame_type_is_rejected() {
        assert!(serde_json::from_str::<InboundFrame>(r#"{"id":"1","type":"bogus"}"#).is_err());
        assert!(serde_json::from_str::<InboundFrame>(r#"{"type":"message","topic":"/x"}"#).is_err());
    }

    #[test]
    fn order_change_event_decodes() {
        let frame: InboundFrame = serde_json::from_value(json!({
            "type": "message",
            "topic": "/spotMarket/tradeOrders",
            "subject": "orderChange",
            "channelType": "private",
            "data": {
                "symbol": "ETH-BTC",
                "orderType": "limit",
                "side": "buy",
                "orderId": "5efab07953bdea00089965d2",
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
        }))
        .unwrap();

        let InboundFrame::Message(raw) = frame else {
            panic!("expected message frame");
        };
        assert_eq!(raw.payload_symbol(), Some("ETH-BTC"));

        let event = raw.decode::<OrderChangeEvent>().unwrap();
        assert_eq!(event.subject, "orderChange");
        assert_eq!(event.data.change_type, OrderChangeType::Open);
        assert_eq!(event.data.price, Some(Decimal::new(1, 6)));
        assert_eq!(event.data.match_size, None);
    }

    #[test]
    fn account_change_event_accepts_string_time() {
        let raw = RawEvent {
            topic: "/account/balance".to_string(),
            subject: "account.balance".to_string(),
            channel_type: None,
            data: json!({
                "total": "88",
                "available": "88",
                "availableChange": "88",
                "currency": "KCS",
                "hold": "0",
                "holdChange": "0",
                "relationEvent": "main.deposit",
                "relationEventId": "5c21e80303aa677bd09d7dff",
                "relationContext": {"symbol": "BTC-USDT", "tradeId": "5e6a5dca9e16882a7d83b7a4"},
                "time": "1545743136994"
            }),
        };

        let event = raw.decode::<AccountChangeEvent>().unwrap();
        assert_eq!(event.data.time, 1_545_743_136_994);
        assert_eq!(event.data.relation_event.as_deref(), Some("main.deposit"));
    }

    #[test]
    fn advanced_order_event_tolerates_unknown_type() {
        let raw = RawEvent {
            topic: "/spotMarket/advancedOrders".to_string(),
            subject: "stopOrder".to_string(),
            channel_type: None,
            data: json!({
                "symbol": "KCS-USDT",
                "orderId": "vs8hoo8ksc8mario0035a74n",
                "type": "somethingNew",
                "stop": "loss",
                "stopPrice": "0.1"
            }),
        };

        let event = raw.decode::<AdvancedOrderEvent>().unwrap();
        assert_eq!(event.data.event_type, AdvancedOrderType::Unknown);
        assert_eq!(event.data.stop_price, Some(Decimal::new(1, 1)));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("abcdef", 3), "abc...");
        assert_eq!(truncate_for_log("ééé", 3), "é...");
    }
}
