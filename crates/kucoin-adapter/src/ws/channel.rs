/*
[INPUT]:  Channel kind and symbol filters, inbound topics
[OUTPUT]: Wire topics and subscription keys
[POS]:    WebSocket layer - private channel catalogue
[UPDATE]: When the exchange adds or renames private topics
*/

use std::collections::BTreeSet;
use std::fmt;

/// Private channels the event client can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrivateChannel {
    /// Own orders entering the book (`/market/level3:{symbols}`)
    OrderActivate,
    /// Order lifecycle changes (`/spotMarket/tradeOrders`)
    OrderChange,
    /// Balance changes (`/account/balance`)
    AccountBalance,
    /// Stop order lifecycle (`/spotMarket/advancedOrders`)
    AdvancedOrder,
}

impl PrivateChannel {
    pub const ALL: [PrivateChannel; 4] = [
        PrivateChannel::OrderActivate,
        PrivateChannel::OrderChange,
        PrivateChannel::AccountBalance,
        PrivateChannel::AdvancedOrder,
    ];

    pub fn topic_prefix(&self) -> &'static str {
        match self {
            PrivateChannel::OrderActivate => "/market/level3",
            PrivateChannel::OrderChange => "/spotMarket/tradeOrders",
            PrivateChannel::AccountBalance => "/account/balance",
            PrivateChannel::AdvancedOrder => "/spotMarket/advancedOrders",
        }
    }

    /// Whether the symbol filter is part of the wire topic. Other channels
    /// deliver every symbol and are filtered on arrival.
    pub fn is_symbol_scoped(&self) -> bool {
        matches!(self, PrivateChannel::OrderActivate)
    }

    /// Wire topic for a symbol set
    pub fn topic<'a, I>(&self, symbols: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !self.is_symbol_scoped() {
            return self.topic_prefix().to_string();
        }
        let joined = symbols.into_iter().collect::<Vec<_>>().join(",");
        if joined.is_empty() {
            self.topic_prefix().to_string()
        } else {
            format!("{}:{joined}", self.topic_prefix())
        }
    }

    /// Resolve a topic into its channel and the symbol suffix, if any
    pub fn from_topic(topic: &str) -> Option<(PrivateChannel, Option<&str>)> {
        let (prefix, suffix) = match topic.split_once(':') {
            Some((prefix, suffix)) => (prefix, Some(suffix).filter(|s| !s.is_empty())),
            None => (topic, None),
        };
        PrivateChannel::ALL
            .into_iter()
            .find(|channel| channel.topic_prefix() == prefix)
            .map(|channel| (channel, suffix))
    }
}

impl fmt::Display for PrivateChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrivateChannel::OrderActivate => "order_activate",
            PrivateChannel::OrderChange => "order_change",
            PrivateChannel::AccountBalance => "account_balance",
            PrivateChannel::AdvancedOrder => "advanced_order",
        };
        f.write_str(name)
    }
}

/// Identity of a subscription: channel plus symbol filter.
///
/// An empty symbol set matches every event of the channel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionKey {
    pub channel: PrivateChannel,
    pub symbols: BTreeSet<String>,
}

impl SubscriptionKey {
    pub fn new<I, S>(channel: PrivateChannel, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channel,
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    pub fn topic(&self) -> String {
        self.channel.topic(self.symbols.iter().map(String::as_str))
    }

    /// Whether an event of `channel` for `symbol` belongs to this subscription
    pub fn matches(&self, channel: PrivateChannel, symbol: Option<&str>) -> bool {
        if self.channel != channel {
            return false;
        }
        if self.symbols.is_empty() {
            return true;
        }
        symbol.is_some_and(|symbol| self.symbols.contains(symbol))
    }
}

impl fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.symbols.is_empty() {
            write!(f, "{}", self.channel)
        } else {
            let symbols: Vec<&str> = self.symbols.iter().map(String::as_str).collect();
            write!(f, "{}[{}]", self.channel, symbols.join(","))
        }
    }
}
