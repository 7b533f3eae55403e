/*
[INPUT]:  Loosely typed numeric JSON values (string, number, null, "")
[OUTPUT]: Decimal / Option<Decimal> field adapters for serde
[POS]:    Data layer - shared serde helpers for models and WebSocket events
[UPDATE]: When the exchange changes how numeric fields are encoded
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;
use std::str::FromStr;

fn parse_decimal<E>(value: Value) -> Result<Option<Decimal>, E>
where
    E: serde::de::Error,
{
    match value {
        Value::Null => Ok(None),
        Value::String(raw) if raw.trim().is_empty() => Ok(None),
        Value::String(raw) => Decimal::from_str(raw.trim()).map(Some).map_err(E::custom),
        Value::Number(number) => Decimal::from_str(&number.to_string())
            .or_else(|_| Decimal::from_scientific(&number.to_string()))
            .map(Some)
            .map_err(E::custom),
        other => Err(E::custom(format!("invalid decimal value: {other}"))),
    }
}

/// Optional decimal that tolerates null, empty strings and bare numbers.
///
/// Serializes back to a string so request bodies keep full precision.
pub mod decimal_opt {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        parse_decimal(value)
    }

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(decimal) => serializer.serialize_str(&decimal.to_string()),
            None => serializer.serialize_none(),
        }
    }
}

/// Required decimal that also accepts bare JSON numbers; null and "" become zero.
pub mod decimal_or_zero {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(parse_decimal::<D::Error>(value)?.unwrap_or(Decimal::ZERO))
    }

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }
}

/// Integer timestamp that the exchange sometimes sends as a string.
pub mod i64_or_string {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(number) => number
                .as_i64()
                .ok_or_else(|| serde::de::Error::custom("timestamp out of range")),
            Value::String(raw) => raw.trim().parse().map_err(serde::de::Error::custom),
            Value::Null => Ok(0),
            other => Err(serde::de::Error::custom(format!(
                "invalid timestamp value: {other}"
            ))),
        }
    }

    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(*value)
    }
}
