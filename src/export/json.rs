//! JSON shaping for stored documents
//!
//! The document store writes typed values as extended JSON wrappers
//! (`{"$oid": ...}`, `{"$numberLong": ...}`, `{"$date": ...}`). API clients
//! expect plain JSON: ids as strings, wide integers as ordinary numbers and
//! dates as RFC 3339 strings.

use chrono::{DateTime, SecondsFormat};
use serde_json::{Map, Number, Value};

/// Recursively replace extended JSON wrappers with plain JSON values
pub fn to_json_compatible(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(to_json_compatible).collect()),
        Value::Object(map) => match unwrap_extended(&map) {
            Some(plain) => plain,
            None => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, to_json_compatible(v)))
                    .collect(),
            ),
        },
        other => other,
    }
}

/// Shape a list of documents
pub fn documents_to_json<I>(documents: I) -> Value
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    Value::Array(
        documents
            .into_iter()
            .map(|doc| to_json_compatible(Value::Object(doc)))
            .collect(),
    )
}

/// Convert a single-key wrapper object, `None` if it is an ordinary object
fn unwrap_extended(map: &Map<String, Value>) -> Option<Value> {
    if map.len() != 1 {
        return None;
    }
    let (key, inner) = map.iter().next()?;

    match (key.as_str(), inner) {
        ("$oid", Value::String(s)) => Some(Value::String(s.clone())),
        ("$numberLong" | "$numberInt", Value::String(s)) => {
            s.trim().parse::<i64>().ok().map(|n| Value::Number(n.into()))
        }
        ("$numberDouble" | "$numberDecimal", Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        ("$date", date) => date_to_json(date),
        _ => None,
    }
}

fn date_to_json(date: &Value) -> Option<Value> {
    let millis = match date {
        Value::String(s) => return Some(Value::String(s.clone())),
        Value::Number(n) => n.as_i64()?,
        Value::Object(inner) => match inner.get("$numberLong") {
            Some(Value::String(s)) => s.trim().parse::<i64>().ok()?,
            _ => return None,
        },
        _ => return None,
    };

    DateTime::from_timestamp_millis(millis)
        .map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)))
}
