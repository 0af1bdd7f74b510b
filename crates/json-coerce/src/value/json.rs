//! Interop with `serde_json::Value` trees.
//!
//! Objects become `json`-typed maps in source order; arrays become boxed
//! `json[]` arrays. The reverse direction rejects values with no JSON number
//! form.

use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::error::Error;
use crate::types::Type;

use super::{ArrayValue, MapValue, Value};

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Array(ArrayValue::from_boxed_unchecked(
                Type::Json,
                items.into_iter().map(Value::from).collect(),
            )),
            JsonValue::Object(entries) => {
                let mut map = MapValue::json();
                for (key, item) in entries {
                    map.insert_unchecked(key, Value::from(item));
                }
                Value::Map(map)
            }
        }
    }
}

impl TryFrom<&Value> for JsonValue {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let json = match value {
            Value::Null => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::Number(Number::from(*i)),
            Value::Byte(b) => JsonValue::Number(Number::from(*b)),
            Value::Float(n) => JsonValue::Number(
                Number::from_f64(*n).ok_or_else(|| Error::incompatible(Type::Json, "float"))?,
            ),
            Value::Decimal(d) => JsonValue::Number(
                d.to_f64()
                    .and_then(Number::from_f64)
                    .ok_or_else(|| Error::incompatible(Type::Json, "decimal"))?,
            ),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Array(a) => JsonValue::Array(
                a.iter()
                    .map(|element| JsonValue::try_from(element.as_ref()))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(m) => {
                let mut object = JsonMap::with_capacity(m.len());
                for (key, item) in m {
                    object.insert(key.clone(), JsonValue::try_from(item)?);
                }
                JsonValue::Object(object)
            }
        };
        Ok(json)
    }
}

impl TryFrom<Value> for JsonValue {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        JsonValue::try_from(&value)
    }
}
