//! Shape predicates guarding every accessor and conversion entry point.

use crate::types::TypeTag;
use crate::value::{ArrayValue, MapValue, Value};

/// True for JSON objects and maps. Structure values are not object-shaped.
pub fn is_object_shaped(value: &Value) -> bool {
    as_object(value).is_some()
}

pub fn is_array_shaped(value: &Value) -> bool {
    matches!(value, Value::Array(_))
}

pub(crate) fn as_object(value: &Value) -> Option<&MapValue> {
    match value {
        Value::Map(m) if matches!(m.ty().tag(), TypeTag::Json | TypeTag::Map) => Some(m),
        _ => None,
    }
}

pub(crate) fn as_object_mut(value: &mut Value) -> Option<&mut MapValue> {
    match value {
        Value::Map(m) if matches!(m.ty().tag(), TypeTag::Json | TypeTag::Map) => Some(m),
        _ => None,
    }
}

pub(crate) fn as_array(value: &Value) -> Option<&ArrayValue> {
    value.as_array()
}
