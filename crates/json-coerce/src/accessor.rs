//! Object and array accessors over dynamic values.
//!
//! Every accessor first checks the value's shape. Reads on the wrong shape
//! yield `Null`, writes are no-ops. Freeze violations always reach the caller
//! unchanged; other failures are wrapped as `Get` / `Set` errors.

use tracing::trace;

use crate::checker::is_instance;
use crate::error::{Error, ErrorReason, Result};
use crate::shape::{as_array, as_object, as_object_mut};
use crate::value::Value;

// -------------------------------------------------------------------------
// Objects

pub fn has_field(value: &Value, key: &str) -> bool {
    as_object(value).is_some_and(|m| m.contains_key(key))
}

/// The value stored under `key`, or `Null` when absent or not object-shaped.
pub fn get_field(value: &Value, key: &str) -> Value {
    as_object(value)
        .and_then(|m| m.get(key))
        .cloned()
        .unwrap_or_default()
}

/// Inserts or replaces `key`. No-op when `value` is not object-shaped.
pub fn set_field(value: &mut Value, key: &str, field: Value) -> Result<()> {
    let Some(map) = as_object_mut(value) else {
        return Ok(());
    };
    trace!(key, "set field");
    map.put(key, field)
        .map(drop)
        .map_err(|e| e.into_set(ErrorReason::InherentTypeViolation))
}

/// Removes `key`. No-op when `value` is not object-shaped or the key is
/// absent; a frozen object fails either way.
pub fn remove_field(value: &mut Value, key: &str) -> Result<()> {
    let Some(map) = as_object_mut(value) else {
        return Ok(());
    };
    map.remove(key).map(drop)
}

/// Keys in insertion order; empty for null and non-object values.
pub fn keys_of(value: &Value) -> Vec<String> {
    as_object(value)
        .map(|m| m.keys().map(str::to_owned).collect())
        .unwrap_or_default()
}

// -------------------------------------------------------------------------
// Arrays

/// The element at `index`, or `Null` when `value` is not array-shaped.
pub fn get_element_at(value: &Value, index: i64) -> Result<Value> {
    match as_array(value) {
        Some(array) => array.get_checked(index).map_err(Error::into_get),
        None => Ok(Value::Null),
    }
}

/// Writes `element` at `index`; `index == len` appends. No-op when `value`
/// is not array-shaped.
///
/// The element type is checked before anything else, so an incompatible
/// element reports `IncompatibleType` even on a frozen array.
pub fn set_element_at(value: &mut Value, index: i64, element: Value) -> Result<()> {
    let Some(array) = value.as_array_mut() else {
        return Ok(());
    };
    if !is_instance(&element, array.element_type()) {
        return Err(Error::incompatible(
            array.element_type(),
            element.type_name(),
        ));
    }
    trace!(index, "set element");
    array.set(index, element).map_err(|e| {
        let reason = e.set_reason();
        e.into_set(reason)
    })
}
