//! Typed → JSON conversion.
//!
//! Dispatch is on the runtime tag of each value, not on a static schema.
//! Scalars with a JSON form pass through; arrays, maps and structures are
//! rebuilt as JSON containers; byte values have no JSON form here.

use tracing::trace;

use crate::checker::is_json_compatible;
use crate::error::{Error, Result};
use crate::types::{Type, TypeTag};
use crate::value::{ArrayValue, MapValue, Value};

use super::Depth;

/// Rebuilds `array` as a `json[]`.
///
/// Int, float, boolean and string element types are copied in one pass;
/// every other element type is converted element by element. Scalars pass
/// through only when the declared element type is JSON-compatible, so a
/// `json[]` or `decimal[]` converts while an `any[]` holding an int does not.
pub(crate) fn array_to_json(array: &ArrayValue, depth: Depth) -> Result<ArrayValue> {
    let depth = depth.enter()?;
    trace!(element = %array.element_type(), len = array.len(), "converting array to json");

    let values = match array.element_type().tag() {
        TypeTag::Int | TypeTag::Float | TypeTag::Boolean | TypeTag::String => array.to_vec(),
        _ => {
            let scalars_are_json = is_json_compatible(array.element_type());
            array
                .iter()
                .map(|element| element_to_json(&element, scalars_are_json, depth))
                .collect::<Result<Vec<_>>>()?
        }
    };
    Ok(ArrayValue::from_boxed_unchecked(Type::Json, values))
}

fn element_to_json(element: &Value, scalars_are_json: bool, depth: Depth) -> Result<Value> {
    match element {
        Value::Null => Ok(Value::Null),
        Value::Array(array) => array_to_json(array, depth).map(Value::Array),
        Value::Map(map) => mapping_to_json(element, map, &Type::Json, depth),
        scalar if scalars_are_json && scalar.type_tag().is_json_scalar() => Ok(scalar.clone()),
        _ => Err(Error::incompatible(Type::Json, element.type_name())),
    }
}

/// JSON objects pass through; maps and structures are rebuilt as `target`.
fn mapping_to_json(value: &Value, map: &MapValue, target: &Type, depth: Depth) -> Result<Value> {
    match map.ty().tag() {
        TypeTag::Json => Ok(value.clone()),
        TypeTag::Map | TypeTag::Structure => map_to_json(map, target, depth).map(Value::Map),
        _ => Err(Error::incompatible(Type::Json, value.type_name())),
    }
}

/// Rebuilds a map or structure as a JSON object of type `target`, keeping
/// key order.
pub(crate) fn map_to_json(map: &MapValue, target: &Type, depth: Depth) -> Result<MapValue> {
    let depth = depth.enter()?;
    trace!(source = %map.ty(), target = %target, "converting map to json");

    let mut object = MapValue::new(target.clone());
    for (key, value) in map {
        populate_field(&mut object, key, value, target, depth)?;
    }
    Ok(object)
}

/// Converts `value` and stores it in `object` under `key`. Failures are
/// annotated with `key`.
pub(crate) fn populate_field(
    object: &mut MapValue,
    key: &str,
    value: &Value,
    expected: &Type,
    depth: Depth,
) -> Result<()> {
    let converted = match value {
        Value::Null => Ok(Value::Null),
        Value::Array(array) => array_to_json(array, depth).map(Value::Array),
        Value::Map(map) => mapping_to_json(value, map, expected, depth),
        scalar if scalar.type_tag().is_json_scalar() => Ok(scalar.clone()),
        other => Err(Error::incompatible(Type::Json, other.type_name())),
    };
    converted
        .and_then(|v| object.put(key, v))
        .map(drop)
        .map_err(|e| e.annotate(key))
}

/// Converts the value of a union-typed slot.
///
/// Arrays have no conversion here and fail like any other value without a
/// JSON form.
pub(crate) fn union_value_to_json(value: &Value, target: &Type, depth: Depth) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Map(map) => mapping_to_json(value, map, target, depth),
        scalar if scalar.type_tag().is_json_scalar() => Ok(scalar.clone()),
        other => Err(Error::incompatible(Type::Json, other.type_name())),
    }
}

pub(crate) fn structure_to_json(value: &Value, depth: Depth) -> Result<MapValue> {
    match value {
        Value::Map(map) if map.ty().tag().is_mapping() => map_to_json(map, &Type::Json, depth),
        other => Err(Error::incompatible(Type::Json, other.type_name())),
    }
}
