//! json-coerce: bidirectional coercion between dynamic JSON values and
//! statically typed values.
//!
//! JSON → typed conversion is directed by a target [`Type`]: scalars are
//! coerced, objects become maps or structures, arrays become typed arrays.
//! Typed → JSON conversion is driven by each value's runtime tag.
//!
//! ```
//! use json_coerce::{convert, TypeBuilder, Value};
//! use serde_json::json;
//!
//! let t = TypeBuilder::new();
//! let person = t
//!     .structure("Person")
//!     .field("name", t.string())
//!     .field("age", t.int())
//!     .build();
//!
//! let source = Value::from(json!({"name": "Ann", "age": 30}));
//! let typed = convert(&source, &person).unwrap();
//! assert_eq!(typed.as_map().and_then(|m| m.get("age")), Some(&Value::Int(30)));
//! ```

pub mod accessor;
pub mod checker;
pub mod convert;
pub mod error;
pub mod shape;
pub mod types;
pub mod value;

pub use accessor::{
    get_element_at, get_field, has_field, keys_of, remove_field, set_element_at, set_field,
};
pub use checker::{is_instance, is_json_compatible, is_subtype};
pub use convert::{ConvertOptions, Converter, DEFAULT_MAX_DEPTH};
pub use error::{Error, ErrorKind, ErrorReason, Result};
pub use shape::{is_array_shaped, is_object_shaped};
pub use types::{
    ArrayType, Field, MapType, StructureBuilder, StructureType, Type, TypeBuilder, TypeTag,
    UnionType,
};
pub use value::{ArrayValue, MapValue, Value};

// Free functions below run with the default `ConvertOptions`.

/// Converts a JSON value to a value of `target`.
pub fn convert(value: &Value, target: &Type) -> Result<Value> {
    Converter::default().convert(value, target)
}

pub fn json_to_structure(value: &Value, target: &StructureType) -> Result<MapValue> {
    Converter::default().json_to_structure(value, target)
}

pub fn json_to_array(value: &Value, target: &ArrayType) -> Result<ArrayValue> {
    Converter::default().json_to_array(value, target)
}

pub fn json_to_map(value: &Value, target: &MapType) -> Result<MapValue> {
    Converter::default().json_to_map(value, target)
}

/// Rebuilds a typed array as a `json[]`.
pub fn array_to_json(array: &ArrayValue) -> Result<ArrayValue> {
    Converter::default().array_to_json(array)
}

pub fn map_to_json(map: &MapValue, target: &Type) -> Result<MapValue> {
    Converter::default().map_to_json(map, target)
}

pub fn populate_field(
    object: &mut MapValue,
    key: &str,
    value: &Value,
    expected: &Type,
) -> Result<()> {
    Converter::default().populate_field(object, key, value, expected)
}

pub fn union_value_to_json(value: &Value, target: &Type) -> Result<Value> {
    Converter::default().union_value_to_json(value, target)
}

pub fn structure_to_json(value: &Value) -> Result<MapValue> {
    Converter::default().structure_to_json(value)
}
