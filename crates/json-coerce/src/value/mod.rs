//! Dynamic value model.
//!
//! `Value` is the closed sum of every runtime value the engine handles, both
//! the open JSON tree and typed values produced by conversion. Containers
//! carry their own type descriptor and a freeze flag.

pub mod array;
pub mod json;
pub mod map;

pub use array::{ArrayValue, Iter};
pub use map::MapValue;

use rust_decimal::Decimal;
use std::fmt;

use crate::types::{Type, TypeTag};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    Byte(u8),
    Array(ArrayValue),
    Map(MapValue),
}

impl Value {
    /// Runtime tag. Maps report the tag of their own type descriptor.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Null => TypeTag::Null,
            Self::Boolean(_) => TypeTag::Boolean,
            Self::Int(_) => TypeTag::Int,
            Self::Float(_) => TypeTag::Float,
            Self::Decimal(_) => TypeTag::Decimal,
            Self::String(_) => TypeTag::String,
            Self::Byte(_) => TypeTag::Byte,
            Self::Array(_) => TypeTag::Array,
            Self::Map(m) => m.ty().tag(),
        }
    }

    /// Resolves the runtime type descriptor of this value.
    pub fn type_of(&self) -> Type {
        match self {
            Self::Null => Type::Null,
            Self::Boolean(_) => Type::Boolean,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::Decimal(_) => Type::Decimal,
            Self::String(_) => Type::String,
            Self::Byte(_) => Type::Byte,
            Self::Array(a) => Type::array_of(a.element_type().clone()),
            Self::Map(m) => m.ty().clone(),
        }
    }

    /// Name of the runtime type, as reported in errors.
    pub fn type_name(&self) -> String {
        self.type_of().to_string()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Deep-freezes every container reachable from this value.
    pub fn freeze(&mut self) {
        match self {
            Self::Array(a) => a.freeze(),
            Self::Map(m) => m.freeze(),
            _ => {}
        }
    }

    /// Whether this value is a frozen container. Scalars carry no flag and
    /// report `false`.
    pub fn is_frozen(&self) -> bool {
        match self {
            Self::Array(a) => a.is_frozen(),
            Self::Map(m) => m.is_frozen(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Byte(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayValue> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut MapValue> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write_quoted(f, s),
            other => fmt::Display::fmt(other, f),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}

fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
        write!(f, "{n:.1}")
    } else {
        write!(f, "{n}")
    }
}

/// Textual representation. Top-level strings are written raw; strings nested
/// in containers are quoted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(n) => write_float(f, *n),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::String(s) => f.write_str(s),
            Self::Byte(b) => write!(f, "{b}"),
            Self::Array(a) => {
                f.write_str("[")?;
                for (i, element) in a.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    element.fmt_nested(f)?;
                }
                f.write_str("]")
            }
            Self::Map(m) => {
                f.write_str("{")?;
                for (i, (key, value)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, key)?;
                    f.write_str(":")?;
                    value.fmt_nested(f)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u8> for Value {
    fn from(b: u8) -> Self {
        Self::Byte(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<ArrayValue> for Value {
    fn from(a: ArrayValue) -> Self {
        Self::Array(a)
    }
}

impl From<MapValue> for Value {
    fn from(m: MapValue) -> Self {
        Self::Map(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeBuilder;

    #[test]
    fn type_resolution() {
        assert_eq!(Value::Null.type_tag(), TypeTag::Null);
        assert_eq!(Value::Int(1).type_of(), Type::Int);
        assert_eq!(Value::Byte(1).type_name(), "byte");
        let arr = ArrayValue::new(Type::String);
        assert_eq!(Value::Array(arr).type_name(), "string[]");
        let map = MapValue::new(Type::map_of(Type::Int));
        assert_eq!(Value::Map(map).type_tag(), TypeTag::Map);
        assert_eq!(Value::Map(MapValue::json()).type_tag(), TypeTag::Json);
    }

    #[test]
    fn textual_representation() {
        assert_eq!(Value::String("plain".into()).to_string(), "plain");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Null.to_string(), "null");

        let mut obj = MapValue::json();
        obj.put("a", Value::Int(1)).unwrap();
        obj.put("b", Value::from("x\"y")).unwrap();
        let mut arr = ArrayValue::json();
        arr.push(Value::Boolean(true)).unwrap();
        arr.push(Value::from("s")).unwrap();
        obj.put("c", Value::Array(arr)).unwrap();
        assert_eq!(
            Value::Map(obj).to_string(),
            r#"{"a":1, "b":"x\"y", "c":[true, "s"]}"#
        );
    }

    #[test]
    fn freeze_is_deep() {
        let t = TypeBuilder::new();
        let mut inner = MapValue::new(t.map_of(t.int()));
        inner.put("n", Value::Int(1)).unwrap();
        let mut outer = MapValue::json();
        outer.put("inner", Value::Map(MapValue::json())).unwrap();
        let mut value = Value::Map(outer);
        value.freeze();
        assert!(value.is_frozen());
        let nested = value
            .as_map()
            .and_then(|m| m.get("inner"))
            .map(Value::is_frozen);
        assert_eq!(nested, Some(true));
        assert!(!Value::Int(1).is_frozen());
        assert!(!Value::Map(inner).is_frozen());
    }
}
