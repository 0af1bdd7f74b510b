//! Structural type checks: value-is-instance-of-type and type-is-subtype-of-type.
//!
//! Container values are checked by their declared type, not by walking their
//! contents: a `json[]` holding only integers is not an `int[]`.

use crate::types::Type;
use crate::value::Value;

/// Whether `value` may be stored where `ty` is expected.
pub fn is_instance(value: &Value, ty: &Type) -> bool {
    match ty {
        Type::Any => true,
        Type::Null => value.is_null(),
        Type::Int => matches!(value, Value::Int(_) | Value::Byte(_)),
        Type::Byte => match value {
            Value::Byte(_) => true,
            Value::Int(i) => u8::try_from(*i).is_ok(),
            _ => false,
        },
        Type::Float => matches!(value, Value::Float(_)),
        Type::Decimal => matches!(value, Value::Decimal(_)),
        Type::String => matches!(value, Value::String(_)),
        Type::Boolean => matches!(value, Value::Boolean(_)),
        Type::Json => match value {
            Value::Array(a) => is_subtype(a.element_type(), &Type::Json),
            Value::Map(m) => is_subtype(m.ty(), &Type::Json),
            _ => true,
        },
        Type::Union(u) => u.members.iter().any(|m| is_instance(value, m)),
        Type::Array(at) => match value {
            Value::Array(a) => is_subtype(a.element_type(), &at.element),
            _ => false,
        },
        Type::Map(mt) => match value {
            // A map-backed `json` value is a JSON object, i.e. a `map<json>`.
            Value::Map(m) if matches!(m.ty(), Type::Json) => mt
                .constraint()
                .map_or(true, |c| matches!(c, Type::Json | Type::Any)),
            Value::Map(m) => is_subtype(m.ty(), ty),
            _ => false,
        },
        Type::Structure(_) => match value {
            Value::Map(m) => is_subtype(m.ty(), ty),
            _ => false,
        },
    }
}

/// Whether every value of `source` is also a value of `target`.
pub fn is_subtype(source: &Type, target: &Type) -> bool {
    if source == target {
        return true;
    }
    match (source, target) {
        (_, Type::Any) => true,
        (Type::Union(s), _) => s.members.iter().all(|m| is_subtype(m, target)),
        (_, Type::Union(t)) => t.members.iter().any(|m| is_subtype(source, m)),
        (Type::Byte, Type::Int) => true,
        (_, Type::Json) => is_json_compatible(source),
        (Type::Array(s), Type::Array(t)) => is_subtype(&s.element, &t.element),
        (Type::Map(s), Type::Map(t)) => match t.constraint() {
            None => true,
            Some(tc) => is_subtype(s.constraint().unwrap_or(&Type::Any), tc),
        },
        (Type::Structure(s), Type::Map(t)) => match t.constraint() {
            None => true,
            Some(tc) => {
                s.fields.values().all(|f| is_subtype(&f.ty, tc))
                    && s.rest.as_deref().map_or(true, |r| is_subtype(r, tc))
            }
        },
        _ => false,
    }
}

/// Whether every value of `ty` is representable as JSON.
pub fn is_json_compatible(ty: &Type) -> bool {
    match ty {
        Type::Int
        | Type::Float
        | Type::Decimal
        | Type::String
        | Type::Boolean
        | Type::Byte
        | Type::Null
        | Type::Json => true,
        Type::Any => false,
        Type::Union(u) => u.members.iter().all(is_json_compatible),
        Type::Array(a) => is_json_compatible(&a.element),
        Type::Map(m) => m.constraint().is_some_and(is_json_compatible),
        Type::Structure(s) => {
            s.fields.values().all(|f| is_json_compatible(&f.ty))
                && s.rest.as_deref().map_or(true, is_json_compatible)
        }
    }
}
