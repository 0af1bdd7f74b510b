//! JSON → typed conversion, dispatched on the target type's tag.

use rust_decimal::Decimal;
use tracing::trace;

use crate::checker::is_instance;
use crate::error::{Error, Result};
use crate::shape::{as_array, as_object};
use crate::types::{ArrayType, MapType, StructureType, Type, UnionType};
use crate::value::{ArrayValue, MapValue, Value};

use super::Depth;

const JSON_OBJECT: &str = "json-object";
const JSON_ARRAY: &str = "json-array";

pub(crate) fn convert(value: &Value, target: &Type, depth: Depth) -> Result<Value> {
    match target {
        Type::Int => to_int(value),
        Type::Float => to_float(value),
        Type::Decimal => to_decimal(value),
        Type::String => to_string(value, depth),
        Type::Boolean => to_boolean(value),
        Type::Json | Type::Any => {
            if matches!(target, Type::Json) && !value.is_null() && !is_instance(value, target) {
                return Err(Error::incompatible(target, value.type_name()));
            }
            Ok(value.clone())
        }
        Type::Union(u) => convert_union(value, target, u, depth),
        Type::Structure(st) => json_to_structure(value, st, depth).map(Value::Map),
        Type::Array(at) => json_to_array(value, at, depth).map(Value::Array),
        Type::Map(mt) => json_to_map(value, mt, depth).map(Value::Map),
        Type::Null if value.is_null() => Ok(Value::Null),
        Type::Null | Type::Byte => Err(Error::incompatible(target, value.type_name())),
    }
}

/// Only a union with exactly one non-null member is converted; there is no
/// shape-based choice between several candidates.
fn convert_union(value: &Value, target: &Type, union: &UnionType, depth: Depth) -> Result<Value> {
    if value.is_null() && union.nullable {
        return Ok(Value::Null);
    }
    let mut candidates = union.non_null_members();
    match (candidates.next(), candidates.next()) {
        (Some(only), None) => convert(value, only, depth),
        _ => Err(Error::incompatible(target, value.type_name())),
    }
}

// -------------------------------------------------------------------------
// Scalars

pub(crate) fn to_int(value: &Value) -> Result<Value> {
    match value {
        Value::Int(i) => Ok(Value::Int(*i)),
        other => Err(Error::cast(Type::Int, other.type_name())),
    }
}

pub(crate) fn to_float(value: &Value) -> Result<Value> {
    match value {
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Float(n) => Ok(Value::Float(*n)),
        other => Err(Error::cast(Type::Float, other.type_name())),
    }
}

/// Decimals pass through unchanged alongside integer and float sources.
pub(crate) fn to_decimal(value: &Value) -> Result<Value> {
    let decimal = match value {
        Value::Int(i) => Decimal::from(*i),
        Value::Float(n) => {
            Decimal::try_from(*n).map_err(|_| Error::cast(Type::Decimal, value.type_name()))?
        }
        Value::Decimal(d) => *d,
        other => return Err(Error::cast(Type::Decimal, other.type_name())),
    };
    Ok(Value::Decimal(decimal))
}

/// Textual representation of any non-null value; null is a cast failure.
/// Containers nested deeper than the depth limit are rejected before they
/// are rendered.
pub(crate) fn to_string(value: &Value, depth: Depth) -> Result<Value> {
    match value {
        Value::Null => Err(Error::cast(Type::String, value.type_name())),
        Value::String(s) => Ok(Value::String(s.clone())),
        other => {
            check_nesting(other, depth)?;
            Ok(Value::String(other.to_string()))
        }
    }
}

fn check_nesting(value: &Value, depth: Depth) -> Result<()> {
    match value {
        Value::Array(array) => {
            let depth = depth.enter()?;
            array.iter().try_for_each(|element| check_nesting(&element, depth))
        }
        Value::Map(map) => {
            let depth = depth.enter()?;
            map.iter().try_for_each(|(_, item)| check_nesting(item, depth))
        }
        _ => Ok(()),
    }
}

pub(crate) fn to_boolean(value: &Value) -> Result<Value> {
    match value {
        Value::Boolean(b) => Ok(Value::Boolean(*b)),
        other => Err(Error::cast(Type::Boolean, other.type_name())),
    }
}

// -------------------------------------------------------------------------
// Containers

/// Fills every declared field in declaration order. Absent keys take the
/// field's default; undeclared source keys are dropped.
pub(crate) fn json_to_structure(
    value: &Value,
    target: &StructureType,
    depth: Depth,
) -> Result<MapValue> {
    let Some(object) = as_object(value) else {
        return Err(Error::incompatible(JSON_OBJECT, value.type_name()));
    };
    let depth = depth.enter()?;
    trace!(structure = %target.name, "converting json object to structure");

    let mut out = MapValue::new(Type::Structure(target.clone()));
    for (name, field) in &target.fields {
        let converted = match object.get(name) {
            Some(source) => convert(source, &field.ty, depth),
            None => Ok(field.default.clone()),
        };
        converted
            .and_then(|v| out.put(name.as_str(), v))
            .map_err(|e| e.annotate(name.as_str()))?;
    }
    Ok(out)
}

pub(crate) fn json_to_array(value: &Value, target: &ArrayType, depth: Depth) -> Result<ArrayValue> {
    let Some(source) = as_array(value) else {
        return Err(Error::incompatible(JSON_ARRAY, value.type_name()));
    };
    let depth = depth.enter()?;
    trace!(element = %target.element, len = source.len(), "converting json array");

    let element = target.element.as_ref();
    match element {
        Type::Int => coerce_elements(source, element, to_int),
        Type::Float => coerce_elements(source, element, to_float),
        Type::Decimal => coerce_elements(source, element, to_decimal),
        Type::String => coerce_elements(source, element, |v| to_string(v, depth)),
        Type::Boolean => coerce_elements(source, element, to_boolean),
        Type::Any => Ok(ArrayValue::from_boxed_unchecked(Type::Any, source.to_vec())),
        _ => {
            let mut out = ArrayValue::new(element.clone());
            for (i, item) in source.iter().enumerate() {
                convert(&item, element, depth)
                    .and_then(|v| out.push(v))
                    .map_err(|e| e.annotate(format!("[{i}]")))?;
            }
            Ok(out)
        }
    }
}

/// Per-element scalar coercion; the first failing element's cast error is
/// returned as is.
fn coerce_elements(
    source: &ArrayValue,
    element: &Type,
    coerce: impl Fn(&Value) -> Result<Value>,
) -> Result<ArrayValue> {
    let mut out = ArrayValue::new(element.clone());
    for item in source.iter() {
        out.push(coerce(item.as_ref())?)?;
    }
    Ok(out)
}

/// Unconstrained, `any` and `json` maps copy entries; other constraints
/// convert each value. Key order is preserved either way.
pub(crate) fn json_to_map(value: &Value, target: &MapType, depth: Depth) -> Result<MapValue> {
    let Some(source) = as_object(value) else {
        return Err(Error::incompatible(JSON_OBJECT, value.type_name()));
    };
    let depth = depth.enter()?;
    trace!(constraint = ?target.constraint(), "converting json object to map");

    let mut out = MapValue::new(Type::Map(target.clone()));
    match target.constraint() {
        None | Some(Type::Any) | Some(Type::Json) => {
            for (key, item) in source {
                out.put(key.as_str(), item.clone())
                    .map_err(|e| e.annotate(key.as_str()))?;
            }
        }
        Some(constraint) => {
            for (key, item) in source {
                convert(item, constraint, depth)
                    .and_then(|v| out.put(key.as_str(), v))
                    .map_err(|e| e.annotate(key.as_str()))?;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConvertOptions;
    use crate::error::ErrorKind;
    use crate::types::TypeBuilder;
    use serde_json::json;

    fn depth() -> Depth {
        Depth::root(&ConvertOptions::default())
    }

    fn json_value(v: serde_json::Value) -> Value {
        Value::from(v)
    }

    #[test]
    fn int_requires_integer() {
        assert_eq!(convert(&Value::Int(3), &Type::Int, depth()), Ok(Value::Int(3)));
        let err = convert(&Value::Boolean(true), &Type::Int, depth()).unwrap_err();
        assert_eq!(err, Error::cast("int", "boolean"));
        let err = convert(&Value::Float(1.0), &Type::Int, depth()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleTypeForCasting);
    }

    #[test]
    fn float_widens_integers() {
        assert_eq!(to_float(&Value::Int(2)), Ok(Value::Float(2.0)));
        assert_eq!(to_float(&Value::Float(0.5)), Ok(Value::Float(0.5)));
        assert!(to_float(&Value::from("1.5")).is_err());
    }

    #[test]
    fn decimal_sources() {
        assert_eq!(to_decimal(&Value::Int(7)), Ok(Value::Decimal(Decimal::from(7))));
        assert_eq!(
            to_decimal(&Value::Float(0.25)),
            Ok(Value::Decimal(Decimal::new(25, 2)))
        );
        let d = Value::Decimal(Decimal::new(12345, 3));
        assert_eq!(to_decimal(&d), Ok(d.clone()));
        assert_eq!(
            to_decimal(&Value::Float(f64::NAN)).unwrap_err().kind(),
            ErrorKind::IncompatibleTypeForCasting
        );
        assert!(to_decimal(&Value::from("1")).is_err());
    }

    #[test]
    fn string_uses_textual_representation() {
        assert_eq!(to_string(&Value::Int(5), depth()), Ok(Value::from("5")));
        assert_eq!(to_string(&Value::Boolean(false), depth()), Ok(Value::from("false")));
        assert_eq!(to_string(&Value::from("s"), depth()), Ok(Value::from("s")));
        assert_eq!(
            to_string(&json_value(json!({"a": [1, "b"]})), depth()),
            Ok(Value::from(r#"{"a":[1, "b"]}"#))
        );
        assert_eq!(to_string(&Value::Null, depth()), Err(Error::cast("string", "()")));
    }

    #[test]
    fn json_target_checks_instance_then_passes_through() {
        let obj = json_value(json!({"a": 1}));
        assert_eq!(convert(&obj, &Type::Json, depth()), Ok(obj.clone()));
        assert_eq!(convert(&Value::Null, &Type::Json, depth()), Ok(Value::Null));
        let anys = Value::Array(ArrayValue::new(Type::Any));
        let err = convert(&anys, &Type::Json, depth()).unwrap_err();
        assert_eq!(err, Error::incompatible("json", "any[]"));
        assert_eq!(convert(&anys, &Type::Any, depth()), Ok(anys.clone()));
    }

    #[test]
    fn union_rules() {
        let t = TypeBuilder::new();
        let opt = t.optional(t.int());
        assert_eq!(convert(&Value::Null, &opt, depth()), Ok(Value::Null));
        assert_eq!(convert(&Value::Int(4), &opt, depth()), Ok(Value::Int(4)));

        let two = t.union(vec![t.int(), t.string()]);
        let err = convert(&Value::Int(4), &two, depth()).unwrap_err();
        assert_eq!(err, Error::incompatible("int|string", "int"));

        let only_null = t.union(vec![t.null()]);
        assert_eq!(convert(&Value::Null, &only_null, depth()), Ok(Value::Null));
        assert_eq!(
            convert(&Value::Int(1), &only_null, depth()).unwrap_err().kind(),
            ErrorKind::IncompatibleType
        );

        // Not nullable: null reaches the single candidate.
        let single = t.union(vec![t.string()]);
        assert_eq!(
            convert(&Value::Null, &single, depth()).unwrap_err(),
            Error::cast("string", "()")
        );
    }

    #[test]
    fn null_and_byte_targets() {
        assert_eq!(convert(&Value::Null, &Type::Null, depth()), Ok(Value::Null));
        assert_eq!(
            convert(&Value::Int(0), &Type::Null, depth()),
            Err(Error::incompatible("()", "int"))
        );
        assert_eq!(
            convert(&Value::Int(1), &Type::Byte, depth()),
            Err(Error::incompatible("byte", "int"))
        );
    }

    #[test]
    fn structure_defaults_and_order() {
        let t = TypeBuilder::new();
        let st = t
            .structure("Person")
            .field("name", t.string())
            .field("age", t.int())
            .field_with_default("active", t.boolean(), Value::Boolean(true))
            .build_type();
        let src = json_value(json!({"age": 30, "extra": "dropped", "name": "Ann"}));
        let out = json_to_structure(&src, &st, depth()).unwrap();
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["name", "age", "active"]);
        assert_eq!(out.get("age"), Some(&Value::Int(30)));
        assert_eq!(out.get("active"), Some(&Value::Boolean(true)));
        assert!(!out.contains_key("extra"));

        let empty = json_to_structure(&json_value(json!({})), &st, depth()).unwrap();
        assert_eq!(empty.get("age"), Some(&Value::Int(0)));
        assert_eq!(empty.get("name"), Some(&Value::from("")));
    }

    #[test]
    fn structure_failures() {
        let t = TypeBuilder::new();
        let st = t.structure("P").field("age", t.int()).build_type();

        let err = json_to_structure(&Value::Int(1), &st, depth()).unwrap_err();
        assert_eq!(err, Error::incompatible("json-object", "int"));

        let err = json_to_structure(&json_value(json!({"age": "x"})), &st, depth()).unwrap_err();
        assert_eq!(err.field(), Some("age"));
        assert_eq!(err.root(), &Error::cast("int", "string"));
    }

    #[test]
    fn nested_failure_is_annotated_once() {
        let t = TypeBuilder::new();
        let inner = t.structure("Inner").field("n", t.int()).build();
        let outer = t.structure("Outer").field("inner", inner).build_type();
        let err = json_to_structure(&json_value(json!({"inner": {"n": true}})), &outer, depth())
            .unwrap_err();
        assert_eq!(err.field(), Some("n"));
        assert_eq!(
            err.to_string(),
            "error while mapping 'n': incompatible types: 'boolean' cannot be cast to 'int'"
        );
    }

    #[test]
    fn scalar_arrays_fail_fast_without_annotation() {
        let t = TypeBuilder::new();
        let src = json_value(json!([1, 2, "three", false]));
        let err = json_to_array(&src, &ArrayType::new(t.int()), depth()).unwrap_err();
        assert_eq!(err, Error::cast("int", "string"));

        let ok = json_to_array(&json_value(json!([1, 2.5])), &ArrayType::new(t.float()), depth())
            .unwrap();
        assert!(ok.is_unboxed());
        assert_eq!(ok.to_vec(), vec![Value::Float(1.0), Value::Float(2.5)]);

        let strings =
            json_to_array(&json_value(json!([1, true, "s"])), &ArrayType::new(t.string()), depth())
                .unwrap();
        assert_eq!(
            strings.to_vec(),
            vec![Value::from("1"), Value::from("true"), Value::from("s")]
        );
    }

    #[test]
    fn any_and_generic_arrays() {
        let t = TypeBuilder::new();
        let src = json_value(json!([1, {"a": null}, [true]]));
        let copied = json_to_array(&src, &ArrayType::new(t.any()), depth()).unwrap();
        assert_eq!(copied.element_type(), &Type::Any);
        assert_eq!(copied.to_vec(), src.as_array().unwrap().to_vec());

        let nested = json_value(json!([[1, 2], [3]]));
        let out = json_to_array(&nested, &ArrayType::new(t.array(t.int())), depth()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(
            out.get(0).and_then(|v| v.as_array().map(ArrayValue::to_vec)),
            Some(vec![Value::Int(1), Value::Int(2)])
        );

        let err = json_to_array(&json_value(json!([[1], ["x"]])), &ArrayType::new(t.array(t.int())), depth())
            .unwrap_err();
        assert_eq!(err.field(), Some("[1]"));
        assert_eq!(err.root(), &Error::cast("int", "string"));

        let err = json_to_array(&json_value(json!({})), &ArrayType::new(t.int()), depth()).unwrap_err();
        assert_eq!(err, Error::incompatible("json-array", "json"));
    }

    #[test]
    fn maps() {
        let t = TypeBuilder::new();
        let src = json_value(json!({"b": 1, "a": 2}));

        let copied = json_to_map(&src, &MapType::new(None), depth()).unwrap();
        assert_eq!(copied.ty(), &t.map());
        assert_eq!(copied.keys().collect::<Vec<_>>(), vec!["b", "a"]);

        let floats = json_to_map(&src, &MapType::new(Some(t.float())), depth()).unwrap();
        assert_eq!(floats.get("a"), Some(&Value::Float(2.0)));
        assert_eq!(floats.keys().collect::<Vec<_>>(), vec!["b", "a"]);

        let err =
            json_to_map(&json_value(json!({"k": "v"})), &MapType::new(Some(t.int())), depth())
                .unwrap_err();
        assert_eq!(err.field(), Some("k"));

        let err = json_to_map(&json_value(json!([])), &MapType::new(None), depth()).unwrap_err();
        assert_eq!(err, Error::incompatible("json-object", "json[]"));
    }

    #[test]
    fn depth_limit() {
        let shallow = Depth::root(&ConvertOptions::new().max_depth(2));
        let t = TypeBuilder::new();
        let two = json_value(json!([[1]]));
        let three = json_value(json!([[[1]]]));
        let ty2 = t.array(t.array(t.int()));
        let ty3 = t.array(t.array(t.array(t.int())));
        assert!(convert(&two, &ty2, shallow).is_ok());
        assert_eq!(
            convert(&three, &ty3, shallow),
            Err(Error::DepthLimitExceeded { limit: 2 })
        );
    }

    #[test]
    fn string_rendering_respects_depth_limit() {
        let shallow = Depth::root(&ConvertOptions::new().max_depth(2));
        let two = json_value(json!({"a": [1]}));
        let three = json_value(json!({"a": [[1]]}));
        assert_eq!(
            convert(&two, &Type::String, shallow),
            Ok(Value::from(r#"{"a":[1]}"#))
        );
        assert_eq!(
            convert(&three, &Type::String, shallow),
            Err(Error::DepthLimitExceeded { limit: 2 })
        );

        // Array elements coerced to strings share the enclosing depth.
        let t = TypeBuilder::new();
        let nested = json_value(json!([[1]]));
        assert_eq!(
            convert(&nested, &t.array(t.string()), shallow),
            Ok(Value::Array(
                ArrayValue::from_values(Type::String, vec![Value::from("[1]")]).unwrap()
            ))
        );
        let deeper = json_value(json!([[[1]]]));
        assert_eq!(
            convert(&deeper, &t.array(t.string()), shallow),
            Err(Error::DepthLimitExceeded { limit: 2 })
        );
    }
}
