//! Type descriptors: the closed set of static types the engine converts into
//! and out of.
//!
//! - `Type` enum: the sum of all descriptors, dispatched on by tag
//! - `TypeTag`: the fieldless tag used for exhaustive dispatch
//! - `TypeBuilder`: factory for constructing descriptors

pub mod builder;

pub use builder::{StructureBuilder, TypeBuilder};

use indexmap::IndexMap;
use std::fmt;

use crate::value::{ArrayValue, MapValue, Value};

/// Runtime tag of a type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int,
    Float,
    Decimal,
    String,
    Boolean,
    Byte,
    Json,
    Any,
    Null,
    Union,
    Array,
    Map,
    Structure,
}

impl TypeTag {
    /// Tags whose values are stored and passed through as plain JSON scalars.
    ///
    /// `Byte` is absent: byte values are not JSON scalars for the
    /// purposes of conversion dispatch.
    pub fn is_json_scalar(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Float | Self::Decimal | Self::String | Self::Boolean
        )
    }

    /// Element tags backed by an unboxed vector in [`ArrayValue`].
    pub fn has_unboxed_storage(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Float | Self::Boolean | Self::String | Self::Byte
        )
    }

    /// Tags of map-backed values (JSON objects, maps and structures).
    pub fn is_mapping(self) -> bool {
        matches!(self, Self::Json | Self::Map | Self::Structure)
    }
}

/// A static type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Float,
    Decimal,
    String,
    Boolean,
    Byte,
    /// Unconstrained JSON.
    Json,
    Any,
    Null,
    Union(UnionType),
    Array(ArrayType),
    Map(MapType),
    Structure(StructureType),
}

impl Type {
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Int => TypeTag::Int,
            Self::Float => TypeTag::Float,
            Self::Decimal => TypeTag::Decimal,
            Self::String => TypeTag::String,
            Self::Boolean => TypeTag::Boolean,
            Self::Byte => TypeTag::Byte,
            Self::Json => TypeTag::Json,
            Self::Any => TypeTag::Any,
            Self::Null => TypeTag::Null,
            Self::Union(_) => TypeTag::Union,
            Self::Array(_) => TypeTag::Array,
            Self::Map(_) => TypeTag::Map,
            Self::Structure(_) => TypeTag::Structure,
        }
    }

    pub fn array_of(element: Type) -> Self {
        Self::Array(ArrayType::new(element))
    }

    pub fn map_of(constraint: Type) -> Self {
        Self::Map(MapType::new(Some(constraint)))
    }

    pub fn unconstrained_map() -> Self {
        Self::Map(MapType::new(None))
    }

    /// `t?`, the union of `t` and `()`.
    pub fn optional(inner: Type) -> Self {
        Self::Union(UnionType::nullable(inner))
    }

    /// The value used when a structure field is absent from the source object.
    pub fn zero_value(&self) -> Value {
        match self {
            Self::Int => Value::Int(0),
            Self::Float => Value::Float(0.0),
            Self::Decimal => Value::Decimal(rust_decimal::Decimal::ZERO),
            Self::String => Value::String(String::new()),
            Self::Boolean => Value::Boolean(false),
            Self::Byte => Value::Byte(0),
            Self::Json | Self::Any | Self::Null => Value::Null,
            Self::Union(u) => {
                if u.nullable {
                    Value::Null
                } else {
                    u.members.first().map_or(Value::Null, Type::zero_value)
                }
            }
            Self::Array(a) => Value::Array(ArrayValue::new((*a.element).clone())),
            Self::Map(_) => Value::Map(MapValue::new(self.clone())),
            Self::Structure(s) => {
                let mut map = MapValue::new(self.clone());
                for (name, field) in &s.fields {
                    map.insert_unchecked(name.clone(), field.default.clone());
                }
                Value::Map(map)
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Decimal => f.write_str("decimal"),
            Self::String => f.write_str("string"),
            Self::Boolean => f.write_str("boolean"),
            Self::Byte => f.write_str("byte"),
            Self::Json => f.write_str("json"),
            Self::Any => f.write_str("any"),
            Self::Null => f.write_str("()"),
            Self::Union(u) => u.fmt(f),
            Self::Array(a) => match a.element.as_ref() {
                Self::Union(_) => write!(f, "({})[]", a.element),
                element => write!(f, "{element}[]"),
            },
            Self::Map(m) => match &m.constraint {
                Some(c) => write!(f, "map<{c}>"),
                None => f.write_str("map"),
            },
            Self::Structure(s) => f.write_str(&s.name),
        }
    }
}

// -------------------------------------------------------------------------
// UnionType

#[derive(Debug, Clone, PartialEq)]
pub struct UnionType {
    pub members: Vec<Type>,
    pub nullable: bool,
}

impl UnionType {
    pub fn new(members: Vec<Type>) -> Self {
        let nullable = members.iter().any(|m| matches!(m, Type::Null));
        Self { members, nullable }
    }

    pub fn nullable(inner: Type) -> Self {
        Self {
            members: vec![inner, Type::Null],
            nullable: true,
        }
    }

    /// Members other than `()`, in declaration order.
    pub fn non_null_members(&self) -> impl Iterator<Item = &Type> {
        self.members.iter().filter(|m| !matches!(m, Type::Null))
    }
}

impl fmt::Display for UnionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let non_null: Vec<&Type> = self.non_null_members().collect();
        if self.nullable && non_null.len() == 1 && self.members.len() == 2 {
            return write!(f, "{}?", non_null[0]);
        }
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{member}")?;
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------
// ArrayType

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub element: Box<Type>,
}

impl ArrayType {
    pub fn new(element: Type) -> Self {
        Self {
            element: Box::new(element),
        }
    }
}

// -------------------------------------------------------------------------
// MapType

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapType {
    /// `None` for an unconstrained map.
    pub constraint: Option<Box<Type>>,
}

impl MapType {
    pub fn new(constraint: Option<Type>) -> Self {
        Self {
            constraint: constraint.map(Box::new),
        }
    }

    pub fn constraint(&self) -> Option<&Type> {
        self.constraint.as_deref()
    }
}

// -------------------------------------------------------------------------
// StructureType

/// A declared structure field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub ty: Type,
    /// Used when the field is missing from a source JSON object.
    pub default: Value,
}

impl Field {
    pub fn new(ty: Type) -> Self {
        let default = ty.zero_value();
        Self { ty, default }
    }

    pub fn with_default(ty: Type, default: Value) -> Self {
        Self { ty, default }
    }
}

/// A named record type with ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureType {
    pub name: String,
    pub fields: IndexMap<String, Field>,
    /// Type of undeclared keys. `None` closes the structure.
    pub rest: Option<Box<Type>>,
}

impl StructureType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            rest: None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// The type a value stored under `key` must satisfy, if any.
    pub fn type_for_key(&self, key: &str) -> Option<&Type> {
        match self.fields.get(key) {
            Some(field) => Some(&field.ty),
            None => self.rest.as_deref(),
        }
    }
}
