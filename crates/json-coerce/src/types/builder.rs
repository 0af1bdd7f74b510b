//! TypeBuilder: factory for constructing `Type` descriptors.

use super::{Field, MapType, StructureType, Type, UnionType};
use crate::value::Value;

/// Factory for constructing type descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeBuilder;

impl TypeBuilder {
    pub fn new() -> Self {
        Self
    }

    // ------------------------------------------------------------------
    // Primitives

    pub fn int(&self) -> Type {
        Type::Int
    }

    pub fn float(&self) -> Type {
        Type::Float
    }

    pub fn decimal(&self) -> Type {
        Type::Decimal
    }

    pub fn string(&self) -> Type {
        Type::String
    }

    pub fn boolean(&self) -> Type {
        Type::Boolean
    }

    pub fn byte(&self) -> Type {
        Type::Byte
    }

    pub fn json(&self) -> Type {
        Type::Json
    }

    pub fn any(&self) -> Type {
        Type::Any
    }

    pub fn null(&self) -> Type {
        Type::Null
    }

    // ------------------------------------------------------------------
    // Composites

    pub fn union(&self, members: Vec<Type>) -> Type {
        Type::Union(UnionType::new(members))
    }

    pub fn optional(&self, inner: Type) -> Type {
        Type::optional(inner)
    }

    pub fn array(&self, element: Type) -> Type {
        Type::array_of(element)
    }

    /// Unconstrained map.
    pub fn map(&self) -> Type {
        Type::Map(MapType::default())
    }

    pub fn map_of(&self, constraint: Type) -> Type {
        Type::map_of(constraint)
    }

    pub fn structure(&self, name: impl Into<String>) -> StructureBuilder {
        StructureBuilder {
            inner: StructureType::new(name),
        }
    }
}

/// Incrementally declares the fields of a structure type.
#[derive(Debug, Clone)]
pub struct StructureBuilder {
    inner: StructureType,
}

impl StructureBuilder {
    /// Declares a field defaulting to its type's zero value.
    pub fn field(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.inner.fields.insert(name.into(), Field::new(ty));
        self
    }

    pub fn field_with_default(mut self, name: impl Into<String>, ty: Type, default: Value) -> Self {
        self.inner
            .fields
            .insert(name.into(), Field::with_default(ty, default));
        self
    }

    /// Opens the structure to undeclared keys of type `ty`.
    pub fn rest(mut self, ty: Type) -> Self {
        self.inner.rest = Some(Box::new(ty));
        self
    }

    pub fn build_type(self) -> StructureType {
        self.inner
    }

    pub fn build(self) -> Type {
        Type::Structure(self.inner)
    }
}
