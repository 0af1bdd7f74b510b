//! MapValue: insertion-ordered string-keyed mapping.
//!
//! The same container backs JSON objects (`json`), constrained maps
//! (`map<T>`) and structure values; its type descriptor decides which values a
//! key may hold.

use indexmap::IndexMap;
use tracing::debug;

use crate::checker::is_instance;
use crate::error::{Error, Result};
use crate::types::Type;

use super::Value;

#[derive(Debug, Clone)]
pub struct MapValue {
    ty: Type,
    entries: IndexMap<String, Value>,
    frozen: bool,
}

impl MapValue {
    /// Creates an empty map of type `ty`, which should be `json`, a map type
    /// or a structure type. Any other descriptor leaves the map unconstrained.
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            entries: IndexMap::new(),
            frozen: false,
        }
    }

    /// An empty JSON object.
    pub fn json() -> Self {
        Self::new(Type::Json)
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freezes this map and every container inside it.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.entries.values_mut().for_each(Value::freeze);
    }

    /// Inserts or replaces `key`. An existing key keeps its position.
    pub fn put(&mut self, key: impl Into<String>, value: Value) -> Result<Option<Value>> {
        let key = key.into();
        self.ensure_mutable()?;
        self.check_inherent(&key, &value)?;
        Ok(self.entries.insert(key, value))
    }

    /// Removes `key`, preserving the order of the remaining keys. Fails on a
    /// frozen map even when the key is absent.
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        self.ensure_mutable()?;
        Ok(self.entries.shift_remove(key))
    }

    pub(crate) fn insert_unchecked(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.frozen {
            debug!(ty = %self.ty, "write to frozen map rejected");
            return Err(Error::frozen(&self.ty));
        }
        Ok(())
    }

    fn check_inherent(&self, key: &str, value: &Value) -> Result<()> {
        let expected = match &self.ty {
            Type::Json => Some(&self.ty),
            Type::Map(m) => m.constraint(),
            Type::Structure(st) => match st.type_for_key(key) {
                Some(t) => Some(t),
                None => {
                    return Err(Error::inherent(
                        format!("field of {}", st.name),
                        format!("undeclared field '{key}'"),
                    ));
                }
            },
            _ => None,
        };
        match expected {
            Some(t) if !is_instance(value, t) => Err(Error::inherent(t, value.type_name())),
            _ => Ok(()),
        }
    }
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.entries == other.entries
    }
}

impl<'a> IntoIterator for &'a MapValue {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::TypeBuilder;
    use crate::value::ArrayValue;

    #[test]
    fn keeps_insertion_order() {
        let mut m = MapValue::json();
        m.put("b", Value::Int(1)).unwrap();
        m.put("a", Value::Int(2)).unwrap();
        m.put("c", Value::Int(3)).unwrap();
        m.put("b", Value::Int(4)).unwrap();
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        m.remove("a").unwrap();
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(m.get("b"), Some(&Value::Int(4)));
    }

    #[test]
    fn json_object_rejects_non_json_values() {
        let mut m = MapValue::json();
        let any_array = ArrayValue::new(Type::Any);
        let err = m.put("x", Value::Array(any_array)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InherentTypeViolation);
        assert!(m.is_empty());
    }

    #[test]
    fn constrained_map_checks_values() {
        let t = TypeBuilder::new();
        let mut m = MapValue::new(t.map_of(t.int()));
        m.put("ok", Value::Int(1)).unwrap();
        let err = m.put("bad", Value::from("one")).unwrap_err();
        assert_eq!(err, Error::inherent("int", "string"));

        let mut any = MapValue::new(t.map());
        any.put("anything", Value::from("goes")).unwrap();
    }

    #[test]
    fn closed_structure_rejects_undeclared_keys() {
        let t = TypeBuilder::new();
        let st = t.structure("Point").field("x", t.int()).build();
        let mut m = MapValue::new(st);
        m.put("x", Value::Int(1)).unwrap();
        assert!(m.put("x", Value::Float(1.0)).is_err());
        assert!(m.put("y", Value::Int(2)).is_err());

        let open = t
            .structure("Bag")
            .field("x", t.int())
            .rest(t.string())
            .build();
        let mut m = MapValue::new(open);
        m.put("y", Value::from("extra")).unwrap();
        assert!(m.put("z", Value::Int(3)).is_err());
    }

    #[test]
    fn frozen_map_rejects_put_and_remove() {
        let mut m = MapValue::json();
        m.put("a", Value::Int(1)).unwrap();
        m.freeze();
        assert!(m.put("a", Value::Int(2)).unwrap_err().is_frozen_violation());
        assert!(m.remove("a").unwrap_err().is_frozen_violation());
        assert!(m.remove("missing").unwrap_err().is_frozen_violation());
        assert_eq!(m.get("a"), Some(&Value::Int(1)));
    }
}
