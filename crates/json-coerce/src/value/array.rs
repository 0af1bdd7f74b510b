//! ArrayValue: ordered sequence with a declared element type.
//!
//! Primitive element types are stored unboxed; everything else is stored as
//! boxed `Value`s. The storage is not observable: reads box on the way out and
//! writes are checked and normalized against the element type first.

use std::borrow::Cow;

use tracing::debug;

use crate::checker::is_instance;
use crate::error::{Error, Result};
use crate::types::{Type, TypeTag};

use super::Value;

#[derive(Debug, Clone)]
enum Storage {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Boolean(Vec<bool>),
    String(Vec<String>),
    Byte(Vec<u8>),
    Boxed(Vec<Value>),
}

impl Storage {
    fn for_element(element_type: &Type) -> Self {
        match element_type.tag() {
            TypeTag::Int => Self::Int(Vec::new()),
            TypeTag::Float => Self::Float(Vec::new()),
            TypeTag::Boolean => Self::Boolean(Vec::new()),
            TypeTag::String => Self::String(Vec::new()),
            TypeTag::Byte => Self::Byte(Vec::new()),
            _ => Self::Boxed(Vec::new()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Byte(v) => v.len(),
            Self::Boxed(v) => v.len(),
        }
    }
}

/// Writes `item` at `index`, appending when `index == len`.
fn put<T>(items: &mut Vec<T>, index: usize, item: T) {
    if index == items.len() {
        items.push(item);
    } else {
        items[index] = item;
    }
}

#[derive(Debug, Clone)]
pub struct ArrayValue {
    element_type: Type,
    storage: Storage,
    frozen: bool,
}

impl ArrayValue {
    /// Creates an empty array, unboxed when the element type is primitive.
    pub fn new(element_type: Type) -> Self {
        let storage = Storage::for_element(&element_type);
        Self {
            element_type,
            storage,
            frozen: false,
        }
    }

    /// Creates an empty array that always stores boxed values.
    pub fn new_boxed(element_type: Type) -> Self {
        Self {
            element_type,
            storage: Storage::Boxed(Vec::new()),
            frozen: false,
        }
    }

    /// An empty `json[]`.
    pub fn json() -> Self {
        Self::new_boxed(Type::Json)
    }

    /// Wraps already-checked values in boxed storage.
    pub(crate) fn from_boxed_unchecked(element_type: Type, values: Vec<Value>) -> Self {
        Self {
            element_type,
            storage: Storage::Boxed(values),
            frozen: false,
        }
    }

    /// Builds an array by appending every value, checking each one.
    pub fn from_values(
        element_type: Type,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Self> {
        let mut array = Self::new(element_type);
        for value in values {
            array.push(value)?;
        }
        Ok(array)
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_unboxed(&self) -> bool {
        !matches!(self.storage, Storage::Boxed(_))
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freezes this array and every container inside it.
    pub fn freeze(&mut self) {
        self.frozen = true;
        if let Storage::Boxed(values) = &mut self.storage {
            values.iter_mut().for_each(Value::freeze);
        }
    }

    /// Element at `index`, borrowed from boxed storage or boxed on the fly.
    pub fn element(&self, index: usize) -> Option<Cow<'_, Value>> {
        let element = match &self.storage {
            Storage::Int(v) => Cow::Owned(Value::Int(*v.get(index)?)),
            Storage::Float(v) => Cow::Owned(Value::Float(*v.get(index)?)),
            Storage::Boolean(v) => Cow::Owned(Value::Boolean(*v.get(index)?)),
            Storage::String(v) => Cow::Owned(Value::String(v.get(index)?.clone())),
            Storage::Byte(v) => Cow::Owned(Value::Byte(*v.get(index)?)),
            Storage::Boxed(v) => Cow::Borrowed(v.get(index)?),
        };
        Some(element)
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.element(index).map(Cow::into_owned)
    }

    /// Element at a signed index, failing with `IndexOutOfRange`.
    pub fn get_checked(&self, index: i64) -> Result<Value> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.get(i))
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            array: self,
            index: 0,
        }
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().map(Cow::into_owned).collect()
    }

    /// Writes `value` at `index`. `index == len` appends.
    ///
    /// Checks run in order: frozen, bounds, element type. Nothing is written
    /// unless all pass.
    pub fn set(&mut self, index: i64, value: Value) -> Result<()> {
        if self.frozen {
            debug!(element_type = %self.element_type, "write to frozen array rejected");
            return Err(Error::frozen(Type::array_of(self.element_type.clone())));
        }
        let len = self.len();
        let slot = match usize::try_from(index) {
            Ok(i) if i <= len => i,
            _ => return Err(Error::IndexOutOfRange { index, len }),
        };
        if !is_instance(&value, &self.element_type) {
            return Err(Error::inherent(&self.element_type, value.type_name()));
        }
        let value = normalize(&self.element_type, value);
        self.write(slot, value)
    }

    pub fn push(&mut self, value: Value) -> Result<()> {
        let index = i64::try_from(self.len()).unwrap_or(i64::MAX);
        self.set(index, value)
    }

    fn write(&mut self, index: usize, value: Value) -> Result<()> {
        match (&mut self.storage, value) {
            (Storage::Int(v), Value::Int(i)) => put(v, index, i),
            (Storage::Float(v), Value::Float(n)) => put(v, index, n),
            (Storage::Boolean(v), Value::Boolean(b)) => put(v, index, b),
            (Storage::String(v), Value::String(s)) => put(v, index, s),
            (Storage::Byte(v), Value::Byte(b)) => put(v, index, b),
            (Storage::Boxed(v), value) => put(v, index, value),
            (_, value) => {
                return Err(Error::inherent(&self.element_type, value.type_name()));
            }
        }
        Ok(())
    }
}

/// Brings a value that passed the element check into the element type's
/// canonical representation, so boxed and unboxed arrays read back alike.
fn normalize(element_type: &Type, value: Value) -> Value {
    match (element_type, value) {
        (Type::Int, Value::Byte(b)) => Value::Int(i64::from(b)),
        (Type::Byte, Value::Int(i)) => match u8::try_from(i) {
            Ok(b) => Value::Byte(b),
            Err(_) => Value::Int(i),
        },
        (_, value) => value,
    }
}

impl PartialEq for ArrayValue {
    fn eq(&self, other: &Self) -> bool {
        self.element_type == other.element_type
            && self.len() == other.len()
            && self.iter().eq(other.iter())
    }
}

/// Iterator over the elements of an [`ArrayValue`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    array: &'a ArrayValue,
    index: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Cow<'a, Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.array.element(self.index)?;
        self.index += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a ArrayValue {
    type Item = Cow<'a, Value>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
