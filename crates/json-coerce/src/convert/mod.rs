//! Coercion engine.
//!
//! - [`from_json`]: schema-directed JSON → typed conversion
//! - [`to_json`]: typed → JSON conversion driven by runtime tags
//!
//! Both directions recurse once per nested container. The depth is bounded by
//! [`ConvertOptions::max_depth`]; exceeding it fails with
//! `DepthLimitExceeded` rather than growing the call stack without limit.

pub mod from_json;
pub mod to_json;

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{ArrayType, MapType, StructureType, Type};
use crate::value::{ArrayValue, MapValue, Value};

pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Options controlling a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Maximum number of nested containers a single conversion may enter.
    pub max_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Nesting depth of the container currently being converted.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Depth {
    current: usize,
    limit: usize,
}

impl Depth {
    pub(crate) fn root(options: &ConvertOptions) -> Self {
        Self {
            current: 0,
            limit: options.max_depth,
        }
    }

    /// Steps into a nested container.
    pub(crate) fn enter(self) -> Result<Self> {
        if self.current >= self.limit {
            debug!(limit = self.limit, "conversion depth limit exceeded");
            return Err(Error::DepthLimitExceeded { limit: self.limit });
        }
        Ok(Self {
            current: self.current + 1,
            limit: self.limit,
        })
    }
}

/// Runs conversions with a fixed set of options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    fn depth(&self) -> Depth {
        Depth::root(&self.options)
    }

    // ------------------------------------------------------------------
    // JSON → typed

    /// Converts a JSON value to a value of `target`.
    pub fn convert(&self, value: &Value, target: &Type) -> Result<Value> {
        from_json::convert(value, target, self.depth())
    }

    pub fn json_to_structure(&self, value: &Value, target: &StructureType) -> Result<MapValue> {
        from_json::json_to_structure(value, target, self.depth())
    }

    pub fn json_to_array(&self, value: &Value, target: &ArrayType) -> Result<ArrayValue> {
        from_json::json_to_array(value, target, self.depth())
    }

    pub fn json_to_map(&self, value: &Value, target: &MapType) -> Result<MapValue> {
        from_json::json_to_map(value, target, self.depth())
    }

    // ------------------------------------------------------------------
    // Typed → JSON

    pub fn array_to_json(&self, array: &ArrayValue) -> Result<ArrayValue> {
        to_json::array_to_json(array, self.depth())
    }

    pub fn map_to_json(&self, map: &MapValue, target: &Type) -> Result<MapValue> {
        to_json::map_to_json(map, target, self.depth())
    }

    pub fn populate_field(
        &self,
        object: &mut MapValue,
        key: &str,
        value: &Value,
        expected: &Type,
    ) -> Result<()> {
        to_json::populate_field(object, key, value, expected, self.depth())
    }

    pub fn union_value_to_json(&self, value: &Value, target: &Type) -> Result<Value> {
        to_json::union_value_to_json(value, target, self.depth())
    }

    pub fn structure_to_json(&self, value: &Value) -> Result<MapValue> {
        to_json::structure_to_json(value, self.depth())
    }
}
