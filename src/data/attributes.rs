//! Named per-entity attribute columns.
//!
//! Every entity kind of a tissue carries an [`AttributeTable`]: a map from
//! attribute name to a typed column holding exactly one value per entity.
//! Columns are integer, float or text; anything else is rejected at import
//! time (see [`RawAttribute::Unsupported`]) instead of being stored.
//!
//! # Invariants
//! Every column of a table has the same length as the entity kind it belongs
//! to. The tissue keeps this true by calling [`AttributeTable::extend_defaults`]
//! whenever it creates entities, for *every* column and not only those a caller
//! cares about.

use crate::mesh_error::MeshError;
use crate::topology::ids::EntityKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A typed attribute column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttributeValues {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
}

/// A single attribute value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttributeValues {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            AttributeValues::Int(v) => v.len(),
            AttributeValues::Float(v) => v.len(),
            AttributeValues::Text(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the stored value type.
    pub const fn type_name(&self) -> &'static str {
        match self {
            AttributeValues::Int(_) => "integer",
            AttributeValues::Float(_) => "float",
            AttributeValues::Text(_) => "text",
        }
    }

    /// Appends `count` zero values (`0`, `0.0` or `""`).
    pub fn extend_defaults(&mut self, count: usize) {
        match self {
            AttributeValues::Int(v) => v.resize(v.len() + count, 0),
            AttributeValues::Float(v) => v.resize(v.len() + count, 0.0),
            AttributeValues::Text(v) => v.resize(v.len() + count, String::new()),
        }
    }

    /// Value at `index`.
    pub fn get(&self, index: usize) -> Option<AttributeValue> {
        match self {
            AttributeValues::Int(v) => v.get(index).copied().map(AttributeValue::Int),
            AttributeValues::Float(v) => v.get(index).copied().map(AttributeValue::Float),
            AttributeValues::Text(v) => v.get(index).cloned().map(AttributeValue::Text),
        }
    }

    /// Float view, if this is a float column.
    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            AttributeValues::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Integer view, if this is an integer column.
    pub fn as_int(&self) -> Option<&[i64]> {
        match self {
            AttributeValues::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Text view, if this is a text column.
    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            AttributeValues::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// Attribute column as handed over by a persistence layer.
///
/// Anything that is not numeric or text arrives as `Unsupported` and is
/// dropped with a notice on import.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RawAttribute {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
    Unsupported { type_name: String },
}

impl RawAttribute {
    /// Converts to a stored column, or `None` for unsupported types.
    pub fn into_values(self) -> Option<AttributeValues> {
        match self {
            RawAttribute::Int(v) => Some(AttributeValues::Int(v)),
            RawAttribute::Float(v) => Some(AttributeValues::Float(v)),
            RawAttribute::Text(v) => Some(AttributeValues::Text(v)),
            RawAttribute::Unsupported { .. } => None,
        }
    }
}

impl From<AttributeValues> for RawAttribute {
    fn from(values: AttributeValues) -> Self {
        match values {
            AttributeValues::Int(v) => RawAttribute::Int(v),
            AttributeValues::Float(v) => RawAttribute::Float(v),
            AttributeValues::Text(v) => RawAttribute::Text(v),
        }
    }
}

/// An attribute skipped during import because of its value type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedAttribute {
    pub kind: EntityKind,
    pub name: String,
    pub type_name: String,
}

/// All attribute columns of one entity kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeTable {
    columns: BTreeMap<String, AttributeValues>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces column `name`; `expected_len` is the entity count.
    ///
    /// # Errors
    /// `AttributeArrayLengthMismatch` if the column length is wrong.
    pub fn insert(
        &mut self,
        kind: EntityKind,
        name: &str,
        values: AttributeValues,
        expected_len: usize,
    ) -> Result<Option<AttributeValues>, MeshError> {
        if values.len() != expected_len {
            return Err(MeshError::AttributeArrayLengthMismatch {
                kind,
                name: name.to_string(),
                expected: expected_len,
                found: values.len(),
            });
        }
        Ok(self.columns.insert(name.to_string(), values))
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValues> {
        self.columns.remove(name)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&AttributeValues> {
        self.columns.get(name)
    }

    /// Column names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValues)> + '_ {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Appends `count` zero defaults to every column.
    pub fn extend_defaults(&mut self, count: usize) {
        for values in self.columns.values_mut() {
            values.extend_defaults(count);
        }
    }

    /// Replaces every column by `len` zero defaults, keeping names and types.
    ///
    /// Used when the entities of a kind are derived again from scratch and the
    /// old per-entity values no longer refer to the same entities.
    pub fn reset_defaults(&mut self, len: usize) {
        for values in self.columns.values_mut() {
            *values = match values {
                AttributeValues::Int(_) => AttributeValues::Int(vec![0; len]),
                AttributeValues::Float(_) => AttributeValues::Float(vec![0.0; len]),
                AttributeValues::Text(_) => AttributeValues::Text(vec![String::new(); len]),
            };
        }
    }

    /// Overwrites one value, checking the column type.
    pub fn set(
        &mut self,
        kind: EntityKind,
        name: &str,
        index: usize,
        value: AttributeValue,
    ) -> Result<(), MeshError> {
        let column = self
            .columns
            .get_mut(name)
            .ok_or_else(|| MeshError::UnknownAttribute {
                kind,
                name: name.to_string(),
            })?;
        let len = column.len();
        let out_of_range = || MeshError::AttributeArrayLengthMismatch {
            kind,
            name: name.to_string(),
            expected: index + 1,
            found: len,
        };
        match (column, value) {
            (AttributeValues::Int(v), AttributeValue::Int(x)) => {
                *v.get_mut(index).ok_or_else(out_of_range)? = x
            }
            (AttributeValues::Float(v), AttributeValue::Float(x)) => {
                *v.get_mut(index).ok_or_else(out_of_range)? = x
            }
            (AttributeValues::Text(v), AttributeValue::Text(x)) => {
                *v.get_mut(index).ok_or_else(out_of_range)? = x
            }
            (column, _) => {
                return Err(MeshError::AttributeTypeMismatch {
                    name: name.to_string(),
                    expected: column.type_name(),
                });
            }
        }
        Ok(())
    }

    /// Checks every column against the entity count.
    pub fn check_lengths(&self, kind: EntityKind, expected: usize) -> Result<(), MeshError> {
        for (name, values) in &self.columns {
            if values.len() != expected {
                return Err(MeshError::AttributeArrayLengthMismatch {
                    kind,
                    name: name.clone(),
                    expected,
                    found: values.len(),
                });
            }
        }
        Ok(())
    }
}
