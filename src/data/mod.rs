//! Data module: node coordinates and named attribute columns.

pub mod attributes;
pub mod coordinates;

pub use attributes::{
    AttributeTable, AttributeValue, AttributeValues, RawAttribute, SkippedAttribute,
};
pub use coordinates::NodeCoordinates;
