//! Top-level module for tissue topology.
//!
//! This module provides the entity IDs, the [`Tissue`] store and every
//! operation that reads or edits its incidence structure:
//! - [`ids`] and [`registry`]: stable IDs and their dense positions
//! - [`incidence`]: derivation of edges and adjacency caches
//! - [`boundary`]: the outer boundary polygon
//! - [`surgery`]: cell division and edge splitting
//! - [`validation`]: structural consistency checks

pub mod boundary;
pub mod ids;
pub mod incidence;
pub mod registry;
pub mod surgery;
pub mod tissue;
pub mod validation;

pub use boundary::boundary_polygon;
pub use ids::{CellId, EdgeId, EntityId, EntityKind, NodeId, WallId};
pub use registry::IdRegistry;
pub use surgery::{DivisionOptions, DivisionResult, SplitEdgeResult};
pub use tissue::{Tissue, TissueSummary};
pub use validation::{ValidationOptions, validate_tissue};

#[cfg(test)]
mod tests;
