#![cfg_attr(docsrs, feature(doc_cfg))]
//! # tissue-mesh
//!
//! tissue-mesh is a topology engine for planar cellular tissues. A tissue is a
//! 2D mesh of polygonal cells separated by walls; walls are chains of edges
//! between nodes. The crate keeps the full incidence structure (cells ↔
//! walls ↔ edges ↔ nodes) consistent while the tissue grows by cell division
//! and edge splitting.
//!
//! ## Features
//! - Stable, append-only entity IDs with dense table storage
//! - Derived edges, node adjacency, cell adjacency and the boundary polygon
//! - Cell division along a line and edge splitting at midpoints
//! - Named per-entity attribute columns kept in step with every edit
//! - Polygon geometry kernel: signed area, centroid and second moments
//! - Flat, serde-ready persistence arrays with `-1` row padding
//! - Generators for polygon sets, rectangular grids and hexagon tissues
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! tissue-mesh = "0.3"
//! # Optional features:
//! # features = ["rayon", "check-invariants"]
//! ```
//!
//! ```
//! use tissue_mesh::prelude::*;
//!
//! let mut tissue = grid_tissue(1, 1, GridOptions::default())?;
//! let cell = CellId::new(0);
//! let division = tissue.divide_cell(cell, [0.5, 0.5], [0.0, 1.0])?;
//! assert_eq!(tissue.num_cells(), 2);
//! assert!((cell_area(&tissue, division.daughter)? - 0.5).abs() < 1e-12);
//! # Ok::<(), MeshError>(())
//! ```
//!
//! ## Invariant checking
//! Surgery operations re-validate the whole tissue after every call in debug
//! builds, and in release builds with the `check-invariants` or
//! `strict-invariants` features. See [`DebugInvariants`].

pub mod data;
pub mod debug_invariants;
pub mod geometry;
pub mod io;
pub mod mesh_error;
pub mod mesh_generation;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::data::attributes::{AttributeValue, AttributeValues};
    pub use crate::data::coordinates::NodeCoordinates;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::metrics::{
        cell_area, cell_moments, cell_perimeter, tissue_area, wall_length,
    };
    pub use crate::geometry::polygon::{PolygonMoments, polygon_moments, polygon_signed_area};
    pub use crate::io::TissueData;
    pub use crate::mesh_error::MeshError;
    pub use crate::mesh_generation::{
        GridOptions, HexagonOptions, grid_tissue, hexagon_tissue, tissue_from_polygons,
    };
    pub use crate::topology::ids::{CellId, EdgeId, EntityId, EntityKind, NodeId, WallId};
    pub use crate::topology::surgery::{DivisionOptions, DivisionResult, SplitEdgeResult};
    pub use crate::topology::tissue::Tissue;
    pub use crate::topology::validation::{ValidationOptions, validate_tissue};
}
