//! MeshError: Unified error type for tissue-mesh public APIs
//!
//! This error type is used throughout the library to provide non-panicking
//! error handling for every public operation. Variants fall in three groups:
//! recoverable lookup/argument failures (`UnknownId`, `DivisionAmbiguous`, ...),
//! construction-time precondition violations (`LengthMismatch`,
//! `AttributeArrayLengthMismatch`, ...) and structural corruption signals
//! (`InconsistentWallCells`, `BoundaryNotClosed`, ...). A tissue that reported
//! one of the latter during surgery must be discarded.

use crate::topology::ids::{CellId, EdgeId, EntityKind, NodeId, WallId};
use thiserror::Error;

/// Unified error type for tissue-mesh operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// ID → index lookup failed.
    #[error("unknown {kind} id {id}")]
    UnknownId { kind: EntityKind, id: i64 },
    /// Negative IDs are reserved (`-1` is the exterior sentinel).
    #[error("invalid {kind} id {id}: ids must be non-negative")]
    InvalidId { kind: EntityKind, id: i64 },
    /// An ID was registered twice.
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: EntityKind, id: i64 },

    /// `divide_cell` found a number of crossings other than two.
    #[error("cell division needs exactly 2 intersection points, found {count}")]
    DivisionAmbiguous { count: usize },
    /// Both crossings of a division line lie on the same wall.
    #[error("cell division line crosses wall {wall} twice; not supported")]
    DivisionDegenerate { wall: WallId },

    /// A wall does not list the cell that claims it.
    #[error("wall {wall} connects cells {cells:?}, none of which is cell {cell}")]
    InconsistentWallCells {
        cell: CellId,
        wall: WallId,
        cells: [CellId; 2],
    },
    /// Exterior-wall stitching did not return to its start.
    #[error("boundary polygon is not closed: no exterior wall continues from node {node}")]
    BoundaryNotClosed { node: NodeId },
    /// A wall endpoint is missing from the node list of the cell it orients by.
    #[error("wall {wall} endpoint {node} is not a node of cell {cell}")]
    WallNodeNotInCell {
        wall: WallId,
        node: NodeId,
        cell: CellId,
    },
    /// A cell's wall list does not contain a wall that names the cell.
    #[error("wall {wall} names cell {cell} as a neighbour but the cell does not list it")]
    WallNotInCell { wall: WallId, cell: CellId },
    /// Two consecutive nodes of a cell are not connected by an edge of the cell.
    #[error("cell {cell}: nodes {from} and {to} are not joined by one of its edges")]
    BrokenCellCycle {
        cell: CellId,
        from: NodeId,
        to: NodeId,
    },
    /// The edges of a wall do not chain from wall node 0 to wall node 1.
    #[error("edges of wall {wall} do not form a chain between its endpoints")]
    BrokenWallChain { wall: WallId },
    /// A cell's wall list is not in the cyclic order of its node list.
    #[error("walls of cell {cell} are not listed in node traversal order")]
    CellWallOrder { cell: CellId },
    /// An edge is missing from the incidence lists of one of its endpoints.
    #[error("edge {edge} is not recorded in the adjacency of its node {node}")]
    AsymmetricAdjacency { node: NodeId, edge: EdgeId },

    /// A named attribute column has the wrong number of entries.
    #[error("{kind} attribute `{name}` has {found} values, expected {expected}")]
    AttributeArrayLengthMismatch {
        kind: EntityKind,
        name: String,
        expected: usize,
        found: usize,
    },
    /// The attribute exists but holds a different value type.
    #[error("attribute `{name}` stores {expected} values")]
    AttributeTypeMismatch { name: String, expected: &'static str },
    /// No attribute column with this name exists for the entity kind.
    #[error("no {kind} attribute named `{name}`")]
    UnknownAttribute { kind: EntityKind, name: String },
    /// Two input arrays that must be parallel have different lengths.
    #[error("length mismatch for {what}: expected {expected}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// Neither 2D nor 3D node coordinates were supplied.
    #[error("node coordinates missing: provide either xy or xyz coordinates")]
    MissingCoordinates,

    /// Centroid and second moments are undefined for a zero-area polygon.
    #[error("degenerate polygon: area {area} is too close to zero")]
    DegeneratePolygon { area: f64 },
    /// Tissue generators rejected their input.
    #[error("invalid generator input: {0}")]
    InvalidGeneratorInput(String),
}

impl MeshError {
    /// Returns `true` for errors that signal an already corrupted tissue.
    ///
    /// A tissue that produced one of these must not be used further.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            MeshError::InconsistentWallCells { .. }
                | MeshError::BoundaryNotClosed { .. }
                | MeshError::WallNodeNotInCell { .. }
                | MeshError::WallNotInCell { .. }
                | MeshError::BrokenCellCycle { .. }
                | MeshError::BrokenWallChain { .. }
                | MeshError::CellWallOrder { .. }
                | MeshError::AsymmetricAdjacency { .. }
        )
    }
}
