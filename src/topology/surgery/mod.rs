//! Structural edits of a tissue: cell division and edge splitting.
//!
//! # Expected invariants
//! - The tissue has been prepared ([`Tissue::prepare_for_use`]) so edges,
//!   node adjacency and cell adjacency are available.
//! - Cell node lists are CCW and wall lists follow the node cycle.
//!
//! Both operations only ever append entities. Existing IDs keep their meaning:
//! a divided cell keeps its ID (the *mother*), a shortened edge or wall keeps
//! its ID and covers the part nearest to its node 0.
//!
//! Argument errors (unknown IDs, a cutting line without exactly two crossings)
//! are reported before anything is modified. Errors raised after that point
//! are structural and leave the tissue unusable.

mod divide;
mod split;

use crate::topology::ids::{CellId, EdgeId, NodeId, WallId};

/// Optional settings for [`Tissue::divide_cell_with`](crate::topology::tissue::Tissue::divide_cell_with).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DivisionOptions {
    /// Intersections whose edge parameter `s` lies within this distance of 0
    /// or 1 are treated as hitting an existing node and do not count as
    /// crossings.
    pub node_snap_tolerance: f64,
}

impl Default for DivisionOptions {
    fn default() -> Self {
        Self {
            node_snap_tolerance: 1e-3,
        }
    }
}

/// Entities created or changed by a cell division.
///
/// Index 0 of every pair refers to the first crossing found while walking the
/// cell's walls in order, index 1 to the second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DivisionResult {
    /// The divided cell, which keeps its ID.
    pub mother: CellId,
    /// The newly created cell.
    pub daughter: CellId,
    /// New nodes `q0`, `q1` at the crossings.
    pub nodes: [NodeId; 2],
    /// Crossed edges, now ending at their `q`.
    pub split_edges: [EdgeId; 2],
    /// New edges from each `q` to the old end of the crossed edge.
    pub new_edges: [EdgeId; 2],
    /// The edge `q0 -> q1`.
    pub division_edge: EdgeId,
    /// Crossed walls, now ending at their `q`.
    pub split_walls: [WallId; 2],
    /// New walls from each `q` to the old end of the crossed wall.
    pub new_walls: [WallId; 2],
    /// The wall `q0 -> q1` between mother and daughter.
    pub division_wall: WallId,
}

/// Entities created or changed by [`Tissue::split_edge`](crate::topology::tissue::Tissue::split_edge).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitEdgeResult {
    /// The split edge, now `n0 -> q`.
    pub edge: EdgeId,
    /// The new edge `q -> n1`.
    pub new_edge: EdgeId,
    /// The new midpoint node `q`.
    pub node: NodeId,
}

/// Replace every occurrence of `old` by `new`.
fn replace_in<T: Copy + PartialEq>(list: &mut [T], old: T, new: T) {
    for x in list.iter_mut().filter(|x| **x == old) {
        *x = new;
    }
}

/// Insert `q` between the cyclically adjacent entries `a` and `b`, in either
/// order. An insertion after the last entry appends, so `list[0]` never moves.
fn insert_between<T: Copy + PartialEq>(list: &mut Vec<T>, a: T, b: T, q: T) -> bool {
    let len = list.len();
    let slot = (0..len).find(|&k| {
        let (x, y) = (list[k], list[(k + 1) % len]);
        (x == a && y == b) || (x == b && y == a)
    });
    match slot {
        Some(k) => {
            list.insert(k + 1, q);
            true
        }
        None => false,
    }
}
