//! Edge splitting at the midpoint.

use super::{SplitEdgeResult, replace_in};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::ids::{CellId, EdgeId, NodeId};
use crate::topology::tissue::Tissue;

impl Tissue {
    /// Inserts a node `q` at the midpoint of `edge`.
    ///
    /// ```text
    ///          c0                          c0
    /// [n0] ---edge--> [n1]   =>   [n0] ---edge--> [q] ---new--> [n1]
    ///          c1                          c1
    /// ```
    ///
    /// The new edge follows the old one in its wall's edge list and inherits
    /// the wall and both cells. `q` is inserted before `n1` in `c0`'s node
    /// list and before `n0` in `c1`'s (either may be the exterior). No wall or
    /// cell is created, so cell adjacency and the boundary walls are left as
    /// they are; the stored boundary node list gains `q` when the edge lies on
    /// the boundary. Node and edge attribute columns get one zero default
    /// each.
    pub fn split_edge(&mut self, edge: EdgeId) -> Result<SplitEdgeResult, MeshError> {
        let ei = self.edges.index_of(edge)?;
        let [n0, n1] = self.edges_nodes[ei];
        let [c0, c1] = self.edges_cells[ei];
        let wall = self.edges_walls[ei];
        let wi = self.walls.index_of(wall)?;
        let (i0, i1) = (self.nodes.index_of(n0)?, self.nodes.index_of(n1)?);
        let pos = self.walls_edges[wi]
            .iter()
            .position(|&e| e == edge)
            .ok_or(MeshError::BrokenWallChain { wall })?;
        let c0_slot = self.slot_before(c0, n1, n0)?;
        let c1_slot = self.slot_before(c1, n0, n1)?;

        let (q, iq) = self.push_node_lerp(i0, i1, 0.5);
        let new_edge = self.push_edge([q, n1], [c0, c1], wall);
        self.edges_nodes[ei] = [n0, q];
        self.walls_edges[wi].insert(pos + 1, new_edge);

        replace_in(&mut self.nodes_edges[i1], edge, new_edge);
        replace_in(&mut self.nodes_nodes[i1], n0, q);
        replace_in(&mut self.nodes_nodes[i0], n1, q);
        self.nodes_edges[iq] = vec![edge, new_edge];
        self.nodes_nodes[iq] = vec![n0, n1];

        for (slot, anchor) in [(c0_slot, n1), (c1_slot, n0)] {
            if let Some((ci, at)) = slot {
                self.cells_nodes[ci].insert(at, q);
                log::debug!("inserted node {q} before {anchor} in cell {}", self.cells.ids()[ci]);
            }
        }
        if c0.is_exterior() || c1.is_exterior() {
            let len = self.boundary_nodes.len();
            if let Some(k) = (0..len).find(|&k| {
                let (a, b) = (self.boundary_nodes[k], self.boundary_nodes[(k + 1) % len]);
                (a == n0 && b == n1) || (a == n1 && b == n0)
            }) {
                self.boundary_nodes.insert(k + 1, q);
            }
        }

        log::debug!("split edge {edge} of wall {wall} at new node {q}, new edge {new_edge}");
        crate::debug_invariants!(self.validate_invariants(), "split_edge");
        Ok(SplitEdgeResult {
            edge,
            new_edge,
            node: q,
        })
    }

    /// Index of `cell` and the position in its node list where a node going
    /// right before `anchor` must be inserted. `None` for the exterior.
    ///
    /// The node preceding `anchor` must be `prev`.
    fn slot_before(
        &self,
        cell: CellId,
        anchor: NodeId,
        prev: NodeId,
    ) -> Result<Option<(usize, usize)>, MeshError> {
        if cell.is_exterior() {
            return Ok(None);
        }
        let ci = self.cells.index_of(cell)?;
        let nodes = &self.cells_nodes[ci];
        let broken = || MeshError::BrokenCellCycle {
            cell,
            from: prev,
            to: anchor,
        };
        let at = nodes.iter().position(|&n| n == anchor).ok_or_else(broken)?;
        let before = if at == 0 { nodes.len() - 1 } else { at - 1 };
        if nodes[before] != prev {
            return Err(broken());
        }
        // Inserting before node 0 appends instead, so node 0 stays first.
        let at = if at == 0 { nodes.len() } else { at };
        Ok(Some((ci, at)))
    }
}
