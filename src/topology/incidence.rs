//! Derived incidence: edges from walls, node adjacency and cell adjacency.
//!
//! Each pass is a full recomputation from the current tables and may be run
//! any number of times.

use crate::mesh_error::MeshError;
use crate::topology::ids::{CellId, EdgeId, NodeId, WallId, other_of};
use crate::topology::registry::IdRegistry;
use crate::topology::tissue::Tissue;

impl Tissue {
    /// Re-derives all edges from walls and cell node cycles.
    ///
    /// A wall is oriented by its first cell: its node chain is the run of
    /// that cell's CCW node list from wall node 0 to wall node 1, wrapping
    /// around the end of the list. When the first cell is the exterior the
    /// reversed node list of the second cell is used. One edge is emitted per
    /// consecutive node pair of the chain, so a wall spanning several nodes
    /// owns several edges.
    ///
    /// Edge IDs are reassigned from 0 and every edge attribute column is reset
    /// to defaults of the new length.
    pub fn derive_edges_from_walls(&mut self) -> Result<(), MeshError> {
        let mut edges_nodes = Vec::with_capacity(self.num_walls());
        let mut edges_cells = Vec::with_capacity(self.num_walls());
        let mut edges_walls = Vec::with_capacity(self.num_walls());
        let mut walls_edges = Vec::with_capacity(self.num_walls());

        for (wi, &wall) in self.walls.ids().iter().enumerate() {
            let cells = self.walls_cells[wi];
            let chain = self.orienting_chain(wall, self.walls_nodes[wi], cells)?;
            let mut owned = Vec::with_capacity(chain.len() - 1);
            for pair in chain.windows(2) {
                owned.push(EdgeId::from_index(edges_nodes.len()));
                edges_nodes.push([pair[0], pair[1]]);
                edges_cells.push(cells);
                edges_walls.push(wall);
            }
            walls_edges.push(owned);
        }

        self.edges = IdRegistry::from_ids((0..edges_nodes.len()).map(EdgeId::from_index))?;
        self.edge_attrs.reset_defaults(edges_nodes.len());
        self.edges_nodes = edges_nodes;
        self.edges_cells = edges_cells;
        self.edges_walls = edges_walls;
        self.walls_edges = walls_edges;
        log::debug!(
            "derived {} edges from {} walls",
            self.num_edges(),
            self.num_walls()
        );
        Ok(())
    }

    /// Node chain of a wall as seen from the cell that orients it.
    fn orienting_chain(
        &self,
        wall: WallId,
        [n0, n1]: [NodeId; 2],
        [c0, c1]: [CellId; 2],
    ) -> Result<Vec<NodeId>, MeshError> {
        let (cell, reversed) = if c0.is_exterior() { (c1, true) } else { (c0, false) };
        if cell.is_exterior() {
            // A wall between two exterior sides has nothing to orient it.
            return Ok(vec![n0, n1]);
        }
        let mut nodes = self.cells_nodes[self.cells.index_of(cell)?].clone();
        if reversed {
            nodes.reverse();
        }
        let position = |n: NodeId| {
            nodes
                .iter()
                .position(|&x| x == n)
                .ok_or(MeshError::WallNodeNotInCell {
                    wall,
                    node: n,
                    cell,
                })
        };
        let (i0, i1) = (position(n0)?, position(n1)?);
        let len = nodes.len();
        let span = (i1 + len - i0) % len;
        Ok((0..=span).map(|k| nodes[(i0 + k) % len]).collect())
    }

    /// Rebuilds `nodes_nodes` and `nodes_edges` in one pass over all edges.
    pub fn derive_node_adjacency(&mut self) -> Result<(), MeshError> {
        let n = self.num_nodes();
        let mut nodes_nodes = vec![Vec::new(); n];
        let mut nodes_edges = vec![Vec::new(); n];
        for (ei, &[a, b]) in self.edges_nodes.iter().enumerate() {
            let (ia, ib) = (self.nodes.index_of(a)?, self.nodes.index_of(b)?);
            let e = EdgeId::from_index(ei);
            nodes_nodes[ia].push(b);
            nodes_edges[ia].push(e);
            nodes_nodes[ib].push(a);
            nodes_edges[ib].push(e);
        }
        self.nodes_nodes = nodes_nodes;
        self.nodes_edges = nodes_edges;
        Ok(())
    }

    /// Rebuilds `cells_cells`: for every cell, the cell across each of its
    /// walls, in the cell's own wall order.
    ///
    /// # Errors
    /// `InconsistentWallCells` if a wall listed by a cell does not name it.
    pub fn derive_cell_adjacency(&mut self) -> Result<(), MeshError> {
        let mut cells_cells = Vec::with_capacity(self.num_cells());
        for (ci, &cell) in self.cells.ids().iter().enumerate() {
            let neighbors = self.cells_walls[ci]
                .iter()
                .map(|&wall| {
                    let cells = self.walls_cells[self.walls.index_of(wall)?];
                    other_of(cells, cell).ok_or(MeshError::InconsistentWallCells {
                        cell,
                        wall,
                        cells,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            cells_cells.push(neighbors);
        }
        self.cells_cells = cells_cells;
        Ok(())
    }

    /// The edge joining nodes `a` and `b` that borders `cell`, if any.
    pub(crate) fn edge_between(
        &self,
        a: NodeId,
        b: NodeId,
        cell: CellId,
    ) -> Result<Option<EdgeId>, MeshError> {
        let ia = self.nodes.index_of(a)?;
        Ok(self.nodes_edges[ia].iter().copied().find(|e| {
            let [x, y] = self.edges_nodes[e.index()];
            ((x == a && y == b) || (x == b && y == a))
                && self.edges_cells[e.index()].contains(&cell)
        }))
    }

    /// Walls of a cell in node traversal order: wall 0 holds the edge
    /// `node[0] -> node[1]` and each following wall is the next distinct wall
    /// met while walking the node cycle.
    pub(crate) fn traversal_walls(&self, ci: usize) -> Result<Vec<WallId>, MeshError> {
        let cell = self.cells.ids()[ci];
        let nodes = &self.cells_nodes[ci];
        let mut walls: Vec<WallId> = Vec::with_capacity(nodes.len());
        for k in 0..nodes.len() {
            let (a, b) = (nodes[k], nodes[(k + 1) % nodes.len()]);
            let edge = self
                .edge_between(a, b, cell)?
                .ok_or(MeshError::BrokenCellCycle {
                    cell,
                    from: a,
                    to: b,
                })?;
            let wall = self.edges_walls[edge.index()];
            if walls.last() != Some(&wall) {
                walls.push(wall);
            }
        }
        if walls.len() > 1 && walls.first() == walls.last() {
            walls.pop();
        }
        Ok(walls)
    }

    /// Replaces the wall list of a cell with its traversal order.
    pub(crate) fn reorder_cell_walls(&mut self, ci: usize) -> Result<(), MeshError> {
        self.cells_walls[ci] = self.traversal_walls(ci)?;
        Ok(())
    }

    /// Puts the wall list of every cell in node traversal order.
    ///
    /// Persisted tissues may list walls in creation order; the listed walls
    /// must still be exactly the walls met while walking the cell's nodes.
    /// Needs edges and node adjacency.
    ///
    /// # Errors
    /// - `BrokenCellCycle` if consecutive nodes share no edge of the cell.
    /// - `InconsistentWallCells` if a listed wall does not name the cell.
    /// - `WallNotInCell` if the walk meets a wall the cell does not list.
    /// - `CellWallOrder` if a listed wall is never met, or is listed twice.
    pub fn normalize_cell_walls(&mut self) -> Result<(), MeshError> {
        for ci in 0..self.num_cells() {
            let cell = self.cells.ids()[ci];
            for &wall in &self.cells_walls[ci] {
                let cells = self.walls_cells[self.walls.index_of(wall)?];
                if !cells.contains(&cell) {
                    return Err(MeshError::InconsistentWallCells { cell, wall, cells });
                }
            }
            let walls = self.traversal_walls(ci)?;
            if let Some(&wall) = walls.iter().find(|&w| !self.cells_walls[ci].contains(w)) {
                return Err(MeshError::WallNotInCell { wall, cell });
            }
            if walls.len() != self.cells_walls[ci].len() {
                return Err(MeshError::CellWallOrder { cell });
            }
            if walls != self.cells_walls[ci] {
                log::debug!("cell {cell}: walls reordered to {walls:?}");
                self.cells_walls[ci] = walls;
            }
        }
        Ok(())
    }
}
