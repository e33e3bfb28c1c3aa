//! Cell division along a straight line.

use super::{DivisionOptions, DivisionResult, insert_between, replace_in};
use crate::debug_invariants::DebugInvariants;
use crate::geometry::polygon::{HitLocation, cross, segment_intersection, sub};
use crate::mesh_error::MeshError;
use crate::topology::ids::{CellId, EdgeId, NodeId, WallId, other_of};
use crate::topology::tissue::Tissue;
use hashbrown::HashSet;

/// An edge of the dividing cell that the cutting line crosses.
#[derive(Clone, Debug)]
struct Crossing {
    edge: EdgeId,
    wall: WallId,
    /// Edge endpoints in edge orientation.
    a: NodeId,
    b: NodeId,
    /// Parameter along `a -> b`.
    s: f64,
    /// The cell on the other side of the wall, possibly the exterior.
    outside: CellId,
}

/// A crossed wall after it has been cut in two.
struct CutWall {
    kept: usize,
    new: usize,
    new_edge: EdgeId,
    /// Node 0 of the wall before the cut; decides which piece the mother keeps.
    head: NodeId,
}

impl Tissue {
    /// Divides `cell` along the line through `point` with `direction`, using
    /// default [`DivisionOptions`].
    pub fn divide_cell(
        &mut self,
        cell: CellId,
        point: [f64; 2],
        direction: [f64; 2],
    ) -> Result<DivisionResult, MeshError> {
        self.divide_cell_with(cell, point, direction, DivisionOptions::default())
    }

    /// Divides `cell` along the line through `point` with `direction`.
    ///
    /// The line must cross exactly two edges of the cell, on two different
    /// walls. Two nodes are created at the crossings, both crossed edges and
    /// walls are cut there, and a division wall joins the new nodes. Nodes
    /// strictly left of `q0 -> q1` stay with the mother (the old ID), the rest
    /// go to a new daughter cell. Cells across the crossed walls get the new
    /// node inserted into their node list. Every attribute column is extended
    /// with zero defaults for the 2 nodes, 3 edges, 1 cell and 3 walls
    /// created.
    ///
    /// # Errors
    /// - `UnknownId` for an unknown cell.
    /// - `DivisionAmbiguous { count }` unless exactly two crossings exist.
    /// - `DivisionDegenerate` when both crossings lie on the same wall.
    ///
    /// None of these modify the tissue. Structural errors raised while
    /// patching (e.g. `InconsistentWallCells`) leave it unusable.
    pub fn divide_cell_with(
        &mut self,
        cell: CellId,
        point: [f64; 2],
        direction: [f64; 2],
        options: DivisionOptions,
    ) -> Result<DivisionResult, MeshError> {
        let ci = self.cells.index_of(cell)?;
        let crossings = self.find_crossings(ci, point, direction, options.node_snap_tolerance)?;
        let [x0, x1]: [Crossing; 2] = crossings
            .try_into()
            .map_err(|found: Vec<Crossing>| MeshError::DivisionAmbiguous { count: found.len() })?;
        if x0.wall == x1.wall {
            return Err(MeshError::DivisionDegenerate { wall: x0.wall });
        }

        // Everything below only reads until the first new entity is pushed.
        let p0 = self.crossing_point(&x0)?;
        let p1 = self.crossing_point(&x1)?;
        let cut = sub(p1, p0);
        let old_nodes = self.cells_nodes[ci].clone();
        let old_walls = self.cells_walls[ci].clone();
        let mut mother_side: HashSet<NodeId> = HashSet::with_capacity(old_nodes.len());
        for &n in &old_nodes {
            let xy = self.xy_at(self.nodes.index_of(n)?)?;
            if cross(cut, sub(xy, p0)) > 0.0 {
                mother_side.insert(n);
            }
        }
        let k0 = slot_of(&old_nodes, &x0).ok_or(MeshError::BrokenCellCycle {
            cell,
            from: x0.a,
            to: x0.b,
        })?;
        let k1 = slot_of(&old_nodes, &x1).ok_or(MeshError::BrokenCellCycle {
            cell,
            from: x1.a,
            to: x1.b,
        })?;
        log::debug!(
            "dividing cell {cell}: crossings on edges {} and {}, {} of {} nodes on the mother side",
            x0.edge,
            x1.edge,
            mother_side.len(),
            old_nodes.len()
        );

        // New nodes, daughter cell and the two cut walls.
        let (ia0, ib0) = (self.nodes.index_of(x0.a)?, self.nodes.index_of(x0.b)?);
        let (ia1, ib1) = (self.nodes.index_of(x1.a)?, self.nodes.index_of(x1.b)?);
        let (q0, _) = self.push_node_lerp(ia0, ib0, x0.s);
        let (q1, _) = self.push_node_lerp(ia1, ib1, x1.s);
        let (daughter, di) = self.push_cell(Vec::new(), Vec::new());
        let cut0 = self.cut_wall(&x0, q0)?;
        let cut1 = self.cut_wall(&x1, q1)?;

        let (division_wall, wdi) = self.push_wall([q0, q1], [cell, daughter], Vec::new());
        let division_edge = self.push_edge([q0, q1], [cell, daughter], division_wall);
        self.walls_edges[wdi].push(division_edge);

        let iq0 = self.nodes.index_of(q0)?;
        let iq1 = self.nodes.index_of(q1)?;
        self.nodes_edges[iq0] = vec![cut0.new_edge, x0.edge, division_edge];
        self.nodes_nodes[iq0] = vec![x0.b, x0.a, q1];
        self.nodes_edges[iq1] = vec![cut1.new_edge, x1.edge, division_edge];
        self.nodes_nodes[iq1] = vec![x1.b, x1.a, q0];

        // Hand every wall on the daughter side over to the daughter.
        for wall in old_walls {
            if wall == x0.wall || wall == x1.wall {
                continue;
            }
            let wi = self.walls.index_of(wall)?;
            let [n0, n1] = self.walls_nodes[wi];
            if !mother_side.contains(&n0) && !mother_side.contains(&n1) {
                self.reassign_wall(wi, cell, daughter);
            }
        }
        for piece in [&cut0, &cut1] {
            let daughter_piece = if mother_side.contains(&piece.head) {
                piece.new
            } else {
                piece.kept
            };
            self.reassign_wall(daughter_piece, cell, daughter);
        }

        // Node cycles: the old cycle with q0 and q1 spliced in at the crossed
        // edges, then filtered by side. Both q's belong to both cells.
        let mut cycle = Vec::with_capacity(old_nodes.len() + 2);
        for (k, &n) in old_nodes.iter().enumerate() {
            cycle.push(n);
            if k == k0 {
                cycle.push(q0);
            }
            if k == k1 {
                cycle.push(q1);
            }
        }
        let is_q = |n: &NodeId| *n == q0 || *n == q1;
        self.cells_nodes[ci] = cycle
            .iter()
            .copied()
            .filter(|n| is_q(n) || mother_side.contains(n))
            .collect();
        self.cells_nodes[di] = cycle
            .iter()
            .copied()
            .filter(|n| is_q(n) || !mother_side.contains(n))
            .collect();
        log::debug!(
            "mother {cell} nodes {:?}, daughter {daughter} nodes {:?}",
            self.cells_nodes[ci],
            self.cells_nodes[di]
        );

        // Cells across the crossed walls gain the new node.
        let mut touched = vec![ci, di];
        for (x, q) in [(&x0, q0), (&x1, q1)] {
            if x.outside.is_exterior() {
                continue;
            }
            let oi = self.cells.index_of(x.outside)?;
            if !insert_between(&mut self.cells_nodes[oi], x.a, x.b, q) {
                return Err(MeshError::BrokenCellCycle {
                    cell: x.outside,
                    from: x.a,
                    to: x.b,
                });
            }
            touched.push(oi);
        }
        touched.dedup();
        for index in touched {
            self.reorder_cell_walls(index)?;
        }

        self.derive_cell_adjacency()?;
        self.compute_boundary_polygon()?;
        log::info!("divided cell {cell}: daughter {daughter}, division wall {division_wall}");

        let result = DivisionResult {
            mother: cell,
            daughter,
            nodes: [q0, q1],
            split_edges: [x0.edge, x1.edge],
            new_edges: [cut0.new_edge, cut1.new_edge],
            division_edge,
            split_walls: [x0.wall, x1.wall],
            new_walls: [self.walls.ids()[cut0.new], self.walls.ids()[cut1.new]],
            division_wall,
        };
        crate::debug_invariants!(self.validate_invariants(), "divide_cell");
        Ok(result)
    }

    /// Edges of cell `ci` strictly crossed by the line `point + t·direction`,
    /// in wall order then edge order.
    fn find_crossings(
        &self,
        ci: usize,
        point: [f64; 2],
        direction: [f64; 2],
        tolerance: f64,
    ) -> Result<Vec<Crossing>, MeshError> {
        let cell = self.cells.ids()[ci];
        let mut found = Vec::with_capacity(2);
        for &wall in &self.cells_walls[ci] {
            let wi = self.walls.index_of(wall)?;
            let cells = self.walls_cells[wi];
            let outside = other_of(cells, cell)
                .ok_or(MeshError::InconsistentWallCells { cell, wall, cells })?;
            for &edge in &self.walls_edges[wi] {
                let [a, b] = self.edges_nodes[edge.index()];
                let xa = self.xy_at(self.nodes.index_of(a)?)?;
                let xb = self.xy_at(self.nodes.index_of(b)?)?;
                let Some(hit) = segment_intersection(point, direction, xa, xb) else {
                    continue;
                };
                if hit.locate(tolerance) == HitLocation::Interior {
                    found.push(Crossing {
                        edge,
                        wall,
                        a,
                        b,
                        s: hit.s,
                        outside,
                    });
                }
            }
        }
        Ok(found)
    }

    /// XY position of a crossing, computed exactly as the new node will be.
    fn crossing_point(&self, x: &Crossing) -> Result<[f64; 2], MeshError> {
        let xa = self.xy_at(self.nodes.index_of(x.a)?)?;
        let xb = self.xy_at(self.nodes.index_of(x.b)?)?;
        Ok([xa[0] + x.s * (xb[0] - xa[0]), xa[1] + x.s * (xb[1] - xa[1])])
    }

    /// Cuts the crossed edge and its wall at `q`.
    ///
    /// The crossed edge and wall keep their IDs and now end at `q`. A new
    /// wall takes over from `q` to the old wall end, owning a new edge
    /// `q -> b` followed by the edges that came after the crossed one.
    fn cut_wall(&mut self, x: &Crossing, q: NodeId) -> Result<CutWall, MeshError> {
        let wi = self.walls.index_of(x.wall)?;
        let pos = self.walls_edges[wi]
            .iter()
            .position(|&e| e == x.edge)
            .ok_or(MeshError::BrokenWallChain { wall: x.wall })?;
        let rest = self.walls_edges[wi].split_off(pos + 1);
        let [head, tail] = self.walls_nodes[wi];
        self.walls_nodes[wi] = [head, q];

        let cells = self.walls_cells[wi];
        let (new_wall, nwi) = self.push_wall([q, tail], cells, Vec::new());
        let edge_cells = self.edges_cells[x.edge.index()];
        let new_edge = self.push_edge([q, x.b], edge_cells, new_wall);
        self.edges_nodes[x.edge.index()] = [x.a, q];
        for e in &rest {
            self.edges_walls[e.index()] = new_wall;
        }
        self.walls_edges[nwi] = std::iter::once(new_edge).chain(rest).collect();

        let ia = self.nodes.index_of(x.a)?;
        let ib = self.nodes.index_of(x.b)?;
        replace_in(&mut self.nodes_nodes[ia], x.b, q);
        replace_in(&mut self.nodes_nodes[ib], x.a, q);
        replace_in(&mut self.nodes_edges[ib], x.edge, new_edge);
        log::debug!(
            "cut wall {} at node {q}: edge {} now ends at {q}, new wall {new_wall} with edge {new_edge}",
            x.wall,
            x.edge
        );
        Ok(CutWall {
            kept: wi,
            new: nwi,
            new_edge,
            head,
        })
    }

    /// Moves wall `wi` and all its edges from cell `from` to cell `to`.
    fn reassign_wall(&mut self, wi: usize, from: CellId, to: CellId) {
        replace_in(&mut self.walls_cells[wi], from, to);
        for ei in 0..self.walls_edges[wi].len() {
            let e = self.walls_edges[wi][ei];
            replace_in(&mut self.edges_cells[e.index()], from, to);
        }
    }
}

/// Position `k` of the crossed edge in a node cycle: the edge joins
/// `nodes[k]` and `nodes[k + 1]` (cyclically).
fn slot_of(nodes: &[NodeId], x: &Crossing) -> Option<usize> {
    let len = nodes.len();
    (0..len).find(|&k| {
        let (n, m) = (nodes[k], nodes[(k + 1) % len]);
        (n == x.a && m == x.b) || (n == x.b && m == x.a)
    })
}
