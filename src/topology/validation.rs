//! Tissue validation helpers.

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::boundary::boundary_polygon;
use crate::topology::ids::{EdgeId, EntityKind};
use crate::topology::tissue::Tissue;

/// Optional validation toggles for tissue consistency checks.
#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions {
    /// Every wall is listed by its cells, and every cell wall names the cell.
    pub check_wall_cells: bool,
    /// Consecutive cell nodes are joined by edges of the cell, and the wall
    /// list follows the node cycle.
    pub check_cell_cycles: bool,
    /// Wall edges chain from wall node 0 to wall node 1 and carry the wall's
    /// cells.
    pub check_wall_chains: bool,
    /// Edge endpoints record the edge and each other.
    pub check_node_adjacency: bool,
    /// Attribute columns have one value per entity.
    pub check_attribute_lengths: bool,
    /// The exterior walls stitch into a closed boundary polygon.
    pub check_boundary: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_boundary: false,
            ..Self::all()
        }
    }
}

impl ValidationOptions {
    /// Enable all validation checks.
    pub fn all() -> Self {
        Self {
            check_wall_cells: true,
            check_cell_cycles: true,
            check_wall_chains: true,
            check_node_adjacency: true,
            check_attribute_lengths: true,
            check_boundary: true,
        }
    }
}

/// Validate `tissue` against the selected invariants, returning the first
/// violation found.
pub fn validate_tissue(tissue: &Tissue, options: ValidationOptions) -> Result<(), MeshError> {
    if options.check_wall_cells {
        check_wall_cells(tissue)?;
    }
    if options.check_wall_chains {
        check_wall_chains(tissue)?;
    }
    if options.check_node_adjacency {
        check_node_adjacency(tissue)?;
    }
    if options.check_cell_cycles {
        check_cell_cycles(tissue)?;
    }
    if options.check_attribute_lengths {
        for kind in EntityKind::ALL {
            tissue
                .attributes(kind)
                .check_lengths(kind, tissue.count(kind))?;
        }
    }
    if options.check_boundary {
        boundary_polygon(tissue)?;
    }
    Ok(())
}

fn check_wall_cells(tissue: &Tissue) -> Result<(), MeshError> {
    for (ci, &cell) in tissue.cells.ids().iter().enumerate() {
        for &wall in &tissue.cells_walls[ci] {
            let cells = tissue.walls_cells[tissue.walls.index_of(wall)?];
            if !cells.contains(&cell) {
                return Err(MeshError::InconsistentWallCells { cell, wall, cells });
            }
        }
    }
    for (wi, &wall) in tissue.walls.ids().iter().enumerate() {
        for cell in tissue.walls_cells[wi] {
            if cell.is_exterior() {
                continue;
            }
            let ci = tissue.cells.index_of(cell)?;
            if !tissue.cells_walls[ci].contains(&wall) {
                return Err(MeshError::WallNotInCell { wall, cell });
            }
        }
    }
    Ok(())
}

fn check_wall_chains(tissue: &Tissue) -> Result<(), MeshError> {
    for (wi, &wall) in tissue.walls.ids().iter().enumerate() {
        let edges = &tissue.walls_edges[wi];
        let broken = MeshError::BrokenWallChain { wall };
        if edges.is_empty() {
            return Err(broken);
        }
        for e in edges {
            let ei = tissue.edges.index_of(*e)?;
            if tissue.edges_walls[ei] != wall || tissue.edges_cells[ei] != tissue.walls_cells[wi] {
                return Err(broken);
            }
        }
        let chain = tissue.wall_chain_at(wi)?;
        if chain.first() != Some(&tissue.walls_nodes[wi][0])
            || chain.last() != Some(&tissue.walls_nodes[wi][1])
        {
            return Err(broken);
        }
    }
    Ok(())
}

fn check_node_adjacency(tissue: &Tissue) -> Result<(), MeshError> {
    for (ei, &[a, b]) in tissue.edges_nodes.iter().enumerate() {
        let edge = EdgeId::from_index(ei);
        for (node, other) in [(a, b), (b, a)] {
            let ni = tissue.nodes.index_of(node)?;
            if !tissue.nodes_edges[ni].contains(&edge) || !tissue.nodes_nodes[ni].contains(&other) {
                return Err(MeshError::AsymmetricAdjacency { node, edge });
            }
        }
    }
    Ok(())
}

fn check_cell_cycles(tissue: &Tissue) -> Result<(), MeshError> {
    for (ci, &cell) in tissue.cells.ids().iter().enumerate() {
        // traversal_walls fails with BrokenCellCycle on a missing edge.
        let walls = tissue.traversal_walls(ci)?;
        let listed = &tissue.cells_walls[ci];
        if !is_rotation(&walls, listed) {
            return Err(MeshError::CellWallOrder { cell });
        }
    }
    Ok(())
}

/// `true` when `b` is a cyclic rotation of `a`.
fn is_rotation<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if a.is_empty() {
        return true;
    }
    (0..a.len()).any(|shift| (0..a.len()).all(|k| a[(k + shift) % a.len()] == b[k]))
}

impl DebugInvariants for Tissue {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        validate_tissue(self, ValidationOptions::all())
    }
}

#[cfg(test)]
mod tests {
    use super::is_rotation;

    #[test]
    fn rotations() {
        assert!(is_rotation(&[1, 2, 3], &[2, 3, 1]));
        assert!(is_rotation::<u8>(&[], &[]));
        assert!(!is_rotation(&[1, 2, 3], &[3, 2, 1]));
        assert!(!is_rotation(&[1, 2], &[1, 2, 3]));
    }
}
