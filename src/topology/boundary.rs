//! Boundary polygon: the outer perimeter of the tissue, stitched together
//! from the walls that face the exterior.

use crate::mesh_error::MeshError;
use crate::topology::ids::{CellId, NodeId, WallId};
use crate::topology::tissue::Tissue;
use hashbrown::HashMap;

/// Traces the boundary polygon of `tissue` without storing it.
///
/// Every exterior wall contributes its node chain, oriented so the exterior
/// lies on its left: in wall order when the wall's first cell is the exterior,
/// reversed otherwise. Chains are linked head to tail until the walk returns
/// to its start. The walk starts at the smallest chain head so the result is
/// deterministic. Nodes come out clockwise; walls follow the node order.
///
/// An empty tissue, or one without exterior walls, has an empty boundary.
///
/// # Errors
/// `BoundaryNotClosed` when some chain has no successor or the walk does not
/// come back to its start.
pub fn boundary_polygon(tissue: &Tissue) -> Result<(Vec<NodeId>, Vec<WallId>), MeshError> {
    let mut successor: HashMap<NodeId, (Vec<NodeId>, WallId)> = HashMap::new();
    let mut exterior_walls = 0usize;
    for (wi, &wall) in tissue.walls.ids().iter().enumerate() {
        let cells = tissue.walls_cells[wi];
        if !cells.contains(&CellId::EXTERIOR) {
            continue;
        }
        exterior_walls += 1;
        let mut chain = tissue.wall_chain_at(wi)?;
        if !cells[0].is_exterior() {
            chain.reverse();
        }
        let head = chain.remove(0);
        if successor.insert(head, (chain, wall)).is_some() {
            log::warn!("boundary node {head} starts more than one exterior wall");
        }
    }

    let Some(&start) = successor.keys().min() else {
        return Ok((Vec::new(), Vec::new()));
    };

    let mut nodes = Vec::new();
    let mut walls = Vec::new();
    let mut current = start;
    loop {
        let (tail, wall) = successor
            .get(&current)
            .ok_or(MeshError::BoundaryNotClosed { node: current })?;
        let (&next, inner) = tail
            .split_last()
            .ok_or(MeshError::BrokenWallChain { wall: *wall })?;
        nodes.push(current);
        nodes.extend_from_slice(inner);
        walls.push(*wall);
        current = next;
        if current == start {
            break;
        }
        if walls.len() >= exterior_walls {
            return Err(MeshError::BoundaryNotClosed { node: current });
        }
    }

    if walls.len() < exterior_walls {
        log::warn!(
            "boundary polygon covers {} of {} exterior walls; the tissue has more than one boundary component",
            walls.len(),
            exterior_walls
        );
    }
    Ok((nodes, walls))
}

impl Tissue {
    /// Recomputes and stores the boundary polygon.
    pub fn compute_boundary_polygon(&mut self) -> Result<(), MeshError> {
        let (nodes, walls) = boundary_polygon(self)?;
        log::debug!("boundary polygon: {} nodes, {} walls", nodes.len(), walls.len());
        self.boundary_nodes = nodes;
        self.boundary_walls = walls;
        Ok(())
    }
}
