//! Tissue-level measurements: cell areas and moments, wall lengths.
//!
//! All measurements use the XY projection of node positions. Cell polygons
//! follow the stored CCW node order, so areas of well-formed cells are
//! positive.

use crate::geometry::polygon::{PolygonMoments, polygon_moments, polygon_signed_area, polyline_length};
use crate::mesh_error::MeshError;
use crate::topology::ids::{CellId, NodeId, WallId};
use crate::topology::tissue::Tissue;

/// XY coordinates of a cell's nodes, in node order.
pub fn cell_polygon(tissue: &Tissue, cell: CellId) -> Result<Vec<[f64; 2]>, MeshError> {
    let ci = tissue.cell_index(cell)?;
    nodes_xy(tissue, &tissue.cells_nodes[ci])
}

fn nodes_xy(tissue: &Tissue, nodes: &[NodeId]) -> Result<Vec<[f64; 2]>, MeshError> {
    nodes
        .iter()
        .map(|&n| tissue.xy_at(tissue.node_index(n)?))
        .collect()
}

/// Signed area of a cell.
pub fn cell_area(tissue: &Tissue, cell: CellId) -> Result<f64, MeshError> {
    Ok(polygon_signed_area(&cell_polygon(tissue, cell)?))
}

/// Area, centroid and second moments of a cell.
///
/// # Errors
/// `DegeneratePolygon` for cells of (near) zero area.
pub fn cell_moments(tissue: &Tissue, cell: CellId) -> Result<PolygonMoments, MeshError> {
    polygon_moments(&cell_polygon(tissue, cell)?)
}

/// Length of a wall: the summed length of its edges.
pub fn wall_length(tissue: &Tissue, wall: WallId) -> Result<f64, MeshError> {
    let chain = tissue.wall_node_chain(wall)?;
    Ok(polyline_length(&nodes_xy(tissue, &chain)?))
}

/// Perimeter of a cell.
pub fn cell_perimeter(tissue: &Tissue, cell: CellId) -> Result<f64, MeshError> {
    let mut polygon = cell_polygon(tissue, cell)?;
    if let Some(&first) = polygon.first() {
        polygon.push(first);
    }
    Ok(polyline_length(&polygon))
}

/// Signed areas of all cells, in cell index order.
pub fn cell_areas(tissue: &Tissue) -> Result<Vec<f64>, MeshError> {
    tissue
        .cell_ids()
        .iter()
        .map(|&c| cell_area(tissue, c))
        .collect()
}

/// Lengths of all walls, in wall index order.
pub fn wall_lengths(tissue: &Tissue) -> Result<Vec<f64>, MeshError> {
    tissue
        .wall_ids()
        .iter()
        .map(|&w| wall_length(tissue, w))
        .collect()
}

/// Area enclosed by the boundary polygon.
///
/// The boundary runs clockwise, so the sign is flipped to report a positive
/// area for a well-formed tissue.
pub fn tissue_area(tissue: &Tissue) -> Result<f64, MeshError> {
    Ok(-polygon_signed_area(&nodes_xy(tissue, tissue.boundary_nodes())?))
}

/// Parallel version of [`cell_areas`].
#[cfg(feature = "rayon")]
pub fn par_cell_areas(tissue: &Tissue) -> Result<Vec<f64>, MeshError> {
    use rayon::prelude::*;
    tissue
        .cell_ids()
        .par_iter()
        .map(|&c| cell_area(tissue, c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_generation::{GridOptions, grid_tissue};

    #[test]
    fn grid_measurements() {
        let t = grid_tissue(2, 3, GridOptions::default()).unwrap();
        assert!(cell_areas(&t).unwrap().iter().all(|a| (a - 1.0).abs() < 1e-12));
        assert!((tissue_area(&t).unwrap() - 6.0).abs() < 1e-12);
        assert!((cell_perimeter(&t, CellId::new(0)).unwrap() - 4.0).abs() < 1e-12);
        // 9 horizontal and 8 vertical unit edges.
        let total: f64 = wall_lengths(&t).unwrap().iter().sum();
        assert!((total - 17.0).abs() < 1e-12);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn par_cell_areas_matches_serial() {
        use crate::mesh_generation::{HexagonOptions, hexagon_tissue};

        let mut t = hexagon_tissue(4, 4, HexagonOptions::default()).unwrap();
        let cell = CellId::new(5);
        let centroid = cell_moments(&t, cell).unwrap().centroid;
        t.divide_cell(cell, centroid, [0.3, 1.0]).unwrap();
        assert_eq!(par_cell_areas(&t).unwrap(), cell_areas(&t).unwrap());
    }
}
