//! Tissue generators: arbitrary polygon sets, rectangular grids and the
//! offset hexagon tissue.
//!
//! Every generator ends in [`tissue_from_polygons`], which only needs node
//! coordinates and CCW cell node lists and derives the walls itself.

use crate::data::coordinates::NodeCoordinates;
use crate::geometry::polygon::polygon_signed_area;
use crate::mesh_error::MeshError;
use crate::topology::ids::{CellId, NodeId, WallId};
use crate::topology::tissue::Tissue;
use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use std::f64::consts::FRAC_PI_6;

/// Optional configuration for [`grid_tissue`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridOptions {
    /// Cell width and height.
    pub spacing: [f64; 2],
    /// Position of the lower-left node.
    pub origin: [f64; 2],
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            spacing: [1.0, 1.0],
            origin: [0.0, 0.0],
        }
    }
}

/// Optional configuration for [`hexagon_tissue`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexagonOptions {
    pub wall_length: f64,
    /// Scale node positions so every cell is a regular hexagon instead of a
    /// six-node brick.
    pub regular: bool,
    /// Shift every other node column left by a third of the wall length.
    pub two_thirds: bool,
}

impl Default for HexagonOptions {
    fn default() -> Self {
        Self {
            wall_length: 1.0,
            regular: false,
            two_thirds: false,
        }
    }
}

fn invalid_input(message: impl Into<String>) -> MeshError {
    MeshError::InvalidGeneratorInput(message.into())
}

fn node_id(index: usize) -> NodeId {
    NodeId::new(index as i64)
}

fn cell_id(index: usize) -> CellId {
    CellId::new(index as i64)
}

fn wall_id(index: usize) -> WallId {
    WallId::new(index as i64)
}

fn undirected(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

struct WallDraft {
    nodes: [usize; 2],
    cells: [CellId; 2],
}

/// Builds a prepared tissue from node coordinates and CCW cell node lists.
///
/// Node, cell and wall IDs are consecutive from 0; node `i` is `coords[i]`
/// and cell `i` is `cells[i]`. Walls are derived from the cell edges: a wall
/// is a maximal run of consecutive edges of a cell that share the same cell
/// on the other side and do not pass through a junction node (one with three
/// or more neighbouring nodes). A run that would close on itself, as for an
/// isolated cell, is split into one wall per edge. Each wall is oriented along
/// the first cell that creates it.
///
/// # Errors
/// `InvalidGeneratorInput` for cells with fewer than three nodes, unknown or
/// repeated nodes, clockwise or flat cells, and two cells traversing the same
/// edge in the same direction. Errors of
/// [`Tissue::prepare_for_use`] are passed through.
pub fn tissue_from_polygons(
    coords: NodeCoordinates,
    cells: &[Vec<usize>],
) -> Result<Tissue, MeshError> {
    let n = coords.len();
    for (ci, cell) in cells.iter().enumerate() {
        if cell.len() < 3 {
            return Err(invalid_input(format!(
                "cell {ci} has {} nodes, at least 3 are required",
                cell.len()
            )));
        }
        let polygon = cell
            .iter()
            .map(|&v| {
                coords
                    .xy(v)
                    .ok_or_else(|| invalid_input(format!("cell {ci} references missing node {v}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let area = polygon_signed_area(&polygon);
        if area <= 0.0 {
            return Err(invalid_input(format!(
                "cell {ci} is not counter-clockwise (signed area {area})"
            )));
        }
    }

    let mut owner: HashMap<(usize, usize), usize> = HashMap::new();
    let mut neighbors: Vec<HashSet<usize>> = vec![HashSet::new(); n];
    for (ci, cell) in cells.iter().enumerate() {
        for (a, b) in cell.iter().copied().circular_tuple_windows() {
            if a == b {
                return Err(invalid_input(format!("cell {ci} repeats node {a}")));
            }
            if let Some(other) = owner.insert((a, b), ci) {
                return Err(invalid_input(format!(
                    "cells {other} and {ci} both traverse edge {a} -> {b}"
                )));
            }
            neighbors[a].insert(b);
            neighbors[b].insert(a);
        }
    }
    let across = |a: usize, b: usize| {
        owner
            .get(&(b, a))
            .map_or(CellId::EXTERIOR, |&c| cell_id(c))
    };

    let mut walls: Vec<WallDraft> = Vec::new();
    let mut wall_of_edge: HashMap<(usize, usize), usize> = HashMap::new();
    let mut cells_walls: Vec<Vec<usize>> = Vec::with_capacity(cells.len());
    for (ci, cell) in cells.iter().enumerate() {
        let len = cell.len();
        let next = |k: usize| (k + 1) % len;
        let outside: Vec<CellId> = (0..len).map(|k| across(cell[k], cell[next(k)])).collect();
        // Edge k opens a new wall at a junction or where the neighbour changes.
        let opens: Vec<bool> = (0..len)
            .map(|k| neighbors[cell[k]].len() >= 3 || outside[k] != outside[(k + len - 1) % len])
            .collect();
        // With fewer than two openings the only run would close on itself.
        let closed = opens.iter().filter(|&&o| o).count() < 2;
        let first = opens.iter().position(|&o| o).unwrap_or(0);

        let mut edge_walls = vec![0usize; len];
        let mut k = 0;
        while k < len {
            let start = (first + k) % len;
            let mut run = vec![start];
            k += 1;
            while !closed && k < len && !opens[(first + k) % len] {
                run.push((first + k) % len);
                k += 1;
            }
            let wall = match wall_of_edge.get(&undirected(cell[start], cell[next(start)])) {
                Some(&w) => w,
                None => {
                    let end = run.last().map_or(next(start), |&e| next(e));
                    walls.push(WallDraft {
                        nodes: [cell[start], cell[end]],
                        cells: [cell_id(ci), outside[start]],
                    });
                    walls.len() - 1
                }
            };
            for &e in &run {
                let key = undirected(cell[e], cell[next(e)]);
                if let Some(w) = wall_of_edge.insert(key, wall) {
                    if w != wall {
                        return Err(invalid_input(format!(
                            "edge {} - {} of cell {ci} lies on two derived walls",
                            key.0, key.1
                        )));
                    }
                }
                edge_walls[e] = wall;
            }
        }

        let mut listed: Vec<usize> = edge_walls.into_iter().dedup().collect();
        if listed.len() > 1 && listed.first() == listed.last() {
            listed.pop();
        }
        cells_walls.push(listed);
    }

    let mut tissue = Tissue::new((0..n).map(node_id), coords)?;
    for (ci, (cell, listed)) in cells.iter().zip(cells_walls).enumerate() {
        tissue.insert_cell(
            cell_id(ci),
            cell.iter().map(|&v| node_id(v)).collect(),
            listed.into_iter().map(wall_id).collect(),
        )?;
    }
    for (wi, draft) in walls.iter().enumerate() {
        tissue.insert_wall(
            wall_id(wi),
            [node_id(draft.nodes[0]), node_id(draft.nodes[1])],
            draft.cells,
        )?;
    }
    tissue.prepare_for_use()?;
    log::info!("generated {}", tissue.summary());
    Ok(tissue)
}

/// Rectangular tissue of `rows × cols` cells.
///
/// Node `j * (cols + 1) + i` sits at column `i`, row `j`; cell `r * cols + c`
/// is the rectangle whose lower-left node is at column `c`, row `r`.
pub fn grid_tissue(rows: usize, cols: usize, options: GridOptions) -> Result<Tissue, MeshError> {
    if rows == 0 || cols == 0 {
        return Err(invalid_input(format!(
            "grid needs at least one row and one column, got {rows}x{cols}"
        )));
    }
    let [dx, dy] = options.spacing;
    if !(dx > 0.0 && dy > 0.0) {
        return Err(invalid_input(format!("grid spacing must be positive, got {dx}x{dy}")));
    }
    let [x0, y0] = options.origin;

    let mut xy = Vec::with_capacity((rows + 1) * (cols + 1));
    for j in 0..=rows {
        for i in 0..=cols {
            xy.push([x0 + i as f64 * dx, y0 + j as f64 * dy]);
        }
    }
    let node = |i: usize, j: usize| j * (cols + 1) + i;
    let mut cells = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            cells.push(vec![node(c, r), node(c + 1, r), node(c + 1, r + 1), node(c, r + 1)]);
        }
    }
    tissue_from_polygons(NodeCoordinates::Xy(xy), &cells)
}

/// Offset hexagon tissue of `rows × cols` cells.
///
/// ```text
///  / \ / \ / \
/// |   |   |   |
///  \ / \ / \ / \
///   |   |   |   |
///  / \ / \ / \ /
/// |   |   |   |
///  \ / \ / \ /
/// ```
///
/// Odd cell rows are shifted right by half a cell. The tissue has
/// `2 (rows + 1)(cols + 1) - 2` nodes arranged in `rows + 1` node rows; the
/// bottom and top rows hold one node less than the others. By default cells
/// are drawn as bricks, with the six nodes of a cell on two horizontal
/// lines:
///
/// ```text
/// NW -- N -- NE
///  |         |
/// SW -- S -- SE
/// ```
///
/// Node lists start at SW and run counter-clockwise. Cell `r * cols + c` is
/// column `c` of cell row `r`, counted from the lower left.
pub fn hexagon_tissue(
    rows: usize,
    cols: usize,
    options: HexagonOptions,
) -> Result<Tissue, MeshError> {
    if rows == 0 || cols == 0 {
        return Err(invalid_input(format!(
            "hexagon tissue needs at least one row and one column, got {rows}x{cols}"
        )));
    }
    let l = options.wall_length;
    if !(l > 0.0) {
        return Err(invalid_input(format!("wall length must be positive, got {l}")));
    }

    let node_cols = 2 * (cols + 1);
    let row_len = |r: usize| if r == 0 || r == rows { node_cols - 1 } else { node_cols };
    let row_start = |r: usize| if r == 0 { 0 } else { r * node_cols - 1 };
    // The top row starts one column to the right when the number of rows is
    // even.
    let col_offset = |r: usize| if r == rows { (rows + 1) % 2 } else { 0 };

    let mut xy = Vec::with_capacity(2 * (rows + 1) * (cols + 1) - 2);
    for r in 0..=rows {
        for k in 0..row_len(r) {
            let col = k + col_offset(r);
            let mut x = col as f64 * l;
            let mut y = r as f64 * l;
            if options.regular {
                x *= FRAC_PI_6.cos();
                let lift = if (r + col) % 2 == 0 { r + 1 } else { r };
                y += 0.5 * l * lift as f64;
            }
            if options.two_thirds && col % 2 == 1 {
                x -= l / 3.0;
            }
            xy.push([x, y]);
        }
    }

    let index = |r: usize, col: usize| row_start(r) + col - col_offset(r);
    let mut cells = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let a = r % 2 + 2 * c;
            cells.push(vec![
                index(r, a),
                index(r, a + 1),
                index(r, a + 2),
                index(r + 1, a + 2),
                index(r + 1, a + 1),
                index(r + 1, a),
            ]);
        }
    }
    log::debug!(
        "hexagon tissue {rows}x{cols}: {} nodes, {} cells",
        xy.len(),
        cells.len()
    );
    tissue_from_polygons(NodeCoordinates::Xy(xy), &cells)
}
