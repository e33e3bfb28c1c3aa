//! Persistence interchange for tissues.
//!
//! [`TissueData`] mirrors one step of the on-disk tissue layout as plain
//! arrays: IDs, coordinates, ragged cell lists flattened to rectangles with
//! `-1` padding, wall tables, named attribute columns and the boundary
//! polygon. Readers and writers for concrete container formats hand this
//! struct over; it derives serde so any serde format can store it directly.
//!
//! The boundary polygon is persisted counter-clockwise (the reverse of the
//! in-memory order) and is recomputed rather than trusted on import.

use crate::data::attributes::{AttributeTable, RawAttribute, SkippedAttribute};
use crate::data::coordinates::NodeCoordinates;
use crate::mesh_error::MeshError;
use crate::topology::ids::{CellId, EntityId, EntityKind, NodeId, WallId};
use crate::topology::tissue::Tissue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Padding value for ragged rows; also the exterior cell ID.
pub const PADDING: i64 = -1;

/// One tissue snapshot as flat arrays.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TissueData {
    pub nodes_id: Vec<i64>,
    /// Planar coordinates; ignored when `nodes_xyz` is present.
    #[serde(default)]
    pub nodes_xy: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub nodes_xyz: Option<Vec<[f64; 3]>>,
    #[serde(default)]
    pub nodes_attributes: BTreeMap<String, RawAttribute>,

    pub cells_id: Vec<i64>,
    pub cells_num_nodes: Vec<usize>,
    /// CCW node IDs per cell, padded with `-1`.
    pub cells_nodes: Vec<Vec<i64>>,
    pub cells_num_walls: Vec<usize>,
    /// Wall IDs per cell, padded with `-1`.
    pub cells_walls: Vec<Vec<i64>>,
    #[serde(default)]
    pub cells_attributes: BTreeMap<String, RawAttribute>,

    pub walls_id: Vec<i64>,
    pub walls_nodes: Vec<[i64; 2]>,
    pub walls_cells: Vec<[i64; 2]>,
    #[serde(default)]
    pub walls_attributes: BTreeMap<String, RawAttribute>,

    /// Boundary polygon nodes, CCW.
    #[serde(default)]
    pub bp_nodes: Vec<i64>,
    /// Boundary polygon walls, in persisted order.
    #[serde(default)]
    pub bp_walls: Vec<i64>,

    /// Free-form tissue-level properties.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// Flattens ragged rows into a rectangle padded with [`PADDING`].
///
/// Returns the per-row counts and the padded rows.
pub fn pad_rows(rows: &[Vec<i64>]) -> (Vec<usize>, Vec<Vec<i64>>) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let counts = rows.iter().map(Vec::len).collect();
    let padded = rows
        .iter()
        .map(|row| {
            let mut r = row.clone();
            r.resize(width, PADDING);
            r
        })
        .collect();
    (counts, padded)
}

/// Inverse of [`pad_rows`]: keeps the first `counts[i]` entries of row `i`.
///
/// # Errors
/// `LengthMismatch` when the number of counts and rows differ or a count
/// exceeds its row.
pub fn unpad_rows(
    what: &'static str,
    counts: &[usize],
    padded: &[Vec<i64>],
) -> Result<Vec<Vec<i64>>, MeshError> {
    if counts.len() != padded.len() {
        return Err(MeshError::LengthMismatch {
            what,
            expected: counts.len(),
            found: padded.len(),
        });
    }
    counts
        .iter()
        .zip(padded)
        .map(|(&n, row)| {
            row.get(..n)
                .map(<[i64]>::to_vec)
                .ok_or(MeshError::LengthMismatch {
                    what,
                    expected: n,
                    found: row.len(),
                })
        })
        .collect()
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<(), MeshError> {
    if expected == found {
        Ok(())
    } else {
        Err(MeshError::LengthMismatch {
            what,
            expected,
            found,
        })
    }
}

fn ids<I: EntityId>(raw: &[i64]) -> Vec<I> {
    raw.iter().map(|&r| I::from_raw(r)).collect()
}

impl Tissue {
    /// Builds and prepares a tissue from persisted arrays.
    ///
    /// Attributes of unsupported types are dropped with a warning; use
    /// [`from_data_with_report`](Self::from_data_with_report) to get them
    /// listed.
    pub fn from_data(data: TissueData) -> Result<Tissue, MeshError> {
        Self::from_data_with_report(data).map(|(tissue, _)| tissue)
    }

    /// Like [`from_data`](Self::from_data), also returning the attributes
    /// that were skipped because of their value type.
    ///
    /// # Errors
    /// - `MissingCoordinates` if neither `nodes_xyz` nor `nodes_xy` is given.
    /// - `LengthMismatch` for parallel arrays of different lengths.
    /// - `AttributeArrayLengthMismatch` for attribute columns of wrong length.
    /// - ID errors and every error of [`prepare_for_use`](Self::prepare_for_use).
    pub fn from_data_with_report(
        data: TissueData,
    ) -> Result<(Tissue, Vec<SkippedAttribute>), MeshError> {
        let TissueData {
            nodes_id,
            nodes_xy,
            nodes_xyz,
            nodes_attributes,
            cells_id,
            cells_num_nodes,
            cells_nodes,
            cells_num_walls,
            cells_walls,
            cells_attributes,
            walls_id,
            walls_nodes,
            walls_cells,
            walls_attributes,
            bp_nodes: _,
            bp_walls: _,
            attributes,
        } = data;

        let coords = match (nodes_xyz, nodes_xy) {
            (Some(xyz), _) => NodeCoordinates::Xyz(xyz),
            (None, Some(xy)) => NodeCoordinates::Xy(xy),
            (None, None) => return Err(MeshError::MissingCoordinates),
        };
        let mut tissue = Tissue::new(ids::<NodeId>(&nodes_id), coords)?;
        let mut skipped = Vec::new();

        check_len("cells_num_nodes", cells_id.len(), cells_num_nodes.len())?;
        check_len("cells_num_walls", cells_id.len(), cells_num_walls.len())?;
        let cells_nodes = unpad_rows("cells_nodes", &cells_num_nodes, &cells_nodes)?;
        let cells_walls = unpad_rows("cells_walls", &cells_num_walls, &cells_walls)?;
        for ((&id, nodes), walls) in cells_id.iter().zip(&cells_nodes).zip(&cells_walls) {
            tissue.insert_cell(CellId::new(id), ids(nodes), ids(walls))?;
        }

        check_len("walls_nodes", walls_id.len(), walls_nodes.len())?;
        check_len("walls_cells", walls_id.len(), walls_cells.len())?;
        for ((&id, nodes), cells) in walls_id.iter().zip(&walls_nodes).zip(&walls_cells) {
            tissue.insert_wall(
                WallId::new(id),
                [NodeId::new(nodes[0]), NodeId::new(nodes[1])],
                [CellId::new(cells[0]), CellId::new(cells[1])],
            )?;
        }

        for (kind, columns) in [
            (EntityKind::Node, nodes_attributes),
            (EntityKind::Cell, cells_attributes),
            (EntityKind::Wall, walls_attributes),
        ] {
            for (name, raw) in columns {
                let type_name = match &raw {
                    RawAttribute::Unsupported { type_name } => type_name.clone(),
                    _ => String::new(),
                };
                match raw.into_values() {
                    Some(values) => {
                        tissue.insert_attribute(kind, &name, values)?;
                    }
                    None => {
                        log::warn!("{kind} attribute `{name}` ignored; unsupported data type {type_name}");
                        skipped.push(SkippedAttribute {
                            kind,
                            name,
                            type_name,
                        });
                    }
                }
            }
        }
        tissue.properties = attributes;

        tissue.prepare_for_use()?;
        log::info!("imported {}", tissue.summary());
        Ok((tissue, skipped))
    }

    /// Exports the persistable arrays of this tissue.
    pub fn to_data(&self) -> TissueData {
        let (nodes_xy, nodes_xyz) = match &self.coords {
            NodeCoordinates::Xy(v) => (Some(v.clone()), None),
            NodeCoordinates::Xyz(v) => (None, Some(v.clone())),
        };
        let (cells_num_nodes, cells_nodes) = pad_rows(&raw_rows(&self.cells_nodes));
        let (cells_num_walls, cells_walls) = pad_rows(&raw_rows(&self.cells_walls));

        let mut bp_nodes: Vec<i64> = self.boundary_nodes.iter().map(|n| n.get()).collect();
        bp_nodes.reverse();
        let mut bp_walls: Vec<i64> = self.boundary_walls.iter().map(|w| w.get()).collect();
        bp_walls.reverse();

        TissueData {
            nodes_id: self.node_ids().iter().map(|n| n.get()).collect(),
            nodes_xy,
            nodes_xyz,
            nodes_attributes: export_attributes(&self.node_attrs),
            cells_id: self.cell_ids().iter().map(|c| c.get()).collect(),
            cells_num_nodes,
            cells_nodes,
            cells_num_walls,
            cells_walls,
            cells_attributes: export_attributes(&self.cell_attrs),
            walls_id: self.wall_ids().iter().map(|w| w.get()).collect(),
            walls_nodes: self
                .walls_nodes
                .iter()
                .map(|[a, b]| [a.get(), b.get()])
                .collect(),
            walls_cells: self
                .walls_cells
                .iter()
                .map(|[a, b]| [a.get(), b.get()])
                .collect(),
            walls_attributes: export_attributes(&self.wall_attrs),
            bp_nodes,
            bp_walls,
            attributes: self.properties.clone(),
        }
    }
}

fn raw_rows<I: EntityId>(rows: &[Vec<I>]) -> Vec<Vec<i64>> {
    rows.iter()
        .map(|row| row.iter().map(|id| id.raw()).collect())
        .collect()
}

fn export_attributes(table: &AttributeTable) -> BTreeMap<String, RawAttribute> {
    table
        .iter()
        .map(|(name, values)| (name.to_string(), RawAttribute::from(values.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_and_unpad() {
        let rows = vec![vec![1, 2, 3], vec![4]];
        let (counts, padded) = pad_rows(&rows);
        assert_eq!(counts, [3, 1]);
        assert_eq!(padded, vec![vec![1, 2, 3], vec![4, -1, -1]]);
        assert_eq!(unpad_rows("rows", &counts, &padded).unwrap(), rows);
    }

    #[test]
    fn unpad_rejects_long_counts() {
        let err = unpad_rows("cells_nodes", &[4], &[vec![1, 2]]).unwrap_err();
        assert_eq!(
            err,
            MeshError::LengthMismatch {
                what: "cells_nodes",
                expected: 4,
                found: 2
            }
        );
    }

    #[test]
    fn missing_coordinates() {
        assert_eq!(
            Tissue::from_data(TissueData::default()).unwrap_err(),
            MeshError::MissingCoordinates
        );
    }
}
