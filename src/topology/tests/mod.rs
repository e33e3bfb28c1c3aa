//! Shared fixtures for topology unit tests.

mod surgery_tests;

use crate::data::coordinates::NodeCoordinates;
use crate::topology::ids::{CellId, NodeId, WallId};
use crate::topology::tissue::Tissue;

pub(crate) fn n(id: i64) -> NodeId {
    NodeId::new(id)
}

pub(crate) fn c(id: i64) -> CellId {
    CellId::new(id)
}

pub(crate) fn w(id: i64) -> WallId {
    WallId::new(id)
}

/// Prepared unit square: nodes 0..4 CCW from the origin, one wall per side.
///
/// ```text
/// 3 --w2-- 2
/// |        |
/// w3  0    w1
/// |        |
/// 0 --w0-- 1
/// ```
pub(crate) fn unit_square() -> Tissue {
    let mut t = Tissue::new(
        (0..4).map(NodeId::new),
        NodeCoordinates::Xy(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
    )
    .unwrap();
    t.insert_cell(c(0), vec![n(0), n(1), n(2), n(3)], vec![w(0), w(1), w(2), w(3)])
        .unwrap();
    for k in 0..4 {
        t.insert_wall(w(k), [n(k), n((k + 1) % 4)], [c(0), CellId::EXTERIOR])
            .unwrap();
    }
    t.prepare_for_use().unwrap();
    t
}

/// Prepared pair of unit squares sharing wall 1.
///
/// ```text
/// 3 --- 4 --- 5
/// |  0  |  1  |
/// 0 --- 1 --- 2
/// ```
///
/// Wall 6 (`4 -> 5`) is oriented by the exterior.
pub(crate) fn two_squares() -> Tissue {
    let mut t = Tissue::new(
        (0..6).map(NodeId::new),
        NodeCoordinates::Xy(vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [2.0, 0.0],
            [0.0, 1.0],
            [1.0, 1.0],
            [2.0, 1.0],
        ]),
    )
    .unwrap();
    let ext = CellId::EXTERIOR;
    t.insert_cell(c(0), vec![n(0), n(1), n(4), n(3)], vec![w(0), w(1), w(2), w(3)])
        .unwrap();
    t.insert_cell(c(1), vec![n(1), n(2), n(5), n(4)], vec![w(4), w(5), w(6), w(1)])
        .unwrap();
    t.insert_wall(w(0), [n(0), n(1)], [c(0), ext]).unwrap();
    t.insert_wall(w(1), [n(1), n(4)], [c(0), c(1)]).unwrap();
    t.insert_wall(w(2), [n(4), n(3)], [c(0), ext]).unwrap();
    t.insert_wall(w(3), [n(3), n(0)], [c(0), ext]).unwrap();
    t.insert_wall(w(4), [n(1), n(2)], [c(1), ext]).unwrap();
    t.insert_wall(w(5), [n(2), n(5)], [c(1), ext]).unwrap();
    t.insert_wall(w(6), [n(4), n(5)], [ext, c(1)]).unwrap();
    t.prepare_for_use().unwrap();
    t
}
