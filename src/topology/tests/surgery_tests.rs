use super::{c, n, two_squares, unit_square, w};
use crate::data::attributes::{AttributeValue, AttributeValues};
use crate::geometry::metrics::{cell_area, tissue_area};
use crate::mesh_error::MeshError;
use crate::mesh_generation::{GridOptions, grid_tissue};
use crate::data::coordinates::NodeCoordinates;
use crate::topology::ids::{CellId, EdgeId, EntityKind, NodeId};
use crate::topology::tissue::Tissue;
use crate::topology::surgery::{DivisionOptions, DivisionResult, SplitEdgeResult};
use crate::topology::validation::{ValidationOptions, validate_tissue};

fn e(id: i64) -> EdgeId {
    EdgeId::new(id)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn divide_unit_square_vertically() {
    let mut t = unit_square();
    let result = t.divide_cell(c(0), [0.5, 0.5], [0.0, 1.0]).unwrap();
    assert_eq!(
        result,
        DivisionResult {
            mother: c(0),
            daughter: c(1),
            nodes: [n(4), n(5)],
            split_edges: [e(0), e(2)],
            new_edges: [e(4), e(5)],
            division_edge: e(6),
            split_walls: [w(0), w(2)],
            new_walls: [w(4), w(5)],
            division_wall: w(6),
        }
    );
    assert_eq!((t.num_nodes(), t.num_cells(), t.num_walls(), t.num_edges()), (6, 2, 7, 7));
    assert_eq!(t.node_xy(n(4)).unwrap(), [0.5, 0.0]);
    assert_eq!(t.node_xy(n(5)).unwrap(), [0.5, 1.0]);

    assert_eq!(t.cell_nodes(c(0)).unwrap(), [n(0), n(4), n(5), n(3)]);
    assert_eq!(t.cell_walls(c(0)).unwrap(), [w(0), w(6), w(5), w(3)]);
    assert_eq!(t.cell_nodes(c(1)).unwrap(), [n(4), n(1), n(2), n(5)]);
    assert_eq!(t.cell_walls(c(1)).unwrap(), [w(4), w(1), w(2), w(6)]);
    let ext = CellId::EXTERIOR;
    assert_eq!(t.cell_neighbors(c(0)).unwrap(), [ext, c(1), ext, ext]);
    assert_eq!(t.cell_neighbors(c(1)).unwrap(), [ext, ext, ext, c(0)]);

    assert_eq!(t.wall_nodes(w(0)).unwrap(), [n(0), n(4)]);
    assert_eq!(t.wall_nodes(w(4)).unwrap(), [n(4), n(1)]);
    assert_eq!(t.wall_cells(w(4)).unwrap(), [c(1), ext]);
    assert_eq!(t.wall_cells(w(1)).unwrap(), [c(1), ext]);
    assert_eq!(t.wall_cells(w(5)).unwrap(), [c(0), ext]);
    assert_eq!(t.wall_cells(w(6)).unwrap(), [c(0), c(1)]);
    assert_eq!(t.edge_nodes(e(0)).unwrap(), [n(0), n(4)]);
    assert_eq!(t.edge_cells(e(4)).unwrap(), [c(1), ext]);

    assert_eq!(t.node_neighbors(n(4)).unwrap(), [n(1), n(0), n(5)]);
    assert_eq!(t.node_edges(n(4)).unwrap(), [e(4), e(0), e(6)]);
    assert!(t.node_neighbors(n(0)).unwrap().contains(&n(4)));
    assert!(!t.node_neighbors(n(0)).unwrap().contains(&n(1)));

    assert_eq!(t.boundary_nodes(), [n(0), n(3), n(5), n(2), n(1), n(4)]);
    assert_eq!(t.boundary_walls(), [w(3), w(5), w(2), w(1), w(4), w(0)]);

    assert!(close(cell_area(&t, c(0)).unwrap(), 0.5));
    assert!(close(cell_area(&t, c(1)).unwrap(), 0.5));
    assert!(close(tissue_area(&t).unwrap(), 1.0));
    validate_tissue(&t, ValidationOptions::all()).unwrap();
}

#[test]
fn division_inserts_node_into_neighbor() {
    let mut t = two_squares();
    let result = t.divide_cell(c(0), [0.5, 0.5], [1.0, 0.0]).unwrap();
    let [q0, q1] = result.nodes;
    assert_eq!((q0, q1), (n(6), n(7)));
    assert_eq!(result.daughter, c(2));
    assert_eq!(result.split_walls, [w(1), w(3)]);

    // Nodes below the line stay with the mother.
    assert_eq!(t.cell_nodes(c(0)).unwrap(), [n(0), n(1), q0, q1]);
    assert_eq!(t.cell_walls(c(0)).unwrap(), [w(0), w(1), w(9), w(8)]);
    assert_eq!(t.cell_nodes(c(2)).unwrap(), [q0, n(4), n(3), q1]);
    assert_eq!(t.cell_walls(c(2)).unwrap(), [w(7), w(2), w(3), w(9)]);

    // The right square now has five nodes and touches both halves.
    assert_eq!(t.cell_nodes(c(1)).unwrap(), [n(1), n(2), n(5), n(4), q0]);
    assert_eq!(t.cell_walls(c(1)).unwrap(), [w(4), w(5), w(6), w(7), w(1)]);
    let ext = CellId::EXTERIOR;
    assert_eq!(t.cell_neighbors(c(1)).unwrap(), [ext, ext, ext, c(2), c(0)]);
    assert_eq!(t.wall_cells(w(7)).unwrap(), [c(2), c(1)]);

    assert_eq!(
        t.boundary_nodes(),
        [n(0), q1, n(3), n(4), n(5), n(2), n(1)]
    );
    assert_eq!(
        t.boundary_walls(),
        [w(8), w(3), w(2), w(6), w(5), w(4), w(0)]
    );
    validate_tissue(&t, ValidationOptions::all()).unwrap();
}

#[test]
fn missing_line_leaves_tissue_untouched() {
    let mut t = unit_square();
    let before = t.clone();
    assert_eq!(
        t.divide_cell(c(0), [2.0, 0.0], [0.0, 1.0]).unwrap_err(),
        MeshError::DivisionAmbiguous { count: 0 }
    );
    assert_eq!(t.summary(), before.summary());
    assert_eq!(t.cells_nodes, before.cells_nodes);
    assert_eq!(t.walls_edges, before.walls_edges);
}

#[test]
fn diagonal_through_corners_is_ambiguous() {
    let mut t = unit_square();
    assert_eq!(
        t.divide_cell(c(0), [0.0, 0.0], [1.0, 1.0]).unwrap_err(),
        MeshError::DivisionAmbiguous { count: 0 }
    );
}

#[test]
fn unknown_cell() {
    let mut t = unit_square();
    assert!(matches!(
        t.divide_cell(c(9), [0.5, 0.5], [0.0, 1.0]),
        Err(MeshError::UnknownId { .. })
    ));
}

#[test]
fn both_crossings_on_one_wall_is_degenerate() {
    // The exterior wall of each grid cell runs around two corners.
    let mut t = grid_tissue(1, 2, GridOptions::default()).unwrap();
    let wall = t.cell_walls(c(0)).unwrap()[0];
    assert_eq!(
        t.divide_cell(c(0), [0.5, 0.5], [0.0, 1.0]).unwrap_err(),
        MeshError::DivisionDegenerate { wall }
    );
    assert_eq!(t.num_cells(), 2);
}

#[test]
fn snap_tolerance_is_configurable() {
    let mut t = unit_square();
    assert_eq!(
        t.divide_cell(c(0), [0.0005, 0.5], [0.0, 1.0]).unwrap_err(),
        MeshError::DivisionAmbiguous { count: 0 }
    );
    let options = DivisionOptions {
        node_snap_tolerance: 1e-6,
    };
    let result = t
        .divide_cell_with(c(0), [0.0005, 0.5], [0.0, 1.0], options)
        .unwrap();
    assert!(close(cell_area(&t, result.mother).unwrap(), 0.0005));
}

#[test]
fn division_extends_attribute_columns() {
    let mut t = unit_square();
    t.insert_attribute(EntityKind::Node, "z", AttributeValues::Float(vec![1.0; 4]))
        .unwrap();
    t.insert_attribute(EntityKind::Cell, "type", AttributeValues::Int(vec![7]))
        .unwrap();
    t.insert_attribute(
        EntityKind::Wall,
        "tag",
        AttributeValues::Text(vec!["a".into(); 4]),
    )
    .unwrap();
    t.insert_attribute(EntityKind::Edge, "k", AttributeValues::Float(vec![2.0; 4]))
        .unwrap();

    let result = t.divide_cell(c(0), [0.5, 0.5], [0.0, 1.0]).unwrap();
    assert_eq!(t.attribute(EntityKind::Node, "z").unwrap().len(), 6);
    assert_eq!(t.attribute(EntityKind::Cell, "type").unwrap().len(), 2);
    assert_eq!(t.attribute(EntityKind::Wall, "tag").unwrap().len(), 7);
    assert_eq!(t.attribute(EntityKind::Edge, "k").unwrap().len(), 7);
    assert_eq!(
        t.attribute_value("type", result.mother).unwrap(),
        AttributeValue::Int(7)
    );
    assert_eq!(
        t.attribute_value("type", result.daughter).unwrap(),
        AttributeValue::Int(0)
    );
    assert_eq!(
        t.attribute_value("tag", result.division_wall).unwrap(),
        AttributeValue::Text(String::new())
    );
    assert_eq!(
        t.attribute_value("z", result.nodes[0]).unwrap(),
        AttributeValue::Float(0.0)
    );
}

#[test]
fn split_exterior_edge() {
    let mut t = unit_square();
    let result = t.split_edge(e(0)).unwrap();
    assert_eq!(
        result,
        SplitEdgeResult {
            edge: e(0),
            new_edge: e(4),
            node: n(4),
        }
    );
    assert_eq!((t.num_nodes(), t.num_walls(), t.num_edges()), (5, 4, 5));
    assert_eq!(t.node_xy(n(4)).unwrap(), [0.5, 0.0]);
    assert_eq!(t.edge_nodes(e(0)).unwrap(), [n(0), n(4)]);
    assert_eq!(t.edge_nodes(e(4)).unwrap(), [n(4), n(1)]);
    assert_eq!(t.edge_wall(e(4)).unwrap(), w(0));
    assert_eq!(t.wall_edges(w(0)).unwrap(), [e(0), e(4)]);
    assert_eq!(t.wall_node_chain(w(0)).unwrap(), [n(0), n(4), n(1)]);
    assert_eq!(t.cell_nodes(c(0)).unwrap(), [n(0), n(4), n(1), n(2), n(3)]);
    assert_eq!(t.cell_walls(c(0)).unwrap(), [w(0), w(1), w(2), w(3)]);
    assert_eq!(t.node_neighbors(n(4)).unwrap(), [n(0), n(1)]);
    assert!(t.node_neighbors(n(1)).unwrap().contains(&n(4)));
    assert!(t.node_neighbors(n(0)).unwrap().contains(&n(4)));
    assert_eq!(t.boundary_nodes(), [n(0), n(3), n(2), n(1), n(4)]);
    assert!(close(cell_area(&t, c(0)).unwrap(), 1.0));
    validate_tissue(&t, ValidationOptions::all()).unwrap();
}

#[test]
fn split_shared_edge_updates_both_cells() {
    let mut t = two_squares();
    let result = t.split_edge(e(1)).unwrap();
    let q = result.node;
    assert_eq!(t.cell_nodes(c(0)).unwrap(), [n(0), n(1), q, n(4), n(3)]);
    // Node 0 of the right square is the anchor, so q is appended.
    assert_eq!(t.cell_nodes(c(1)).unwrap(), [n(1), n(2), n(5), n(4), q]);
    assert_eq!(t.edge_cells(result.new_edge).unwrap(), [c(0), c(1)]);
    assert_eq!(t.boundary_nodes(), [n(0), n(3), n(4), n(5), n(2), n(1)]);
    validate_tissue(&t, ValidationOptions::all()).unwrap();
}

#[test]
fn split_interior_edge_keeps_boundary() {
    let mut t = grid_tissue(2, 2, GridOptions::default()).unwrap();
    let boundary = t.boundary_nodes().to_vec();
    let interior = t
        .node_edges(n(1))
        .unwrap()
        .iter()
        .copied()
        .find(|&edge| !t.edge_cells(edge).unwrap().contains(&CellId::EXTERIOR))
        .unwrap();
    let result = t.split_edge(interior).unwrap();
    assert_eq!(t.boundary_nodes(), boundary.as_slice());
    assert!(!t.boundary_nodes().contains(&result.node));
    validate_tissue(&t, ValidationOptions::all()).unwrap();
}

/// Unit square whose wall list was stored in creation order rather than
/// traversal order.
fn scrambled_unit_square() -> Tissue {
    let mut t = Tissue::new(
        (0..4).map(NodeId::new),
        NodeCoordinates::Xy(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
    )
    .unwrap();
    t.insert_cell(c(0), vec![n(0), n(1), n(2), n(3)], vec![w(2), w(0), w(3), w(1)])
        .unwrap();
    for k in 0..4 {
        t.insert_wall(w(k), [n(k), n((k + 1) % 4)], [c(0), CellId::EXTERIOR])
            .unwrap();
    }
    t
}

#[test]
fn prepare_normalizes_stored_wall_order() {
    let mut t = scrambled_unit_square();
    t.prepare_for_use().unwrap();
    assert_eq!(t.cell_walls(c(0)).unwrap(), [w(0), w(1), w(2), w(3)]);
    validate_tissue(&t, ValidationOptions::all()).unwrap();

    let split = t.split_edge(e(0)).unwrap();
    assert_eq!(split.node, n(4));
    assert_eq!(t.cell_walls(c(0)).unwrap(), [w(0), w(1), w(2), w(3)]);

    let division = t.divide_cell(c(0), [0.5, 0.5], [1.0, 0.0]).unwrap();
    assert!(close(cell_area(&t, c(0)).unwrap(), 0.5));
    assert!(close(cell_area(&t, division.daughter).unwrap(), 0.5));
    validate_tissue(&t, ValidationOptions::all()).unwrap();
}

#[test]
fn prepare_rejects_wall_list_missing_a_wall() {
    let mut t = scrambled_unit_square();
    t.cells_walls[0].pop();
    assert_eq!(
        t.prepare_for_use(),
        Err(MeshError::WallNotInCell {
            wall: w(1),
            cell: c(0),
        })
    );
}

#[test]
fn split_unknown_edge() {
    let mut t = unit_square();
    assert!(matches!(
        t.split_edge(e(42)),
        Err(MeshError::UnknownId { .. })
    ));
    assert_eq!(t.num_nodes(), 4);
}

#[test]
fn divide_across_multi_edge_wall() {
    let mut t = unit_square();
    t.split_edge(e(0)).unwrap();
    let result = t.divide_cell(c(0), [0.25, 0.5], [0.0, 1.0]).unwrap();
    assert_eq!(result.nodes, [n(5), n(6)]);
    assert_eq!(result.new_walls[0], w(4));
    assert_eq!(t.wall_node_chain(w(0)).unwrap(), [n(0), n(5)]);
    assert_eq!(t.wall_node_chain(w(4)).unwrap(), [n(5), n(4), n(1)]);
    assert_eq!(t.edge_wall(e(4)).unwrap(), w(4));
    assert_eq!(t.wall_cells(w(4)).unwrap(), [result.daughter, CellId::EXTERIOR]);
    assert!(close(cell_area(&t, result.mother).unwrap(), 0.25));
    assert!(close(cell_area(&t, result.daughter).unwrap(), 0.75));
    validate_tissue(&t, ValidationOptions::all()).unwrap();
}
