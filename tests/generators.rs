use tissue_mesh::geometry::metrics::cell_areas;
use tissue_mesh::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn grid_counts_and_areas() {
    let options = GridOptions {
        spacing: [2.0, 0.5],
        origin: [-1.0, 3.0],
    };
    let tissue = grid_tissue(3, 4, options).unwrap();
    assert_eq!(tissue.num_nodes(), 20);
    assert_eq!(tissue.num_cells(), 12);
    for a in cell_areas(&tissue).unwrap() {
        assert!(close(a, 1.0));
    }
    assert!(close(tissue_area(&tissue).unwrap(), 12.0));
    assert_eq!(tissue.node_xy(NodeId::new(0)).unwrap(), [-1.0, 3.0]);
    // Junction-free boundary corners merge walls, so the boundary has one
    // node per grid node on the perimeter.
    assert_eq!(tissue.boundary_nodes().len(), 14);
    validate_tissue(&tissue, ValidationOptions::all()).unwrap();
}

#[test]
fn grid_inner_cells_have_four_neighbors() {
    let tissue = grid_tissue(3, 3, GridOptions::default()).unwrap();
    let center = CellId::new(4);
    let mut neighbors = tissue.cell_neighbors(center).unwrap().to_vec();
    neighbors.sort();
    assert_eq!(
        neighbors,
        [1, 3, 5, 7].map(CellId::new)
    );
}

#[test]
fn hexagon_bricks() {
    let tissue = hexagon_tissue(5, 3, HexagonOptions::default()).unwrap();
    assert_eq!(tissue.num_nodes(), 46);
    assert_eq!(tissue.num_cells(), 15);
    for cell in tissue.cell_ids() {
        assert_eq!(tissue.cell_nodes(*cell).unwrap().len(), 6);
        assert!(close(cell_area(&tissue, *cell).unwrap(), 2.0));
    }
    assert!(close(tissue_area(&tissue).unwrap(), 30.0));
    validate_tissue(&tissue, ValidationOptions::all()).unwrap();
}

#[test]
fn regular_hexagons_have_equal_walls() {
    let options = HexagonOptions {
        wall_length: 2.0,
        regular: true,
        two_thirds: false,
    };
    let tissue = hexagon_tissue(3, 3, options).unwrap();
    let side = 2.0;
    let expected = 1.5 * 3f64.sqrt() * side * side;
    for cell in tissue.cell_ids() {
        assert!(close(cell_area(&tissue, *cell).unwrap(), expected));
        assert!(close(cell_perimeter(&tissue, *cell).unwrap(), 6.0 * side));
    }
    validate_tissue(&tissue, ValidationOptions::all()).unwrap();
}

#[test]
fn two_thirds_shift_keeps_topology() {
    let plain = hexagon_tissue(4, 2, HexagonOptions::default()).unwrap();
    let shifted = hexagon_tissue(
        4,
        2,
        HexagonOptions {
            two_thirds: true,
            ..HexagonOptions::default()
        },
    )
    .unwrap();
    assert_eq!(plain.summary(), shifted.summary());
    for cell in plain.cell_ids() {
        assert_eq!(
            plain.cell_walls(*cell).unwrap(),
            shifted.cell_walls(*cell).unwrap()
        );
        assert!(cell_area(&shifted, *cell).unwrap() > 0.0);
    }
    validate_tissue(&shifted, ValidationOptions::all()).unwrap();
}

#[test]
fn polygons_with_shared_multi_edge_wall() {
    // Two quads sharing the chain 1 - 4 - 2: the middle node only touches
    // the two cells, so the chain is a single wall of two edges.
    let coords = NodeCoordinates::Xy(vec![
        [0.0, 0.0],
        [1.0, 0.0],
        [1.0, 2.0],
        [0.0, 2.0],
        [1.0, 1.0],
        [2.0, 0.0],
        [2.0, 2.0],
    ]);
    let cells = vec![vec![0, 1, 4, 2, 3], vec![1, 5, 6, 2, 4]];
    let tissue = tissue_from_polygons(coords, &cells).unwrap();
    let shared: Vec<WallId> = tissue
        .wall_ids()
        .iter()
        .copied()
        .filter(|&w| !tissue.wall_cells(w).unwrap().contains(&CellId::EXTERIOR))
        .collect();
    assert_eq!(shared.len(), 1);
    assert_eq!(
        tissue.wall_node_chain(shared[0]).unwrap(),
        [NodeId::new(1), NodeId::new(4), NodeId::new(2)]
    );
    assert_eq!(tissue.wall_edges(shared[0]).unwrap().len(), 2);
    assert_eq!(
        tissue.cell_neighbors(CellId::new(0)).unwrap(),
        [CellId::EXTERIOR, CellId::new(1)]
    );
    validate_tissue(&tissue, ValidationOptions::all()).unwrap();
}

#[test]
fn polygons_reject_shared_edge_direction() {
    let coords = NodeCoordinates::Xy(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
    let cells = vec![vec![0, 1, 2], vec![0, 1, 3]];
    assert!(matches!(
        tissue_from_polygons(coords, &cells),
        Err(MeshError::InvalidGeneratorInput(_))
    ));
}
