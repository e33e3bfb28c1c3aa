//! The tissue mesh store.
//!
//! A [`Tissue`] owns four append-only entity tables (nodes, cells, walls and
//! edges) plus the derived incidence caches and the boundary polygon. Each
//! table is a set of parallel columns indexed by a dense position; the
//! per-kind [`IdRegistry`] translates stable IDs into those positions.
//!
//! Construction happens in two phases:
//! 1. register nodes, cells and walls with their explicit IDs
//!    ([`Tissue::new`], [`Tissue::insert_cell`], [`Tissue::insert_wall`]);
//! 2. call [`Tissue::prepare_for_use`] to derive edges, node adjacency, cell
//!    adjacency and the boundary polygon.
//!
//! After that the surgery operations keep every table consistent on their own.

use crate::data::attributes::{AttributeTable, AttributeValue, AttributeValues};
use crate::data::coordinates::NodeCoordinates;
use crate::mesh_error::MeshError;
use crate::topology::ids::{CellId, EdgeId, EntityId, EntityKind, NodeId, WallId};
use crate::topology::registry::IdRegistry;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

/// In-memory planar cell mesh.
///
/// # Invariants
/// - Every non-exterior cell of a wall lists the wall in its wall list.
/// - Cell node lists are CCW cycles; consecutive nodes are joined by an edge
///   of one of the cell's walls, and the wall list follows the node cycle.
/// - The edges of a wall chain from wall node 0 to wall node 1.
/// - Every attribute column has one value per entity of its kind.
///
/// See [`validate_tissue`](crate::topology::validation::validate_tissue).
#[derive(Clone, Debug, Default)]
pub struct Tissue {
    pub(crate) nodes: IdRegistry<NodeId>,
    pub(crate) coords: NodeCoordinates,
    pub(crate) nodes_nodes: Vec<Vec<NodeId>>,
    pub(crate) nodes_edges: Vec<Vec<EdgeId>>,
    pub(crate) node_attrs: AttributeTable,

    pub(crate) cells: IdRegistry<CellId>,
    pub(crate) cells_nodes: Vec<Vec<NodeId>>,
    pub(crate) cells_walls: Vec<Vec<WallId>>,
    pub(crate) cells_cells: Vec<Vec<CellId>>,
    pub(crate) cell_attrs: AttributeTable,

    pub(crate) walls: IdRegistry<WallId>,
    pub(crate) walls_nodes: Vec<[NodeId; 2]>,
    pub(crate) walls_cells: Vec<[CellId; 2]>,
    pub(crate) walls_edges: Vec<Vec<EdgeId>>,
    pub(crate) wall_attrs: AttributeTable,

    pub(crate) edges: IdRegistry<EdgeId>,
    pub(crate) edges_nodes: Vec<[NodeId; 2]>,
    pub(crate) edges_cells: Vec<[CellId; 2]>,
    pub(crate) edges_walls: Vec<WallId>,
    pub(crate) edge_attrs: AttributeTable,

    pub(crate) boundary_nodes: Vec<NodeId>,
    pub(crate) boundary_walls: Vec<WallId>,

    pub(crate) properties: BTreeMap<String, String>,
}

/// Entity counts of a tissue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TissueSummary {
    pub nodes: usize,
    pub cells: usize,
    pub walls: usize,
    pub edges: usize,
    pub boundary_nodes: usize,
    pub dimension: usize,
}

impl fmt::Display for TissueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}D tissue: {} nodes, {} cells, {} walls, {} edges, boundary of {} nodes",
            self.dimension, self.nodes, self.cells, self.walls, self.edges, self.boundary_nodes
        )
    }
}

impl Tissue {
    /// Creates a tissue holding only nodes.
    ///
    /// # Errors
    /// `LengthMismatch` if `coords` does not have one position per ID, plus
    /// the registry errors for negative or repeated IDs.
    pub fn new<It>(node_ids: It, coords: NodeCoordinates) -> Result<Self, MeshError>
    where
        It: IntoIterator<Item = NodeId>,
    {
        let nodes = IdRegistry::from_ids(node_ids)?;
        if nodes.len() != coords.len() {
            return Err(MeshError::LengthMismatch {
                what: "node coordinates",
                expected: nodes.len(),
                found: coords.len(),
            });
        }
        let n = nodes.len();
        Ok(Tissue {
            nodes,
            coords,
            nodes_nodes: vec![Vec::new(); n],
            nodes_edges: vec![Vec::new(); n],
            ..Tissue::default()
        })
    }

    /// Registers a cell with an explicit ID.
    ///
    /// `nodes` must be the CCW node cycle and `walls` the bounding walls, in
    /// any order; [`prepare_for_use`](Self::prepare_for_use) puts them in node
    /// traversal order. Wall IDs are resolved later, by
    /// [`prepare_for_use`](Self::prepare_for_use), so walls may be inserted
    /// after the cells that reference them.
    pub fn insert_cell(
        &mut self,
        id: CellId,
        nodes: Vec<NodeId>,
        walls: Vec<WallId>,
    ) -> Result<(), MeshError> {
        self.check_nodes(&nodes)?;
        self.cells.push(id)?;
        self.push_cell_rows(nodes, walls);
        Ok(())
    }

    /// Registers a wall with an explicit ID.
    ///
    /// Both nodes and every non-exterior cell must already be registered.
    pub fn insert_wall(
        &mut self,
        id: WallId,
        nodes: [NodeId; 2],
        cells: [CellId; 2],
    ) -> Result<(), MeshError> {
        self.check_nodes(&nodes)?;
        self.check_cells(&cells)?;
        self.walls.push(id)?;
        self.push_wall_rows(nodes, cells, Vec::new());
        Ok(())
    }

    /// Creates a node at `position` with a fresh ID.
    ///
    /// The z component is dropped for planar tissues.
    pub fn create_node(&mut self, position: [f64; 3]) -> NodeId {
        match &mut self.coords {
            NodeCoordinates::Xy(v) => v.push([position[0], position[1]]),
            NodeCoordinates::Xyz(v) => v.push(position),
        }
        self.push_node_rows()
    }

    /// Creates a cell with a fresh ID.
    ///
    /// Derived caches (`cells_cells`, boundary) are not refreshed; callers
    /// building by hand finish with [`prepare_for_use`](Self::prepare_for_use).
    pub fn create_cell(
        &mut self,
        nodes: Vec<NodeId>,
        walls: Vec<WallId>,
    ) -> Result<CellId, MeshError> {
        self.check_nodes(&nodes)?;
        Ok(self.push_cell(nodes, walls).0)
    }

    /// Creates a wall with a fresh ID and no edges.
    pub fn create_wall(
        &mut self,
        nodes: [NodeId; 2],
        cells: [CellId; 2],
    ) -> Result<WallId, MeshError> {
        self.check_nodes(&nodes)?;
        self.check_cells(&cells)?;
        Ok(self.push_wall(nodes, cells, Vec::new()).0)
    }

    /// Creates an edge of `wall` and appends it to the wall's edge list.
    pub fn create_edge(
        &mut self,
        nodes: [NodeId; 2],
        cells: [CellId; 2],
        wall: WallId,
    ) -> Result<EdgeId, MeshError> {
        self.check_nodes(&nodes)?;
        self.check_cells(&cells)?;
        let wi = self.walls.index_of(wall)?;
        let e = self.push_edge(nodes, cells, wall);
        self.walls_edges[wi].push(e);
        Ok(e)
    }

    /// Derives every cached structure from nodes, cells and walls: edges,
    /// node adjacency, cell adjacency and the boundary polygon. Cell wall
    /// lists are put in node traversal order on the way
    /// (see [`normalize_cell_walls`](Self::normalize_cell_walls)).
    pub fn prepare_for_use(&mut self) -> Result<(), MeshError> {
        self.derive_edges_from_walls()?;
        self.derive_node_adjacency()?;
        self.normalize_cell_walls()?;
        self.derive_cell_adjacency()?;
        self.compute_boundary_polygon()?;
        log::info!("prepared {}", self.summary());
        Ok(())
    }

    // ---- internal creators ------------------------------------------------
    //
    // These skip argument validation; surgery calls them with IDs it has
    // already resolved. Every creator extends all attribute columns.

    pub(crate) fn push_node_rows(&mut self) -> NodeId {
        let (id, _) = self.nodes.allocate();
        self.nodes_nodes.push(Vec::new());
        self.nodes_edges.push(Vec::new());
        self.node_attrs.extend_defaults(1);
        id
    }

    /// New node on the segment between node indices `a` and `b`.
    pub(crate) fn push_node_lerp(&mut self, a: usize, b: usize, s: f64) -> (NodeId, usize) {
        let index = self.coords.push_lerp(a, b, s);
        let id = self.push_node_rows();
        debug_assert_eq!(self.nodes.len(), index + 1);
        (id, index)
    }

    fn push_cell_rows(&mut self, nodes: Vec<NodeId>, walls: Vec<WallId>) {
        self.cells_nodes.push(nodes);
        self.cells_walls.push(walls);
        self.cells_cells.push(Vec::new());
        self.cell_attrs.extend_defaults(1);
    }

    pub(crate) fn push_cell(&mut self, nodes: Vec<NodeId>, walls: Vec<WallId>) -> (CellId, usize) {
        let (id, index) = self.cells.allocate();
        self.push_cell_rows(nodes, walls);
        (id, index)
    }

    fn push_wall_rows(&mut self, nodes: [NodeId; 2], cells: [CellId; 2], edges: Vec<EdgeId>) {
        self.walls_nodes.push(nodes);
        self.walls_cells.push(cells);
        self.walls_edges.push(edges);
        self.wall_attrs.extend_defaults(1);
    }

    pub(crate) fn push_wall(
        &mut self,
        nodes: [NodeId; 2],
        cells: [CellId; 2],
        edges: Vec<EdgeId>,
    ) -> (WallId, usize) {
        let (id, index) = self.walls.allocate();
        self.push_wall_rows(nodes, cells, edges);
        (id, index)
    }

    /// Appends an edge without touching `walls_edges` or node adjacency.
    pub(crate) fn push_edge(
        &mut self,
        nodes: [NodeId; 2],
        cells: [CellId; 2],
        wall: WallId,
    ) -> EdgeId {
        let (id, index) = self.edges.allocate();
        debug_assert_eq!(id.index(), index);
        self.edges_nodes.push(nodes);
        self.edges_cells.push(cells);
        self.edges_walls.push(wall);
        self.edge_attrs.extend_defaults(1);
        id
    }

    fn check_nodes(&self, nodes: &[NodeId]) -> Result<(), MeshError> {
        nodes
            .iter()
            .try_for_each(|&n| self.nodes.index_of(n).map(|_| ()))
    }

    fn check_cells(&self, cells: &[CellId]) -> Result<(), MeshError> {
        cells
            .iter()
            .filter(|c| !c.is_exterior())
            .try_for_each(|&c| self.cells.index_of(c).map(|_| ()))
    }

    // ---- counts and lookups -----------------------------------------------

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }
    #[inline]
    pub fn num_walls(&self) -> usize {
        self.walls.len()
    }
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of entities of `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Node => self.num_nodes(),
            EntityKind::Cell => self.num_cells(),
            EntityKind::Wall => self.num_walls(),
            EntityKind::Edge => self.num_edges(),
        }
    }

    /// Node IDs in index order.
    pub fn node_ids(&self) -> &[NodeId] {
        self.nodes.ids()
    }
    /// Cell IDs in index order.
    pub fn cell_ids(&self) -> &[CellId] {
        self.cells.ids()
    }
    /// Wall IDs in index order.
    pub fn wall_ids(&self) -> &[WallId] {
        self.walls.ids()
    }
    /// Edge IDs, equal to their indices.
    pub fn edge_ids(&self) -> &[EdgeId] {
        self.edges.ids()
    }

    #[inline]
    pub fn node_index(&self, id: NodeId) -> Result<usize, MeshError> {
        self.nodes.index_of(id)
    }
    #[inline]
    pub fn cell_index(&self, id: CellId) -> Result<usize, MeshError> {
        self.cells.index_of(id)
    }
    #[inline]
    pub fn wall_index(&self, id: WallId) -> Result<usize, MeshError> {
        self.walls.index_of(id)
    }
    #[inline]
    pub fn edge_index(&self, id: EdgeId) -> Result<usize, MeshError> {
        self.edges.index_of(id)
    }

    /// Index of any entity ID, dispatching on its kind.
    pub fn index_of<I: EntityId>(&self, id: I) -> Result<usize, MeshError> {
        match I::KIND {
            EntityKind::Node => self.nodes.index_of(NodeId::new(id.raw())),
            EntityKind::Cell => self.cells.index_of(CellId::new(id.raw())),
            EntityKind::Wall => self.walls.index_of(WallId::new(id.raw())),
            EntityKind::Edge => self.edges.index_of(EdgeId::new(id.raw())),
        }
    }

    // ---- accessors --------------------------------------------------------

    /// Node coordinate storage.
    pub fn coordinates(&self) -> &NodeCoordinates {
        &self.coords
    }

    /// XY position of a node.
    pub fn node_xy(&self, id: NodeId) -> Result<[f64; 2], MeshError> {
        let i = self.nodes.index_of(id)?;
        self.coords.xy(i).ok_or(MeshError::MissingCoordinates)
    }

    /// XY position of the node at `index`.
    #[inline]
    pub(crate) fn xy_at(&self, index: usize) -> Result<[f64; 2], MeshError> {
        self.coords.xy(index).ok_or(MeshError::MissingCoordinates)
    }

    /// Full position of a node (`z = 0` for planar tissues).
    pub fn node_position(&self, id: NodeId) -> Result<[f64; 3], MeshError> {
        let i = self.nodes.index_of(id)?;
        self.coords.position(i).ok_or(MeshError::MissingCoordinates)
    }

    pub fn node_neighbors(&self, id: NodeId) -> Result<&[NodeId], MeshError> {
        Ok(&self.nodes_nodes[self.nodes.index_of(id)?])
    }

    pub fn node_edges(&self, id: NodeId) -> Result<&[EdgeId], MeshError> {
        Ok(&self.nodes_edges[self.nodes.index_of(id)?])
    }

    /// CCW node cycle of a cell.
    pub fn cell_nodes(&self, id: CellId) -> Result<&[NodeId], MeshError> {
        Ok(&self.cells_nodes[self.cells.index_of(id)?])
    }

    pub fn cell_walls(&self, id: CellId) -> Result<&[WallId], MeshError> {
        Ok(&self.cells_walls[self.cells.index_of(id)?])
    }

    /// Neighbouring cells, one per wall and in wall order.
    pub fn cell_neighbors(&self, id: CellId) -> Result<&[CellId], MeshError> {
        Ok(&self.cells_cells[self.cells.index_of(id)?])
    }

    pub fn wall_nodes(&self, id: WallId) -> Result<[NodeId; 2], MeshError> {
        Ok(self.walls_nodes[self.walls.index_of(id)?])
    }

    pub fn wall_cells(&self, id: WallId) -> Result<[CellId; 2], MeshError> {
        Ok(self.walls_cells[self.walls.index_of(id)?])
    }

    pub fn wall_edges(&self, id: WallId) -> Result<&[EdgeId], MeshError> {
        Ok(&self.walls_edges[self.walls.index_of(id)?])
    }

    /// Full node chain of a wall, from wall node 0 to wall node 1.
    pub fn wall_node_chain(&self, id: WallId) -> Result<Vec<NodeId>, MeshError> {
        self.wall_chain_at(self.walls.index_of(id)?)
    }

    pub(crate) fn wall_chain_at(&self, wi: usize) -> Result<Vec<NodeId>, MeshError> {
        let edges = &self.walls_edges[wi];
        if edges.is_empty() {
            return Ok(self.walls_nodes[wi].to_vec());
        }
        let mut chain = Vec::with_capacity(edges.len() + 1);
        chain.push(self.edges_nodes[edges[0].index()][0]);
        for e in edges {
            let [a, b] = self.edges_nodes[e.index()];
            if chain.last() != Some(&a) {
                return Err(MeshError::BrokenWallChain {
                    wall: self.walls.ids()[wi],
                });
            }
            chain.push(b);
        }
        Ok(chain)
    }

    pub fn edge_nodes(&self, id: EdgeId) -> Result<[NodeId; 2], MeshError> {
        Ok(self.edges_nodes[self.edges.index_of(id)?])
    }

    pub fn edge_cells(&self, id: EdgeId) -> Result<[CellId; 2], MeshError> {
        Ok(self.edges_cells[self.edges.index_of(id)?])
    }

    pub fn edge_wall(&self, id: EdgeId) -> Result<WallId, MeshError> {
        Ok(self.edges_walls[self.edges.index_of(id)?])
    }

    /// Boundary polygon nodes, clockwise.
    pub fn boundary_nodes(&self) -> &[NodeId] {
        &self.boundary_nodes
    }

    /// Boundary polygon walls, in traversal order.
    pub fn boundary_walls(&self) -> &[WallId] {
        &self.boundary_walls
    }

    // ---- attributes -------------------------------------------------------

    /// The attribute table of one entity kind.
    pub fn attributes(&self, kind: EntityKind) -> &AttributeTable {
        match kind {
            EntityKind::Node => &self.node_attrs,
            EntityKind::Cell => &self.cell_attrs,
            EntityKind::Wall => &self.wall_attrs,
            EntityKind::Edge => &self.edge_attrs,
        }
    }

    fn attributes_mut(&mut self, kind: EntityKind) -> &mut AttributeTable {
        match kind {
            EntityKind::Node => &mut self.node_attrs,
            EntityKind::Cell => &mut self.cell_attrs,
            EntityKind::Wall => &mut self.wall_attrs,
            EntityKind::Edge => &mut self.edge_attrs,
        }
    }

    pub fn attribute_names(&self, kind: EntityKind) -> impl Iterator<Item = &str> + '_ {
        self.attributes(kind).names()
    }

    pub fn attribute(&self, kind: EntityKind, name: &str) -> Option<&AttributeValues> {
        self.attributes(kind).get(name)
    }

    /// Value of attribute `name` for one entity.
    pub fn attribute_value<I: EntityId>(&self, name: &str, id: I) -> Result<AttributeValue, MeshError> {
        let index = self.index_of(id)?;
        let column = self
            .attributes(I::KIND)
            .get(name)
            .ok_or_else(|| MeshError::UnknownAttribute {
                kind: I::KIND,
                name: name.to_string(),
            })?;
        column
            .get(index)
            .ok_or_else(|| MeshError::AttributeArrayLengthMismatch {
                kind: I::KIND,
                name: name.to_string(),
                expected: self.count(I::KIND),
                found: column.len(),
            })
    }

    pub fn set_attribute_value<I: EntityId>(
        &mut self,
        name: &str,
        id: I,
        value: AttributeValue,
    ) -> Result<(), MeshError> {
        let index = self.index_of(id)?;
        self.attributes_mut(I::KIND).set(I::KIND, name, index, value)
    }

    /// Adds or replaces a whole column. Its length must equal the entity count.
    pub fn insert_attribute(
        &mut self,
        kind: EntityKind,
        name: &str,
        values: AttributeValues,
    ) -> Result<Option<AttributeValues>, MeshError> {
        let expected = self.count(kind);
        self.attributes_mut(kind).insert(kind, name, values, expected)
    }

    pub fn remove_attribute(&mut self, kind: EntityKind, name: &str) -> Option<AttributeValues> {
        self.attributes_mut(kind).remove(name)
    }

    /// Free-form tissue-level properties, persisted alongside the tables.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn set_property(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        self.properties.insert(name.to_string(), value.into())
    }

    // ---- reporting --------------------------------------------------------

    pub fn summary(&self) -> TissueSummary {
        TissueSummary {
            nodes: self.num_nodes(),
            cells: self.num_cells(),
            walls: self.num_walls(),
            edges: self.num_edges(),
            boundary_nodes: self.boundary_nodes.len(),
            dimension: self.coords.dimension(),
        }
    }

    /// Tabular dump of every entity and its incidence lists.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_description(&mut out);
        out
    }

    fn write_description(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "===[ NODES ({}) ]===", self.num_nodes())?;
        writeln!(out, "{:>5}{:>6}{:>16}{:>16}  n-n  n-e", "idx", "ID", "X", "Y")?;
        for (i, id) in self.nodes.ids().iter().enumerate() {
            let [x, y] = self.coords.xy(i).unwrap_or([f64::NAN; 2]);
            writeln!(
                out,
                "{:>5}{:>6}{:>16.6}{:>16.6}  {:?}  {:?}",
                i,
                id,
                x,
                y,
                raw_list(&self.nodes_nodes[i]),
                raw_list(&self.nodes_edges[i])
            )?;
        }
        writeln!(out, "===[ CELLS ({}) ]===", self.num_cells())?;
        writeln!(out, "{:>5}{:>6}  #nodes  c-n  #walls  c-w  c-c", "idx", "ID")?;
        for (i, id) in self.cells.ids().iter().enumerate() {
            writeln!(
                out,
                "{:>5}{:>6}  {}  {:?}  {}  {:?}  {:?}",
                i,
                id,
                self.cells_nodes[i].len(),
                raw_list(&self.cells_nodes[i]),
                self.cells_walls[i].len(),
                raw_list(&self.cells_walls[i]),
                raw_list(&self.cells_cells[i])
            )?;
        }
        writeln!(out, "===[ WALLS ({}) ]===", self.num_walls())?;
        writeln!(out, "{:>5}{:>6}  w-n  w-c  w-e", "idx", "ID")?;
        for (i, id) in self.walls.ids().iter().enumerate() {
            writeln!(
                out,
                "{:>5}{:>6}  {:?}  {:?}  {:?}",
                i,
                id,
                raw_list(&self.walls_nodes[i]),
                raw_list(&self.walls_cells[i]),
                raw_list(&self.walls_edges[i])
            )?;
        }
        writeln!(out, "===[ EDGES ({}) ]===", self.num_edges())?;
        writeln!(out, "{:>5}  e-n  e-w  e-c", "idx")?;
        for i in 0..self.num_edges() {
            writeln!(
                out,
                "{:>5}  {:?}  {}  {:?}",
                i,
                raw_list(&self.edges_nodes[i]),
                self.edges_walls[i],
                raw_list(&self.edges_cells[i])
            )?;
        }
        Ok(())
    }
}

fn raw_list<I: EntityId>(ids: &[I]) -> Vec<i64> {
    ids.iter().map(|id| id.raw()).collect()
}
