//! Identifier registry: stable external IDs ↔ compact array positions.
//!
//! Every entity kind of a [`Tissue`](super::tissue::Tissue) owns one
//! [`IdRegistry`]. The registry is append-only: entities are never removed,
//! indices are handed out in order, and a new ID is always `1 + max` of the
//! IDs seen so far, so IDs are never reused within a session.

use crate::mesh_error::MeshError;
use crate::topology::ids::EntityId;
use hashbrown::HashMap;

/// Bidirectional ID ↔ index map for one entity kind.
///
/// # Invariants
/// - `ids[index_of(id)] == id` for every registered ID.
/// - `map.len() == ids.len()`.
/// - No registered ID is negative.
#[derive(Clone, Debug)]
pub struct IdRegistry<I: EntityId> {
    map: HashMap<I, usize>,
    ids: Vec<I>,
    max: Option<i64>,
}

impl<I: EntityId> Default for IdRegistry<I> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            ids: Vec::new(),
            max: None,
        }
    }
}

impl<I: EntityId> IdRegistry<I> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry where the i-th ID gets index `i`.
    ///
    /// # Errors
    /// `InvalidId` for negative IDs, `DuplicateId` for repeated ones.
    pub fn from_ids<It>(ids: It) -> Result<Self, MeshError>
    where
        It: IntoIterator<Item = I>,
    {
        let ids = ids.into_iter();
        let mut reg = Self::default();
        reg.map.reserve(ids.size_hint().0);
        for id in ids {
            reg.push(id)?;
        }
        Ok(reg)
    }

    /// Registers `id` at `index`. Since the registry is append-only, `index`
    /// must be the next free position.
    pub fn register(&mut self, id: I, index: usize) -> Result<(), MeshError> {
        if index != self.ids.len() {
            return Err(MeshError::LengthMismatch {
                what: "registry index",
                expected: self.ids.len(),
                found: index,
            });
        }
        self.push(id).map(|_| ())
    }

    /// Appends `id` and returns its index.
    ///
    /// # Complexity
    /// Amortized **O(1)**.
    pub fn push(&mut self, id: I) -> Result<usize, MeshError> {
        if id.raw() < 0 {
            return Err(MeshError::InvalidId {
                kind: I::KIND,
                id: id.raw(),
            });
        }
        if self.map.contains_key(&id) {
            return Err(MeshError::DuplicateId {
                kind: I::KIND,
                id: id.raw(),
            });
        }
        let index = self.ids.len();
        self.map.insert(id, index);
        self.ids.push(id);
        self.max = Some(self.max.map_or(id.raw(), |m| m.max(id.raw())));
        Ok(index)
    }

    /// Allocates a fresh ID (`1 + max`, or `0` when empty) at the next index.
    pub fn allocate(&mut self) -> (I, usize) {
        let id = self.next_id();
        let index = self.ids.len();
        self.map.insert(id, index);
        self.ids.push(id);
        self.max = Some(id.raw());
        (id, index)
    }

    /// The ID the next [`allocate`](Self::allocate) call would hand out.
    #[inline]
    pub fn next_id(&self) -> I {
        I::from_raw(self.max.map_or(0, |m| m + 1))
    }

    /// Translates an ID into its index.
    ///
    /// # Errors
    /// `UnknownId` if the ID was never registered.
    #[inline]
    pub fn index_of(&self, id: I) -> Result<usize, MeshError> {
        self.map.get(&id).copied().ok_or(MeshError::UnknownId {
            kind: I::KIND,
            id: id.raw(),
        })
    }

    /// The ID stored at `index`, if any.
    #[inline]
    pub fn id_at(&self, index: usize) -> Option<I> {
        self.ids.get(index).copied()
    }

    #[inline]
    pub fn contains(&self, id: I) -> bool {
        self.map.contains_key(&id)
    }

    /// All IDs in index order.
    #[inline]
    pub fn ids(&self) -> &[I] {
        &self.ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.ids.len(), self.map.len());
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
