//! Strong, zero-cost handles for tissue entities.
//!
//! Every node, cell, wall and edge carries a stable external ID. IDs are plain
//! `i64` values wrapped in one newtype per entity kind so that a wall ID can
//! never be passed where a cell ID is expected. The value `-1` is reserved:
//! [`CellId::EXTERIOR`] stands for "outside the tissue" and appears as a
//! neighbour reference, never as a real entity.
//!
//! This module provides:
//! - [`NodeId`], [`CellId`], [`WallId`] and [`EdgeId`], all `repr(transparent)`
//!   over `i64` so they can be handed to a serializer as raw integers.
//! - [`EntityKind`] naming the four kinds for error messages and attribute
//!   tables.
//! - The [`EntityId`] trait used by the generic [`IdRegistry`](super::registry::IdRegistry).

use std::fmt;

/// The four entity kinds of a tissue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum EntityKind {
    Node,
    Cell,
    Wall,
    Edge,
}

impl EntityKind {
    /// All kinds in canonical order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Node,
        EntityKind::Cell,
        EntityKind::Wall,
        EntityKind::Edge,
    ];

    /// Lower-case name used in messages and persisted attribute prefixes.
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::Node => "node",
            EntityKind::Cell => "cell",
            EntityKind::Wall => "wall",
            EntityKind::Edge => "edge",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common behaviour of the per-kind ID newtypes.
pub trait EntityId: Copy + Eq + Ord + std::hash::Hash + fmt::Debug + fmt::Display {
    /// The entity kind this ID refers to.
    const KIND: EntityKind;

    /// Wrap a raw integer.
    fn from_raw(raw: i64) -> Self;

    /// Returns the raw integer.
    fn raw(self) -> i64;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an ID from a raw value. No validity check happens here;
            /// registries reject negative IDs on registration.
            #[inline]
            pub const fn new(raw: i64) -> Self {
                $name(raw)
            }

            /// Returns the inner `i64` value.
            #[inline]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl EntityId for $name {
            const KIND: EntityKind = $kind;

            #[inline]
            fn from_raw(raw: i64) -> Self {
                $name(raw)
            }

            #[inline]
            fn raw(self) -> i64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            #[inline]
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

entity_id!(
    /// Stable ID of a node.
    NodeId,
    EntityKind::Node
);
entity_id!(
    /// Stable ID of a cell, or [`CellId::EXTERIOR`].
    CellId,
    EntityKind::Cell
);
entity_id!(
    /// Stable ID of a wall.
    WallId,
    EntityKind::Wall
);
entity_id!(
    /// ID of an edge. Edges are never deleted, so the ID always equals the
    /// edge's index in the edge tables.
    EdgeId,
    EntityKind::Edge
);

impl CellId {
    /// Synthetic neighbour standing for the outside of the tissue.
    pub const EXTERIOR: CellId = CellId(-1);

    /// Returns `true` for the exterior sentinel.
    #[inline]
    pub const fn is_exterior(self) -> bool {
        self.0 == -1
    }
}

impl EdgeId {
    /// Edge ID for a given index.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        EdgeId(index as i64)
    }

    /// The index this ID stands for.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Return the element of `pair` that is not `one`, if `one` is in the pair.
///
/// Used throughout to find "the cell on the other side" of a wall or edge.
#[inline]
pub fn other_of<T: Copy + PartialEq>(pair: [T; 2], one: T) -> Option<T> {
    if pair[0] == one {
        Some(pair[1])
    } else if pair[1] == one {
        Some(pair[0])
    } else {
        None
    }
}



#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_is_raw_integer() {
        let c = CellId::new(123);
        let s = serde_json::to_string(&c).unwrap();
        assert_eq!(s, "123");
        let back: CellId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn bincode_roundtrip() {
        let w = WallId::new(456);
        let bytes = bincode::serialize(&w).unwrap();
        let back: WallId = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, w);
    }
}
