//! Node coordinate storage.
//!
//! A tissue stores either planar (`xy`) or embedded (`xyz`) node positions.
//! The choice is made once at construction. Geometry always works on the XY
//! projection; the z component is carried along and interpolated when surgery
//! creates new nodes.

use serde::{Deserialize, Serialize};

/// Per-node positions, indexed by node index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeCoordinates {
    Xy(Vec<[f64; 2]>),
    Xyz(Vec<[f64; 3]>),
}

impl Default for NodeCoordinates {
    fn default() -> Self {
        NodeCoordinates::Xy(Vec::new())
    }
}

impl NodeCoordinates {
    /// Number of stored positions.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            NodeCoordinates::Xy(v) => v.len(),
            NodeCoordinates::Xyz(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spatial dimension, 2 or 3.
    #[inline]
    pub fn dimension(&self) -> usize {
        match self {
            NodeCoordinates::Xy(_) => 2,
            NodeCoordinates::Xyz(_) => 3,
        }
    }

    /// XY projection of the position at `index`.
    #[inline]
    pub fn xy(&self, index: usize) -> Option<[f64; 2]> {
        match self {
            NodeCoordinates::Xy(v) => v.get(index).copied(),
            NodeCoordinates::Xyz(v) => v.get(index).map(|p| [p[0], p[1]]),
        }
    }

    /// Full position at `index`, padded with `z = 0` for planar storage.
    #[inline]
    pub fn position(&self, index: usize) -> Option<[f64; 3]> {
        match self {
            NodeCoordinates::Xy(v) => v.get(index).map(|p| [p[0], p[1], 0.0]),
            NodeCoordinates::Xyz(v) => v.get(index).copied(),
        }
    }

    /// Appends the point `a + s·(b − a)` and returns its index.
    ///
    /// All stored components are interpolated, so a 3D tissue keeps a
    /// consistent z for nodes created on existing edges.
    pub(crate) fn push_lerp(&mut self, a: usize, b: usize, s: f64) -> usize {
        let index = self.len();
        match self {
            NodeCoordinates::Xy(v) => {
                let (pa, pb) = (v[a], v[b]);
                v.push([pa[0] + s * (pb[0] - pa[0]), pa[1] + s * (pb[1] - pa[1])]);
            }
            NodeCoordinates::Xyz(v) => {
                let (pa, pb) = (v[a], v[b]);
                v.push([
                    pa[0] + s * (pb[0] - pa[0]),
                    pa[1] + s * (pb[1] - pa[1]),
                    pa[2] + s * (pb[2] - pa[2]),
                ]);
            }
        }
        index
    }
}
