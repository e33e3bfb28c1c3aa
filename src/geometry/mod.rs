//! Geometry utilities for tissue-mesh.
//!
//! [`polygon`] holds the pure kernel over coordinate slices; [`metrics`]
//! applies it to the cells and walls of a [`Tissue`](crate::topology::tissue::Tissue).

pub mod metrics;
pub mod polygon;

pub use metrics::{cell_area, cell_areas, cell_moments, cell_perimeter, cell_polygon, tissue_area, wall_length, wall_lengths};
#[cfg(feature = "rayon")]
pub use metrics::par_cell_areas;
pub use polygon::{
    PolygonMoments, SegmentHit, polygon_moments, polygon_signed_area, polyline_length,
    segment_intersection,
};
