//! Planar polygon kernel: shoelace area, polygon moments, polyline length and
//! the line/segment intersection used by cell division.
//!
//! All functions are pure and operate on XY coordinate slices. Polygons are
//! implicitly closed (the last point connects back to the first); a
//! counter-clockwise ordering yields a positive signed area.
//!
//! The moment formulas follow the closed forms for simple polygons, see e.g.
//! Steger (1996) or the "centroid of a polygon" construction: with the per-edge
//! cross term `a_i = x_i y_{i+1} - x_{i+1} y_i`,
//!
//! - `A    = Σ a_i / 2`
//! - `c_x  = Σ (x_i + x_{i+1}) a_i / (6 A)`
//! - `c_y  = Σ (y_i + y_{i+1}) a_i / (6 A)`
//! - `I_xx = Σ (y_i² + y_i y_{i+1} + y_{i+1}²) a_i / 12`
//! - `I_yy = Σ (x_i² + x_i x_{i+1} + x_{i+1}²) a_i / 12`
//! - `I_xy = -Σ (2 x_i y_i + 2 x_{i+1} y_{i+1} + x_i y_{i+1} + x_{i+1} y_i) a_i / 24`
//!
//! Second moments are taken about the origin, not the centroid.

use crate::mesh_error::MeshError;
use itertools::Itertools;

/// Areas with absolute value at or below this are treated as degenerate.
pub const DEGENERATE_AREA: f64 = 1e-12;

/// Area, centroid and second moments of a polygon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolygonMoments {
    /// Signed area (positive for CCW ordering).
    pub area: f64,
    /// Centroid `(c_x, c_y)`.
    pub centroid: [f64; 2],
    pub ixx: f64,
    pub iyy: f64,
    pub ixy: f64,
}

/// Parameters of a line/segment intersection.
///
/// The cutting line is `p + t·v`, the segment is `n0 + s·(n1 − n0)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentHit {
    /// Position along the cutting line.
    pub t: f64,
    /// Position along the segment; `0 < s < 1` is strictly inside.
    pub s: f64,
}

/// Where a [`SegmentHit`] falls relative to the segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitLocation {
    /// Strictly between the endpoints, away from both by more than the tolerance.
    Interior,
    /// Within tolerance of an existing endpoint.
    AtNode,
    /// Beyond the segment.
    Outside,
}

impl SegmentHit {
    /// Classify the hit using a node-snapping tolerance on `s`.
    pub fn locate(&self, tolerance: f64) -> HitLocation {
        if self.s.abs() < tolerance || (1.0 - self.s).abs() < tolerance {
            HitLocation::AtNode
        } else if 0.0 < self.s && self.s < 1.0 {
            HitLocation::Interior
        } else {
            HitLocation::Outside
        }
    }

    /// The intersection point on the cutting line.
    #[inline]
    pub fn point_on_line(&self, p: [f64; 2], v: [f64; 2]) -> [f64; 2] {
        [p[0] + self.t * v[0], p[1] + self.t * v[1]]
    }
}

#[inline]
pub(crate) fn sub(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

/// Z component of the 2D cross product `a × b`.
#[inline]
pub fn cross(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[1] - a[1] * b[0]
}

#[inline]
fn norm(a: [f64; 2]) -> f64 {
    (a[0] * a[0] + a[1] * a[1]).sqrt()
}

/// Shoelace area `0.5 · Σ (x_i y_{i+1} − x_{i+1} y_i)`.
///
/// Positive for counter-clockwise polygons, negative for clockwise ones and
/// zero for fewer than three points.
pub fn polygon_signed_area(points: &[[f64; 2]]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    0.5 * points
        .iter()
        .circular_tuple_windows()
        .map(|(a, b)| cross(*a, *b))
        .sum::<f64>()
}

/// Area, centroid and second moments of a simple polygon.
///
/// The area component is identical to [`polygon_signed_area`].
///
/// # Errors
/// `DegeneratePolygon` when `|area| <= DEGENERATE_AREA`, because the centroid
/// divides by the area.
pub fn polygon_moments(points: &[[f64; 2]]) -> Result<PolygonMoments, MeshError> {
    let (mut a, mut mx, mut my, mut ixx, mut iyy, mut ixy) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    if points.len() >= 3 {
        for (&[xi, yi], &[xj, yj]) in points.iter().circular_tuple_windows() {
            let ai = xi * yj - xj * yi;
            a += ai;
            mx += (xi + xj) * ai;
            my += (yi + yj) * ai;
            ixx += (yi * yi + yi * yj + yj * yj) * ai;
            iyy += (xi * xi + xi * xj + xj * xj) * ai;
            ixy += (2.0 * xi * yi + 2.0 * xj * yj + xi * yj + xj * yi) * ai;
        }
    }
    let area = a / 2.0;
    if !area.is_finite() || area.abs() <= DEGENERATE_AREA {
        return Err(MeshError::DegeneratePolygon { area });
    }
    Ok(PolygonMoments {
        area,
        centroid: [mx / (6.0 * area), my / (6.0 * area)],
        ixx: ixx / 12.0,
        iyy: iyy / 12.0,
        ixy: ixy / -24.0,
    })
}

/// Sum of consecutive Euclidean distances along an open polyline.
pub fn polyline_length(points: &[[f64; 2]]) -> f64 {
    points
        .iter()
        .tuple_windows()
        .map(|(a, b)| norm(sub(*b, *a)))
        .sum()
}

/// Intersect the infinite line `p + t·v` with the segment `n0 → n1`.
///
/// Solves `n0 + s·(n1 − n0) = p + t·v` for `(s, t)`. Returns `None` when the
/// segment is parallel to the line (singular system). The caller decides
/// whether `s` is inside the segment, see [`SegmentHit::locate`].
pub fn segment_intersection(
    p: [f64; 2],
    v: [f64; 2],
    n0: [f64; 2],
    n1: [f64; 2],
) -> Option<SegmentHit> {
    let u = sub(n1, n0);
    let r = sub(p, n0);
    // M = [u, -v] (columns), M · [s, t]ᵀ = r
    let det = v[0] * u[1] - u[0] * v[1];
    let scale = norm(u) * norm(v);
    if scale == 0.0 || det.abs() <= f64::EPSILON * scale {
        return None;
    }
    let s = (v[0] * r[1] - r[0] * v[1]) / det;
    let t = (u[0] * r[1] - u[1] * r[0]) / det;
    Some(SegmentHit { t, s })
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT_SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn square_area_sign() {
        assert!(close(polygon_signed_area(&UNIT_SQUARE), 1.0));
        let mut cw = UNIT_SQUARE;
        cw.reverse();
        assert!(close(polygon_signed_area(&cw), -1.0));
        assert_eq!(polygon_signed_area(&UNIT_SQUARE[..2]), 0.0);
    }

    #[test]
    fn square_moments() {
        let m = polygon_moments(&UNIT_SQUARE).unwrap();
        assert!(close(m.area, 1.0));
        assert!(close(m.centroid[0], 0.5));
        assert!(close(m.centroid[1], 0.5));
        // ∫∫ y² dA over the unit square is 1/3
        assert!(close(m.ixx, 1.0 / 3.0));
        assert!(close(m.iyy, 1.0 / 3.0));
    }

    #[test]
    fn degenerate_moments_error() {
        let line = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        assert!(matches!(
            polygon_moments(&line),
            Err(MeshError::DegeneratePolygon { .. })
        ));
    }

    #[test]
    fn polyline() {
        let pts = [[0.0, 0.0], [3.0, 0.0], [3.0, 4.0]];
        assert!(close(polyline_length(&pts), 7.0));
        assert_eq!(polyline_length(&pts[..1]), 0.0);
    }

    #[test]
    fn intersection_parameters() {
        let hit = segment_intersection([0.5, -1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]).unwrap();
        assert!(close(hit.s, 0.5));
        assert!(close(hit.t, 1.0));
        assert_eq!(hit.locate(1e-3), HitLocation::Interior);
        assert_eq!(hit.point_on_line([0.5, -1.0], [0.0, 1.0]), [0.5, 0.0]);
    }

    #[test]
    fn parallel_segment_has_no_hit() {
        assert!(segment_intersection([0.0, 1.0], [1.0, 0.0], [0.0, 0.0], [1.0, 0.0]).is_none());
    }

    #[test]
    fn hits_near_nodes_are_snapped() {
        let hit = segment_intersection([0.0005, 0.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]).unwrap();
        assert_eq!(hit.locate(1e-3), HitLocation::AtNode);
        let far = segment_intersection([2.0, 0.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]).unwrap();
        assert_eq!(far.locate(1e-3), HitLocation::Outside);
    }
}
