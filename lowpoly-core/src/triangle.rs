use crate::{coord::Coord, Scalar};
use serde::{Deserialize, Serialize};

/// Tolerance of the barycentric sign test, so pixel centers lying on a shared edge count as
/// covered by both triangles.
const EDGE_EPSILON: Scalar = 1.0e-4;

/// Triangle made of three point indices.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    /// First point.
    pub a: usize,
    /// Second point.
    pub b: usize,
    /// Third point.
    pub c: usize,
}

impl Triangle {
    /// Returns triangle corners looked up in the points buffer.
    #[inline]
    pub fn coords(&self, points: &[Coord]) -> [Coord; 3] {
        [points[self.a], points[self.b], points[self.c]]
    }

    /// Returns the same triangle with its second and third corner swapped.
    #[inline]
    pub fn flipped(self) -> Self {
        Self {
            a: self.a,
            b: self.c,
            c: self.b,
        }
    }
}

impl From<[usize; 3]> for Triangle {
    fn from([a, b, c]: [usize; 3]) -> Self {
        Self { a, b, c }
    }
}

/// Signed area of triangle `abc`, positive when `b -> c` turns counter-clockwise around `a` in a
/// y-up frame.
///
/// # Examples
/// ```
/// use lowpoly_core::prelude::*;
///
/// let a = Coord::new(0.0, 0.0);
/// let b = Coord::new(4.0, 0.0);
/// let c = Coord::new(0.0, 2.0);
/// assert_eq!(signed_area(a, b, c), 4.0);
/// assert_eq!(signed_area(a, c, b), -4.0);
/// ```
#[inline]
pub fn signed_area(a: Coord, b: Coord, c: Coord) -> Scalar {
    (b - a).cross(c - a) * 0.5
}

/// Triangle centroid.
#[inline]
pub fn centroid(a: Coord, b: Coord, c: Coord) -> Coord {
    (a + b + c) / 3.0
}

/// Barycentric sign test. Points on edges are considered inside.
///
/// # Examples
/// ```
/// use lowpoly_core::prelude::*;
///
/// let a = Coord::new(0.0, 0.0);
/// let b = Coord::new(4.0, 0.0);
/// let c = Coord::new(0.0, 4.0);
/// assert!(point_in_triangle(Coord::new(1.0, 1.0), a, b, c));
/// assert!(point_in_triangle(Coord::new(2.0, 0.0), a, c, b));
/// assert!(!point_in_triangle(Coord::new(3.0, 3.0), a, b, c));
/// ```
pub fn point_in_triangle(p: Coord, a: Coord, b: Coord, c: Coord) -> bool {
    let d1 = (b - a).cross(p - a);
    let d2 = (c - b).cross(p - b);
    let d3 = (a - c).cross(p - c);
    let has_negative = d1 < -EDGE_EPSILON || d2 < -EDGE_EPSILON || d3 < -EDGE_EPSILON;
    let has_positive = d1 > EDGE_EPSILON || d2 > EDGE_EPSILON || d3 > EDGE_EPSILON;
    !(has_negative && has_positive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flipped_reverses_winding() {
        let points = vec![
            Coord::new(0.0, 0.0),
            Coord::new(2.0, 0.0),
            Coord::new(0.0, 2.0),
        ];
        let triangle = Triangle::from([0, 1, 2]);
        let [a, b, c] = triangle.coords(&points);
        let [fa, fb, fc] = triangle.flipped().coords(&points);
        assert_eq!(signed_area(a, b, c), -signed_area(fa, fb, fc));
    }

    #[test]
    fn test_centroid() {
        let c = centroid(
            Coord::new(0.0, 0.0),
            Coord::new(3.0, 0.0),
            Coord::new(0.0, 3.0),
        );
        assert_eq!(c, Coord::new(1.0, 1.0));
    }

    #[test]
    fn test_vertices_are_inside() {
        let a = Coord::new(1.0, 1.0);
        let b = Coord::new(5.0, 2.0);
        let c = Coord::new(2.0, 6.0);
        assert!(point_in_triangle(a, a, b, c));
        assert!(point_in_triangle(b, a, b, c));
        assert!(point_in_triangle(c, a, b, c));
        assert!(!point_in_triangle(Coord::new(0.0, 0.0), a, b, c));
    }
}
