use crate::{
    coord::Coord,
    error::{LowPolyError, Result},
    triangle::{signed_area, Triangle},
    Scalar,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use triangulation::{Delaunay, Point};

/// Triangles with smaller absolute area are treated as collinear and dropped.
pub const DEGENERATE_AREA: Scalar = 1.0e-4;

/// Triangle mesh.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// List of points.
    pub points: Vec<Coord>,
    /// List of triangles, all with positive signed area.
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// Returns corners of given triangle.
    pub fn triangle_coords(&self, triangle: &Triangle) -> [Coord; 3] {
        triangle.coords(&self.points)
    }

    /// Returns sum of triangle areas.
    pub fn area(&self) -> Scalar {
        self.triangles
            .iter()
            .map(|t| {
                let [a, b, c] = self.triangle_coords(t);
                signed_area(a, b, c).abs()
            })
            .sum()
    }
}

/// Delaunay triangulation of points.
///
/// # Arguments
/// * `points` - At least 3 non collinear points.
///
/// # Returns
/// Mesh or error.
///
/// # Examples
/// ```
/// use lowpoly_core::prelude::*;
///
/// let points = vec![
///     Coord::new(0.0, 0.0),
///     Coord::new(10.0, 0.0),
///     Coord::new(10.0, 10.0),
///     Coord::new(0.0, 10.0),
///     Coord::new(4.0, 5.0),
/// ];
/// let mesh = triangulate(&points).unwrap();
/// assert_eq!(mesh.triangles.len(), 4);
/// assert!((mesh.area() - 100.0).abs() < 1.0e-3);
/// assert!(triangulate(&points[..2]).is_err());
/// ```
pub fn triangulate(points: &[Coord]) -> Result<Mesh> {
    if points.len() < 3 {
        return Err(LowPolyError::DegenerateInput(format!(
            "triangulation needs at least 3 points, got {}",
            points.len()
        )));
    }
    let input = points
        .iter()
        .map(|p| Point::new(p.x, p.y))
        .collect::<Vec<_>>();
    let del = Delaunay::new(&input).ok_or_else(|| {
        LowPolyError::DegenerateInput("points do not span a triangle".to_owned())
    })?;
    let triangles = del
        .dcel
        .vertices
        .chunks_exact(3)
        .filter_map(|t| {
            let triangle = Triangle::from([t[0], t[1], t[2]]);
            let [a, b, c] = triangle.coords(points);
            let area = signed_area(a, b, c);
            if area > DEGENERATE_AREA {
                Some(triangle)
            } else if area < -DEGENERATE_AREA {
                Some(triangle.flipped())
            } else {
                None
            }
        })
        .collect::<Vec<_>>();
    if triangles.is_empty() {
        return Err(LowPolyError::DegenerateInput(
            "all triangles are degenerate".to_owned(),
        ));
    }
    let mesh = bake_final_mesh(points, triangles);
    debug!(
        "Triangulated {} points into {} triangles",
        mesh.points.len(),
        mesh.triangles.len()
    );
    Ok(mesh)
}

/// Drops points not referenced by any triangle and remaps indices.
pub(crate) fn bake_final_mesh(points: &[Coord], mut triangles: Vec<Triangle>) -> Mesh {
    let mut used = vec![false; points.len()];
    for t in &triangles {
        used[t.a] = true;
        used[t.b] = true;
        used[t.c] = true;
    }
    let mut mapping = HashMap::with_capacity(points.len());
    let mut new_points = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        if used[i] {
            mapping.insert(i, new_points.len());
            new_points.push(*p);
        }
    }
    for t in &mut triangles {
        t.a = mapping[&t.a];
        t.b = mapping[&t.b];
        t.c = mapping[&t.c];
    }
    Mesh {
        points: new_points,
        triangles,
    }
}
