use crate::{
    coord::Coord,
    mesh::Mesh,
    source::{Rgb, SourceImage},
    triangle::{centroid, point_in_triangle, Triangle},
    Scalar,
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Policy of picking triangle colors from the source image.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorPolicy {
    /// Pixel nearest to the triangle centroid.
    #[default]
    Centroid,
    /// Bilinear lookup at the triangle centroid.
    CentroidBilinear,
    /// Mean of all pixels whose centers lie inside the triangle.
    AreaAverage,
    /// Per channel median of all pixels whose centers lie inside the triangle.
    AreaMedian,
}

/// Triangle with its fill color.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColoredTriangle {
    pub triangle: Triangle,
    pub color: Rgb,
}

/// Assign fill color to every mesh triangle.
///
/// # Arguments
/// * `mesh` - Triangulated mesh in image pixel space.
/// * `image` - Source image.
/// * `policy` - Color sampling policy.
///
/// # Returns
/// Colored triangles in mesh triangles order.
///
/// # Examples
/// ```
/// use lowpoly_core::prelude::*;
///
/// let image = SourceImage::from_fn(4, 4, |x, _| {
///     if x < 2 {
///         Rgb::new(255, 0, 0)
///     } else {
///         Rgb::new(0, 0, 255)
///     }
/// });
/// let mesh = Mesh {
///     points: vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0), Coord::new(0.0, 3.0)],
///     triangles: vec![Triangle::from([0, 1, 2])],
/// };
/// let colored = colorize(&mesh, &image, ColorPolicy::AreaAverage);
/// assert_eq!(colored[0].color, Rgb::new(255, 0, 0));
/// ```
pub fn colorize(mesh: &Mesh, image: &SourceImage, policy: ColorPolicy) -> Vec<ColoredTriangle> {
    iter!(mesh.triangles)
        .map(|triangle| {
            let [a, b, c] = mesh.triangle_coords(triangle);
            ColoredTriangle {
                triangle: *triangle,
                color: triangle_color(a, b, c, image, policy),
            }
        })
        .collect()
}

/// Color of a single triangle.
pub fn triangle_color(
    a: Coord,
    b: Coord,
    c: Coord,
    image: &SourceImage,
    policy: ColorPolicy,
) -> Rgb {
    if image.is_empty() {
        return Rgb::default();
    }
    let center = centroid(a, b, c);
    match policy {
        ColorPolicy::Centroid => nearest(center, image),
        ColorPolicy::CentroidBilinear => bilinear(center, image),
        ColorPolicy::AreaAverage => {
            let pixels = covered_pixels(a, b, c, image);
            if pixels.is_empty() {
                return nearest(center, image);
            }
            let count = pixels.len() as u64;
            let mut sum = [0u64; 3];
            for p in &pixels {
                for (s, v) in sum.iter_mut().zip(p.channels()) {
                    *s += v as u64;
                }
            }
            let [r, g, b] = sum.map(|s| ((s + count / 2) / count) as u8);
            Rgb::new(r, g, b)
        }
        ColorPolicy::AreaMedian => {
            let pixels = covered_pixels(a, b, c, image);
            if pixels.is_empty() {
                return nearest(center, image);
            }
            let [r, g, b] = [0, 1, 2].map(|channel| {
                let mut values = pixels
                    .iter()
                    .map(|p| p.channels()[channel])
                    .collect::<Vec<_>>();
                values.sort_unstable();
                let half = values.len() / 2;
                if values.len() % 2 == 0 {
                    ((values[half - 1] as u16 + values[half] as u16 + 1) / 2) as u8
                } else {
                    values[half]
                }
            });
            Rgb::new(r, g, b)
        }
    }
}

fn nearest(point: Coord, image: &SourceImage) -> Rgb {
    image.pixel_clamped(point.x.round() as isize, point.y.round() as isize)
}

fn bilinear(point: Coord, image: &SourceImage) -> Rgb {
    let max_x = (image.width() - 1) as Scalar;
    let max_y = (image.height() - 1) as Scalar;
    let x = point.x.max(0.0).min(max_x);
    let y = point.y.max(0.0).min(max_y);
    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let fx = x - x0 as Scalar;
    let fy = y - y0 as Scalar;
    let c00 = image.pixel_clamped(x0, y0).channels();
    let c10 = image.pixel_clamped(x0 + 1, y0).channels();
    let c01 = image.pixel_clamped(x0, y0 + 1).channels();
    let c11 = image.pixel_clamped(x0 + 1, y0 + 1).channels();
    let [r, g, b] = [0, 1, 2].map(|i| {
        let top = c00[i] as Scalar + (c10[i] as Scalar - c00[i] as Scalar) * fx;
        let bottom = c01[i] as Scalar + (c11[i] as Scalar - c01[i] as Scalar) * fx;
        (top + (bottom - top) * fy).round().max(0.0).min(255.0) as u8
    });
    Rgb::new(r, g, b)
}

/// Pixels whose centers pass the barycentric sign test.
fn covered_pixels(a: Coord, b: Coord, c: Coord, image: &SourceImage) -> Vec<Rgb> {
    let max_x = image.width() as isize - 1;
    let max_y = image.height() as isize - 1;
    let fx = (a.x.min(b.x).min(c.x).floor() as isize).max(0);
    let fy = (a.y.min(b.y).min(c.y).floor() as isize).max(0);
    let tx = (a.x.max(b.x).max(c.x).ceil() as isize).min(max_x);
    let ty = (a.y.max(b.y).max(c.y).ceil() as isize).min(max_y);
    let mut result = vec![];
    for y in fy..=ty {
        for x in fx..=tx {
            if point_in_triangle(Coord::new(x as _, y as _), a, b, c) {
                result.push(image.pixel(x as usize, y as usize));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image() -> SourceImage {
        SourceImage::from_fn(11, 11, |x, y| Rgb::new((x * 20) as u8, (y * 20) as u8, 7))
    }

    #[test]
    fn test_centroid_nearest() {
        let image = gradient_image();
        let color = triangle_color(
            Coord::new(0.0, 0.0),
            Coord::new(6.0, 0.0),
            Coord::new(0.0, 6.0),
            &image,
            ColorPolicy::Centroid,
        );
        assert_eq!(color, Rgb::new(40, 40, 7));
    }

    #[test]
    fn test_centroid_bilinear() {
        let image = gradient_image();
        let color = triangle_color(
            Coord::new(0.0, 0.0),
            Coord::new(4.5, 0.0),
            Coord::new(0.0, 4.5),
            &image,
            ColorPolicy::CentroidBilinear,
        );
        assert_eq!(color, Rgb::new(30, 30, 7));
    }

    #[test]
    fn test_centroid_is_clamped() {
        let image = gradient_image();
        let color = triangle_color(
            Coord::new(10.4, 10.4),
            Coord::new(10.9, 10.4),
            Coord::new(10.4, 10.9),
            &image,
            ColorPolicy::Centroid,
        );
        assert_eq!(color, Rgb::new(200, 200, 7));
    }

    #[test]
    fn test_area_average_and_median() {
        let image = SourceImage::from_fn(3, 1, |x, _| Rgb::new([0, 30, 90][x], 0, 0));
        let a = Coord::new(0.0, -1.0);
        let b = Coord::new(4.0, -1.0);
        let c = Coord::new(0.0, 3.0);
        let average = triangle_color(a, b, c, &image, ColorPolicy::AreaAverage);
        let median = triangle_color(a, b, c, &image, ColorPolicy::AreaMedian);
        assert_eq!(average, Rgb::new(40, 0, 0));
        assert_eq!(median, Rgb::new(30, 0, 0));
    }

    #[test]
    fn test_tiny_triangle_falls_back_to_centroid() {
        let image = gradient_image();
        let color = triangle_color(
            Coord::new(2.2, 2.2),
            Coord::new(2.4, 2.2),
            Coord::new(2.2, 2.4),
            &image,
            ColorPolicy::AreaAverage,
        );
        assert_eq!(color, Rgb::new(40, 40, 7));
    }

    #[test]
    fn test_colorize_keeps_triangle_order() {
        let image = gradient_image();
        let mesh = Mesh {
            points: vec![
                Coord::new(0.0, 0.0),
                Coord::new(10.0, 0.0),
                Coord::new(10.0, 10.0),
                Coord::new(0.0, 10.0),
            ],
            triangles: vec![[0, 1, 2].into(), [0, 2, 3].into()],
        };
        let colored = colorize(&mesh, &image, ColorPolicy::Centroid);
        assert_eq!(colored.len(), 2);
        assert_eq!(colored[0].triangle, mesh.triangles[0]);
        assert_eq!(colored[0].color, Rgb::new(140, 60, 7));
        assert_eq!(colored[1].color, Rgb::new(60, 140, 7));
    }
}
