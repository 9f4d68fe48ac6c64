use image::RgbImage;
use lowpoly_core::prelude::{Coord, Mesh, Rgb, Scalar};

/// Draw every triangle edge of the mesh.
pub fn apply_wireframe(image: &mut RgbImage, mesh: &Mesh, color: Rgb) {
    for triangle in &mesh.triangles {
        let [a, b, c] = mesh.triangle_coords(triangle);
        apply_line(image, a, b, color);
        apply_line(image, b, c, color);
        apply_line(image, c, a, color);
    }
}

/// Mark pixels nearest to given points.
pub fn apply_points(image: &mut RgbImage, points: &[Coord], color: Rgb) {
    for p in points {
        put_pixel_checked(image, p.x.round() as _, p.y.round() as _, color);
    }
}

/// Draw line between two points in pixel space, both ends included.
pub fn apply_line(image: &mut RgbImage, from: Coord, to: Coord, color: Rgb) {
    let delta = to - from;
    let steps = delta.x.abs().max(delta.y.abs()).ceil() as usize;
    if steps == 0 {
        put_pixel_checked(image, from.x.round() as _, from.y.round() as _, color);
        return;
    }
    for i in 0..=steps {
        let p = from + delta * (i as Scalar / steps as Scalar);
        put_pixel_checked(image, p.x.round() as _, p.y.round() as _, color);
    }
}

fn put_pixel_checked(image: &mut RgbImage, x: isize, y: isize, color: Rgb) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as _, y as _, image::Rgb(color.channels()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    fn count_white(image: &RgbImage) -> usize {
        image.pixels().filter(|p| p.0 == [255, 255, 255]).count()
    }

    #[test]
    fn test_line_includes_both_ends() {
        let mut image = RgbImage::new(5, 5);
        apply_line(&mut image, Coord::new(4.0, 4.0), Coord::new(0.0, 0.0), WHITE);
        assert_eq!(count_white(&image), 5);
        for i in 0..5 {
            assert_eq!(image.get_pixel(i, i).0, [255, 255, 255]);
        }
    }

    #[test]
    fn test_line_is_clipped() {
        let mut image = RgbImage::new(4, 4);
        apply_line(&mut image, Coord::new(-3.0, 1.0), Coord::new(9.0, 1.0), WHITE);
        assert_eq!(count_white(&image), 4);
    }

    #[test]
    fn test_wireframe_draws_triangle_outline() {
        let mut image = RgbImage::new(5, 5);
        let mesh = Mesh {
            points: vec![
                Coord::new(0.0, 0.0),
                Coord::new(4.0, 0.0),
                Coord::new(0.0, 4.0),
            ],
            triangles: vec![[0, 1, 2].into()],
        };
        apply_wireframe(&mut image, &mesh, WHITE);
        assert_eq!(image.get_pixel(2, 0).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(0, 2).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(2, 2).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(1, 1).0, [0, 0, 0]);
    }
}
