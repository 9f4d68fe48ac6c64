use crate::{
    settings::RenderSettings,
    wireframe::{apply_points, apply_wireframe},
};
use image::RgbImage;
use lowpoly_core::prelude::*;

/// Rasterize colored triangles into image of source size.
///
/// # Arguments
/// * `art` - Generated low-poly art.
///
/// # Returns
/// Rendered image.
pub fn render_lowpoly_image(art: &LowPolyArt) -> RgbImage {
    render_lowpoly_image_with_settings(art, &RenderSettings::default())
}

/// Rasterize colored triangles and optional debug overlays into image of source size.
/// Every pixel whose center lies inside (or on the edge of) a triangle takes its color.
///
/// # Arguments
/// * `art` - Generated low-poly art.
/// * `settings` - Render settings.
///
/// # Returns
/// Rendered image.
pub fn render_lowpoly_image_with_settings(art: &LowPolyArt, settings: &RenderSettings) -> RgbImage {
    let mut image = RgbImage::from_pixel(
        art.width as _,
        art.height as _,
        image::Rgb(settings.background.channels()),
    );
    for colored in &art.triangles {
        let [a, b, c] = art.mesh.triangle_coords(&colored.triangle);
        fill_triangle(&mut image, a, b, c, colored.color);
    }
    if let Some(color) = settings.wireframe {
        apply_wireframe(&mut image, &art.mesh, color);
    }
    if let Some(color) = settings.points {
        apply_points(&mut image, &art.mesh.points, color);
    }
    image
}

fn fill_triangle(image: &mut RgbImage, a: Coord, b: Coord, c: Coord, color: Rgb) {
    if image.width() == 0 || image.height() == 0 {
        return;
    }
    let max_x = image.width() as isize - 1;
    let max_y = image.height() as isize - 1;
    let fx = (a.x.min(b.x).min(c.x).floor() as isize).max(0);
    let fy = (a.y.min(b.y).min(c.y).floor() as isize).max(0);
    let tx = (a.x.max(b.x).max(c.x).ceil() as isize).min(max_x);
    let ty = (a.y.max(b.y).max(c.y).ceil() as isize).min(max_y);
    let pixel = image::Rgb(color.channels());
    for y in fy..=ty {
        for x in fx..=tx {
            if point_in_triangle(Coord::new(x as _, y as _), a, b, c) {
                image.put_pixel(x as _, y as _, pixel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles_art() -> LowPolyArt {
        let mesh = Mesh {
            points: vec![
                Coord::new(0.0, 0.0),
                Coord::new(4.0, 0.0),
                Coord::new(4.0, 4.0),
                Coord::new(0.0, 4.0),
            ],
            triangles: vec![[0, 1, 2].into(), [0, 2, 3].into()],
        };
        let triangles = vec![
            ColoredTriangle {
                triangle: mesh.triangles[0],
                color: Rgb::new(255, 0, 0),
            },
            ColoredTriangle {
                triangle: mesh.triangles[1],
                color: Rgb::new(0, 0, 255),
            },
        ];
        LowPolyArt {
            width: 5,
            height: 5,
            mesh,
            triangles,
            sampling_status: SamplingStatus::Complete,
        }
    }

    #[test]
    fn test_triangles_are_filled_with_their_colors() {
        let image = render_lowpoly_image(&two_triangles_art());
        assert_eq!(image.dimensions(), (5, 5));
        assert_eq!(image.get_pixel(3, 1).0, [255, 0, 0]);
        assert_eq!(image.get_pixel(1, 3).0, [0, 0, 255]);
        assert!(image.pixels().all(|p| p.0 != [0, 0, 0]));
    }

    #[test]
    fn test_debug_overlay() {
        let image = render_lowpoly_image_with_settings(&two_triangles_art(), &RenderSettings::debug());
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(image.get_pixel(2, 0).0, [0, 255, 0]);
        assert_eq!(image.get_pixel(2, 2).0, [0, 255, 0]);
    }

    #[test]
    fn test_generated_solid_art_covers_image() {
        let color = Rgb::new(70, 140, 210);
        let art = generate_lowpoly(SourceImage::filled(40, 30, color), Default::default()).unwrap();
        let settings = RenderSettings {
            background: Rgb::new(1, 2, 3),
            ..Default::default()
        };
        let image = render_lowpoly_image_with_settings(&art, &settings);
        let uncovered = image.pixels().filter(|p| p.0 == [1, 2, 3]).count();
        assert!(uncovered * 100 < 40 * 30, "{} pixels left uncovered", uncovered);
        assert!(image
            .pixels()
            .all(|p| p.0 == [1, 2, 3] || p.0 == color.channels()));
    }
}
