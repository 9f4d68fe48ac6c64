pub mod render;
pub mod settings;
pub mod wireframe;

pub use crate::{render::*, settings::*, wireframe::*};

use image::{DynamicImage, GrayImage, Luma};
use lowpoly_core::prelude::*;

/// Convert decoded image into the pipeline source image. Alpha channel is dropped.
///
/// # Arguments
/// * `image` - Decoded image of any color type.
///
/// # Returns
/// Source image or error.
pub fn source_image_from_dynamic(image: &DynamicImage) -> Result<SourceImage> {
    let rgb = image.to_rgb8();
    let pixels = rgb.pixels().map(|p| Rgb::from(p.0)).collect();
    SourceImage::from_pixels(rgb.width() as _, rgb.height() as _, pixels)
}

/// Generate density field image.
///
/// # Arguments
/// * `image` - Input image to process.
/// * `settings` - Density field settings.
///
/// # Returns
/// Grayscale image of source size (brighter means denser) or error.
pub fn generate_density_image(
    image: &DynamicImage,
    settings: &DensitySettings,
) -> Result<DynamicImage> {
    let source = source_image_from_dynamic(image)?;
    let field = build_density(&source, settings)?;
    Ok(DynamicImage::ImageLuma8(density_field_image(&field)))
}

/// Visualize density field at source image resolution.
pub fn density_field_image(field: &DensityField) -> GrayImage {
    let scale = field.scale().max(1);
    let width = field.image_width();
    let height = field.image_height();
    let mut image = GrayImage::new(width as _, height as _);
    for (col, row, value) in field.value_iter() {
        let pixel = Luma([(value * 255.0).round().clamp(0.0, 255.0) as u8]);
        for y in (row * scale)..((row + 1) * scale).min(height) {
            for x in (col * scale)..((col + 1) * scale).min(width) {
                image.put_pixel(x as _, y as _, pixel);
            }
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_alpha_is_dropped() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            3,
            2,
            image::Rgba([10, 20, 30, 0]),
        ));
        let source = source_image_from_dynamic(&image).unwrap();
        assert_eq!(source.width(), 3);
        assert_eq!(source.height(), 2);
        assert!(source.pixels().iter().all(|p| *p == Rgb::new(10, 20, 30)));
    }

    #[test]
    fn test_density_image_size_and_floor() {
        let image = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            9,
            5,
            image::Rgb([90, 90, 90]),
        ));
        let settings = DensitySettings {
            scale: 2,
            ..Default::default()
        };
        let density = generate_density_image(&image, &settings).unwrap().to_luma8();
        assert_eq!(density.dimensions(), (9, 5));
        assert!(density.pixels().all(|p| p.0[0] == 3));
    }

    #[test]
    fn test_edge_is_brightest() {
        let image = DynamicImage::ImageRgb8(image::RgbImage::from_fn(10, 4, |x, _| {
            if x < 5 {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            }
        }));
        let density = generate_density_image(&image, &Default::default())
            .unwrap()
            .to_luma8();
        assert_eq!(density.get_pixel(4, 2).0[0], 255);
        assert_eq!(density.get_pixel(0, 2).0[0], 3);
    }

    #[test]
    fn test_empty_image_fails() {
        let image = DynamicImage::new_rgb8(0, 0);
        assert!(matches!(
            generate_density_image(&image, &Default::default()),
            Err(LowPolyError::InvalidInput(_))
        ));
    }
}
