#[macro_use]
mod utils;

pub mod art;
pub mod color;
pub mod coord;
pub mod density;
pub mod error;
pub mod generator;
pub mod mesh;
pub mod sampler;
pub mod settings;
pub mod source;
pub mod triangle;

/// Scalar type.
pub type Scalar = f32;

pub mod prelude {
    pub use crate::{
        art::*, color::*, coord::*, density::*, error::*, generate_lowpoly, generator::*,
        mesh::*, sampler::points_separation::*, sampler::*, settings::*, source::*, triangle::*,
        Scalar,
    };
}

use crate::{
    art::LowPolyArt, error::Result, generator::LowPolyGenerator,
    settings::GenerateLowPolySettings, source::SourceImage,
};

/// Run the whole pipeline on an image and return the colored mesh.
///
/// # Arguments
/// * `image` - Source image.
/// * `settings` - Low-poly generation settings.
///
/// # Returns
/// Low-poly art or error.
///
/// # Examples
/// ```
/// use lowpoly_core::prelude::*;
///
/// let image = SourceImage::filled(32, 32, Rgb::new(10, 20, 30));
/// let art = generate_lowpoly(image, GenerateLowPolySettings::default()).unwrap();
/// assert!(!art.triangles.is_empty());
/// assert!(art.triangles.iter().all(|t| t.color == Rgb::new(10, 20, 30)));
/// ```
pub fn generate_lowpoly(
    image: SourceImage,
    settings: GenerateLowPolySettings,
) -> Result<LowPolyArt> {
    LowPolyGenerator::new(image, settings).process_wait()
}
