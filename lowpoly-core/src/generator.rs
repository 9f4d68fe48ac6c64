use crate::{
    art::LowPolyArt,
    color::colorize,
    density::{build_density, DensityField},
    error::{LowPolyError, Result},
    mesh::{triangulate, Mesh},
    sampler::{sample_seeded, PointSet, SamplingStatus},
    settings::GenerateLowPolySettings,
    source::SourceImage,
    Scalar,
};
use log::debug;

/// Number of stages that produce an artifact.
const STAGES_COUNT: usize = 4;

/// Low-poly generator state object.
/// It allows you to process generation in steps and track progress or cancel generation in
/// between stages. Every stage consumes the artifact of the previous one.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LowPolyGenerator {
    #[default]
    Uninitialized,
    BuildingDensity {
        image: SourceImage,
        settings: GenerateLowPolySettings,
    },
    Sampling {
        image: SourceImage,
        settings: GenerateLowPolySettings,
        field: DensityField,
    },
    Triangulating {
        image: SourceImage,
        settings: GenerateLowPolySettings,
        points: PointSet,
    },
    Coloring {
        image: SourceImage,
        settings: GenerateLowPolySettings,
        mesh: Mesh,
        sampling_status: SamplingStatus,
    },
    Completed {
        art: LowPolyArt,
    },
}

impl LowPolyGenerator {
    /// Creates new generator instance.
    ///
    /// # Arguments
    /// * `image` - Source image.
    /// * `settings` - Low-poly generation settings.
    ///
    /// # Returns
    /// New generator instance.
    pub fn new(image: SourceImage, settings: GenerateLowPolySettings) -> Self {
        Self::BuildingDensity { image, settings }
    }

    /// Get processing progress.
    ///
    /// # Returns
    /// `(current, limit, percentage)`
    pub fn progress(&self) -> (usize, usize, Scalar) {
        let current = match self {
            Self::Uninitialized | Self::BuildingDensity { .. } => 0,
            Self::Sampling { .. } => 1,
            Self::Triangulating { .. } => 2,
            Self::Coloring { .. } => 3,
            Self::Completed { .. } => STAGES_COUNT,
        };
        (
            current,
            STAGES_COUNT,
            current as Scalar / STAGES_COUNT as Scalar,
        )
    }

    /// Check if generation is done.
    ///
    /// # Returns
    /// True if process is completed.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Tries to get inner generated art when ready, otherwise gets itself.
    /// This function consumes generator!
    ///
    /// # Returns
    /// Result with art (Ok) when completed, or self (Err) when still processing.
    pub fn get_art_or_self(self) -> std::result::Result<LowPolyArt, Self> {
        match self {
            Self::Completed { art } => Ok(art),
            gen => Err(gen),
        }
    }

    /// Process single generation stage. This function consumes generator!
    ///
    /// # Returns
    /// Self if ok or generation error.
    ///
    /// # Examples
    /// ```
    /// use lowpoly_core::prelude::*;
    ///
    /// let image = SourceImage::filled(16, 16, Rgb::new(1, 2, 3));
    /// let mut generator = LowPolyGenerator::new(image, Default::default());
    /// loop {
    ///     match generator.process().unwrap().get_art_or_self() {
    ///         Ok(art) => {
    ///             assert_eq!(art.width, 16);
    ///             return;
    ///         }
    ///         Err(gen) => generator = gen,
    ///     }
    /// }
    /// ```
    pub fn process(self) -> Result<Self> {
        match self {
            Self::Uninitialized => Err(LowPolyError::UninitializedGenerator),
            Self::BuildingDensity { image, settings } => {
                let field = build_density(&image, &settings.density)?;
                Ok(Self::Sampling {
                    image,
                    settings,
                    field,
                })
            }
            Self::Sampling {
                image,
                settings,
                field,
            } => {
                let points = sample_seeded(&field, &settings.sampling);
                Ok(Self::Triangulating {
                    image,
                    settings,
                    points,
                })
            }
            Self::Triangulating {
                image,
                settings,
                points,
            } => {
                let sampling_status = points.status();
                let mesh = triangulate(points.points())?;
                Ok(Self::Coloring {
                    image,
                    settings,
                    mesh,
                    sampling_status,
                })
            }
            Self::Coloring {
                image,
                settings,
                mesh,
                sampling_status,
            } => {
                let triangles = colorize(&mesh, &image, settings.color_policy);
                debug!(
                    "Colored {} triangles with {:?} policy",
                    triangles.len(),
                    settings.color_policy
                );
                Ok(Self::Completed {
                    art: LowPolyArt {
                        width: image.width(),
                        height: image.height(),
                        mesh,
                        triangles,
                        sampling_status,
                    },
                })
            }
            Self::Completed { art } => Err(LowPolyError::AlreadyCompleted(Box::new(art))),
        }
    }

    /// Process generation until it returns either art or error.
    /// This function consumes generator!
    ///
    /// # Returns
    /// Low-poly art or generation error.
    pub fn process_wait(mut self) -> Result<LowPolyArt> {
        loop {
            match self.process()?.get_art_or_self() {
                Ok(art) => return Ok(art),
                Err(gen) => self = gen,
            }
        }
    }

    /// Process generation with callback that gets called on progress update
    /// until it returns either art or error.
    /// This function consumes generator!
    ///
    /// # Arguments
    /// * `f` - Callback with progress arguments: `(current, limit, percentage)`.
    ///
    /// # Returns
    /// Low-poly art or generation error.
    ///
    /// # Examples
    /// ```
    /// use lowpoly_core::prelude::*;
    ///
    /// let image = SourceImage::filled(16, 16, Rgb::new(1, 2, 3));
    /// let mut reports = vec![];
    /// LowPolyGenerator::new(image, Default::default())
    ///     .process_wait_tracked(|c, l, _| reports.push((c, l)))
    ///     .unwrap();
    /// assert_eq!(reports, vec![(0, 4), (1, 4), (2, 4), (3, 4), (4, 4)]);
    /// ```
    pub fn process_wait_tracked<F>(mut self, mut f: F) -> Result<LowPolyArt>
    where
        F: FnMut(usize, usize, Scalar),
    {
        let (c, l, p) = self.progress();
        f(c, l, p);
        loop {
            let gen = self.process()?;
            let (c, l, p) = gen.progress();
            f(c, l, p);
            match gen.get_art_or_self() {
                Ok(art) => return Ok(art),
                Err(gen) => self = gen,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Rgb;

    #[test]
    fn test_uninitialized_fails() {
        assert_eq!(
            LowPolyGenerator::default().process(),
            Err(LowPolyError::UninitializedGenerator)
        );
    }

    #[test]
    fn test_completed_returns_art_in_error() {
        let image = SourceImage::filled(8, 8, Rgb::new(4, 5, 6));
        let art = LowPolyGenerator::new(image, Default::default())
            .process_wait()
            .unwrap();
        let completed = LowPolyGenerator::Completed { art: art.clone() };
        assert!(completed.is_done());
        assert_eq!(
            completed.process(),
            Err(LowPolyError::AlreadyCompleted(Box::new(art)))
        );
    }

    #[test]
    fn test_stage_errors_propagate() {
        let image = SourceImage::filled(0, 0, Rgb::default());
        let result = LowPolyGenerator::new(image, Default::default()).process_wait();
        assert!(matches!(result, Err(LowPolyError::InvalidInput(_))));
    }

    #[test]
    fn test_single_row_image_is_degenerate() {
        let image = SourceImage::filled(20, 1, Rgb::default());
        let result = LowPolyGenerator::new(image, Default::default()).process_wait();
        assert!(matches!(result, Err(LowPolyError::DegenerateInput(_))));
    }

    #[test]
    fn test_stages_advance_in_order() {
        let image = SourceImage::filled(12, 12, Rgb::default());
        let generator = LowPolyGenerator::new(image, Default::default());
        assert_eq!(generator.progress().0, 0);
        let generator = generator.process().unwrap();
        assert!(matches!(generator, LowPolyGenerator::Sampling { .. }));
        let generator = generator.process().unwrap();
        assert!(matches!(generator, LowPolyGenerator::Triangulating { .. }));
        let generator = generator.process().unwrap();
        assert!(matches!(generator, LowPolyGenerator::Coloring { .. }));
        let generator = generator.process().unwrap();
        assert!(generator.is_done());
        assert_eq!(generator.progress(), (4, 4, 1.0));
    }
}
