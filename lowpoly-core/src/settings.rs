use crate::{
    color::ColorPolicy, density::GradientSource, sampler::points_separation::PointsSeparation,
    Scalar,
};
use serde::{Deserialize, Serialize};

/// Settings of density field construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensitySettings {
    /// Minimal sampling weight given to flat regions.
    #[serde(default = "DensitySettings::default_density_floor")]
    pub density_floor: Scalar,
    /// Share of local intensity variance in the blend (the rest is gradient magnitude).
    #[serde(default = "DensitySettings::default_variance_weight")]
    pub variance_weight: Scalar,
    /// Half size of the variance window.
    #[serde(default = "DensitySettings::default_variance_radius")]
    pub variance_radius: usize,
    /// Half size of the box filter smoothing intensities before gradient and variance are
    /// measured, so sensor noise does not raise density in flat regions. 0 disables smoothing.
    #[serde(default)]
    pub denoise_radius: usize,
    /// Channels used for gradient computation.
    #[serde(default)]
    pub gradient_source: GradientSource,
    /// Exponent applied to the blended field before the floor is added.
    /// Values of 0 or less (and NaN) disable the curve, same as 1.
    #[serde(default = "DensitySettings::default_gamma")]
    pub gamma: Scalar,
    /// Size of a density cell in pixels.
    #[serde(default = "DensitySettings::default_scale")]
    pub scale: usize,
}

impl Default for DensitySettings {
    fn default() -> Self {
        Self {
            density_floor: Self::default_density_floor(),
            variance_weight: Self::default_variance_weight(),
            variance_radius: Self::default_variance_radius(),
            denoise_radius: 0,
            gradient_source: GradientSource::default(),
            gamma: Self::default_gamma(),
            scale: Self::default_scale(),
        }
    }
}

impl DensitySettings {
    fn default_density_floor() -> Scalar {
        0.01
    }

    fn default_variance_weight() -> Scalar {
        0.3
    }

    fn default_variance_radius() -> usize {
        2
    }

    fn default_gamma() -> Scalar {
        1.0
    }

    fn default_scale() -> usize {
        1
    }
}

/// Settings of blue noise sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingSettings {
    /// Desired number of points, border points included.
    /// When not set it is derived from image area and maximal points separation.
    #[serde(default)]
    pub target_point_count: Option<usize>,
    /// Minimal distance between points as a function of local density.
    #[serde(default = "SamplingSettings::default_points_separation")]
    pub points_separation: PointsSeparation,
    /// Multiplier applied to every separation value.
    #[serde(default = "SamplingSettings::default_min_distance_scale")]
    pub min_distance_scale: Scalar,
    /// Attempts budget expressed as a multiple of target points count.
    #[serde(default = "SamplingSettings::default_max_attempts_factor")]
    pub max_attempts_factor: usize,
    /// Seed evenly spaced points along image edges.
    #[serde(default = "SamplingSettings::default_border_points")]
    pub border_points: bool,
    /// Seed of the random generator.
    #[serde(default)]
    pub random_seed: u64,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            target_point_count: None,
            points_separation: Self::default_points_separation(),
            min_distance_scale: Self::default_min_distance_scale(),
            max_attempts_factor: Self::default_max_attempts_factor(),
            border_points: Self::default_border_points(),
            random_seed: 0,
        }
    }
}

impl SamplingSettings {
    fn default_points_separation() -> PointsSeparation {
        PointsSeparation::DensityMapping(4.0, 18.0)
    }

    fn default_min_distance_scale() -> Scalar {
        1.0
    }

    fn default_max_attempts_factor() -> usize {
        30
    }

    fn default_border_points() -> bool {
        true
    }

    /// Returns scaled separation for given density.
    pub fn radius(&self, density: Scalar) -> Scalar {
        self.points_separation.radius(density) * self.min_distance_scale
    }

    /// Returns the largest scaled separation.
    pub fn max_radius(&self) -> Scalar {
        self.points_separation.maximum() * self.min_distance_scale
    }

    /// Returns target points count for image of given size.
    ///
    /// # Examples
    /// ```
    /// use lowpoly_core::prelude::*;
    ///
    /// let settings = SamplingSettings {
    ///     points_separation: 10.0.into(),
    ///     ..Default::default()
    /// };
    /// assert_eq!(settings.target_for(100, 100), 200);
    /// let settings = SamplingSettings {
    ///     target_point_count: Some(50),
    ///     ..Default::default()
    /// };
    /// assert_eq!(settings.target_for(100, 100), 50);
    /// ```
    pub fn target_for(&self, width: usize, height: usize) -> usize {
        match self.target_point_count {
            Some(count) => count,
            None => {
                let radius = self.max_radius().max(1.0);
                let area = (width * height) as Scalar;
                ((2.0 * area / (radius * radius)).ceil() as usize).max(4)
            }
        }
    }
}

/// Settings of the whole low-poly pipeline.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateLowPolySettings {
    #[serde(default)]
    pub density: DensitySettings,
    #[serde(default)]
    pub sampling: SamplingSettings,
    /// How triangle colors are picked from the source image.
    #[serde(default)]
    pub color_policy: ColorPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: GenerateLowPolySettings = serde_json::from_str(
            r#"{ "sampling": { "random_seed": 7 }, "color_policy": "AreaAverage" }"#,
        )
        .unwrap();
        assert_eq!(settings.sampling.random_seed, 7);
        assert_eq!(settings.sampling.max_attempts_factor, 30);
        assert_eq!(settings.color_policy, ColorPolicy::AreaAverage);
        assert_eq!(settings.density, DensitySettings::default());
    }

    #[test]
    fn test_radius_scaling() {
        let settings = SamplingSettings {
            points_separation: (2.0, 8.0).into(),
            min_distance_scale: 0.5,
            ..Default::default()
        };
        assert_eq!(settings.radius(1.0), 1.0);
        assert_eq!(settings.radius(0.0), 4.0);
        assert_eq!(settings.max_radius(), 4.0);
    }
}
