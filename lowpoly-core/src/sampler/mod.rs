mod grid;
pub mod points_separation;

use crate::{
    coord::Coord, density::DensityField, sampler::grid::PointsGrid, settings::SamplingSettings,
    Scalar,
};
use log::{debug, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Outcome of blue noise sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingStatus {
    /// Target points count was reached.
    Complete,
    /// Attempts budget ran out before reaching target; points set is valid but sparser.
    BudgetExhausted {
        /// Number of points in the set.
        accepted: usize,
        /// Requested number of points.
        target: usize,
    },
}

/// Sampled points in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    points: Vec<Coord>,
    /// Separation each point was accepted with.
    radii: Vec<Scalar>,
    boundary_count: usize,
    status: SamplingStatus,
}

impl PointSet {
    /// Returns points, border points first.
    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    /// Returns separation required around each point.
    pub fn radii(&self) -> &[Scalar] {
        &self.radii
    }

    /// Returns number of pre-accepted corner and border points.
    pub fn boundary_count(&self) -> usize {
        self.boundary_count
    }

    pub fn status(&self) -> SamplingStatus {
        self.status
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Sample points with random generator seeded from settings.
///
/// # Examples
/// ```
/// use lowpoly_core::prelude::*;
///
/// let field = DensityField::uniform(64, 64, 1.0);
/// let settings = SamplingSettings {
///     target_point_count: Some(50),
///     points_separation: 6.0.into(),
///     random_seed: 42,
///     ..Default::default()
/// };
/// let a = sample_seeded(&field, &settings);
/// let b = sample_seeded(&field, &settings);
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 50);
/// assert_eq!(a.status(), SamplingStatus::Complete);
/// ```
pub fn sample_seeded(field: &DensityField, settings: &SamplingSettings) -> PointSet {
    let mut rng = StdRng::seed_from_u64(settings.random_seed);
    sample(field, settings, &mut rng)
}

/// Weighted dart throwing over density field.
///
/// Corners (and optionally evenly spaced border points) are accepted up front, then candidates
/// are drawn proportionally to density and accepted only when they keep the required separation
/// from every accepted point. Separation between two points is the larger of their local
/// separations, so it always honors the point lying in the sparser region.
///
/// # Arguments
/// * `field` - Density field.
/// * `settings` - Sampling settings.
/// * `rng` - Random generator owned by the caller.
///
/// # Returns
/// Points set, possibly smaller than target when attempts budget runs out.
pub fn sample<R>(field: &DensityField, settings: &SamplingSettings, rng: &mut R) -> PointSet
where
    R: Rng + ?Sized,
{
    let mut thrower = DartThrower::new(field, settings);
    thrower.seed_boundary(settings.border_points);
    let boundary_count = thrower.points.len();
    let target = settings
        .target_for(field.image_width(), field.image_height())
        .max(boundary_count);
    let budget = target.saturating_mul(settings.max_attempts_factor.max(1));
    let distribution = CellDistribution::new(field);
    let mut attempts = 0;
    while thrower.points.len() < target && attempts < budget {
        attempts += 1;
        let cell = distribution.pick(rng);
        let candidate = thrower.jitter_in_cell(cell, rng);
        thrower.try_accept(candidate);
    }
    let accepted = thrower.points.len();
    let status = if accepted < target {
        warn!(
            "Sampling budget exhausted after {} attempts: {} of {} points placed",
            attempts, accepted, target
        );
        SamplingStatus::BudgetExhausted { accepted, target }
    } else {
        SamplingStatus::Complete
    };
    debug!(
        "Sampled {} points ({} on boundary) in {} attempts",
        accepted, boundary_count, attempts
    );
    PointSet {
        points: thrower.points,
        radii: thrower.radii,
        boundary_count,
        status,
    }
}

/// Cumulative distribution of cell values used for inverse transform sampling.
struct CellDistribution {
    /// Prefix sums of cell values, empty when field has no mass.
    cumulative: Vec<f64>,
    count: usize,
}

impl CellDistribution {
    fn new(field: &DensityField) -> Self {
        let count = field.values().len();
        if field.is_degenerate() {
            return Self {
                cumulative: vec![],
                count,
            };
        }
        let mut total = 0.0f64;
        let cumulative = field
            .values()
            .iter()
            .map(|v| {
                total += *v as f64;
                total
            })
            .collect::<Vec<_>>();
        Self { cumulative, count }
    }

    /// Draws cell index proportionally to its value; uniformly for degenerate field.
    fn pick<R>(&self, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        match self.cumulative.last() {
            Some(total) => {
                let u = rng.gen::<f64>() * *total;
                self.cumulative
                    .partition_point(|c| *c <= u)
                    .min(self.cumulative.len() - 1)
            }
            None => rng.gen_range(0..self.count.max(1)),
        }
    }
}

struct DartThrower<'a> {
    field: &'a DensityField,
    settings: &'a SamplingSettings,
    max_x: Scalar,
    max_y: Scalar,
    grid: PointsGrid,
    points: Vec<Coord>,
    radii: Vec<Scalar>,
}

impl<'a> DartThrower<'a> {
    fn new(field: &'a DensityField, settings: &'a SamplingSettings) -> Self {
        let max_x = field.image_width().saturating_sub(1) as Scalar;
        let max_y = field.image_height().saturating_sub(1) as Scalar;
        Self {
            field,
            settings,
            max_x,
            max_y,
            grid: PointsGrid::new(max_x, max_y, settings.max_radius()),
            points: vec![],
            radii: vec![],
        }
    }

    fn radius_at(&self, point: Coord) -> Scalar {
        self.settings.radius(self.field.value_at_point(point))
    }

    fn push(&mut self, point: Coord, radius: Scalar) {
        self.grid.insert(self.points.len(), point);
        self.points.push(point);
        self.radii.push(radius);
    }

    /// Accepts corners and border points without separation checks.
    fn seed_boundary(&mut self, border_points: bool) {
        let (w, h) = (self.max_x, self.max_y);
        let mut boundary = vec![
            Coord::new(0.0, 0.0),
            Coord::new(w, 0.0),
            Coord::new(w, h),
            Coord::new(0.0, h),
        ];
        if border_points {
            let spacing = self.settings.max_radius().max(1.0);
            let hc = (w / spacing) as usize;
            let vc = (h / spacing) as usize;
            for i in 1..hc {
                let v = w * i as Scalar / hc as Scalar;
                boundary.push(Coord::new(v, 0.0));
                boundary.push(Coord::new(v, h));
            }
            for i in 1..vc {
                let v = h * i as Scalar / vc as Scalar;
                boundary.push(Coord::new(0.0, v));
                boundary.push(Coord::new(w, v));
            }
        }
        for point in boundary {
            if !self.points.contains(&point) {
                let radius = self.radius_at(point);
                self.push(point, radius);
            }
        }
    }

    fn jitter_in_cell<R>(&self, cell: usize, rng: &mut R) -> Coord
    where
        R: Rng + ?Sized,
    {
        let scale = self.field.scale() as Scalar;
        let col = (cell % self.field.columns().max(1)) as Scalar;
        let row = (cell / self.field.columns().max(1)) as Scalar;
        Coord::new(
            (col + rng.gen::<Scalar>()) * scale - 0.5,
            (row + rng.gen::<Scalar>()) * scale - 0.5,
        )
    }

    fn try_accept(&mut self, candidate: Coord) -> bool {
        if candidate.x <= 0.0
            || candidate.y <= 0.0
            || candidate.x >= self.max_x
            || candidate.y >= self.max_y
        {
            return false;
        }
        let radius = self.radius_at(candidate);
        let free = self.grid.neighbors(candidate).all(|i| {
            let separation = radius.max(self.radii[i]);
            candidate.sqr_distance(self.points[i]) >= separation * separation
        });
        if free {
            self.push(candidate, radius);
        }
        free
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(target: usize, separation: (Scalar, Scalar)) -> SamplingSettings {
        SamplingSettings {
            target_point_count: Some(target),
            points_separation: separation.into(),
            random_seed: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_corners_always_present() {
        let field = DensityField::uniform(50, 30, 0.3);
        let set = sample_seeded(&field, &settings(0, (5.0, 10.0)));
        let points = set.points();
        assert!(points.contains(&Coord::new(0.0, 0.0)));
        assert!(points.contains(&Coord::new(49.0, 0.0)));
        assert!(points.contains(&Coord::new(49.0, 29.0)));
        assert!(points.contains(&Coord::new(0.0, 29.0)));
        assert_eq!(set.len(), set.boundary_count());
        assert_eq!(set.status(), SamplingStatus::Complete);
    }

    #[test]
    fn test_border_points_are_evenly_spaced() {
        let field = DensityField::uniform(101, 51, 1.0);
        let set = sample_seeded(&field, &settings(0, (10.0, 10.0)));
        let top = set
            .points()
            .iter()
            .filter(|p| p.y == 0.0)
            .map(|p| p.x)
            .collect::<Vec<_>>();
        assert_eq!(top.len(), 11);
        assert!(top.iter().all(|x| (x / 10.0 - (x / 10.0).round()).abs() < 1.0e-4));
        let without_border = SamplingSettings {
            border_points: false,
            ..settings(0, (10.0, 10.0))
        };
        assert_eq!(sample_seeded(&field, &without_border).boundary_count(), 4);
    }

    #[test]
    fn test_points_stay_in_bounds_and_spaced() {
        let field = DensityField::uniform(80, 60, 0.5);
        let set = sample_seeded(&field, &settings(500, (3.0, 9.0)));
        let points = set.points();
        for (i, a) in points.iter().enumerate() {
            assert!(a.x >= 0.0 && a.x <= 79.0 && a.y >= 0.0 && a.y <= 59.0);
            for (j, b) in points.iter().enumerate().skip(i + 1) {
                if i >= set.boundary_count() || j >= set.boundary_count() {
                    let separation = set.radii()[i].max(set.radii()[j]);
                    assert!(a.distance(*b) >= separation - 1.0e-3);
                }
            }
        }
    }

    #[test]
    fn test_budget_exhaustion_is_partial_success() {
        let field = DensityField::uniform(40, 40, 1.0);
        let set = sample_seeded(&field, &settings(10_000, (8.0, 8.0)));
        assert!(set.len() < 10_000);
        assert_eq!(
            set.status(),
            SamplingStatus::BudgetExhausted {
                accepted: set.len(),
                target: 10_000,
            }
        );
    }

    #[test]
    fn test_zero_density_is_uniform() {
        let field = DensityField::uniform(64, 64, 0.0);
        assert!(field.is_degenerate());
        let set = sample_seeded(&field, &settings(60, (5.0, 5.0)));
        assert!(set.len() > set.boundary_count());
    }

    #[test]
    fn test_different_seeds_differ() {
        let field = DensityField::uniform(64, 64, 1.0);
        let a = sample_seeded(&field, &settings(150, (4.0, 4.0)));
        let b = sample_seeded(
            &field,
            &SamplingSettings {
                random_seed: 4,
                ..settings(150, (4.0, 4.0))
            },
        );
        assert_ne!(a.points(), b.points());
    }

    #[test]
    fn test_pick_cell_skips_empty_cells() {
        let field = DensityField::new(4, 1, 1, vec![0.0, 1.0, 0.0, 0.5]).unwrap();
        let distribution = CellDistribution::new(&field);
        let mut rng = StdRng::seed_from_u64(1);
        let mut counts = [0usize; 4];
        for _ in 0..3000 {
            counts[distribution.pick(&mut rng)] += 1;
        }
        assert_eq!(counts[0], 0);
        assert_eq!(counts[2], 0);
        assert!(counts[1] > counts[3]);
    }
}
