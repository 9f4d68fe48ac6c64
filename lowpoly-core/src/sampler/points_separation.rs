use crate::{utils::lerp, Scalar};
use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseFloatError, ops::Range, str::FromStr};

/// Point separation source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointsSeparation {
    /// Each point has constant point separation.
    Constant(Scalar),
    /// Each point has local point separation that depends on the density value.
    /// Density 0 maps to max and 1 maps to min.
    /// `(min, max)`
    DensityMapping(Scalar, Scalar),
}

impl PointsSeparation {
    /// Returns maximum of possible values.
    pub fn maximum(&self) -> Scalar {
        match self {
            Self::Constant(v) => *v,
            Self::DensityMapping(f, t) => f.max(*t),
        }
    }

    /// Returns minimum of possible values.
    pub fn minimum(&self) -> Scalar {
        match self {
            Self::Constant(v) => *v,
            Self::DensityMapping(f, t) => f.min(*t),
        }
    }

    /// Returns separation required at given density.
    ///
    /// # Examples
    /// ```
    /// use lowpoly_core::prelude::*;
    ///
    /// let separation = PointsSeparation::DensityMapping(2.0, 10.0);
    /// assert_eq!(separation.radius(0.0), 10.0);
    /// assert_eq!(separation.radius(0.5), 6.0);
    /// assert_eq!(separation.radius(1.0), 2.0);
    /// assert_eq!(PointsSeparation::Constant(3.0).radius(0.7), 3.0);
    /// ```
    pub fn radius(&self, density: Scalar) -> Scalar {
        match self {
            Self::Constant(v) => *v,
            Self::DensityMapping(f, t) => lerp(density, *t, *f),
        }
    }
}

impl From<Scalar> for PointsSeparation {
    fn from(value: Scalar) -> Self {
        Self::Constant(value)
    }
}

impl From<(Scalar, Scalar)> for PointsSeparation {
    fn from(value: (Scalar, Scalar)) -> Self {
        Self::DensityMapping(value.0, value.1)
    }
}

impl From<[Scalar; 2]> for PointsSeparation {
    fn from(value: [Scalar; 2]) -> Self {
        Self::DensityMapping(value[0], value[1])
    }
}

impl From<Range<Scalar>> for PointsSeparation {
    fn from(value: Range<Scalar>) -> Self {
        Self::DensityMapping(value.start, value.end)
    }
}

impl FromStr for PointsSeparation {
    type Err = ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(found) = s.find("..") {
            let f = &s[..found];
            let t = &s[(found + 2)..];
            Ok(Self::DensityMapping(
                f.trim().parse::<Scalar>()?,
                t.trim().parse::<Scalar>()?,
            ))
        } else {
            Ok(Self::Constant(s.trim().parse::<Scalar>()?))
        }
    }
}

impl fmt::Display for PointsSeparation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => write!(f, "{}", v),
            Self::DensityMapping(from, to) => write!(f, "{}..{}", from, to),
        }
    }
}
