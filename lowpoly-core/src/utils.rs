use crate::Scalar;

#[cfg(feature = "parallel")]
macro_rules! into_iter {
    ($v:expr) => {
        $v.into_par_iter()
    };
}

#[cfg(not(feature = "parallel"))]
macro_rules! into_iter {
    ($v:expr) => {
        $v.into_iter()
    };
}

#[cfg(feature = "parallel")]
macro_rules! iter {
    ($v:expr) => {
        $v.par_iter()
    };
}

#[cfg(not(feature = "parallel"))]
macro_rules! iter {
    ($v:expr) => {
        $v.iter()
    };
}

#[inline]
pub(crate) fn lerp(value: Scalar, from: Scalar, to: Scalar) -> Scalar {
    from + (to - from) * value.max(0.0).min(1.0)
}

/// Rescales values into range from 0 to 1. Buffers without meaningful range become zeros.
pub(crate) fn min_max_normalize(values: &mut [Scalar]) {
    let (min, max) = values
        .iter()
        .fold((Scalar::INFINITY, Scalar::NEG_INFINITY), |(min, max), v| {
            (min.min(*v), max.max(*v))
        });
    let range = max - min;
    if !range.is_finite() || range <= Scalar::EPSILON {
        values.iter_mut().for_each(|v| *v = 0.0);
    } else {
        values.iter_mut().for_each(|v| *v = (*v - min) / range);
    }
}
