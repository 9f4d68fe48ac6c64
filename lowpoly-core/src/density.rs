use crate::{
    coord::Coord,
    error::{LowPolyError, Result},
    settings::DensitySettings,
    source::SourceImage,
    utils::min_max_normalize,
    Scalar,
};
use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const SOBEL_KERNEL_X: [[Scalar; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: [[Scalar; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Channels used to measure image gradients.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradientSource {
    /// Gradient of the luminosity.
    #[default]
    Luma,
    /// Combined gradient of red, green and blue channels.
    Rgb,
}

/// Sampling weight field aligned to the source image, values in range from 0 to 1.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityField {
    columns: usize,
    rows: usize,
    scale: usize,
    image_width: usize,
    image_height: usize,
    data: Vec<Scalar>,
}

impl DensityField {
    /// Create new density field.
    ///
    /// # Arguments
    /// * `image_width` - Width of the image the field covers.
    /// * `image_height` - Height of the image the field covers.
    /// * `scale` - Size of a cell in pixels.
    /// * `data` - Row-major cell values.
    ///
    /// # Returns
    /// Density field or error.
    ///
    /// # Examples
    /// ```
    /// use lowpoly_core::prelude::*;
    ///
    /// assert!(DensityField::new(4, 4, 2, vec![0.0, 0.5, 1.0, 0.2]).is_ok());
    /// assert_eq!(
    ///     DensityField::new(3, 3, 2, vec![0.0; 3]),
    ///     Err(LowPolyError::WrongDataLength(3, 4)),
    /// );
    /// ```
    pub fn new(
        image_width: usize,
        image_height: usize,
        scale: usize,
        data: Vec<Scalar>,
    ) -> Result<Self> {
        let scale = scale.max(1);
        let columns = (image_width + scale - 1) / scale;
        let rows = (image_height + scale - 1) / scale;
        if data.len() != columns * rows {
            return Err(LowPolyError::WrongDataLength(data.len(), columns * rows));
        }
        if data.iter().any(|v| !v.is_finite() || *v < 0.0 || *v > 1.0) {
            return Err(LowPolyError::InvalidInput(
                "density values must be finite and in range from 0 to 1".to_owned(),
            ));
        }
        Ok(Self {
            columns,
            rows,
            scale,
            image_width,
            image_height,
            data,
        })
    }

    /// Create density field with the same value in every cell.
    pub fn uniform(image_width: usize, image_height: usize, value: Scalar) -> Self {
        Self {
            columns: image_width,
            rows: image_height,
            scale: 1,
            image_width,
            image_height,
            data: vec![value.max(0.0).min(1.0); image_width * image_height],
        }
    }

    /// Returns cell size in pixels.
    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Returns number of cell columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Returns number of cell rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn image_width(&self) -> usize {
        self.image_width
    }

    pub fn image_height(&self) -> usize {
        self.image_height
    }

    /// Returns values buffer.
    pub fn values(&self) -> &[Scalar] {
        &self.data
    }

    /// Returns sum of all values.
    pub fn total(&self) -> Scalar {
        self.data.iter().sum()
    }

    /// Returns true if field has no positive mass and sampling should fall back to uniform.
    pub fn is_degenerate(&self) -> bool {
        self.total() <= 0.0
    }

    /// Returns value of given cell or 0 if out of bounds.
    pub fn value(&self, col: usize, row: usize) -> Scalar {
        if col < self.columns && row < self.rows {
            self.data[row * self.columns + col]
        } else {
            0.0
        }
    }

    /// Returns value of the cell containing the pixel nearest to given point, clamped to bounds.
    ///
    /// # Arguments
    /// * `point` - Position in pixel space.
    pub fn value_at_point(&self, point: Coord) -> Scalar {
        if self.data.is_empty() {
            return 0.0;
        }
        let scale = self.scale as isize;
        let col = ((point.x.round() as isize) / scale).clamp(0, self.columns as isize - 1);
        let row = ((point.y.round() as isize) / scale).clamp(0, self.rows as isize - 1);
        self.data[row as usize * self.columns + col as usize]
    }

    /// Returns iterator over `(column, row, value)` of every cell.
    pub fn value_iter(&self) -> impl Iterator<Item = (usize, usize, Scalar)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (i % self.columns, i / self.columns, *v))
    }
}

/// Build density field from image gradients and local intensity variance.
///
/// # Arguments
/// * `image` - Source image.
/// * `settings` - Density field settings.
///
/// # Returns
/// Density field or error.
///
/// # Examples
/// ```
/// use lowpoly_core::prelude::*;
///
/// let image = SourceImage::filled(8, 8, Rgb::new(128, 128, 128));
/// let field = build_density(&image, &DensitySettings::default()).unwrap();
/// assert!(field.values().iter().all(|v| *v == 0.01));
/// assert!(build_density(&SourceImage::filled(0, 8, Rgb::default()), &Default::default()).is_err());
/// ```
pub fn build_density(image: &SourceImage, settings: &DensitySettings) -> Result<DensityField> {
    if image.is_empty() {
        return Err(LowPolyError::InvalidInput(format!(
            "image has zero area ({}x{})",
            image.width(),
            image.height()
        )));
    }
    let w = image.width();
    let h = image.height();
    let smooth = |values: Vec<Scalar>| {
        if settings.denoise_radius > 0 {
            box_blur(&values, w, h, settings.denoise_radius)
        } else {
            values
        }
    };
    let luma = smooth(image.luma_values());

    let mut gradient = match settings.gradient_source {
        GradientSource::Luma => sobel_squared(&luma, w, h),
        GradientSource::Rgb => {
            let mut result = vec![0.0; w * h];
            for channel in 0..3 {
                let values = smooth(image.channel_values(channel));
                for (r, v) in result.iter_mut().zip(sobel_squared(&values, w, h)) {
                    *r += v;
                }
            }
            result
        }
    };
    gradient.iter_mut().for_each(|v| *v = v.sqrt());
    min_max_normalize(&mut gradient);

    let variance_weight = settings.variance_weight.max(0.0).min(1.0);
    let mut raw = if variance_weight > 0.0 {
        let mut variance = local_variance(&luma, w, h, settings.variance_radius);
        min_max_normalize(&mut variance);
        gradient
            .into_iter()
            .zip(variance)
            .map(|(g, v)| (1.0 - variance_weight) * g + variance_weight * v)
            .collect::<Vec<_>>()
    } else {
        gradient
    };
    min_max_normalize(&mut raw);
    let gamma = settings.gamma;
    if gamma.is_finite() && gamma > 0.0 && gamma != 1.0 {
        raw.iter_mut().for_each(|v| *v = v.powf(gamma));
    }

    let floor = settings.density_floor.max(0.0).min(1.0);
    raw.iter_mut()
        .for_each(|v| *v = (floor + (1.0 - floor) * *v).min(1.0));

    let scale = settings.scale.max(1);
    let data = if scale > 1 {
        let mut data = downsample(&raw, w, h, scale);
        data.iter_mut().for_each(|v| *v = v.min(1.0));
        data
    } else {
        raw
    };
    let field = DensityField::new(w, h, scale, data)?;
    debug!(
        "Density field built: {}x{} cells, scale {}, total mass {}",
        field.columns(),
        field.rows(),
        field.scale(),
        field.total()
    );
    Ok(field)
}

/// Squared Sobel gradient magnitude with border clamping.
fn sobel_squared(values: &[Scalar], w: usize, h: usize) -> Vec<Scalar> {
    into_iter!(0..(w * h))
        .map(|i| {
            let col = i % w;
            let row = i / w;
            let cols = [col.saturating_sub(1), col, (col + 1).min(w - 1)];
            let rows = [row.saturating_sub(1), row, (row + 1).min(h - 1)];
            let mut gx = 0.0;
            let mut gy = 0.0;
            for (ky, y) in rows.iter().enumerate() {
                for (kx, x) in cols.iter().enumerate() {
                    let v = values[y * w + x];
                    gx += v * SOBEL_KERNEL_X[ky][kx];
                    gy += v * SOBEL_KERNEL_Y[ky][kx];
                }
            }
            gx * gx + gy * gy
        })
        .collect()
}

/// Summed-area table of a row-major buffer.
struct SummedArea {
    stride: usize,
    table: Vec<f64>,
}

impl SummedArea {
    fn new<F>(values: &[Scalar], w: usize, h: usize, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let stride = w + 1;
        let mut table = vec![0.0f64; stride * (h + 1)];
        for row in 0..h {
            let mut line = 0.0;
            for col in 0..w {
                line += f(values[row * w + col] as f64);
                let i = (row + 1) * stride + col + 1;
                table[i] = table[i - stride] + line;
            }
        }
        Self { stride, table }
    }

    /// Sum over pixels in `[fx, tx) x [fy, ty)`.
    fn sum(&self, fx: usize, fy: usize, tx: usize, ty: usize) -> f64 {
        let t = &self.table;
        let s = self.stride;
        t[ty * s + tx] - t[fy * s + tx] - t[ty * s + fx] + t[fy * s + fx]
    }
}

/// Window of pixels within `radius` of given pixel, clipped to image bounds.
#[inline]
fn window(i: usize, w: usize, h: usize, radius: usize) -> (usize, usize, usize, usize) {
    let col = i % w;
    let row = i / w;
    (
        col.saturating_sub(radius),
        row.saturating_sub(radius),
        (col + radius + 1).min(w),
        (row + radius + 1).min(h),
    )
}

/// Mean filter over a `(2 * radius + 1)` square window.
fn box_blur(values: &[Scalar], w: usize, h: usize, radius: usize) -> Vec<Scalar> {
    let sum = SummedArea::new(values, w, h, |v| v);
    into_iter!(0..(w * h))
        .map(|i| {
            let (fx, fy, tx, ty) = window(i, w, h, radius);
            let count = ((tx - fx) * (ty - fy)) as f64;
            (sum.sum(fx, fy, tx, ty) / count) as Scalar
        })
        .collect()
}

/// Intensity variance in a `(2 * radius + 1)` square window, computed from summed-area tables.
fn local_variance(values: &[Scalar], w: usize, h: usize, radius: usize) -> Vec<Scalar> {
    let sum = SummedArea::new(values, w, h, |v| v);
    let sqr_sum = SummedArea::new(values, w, h, |v| v * v);
    into_iter!(0..(w * h))
        .map(|i| {
            let (fx, fy, tx, ty) = window(i, w, h, radius);
            let count = ((tx - fx) * (ty - fy)) as f64;
            let mean = sum.sum(fx, fy, tx, ty) / count;
            let sqr_mean = sqr_sum.sum(fx, fy, tx, ty) / count;
            let variance = sqr_mean - mean * mean;
            if variance > 1.0e-12 {
                variance as Scalar
            } else {
                0.0
            }
        })
        .collect()
}

/// Averages `scale` x `scale` pixel blocks into cells.
fn downsample(values: &[Scalar], w: usize, h: usize, scale: usize) -> Vec<Scalar> {
    let columns = (w + scale - 1) / scale;
    let rows = (h + scale - 1) / scale;
    (0..(columns * rows))
        .map(|i| {
            let fx = (i % columns) * scale;
            let fy = (i / columns) * scale;
            let tx = (fx + scale).min(w);
            let ty = (fy + scale).min(h);
            let mut total = 0.0;
            for y in fy..ty {
                for x in fx..tx {
                    total += values[y * w + x];
                }
            }
            total / ((tx - fx) * (ty - fy)) as Scalar
        })
        .collect()
}
