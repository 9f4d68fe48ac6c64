use crate::{color::ColoredTriangle, mesh::Mesh, sampler::SamplingStatus};
use serde::{Deserialize, Serialize};

/// Result of a single low-poly generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowPolyArt {
    /// Source image width.
    pub width: usize,
    /// Source image height.
    pub height: usize,
    pub mesh: Mesh,
    /// Colored triangles in mesh triangles order.
    pub triangles: Vec<ColoredTriangle>,
    pub sampling_status: SamplingStatus,
}
