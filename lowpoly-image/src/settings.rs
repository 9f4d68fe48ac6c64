use lowpoly_core::source::Rgb;
use serde::{Deserialize, Serialize};

/// Settings of low-poly art rasterization.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Color of pixels not covered by any triangle.
    #[serde(default)]
    pub background: Rgb,
    /// Color of triangle edges. Edges are not drawn when not set.
    #[serde(default)]
    pub wireframe: Option<Rgb>,
    /// Color of mesh vertices. Vertices are not drawn when not set.
    #[serde(default)]
    pub points: Option<Rgb>,
}

impl RenderSettings {
    /// Debug overlay colors: green edges and red vertices.
    pub fn debug() -> Self {
        Self {
            wireframe: Some(Rgb::new(0, 255, 0)),
            points: Some(Rgb::new(255, 0, 0)),
            ..Default::default()
        }
    }
}
