//! Geographic coordinates, placement offsets, and content variants

pub mod projection;

pub use projection::{LocalTangentPlane, Projector};

use serde::{Deserialize, Serialize};

/// Sub-scaling factor applied to every placement offset on top of the
/// session's distance multiplier. Anchors land at half the authored delta.
pub const OFFSET_SUBSCALE: f64 = 0.5;

/// A GPS fix in degrees.
///
/// The engine consumes exactly one fix per session; the location service
/// keeps emitting them, but everything after the first is ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Visual configuration applied to a loaded model before placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Uniform scale applied to the model
    pub scale: f32,
    /// Material opacity (1.0 = opaque)
    pub opacity: f32,
    /// Whether the content is depth-tested against the real-world feed
    pub depth_test: bool,
    /// Optional color tint (linear RGB)
    pub tint: Option<[f32; 3]>,
    /// Continuous Y rotation in radians per frame while hovered
    pub hover_spin: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            opacity: 1.0,
            depth_test: true,
            tint: None,
            hover_spin: None,
        }
    }
}

/// Which kind of content a placement slot produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ContentKind {
    /// A colored unit box, ready without any asset load
    Box { size: f32, color: [f32; 3] },
    /// An asset-loaded model (hierarchical, multi-mesh)
    Model { url: String, config: ModelConfig },
}

/// A fixed, author-defined angular offset from the first fix, plus the
/// content variant to place there. Static configuration, not derived data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementOffset {
    pub lat_delta: f64,
    pub lon_delta: f64,
    pub kind: ContentKind,
}

impl PlacementOffset {
    /// Target coordinate for this offset relative to the captured fix.
    ///
    /// `target = fix + delta * distance_multiplier * OFFSET_SUBSCALE`,
    /// a plain additive delta in degree space.
    pub fn target(&self, fix: &GeoFix, distance_multiplier: f64) -> GeoFix {
        GeoFix {
            latitude: fix.latitude + self.lat_delta * distance_multiplier * OFFSET_SUBSCALE,
            longitude: fix.longitude + self.lon_delta * distance_multiplier * OFFSET_SUBSCALE,
        }
    }
}
