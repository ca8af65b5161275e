//! Session configuration

use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::geo::{ContentKind, PlacementOffset};
use crate::interact::{AnimatorConfig, HoverConfig};

/// Full configuration for one AR session.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Scales every placement offset; smaller brings anchors closer.
    pub distance_multiplier: f64,
    /// Height of anchored content above the viewer plane, in world units.
    pub height_offset: f32,
    /// Maximum simultaneous asset fetches.
    pub max_concurrent_loads: usize,
    /// Hover/pull animation parameters.
    pub animator: AnimatorConfig,
    /// Hit-testing parameters.
    pub hover: HoverConfig,
    /// What to place, and where, relative to the first fix.
    pub offsets: Vec<PlacementOffset>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            distance_multiplier: 0.8,
            height_offset: 0.0,
            max_concurrent_loads: 4,
            animator: AnimatorConfig::default(),
            hover: HoverConfig::default(),
            // one translucent box on each side of the viewer
            offsets: vec![
                PlacementOffset {
                    lat_delta: 0.001,
                    lon_delta: 0.0,
                    kind: ContentKind::Box { size: 10.0, color: [1.0, 0.0, 0.0] },
                },
                PlacementOffset {
                    lat_delta: -0.001,
                    lon_delta: 0.0,
                    kind: ContentKind::Box { size: 10.0, color: [1.0, 1.0, 0.0] },
                },
                PlacementOffset {
                    lat_delta: 0.0,
                    lon_delta: -0.001,
                    kind: ContentKind::Box { size: 10.0, color: [0.0, 1.0, 1.0] },
                },
                PlacementOffset {
                    lat_delta: 0.0,
                    lon_delta: 0.001,
                    kind: ContentKind::Box { size: 10.0, color: [0.0, 1.0, 0.0] },
                },
            ],
        }
    }
}

impl SessionConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| crate::core::Error::Config(e.to_string()))
    }
}
