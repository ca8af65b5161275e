//! Pose animation between anchored and pulled-forward targets
//!
//! Single-step exponential filter: each frame every instance moves a fixed
//! fraction of the way toward its current target. No velocity is carried
//! between frames; convergence depends on tick count, not wall-clock time,
//! unless time-scaled smoothing is enabled.

use serde::{Deserialize, Serialize};

use crate::anchor::{AnchorId, ContentRegistry};
use crate::core::viewer::ViewerPose;
use crate::scene::graph::ContentGraph;

/// How the smoothing factor relates to frame timing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Smoothing {
    /// `alpha` per tick, regardless of frame rate. Matches the original
    /// demos: animation speed varies with display refresh.
    PerFrame,
    /// Compensate for variable frame rate:
    /// `alpha' = 1 - (1 - alpha)^(dt / reference_dt)`.
    TimeScaled { reference_dt: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatorConfig {
    /// Fraction of the remaining distance covered per tick.
    pub alpha: f32,
    /// How far in front of the viewer a hovered instance settles, in world
    /// units.
    pub pull_distance: f32,
    pub smoothing: Smoothing,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            pull_distance: 20.0,
            smoothing: Smoothing::PerFrame,
        }
    }
}

pub struct PoseAnimator {
    config: AnimatorConfig,
}

impl PoseAnimator {
    pub fn new(config: AnimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    fn effective_alpha(&self, dt: f32) -> f32 {
        match self.config.smoothing {
            Smoothing::PerFrame => self.config.alpha,
            Smoothing::TimeScaled { reference_dt } => {
                if reference_dt <= 0.0 {
                    return self.config.alpha;
                }
                1.0 - (1.0 - self.config.alpha).powf(dt / reference_dt)
            }
        }
    }

    /// Advance every registered instance by one tick.
    ///
    /// The hovered instance eases toward a point `pull_distance` ahead of
    /// the viewer, keeping its scale and color; everything else eases back
    /// to its original pose, with color snapped immediately.
    pub fn step(
        &self,
        graph: &mut ContentGraph,
        registry: &mut ContentRegistry,
        viewer: &ViewerPose,
        hovered: Option<AnchorId>,
        frame: u64,
        dt: f32,
    ) {
        let alpha = self.effective_alpha(dt);
        let pull_target = viewer.position + viewer.forward() * self.config.pull_distance;

        let ids: Vec<AnchorId> = registry.anchors().to_vec();
        for id in ids {
            let Some(state) = registry.get_mut(id) else {
                continue;
            };
            let Some(node) = graph.get_mut(state.root) else {
                log::warn!("anchor {:?} root {:?} missing from graph", id, state.root);
                continue;
            };

            if hovered == Some(id) {
                // Bring the instance forward for inspection
                node.local_transform.position =
                    node.local_transform.position.lerp(pull_target, alpha);
                if let Some(spin) = state.hover_spin {
                    node.local_transform.rotation =
                        glam::Quat::from_rotation_y(spin) * node.local_transform.rotation;
                }
                state.last_hover_frame = Some(frame);
            } else {
                // Return to the anchored pose
                node.local_transform.position = node
                    .local_transform
                    .position
                    .lerp(state.original_position, alpha);
                node.local_transform.scale =
                    node.local_transform.scale.lerp(state.original_scale, alpha);
                node.appearance.color = state.original_color;
                if state.hover_spin.is_some() {
                    node.local_transform.rotation = node
                        .local_transform
                        .rotation
                        .slerp(state.original_rotation, alpha);
                }
            }
        }
    }
}

impl Default for PoseAnimator {
    fn default() -> Self {
        Self::new(AnimatorConfig::default())
    }
}
