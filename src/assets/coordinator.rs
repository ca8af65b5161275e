//! Load coordination
//!
//! One slot per placement offset. Primitive slots are ready immediately;
//! model slots become ready when their asset loads, picking up the slot's
//! fixed visual configuration on the way. A failed load parks its slot
//! permanently; there is no retry and no fallback asset, so that content
//! simply never appears.

use std::collections::HashMap;

use glam::Vec3;

use crate::anchor::PlacementGate;
use crate::geo::{ContentKind, ModelConfig, PlacementOffset};
use crate::math::Aabb;
use crate::scene::node::{Appearance, ContentBlueprint, MeshBounds};

use super::loader::{AssetData, AssetLoader, LoadEvent};

/// Opacity of primitive box content over the camera feed.
const BOX_OPACITY: f32 = 0.8;
/// Anchored content draws above the passthrough.
const ANCHOR_RENDER_ORDER: i32 = 1;

/// Load state of one placement slot.
#[derive(Clone, Debug, PartialEq)]
pub enum SlotState {
    /// Waiting for its asset
    Pending,
    /// Prepared and offered to the placement gate
    Ready,
    /// Load failed; this slot never appears
    Failed(String),
}

struct Slot {
    kind: ContentKind,
    state: SlotState,
}

/// Drives every slot from its content kind to a gate offer (or a dead end).
pub struct LoadCoordinator {
    slots: Vec<Slot>,
    /// Slots waiting on each URL; one fetch can satisfy several slots.
    by_url: HashMap<String, Vec<usize>>,
}

impl LoadCoordinator {
    pub fn new(offsets: &[PlacementOffset]) -> Self {
        let mut by_url: HashMap<String, Vec<usize>> = HashMap::new();
        let slots = offsets
            .iter()
            .enumerate()
            .map(|(index, offset)| {
                if let ContentKind::Model { url, .. } = &offset.kind {
                    by_url.entry(url.clone()).or_default().push(index);
                }
                Slot {
                    kind: offset.kind.clone(),
                    state: SlotState::Pending,
                }
            })
            .collect();

        Self { slots, by_url }
    }

    /// Offer every primitive slot to the gate; they need no asset.
    pub fn offer_primitives(&mut self, gate: &mut PlacementGate) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let ContentKind::Box { size, color } = slot.kind {
                gate.offer(index, box_blueprint(index, size, color));
                slot.state = SlotState::Ready;
            }
        }
    }

    /// Request the asset of every model slot.
    pub fn request_models(&mut self, loader: &mut AssetLoader) {
        for slot in &self.slots {
            if let ContentKind::Model { url, .. } = &slot.kind {
                loader.request(url);
            }
        }
    }

    /// Feed one loader event through the slot state machine.
    pub fn handle_event(&mut self, event: LoadEvent, gate: &mut PlacementGate) {
        match event {
            LoadEvent::Progress { url, ratio } => {
                log::debug!("loading {}: {:.0}%", url, ratio * 100.0);
            }
            LoadEvent::Loaded { url, asset } => {
                for index in self.by_url.get(&url).cloned().unwrap_or_default() {
                    let slot = &mut self.slots[index];
                    if slot.state != SlotState::Pending {
                        continue;
                    }
                    if let ContentKind::Model { config, .. } = &slot.kind {
                        gate.offer(index, model_blueprint(index, config, &asset));
                        slot.state = SlotState::Ready;
                    }
                }
            }
            LoadEvent::Failed { url, error } => {
                log::error!(
                    "{}",
                    crate::core::Error::AssetLoad { url: url.clone(), reason: error.clone() }
                );
                for index in self.by_url.get(&url).cloned().unwrap_or_default() {
                    let slot = &mut self.slots[index];
                    if slot.state == SlotState::Pending {
                        slot.state = SlotState::Failed(error.clone());
                    }
                }
            }
        }
    }

    /// State of one slot.
    pub fn state(&self, index: usize) -> Option<&SlotState> {
        self.slots.get(index).map(|s| &s.state)
    }

    /// Number of slots still waiting on assets.
    pub fn pending_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.state == SlotState::Pending)
            .count()
    }

    /// Number of permanently failed slots.
    pub fn failed_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s.state, SlotState::Failed(_)))
            .count()
    }
}

fn box_blueprint(index: usize, size: f32, color: [f32; 3]) -> ContentBlueprint {
    ContentBlueprint {
        name: format!("box-{index}"),
        appearance: Appearance {
            color,
            opacity: BOX_OPACITY,
            depth_test: false,
            render_order: ANCHOR_RENDER_ORDER,
        },
        scale: Vec3::ONE,
        meshes: vec![MeshBounds {
            name: "box".into(),
            bounds: Aabb::cube(size),
        }],
        hover_spin: None,
    }
}

fn model_blueprint(index: usize, config: &ModelConfig, asset: &AssetData) -> ContentBlueprint {
    ContentBlueprint {
        name: format!("model-{index}"),
        appearance: Appearance {
            color: config.tint.unwrap_or([1.0, 1.0, 1.0]),
            opacity: config.opacity,
            depth_test: config.depth_test,
            render_order: ANCHOR_RENDER_ORDER,
        },
        scale: Vec3::splat(config.scale),
        meshes: asset.meshes.clone(),
        hover_spin: config.hover_spin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_offset(color: [f32; 3]) -> PlacementOffset {
        PlacementOffset {
            lat_delta: 0.001,
            lon_delta: 0.0,
            kind: ContentKind::Box { size: 10.0, color },
        }
    }

    fn model_offset(url: &str) -> PlacementOffset {
        PlacementOffset {
            lat_delta: 0.001,
            lon_delta: 0.0,
            kind: ContentKind::Model {
                url: url.into(),
                config: ModelConfig {
                    scale: 0.5,
                    opacity: 0.9,
                    depth_test: false,
                    tint: Some([0.2, 0.4, 0.8]),
                    hover_spin: Some(0.02),
                },
            },
        }
    }

    fn loaded(url: &str) -> LoadEvent {
        LoadEvent::Loaded {
            url: url.into(),
            asset: AssetData {
                url: url.into(),
                meshes: vec![
                    MeshBounds { name: "body".into(), bounds: Aabb::cube(2.0) },
                    MeshBounds { name: "head".into(), bounds: Aabb::cube(1.0) },
                ],
            },
        }
    }

    #[test]
    fn test_primitives_ready_without_assets() {
        let offsets = vec![box_offset([1.0, 0.0, 0.0]), box_offset([0.0, 1.0, 0.0])];
        let mut coordinator = LoadCoordinator::new(&offsets);
        let mut gate = PlacementGate::new();

        coordinator.offer_primitives(&mut gate);

        assert_eq!(gate.waiting(), 2);
        assert_eq!(coordinator.state(0), Some(&SlotState::Ready));
        assert_eq!(coordinator.pending_count(), 0);
    }

    #[test]
    fn test_model_readies_on_load_with_config_applied() {
        let offsets = vec![model_offset("models/a.glb")];
        let mut coordinator = LoadCoordinator::new(&offsets);
        let mut gate = PlacementGate::new();

        coordinator.handle_event(loaded("models/a.glb"), &mut gate);

        assert_eq!(coordinator.state(0), Some(&SlotState::Ready));
        let (_, slots) = {
            gate.set_fix(crate::geo::GeoFix::new(51.5, -0.1));
            gate.take_ready().unwrap()
        };
        let blueprint = &slots[0].blueprint;
        assert_eq!(blueprint.scale, Vec3::splat(0.5));
        assert_eq!(blueprint.appearance.opacity, 0.9);
        assert_eq!(blueprint.appearance.color, [0.2, 0.4, 0.8]);
        assert!(!blueprint.appearance.depth_test);
        assert_eq!(blueprint.hover_spin, Some(0.02));
        assert_eq!(blueprint.meshes.len(), 2);
    }

    #[test]
    fn test_out_of_order_completion_readies_both() {
        let offsets = vec![model_offset("models/a.glb"), model_offset("models/b.glb")];
        let mut coordinator = LoadCoordinator::new(&offsets);
        let mut gate = PlacementGate::new();

        // second slot's asset arrives first
        coordinator.handle_event(loaded("models/b.glb"), &mut gate);
        assert_eq!(coordinator.state(0), Some(&SlotState::Pending));
        assert_eq!(coordinator.state(1), Some(&SlotState::Ready));

        coordinator.handle_event(loaded("models/a.glb"), &mut gate);
        assert_eq!(coordinator.state(0), Some(&SlotState::Ready));
        assert_eq!(gate.waiting(), 2);
    }

    #[test]
    fn test_shared_url_satisfies_all_slots() {
        let offsets = vec![model_offset("models/a.glb"), model_offset("models/a.glb")];
        let mut coordinator = LoadCoordinator::new(&offsets);
        let mut gate = PlacementGate::new();

        coordinator.handle_event(loaded("models/a.glb"), &mut gate);

        assert_eq!(coordinator.state(0), Some(&SlotState::Ready));
        assert_eq!(coordinator.state(1), Some(&SlotState::Ready));
        assert_eq!(gate.waiting(), 2);
    }

    #[test]
    fn test_failure_parks_slot_permanently() {
        let offsets = vec![model_offset("models/a.glb")];
        let mut coordinator = LoadCoordinator::new(&offsets);
        let mut gate = PlacementGate::new();

        coordinator.handle_event(
            LoadEvent::Failed { url: "models/a.glb".into(), error: "404".into() },
            &mut gate,
        );
        assert_eq!(coordinator.failed_count(), 1);
        assert_eq!(gate.waiting(), 0);

        // a late success for the same URL does not resurrect the slot
        coordinator.handle_event(loaded("models/a.glb"), &mut gate);
        assert_eq!(coordinator.failed_count(), 1);
        assert_eq!(gate.waiting(), 0);
    }
}
