//! Geo-anchor placer
//!
//! Turns released gate slots into placed, registered instances: offset
//! arithmetic in degree space, projection to world space, instantiation
//! into the content graph, and registration of the original pose.

use crate::geo::{PlacementOffset, Projector};
use crate::scene::graph::ContentGraph;

use super::gate::PlacementGate;
use super::registry::{AnchorId, ContentRegistry};

/// Places each offset slot exactly once, whenever the gate releases it.
pub struct GeoAnchorPlacer {
    offsets: Vec<PlacementOffset>,
    distance_multiplier: f64,
    height_offset: f32,
    /// Per-slot placement record; a slot never places twice.
    placed: Vec<Option<AnchorId>>,
    origin_set: bool,
}

impl GeoAnchorPlacer {
    pub fn new(offsets: Vec<PlacementOffset>, distance_multiplier: f64, height_offset: f32) -> Self {
        let placed = vec![None; offsets.len()];
        Self {
            offsets,
            distance_multiplier,
            height_offset,
            placed,
            origin_set: false,
        }
    }

    /// Drain the gate and place everything it releases.
    ///
    /// Safe to call from every trigger point (fix arrival, each load
    /// completion, the frame tick): the gate releases each slot once and
    /// the per-slot record guards against duplicates beyond that.
    pub fn place_ready(
        &mut self,
        gate: &mut PlacementGate,
        graph: &mut ContentGraph,
        registry: &mut ContentRegistry,
        projector: &mut dyn Projector,
    ) -> Vec<(usize, AnchorId)> {
        let Some((fix, slots)) = gate.take_ready() else {
            return Vec::new();
        };

        if !self.origin_set {
            projector.set_origin(&fix);
            self.origin_set = true;
        }

        let mut placed = Vec::with_capacity(slots.len());
        for ready in slots {
            let index = ready.slot;
            let Some(offset) = self.offsets.get(index) else {
                log::warn!("gate released unknown slot {}", index);
                continue;
            };
            if let Some(existing) = self.placed[index] {
                log::warn!("slot {} already placed as {:?}", index, existing);
                continue;
            }

            let target = offset.target(&fix, self.distance_multiplier);
            let position = projector.project(target.longitude, target.latitude, self.height_offset);

            let root = graph.instantiate(&ready.blueprint, position);
            let transform = graph
                .get(root)
                .map(|n| n.local_transform.clone())
                .unwrap_or_default();
            let id = registry.register(
                root,
                &transform,
                ready.blueprint.appearance.color,
                ready.blueprint.hover_spin,
            );
            graph.set_anchor(root, id);
            self.placed[index] = Some(id);

            log::info!(
                "anchor {:?} placed: lat {:.6}, lon {:.6} -> world {:?}",
                id,
                target.latitude,
                target.longitude,
                position
            );
            placed.push((index, id));
        }

        placed
    }

    /// Number of slots placed so far.
    pub fn placed_count(&self) -> usize {
        self.placed.iter().filter(|p| p.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{ContentKind, GeoFix, LocalTangentPlane};
    use crate::math::Aabb;
    use crate::scene::node::{Appearance, ContentBlueprint, MeshBounds};
    use glam::Vec3;

    fn box_offsets() -> Vec<PlacementOffset> {
        vec![
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
        ]
    }

    fn blueprint(name: &str, color: [f32; 3]) -> ContentBlueprint {
        ContentBlueprint {
            name: name.into(),
            appearance: Appearance { color, ..Default::default() },
            scale: Vec3::ONE,
            meshes: vec![MeshBounds {
                name: "box".into(),
                bounds: Aabb::cube(10.0),
            }],
            hover_spin: None,
        }
    }

    fn setup() -> (PlacementGate, ContentGraph, ContentRegistry, LocalTangentPlane) {
        (
            PlacementGate::new(),
            ContentGraph::new(),
            ContentRegistry::new(),
            LocalTangentPlane::new(),
        )
    }

    #[test]
    fn test_places_and_registers_each_slot() {
        let (mut gate, mut graph, mut registry, mut proj) = setup();
        let mut placer = GeoAnchorPlacer::new(box_offsets(), 0.8, 0.0);

        gate.set_fix(GeoFix::new(51.5, -0.1));
        gate.offer(0, blueprint("red", [1.0, 0.0, 0.0]));
        gate.offer(1, blueprint("yellow", [1.0, 1.0, 0.0]));

        let placed = placer.place_ready(&mut gate, &mut graph, &mut registry, &mut proj);
        assert_eq!(placed.len(), 2);
        assert_eq!(registry.len(), 2);
        assert_eq!(placer.placed_count(), 2);

        // anchors sit north and south of the viewer at equal distance
        let a = registry.get(placed[0].1).unwrap().original_position;
        let b = registry.get(placed[1].1).unwrap().original_position;
        assert!(a.z < 0.0 && b.z > 0.0);
        assert!((a.z + b.z).abs() < 1e-3);
    }

    #[test]
    fn test_double_trigger_places_once() {
        let (mut gate, mut graph, mut registry, mut proj) = setup();
        let mut placer = GeoAnchorPlacer::new(box_offsets(), 0.8, 0.0);

        gate.set_fix(GeoFix::new(51.5, -0.1));
        gate.offer(0, blueprint("red", [1.0, 0.0, 0.0]));

        let first = placer.place_ready(&mut gate, &mut graph, &mut registry, &mut proj);
        // second trigger: another fix event arrives, gate has nothing new
        gate.set_fix(GeoFix::new(48.8, 2.3));
        let second = placer.place_ready(&mut gate, &mut graph, &mut registry, &mut proj);

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_nothing_happens_without_fix() {
        let (mut gate, mut graph, mut registry, mut proj) = setup();
        let mut placer = GeoAnchorPlacer::new(box_offsets(), 0.8, 0.0);

        gate.offer(0, blueprint("red", [1.0, 0.0, 0.0]));
        let placed = placer.place_ready(&mut gate, &mut graph, &mut registry, &mut proj);

        assert!(placed.is_empty());
        assert_eq!(registry.len(), 0);
        assert_eq!(gate.waiting(), 1);
    }

    #[test]
    fn test_registered_anchor_resolves_from_graph() {
        let (mut gate, mut graph, mut registry, mut proj) = setup();
        let mut placer = GeoAnchorPlacer::new(box_offsets(), 0.8, 0.0);

        gate.set_fix(GeoFix::new(51.5, -0.1));
        gate.offer(0, blueprint("red", [1.0, 0.0, 0.0]));
        let placed = placer.place_ready(&mut gate, &mut graph, &mut registry, &mut proj);

        let (_, id) = placed[0];
        let root = registry.get(id).unwrap().root;
        assert_eq!(graph.anchor_of(root), Some(id));
    }
}
