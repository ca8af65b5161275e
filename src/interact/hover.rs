//! Hover detection via the center-crosshair ray
//!
//! Every frame a single ray is cast from the viewer along its forward
//! direction (never from touch or pointer input). The nearest intersection
//! across all registered instances wins, and a hit on a child mesh resolves
//! to its registered top-level ancestor. At most one instance is hovered
//! per frame.

use serde::{Deserialize, Serialize};

use crate::anchor::{AnchorId, ContentRegistry};
use crate::core::viewer::ViewerPose;
use crate::scene::graph::ContentGraph;
use crate::scene::node::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoverConfig {
    /// Test whole subtrees (multi-mesh models) instead of root nodes only.
    pub recursive: bool,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self { recursive: true }
    }
}

/// The winning intersection for a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverHit {
    /// Registered ancestor of the hit node.
    pub anchor: AnchorId,
    /// The node actually struck (a child mesh for hierarchical content).
    pub node: NodeId,
    pub distance: f32,
}

pub struct HoverDetector {
    config: HoverConfig,
}

impl HoverDetector {
    pub fn new(config: HoverConfig) -> Self {
        Self { config }
    }

    /// Find the hovered instance, if any.
    ///
    /// Candidates are tested in registration order; ties on distance keep
    /// that order. Expects world transforms to be current.
    pub fn detect(
        &self,
        graph: &ContentGraph,
        registry: &ContentRegistry,
        viewer: &ViewerPose,
    ) -> Option<HoverHit> {
        if registry.is_empty() {
            return None;
        }

        let roots: Vec<NodeId> = registry
            .anchors()
            .iter()
            .filter_map(|&id| registry.get(id).map(|s| s.root))
            .collect();

        let ray = viewer.center_ray();
        let hits = graph.intersect(&ray, &roots, self.config.recursive);

        hits.first().and_then(|hit| {
            let anchor = graph.anchor_of(hit.node)?;
            Some(HoverHit {
                anchor,
                node: hit.node,
                distance: hit.distance,
            })
        })
    }
}

impl Default for HoverDetector {
    fn default() -> Self {
        Self::new(HoverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Aabb;
    use crate::scene::node::{Appearance, ContentBlueprint, MeshBounds};
    use glam::Vec3;

    fn place_box(
        graph: &mut ContentGraph,
        registry: &mut ContentRegistry,
        position: Vec3,
        size: f32,
    ) -> AnchorId {
        let blueprint = ContentBlueprint {
            name: "box".into(),
            appearance: Appearance::default(),
            scale: Vec3::ONE,
            meshes: vec![MeshBounds {
                name: "box".into(),
                bounds: Aabb::cube(size),
            }],
            hover_spin: None,
        };
        let root = graph.instantiate(&blueprint, position);
        let transform = graph.get(root).unwrap().local_transform.clone();
        let id = registry.register(root, &transform, [1.0; 3], None);
        graph.set_anchor(root, id);
        id
    }

    fn place_model(
        graph: &mut ContentGraph,
        registry: &mut ContentRegistry,
        position: Vec3,
    ) -> AnchorId {
        let blueprint = ContentBlueprint {
            name: "statue".into(),
            appearance: Appearance::default(),
            scale: Vec3::ONE,
            meshes: vec![
                MeshBounds {
                    name: "body".into(),
                    bounds: Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0)),
                },
                MeshBounds {
                    name: "head".into(),
                    bounds: Aabb::new(Vec3::new(-0.5, 2.0, -0.5), Vec3::new(0.5, 3.0, 0.5)),
                },
            ],
            hover_spin: None,
        };
        let root = graph.instantiate(&blueprint, position);
        let transform = graph.get(root).unwrap().local_transform.clone();
        let id = registry.register(root, &transform, [1.0; 3], None);
        graph.set_anchor(root, id);
        id
    }

    #[test]
    fn test_empty_registry_no_hover() {
        let graph = ContentGraph::new();
        let registry = ContentRegistry::new();
        let detector = HoverDetector::default();

        assert!(detector.detect(&graph, &registry, &ViewerPose::default()).is_none());
    }

    #[test]
    fn test_nearest_of_two_wins() {
        let mut graph = ContentGraph::new();
        let mut registry = ContentRegistry::new();
        let _far = place_box(&mut graph, &mut registry, Vec3::new(0.0, 0.0, -40.0), 4.0);
        let near = place_box(&mut graph, &mut registry, Vec3::new(0.0, 0.0, -10.0), 4.0);
        graph.propagate_transforms();

        let detector = HoverDetector::default();
        let hit = detector.detect(&graph, &registry, &ViewerPose::default()).unwrap();
        assert_eq!(hit.anchor, near);
        assert!((hit.distance - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_looking_away_no_hover() {
        let mut graph = ContentGraph::new();
        let mut registry = ContentRegistry::new();
        place_box(&mut graph, &mut registry, Vec3::new(0.0, 0.0, -10.0), 4.0);
        graph.propagate_transforms();

        let mut viewer = ViewerPose::default();
        viewer.look_at(Vec3::new(0.0, 0.0, 10.0));

        let detector = HoverDetector::default();
        assert!(detector.detect(&graph, &registry, &viewer).is_none());
    }

    #[test]
    fn test_child_mesh_hit_resolves_to_anchor() {
        let mut graph = ContentGraph::new();
        let mut registry = ContentRegistry::new();
        let id = place_model(&mut graph, &mut registry, Vec3::new(0.0, -2.5, -10.0));
        graph.propagate_transforms();

        // viewer at origin looks straight ahead into the head mesh
        let detector = HoverDetector::default();
        let hit = detector.detect(&graph, &registry, &ViewerPose::default()).unwrap();
        assert_eq!(hit.anchor, id);
        // the struck node is a child, not the instance root
        let root = registry.get(id).unwrap().root;
        assert_ne!(hit.node, root);
    }

    #[test]
    fn test_equidistant_tie_takes_registration_order() {
        let mut graph = ContentGraph::new();
        let mut registry = ContentRegistry::new();
        let first = place_box(&mut graph, &mut registry, Vec3::new(0.0, 0.0, -10.0), 4.0);
        let _second = place_box(&mut graph, &mut registry, Vec3::new(0.0, 0.0, -10.0), 4.0);
        graph.propagate_transforms();

        let detector = HoverDetector::default();
        let hit = detector.detect(&graph, &registry, &ViewerPose::default()).unwrap();
        assert_eq!(hit.anchor, first);
    }
}
