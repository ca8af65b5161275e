//! Registry of placed instances and their original poses
//!
//! Single source of truth for "where does this thing belong when not
//! interacted with". States are arena records keyed by stable [`AnchorId`]s;
//! scene nodes hold the id as a back-reference.

use std::collections::HashMap;

use glam::{Quat, Vec3};

use crate::scene::node::{LocalTransform, NodeId};

/// Unique identifier for a registered anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct AnchorId(pub u64);

/// Per-instance record: the immutable original pose plus mutable
/// interaction state.
#[derive(Clone, Debug)]
pub struct InstanceState {
    /// Root node of the instance's subtree in the content graph.
    pub root: NodeId,
    /// Pose at registration time. Never changes afterwards.
    pub original_position: Vec3,
    pub original_scale: Vec3,
    pub original_rotation: Quat,
    /// Material color at registration time, restored on hover exit.
    pub original_color: [f32; 3],
    /// Continuous Y rotation (radians per frame) while hovered, if any.
    pub hover_spin: Option<f32>,
    /// Frame counter of the most recent hover, if ever hovered.
    pub last_hover_frame: Option<u64>,
}

/// Arena of [`InstanceState`] records in registration order.
pub struct ContentRegistry {
    states: HashMap<AnchorId, InstanceState>,
    order: Vec<AnchorId>,
    by_node: HashMap<NodeId, AnchorId>,
    next_id: u64,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            order: Vec::new(),
            by_node: HashMap::new(),
            next_id: 0,
        }
    }

    /// Register a placed instance, capturing its original pose.
    ///
    /// Registering the same root node twice does not overwrite: the
    /// existing id is returned and the original pose is left untouched.
    pub fn register(
        &mut self,
        root: NodeId,
        transform: &LocalTransform,
        color: [f32; 3],
        hover_spin: Option<f32>,
    ) -> AnchorId {
        if let Some(&existing) = self.by_node.get(&root) {
            log::warn!("node {:?} already registered as {:?}", root, existing);
            return existing;
        }

        let id = AnchorId(self.next_id);
        self.next_id += 1;

        self.states.insert(
            id,
            InstanceState {
                root,
                original_position: transform.position,
                original_scale: transform.scale,
                original_rotation: transform.rotation,
                original_color: color,
                hover_spin,
                last_hover_frame: None,
            },
        );
        self.order.push(id);
        self.by_node.insert(root, id);

        id
    }

    /// Get an instance state. `None` means the id was never registered,
    /// which is a caller contract violation: only use ids from [`anchors`].
    ///
    /// [`anchors`]: ContentRegistry::anchors
    pub fn get(&self, id: AnchorId) -> Option<&InstanceState> {
        self.states.get(&id)
    }

    /// Mutable access to an instance state.
    pub fn get_mut(&mut self, id: AnchorId) -> Option<&mut InstanceState> {
        self.states.get_mut(&id)
    }

    /// All registered anchors, in registration order.
    pub fn anchors(&self) -> &[AnchorId] {
        &self.order
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for ContentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
