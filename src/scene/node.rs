//! Content graph node types

use glam::{Mat4, Quat, Vec3};

use crate::anchor::AnchorId;
use crate::math::Aabb;

/// Unique identifier for a content graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Local transform relative to the parent node.
#[derive(Clone, Debug)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl LocalTransform {
    /// Identity transform (no translation, rotation, or scaling).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Material-level state the renderer mirrors per node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    /// Linear RGB color / tint
    pub color: [f32; 3],
    /// Opacity (1.0 = opaque)
    pub opacity: f32,
    /// Whether the content is depth-tested against the camera feed
    pub depth_test: bool,
    /// Draw-order bias; anchored content draws above the passthrough
    pub render_order: i32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            depth_test: true,
            render_order: 0,
        }
    }
}

/// Named local-space bounds of one mesh within a model.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshBounds {
    pub name: String,
    pub bounds: Aabb,
}

/// A fully prepared piece of content, ready to be instantiated into the
/// graph once the session has a GPS fix. Built by the load coordinator.
#[derive(Clone, Debug)]
pub struct ContentBlueprint {
    pub name: String,
    pub appearance: Appearance,
    /// Uniform or per-axis scale applied at the instance root
    pub scale: Vec3,
    /// One entry puts the bounds on the root; more build child nodes
    pub meshes: Vec<MeshBounds>,
    /// Continuous Y rotation (radians per frame) while hovered
    pub hover_spin: Option<f32>,
}

/// A single node in the content graph.
#[derive(Clone, Debug)]
pub struct ContentNode {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub local_transform: LocalTransform,
    /// Cached world transform (recomputed during propagation).
    pub world_transform: Mat4,
    /// Local-space bounds; `None` for pure grouping nodes.
    pub bounds: Option<Aabb>,
    pub appearance: Appearance,
    /// Back-reference to the registered anchor, set on instance roots only.
    pub anchor: Option<AnchorId>,
}

impl ContentNode {
    /// Create a new node.
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local_transform: LocalTransform::identity(),
            world_transform: Mat4::IDENTITY,
            bounds: None,
            appearance: Appearance::default(),
            anchor: None,
        }
    }

    /// World-space bounds of this node's own mesh, if it has one.
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.bounds.map(|b| b.transformed(&self.world_transform))
    }
}
