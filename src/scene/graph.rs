//! Content graph - arena of nodes with hierarchy and hit-testing
//!
//! Each placed instance is a subtree: a root node carrying the anchor
//! back-reference, and (for multi-mesh models) one child per mesh. The graph
//! propagates world transforms each frame and answers the center-crosshair
//! ray query.

use std::collections::HashMap;

use glam::{Mat4, Vec3};

use crate::anchor::AnchorId;
use crate::math::Ray;

use super::node::{ContentBlueprint, ContentNode, LocalTransform, NodeId};

/// A ray intersection against one node, nearest-first ordering.
#[derive(Clone, Copy, Debug)]
pub struct NodeHit {
    pub node: NodeId,
    pub distance: f32,
}

/// Arena of content nodes addressed by stable [`NodeId`]s.
pub struct ContentGraph {
    nodes: HashMap<NodeId, ContentNode>,
    root: NodeId,
    next_id: u64,
}

impl ContentGraph {
    /// Create a new graph with an empty root group.
    pub fn new() -> Self {
        let root_id = NodeId(0);
        let root_node = ContentNode::new(root_id, "root");

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);

        Self {
            nodes,
            root: root_id,
            next_id: 1,
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a child node under `parent`. Returns the new node's ID.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = self.alloc_id();
        let mut node = ContentNode::new(id, name);
        node.parent = Some(parent);

        self.nodes.insert(id, node);

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        id
    }

    /// Instantiate a prepared blueprint under the root at a world position.
    ///
    /// A single-mesh blueprint puts the bounds directly on the instance
    /// root; a multi-mesh blueprint builds one child node per mesh so the
    /// hit-test can recurse into the hierarchy.
    pub fn instantiate(&mut self, blueprint: &ContentBlueprint, position: Vec3) -> NodeId {
        let root = self.add_child(self.root, blueprint.name.clone());

        {
            let node = self.nodes.get_mut(&root).expect("node just inserted");
            node.local_transform = LocalTransform {
                position,
                scale: blueprint.scale,
                ..Default::default()
            };
            node.appearance = blueprint.appearance;
            if blueprint.meshes.len() == 1 {
                node.bounds = Some(blueprint.meshes[0].bounds);
            }
        }

        if blueprint.meshes.len() > 1 {
            for mesh in &blueprint.meshes {
                let child = self.add_child(root, mesh.name.clone());
                let node = self.nodes.get_mut(&child).expect("node just inserted");
                node.bounds = Some(mesh.bounds);
                node.appearance = blueprint.appearance;
            }
        }

        root
    }

    /// Mark a node as the root of a registered anchor.
    pub fn set_anchor(&mut self, id: NodeId, anchor: AnchorId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.anchor = Some(anchor);
        }
    }

    /// Walk up from a node to the nearest ancestor carrying an anchor
    /// back-reference (possibly the node itself).
    pub fn anchor_of(&self, id: NodeId) -> Option<AnchorId> {
        let mut current = Some(id);
        while let Some(nid) = current {
            let node = self.nodes.get(&nid)?;
            if let Some(anchor) = node.anchor {
                return Some(anchor);
            }
            current = node.parent;
        }
        None
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: NodeId) -> Option<&ContentNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ContentNode> {
        self.nodes.get_mut(&id)
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Recompute world transforms for the whole graph.
    pub fn propagate_transforms(&mut self) {
        self.propagate(self.root, Mat4::IDENTITY);
    }

    fn propagate(&mut self, node_id: NodeId, parent_world: Mat4) {
        let (local_mat, children) = {
            let node = match self.nodes.get(&node_id) {
                Some(n) => n,
                None => return,
            };
            (node.local_transform.to_mat4(), node.children.clone())
        };

        let world = parent_world * local_mat;

        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.world_transform = world;
        }

        for child_id in children {
            self.propagate(child_id, world);
        }
    }

    /// Intersect a ray against candidate subtrees.
    ///
    /// Candidates are tested in the given order; with `recursive` the whole
    /// subtree under each candidate is tested, otherwise only the candidate
    /// node itself. Hits come back sorted nearest-first; equidistant hits
    /// keep candidate order (the sort is stable), which gives registration
    /// order when candidates come from the registry.
    ///
    /// World transforms must be propagated before calling.
    pub fn intersect(&self, ray: &Ray, candidates: &[NodeId], recursive: bool) -> Vec<NodeHit> {
        let mut hits = Vec::new();

        for &candidate in candidates {
            if recursive {
                self.intersect_subtree(ray, candidate, &mut hits);
            } else if let Some(hit) = self.intersect_node(ray, candidate) {
                hits.push(hit);
            }
        }

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits
    }

    fn intersect_subtree(&self, ray: &Ray, id: NodeId, hits: &mut Vec<NodeHit>) {
        if let Some(hit) = self.intersect_node(ray, id) {
            hits.push(hit);
        }
        let children = match self.nodes.get(&id) {
            Some(n) => n.children.clone(),
            None => return,
        };
        for child in children {
            self.intersect_subtree(ray, child, hits);
        }
    }

    fn intersect_node(&self, ray: &Ray, id: NodeId) -> Option<NodeHit> {
        let node = self.nodes.get(&id)?;
        let bounds = node.world_bounds()?;
        let distance = ray.intersects_aabb(&bounds)?;
        Some(NodeHit { node: id, distance })
    }
}

impl Default for ContentGraph {
    fn default() -> Self {
        Self::new()
    }
}
