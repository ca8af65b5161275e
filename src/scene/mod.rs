//! CPU-side content graph
//!
//! Holds every placed instance as a small node hierarchy (one root per
//! anchor, child nodes for multi-mesh models) with transforms, appearance,
//! and local bounds. The renderer mirrors this graph; the engine mutates it.

pub mod node;
pub mod graph;

pub use node::{Appearance, ContentBlueprint, ContentNode, LocalTransform, MeshBounds, NodeId};
pub use graph::{ContentGraph, NodeHit};
