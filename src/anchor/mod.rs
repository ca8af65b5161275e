//! Geo-anchoring: instance registry, first-fix gate, and placer

pub mod registry;
pub mod gate;
pub mod placer;

pub use registry::{AnchorId, ContentRegistry, InstanceState};
pub use gate::PlacementGate;
pub use placer::GeoAnchorPlacer;
