//! Waypost - a location-anchored AR interaction engine
//!
//! Captures a single GPS fix, anchors 3D content at fixed offsets around it,
//! and drives a per-frame hover/pull interaction loop: a center-crosshair ray
//! is tested against every anchored instance, and the hit instance is pulled
//! toward the viewer while everything else eases back to its anchor.
//!
//! Rendering, sensor hardware, and asset parsing stay outside the crate; a
//! host feeds in GPS fixes, viewer poses, and loaded asset bounds, and reads
//! back poses after each [`session::ArSession::tick`].

pub mod core;
pub mod math;
pub mod geo;
pub mod scene;
pub mod anchor;
pub mod interact;
pub mod assets;
pub mod session;
