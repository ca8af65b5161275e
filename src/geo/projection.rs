//! Geocoordinate to world-space projection
//!
//! The renderer's coordinate system puts the viewer near the origin: +X is
//! east, -Z is north, +Y is up. The default projector is a linear local
//! tangent-plane approximation around the session origin; hosts with a real
//! projection (web mercator, ECEF) implement [`Projector`] themselves.

use crate::core::types::Vec3;
use super::GeoFix;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Converts geocoordinates to render-space positions.
pub trait Projector {
    /// Fix the projection origin. Called once, when the session consumes its
    /// first GPS fix; the viewer sits at the world origin afterwards.
    fn set_origin(&mut self, origin: &GeoFix);

    /// Project a coordinate to world space at the given height.
    fn project(&self, longitude: f64, latitude: f64, height: f32) -> Vec3;
}

/// Linear local-offset projection around the session origin.
///
/// Accurate to well under a meter at anchor distances (tens of meters),
/// which is all this engine promises.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalTangentPlane {
    origin: GeoFix,
}

impl LocalTangentPlane {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Projector for LocalTangentPlane {
    fn set_origin(&mut self, origin: &GeoFix) {
        self.origin = *origin;
    }

    fn project(&self, longitude: f64, latitude: f64, height: f32) -> Vec3 {
        let east = (longitude - self.origin.longitude)
            * METERS_PER_DEGREE
            * self.origin.latitude.to_radians().cos();
        let north = (latitude - self.origin.latitude) * METERS_PER_DEGREE;

        Vec3::new(east as f32, height, -north as f32)
    }
}
