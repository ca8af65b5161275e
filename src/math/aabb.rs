//! Axis-aligned bounding box

use crate::core::types::{Mat4, Vec3};

/// Axis-aligned bounding box defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create AABB from center and half-extents
    pub fn from_center_half_extent(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Cube of the given edge length centered at the origin
    pub fn cube(size: f32) -> Self {
        Self::from_center_half_extent(Vec3::ZERO, Vec3::splat(size * 0.5))
    }

    /// Get center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Return merged AABB containing both
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Axis-aligned bounds of this box under an affine transform.
    ///
    /// Transforms all eight corners and re-wraps them; conservative for
    /// rotated content, exact for translation and scale.
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in corners {
            let p = matrix.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Aabb { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.center(), Vec3::splat(0.5));
        assert_eq!(aabb.size(), Vec3::ONE);
    }

    #[test]
    fn test_cube() {
        let aabb = Aabb::cube(10.0);
        assert_eq!(aabb.min, Vec3::splat(-5.0));
        assert_eq!(aabb.max, Vec3::splat(5.0));
    }

    #[test]
    fn test_merged() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(2.0), Vec3::splat(3.0));
        let m = a.merged(&b);
        assert_eq!(m.min, Vec3::ZERO);
        assert_eq!(m.max, Vec3::splat(3.0));
    }

    #[test]
    fn test_transformed_translation() {
        let aabb = Aabb::cube(2.0);
        let m = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let t = aabb.transformed(&m);
        assert!((t.center() - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-6);
        assert!((t.size() - Vec3::splat(2.0)).length() < 1e-6);
    }

    #[test]
    fn test_transformed_scale() {
        let aabb = Aabb::cube(2.0);
        let m = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let t = aabb.transformed(&m);
        assert!((t.size() - Vec3::new(4.0, 2.0, 2.0)).length() < 1e-6);
    }
}
