//! Viewer pose - the camera the host's orientation service drives

use crate::core::types::{Vec3, Quat};
use crate::math::Ray;

/// Current viewer (camera) pose in world space.
///
/// The orientation service writes `rotation` every sensor event; the engine
/// only ever reads the pose. Projection parameters live with the renderer.
#[derive(Clone, Copy, Debug)]
pub struct ViewerPose {
    /// World position
    pub position: Vec3,
    /// Rotation as quaternion
    pub rotation: Quat,
}

impl ViewerPose {
    /// Create a viewer at a position with identity rotation
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Get forward direction (negative Z in camera space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Ray from the viewer along its forward direction.
    ///
    /// This is the center-crosshair ray: hover detection never uses pointer
    /// or touch input.
    pub fn center_ray(&self) -> Ray {
        Ray::new(self.position, self.forward())
    }

    /// Orient the viewer to face a target point
    pub fn look_at(&mut self, target: Vec3) {
        let forward = (target - self.position).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);
        self.rotation = Quat::from_mat3(&glam::Mat3::from_cols(right, up, -forward));
    }
}

impl Default for ViewerPose {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
