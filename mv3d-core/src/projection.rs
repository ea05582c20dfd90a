/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::fit::Frustum;

/// Perspective camera configuration for the viewer
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov_y: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov_y, self.near, self.far)
    }

    /// Snapshot the frustum for a fit computation
    pub fn frustum(&self) -> Frustum {
        Frustum {
            fov_y: self.fov_y,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
        }
    }

    /// Track a resized render target.
    ///
    /// Only the aspect ratio changes; the fit is never recomputed here. A
    /// zero height leaves the previous aspect in place instead of dividing
    /// by zero.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_viewport_resize_updates_aspect_only() {
        let mut camera = Camera::new(800, 600);
        let fov = camera.fov_y;

        camera.set_viewport(400, 300);
        assert!((camera.aspect - 400.0 / 300.0).abs() < 1e-6);
        assert_eq!(camera.fov_y, fov);
    }

    #[test]
    fn test_zero_height_resize_is_ignored() {
        let mut camera = Camera::new(800, 600);
        let aspect = camera.aspect;

        camera.set_viewport(400, 0);
        assert_eq!(camera.aspect, aspect);
    }
}
