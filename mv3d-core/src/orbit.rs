/// Orbit-style camera interaction state
///
/// Spherical coordinates around a fixed target: azimuth around the vertical
/// axis, polar from the vertical axis, radius along the view direction.
/// Distance bounds come from the fit; polar bounds are configuration. The
/// shipped product locks the polar angle at the horizon, so that is the
/// default, with `OrbitLimits::free` opening the full range.
use nalgebra::Point3;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::fit::FitResult;
use crate::projection::Camera;

/// Radians of orbit rotation per unit of pointer movement
pub const ROTATE_SENSITIVITY: f32 = 0.005;
/// Fractional radius change per unit of scroll input
pub const ZOOM_SENSITIVITY: f32 = 0.002;

/// Keep the polar angle off the poles to avoid a degenerate view basis
const POLAR_EPSILON: f32 = 0.01;

/// Bounds on interactive camera movement
#[derive(Debug, Clone, Copy)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
}

impl OrbitLimits {
    /// Vertical rotation locked at the horizon
    pub fn locked() -> Self {
        Self {
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar: FRAC_PI_2,
            max_polar: FRAC_PI_2,
        }
    }

    /// Full polar range short of the poles
    pub fn free() -> Self {
        Self {
            min_polar: POLAR_EPSILON,
            max_polar: PI - POLAR_EPSILON,
            ..Self::locked()
        }
    }

    /// Adopt the interaction-distance bounds of a fit
    pub fn with_fit(mut self, fit: &FitResult) -> Self {
        self.min_distance = fit.min_distance;
        self.max_distance = fit.max_distance;
        self
    }
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self::locked()
    }
}

/// Orbit interaction state driving the camera
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub limits: OrbitLimits,
    azimuth: f32,
    polar: f32,
    radius: f32,
}

impl OrbitControls {
    pub fn new(radius: f32) -> Self {
        let limits = OrbitLimits::default();
        Self {
            target: Point3::origin(),
            azimuth: 0.0,
            polar: FRAC_PI_2.clamp(limits.min_polar, limits.max_polar),
            radius,
            limits,
        }
    }

    /// Seed the orbit from a fresh fit: framing distance and zoom bounds
    pub fn from_fit(fit: &FitResult) -> Self {
        let mut controls = Self::new(fit.camera_distance);
        controls.limits = controls.limits.with_fit(fit);
        controls
    }

    pub fn with_limits(mut self, limits: OrbitLimits) -> Self {
        self.limits = limits;
        self.polar = self.polar.clamp(limits.min_polar, limits.max_polar);
        self.radius = self.radius.clamp(limits.min_distance, limits.max_distance);
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    /// Apply pointer movement to the orbit angles
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * ROTATE_SENSITIVITY;
        self.polar = (self.polar - dy * ROTATE_SENSITIVITY)
            .clamp(self.limits.min_polar, self.limits.max_polar);
    }

    /// Apply scroll input as a multiplicative zoom, clamped to the bounds
    pub fn zoom(&mut self, delta: f32) {
        let factor = (1.0 + delta * ZOOM_SENSITIVITY).clamp(0.1, 10.0);
        self.radius =
            (self.radius * factor).clamp(self.limits.min_distance, self.limits.max_distance);
    }

    /// Camera position for the current orbit state
    pub fn position(&self) -> Point3<f32> {
        let x = self.radius * self.polar.sin() * self.azimuth.sin();
        let y = self.radius * self.polar.cos();
        let z = self.radius * self.polar.sin() * self.azimuth.cos();
        Point3::new(
            self.target.x + x,
            self.target.y + y,
            self.target.z + z,
        )
    }

    /// Write the orbit state into the camera
    pub fn update_camera(&self, camera: &mut Camera) {
        camera.position = self.position();
        camera.target = self.target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position_faces_down_z() {
        let controls = OrbitControls::new(8.0);
        let position = controls.position();
        assert!((position - Point3::new(0.0, 0.0, 8.0)).norm() < 1e-5);
    }

    #[test]
    fn test_locked_limits_ignore_vertical_rotation() {
        let mut controls = OrbitControls::new(5.0);
        controls.rotate(0.0, 500.0);
        assert!((controls.polar() - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_free_limits_clamp_at_poles() {
        let mut controls = OrbitControls::new(5.0).with_limits(OrbitLimits::free());
        controls.rotate(0.0, 1e6);
        assert!((controls.polar() - POLAR_EPSILON).abs() < 1e-6);

        controls.rotate(0.0, -1e6);
        assert!((controls.polar() - (PI - POLAR_EPSILON)).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_clamps_to_fit_bounds() {
        let fit = FitResult {
            scale: 1.0,
            camera_distance: 10.0,
            min_distance: 5.0,
            max_distance: 20.0,
        };
        let mut controls = OrbitControls::from_fit(&fit);
        assert!((controls.radius() - 10.0).abs() < 1e-6);

        controls.zoom(-1e6);
        assert!((controls.radius() - 5.0).abs() < 1e-6);

        controls.zoom(1e6);
        assert!((controls.radius() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_update_camera_tracks_orbit() {
        let mut camera = Camera::default();
        let mut controls = OrbitControls::new(6.0);
        controls.rotate(100.0, 0.0);
        controls.update_camera(&mut camera);

        assert!((camera.position - controls.position()).norm() < 1e-6);
        assert!((camera.target - controls.target).norm() < 1e-6);
        assert!(((camera.position - camera.target).norm() - 6.0).abs() < 1e-4);
    }
}
