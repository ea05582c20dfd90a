/// Auto-fit and auto-frame computation
///
/// Given the footprint of a loaded model and a snapshot of the camera
/// frustum, compute a uniform scale so the model fills a target fraction of
/// the visible cross-section at a reference depth, and a camera distance
/// that frames the scaled model with a little padding.
use nalgebra::{Point3, Vector3};
use std::f32::consts::PI;

use crate::error::{ViewerError, ViewerResult};

/// Target fraction of the frustum cross-section the model should occupy
pub const FILL_FRACTION: f32 = 0.9;
/// Padding applied to the framing distance so the model clears the edges
pub const DISTANCE_PADDING: f32 = 1.1;
/// Closest interactive zoom, as a multiple of the framing distance
pub const MIN_DISTANCE_FACTOR: f32 = 0.5;
/// Farthest interactive zoom, as a multiple of the framing distance
pub const MAX_DISTANCE_FACTOR: f32 = 2.0;
/// Depth at which the fill fraction is evaluated
pub const REFERENCE_DISTANCE: f32 = 5.0;

/// Tunable fit parameters; the defaults are the product values
#[derive(Debug, Clone, Copy)]
pub struct FitParams {
    pub fill_fraction: f32,
    pub distance_padding: f32,
    pub min_distance_factor: f32,
    pub max_distance_factor: f32,
    pub reference_distance: f32,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            fill_fraction: FILL_FRACTION,
            distance_padding: DISTANCE_PADDING,
            min_distance_factor: MIN_DISTANCE_FACTOR,
            max_distance_factor: MAX_DISTANCE_FACTOR,
            reference_distance: REFERENCE_DISTANCE,
        }
    }
}

/// Read-only snapshot of the viewing frustum taken at fit time
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    /// Vertical field of view in radians, in (0, pi)
    pub fov_y: f32,
    /// Render target width / height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// Output of the fit: produced once per model load
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    /// Uniform scale applied to the model
    pub scale: f32,
    /// Camera distance along the viewing axis
    pub camera_distance: f32,
    /// Closest distance interactive zoom may reach
    pub min_distance: f32,
    /// Farthest distance interactive zoom may reach
    pub max_distance: f32,
}

/// Compute the uniform fit scale and framing distance for a model footprint.
///
/// `size_x` and `size_y` are the bounding-box extents facing the camera.
/// Fails with `DegenerateBounds` when either extent is zero so that no
/// `Infinity`/`NaN` ever reaches the scene or camera state.
pub fn compute_fit(
    size_x: f32,
    size_y: f32,
    frustum: &Frustum,
    params: &FitParams,
) -> ViewerResult<FitResult> {
    if !(size_x > 0.0 && size_y > 0.0) {
        return Err(ViewerError::DegenerateBounds {
            width: size_x,
            height: size_y,
        });
    }
    debug_assert!(frustum.fov_y > 0.0 && frustum.fov_y < PI);
    debug_assert!(frustum.aspect > 0.0);
    debug_assert!(params.reference_distance > 0.0);
    debug_assert!(params.fill_fraction > 0.0 && params.fill_fraction <= 1.0);

    let half_fov_tan = (frustum.fov_y / 2.0).tan();
    let frustum_height = 2.0 * half_fov_tan * params.reference_distance;
    let frustum_width = frustum_height * frustum.aspect;

    let scale_x = frustum_width * params.fill_fraction / size_x;
    let scale_y = frustum_height * params.fill_fraction / size_y;
    // Fit inside both axes rather than fill at least one.
    let scale = scale_x.min(scale_y);

    let scaled_max_dim = size_x.max(size_y) * scale;
    let camera_distance = (scaled_max_dim / 2.0) / half_fov_tan * params.distance_padding;

    let result = FitResult {
        scale,
        camera_distance,
        min_distance: camera_distance * params.min_distance_factor,
        max_distance: camera_distance * params.max_distance_factor,
    };

    if !(result.scale.is_finite() && result.camera_distance.is_finite()) {
        return Err(ViewerError::DegenerateBounds {
            width: size_x,
            height: size_y,
        });
    }

    Ok(result)
}

/// Translation that re-centers a model at the origin
pub fn center_translation(center: &Point3<f32>) -> Vector3<f32> {
    -center.coords
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_frustum() -> Frustum {
        Frustum {
            fov_y: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }

    #[test]
    fn test_reference_scenario() {
        let fit = compute_fit(2.0, 1.0, &default_frustum(), &FitParams::default()).unwrap();

        // Frustum at depth 5: height ~4.142, width ~7.364; the x axis wins
        // the fit-inside tie-break.
        assert!((fit.scale - 3.312).abs() < 1e-2);
        assert!((fit.camera_distance - 8.801).abs() < 1e-2);
        assert!((fit.min_distance - fit.camera_distance * 0.5).abs() < 1e-4);
        assert!((fit.max_distance - fit.camera_distance * 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_fit_is_pure() {
        let frustum = default_frustum();
        let params = FitParams::default();
        let first = compute_fit(3.0, 2.0, &frustum, &params).unwrap();
        let second = compute_fit(3.0, 2.0, &frustum, &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_bounds_fail_explicitly() {
        let result = compute_fit(0.0, 1.0, &default_frustum(), &FitParams::default());
        assert!(matches!(
            result,
            Err(crate::error::ViewerError::DegenerateBounds { .. })
        ));

        let result = compute_fit(1.0, 0.0, &default_frustum(), &FitParams::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_scale_positive_and_distances_ordered() {
        let frustum = default_frustum();
        let params = FitParams::default();
        for &(x, y) in &[(0.001, 0.001), (1.0, 1.0), (250.0, 3.0), (0.5, 800.0)] {
            let fit = compute_fit(x, y, &frustum, &params).unwrap();
            assert!(fit.scale > 0.0);
            assert!(fit.scale.is_finite());
            assert!(fit.min_distance < fit.camera_distance);
            assert!(fit.camera_distance < fit.max_distance);
        }
    }

    #[test]
    fn test_fitted_footprint_stays_inside_fill_fraction() {
        let frustum = default_frustum();
        let params = FitParams::default();
        let (size_x, size_y) = (7.0, 2.5);
        let fit = compute_fit(size_x, size_y, &frustum, &params).unwrap();

        let height = 2.0 * (frustum.fov_y / 2.0).tan() * params.reference_distance;
        let width = height * frustum.aspect;
        assert!(size_x * fit.scale <= width * params.fill_fraction + 1e-4);
        assert!(size_y * fit.scale <= height * params.fill_fraction + 1e-4);
    }

    #[test]
    fn test_center_translation_negates_center() {
        let translation = center_translation(&Point3::new(1.0, -2.0, 3.0));
        assert!((translation - Vector3::new(-1.0, 2.0, -3.0)).norm() < 1e-6);
    }
}
