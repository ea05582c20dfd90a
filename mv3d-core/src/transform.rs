/// 3D transformation matrix helpers
use nalgebra::{Matrix4, Vector3};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a uniform scale matrix
    pub fn uniform_scale_matrix(scale: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(scale)
    }

    /// Create a translation matrix
    pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_uniform_scale() {
        let matrix = Transform::uniform_scale_matrix(3.0);
        let scaled = matrix.transform_point(&Point3::new(1.0, -2.0, 0.5));
        assert!((scaled - Point3::new(3.0, -6.0, 1.5)).norm() < 1e-6);
    }

    #[test]
    fn test_translation() {
        let matrix = Transform::translation_matrix(&Vector3::new(1.0, 2.0, 3.0));
        let moved = matrix.transform_point(&Point3::origin());
        assert!((moved - Point3::new(1.0, 2.0, 3.0)).norm() < 1e-6);
    }

    #[test]
    fn test_identity_mvp() {
        let identity = Matrix4::identity();
        let mvp = Transform::mvp_matrix(&identity, &identity, &identity);
        assert!((mvp - Matrix4::identity()).norm() < 1e-6);
    }
}
