/// Scene-object graph primitives for the model viewer
use nalgebra::{Matrix4, Point3, Vector3};

use crate::fit::FitResult;
use crate::transform::Transform;

/// Default base color for primitives whose material carries none
const DEFAULT_BASE_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// A renderable triangle primitive with per-vertex attributes
#[derive(Debug, Clone)]
pub struct Primitive {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
}

impl Primitive {
    pub fn new(
        positions: Vec<Point3<f32>>,
        normals: Vec<Vector3<f32>>,
        indices: Vec<u32>,
    ) -> Self {
        Self {
            positions,
            normals,
            indices,
            base_color: DEFAULT_BASE_COLOR,
        }
    }

    pub fn with_base_color(mut self, base_color: [f32; 4]) -> Self {
        self.base_color = base_color;
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A node in the hierarchical scene-object graph
#[derive(Debug, Clone)]
pub struct Node {
    /// Local transform relative to the parent node
    pub transform: Matrix4<f32>,
    pub primitives: Vec<Primitive>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new() -> Self {
        Self {
            transform: Matrix4::identity(),
            primitives: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

/// A loaded model: root nodes plus the root transform the fit writes into
#[derive(Debug, Clone)]
pub struct Scene {
    pub roots: Vec<Node>,
    /// Applied above every root; identity until a fit is applied.
    pub transform: Matrix4<f32>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            transform: Matrix4::identity(),
        }
    }

    /// True when no node in the graph carries geometry
    pub fn is_empty(&self) -> bool {
        fn has_geometry(node: &Node) -> bool {
            !node.primitives.is_empty() || node.children.iter().any(has_geometry)
        }
        !self.roots.iter().any(has_geometry)
    }

    /// Write the fit scale and centering translation into the root transform.
    ///
    /// `center` is the bounding-box center of the unscaled graph; scaling and
    /// re-centering commute for a uniform scale, so the composed transform
    /// places the scaled model centered at the origin.
    pub fn apply_fit(&mut self, fit: &FitResult, center: &Point3<f32>) {
        self.transform = Transform::uniform_scale_matrix(fit.scale)
            * Transform::translation_matrix(&-center.coords);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Area-weighted per-vertex normals for primitives that ship without them
pub fn compute_normals(positions: &[Point3<f32>], indices: &[u32]) -> Vec<Vector3<f32>> {
    let mut normals = vec![Vector3::zeros(); positions.len()];

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }

        let edge1 = positions[b] - positions[a];
        let edge2 = positions[c] - positions[a];
        // Cross product length is proportional to face area, weighting the sum.
        let face_normal = edge1.cross(&edge2);

        normals[a] += face_normal;
        normals[b] += face_normal;
        normals[c] += face_normal;
    }

    for normal in &mut normals {
        let length = normal.norm();
        if length > 1e-12 {
            *normal /= length;
        } else {
            *normal = Vector3::z();
        }
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Primitive {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let indices = vec![0, 1, 2];
        let normals = compute_normals(&positions, &indices);
        Primitive::new(positions, normals, indices)
    }

    #[test]
    fn test_computed_normals_face_forward() {
        let primitive = unit_triangle();
        for normal in &primitive.normals {
            assert!((normal - Vector3::z()).norm() < 1e-6);
        }
    }

    #[test]
    fn test_degenerate_face_falls_back_to_z() {
        let positions = vec![Point3::origin(); 3];
        let normals = compute_normals(&positions, &[0, 1, 2]);
        assert!((normals[0] - Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_scene_emptiness() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());

        let mut child = Node::new();
        child.primitives.push(unit_triangle());
        let mut root = Node::new();
        root.children.push(child);
        scene.roots.push(root);
        assert!(!scene.is_empty());
    }

    #[test]
    fn test_apply_fit_centers_and_scales() {
        let mut scene = Scene::new();
        let fit = FitResult {
            scale: 2.0,
            camera_distance: 10.0,
            min_distance: 5.0,
            max_distance: 20.0,
        };
        scene.apply_fit(&fit, &Point3::new(1.0, 0.0, 0.0));

        // The box center must land on the origin after the transform.
        let moved = scene.transform.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(moved.coords.norm() < 1e-6);
        // A point one unit from the center ends up `scale` units away.
        let moved = scene.transform.transform_point(&Point3::new(2.0, 0.0, 0.0));
        assert!((moved.coords.norm() - 2.0).abs() < 1e-6);
    }
}
