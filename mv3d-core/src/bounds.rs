/// Axis-aligned bounding volumes over the scene-object graph
use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::{Node, Scene};

/// Axis-aligned bounding box with min/max corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// An inverted box that any `grow` call will overwrite
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// False until at least one point has been folded in
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Expand the box to contain `point`
    pub fn grow(&mut self, point: &Point3<f32>) {
        self.min = Point3::new(
            self.min.x.min(point.x),
            self.min.y.min(point.y),
            self.min.z.min(point.z),
        );
        self.max = Point3::new(
            self.max.x.max(point.x),
            self.max.y.max(point.y),
            self.max.z.max(point.z),
        );
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        out.grow(&other.min);
        out.grow(&other.max);
        out
    }

    /// Midpoint of the box
    pub fn center(&self) -> Point3<f32> {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }

    /// Per-axis extent
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Bounding box of the whole graph with node transforms applied.
    ///
    /// The scene root transform is deliberately excluded: the box describes
    /// the model as loaded, before any fit is written into the root.
    /// Returns `None` for a scene without geometry.
    pub fn of_scene(scene: &Scene) -> Option<Aabb> {
        let mut aabb = Aabb::empty();
        for root in &scene.roots {
            grow_node(&mut aabb, root, &Matrix4::identity());
        }
        aabb.is_valid().then_some(aabb)
    }
}

impl Scene {
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::of_scene(self)
    }
}

fn grow_node(aabb: &mut Aabb, node: &Node, parent: &Matrix4<f32>) {
    let world = parent * node.transform;
    for primitive in &node.primitives {
        for position in &primitive.positions {
            aabb.grow(&world.transform_point(position));
        }
    }
    for child in &node.children {
        grow_node(aabb, child, &world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{compute_normals, Primitive};
    use crate::transform::Transform;

    fn primitive_from(points: &[[f32; 3]]) -> Primitive {
        let positions: Vec<Point3<f32>> = points.iter().map(|p| Point3::from(*p)).collect();
        let indices: Vec<u32> = (0..positions.len() as u32).collect();
        let normals = compute_normals(&positions, &indices);
        Primitive::new(positions, normals, indices)
    }

    #[test]
    fn test_grow_and_derived_attributes() {
        let mut aabb = Aabb::empty();
        assert!(!aabb.is_valid());

        aabb.grow(&Point3::new(-1.0, 0.0, 2.0));
        aabb.grow(&Point3::new(3.0, -2.0, 4.0));

        assert!(aabb.is_valid());
        assert!((aabb.center() - Point3::new(1.0, -1.0, 3.0)).norm() < 1e-6);
        assert!((aabb.size() - Vector3::new(4.0, 2.0, 2.0)).norm() < 1e-6);
    }

    #[test]
    fn test_union() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point3::new(-1.0, 0.5, 0.0), Point3::new(0.5, 2.0, 1.0));
        let u = a.union(&b);
        assert!((u.min - Point3::new(-1.0, 0.0, 0.0)).norm() < 1e-6);
        assert!((u.max - Point3::new(1.0, 2.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_scene_bounds_respect_node_transforms() {
        let mut child = Node::new();
        child.transform = Transform::translation_matrix(&Vector3::new(0.0, 5.0, 0.0));
        child
            .primitives
            .push(primitive_from(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]));

        let mut root = Node::new();
        root.transform = Transform::translation_matrix(&Vector3::new(10.0, 0.0, 0.0));
        root.children.push(child);

        let mut scene = Scene::new();
        scene.roots.push(root);

        let aabb = Aabb::of_scene(&scene).unwrap();
        assert!((aabb.min - Point3::new(10.0, 5.0, 0.0)).norm() < 1e-6);
        assert!((aabb.max - Point3::new(11.0, 6.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_empty_scene_has_no_bounds() {
        assert!(Aabb::of_scene(&Scene::new()).is_none());
    }
}
