/// MV3D Core Library - Shared viewer logic
///
/// This library provides the stateless core functionality for the browser
/// model viewer: glTF parsing into a scene-object graph, bounding volumes,
/// the auto-fit/auto-frame computation, and camera/orbit math.

pub mod bounds;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod loader;
pub mod orbit;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use bounds::Aabb;
pub use error::{ViewerError, ViewerResult};
pub use fit::{center_translation, compute_fit, FitParams, FitResult, Frustum};
pub use geometry::{Node, Primitive, Scene};
pub use loader::GltfAsset;
pub use orbit::{OrbitControls, OrbitLimits};
pub use projection::Camera;
pub use transform::Transform;
