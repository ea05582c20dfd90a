/// Error taxonomy for the viewer core
use thiserror::Error;

/// Result type for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Errors that can occur while loading and framing a model
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Network or asset-assembly failure; terminal for the load attempt.
    #[error("asset load failed: {0}")]
    AssetLoad(String),

    /// The asset bytes are not a well-formed glTF document.
    #[error("glTF parse error: {0}")]
    Gltf(#[from] gltf::Error),

    /// The bounding box has a zero extent on an axis used for scaling.
    #[error("degenerate bounding box: {width}x{height}")]
    DegenerateBounds { width: f32, height: f32 },

    /// The host container element was absent at startup.
    #[error("container element not found: #{0}")]
    MissingContainer(String),
}
