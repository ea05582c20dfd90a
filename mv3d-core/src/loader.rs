/// glTF 2.0 parsing into the viewer scene graph
///
/// Parsing is split in two so the web frontend can resolve sibling resources
/// over HTTP: `GltfAsset::parse` reads the document (and the GLB binary
/// chunk when present), `external_buffers` lists the buffer URIs still
/// missing, and `into_scene` assembles the graph once every buffer is
/// available. One attempt per load; failures are terminal.
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::{ViewerError, ViewerResult};
use crate::geometry::{compute_normals, Node, Primitive, Scene};

/// A parsed glTF document awaiting buffer resolution
pub struct GltfAsset {
    document: gltf::Document,
    blob: Option<Vec<u8>>,
}

impl GltfAsset {
    /// Parse `.gltf` or `.glb` bytes
    pub fn parse(bytes: &[u8]) -> ViewerResult<Self> {
        let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
        Ok(Self { document, blob })
    }

    /// Buffer URIs the caller must resolve, with their buffer indices
    pub fn external_buffers(&self) -> Vec<(usize, String)> {
        self.document
            .buffers()
            .filter_map(|buffer| match buffer.source() {
                gltf::buffer::Source::Uri(uri) => Some((buffer.index(), uri.to_string())),
                gltf::buffer::Source::Bin => None,
            })
            .collect()
    }

    /// Build the scene graph from the document's default scene.
    ///
    /// `external` holds resolved buffer bytes indexed by buffer index;
    /// entries for the GLB binary chunk may stay `None`.
    pub fn into_scene(self, mut external: Vec<Option<Vec<u8>>>) -> ViewerResult<Scene> {
        let mut blob = self.blob;
        external.resize(self.document.buffers().len(), None);

        let mut buffers = Vec::with_capacity(self.document.buffers().len());
        for buffer in self.document.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => blob.take().ok_or_else(|| {
                    ViewerError::AssetLoad("GLB binary chunk missing".to_string())
                })?,
                gltf::buffer::Source::Uri(uri) => external[buffer.index()]
                    .take()
                    .ok_or_else(|| {
                        ViewerError::AssetLoad(format!("unresolved buffer uri: {uri}"))
                    })?,
            };
            if data.len() < buffer.length() {
                return Err(ViewerError::AssetLoad(format!(
                    "buffer {} holds {} bytes but declares {}",
                    buffer.index(),
                    data.len(),
                    buffer.length()
                )));
            }
            buffers.push(data);
        }

        let document_scene = self
            .document
            .default_scene()
            .or_else(|| self.document.scenes().next())
            .ok_or_else(|| ViewerError::AssetLoad("document contains no scene".to_string()))?;

        let mut scene = Scene::new();
        for node in document_scene.nodes() {
            scene.roots.push(build_node(&node, &buffers)?);
        }
        if scene.is_empty() {
            log::warn!("loaded scene contains no renderable geometry");
        }
        Ok(scene)
    }
}

fn build_node(node: &gltf::Node, buffers: &[Vec<u8>]) -> ViewerResult<Node> {
    let mut out = Node::new();
    out.transform = Matrix4::from(node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if let Some(primitive) = build_primitive(&primitive, buffers)? {
                out.primitives.push(primitive);
            }
        }
    }
    for child in node.children() {
        out.children.push(build_node(&child, buffers)?);
    }
    Ok(out)
}

fn build_primitive(
    primitive: &gltf::Primitive,
    buffers: &[Vec<u8>],
) -> ViewerResult<Option<Primitive>> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        log::debug!("skipping primitive with mode {:?}", primitive.mode());
        return Ok(None);
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

    let positions: Vec<Point3<f32>> = match reader.read_positions() {
        Some(positions) => positions.map(Point3::from).collect(),
        None => return Ok(None),
    };
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        // Non-indexed primitives draw vertices in order.
        None => (0..positions.len() as u32).collect(),
    };
    let normals: Vec<Vector3<f32>> = match reader.read_normals() {
        Some(normals) => normals.map(Vector3::from).collect(),
        None => compute_normals(&positions, &indices),
    };
    let normals = if normals.len() == positions.len() {
        normals
    } else {
        compute_normals(&positions, &indices)
    };

    let base_color = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_factor();

    Ok(Some(
        Primitive::new(positions, normals, indices).with_base_color(base_color),
    ))
}
