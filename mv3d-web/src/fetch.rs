/// HTTP asset transport for the browser frontend
///
/// Browser fetch is async, so the whole pipeline is: fetch the asset bytes,
/// parse the document, fetch any sibling buffers it references, assemble.
/// Single attempt; a failed fetch is terminal for the load.
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use mv3d_core::{GltfAsset, Scene, ViewerError, ViewerResult};

fn js_err(url: &str, value: wasm_bindgen::JsValue) -> ViewerError {
    ViewerError::AssetLoad(format!("{url}: {value:?}"))
}

/// Fetch a resource as raw bytes; non-OK HTTP status is an error
pub async fn fetch_bytes(url: &str) -> ViewerResult<Vec<u8>> {
    let window = web_sys::window()
        .ok_or_else(|| ViewerError::AssetLoad("no window object".to_string()))?;

    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| js_err(url, e))?;
    let response: web_sys::Response = response.dyn_into().map_err(|e| js_err(url, e))?;

    if !response.ok() {
        return Err(ViewerError::AssetLoad(format!(
            "HTTP {} {} for {url}",
            response.status(),
            response.status_text()
        )));
    }

    let buffer = JsFuture::from(response.array_buffer().map_err(|e| js_err(url, e))?)
        .await
        .map_err(|e| js_err(url, e))?;
    let bytes = js_sys::Uint8Array::new(&buffer);
    let mut out = vec![0u8; bytes.length() as usize];
    bytes.copy_to(&mut out);
    Ok(out)
}

/// Resolve a buffer URI relative to the asset URL.
///
/// Absolute and `data:` URIs pass through; anything else is treated as a
/// sibling of the asset.
pub fn join_url(asset_url: &str, uri: &str) -> String {
    if uri.starts_with("data:") || uri.contains("://") {
        return uri.to_string();
    }
    match asset_url.rsplit_once('/') {
        Some((base, _)) => format!("{base}/{uri}"),
        None => uri.to_string(),
    }
}

/// Fetch and assemble a complete scene graph from `url`
pub async fn load_scene(url: &str) -> ViewerResult<Scene> {
    let bytes = fetch_bytes(url).await?;
    let asset = GltfAsset::parse(&bytes)?;

    let mut resolved: Vec<Option<Vec<u8>>> = Vec::new();
    for (index, uri) in asset.external_buffers() {
        let data = fetch_bytes(&join_url(url, &uri)).await?;
        if resolved.len() <= index {
            resolved.resize(index + 1, None);
        }
        resolved[index] = Some(data);
    }

    asset.into_scene(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_resolves_siblings() {
        assert_eq!(
            join_url("scene/scene.gltf", "scene.bin"),
            "scene/scene.bin"
        );
        assert_eq!(
            join_url("https://host/models/a.gltf", "textures/a.bin"),
            "https://host/models/textures/a.bin"
        );
    }

    #[test]
    fn test_join_url_passes_absolute_uris_through() {
        assert_eq!(
            join_url("scene/scene.gltf", "https://cdn/buf.bin"),
            "https://cdn/buf.bin"
        );
        assert_eq!(
            join_url("scene/scene.gltf", "data:application/octet-stream;base64,AA=="),
            "data:application/octet-stream;base64,AA=="
        );
    }

    #[test]
    fn test_join_url_without_base_directory() {
        assert_eq!(join_url("scene.gltf", "scene.bin"), "scene.bin");
    }
}
