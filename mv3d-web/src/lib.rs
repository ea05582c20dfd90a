/// MV3D Web - browser frontend for the model viewer
///
/// Wires the shared viewer core to a canvas: creates the render surface
/// inside a host element, loads a glTF asset over HTTP, frames it with the
/// auto-fit computation, and drives a requestAnimationFrame render loop
/// with orbit and zoom interaction.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use nalgebra::Matrix4;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

use mv3d_core::{compute_fit, Camera, FitParams, OrbitControls, Scene, ViewerError};

pub mod fetch;
pub mod renderer;

pub use renderer::WebGlRenderer;

/// Asset the viewer loads when the host page does not name one
pub const DEFAULT_ASSET_PATH: &str = "scene/scene.gltf";

/// Cap on devicePixelRatio; anything sharper wastes fill rate
const MAX_PIXEL_RATIO: f64 = 2.0;

fn to_js(err: ViewerError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window object"))
}

struct ViewerState {
    container: web_sys::Element,
    canvas: HtmlCanvasElement,
    renderer: WebGlRenderer,
    camera: Camera,
    orbit: OrbitControls,
    scene: Option<Scene>,
    fit_params: FitParams,
}

impl ViewerState {
    /// Canvas size in device pixels for the container's current CSS size
    fn surface_size(&self) -> (u32, u32) {
        let ratio = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
            .clamp(1.0, MAX_PIXEL_RATIO);
        let width = (self.container.client_width().max(0) as f64 * ratio) as u32;
        let height = (self.container.client_height().max(0) as f64 * ratio) as u32;
        (width, height)
    }

    /// Track a container resize; the fit is deliberately not recomputed
    fn resize(&mut self) {
        let (width, height) = self.surface_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.renderer.set_viewport(width as i32, height as i32);
        self.camera.set_viewport(width, height);
    }

    /// Frame the scene and hand it to the renderer
    fn install_scene(&mut self, mut scene: Scene) -> Result<(), JsValue> {
        match scene.bounding_box() {
            Some(aabb) => {
                let size = aabb.size();
                let fit = compute_fit(size.x, size.y, &self.camera.frustum(), &self.fit_params)
                    .map_err(to_js)?;
                scene.apply_fit(&fit, &aabb.center());
                self.orbit = OrbitControls::from_fit(&fit);
                self.orbit.update_camera(&mut self.camera);
                log::info!(
                    "framed scene: scale {:.3}, camera distance {:.3}",
                    fit.scale,
                    fit.camera_distance
                );
            }
            None => {
                log::warn!("scene has no geometry to frame, rendering as-is");
            }
        }
        self.renderer.upload_scene(&scene)?;
        self.scene = Some(scene);
        Ok(())
    }

    fn render_frame(&mut self) {
        self.orbit.update_camera(&mut self.camera);
        let transform = self
            .scene
            .as_ref()
            .map(|scene| scene.transform)
            .unwrap_or_else(Matrix4::identity);
        self.renderer.render(&self.camera, &transform);
    }
}

/// The embeddable viewer, exposed to the host page
#[wasm_bindgen]
pub struct Viewer {
    state: Rc<RefCell<ViewerState>>,
    raf_handle: Rc<Cell<Option<i32>>>,
    raf_closure: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    // Kept alive for the lifetime of the viewer; outside the shared state
    // so the listener does not keep the state alive on its own.
    _resize_listener: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl Viewer {
    /// Create a viewer inside the element with the given id.
    ///
    /// Appends a canvas filling the element, acquires a WebGL2 context and
    /// registers a window resize listener. Fails if the element does not
    /// exist or WebGL2 is unavailable.
    pub fn attach(container_id: &str) -> Result<Viewer, JsValue> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document object"))?;
        let container = document.get_element_by_id(container_id).ok_or_else(|| {
            log::error!("container element #{container_id} not found");
            to_js(ViewerError::MissingContainer(container_id.to_string()))
        })?;

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("created element is not a canvas"))?;
        let style = canvas.style();
        style.set_property("width", "100%")?;
        style.set_property("height", "100%")?;
        style.set_property("display", "block")?;
        container.append_child(&canvas)?;

        let gl: WebGl2RenderingContext = canvas
            .get_context("webgl2")?
            .ok_or_else(|| JsValue::from_str("WebGL2 is not supported"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("unexpected rendering context type"))?;
        let renderer = WebGlRenderer::new(gl)?;

        let camera = Camera::new(canvas.width().max(1), canvas.height().max(1));
        let orbit = OrbitControls::new((camera.position - camera.target).norm());

        let state = Rc::new(RefCell::new(ViewerState {
            container,
            canvas,
            renderer,
            camera,
            orbit,
            scene: None,
            fit_params: FitParams::default(),
        }));
        state.borrow_mut().resize();

        let resize_state = Rc::clone(&state);
        let resize_listener = Closure::wrap(Box::new(move || {
            resize_state.borrow_mut().resize();
        }) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", resize_listener.as_ref().unchecked_ref())?;

        Ok(Viewer {
            state,
            raf_handle: Rc::new(Cell::new(None)),
            raf_closure: Rc::new(RefCell::new(None)),
            _resize_listener: resize_listener,
        })
    }

    /// Fetch, parse and frame a glTF asset; resolves when it is on screen.
    ///
    /// One attempt per call, failures reject the returned promise.
    pub fn load_model(&self, url: String) -> js_sys::Promise {
        let state = Rc::clone(&self.state);
        wasm_bindgen_futures::future_to_promise(async move {
            log::info!("loading model from {url}");
            let scene = fetch::load_scene(&url).await.map_err(|err| {
                log::error!("model load failed: {err}");
                to_js(err)
            })?;
            let mut state = state.borrow_mut();
            state.install_scene(scene)?;
            state.render_frame();
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Load the conventional default asset
    pub fn load_default_model(&self) -> js_sys::Promise {
        self.load_model(DEFAULT_ASSET_PATH.to_string())
    }

    /// Start the continuous render loop; idempotent
    pub fn start(&self) -> Result<(), JsValue> {
        if self.raf_handle.get().is_some() {
            return Ok(());
        }

        let state = Rc::clone(&self.state);
        let handle = Rc::clone(&self.raf_handle);
        let closure_cell = Rc::clone(&self.raf_closure);
        let closure = Closure::wrap(Box::new(move |_timestamp: f64| {
            if handle.get().is_none() {
                // Stopped after this frame was already scheduled.
                return;
            }
            state.borrow_mut().render_frame();

            let rescheduled = web_sys::window().and_then(|window| {
                closure_cell.borrow().as_ref().and_then(|callback| {
                    window
                        .request_animation_frame(callback.as_ref().unchecked_ref())
                        .ok()
                })
            });
            match rescheduled {
                Some(id) => handle.set(Some(id)),
                None => {
                    log::error!("failed to schedule next frame, stopping render loop");
                    handle.set(None);
                }
            }
        }) as Box<dyn FnMut(f64)>);

        let first = window()?.request_animation_frame(closure.as_ref().unchecked_ref())?;
        self.raf_handle.set(Some(first));
        *self.raf_closure.borrow_mut() = Some(closure);
        Ok(())
    }

    /// Stop the render loop; idempotent
    pub fn stop(&self) -> Result<(), JsValue> {
        if let Some(id) = self.raf_handle.take() {
            window()?.cancel_animation_frame(id)?;
        }
        Ok(())
    }

    /// Render a single frame without starting the loop
    pub fn render_frame(&self) {
        self.state.borrow_mut().render_frame();
    }

    /// Apply pointer drag movement to the orbit camera
    pub fn rotate(&self, dx: f32, dy: f32) {
        self.state.borrow_mut().orbit.rotate(dx, dy);
    }

    /// Apply scroll input as zoom, clamped to the framing bounds
    pub fn zoom(&self, delta: f32) {
        self.state.borrow_mut().orbit.zoom(delta);
    }

    /// Resize the render surface to the container's current size
    pub fn resize(&self) {
        self.state.borrow_mut().resize();
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    Ok(())
}
