/// WebGL2 renderer for the viewer scene graph
///
/// Geometry is uploaded once per loaded scene into a flat draw list with
/// baked world transforms; each frame binds the single Lambert program and
/// replays the list with fresh matrices.
use nalgebra::{Matrix4, Vector3};
use wasm_bindgen::JsValue;
use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
};

use mv3d_core::{Camera, Node, Scene, Transform};

const VERTEX_SHADER_SOURCE: &str = r#"#version 300 es
precision highp float;

in vec3 a_position;
in vec3 a_normal;

uniform mat4 u_mvp;
uniform mat4 u_model;

out vec3 v_normal;

void main() {
    // Model transforms are rotation, translation and uniform scale, so the
    // upper 3x3 rotates normals correctly after renormalization.
    v_normal = normalize((u_model * vec4(a_normal, 0.0)).xyz);
    gl_Position = u_mvp * vec4(a_position, 1.0);
}
"#;

const FRAGMENT_SHADER_SOURCE: &str = r#"#version 300 es
precision highp float;

in vec3 v_normal;

uniform vec4 u_base_color;
uniform vec3 u_light_direction;
uniform vec3 u_light_color;
uniform vec3 u_ambient;

out vec4 frag_color;

void main() {
    float diffuse = max(dot(normalize(v_normal), -u_light_direction), 0.0);
    vec3 color = u_base_color.rgb * (u_ambient + u_light_color * diffuse);
    frag_color = vec4(color, u_base_color.a);
}
"#;

const CLEAR_COLOR: [f32; 4] = [0.12, 0.12, 0.14, 1.0];
const AMBIENT: [f32; 3] = [0.25, 0.25, 0.25];
const LIGHT_COLOR: [f32; 3] = [0.9, 0.9, 0.9];

/// One uploaded primitive, ready to draw
struct DrawCall {
    vertex_buffer: WebGlBuffer,
    index_buffer: WebGlBuffer,
    index_count: i32,
    world: Matrix4<f32>,
    base_color: [f32; 4],
}

pub struct WebGlRenderer {
    gl: WebGl2RenderingContext,
    program: WebGlProgram,
    position_location: u32,
    normal_location: u32,
    u_mvp: Option<WebGlUniformLocation>,
    u_model: Option<WebGlUniformLocation>,
    u_base_color: Option<WebGlUniformLocation>,
    u_light_direction: Option<WebGlUniformLocation>,
    u_light_color: Option<WebGlUniformLocation>,
    u_ambient: Option<WebGlUniformLocation>,
    draws: Vec<DrawCall>,
}

impl WebGlRenderer {
    pub fn new(gl: WebGl2RenderingContext) -> Result<Self, JsValue> {
        let vertex_shader = compile_shader(
            &gl,
            WebGl2RenderingContext::VERTEX_SHADER,
            VERTEX_SHADER_SOURCE,
        )?;
        let fragment_shader = compile_shader(
            &gl,
            WebGl2RenderingContext::FRAGMENT_SHADER,
            FRAGMENT_SHADER_SOURCE,
        )?;
        let program = link_program(&gl, &vertex_shader, &fragment_shader)?;

        gl.enable(WebGl2RenderingContext::DEPTH_TEST);
        gl.enable(WebGl2RenderingContext::CULL_FACE);

        let position_location = gl.get_attrib_location(&program, "a_position") as u32;
        let normal_location = gl.get_attrib_location(&program, "a_normal") as u32;

        Ok(Self {
            u_mvp: gl.get_uniform_location(&program, "u_mvp"),
            u_model: gl.get_uniform_location(&program, "u_model"),
            u_base_color: gl.get_uniform_location(&program, "u_base_color"),
            u_light_direction: gl.get_uniform_location(&program, "u_light_direction"),
            u_light_color: gl.get_uniform_location(&program, "u_light_color"),
            u_ambient: gl.get_uniform_location(&program, "u_ambient"),
            gl,
            program,
            position_location,
            normal_location,
            draws: Vec::new(),
        })
    }

    /// Replace the draw list with the geometry of `scene`
    pub fn upload_scene(&mut self, scene: &Scene) -> Result<(), JsValue> {
        self.draws.clear();
        for root in &scene.roots {
            self.upload_node(root, &Matrix4::identity())?;
        }
        log::info!("uploaded {} draw calls", self.draws.len());
        Ok(())
    }

    fn upload_node(&mut self, node: &Node, parent: &Matrix4<f32>) -> Result<(), JsValue> {
        let world = parent * node.transform;
        for primitive in &node.primitives {
            // Interleave position and normal, 6 floats per vertex.
            let mut vertices = Vec::with_capacity(primitive.positions.len() * 6);
            for (position, normal) in primitive.positions.iter().zip(&primitive.normals) {
                vertices.extend_from_slice(&[
                    position.x, position.y, position.z, normal.x, normal.y, normal.z,
                ]);
            }

            let vertex_buffer = self
                .gl
                .create_buffer()
                .ok_or_else(|| JsValue::from_str("failed to create vertex buffer"))?;
            self.gl
                .bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&vertex_buffer));
            unsafe {
                // Valid as long as no allocation happens before buffer_data.
                let view = js_sys::Float32Array::view(&vertices);
                self.gl.buffer_data_with_array_buffer_view(
                    WebGl2RenderingContext::ARRAY_BUFFER,
                    &view,
                    WebGl2RenderingContext::STATIC_DRAW,
                );
            }

            let index_buffer = self
                .gl
                .create_buffer()
                .ok_or_else(|| JsValue::from_str("failed to create index buffer"))?;
            self.gl.bind_buffer(
                WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER,
                Some(&index_buffer),
            );
            unsafe {
                let view = js_sys::Uint32Array::view(&primitive.indices);
                self.gl.buffer_data_with_array_buffer_view(
                    WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER,
                    &view,
                    WebGl2RenderingContext::STATIC_DRAW,
                );
            }

            self.draws.push(DrawCall {
                vertex_buffer,
                index_buffer,
                index_count: primitive.indices.len() as i32,
                world,
                base_color: primitive.base_color,
            });
        }
        for child in &node.children {
            self.upload_node(child, &world)?;
        }
        Ok(())
    }

    pub fn set_viewport(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }

    /// Draw one frame of the uploaded scene
    pub fn render(&self, camera: &Camera, scene_transform: &Matrix4<f32>) {
        let gl = &self.gl;
        gl.clear_color(
            CLEAR_COLOR[0],
            CLEAR_COLOR[1],
            CLEAR_COLOR[2],
            CLEAR_COLOR[3],
        );
        gl.clear(
            WebGl2RenderingContext::COLOR_BUFFER_BIT | WebGl2RenderingContext::DEPTH_BUFFER_BIT,
        );

        if self.draws.is_empty() {
            return;
        }

        gl.use_program(Some(&self.program));

        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        let light_direction = Vector3::new(-0.4, -0.8, -0.45).normalize();

        gl.uniform3f(
            self.u_light_direction.as_ref(),
            light_direction.x,
            light_direction.y,
            light_direction.z,
        );
        gl.uniform3f(
            self.u_light_color.as_ref(),
            LIGHT_COLOR[0],
            LIGHT_COLOR[1],
            LIGHT_COLOR[2],
        );
        gl.uniform3f(self.u_ambient.as_ref(), AMBIENT[0], AMBIENT[1], AMBIENT[2]);

        let stride = 6 * std::mem::size_of::<f32>() as i32;
        for draw in &self.draws {
            let model = scene_transform * draw.world;
            let mvp = Transform::mvp_matrix(&model, &view, &projection);

            gl.uniform_matrix4fv_with_f32_array(self.u_mvp.as_ref(), false, mvp.as_slice());
            gl.uniform_matrix4fv_with_f32_array(self.u_model.as_ref(), false, model.as_slice());
            gl.uniform4f(
                self.u_base_color.as_ref(),
                draw.base_color[0],
                draw.base_color[1],
                draw.base_color[2],
                draw.base_color[3],
            );

            gl.bind_buffer(
                WebGl2RenderingContext::ARRAY_BUFFER,
                Some(&draw.vertex_buffer),
            );
            gl.vertex_attrib_pointer_with_i32(
                self.position_location,
                3,
                WebGl2RenderingContext::FLOAT,
                false,
                stride,
                0,
            );
            gl.enable_vertex_attrib_array(self.position_location);
            gl.vertex_attrib_pointer_with_i32(
                self.normal_location,
                3,
                WebGl2RenderingContext::FLOAT,
                false,
                stride,
                3 * std::mem::size_of::<f32>() as i32,
            );
            gl.enable_vertex_attrib_array(self.normal_location);

            gl.bind_buffer(
                WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER,
                Some(&draw.index_buffer),
            );
            gl.draw_elements_with_i32(
                WebGl2RenderingContext::TRIANGLES,
                draw.index_count,
                WebGl2RenderingContext::UNSIGNED_INT,
                0,
            );
        }
    }
}

fn compile_shader(
    gl: &WebGl2RenderingContext,
    shader_type: u32,
    source: &str,
) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| JsValue::from_str("failed to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, WebGl2RenderingContext::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader compile error".to_string());
        Err(JsValue::from_str(&format!("shader compile failed: {info}")))
    }
}

fn link_program(
    gl: &WebGl2RenderingContext,
    vertex_shader: &WebGlShader,
    fragment_shader: &WebGlShader,
) -> Result<WebGlProgram, JsValue> {
    let program = gl
        .create_program()
        .ok_or_else(|| JsValue::from_str("failed to create program"))?;
    gl.attach_shader(&program, vertex_shader);
    gl.attach_shader(&program, fragment_shader);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, WebGl2RenderingContext::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let info = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program link error".to_string());
        Err(JsValue::from_str(&format!("program link failed: {info}")))
    }
}
