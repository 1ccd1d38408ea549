use glow::HasContext;

use super::camera::OrbitCamera;
use super::mesh::{self, LineMeshData, MeshData, TexturedMeshData};
use crate::state::settings::GridSettings;
use crate::tile::TileImage;

/// World-space position of the directional light (shines toward the origin)
const LIGHT_POSITION: glam::Vec3 = glam::Vec3::new(5.0, 10.0, 5.0);

// ── Render parameters ────────────────────────────────────────

/// Parameters for rendering the viewport
pub struct RenderParams {
    /// Viewport rectangle [x, y, width, height] in pixels
    pub viewport: [f32; 4],
    /// Show grid (only drawn while the ground has no tile)
    pub grid_visible: bool,
    /// Background color RGB
    pub bg_color: [u8; 3],
    /// Flat ground color RGB, used until a tile is uploaded
    pub ground_color: [u8; 3],
}

// ── GPU mesh handles ─────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

struct GpuLines {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: i32,
}

// ── Main GL renderer ─────────────────────────────────────────

/// Record `key` as the uploaded state; true when it differs from the previous one
fn key_changed<K: PartialEq + Copy>(cached: &mut Option<K>, key: K) -> bool {
    if *cached == Some(key) {
        return false;
    }
    *cached = Some(key);
    true
}

pub struct GlRenderer {
    mesh_program: glow::Program,
    line_program: glow::Program,
    ground_program: glow::Program,
    ground: GpuMesh,
    /// Map tile texture, once the fetch has completed
    tile_texture: Option<glow::Texture>,
    /// Decoded tile waiting for the next paint (needs the GL context)
    pending_tile: Option<TileImage>,
    grid: Option<GpuLines>,
    /// Cached grid settings to detect changes
    cached_grid_settings: Option<(i32, f32, f32)>,
    building: Option<GpuMesh>,
    last_building_version: u64,
    outline: Option<GpuLines>,
    /// Capture version and colour of the uploaded outline
    cached_outline_key: Option<(u64, [u8; 3])>,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context, ground_size: f32) -> Result<Self, String> {
        let mesh_program = compile_program(gl, MESH_VERT, MESH_FRAG)?;
        let line_program = compile_program(gl, LINE_VERT, LINE_FRAG)?;
        let ground_program = compile_program(gl, GROUND_VERT, GROUND_FRAG)?;

        let ground = upload_textured(gl, &mesh::ground_quad(ground_size))?;

        let grid_settings = GridSettings::default();
        let grid_data = mesh::grid(grid_settings.range, grid_settings.size, grid_settings.opacity);
        let grid = Some(upload_lines(gl, &grid_data)?);

        Ok(Self {
            mesh_program,
            line_program,
            ground_program,
            ground,
            tile_texture: None,
            pending_tile: None,
            grid,
            cached_grid_settings: Some((grid_settings.range, grid_settings.size, grid_settings.opacity)),
            building: None,
            last_building_version: 0,
            outline: None,
            cached_outline_key: None,
        })
    }

    /// Queue a decoded tile; it is uploaded on the next paint
    pub fn queue_tile(&mut self, image: TileImage) {
        self.pending_tile = Some(image);
    }

    /// Upload a queued tile as the ground texture
    pub fn upload_pending_tile(&mut self, gl: &glow::Context) {
        let Some(image) = self.pending_tile.take() else {
            return;
        };
        match upload_texture(gl, &image) {
            Ok(texture) => {
                if let Some(old) = self.tile_texture.replace(texture) {
                    unsafe { gl.delete_texture(old) };
                }
            }
            Err(e) => tracing::error!("Tile texture upload failed: {e}"),
        }
    }

    /// Update grid mesh based on settings
    pub fn update_grid(&mut self, gl: &glow::Context, settings: &GridSettings) {
        let new_settings = (settings.range, settings.size, settings.opacity);

        if self.cached_grid_settings == Some(new_settings) {
            return;
        }

        if let Some(old) = self.grid.take() {
            delete_lines(gl, &old);
        }

        let grid_data = mesh::grid(settings.range, settings.size, settings.opacity);
        match upload_lines(gl, &grid_data) {
            Ok(lines) => self.grid = Some(lines),
            Err(e) => tracing::error!("Grid upload failed: {e}"),
        }
        self.cached_grid_settings = Some(new_settings);
    }

    /// Replace the building mesh when its version changes
    pub fn sync_building(&mut self, gl: &glow::Context, data: Option<&MeshData>, version: u64) {
        if version == self.last_building_version {
            return;
        }
        self.last_building_version = version;

        if let Some(old) = self.building.take() {
            delete_mesh(gl, &old);
        }
        if let Some(mesh_data) = data {
            match upload_mesh(gl, mesh_data) {
                Ok(gpu) => self.building = Some(gpu),
                Err(e) => tracing::error!("Building upload failed: {e}"),
            }
        }
    }

    /// Replace the preview outline when the capture or its colour changes
    pub fn sync_outline(
        &mut self,
        gl: &glow::Context,
        data: Option<&LineMeshData>,
        version: u64,
        color: [u8; 3],
    ) {
        if !key_changed(&mut self.cached_outline_key, (version, color)) {
            return;
        }

        if let Some(old) = self.outline.take() {
            delete_lines(gl, &old);
        }
        if let Some(line_data) = data {
            match upload_lines(gl, line_data) {
                Ok(gpu) => self.outline = Some(gpu),
                Err(e) => tracing::error!("Outline upload failed: {e}"),
            }
        }
    }

    /// Render the scene
    pub fn paint(&self, gl: &glow::Context, camera: &OrbitCamera, params: &RenderParams) {
        let aspect = params.viewport[2] / params.viewport[3];
        let vp = camera.view_projection(aspect);

        unsafe {
            gl.viewport(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.scissor(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.enable(glow::SCISSOR_TEST);

            gl.clear_color(
                params.bg_color[0] as f32 / 255.0,
                params.bg_color[1] as f32 / 255.0,
                params.bg_color[2] as f32 / 255.0,
                1.0,
            );
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);
            // Both sides of every face are drawn
            gl.disable(glow::CULL_FACE);

            // Ground
            gl.use_program(Some(self.ground_program));
            set_uniform_mat4(gl, self.ground_program, "u_mvp", &vp);
            let ground = glam::Vec3::new(
                params.ground_color[0] as f32 / 255.0,
                params.ground_color[1] as f32 / 255.0,
                params.ground_color[2] as f32 / 255.0,
            );
            set_uniform_vec3(gl, self.ground_program, "u_color", &ground);
            set_uniform_i32(gl, self.ground_program, "u_use_texture", self.tile_texture.is_some() as i32);
            set_uniform_i32(gl, self.ground_program, "u_tile", 0);
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, self.tile_texture);
            draw_mesh(gl, &self.ground);
            gl.bind_texture(glow::TEXTURE_2D, None);

            // Grid and outline (lines)
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            gl.use_program(Some(self.line_program));
            set_uniform_mat4(gl, self.line_program, "u_mvp", &vp);

            if params.grid_visible && self.tile_texture.is_none() {
                if let Some(ref grid) = self.grid {
                    draw_lines(gl, grid);
                }
            }

            if let Some(ref outline) = self.outline {
                gl.line_width(2.0);
                draw_lines(gl, outline);
                gl.line_width(1.0);
            }

            // Building
            if let Some(ref building) = self.building {
                gl.use_program(Some(self.mesh_program));
                set_uniform_mat4(gl, self.mesh_program, "u_mvp", &vp);
                let light_dir = LIGHT_POSITION.normalize();
                set_uniform_vec3(gl, self.mesh_program, "u_light_dir", &light_dir);
                draw_mesh(gl, building);
            }

            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }
    }

    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.mesh_program);
            gl.delete_program(self.line_program);
            gl.delete_program(self.ground_program);
            if let Some(texture) = self.tile_texture {
                gl.delete_texture(texture);
            }
        }
        delete_mesh(gl, &self.ground);
        if let Some(ref grid) = self.grid {
            delete_lines(gl, grid);
        }
        if let Some(ref outline) = self.outline {
            delete_lines(gl, outline);
        }
        if let Some(ref building) = self.building {
            delete_mesh(gl, building);
        }
    }
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> Result<GpuMesh, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 9 * 4; // 9 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // color: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 3, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck_cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

fn upload_textured(gl: &glow::Context, data: &TexturedMeshData) -> Result<GpuMesh, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 5 * 4; // 5 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // uv: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, stride, 3 * 4);

        let ibo = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck_cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

fn upload_lines(gl: &glow::Context, data: &LineMeshData) -> Result<GpuLines, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 7 * 4; // 7 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // color: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, stride, 3 * 4);

        gl.bind_vertex_array(None);

        Ok(GpuLines {
            vao,
            vbo,
            vertex_count: data.vertex_count() as i32,
        })
    }
}

fn upload_texture(gl: &glow::Context, image: &TileImage) -> Result<glow::Texture, String> {
    let expected = image.width as usize * image.height as usize * 4;
    if image.rgba.len() != expected {
        return Err(format!(
            "Tile buffer is {} bytes, expected {expected}",
            image.rgba.len()
        ));
    }

    unsafe {
        let texture = gl.create_texture()?;
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            image.width as i32,
            image.height as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(&image.rgba)),
        );
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
        gl.bind_texture(glow::TEXTURE_2D, None);
        Ok(texture)
    }
}

fn delete_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    unsafe {
        gl.delete_vertex_array(mesh.vao);
        gl.delete_buffer(mesh.vbo);
        gl.delete_buffer(mesh.ibo);
    }
}

fn delete_lines(gl: &glow::Context, lines: &GpuLines) {
    unsafe {
        gl.delete_vertex_array(lines.vao);
        gl.delete_buffer(lines.vbo);
    }
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

unsafe fn draw_lines(gl: &glow::Context, lines: &GpuLines) {
    gl.bind_vertex_array(Some(lines.vao));
    gl.draw_arrays(glow::LINES, 0, lines.vertex_count);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Result<glow::Program, String> {
    unsafe {
        let program = gl.create_program()?;

        let mut shaders = Vec::with_capacity(2);
        for (kind, src, label) in [
            (glow::VERTEX_SHADER, vert_src, "Vertex"),
            (glow::FRAGMENT_SHADER, frag_src, "Fragment"),
        ] {
            let shader = gl.create_shader(kind)?;
            gl.shader_source(shader, src);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                tracing::error!("{label} shader error: {log}");
            }
            gl.attach_shader(program, shader);
            shaders.push(shader);
        }

        gl.link_program(program);
        let linked = gl.get_program_link_status(program);

        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        if !linked {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(format!("Program link error: {log}"));
        }
        Ok(program)
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &glam::Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: &glam::Vec3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v.x, v.y, v.z);
    }
}

fn set_uniform_i32(gl: &glow::Context, program: glow::Program, name: &str, v: i32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_i32(loc.as_ref(), v);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            slice.as_ptr() as *const u8,
            std::mem::size_of_val(slice),
        )
    }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;

out vec3 v_normal;
out vec3 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_normal = a_normal;
    v_color = a_color;
}
"#;

const MESH_FRAG: &str = r#"#version 330 core
uniform vec3 u_light_dir;

in vec3 v_normal;
in vec3 v_color;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    if (!gl_FrontFacing) {
        n = -n;
    }
    float diffuse = max(dot(n, u_light_dir), 0.0);
    float ambient = 0.25;
    float light = ambient + diffuse * 0.75;
    frag_color = vec4(v_color * light, 1.0);
}
"#;

const LINE_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

out vec4 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_color = a_color;
}
"#;

const LINE_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;

const GROUND_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec2 a_uv;

out vec2 v_uv;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_uv = a_uv;
}
"#;

const GROUND_FRAG: &str = r#"#version 330 core
uniform sampler2D u_tile;
uniform int u_use_texture;
uniform vec3 u_color;

in vec2 v_uv;
out vec4 frag_color;

void main() {
    if (u_use_texture != 0) {
        frag_color = vec4(texture(u_tile, v_uv).rgb, 1.0);
    } else {
        frag_color = vec4(u_color, 1.0);
    }
}
"#;
