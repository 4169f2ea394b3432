#![allow(dead_code)]

use crate::color::Rgba8;
use crate::image::Image;
use crate::matrix::Mat4;
use crate::shader::{Shader, ShadingModel};
use crate::state::{ClearMask, EnableFlag, LightParam, MaterialParam, MatrixMode, PrimitiveType, State, TexEnvMode};
use crate::texture::Sampler;
use crate::vector::{Vec3, Vec4};
use crate::vertex::{Fragment, VertexIn, VertexScreen};

/// The immediate-mode pipeline: owns the framebuffer, the optional depth
/// buffer, and the full mutable `State`. `begin`/`end` batch a sequence
/// of vertex submissions into one rasterize-and-shade pass.
pub struct Pipeline {
    state: State,
    framebuffer: Image,
    depth_buffer: Option<Image>,
    vertex_queue: Vec<VertexIn>,
}

impl Pipeline {
    pub fn new(width: usize, height: usize) -> Pipeline {
        let mut state = State::new();
        state.viewport_width = width;
        state.viewport_height = height;
        Pipeline {
            state,
            framebuffer: Image::new(width, height),
            depth_buffer: None,
            vertex_queue: Vec::new(),
        }
    }

    pub fn framebuffer(&self) -> &Image {
        &self.framebuffer
    }

    // ---- matrix ops ----

    pub fn matrix_mode(&mut self, mode: MatrixMode) {
        self.state.matrix_mode = mode;
    }

    pub fn push_matrix(&mut self) {
        self.state.active_stack_mut().push();
    }

    pub fn pop_matrix(&mut self) {
        self.state.active_stack_mut().pop();
    }

    pub fn load_identity(&mut self) {
        self.state.active_stack_mut().load_identity();
    }

    pub fn mult_matrix(&mut self, column_major: &[f32; 16]) {
        let m = Mat4::from_column_major(column_major);
        let top = *self.state.active_stack().top();
        *self.state.active_stack_mut().top_mut() = &top * &m;
    }

    pub fn translate(&mut self, t: Vec3) {
        let top = *self.state.active_stack().top();
        *self.state.active_stack_mut().top_mut() = &top * &Mat4::translation(&t);
    }

    pub fn scale(&mut self, s: Vec3) {
        let top = *self.state.active_stack().top();
        *self.state.active_stack_mut().top_mut() = &top * &Mat4::scale(&s);
    }

    pub fn rotate(&mut self, axis: Vec3, angle_radians: f32) {
        let top = *self.state.active_stack().top();
        *self.state.active_stack_mut().top_mut() = &top * &Mat4::rotation(&axis, angle_radians);
    }

    pub fn frustum(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        let m = Mat4::frustum(left, right, bottom, top, near, far);
        let current = *self.state.active_stack().top();
        *self.state.active_stack_mut().top_mut() = &current * &m;
    }

    pub fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        let m = Mat4::ortho(left, right, bottom, top, near, far);
        let current = *self.state.active_stack().top();
        *self.state.active_stack_mut().top_mut() = &current * &m;
    }

    pub fn viewport(&mut self, x: i32, y: i32, width: usize, height: usize) {
        self.state.viewport_x = x;
        self.state.viewport_y = y;
        self.state.viewport_width = width;
        self.state.viewport_height = height;
        self.framebuffer.resize(width, height);
        if let Some(depth) = &mut self.depth_buffer {
            depth.resize(width, height);
        }
    }

    // ---- current-surface attributes ----

    pub fn color3f(&mut self, r: f32, g: f32, b: f32) {
        self.state.current_color = Rgba8::from_f32(r, g, b, 1.0);
    }

    pub fn normal3f(&mut self, x: f32, y: f32, z: f32) {
        self.state.current_normal = Vec3::new(x, y, z);
    }

    pub fn tex_coord2f(&mut self, u: f32, v: f32) {
        self.state.current_tex_coord = Vec3::new(u, v, 0.0);
    }

    /// Sets the full (u, v, w) tuple; the sampler only ever reads (u, v),
    /// but `w` survives to the fragment stage for the mesh renderer's
    /// UVW-to-RGB debug mode.
    pub fn tex_coord3f(&mut self, u: f32, v: f32, w: f32) {
        self.state.current_tex_coord = Vec3::new(u, v, w);
    }

    pub fn vertex3f(&mut self, x: f32, y: f32, z: f32) {
        self.vertex_queue.push(VertexIn {
            position: Vec4::new(x, y, z, 1.0),
            color: self.state.current_color,
            normal: self.state.current_normal,
            tex_coord: self.state.current_tex_coord,
        });
    }

    // ---- enable / disable ----

    pub fn enable(&mut self, flag: EnableFlag) {
        let changed = self.state.set_enabled(flag, true);
        if changed && flag == EnableFlag::DepthTest {
            let (w, h) = (self.framebuffer.width(), self.framebuffer.height());
            self.depth_buffer = Some(Image::filled(w, h, Rgba8::new(0, 0, 0, 255)));
        }
    }

    pub fn disable(&mut self, flag: EnableFlag) {
        self.state.set_enabled(flag, false);
    }

    // ---- light / material / texture ----

    pub fn light(&mut self, mask: LightParam, value: Vec4) {
        if mask.contains(LightParam::POSITION) {
            self.state.set_light_position(value.xyz());
        }
        if mask.contains(LightParam::AMBIENT) {
            self.state.light.ambient = value.xyz();
        }
        if mask.contains(LightParam::DIFFUSE) {
            self.state.light.diffuse = value.xyz();
        }
        if mask.contains(LightParam::SPECULAR) {
            self.state.light.specular = value.xyz();
        }
    }

    pub fn material_fv(&mut self, mask: MaterialParam, value: Vec4) {
        if mask.contains(MaterialParam::AMBIENT) {
            self.state.material.ambient = value.xyz();
        }
        if mask.contains(MaterialParam::DIFFUSE) {
            self.state.material.diffuse = value.xyz();
        }
        if mask.contains(MaterialParam::SPECULAR) {
            self.state.material.specular = value.xyz();
        }
        if mask.contains(MaterialParam::EMISSION) {
            self.state.material.emission = value.xyz();
        }
    }

    pub fn material_f(&mut self, shininess: f32) {
        self.state.material.shininess = shininess;
    }

    pub fn tex_env_mode(&mut self, mode: TexEnvMode) {
        self.state.tex_env_mode = mode;
    }

    pub fn tex_image_2d(&mut self, image: Image) {
        self.state.texture = Some(image);
    }

    // ---- clear ----

    pub fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.state.clear_color = Rgba8::from_f32(r, g, b, a);
    }

    pub fn clear(&mut self, mask: ClearMask) {
        if mask.contains(ClearMask::COLOR) {
            self.framebuffer.fill(self.state.clear_color);
        }
        if mask.contains(ClearMask::DEPTH) {
            if let Some(depth) = &mut self.depth_buffer {
                depth.fill(Rgba8::new(0, 0, 0, 255));
            }
        }
    }

    pub fn point_size(&mut self, size: i32) {
        self.state.point_size = size;
    }

    pub fn line_width(&mut self, width: i32) {
        self.state.line_width = width;
    }

    // ---- begin / end ----

    pub fn begin(&mut self, primitive: PrimitiveType) {
        self.state.draw_type = Some(primitive);
        self.vertex_queue.clear();
    }

    pub fn end(&mut self) {
        let primitive = match self.state.draw_type.take() {
            Some(p) => p,
            None => {
                log::warn!("end() called without a matching begin()");
                return;
            }
        };

        let shading_model = if self.state.is_enabled(EnableFlag::Lighting) && self.state.is_enabled(EnableFlag::PhongShading) {
            ShadingModel::Phong
        } else {
            ShadingModel::Gouraud
        };
        let light = if self.state.is_enabled(EnableFlag::Lighting) {
            Some(self.state.light)
        } else {
            None
        };
        let texturing_enabled = self.state.is_enabled(EnableFlag::Texture2D) && self.state.texture.is_some();

        let shader = Shader::new(
            *self.state.modelview.top(),
            *self.state.projection.top(),
            light,
            self.state.material,
            shading_model,
            texturing_enabled,
        );

        let submitted: Vec<VertexIn> = self.vertex_queue.drain(..).collect();
        let raster_queue: Vec<VertexScreen> = submitted
            .into_iter()
            .map(|v| {
                let mut screen = shader.vertex_shader(&v);
                screen.position = self.normalize_to_window(&screen.position);
                screen
            })
            .collect();

        let mut fragment_queue = Vec::new();
        let group_size = match primitive {
            PrimitiveType::Points => 1,
            PrimitiveType::Lines => 2,
            PrimitiveType::Triangles => 3,
        };

        for group in raster_queue.chunks(group_size) {
            if group.len() != group_size {
                continue;
            }
            match primitive {
                PrimitiveType::Points => self.rasterize_point(&group[0], &mut fragment_queue),
                PrimitiveType::Lines => self.rasterize_line(&group[0], &group[1], &mut fragment_queue),
                PrimitiveType::Triangles => self.rasterize_triangle(&group[0], &group[1], &group[2], &mut fragment_queue),
            }
        }

        let sampler = Sampler::new(self.state.texture.as_ref());
        let tex_env_mode = self.state.tex_env_mode;
        for f in fragment_queue {
            let shaded = shader.fragment_shader(&f, &sampler);
            let out = match tex_env_mode {
                TexEnvMode::Replace => shaded,
                TexEnvMode::Modulate => shaded.modulate(&f.color),
            };
            self.framebuffer.set_pixel(f.col, f.row, out);
        }
    }

    /// Maps NDC (after the shader's perspective divide) into pixel
    /// space, flipping y because row 0 is the top of the framebuffer,
    /// and packs z into an 8-bit depth byte.
    fn normalize_to_window(&self, ndc: &Vec3) -> Vec3 {
        let w = self.state.viewport_width as f32;
        let h = self.state.viewport_height as f32;
        let cx = self.state.viewport_x as f32 + w / 2.0;
        let cy = self.state.viewport_y as f32 + h / 2.0;

        let px = cx + (w / 2.0) * ndc.x;
        let py = h - (cy + (h / 2.0) * ndc.y);
        let pz = 0.5 * (ndc.z + 1.0) * 255.0;
        Vec3::new(px, py, pz)
    }

    fn depth_test_and_write(&mut self, col: usize, row: usize, depth_byte: u8) -> bool {
        if !self.state.is_enabled(EnableFlag::DepthTest) {
            return true;
        }
        let depth = match &mut self.depth_buffer {
            Some(d) => d,
            None => return true,
        };
        if col >= depth.width() || row >= depth.height() {
            return false;
        }
        let existing = depth.get_pixel(col, row).a;
        if depth_byte > existing {
            false
        } else {
            depth.set_pixel(col, row, Rgba8::new(0, 0, 0, depth_byte));
            true
        }
    }

    fn in_bounds(&self, col: i64, row: i64) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.framebuffer.width() && (row as usize) < self.framebuffer.height()
    }

    fn emit(&mut self, col: i64, row: i64, v: &VertexScreen, queue: &mut Vec<Fragment>) {
        if !self.in_bounds(col, row) {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        let depth_byte = v.position.z.clamp(0.0, 255.0) as u8;
        if !self.depth_test_and_write(col, row, depth_byte) {
            return;
        }
        queue.push(Fragment {
            col,
            row,
            depth_byte,
            color: v.color,
            normal: v.normal,
            tex_coord: v.tex_coord,
            eye_position: v.eye_position,
            inv_w: v.inv_w,
        });
    }

    fn rasterize_point(&mut self, v: &VertexScreen, queue: &mut Vec<Fragment>) {
        let size = self.state.point_size.max(1) as i64;
        let cx = v.position.x.floor() as i64;
        let cy = v.position.y.floor() as i64;
        let half = size / 2;
        for dy in 0..size {
            for dx in 0..size {
                self.emit(cx - half + dx, cy - half + dy, v, queue);
            }
        }
    }

    /// Bresenham's integer midpoint line algorithm. Line widths greater
    /// than 1 thicken the stroke diagonally (`col+j, row+j`) rather than
    /// perpendicular to the line, reproducing the original renderer's
    /// behavior verbatim (see DESIGN.md).
    fn rasterize_line(&mut self, a: &VertexScreen, b: &VertexScreen, queue: &mut Vec<Fragment>) {
        let x0 = a.position.x.round() as i64;
        let y0 = a.position.y.round() as i64;
        let x1 = b.position.x.round() as i64;
        let y1 = b.position.y.round() as i64;

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let steps = dx.max(dy).max(1);
        let width = self.state.line_width.max(1);

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = x0 + (x1 - x0) * i / steps;
            let y = y0 + (y1 - y0) * i / steps;
            let interpolated = VertexScreen::lerp(a, b, t);
            for j in 0..width {
                self.emit(x + j as i64, y + j as i64, &interpolated, queue);
            }
        }
    }

    /// Half-plane/barycentric triangle rasterizer; interpolation is in
    /// screen space (no perspective-correct reweighting by `inv_w`).
    fn rasterize_triangle(&mut self, a: &VertexScreen, b: &VertexScreen, c: &VertexScreen, queue: &mut Vec<Fragment>) {
        let (ax, ay) = (a.position.x, a.position.y);
        let (bx, by) = (b.position.x, b.position.y);
        let (cx, cy) = (c.position.x, c.position.y);

        let edge = |x0: f32, y0: f32, x1: f32, y1: f32, px: f32, py: f32| -> f32 {
            (x1 - x0) * (py - y0) - (y1 - y0) * (px - x0)
        };

        let area = edge(ax, ay, bx, by, cx, cy);
        if area.abs() < f32::EPSILON {
            log::trace!("degenerate triangle (zero area), skipping");
            return;
        }

        let min_x = ax.min(bx).min(cx).floor().max(0.0) as i64;
        let max_x = ax.max(bx).max(cx).ceil().min(self.framebuffer.width() as f32) as i64;
        let min_y = ay.min(by).min(cy).floor().max(0.0) as i64;
        let max_y = ay.max(by).max(cy).ceil().min(self.framebuffer.height() as f32) as i64;

        for row in min_y..max_y {
            for col in min_x..max_x {
                let px = col as f32 + 0.5;
                let py = row as f32 + 0.5;

                let w0 = edge(bx, by, cx, cy, px, py) / area;
                let w1 = edge(cx, cy, ax, ay, px, py) / area;
                let w2 = edge(ax, ay, bx, by, px, py) / area;

                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let z = w0 * a.position.z + w1 * b.position.z + w2 * c.position.z;
                let interpolated = VertexScreen {
                    position: Vec3::new(px, py, z),
                    color: Rgba8::from_vec3(
                        &(&(&a.color.to_vec3() * w0) + &(&(&b.color.to_vec3() * w1) + &(&c.color.to_vec3() * w2))),
                        1.0,
                    ),
                    normal: &(&a.normal * w0) + &(&(&b.normal * w1) + &(&c.normal * w2)),
                    tex_coord: Vec3::new(
                        a.tex_coord.x * w0 + b.tex_coord.x * w1 + c.tex_coord.x * w2,
                        a.tex_coord.y * w0 + b.tex_coord.y * w1 + c.tex_coord.y * w2,
                        a.tex_coord.z * w0 + b.tex_coord.z * w1 + c.tex_coord.z * w2,
                    ),
                    eye_position: &(&a.eye_position * w0) + &(&(&b.eye_position * w1) + &(&c.eye_position * w2)),
                    inv_w: a.inv_w * w0 + b.inv_w * w1 + c.inv_w * w2,
                };
                self.emit(col, row, &interpolated, queue);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ortho_pipeline(size: usize) -> Pipeline {
        let mut p = Pipeline::new(size, size);
        p.matrix_mode(MatrixMode::Projection);
        p.ortho(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        p.matrix_mode(MatrixMode::ModelView);
        p
    }

    #[test]
    fn test_red_point_at_center() {
        let mut p = ortho_pipeline(10);
        p.color3f(1.0, 0.0, 0.0);
        p.begin(PrimitiveType::Points);
        p.vertex3f(0.0, 0.0, 0.0);
        p.end();
        assert_eq!(p.framebuffer().get_pixel(5, 5), Rgba8::new(255, 0, 0, 255));
        assert_eq!(p.framebuffer().get_pixel(0, 0), Rgba8::transparent_black());
    }

    #[test]
    fn test_horizontal_line_spans_row() {
        let mut p = ortho_pipeline(10);
        p.color3f(0.0, 1.0, 0.0);
        p.begin(PrimitiveType::Lines);
        p.vertex3f(-1.0, 0.0, 0.0);
        p.vertex3f(1.0, 0.0, 0.0);
        p.end();
        let row = 5;
        let mut hit = 0;
        for col in 0..10 {
            if p.framebuffer().get_pixel(col, row) == Rgba8::new(0, 255, 0, 255) {
                hit += 1;
            }
        }
        assert!(hit >= 8);
    }

    #[test]
    fn test_triangle_fills_interior() {
        let mut p = ortho_pipeline(10);
        p.color3f(1.0, 1.0, 1.0);
        p.begin(PrimitiveType::Triangles);
        p.vertex3f(-1.0, -1.0, 0.0);
        p.vertex3f(1.0, -1.0, 0.0);
        p.vertex3f(0.0, 1.0, 0.0);
        p.end();
        let mut written = 0;
        for row in 0..10 {
            for col in 0..10 {
                if p.framebuffer().get_pixel(col, row).a > 0 {
                    written += 1;
                }
            }
        }
        assert!(written >= 30);
    }

    #[test]
    fn test_degenerate_triangle_emits_nothing() {
        let mut p = ortho_pipeline(10);
        p.color3f(1.0, 1.0, 1.0);
        p.begin(PrimitiveType::Triangles);
        p.vertex3f(-1.0, 0.0, 0.0);
        p.vertex3f(0.0, 0.0, 0.0);
        p.vertex3f(1.0, 0.0, 0.0);
        p.end();
        for row in 0..10 {
            for col in 0..10 {
                assert_eq!(p.framebuffer().get_pixel(col, row), Rgba8::transparent_black());
            }
        }
    }

    #[test]
    fn test_depth_test_rejects_farther_pixel() {
        let mut p = ortho_pipeline(10);
        p.enable(EnableFlag::DepthTest);
        p.color3f(1.0, 0.0, 0.0);
        p.begin(PrimitiveType::Triangles);
        p.vertex3f(-1.0, -1.0, -1.0);
        p.vertex3f(1.0, -1.0, -1.0);
        p.vertex3f(0.0, 1.0, -1.0);
        p.end();
        p.color3f(0.0, 1.0, 0.0);
        p.begin(PrimitiveType::Triangles);
        p.vertex3f(-1.0, -1.0, 1.0);
        p.vertex3f(1.0, -1.0, 1.0);
        p.vertex3f(0.0, 1.0, 1.0);
        p.end();
        assert_eq!(p.framebuffer().get_pixel(5, 5), Rgba8::new(255, 0, 0, 255));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut p = ortho_pipeline(4);
        p.enable(EnableFlag::DepthTest);
        p.clear_color(0.1, 0.2, 0.3, 1.0);
        p.clear(ClearMask::COLOR | ClearMask::DEPTH);
        let once = p.framebuffer().clone();
        p.clear(ClearMask::COLOR | ClearMask::DEPTH);
        assert_eq!(p.framebuffer().clone(), once);
    }

    #[test]
    fn test_viewport_corner_mapping() {
        let p = ortho_pipeline(10);
        let bottom_left = p.normalize_to_window(&Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(bottom_left.x, 0.0);
        assert_eq!(bottom_left.y, 10.0);
        let top_right = p.normalize_to_window(&Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(top_right.x, 10.0);
        assert_eq!(top_right.y, 0.0);
    }
}
