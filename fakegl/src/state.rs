#![allow(dead_code)]

use bitflags::bitflags;

use crate::color::Rgba8;
use crate::image::Image;
use crate::light::Light;
use crate::material::Material;
use crate::matrix::Mat4;
use crate::vector::Vec3;

/// Which matrix stack `mult_matrix`/`rotate`/`scale`/`translate`/
/// `load_identity`/`push_matrix`/`pop_matrix` operate on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MatrixMode {
    ModelView,
    Projection,
}

/// Pipeline capabilities toggled by `enable`/`disable`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EnableFlag {
    Lighting,
    Texture2D,
    DepthTest,
    PhongShading,
}

/// How a bound texture combines with the interpolated vertex color.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TexEnvMode {
    Replace,
    Modulate,
}

/// Which primitive the vertex queue between `begin`/`end` is collected
/// for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PrimitiveType {
    Points,
    Lines,
    Triangles,
}

bitflags! {
    /// Buffers `clear` can target; bits are OR-able.
    pub struct ClearMask: u8 {
        const COLOR = 0b01;
        const DEPTH = 0b10;
    }
}

bitflags! {
    /// Bitmask selecting which material fields `material_fv` updates,
    /// matching the C `GLbitfield` pattern the state machine this is
    /// modeled on uses.
    pub struct MaterialParam: u8 {
        const AMBIENT = 0b0001;
        const DIFFUSE = 0b0010;
        const SPECULAR = 0b0100;
        const EMISSION = 0b1000;
        const AMBIENT_AND_DIFFUSE = Self::AMBIENT.bits | Self::DIFFUSE.bits;
    }
}

bitflags! {
    /// Bitmask selecting which light fields `light` updates.
    pub struct LightParam: u8 {
        const POSITION = 0b0001;
        const AMBIENT = 0b0010;
        const DIFFUSE = 0b0100;
        const SPECULAR = 0b1000;
    }
}

/// A matrix stack that is never empty; `pop` on a single-element stack
/// is a no-op (see Open Question resolution in DESIGN.md).
#[derive(Clone, Debug)]
pub struct MatrixStack {
    stack: Vec<Mat4>,
}

impl MatrixStack {
    pub fn new() -> MatrixStack {
        MatrixStack { stack: vec![Mat4::identity()] }
    }

    pub fn top(&self) -> &Mat4 {
        self.stack.last().expect("matrix stack is never empty")
    }

    pub fn top_mut(&mut self) -> &mut Mat4 {
        self.stack.last_mut().expect("matrix stack is never empty")
    }

    pub fn push(&mut self) {
        let top = *self.top();
        self.stack.push(top);
    }

    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            log::warn!("pop_matrix called with only one matrix on the stack, ignoring");
        }
    }

    pub fn load_identity(&mut self) {
        *self.top_mut() = Mat4::identity();
    }
}

impl Default for MatrixStack {
    fn default() -> MatrixStack {
        MatrixStack::new()
    }
}

/// The pipeline's full mutable configuration: matrix mode and stacks,
/// "sticky" current-surface attributes, enable flags, viewport, light,
/// material, texture, clear color, point size, line width, and the
/// active texture-environment mode.
pub struct State {
    pub matrix_mode: MatrixMode,
    pub modelview: MatrixStack,
    pub projection: MatrixStack,

    pub current_color: Rgba8,
    pub current_normal: Vec3,
    pub current_tex_coord: Vec3,

    lighting_enabled: bool,
    texture_2d_enabled: bool,
    depth_test_enabled: bool,
    phong_shading_enabled: bool,

    pub viewport_x: i32,
    pub viewport_y: i32,
    pub viewport_width: usize,
    pub viewport_height: usize,

    pub light: Light,
    pub material: Material,
    pub texture: Option<Image>,
    pub tex_env_mode: TexEnvMode,

    pub clear_color: Rgba8,
    pub point_size: i32,
    pub line_width: i32,

    pub draw_type: Option<PrimitiveType>,
}

impl State {
    pub fn new() -> State {
        State {
            matrix_mode: MatrixMode::ModelView,
            modelview: MatrixStack::new(),
            projection: MatrixStack::new(),
            current_color: Rgba8::white(),
            current_normal: Vec3::new(0.0, 0.0, 1.0),
            current_tex_coord: Vec3::zero(),
            lighting_enabled: false,
            texture_2d_enabled: false,
            depth_test_enabled: false,
            phong_shading_enabled: false,
            viewport_x: 0,
            viewport_y: 0,
            viewport_width: 0,
            viewport_height: 0,
            light: Light::default(),
            material: Material::default(),
            texture: None,
            tex_env_mode: TexEnvMode::Replace,
            clear_color: Rgba8::black(),
            point_size: 1,
            line_width: 1,
            draw_type: None,
        }
    }

    pub fn active_stack(&self) -> &MatrixStack {
        match self.matrix_mode {
            MatrixMode::ModelView => &self.modelview,
            MatrixMode::Projection => &self.projection,
        }
    }

    pub fn active_stack_mut(&mut self) -> &mut MatrixStack {
        match self.matrix_mode {
            MatrixMode::ModelView => &mut self.modelview,
            MatrixMode::Projection => &mut self.projection,
        }
    }

    pub fn is_enabled(&self, flag: EnableFlag) -> bool {
        match flag {
            EnableFlag::Lighting => self.lighting_enabled,
            EnableFlag::Texture2D => self.texture_2d_enabled,
            EnableFlag::DepthTest => self.depth_test_enabled,
            EnableFlag::PhongShading => self.phong_shading_enabled,
        }
    }

    /// Returns whether the enabled flag actually changed, so the
    /// pipeline knows whether to resize the depth buffer / reselect the
    /// active shader.
    pub fn set_enabled(&mut self, flag: EnableFlag, enabled: bool) -> bool {
        let slot = match flag {
            EnableFlag::Lighting => &mut self.lighting_enabled,
            EnableFlag::Texture2D => &mut self.texture_2d_enabled,
            EnableFlag::DepthTest => &mut self.depth_test_enabled,
            EnableFlag::PhongShading => &mut self.phong_shading_enabled,
        };
        let changed = *slot != enabled;
        *slot = enabled;
        changed
    }

    /// The light position is transformed into eye space by the
    /// currently active modelview matrix at the time it is set, not
    /// re-transformed afterwards.
    pub fn set_light_position(&mut self, object_space_position: Vec3) {
        self.light.position = self.modelview.top().mul_point3(&object_space_position);
    }
}

impl Default for State {
    fn default() -> State {
        State::new()
    }
}
