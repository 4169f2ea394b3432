#![allow(dead_code)]

use crate::color::Rgba8;
use crate::vector::{lerp_vec3, lerp_vec4, Vec3, Vec4};

/// A vertex as submitted by `vertex3f`, carrying a snapshot of whatever
/// the current-surface attributes were at submission time. `tex_coord`
/// is a full (u, v, w) triple rather than a bare pair so the mesh
/// renderer's UVW-to-RGB debug mode has a w component to draw on; the
/// sampler itself only ever reads (u, v).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct VertexIn {
    pub position: Vec4,
    pub color: Rgba8,
    pub normal: Vec3,
    pub tex_coord: Vec3,
}

/// A vertex after the shader's vertex stage: position has been carried
/// through the viewport transform into pixel space (x, y) with a packed
/// depth byte in `z`; `inv_w` is `1 / clip.w` kept for the (unused in
/// this screen-space design, but retained for completeness) perspective
/// weight.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct VertexScreen {
    pub position: Vec3,
    pub color: Rgba8,
    pub normal: Vec3,
    pub tex_coord: Vec3,
    pub eye_position: Vec4,
    pub inv_w: f32,
}

impl VertexScreen {
    pub fn lerp(a: &VertexScreen, b: &VertexScreen, t: f32) -> VertexScreen {
        VertexScreen {
            position: lerp_vec3(&a.position, &b.position, t),
            color: Rgba8::from_vec3(
                &lerp_vec3(&a.color.to_vec3(), &b.color.to_vec3(), t),
                a.color.alpha_f32() + (b.color.alpha_f32() - a.color.alpha_f32()) * t,
            ),
            normal: lerp_vec3(&a.normal, &b.normal, t),
            tex_coord: lerp_vec3(&a.tex_coord, &b.tex_coord, t),
            eye_position: lerp_vec4(&a.eye_position, &b.eye_position, t),
            inv_w: a.inv_w + (b.inv_w - a.inv_w) * t,
        }
    }
}

/// A single shaded pixel destined for the framebuffer, produced by a
/// rasterizer and consumed by the fragment stage.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Fragment {
    pub col: usize,
    pub row: usize,
    pub depth_byte: u8,
    pub color: Rgba8,
    pub normal: Vec3,
    pub tex_coord: Vec3,
    pub eye_position: Vec4,
    pub inv_w: f32,
}
