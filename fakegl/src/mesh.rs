#![allow(dead_code)]

use crate::pipeline::Pipeline;
use crate::state::{EnableFlag, LightParam, MaterialParam, PrimitiveType, TexEnvMode};
use crate::vector::{Vec3, Vec4};

/// One reference into a mesh's vertex/texCoord/normal arrays, matching a
/// single corner of a face.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FaceVertex {
    pub vertex: usize,
    pub tex_coord: usize,
    pub normal: usize,
}

/// A polygonal mesh: flat vertex/normal/texCoord arrays and a list of
/// faces, each a sequence of `FaceVertex` corners with 0-based indices.
/// Faces are triangle-fanned from corner 0 by `render_mesh`; this type
/// carries no connectivity beyond that.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec3>,
    pub faces: Vec<Vec<FaceVertex>>,
}

impl Mesh {
    pub fn new() -> Mesh {
        Mesh::default()
    }

    /// The arithmetic mean of all vertex positions.
    pub fn centroid(&self) -> Vec3 {
        if self.vertices.is_empty() {
            return Vec3::zero();
        }
        let sum = self.vertices.iter().fold(Vec3::zero(), |acc, v| &acc + v);
        &sum * (1.0 / self.vertices.len() as f32)
    }

    /// The maximum Euclidean distance from any vertex to the centroid,
    /// used by `RenderParameters::scale_object` to normalize the mesh to
    /// a unit-ish size before zooming.
    pub fn object_size(&self) -> f32 {
        let centroid = self.centroid();
        self.vertices
            .iter()
            .map(|v| (v - &centroid).magnitude())
            .fold(0.0f32, f32::max)
    }
}

/// Bound macros for the UI-facing sliders that drive `RenderParameters`;
/// carried over from the original parameter bundle even though the
/// slider UI itself is out of scope, since they document the legal
/// ranges for each field.
pub const ZOOM_SCALE_MIN: f32 = 0.01;
pub const ZOOM_SCALE_MAX: f32 = 100.0;
pub const SPECULAR_EXPONENT_MIN: f32 = 0.01;
pub const SPECULAR_EXPONENT_MAX: f32 = 100.0;

/// The parameter bundle driving `render_mesh`, matching the original
/// renderer's documented defaults (see DESIGN.md).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RenderParameters {
    pub zoom_scale: f32,
    pub emissive_light: f32,
    pub ambient_light: f32,
    pub diffuse_light: f32,
    pub specular_light: f32,
    pub specular_exponent: f32,
    pub use_lighting: bool,
    pub textured_rendering: bool,
    pub texture_modulation: bool,
    pub depth_test_on: bool,
    pub centre_object: bool,
    pub scale_object: bool,
    pub map_uvw_to_rgb: bool,
    pub phong_shading_on: bool,
    pub show_axes: bool,
}

impl Default for RenderParameters {
    fn default() -> RenderParameters {
        RenderParameters {
            zoom_scale: 1.0,
            emissive_light: 0.0,
            ambient_light: 0.2,
            diffuse_light: 0.6,
            specular_light: 0.3,
            specular_exponent: 4.0,
            use_lighting: false,
            textured_rendering: false,
            texture_modulation: false,
            depth_test_on: false,
            centre_object: false,
            scale_object: false,
            map_uvw_to_rgb: false,
            phong_shading_on: false,
            show_axes: false,
        }
    }
}

/// Draws a unit-length red/green/blue X/Y/Z axis triad through the
/// origin, in the caller's current model-view transform. Lighting is
/// turned off for the duration (axes are drawn flat-colored) and
/// restored to `relight` afterward.
pub fn draw_axes(pipeline: &mut Pipeline, relight: bool) {
    pipeline.disable(EnableFlag::Lighting);
    pipeline.line_width(4);

    pipeline.begin(PrimitiveType::Lines);
    pipeline.color3f(1.0, 0.0, 0.0);
    pipeline.vertex3f(0.0, 0.0, 0.0);
    pipeline.vertex3f(1.0, 0.0, 0.0);

    pipeline.color3f(0.0, 1.0, 0.0);
    pipeline.vertex3f(0.0, 0.0, 0.0);
    pipeline.vertex3f(0.0, 1.0, 0.0);

    pipeline.color3f(0.0, 0.0, 1.0);
    pipeline.vertex3f(0.0, 0.0, 0.0);
    pipeline.vertex3f(0.0, 0.0, 1.0);
    pipeline.end();

    pipeline.color3f(1.0, 1.0, 1.0);
    if relight {
        pipeline.enable(EnableFlag::Lighting);
    }
}

/// Drives `pipeline` through a full render of `mesh` according to
/// `params`: sets up material and enable flags, applies centering/scale,
/// fan-triangulates every face from its first corner, and submits each
/// vertex's normal/color/texCoord/position in the order the shader
/// expects them latched.
pub fn render_mesh(pipeline: &mut Pipeline, mesh: &Mesh, params: &RenderParameters) {
    if params.depth_test_on {
        pipeline.enable(EnableFlag::DepthTest);
    } else {
        pipeline.disable(EnableFlag::DepthTest);
    }

    if params.use_lighting {
        pipeline.enable(EnableFlag::Lighting);
        pipeline.light(
            LightParam::AMBIENT,
            Vec4::new(params.ambient_light, params.ambient_light, params.ambient_light, 1.0),
        );
        pipeline.light(
            LightParam::DIFFUSE,
            Vec4::new(params.diffuse_light, params.diffuse_light, params.diffuse_light, 1.0),
        );
        pipeline.light(
            LightParam::SPECULAR,
            Vec4::new(params.specular_light, params.specular_light, params.specular_light, 1.0),
        );
    } else {
        pipeline.disable(EnableFlag::Lighting);
    }
    if params.phong_shading_on {
        pipeline.enable(EnableFlag::PhongShading);
    } else {
        pipeline.disable(EnableFlag::PhongShading);
    }

    if params.textured_rendering {
        pipeline.enable(EnableFlag::Texture2D);
        pipeline.tex_env_mode(if params.texture_modulation {
            TexEnvMode::Modulate
        } else {
            TexEnvMode::Replace
        });
    } else {
        pipeline.disable(EnableFlag::Texture2D);
    }

    // drawn in the still-unscaled, untranslated model-view frame, before
    // the object's own scale/centering below, matching the original
    // renderer's ordering (axes first, then the textured object)
    if params.show_axes {
        draw_axes(pipeline, params.use_lighting);
    }

    let scale = if params.scale_object {
        let size = mesh.object_size();
        if size > 0.0 {
            params.zoom_scale / size
        } else {
            params.zoom_scale
        }
    } else {
        params.zoom_scale
    };

    pipeline.scale(Vec3::splat(scale));
    if params.centre_object {
        let centroid = mesh.centroid();
        pipeline.translate(-&centroid);
    }

    pipeline.material_fv(
        MaterialParam::AMBIENT_AND_DIFFUSE,
        Vec4::new(0.7, 0.7, 0.7, 1.0),
    );
    pipeline.material_fv(MaterialParam::SPECULAR, Vec4::new(0.7, 0.7, 0.7, 1.0));
    pipeline.material_fv(
        MaterialParam::EMISSION,
        Vec4::new(params.emissive_light, params.emissive_light, params.emissive_light, 1.0),
    );
    pipeline.material_f(params.specular_exponent);

    pipeline.begin(PrimitiveType::Triangles);
    for face in &mesh.faces {
        if face.len() < 3 {
            continue;
        }
        for i in 0..face.len() - 2 {
            for &corner in &[face[0], face[i + 1], face[i + 2]] {
                submit_corner(pipeline, mesh, corner, scale, params.map_uvw_to_rgb);
            }
        }
    }
    pipeline.end();

    if params.textured_rendering {
        pipeline.disable(EnableFlag::Texture2D);
    }
}

fn submit_corner(pipeline: &mut Pipeline, mesh: &Mesh, corner: FaceVertex, scale: f32, map_uvw_to_rgb: bool) {
    let normal = mesh.normals.get(corner.normal).copied().unwrap_or(Vec3::new(0.0, 0.0, 1.0));
    // the object scale above is uniform, so un-scaling the normal by the
    // same factor cancels it out and keeps lighting correct
    pipeline.normal3f(normal.x * scale, normal.y * scale, normal.z * scale);

    let tex_coord = mesh.tex_coords.get(corner.tex_coord).copied().unwrap_or(Vec3::zero());
    if map_uvw_to_rgb {
        pipeline.color3f(tex_coord.x, tex_coord.y, tex_coord.z);
    }
    pipeline.tex_coord3f(tex_coord.x, tex_coord.y, tex_coord.z);

    let position = mesh.vertices.get(corner.vertex).copied().unwrap_or(Vec3::zero());
    pipeline.vertex3f(position.x, position.y, position.z);
}
