#![allow(dead_code)]

use crate::color::Rgba8;
use crate::light::Light;
use crate::material::Material;
use crate::matrix::Mat4;
use crate::texture::Sampler;
use crate::vector::Vec3;
use crate::vertex::{Fragment, VertexIn, VertexScreen};

/// Which illumination model a `Shader` evaluates: Gouraud lights once
/// per vertex and interpolates the resulting color; Phong interpolates
/// the normal and lights once per fragment. Represented as a tag on one
/// `Shader` type rather than as a trait-object hierarchy, since both
/// models share every piece of state but the point in the pipeline at
/// which illumination runs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShadingModel {
    Gouraud,
    Phong,
}

/// The per-`end`-call shading context: the matrices, light, and
/// material active when vertices were submitted, plus the currently
/// bound texture image (if any) and the lighting formula to apply.
pub struct Shader {
    pub model_view: Mat4,
    pub projection: Mat4,
    normal_matrix: Mat4,
    pub light: Option<Light>,
    pub material: Material,
    pub model: ShadingModel,
    pub texturing_enabled: bool,
}

impl Shader {
    pub fn new(
        model_view: Mat4,
        projection: Mat4,
        light: Option<Light>,
        material: Material,
        model: ShadingModel,
        texturing_enabled: bool,
    ) -> Shader {
        let normal_matrix = model_view.inverse().transpose();
        Shader { model_view, projection, normal_matrix, light, material, model, texturing_enabled }
    }

    /// Transforms a vertex into clip space (projected, not yet
    /// viewport-mapped) and, for Gouraud shading, evaluates lighting
    /// now. `position` in the returned vertex is in NDC; the pipeline's
    /// viewport transform maps it into pixel space before rasterizing.
    pub fn vertex_shader(&self, v: &VertexIn) -> VertexScreen {
        let eye_position = self.model_view.mul_vec4(&v.position);
        let clip = self.projection.mul_vec4(&eye_position);
        // not renormalized here: a uniformly scaled object relies on the
        // caller pre-scaling normals (see mesh::render_mesh)
        let eye_normal = self.normal_matrix.mul_vector3(&v.normal);

        let color = match self.model {
            ShadingModel::Gouraud => match &self.light {
                Some(light) => {
                    let lit = illuminate(light, &self.material, &eye_position.xyz(), &eye_normal);
                    v.color.to_vec3().modulate(&lit)
                }
                None => v.color.to_vec3(),
            },
            ShadingModel::Phong => v.color.to_vec3(),
        };

        VertexScreen {
            position: clip.point(),
            color: Rgba8::from_vec3(&color, 1.0),
            normal: eye_normal,
            tex_coord: v.tex_coord,
            eye_position,
            inv_w: if clip.w != 0.0 { 1.0 / clip.w } else { 1.0 },
        }
    }

    /// Produces the final framebuffer-bound color for one fragment. For
    /// Phong shading the interpolated normal is renormalized and
    /// illumination is evaluated here; for Gouraud the vertex color is
    /// already lit and only texturing remains.
    pub fn fragment_shader(&self, f: &Fragment, sampler: &Sampler) -> Rgba8 {
        let base = if self.texturing_enabled {
            sampler.sample(f.tex_coord.x, f.tex_coord.y)
        } else {
            f.color
        };

        match self.model {
            ShadingModel::Gouraud => base,
            ShadingModel::Phong => match &self.light {
                Some(light) => {
                    let n = f.normal.normalized();
                    let lit = illuminate(light, &self.material, &f.eye_position.xyz(), &n);
                    Rgba8::from_vec3(&base.to_vec3().modulate(&lit), base.alpha_f32())
                }
                None => base,
            },
        }
    }
}

/// Evaluates the shared ambient + diffuse + specular + emission formula
/// at `eye_position`/`normal` (both in eye space).
fn illuminate(light: &Light, material: &Material, eye_position: &Vec3, normal: &Vec3) -> Vec3 {
    let l = (&light.position - eye_position).normalized();
    let e = (&-eye_position).normalized();
    let n = *normal;

    let n_dot_l = n.dot(&l).max(0.0);
    let reflect = &l - &(&n * (2.0 * n.dot(&l)));
    let e_dot_r = e.dot(&reflect).max(0.0);
    let specular_term = if material.shininess > 0.0 {
        e_dot_r.powf(material.shininess)
    } else if e_dot_r > 0.0 {
        1.0
    } else {
        0.0
    };

    let ambient = light.ambient.modulate(&material.ambient);
    let diffuse = &light.diffuse.modulate(&material.diffuse) * n_dot_l;
    let specular = &light.specular.modulate(&material.specular) * specular_term;

    &(&(&material.emission + &ambient) + &diffuse) + &specular
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec4;

    fn identity_shader(model: ShadingModel, light: Option<Light>) -> Shader {
        Shader::new(Mat4::identity(), Mat4::identity(), light, Material::default(), model, false)
    }

    #[test]
    fn test_vertex_shader_identity_is_unchanged() {
        let shader = identity_shader(ShadingModel::Gouraud, None);
        let v = VertexIn {
            position: Vec4::new(1.0, 2.0, 3.0, 1.0),
            color: Rgba8::white(),
            normal: Vec3::new(0.0, 0.0, 1.0),
            tex_coord: crate::vector::Vec3::zero(),
        };
        let out = shader.vertex_shader(&v);
        assert_eq!(out.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_gouraud_without_light_passes_color_through() {
        let shader = identity_shader(ShadingModel::Gouraud, None);
        let v = VertexIn {
            position: Vec4::new(0.0, 0.0, 0.0, 1.0),
            color: Rgba8::new(10, 20, 30, 255),
            normal: Vec3::new(0.0, 0.0, 1.0),
            tex_coord: crate::vector::Vec3::zero(),
        };
        let out = shader.vertex_shader(&v);
        assert_eq!(out.color, Rgba8::new(10, 20, 30, 255));
    }

    #[test]
    fn test_illuminate_facing_light_has_diffuse_component() {
        let light = Light {
            position: Vec3::new(0.0, 0.0, 1.0),
            ambient: Vec3::zero(),
            diffuse: Vec3::splat(1.0),
            specular: Vec3::zero(),
        };
        let material = Material {
            ambient: Vec3::zero(),
            diffuse: Vec3::splat(1.0),
            specular: Vec3::zero(),
            emission: Vec3::zero(),
            shininess: 0.0,
        };
        let color = illuminate(&light, &material, &Vec3::zero(), &Vec3::new(0.0, 0.0, 1.0));
        assert!(color.x > 0.9);
    }
}
