#![allow(dead_code)]

use crate::vector::Vec3;

/// Surface reflectance terms for the Blinn-Phong-ish lighting model used
/// by both shading models.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub emission: Vec3,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::zero(),
            emission: Vec3::zero(),
            shininess: 0.0,
        }
    }
}
