#![allow(dead_code)]

use crate::vector::Vec3;

/// A single positional/directional light. `position` is stored in eye
/// space: it is transformed by the current model-view matrix at the
/// moment it is set (see `state::State::set_light_position`), not
/// re-transformed on every use.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Light {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for Light {
    fn default() -> Light {
        Light {
            position: Vec3::new(0.0, 0.0, 1.0),
            ambient: Vec3::zero(),
            diffuse: Vec3::splat(1.0),
            specular: Vec3::splat(1.0),
        }
    }
}
