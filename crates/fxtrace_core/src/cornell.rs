//! The default enclosed scene: a box with a ceiling light and two spheres.
//!
//! Authored in floats with glam and quantized once. The light panel plane sits
//! just below the ceiling so that the ceiling around the panel still receives
//! light.

use fxtrace_math::{Fixed, Vec3};
use glam::Vec3 as V;

use crate::scene::{LightRect, Material, Plane, Scene, SceneError, Sphere};

/// Scene type of the default box.
pub type CornellBox = Scene<2, 6>;

/// Radiance of the default ceiling light.
pub const LIGHT_INTENSITY: f32 = 2.0;

fn diffuse(r: f32, g: f32, b: f32) -> Material {
    Material::diffuse(V::new(r, g, b).into())
}

fn plane(normal: V, dist: f32, material: Material) -> Plane {
    Plane::new(normal.into(), Fixed::from_f32(dist), material)
}

/// Build the default box.
///
/// Sphere order: large yellow, small grey. Plane order: floor, light panel,
/// ceiling, left wall (red), right wall (green), back wall.
pub fn cornell_box() -> Result<CornellBox, SceneError> {
    let spheres = [
        Sphere::new(
            V::new(-0.6, 0.0, -2.8).into(),
            Fixed::from_f32(0.7),
            diffuse(1.0, 0.7, 0.2),
        ),
        Sphere::new(
            V::new(0.6, -0.5, -3.2).into(),
            Fixed::from_f32(0.5),
            diffuse(0.5, 0.5, 0.5),
        ),
    ];

    let planes = [
        plane(V::Y, -1.0, diffuse(0.75, 0.75, 0.75)),
        plane(
            V::NEG_Y,
            -2.99,
            Material::emissive(Vec3::from_f32(LIGHT_INTENSITY, LIGHT_INTENSITY, LIGHT_INTENSITY)),
        ),
        plane(V::NEG_Y, -3.0, diffuse(0.75, 0.75, 0.75)),
        plane(V::X, -2.0, diffuse(0.75, 0.25, 0.25)),
        plane(V::NEG_X, -2.0, diffuse(0.25, 0.75, 0.25)),
        plane(V::Z, -5.0, diffuse(0.75, 0.75, 0.75)),
    ];

    let light = LightRect::new((-1.0, 1.0), (-3.2, -2.8), 2.99);

    Scene::new(spheres, planes, light)
}
