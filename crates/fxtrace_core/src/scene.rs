//! Static scene model.
//!
//! A scene is a fixed set of spheres and planes plus one rectangular area light.
//! The light lives on exactly one emissive plane; everywhere outside its
//! rectangle that plane is invisible. Scenes are validated once at
//! construction and never mutated afterwards.

use fxtrace_math::{Fixed, Vec3};
use thiserror::Error;

/// Errors raised while assembling a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("sphere {index} has non-positive radius {radius}")]
    NonPositiveRadius { index: usize, radius: Fixed },

    #[error("sphere {0} is emissive; only planes may carry the light")]
    EmissiveSphere(usize),

    #[error("plane {0} normal is not unit length")]
    NonUnitNormal(usize),

    #[error("expected exactly one emissive plane, found {0}")]
    EmissivePlaneCount(usize),

    #[error("light rectangle is empty: x [{min_x}, {max_x}], z [{min_z}, {max_z}]")]
    EmptyLight {
        min_x: Fixed,
        max_x: Fixed,
        min_z: Fixed,
        max_z: Fixed,
    },
}

/// Surface description: albedo for diffuse surfaces, radiance for the light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Material {
    pub color: Vec3,
    pub emissive: bool,
}

impl Material {
    pub fn diffuse(albedo: Vec3) -> Self {
        Self {
            color: albedo,
            emissive: false,
        }
    }

    pub fn emissive(radiance: Vec3) -> Self {
        Self {
            color: radiance,
            emissive: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: Fixed,
    pub material: Material,
}

impl Sphere {
    pub fn new(center: Vec3, radius: Fixed, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

/// Infinite plane `dot(normal, p) = dist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plane {
    pub normal: Vec3,
    pub dist: Fixed,
    pub material: Material,
}

impl Plane {
    pub fn new(normal: Vec3, dist: Fixed, material: Material) -> Self {
        Self {
            normal,
            dist,
            material,
        }
    }
}

/// Axis-aligned light rectangle, horizontal, facing down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightRect {
    pub min_x: Fixed,
    pub max_x: Fixed,
    pub min_z: Fixed,
    pub max_z: Fixed,
    /// Height of the rectangle (y).
    pub y: Fixed,
    pub normal: Vec3,
    pub area: Fixed,
}

impl LightRect {
    /// Build from float extents. The area is computed before quantization.
    pub fn new(x: (f32, f32), z: (f32, f32), y: f32) -> Self {
        Self {
            min_x: Fixed::from_f32(x.0),
            max_x: Fixed::from_f32(x.1),
            min_z: Fixed::from_f32(z.0),
            max_z: Fixed::from_f32(z.1),
            y: Fixed::from_f32(y),
            normal: Vec3::from_f32(0.0, -1.0, 0.0),
            area: Fixed::from_f32((x.1 - x.0) * (z.1 - z.0)),
        }
    }

    /// Inclusive test on x and z; y is ignored.
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.z >= self.min_z && p.z <= self.max_z
    }

    pub fn width(&self) -> Fixed {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> Fixed {
        self.max_z - self.min_z
    }

    /// Map two uniform values in [0, 1) to a point on the rectangle.
    pub fn sample(&self, u: Fixed, v: Fixed) -> Vec3 {
        Vec3::new(
            self.min_x + self.width() * u,
            self.y,
            self.min_z + self.depth() * v,
        )
    }
}

/// Immutable collection of `S` spheres and `P` planes with one area light.
#[derive(Debug, Clone)]
pub struct Scene<const S: usize, const P: usize> {
    spheres: [Sphere; S],
    planes: [Plane; P],
    light: LightRect,
    light_plane: usize,
}

impl<const S: usize, const P: usize> Scene<S, P> {
    /// Validate and assemble a scene.
    pub fn new(
        spheres: [Sphere; S],
        planes: [Plane; P],
        light: LightRect,
    ) -> Result<Self, SceneError> {
        for (index, sphere) in spheres.iter().enumerate() {
            if sphere.radius <= Fixed::ZERO {
                return Err(SceneError::NonPositiveRadius {
                    index,
                    radius: sphere.radius,
                });
            }
            if sphere.material.emissive {
                return Err(SceneError::EmissiveSphere(index));
            }
        }

        let unit_tolerance = Fixed::from_f32(0.01);
        for (index, plane) in planes.iter().enumerate() {
            if (plane.normal.length_squared() - Fixed::ONE).abs() > unit_tolerance {
                return Err(SceneError::NonUnitNormal(index));
            }
        }

        let emissive_count = planes.iter().filter(|p| p.material.emissive).count();
        let light_plane = match planes.iter().position(|p| p.material.emissive) {
            Some(index) if emissive_count == 1 => index,
            _ => return Err(SceneError::EmissivePlaneCount(emissive_count)),
        };

        if light.min_x >= light.max_x || light.min_z >= light.max_z {
            return Err(SceneError::EmptyLight {
                min_x: light.min_x,
                max_x: light.max_x,
                min_z: light.min_z,
                max_z: light.max_z,
            });
        }

        log::debug!(
            "Scene assembled: {} spheres, {} planes, light plane {}",
            S,
            P,
            light_plane
        );

        Ok(Self {
            spheres,
            planes,
            light,
            light_plane,
        })
    }

    pub fn spheres(&self) -> &[Sphere; S] {
        &self.spheres
    }

    pub fn planes(&self) -> &[Plane; P] {
        &self.planes
    }

    pub fn light(&self) -> &LightRect {
        &self.light
    }

    /// Index of the emissive plane.
    pub fn light_plane(&self) -> usize {
        self.light_plane
    }

    /// Radiance of the area light.
    pub fn light_emission(&self) -> Vec3 {
        self.planes[self.light_plane].material.color
    }

    /// Same geometry with the light's radiance replaced.
    pub fn with_light_emission(&self, radiance: Vec3) -> Self {
        let mut scene = self.clone();
        scene.planes[self.light_plane].material.color = radiance;
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey() -> Material {
        Material::diffuse(Vec3::from_f32(0.5, 0.5, 0.5))
    }

    fn light_plane() -> Plane {
        Plane::new(
            Vec3::from_f32(0.0, -1.0, 0.0),
            Fixed::from_f32(-2.99),
            Material::emissive(Vec3::from_f32(2.0, 2.0, 2.0)),
        )
    }

    fn light_rect() -> LightRect {
        LightRect::new((-1.0, 1.0), (-3.2, -2.8), 2.99)
    }

    #[test]
    fn test_light_rect_contains() {
        let light = light_rect();
        for y in [-100.0, 0.0, 2.99, 50.0] {
            assert!(light.contains(Vec3::from_f32(0.0, y, -3.0)));
            assert!(light.contains(Vec3::from_f32(-1.0, y, -3.2)));
            assert!(light.contains(Vec3::from_f32(1.0, y, -2.8)));
            assert!(!light.contains(Vec3::from_f32(1.01, y, -3.0)));
            assert!(!light.contains(Vec3::from_f32(-1.01, y, -3.0)));
            assert!(!light.contains(Vec3::from_f32(0.0, y, -2.79)));
            assert!(!light.contains(Vec3::from_f32(0.0, y, -3.21)));
        }
    }

    #[test]
    fn test_light_rect_area() {
        let light = light_rect();
        assert_eq!(light.area, Fixed::from_f32(0.8));
    }

    #[test]
    fn test_light_rect_sample_inside() {
        let light = light_rect();
        let almost_one = Fixed::from_raw(Fixed::ONE.raw() - 1);
        for (u, v) in [
            (Fixed::ZERO, Fixed::ZERO),
            (almost_one, almost_one),
            (Fixed::from_f32(0.5), Fixed::from_f32(0.25)),
        ] {
            let p = light.sample(u, v);
            assert!(light.contains(p), "{:?} outside light", p);
            assert_eq!(p.y, light.y);
        }
    }

    #[test]
    fn test_scene_finds_light_plane() {
        let scene = Scene::new(
            [Sphere::new(Vec3::ZERO, Fixed::ONE, grey())],
            [
                Plane::new(Vec3::from_f32(0.0, 1.0, 0.0), -Fixed::ONE, grey()),
                light_plane(),
            ],
            light_rect(),
        )
        .unwrap();

        assert_eq!(scene.light_plane(), 1);
        assert_eq!(scene.light_emission(), Vec3::from_f32(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_scene_rejects_bad_radius() {
        let err = Scene::new(
            [Sphere::new(Vec3::ZERO, Fixed::ZERO, grey())],
            [light_plane()],
            light_rect(),
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::NonPositiveRadius { index: 0, .. }));
    }

    #[test]
    fn test_scene_rejects_emissive_count() {
        let none = Scene::new(
            [Sphere::new(Vec3::ZERO, Fixed::ONE, grey())],
            [Plane::new(Vec3::from_f32(0.0, 1.0, 0.0), -Fixed::ONE, grey())],
            light_rect(),
        );
        assert_eq!(none.unwrap_err(), SceneError::EmissivePlaneCount(0));

        let two = Scene::new(
            [Sphere::new(Vec3::ZERO, Fixed::ONE, grey())],
            [light_plane(), light_plane()],
            light_rect(),
        );
        assert_eq!(two.unwrap_err(), SceneError::EmissivePlaneCount(2));
    }

    #[test]
    fn test_scene_rejects_non_unit_normal() {
        let err = Scene::new(
            [Sphere::new(Vec3::ZERO, Fixed::ONE, grey())],
            [
                Plane::new(Vec3::from_f32(0.0, 2.0, 0.0), -Fixed::ONE, grey()),
                light_plane(),
            ],
            light_rect(),
        )
        .unwrap_err();
        assert_eq!(err, SceneError::NonUnitNormal(0));
    }

    #[test]
    fn test_scene_rejects_empty_light() {
        let err = Scene::new(
            [Sphere::new(Vec3::ZERO, Fixed::ONE, grey())],
            [light_plane()],
            LightRect::new((1.0, -1.0), (-3.2, -2.8), 2.99),
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::EmptyLight { .. }));
    }

    #[test]
    fn test_with_light_emission() {
        let scene = Scene::new(
            [Sphere::new(Vec3::ZERO, Fixed::ONE, grey())],
            [light_plane()],
            light_rect(),
        )
        .unwrap();
        let dark = scene.with_light_emission(Vec3::ZERO);
        assert_eq!(dark.light_emission(), Vec3::ZERO);
        assert!(dark.planes()[0].material.emissive);
        assert_eq!(scene.light_emission(), Vec3::from_f32(2.0, 2.0, 2.0));
    }
}
