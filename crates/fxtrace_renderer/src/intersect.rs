//! Ray-primitive and ray-scene intersection.
//!
//! Misses are reported as [`Fixed::INFINITY`] rather than `Option`, so the
//! nearest-hit scan is a plain strict-less-than fold.

use fxtrace_core::{LightRect, Plane, Scene, Sphere};
use fxtrace_math::{Fixed, Ray};

/// Trait for primitives that can be hit by rays.
pub trait Hittable {
    /// Distance along `ray` to the first hit beyond epsilon, or
    /// [`Fixed::INFINITY`] on a miss.
    ///
    /// `light` bounds the emissive plane; other primitives ignore it.
    fn hit_distance(&self, ray: &Ray, light: &LightRect) -> Fixed;
}

impl Hittable for Sphere {
    fn hit_distance(&self, ray: &Ray, _light: &LightRect) -> Fixed {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = oc.dot(ray.direction) * Fixed::from_int(2);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - Fixed::from_int(4) * (a * c);
        if discriminant < Fixed::ZERO {
            return Fixed::INFINITY;
        }

        let sqrt_d = discriminant.sqrt();
        let inv_2a = Fixed::ONE / (a + a);

        // Nearest root first, then the far one when the origin is inside
        let near = (-b - sqrt_d) * inv_2a;
        if near > Fixed::EPSILON {
            return near;
        }
        let far = (-b + sqrt_d) * inv_2a;
        if far > Fixed::EPSILON {
            return far;
        }
        Fixed::INFINITY
    }
}

impl Hittable for Plane {
    fn hit_distance(&self, ray: &Ray, light: &LightRect) -> Fixed {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < Fixed::EPSILON {
            return Fixed::INFINITY;
        }

        let t = self.normal.dot(self.normal.scale(self.dist) - ray.origin) / denom;
        if t <= Fixed::EPSILON {
            return Fixed::INFINITY;
        }

        // The emissive plane only exists inside the light rectangle
        if self.material.emissive && !light.contains(ray.at(t)) {
            return Fixed::INFINITY;
        }

        t
    }
}

/// Which kind of primitive was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    None,
    Sphere,
    Plane,
}

/// Result of a scene query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intersection {
    /// Distance along the ray, [`Fixed::INFINITY`] on a miss
    pub t: Fixed,
    pub kind: HitKind,
    /// Index into the sphere or plane table selected by `kind`
    pub index: usize,
    pub hit: bool,
}

impl Intersection {
    pub const MISS: Intersection = Intersection {
        t: Fixed::INFINITY,
        kind: HitKind::None,
        index: 0,
        hit: false,
    };

    /// Keep a candidate only if it is strictly nearer than the current hit.
    ///
    /// Candidates are offered spheres first, then planes, each in index order,
    /// so ties resolve to the earliest primitive.
    #[inline]
    pub fn consider(&mut self, t: Fixed, kind: HitKind, index: usize) {
        if t < self.t {
            self.t = t;
            self.kind = kind;
            self.index = index;
            self.hit = true;
        }
    }
}

impl Default for Intersection {
    fn default() -> Self {
        Self::MISS
    }
}

/// Nearest hit over every sphere, then every plane.
pub fn intersect_scene<const S: usize, const P: usize>(
    scene: &Scene<S, P>,
    ray: &Ray,
) -> Intersection {
    let light = scene.light();
    let mut result = Intersection::MISS;

    for (i, sphere) in scene.spheres().iter().enumerate() {
        result.consider(sphere.hit_distance(ray, light), HitKind::Sphere, i);
    }
    for (i, plane) in scene.planes().iter().enumerate() {
        result.consider(plane.hit_distance(ray, light), HitKind::Plane, i);
    }

    result
}

/// Whether anything blocks `ray` before the squared distance `dist_sq`.
///
/// The emissive plane never occludes.
pub fn occluded<const S: usize, const P: usize>(
    scene: &Scene<S, P>,
    ray: &Ray,
    dist_sq: Fixed,
) -> bool {
    let light = scene.light();
    let blocks = |t: Fixed| t < Fixed::INFINITY && t * t < dist_sq;

    scene
        .spheres()
        .iter()
        .any(|s| blocks(s.hit_distance(ray, light)))
        || scene
            .planes()
            .iter()
            .filter(|p| !p.material.emissive)
            .any(|p| blocks(p.hit_distance(ray, light)))
}

/// Whether `p` lies on the light rectangle of `scene` (x and z only).
pub fn is_on_light<const S: usize, const P: usize>(
    scene: &Scene<S, P>,
    p: fxtrace_math::Vec3,
) -> bool {
    scene.light().contains(p)
}
