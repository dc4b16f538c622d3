use crate::{Fixed, Vec3};

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not guaranteed to be unit length; callers normalize when
/// the distance along the ray has to be metric.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: Fixed) -> Vec3 {
        self.origin + self.direction.scale(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::from_f32(1.0, 2.0, 3.0);
        let direction = Vec3::from_f32(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::from_f32(1.0, 0.0, 0.0));

        assert_eq!(ray.at(Fixed::ZERO), Vec3::ZERO);
        assert_eq!(ray.at(Fixed::ONE), Vec3::from_f32(1.0, 0.0, 0.0));
        assert_eq!(ray.at(Fixed::from_f32(2.5)), Vec3::from_f32(2.5, 0.0, 0.0));
        assert_eq!(ray.at(-Fixed::ONE), Vec3::from_f32(-1.0, 0.0, 0.0));
    }
}
