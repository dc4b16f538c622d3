use crate::Fixed;
use bytemuck::{Pod, Zeroable};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Three fixed-point components. Used for points, directions and RGB colors.
///
/// Nothing normalizes implicitly; call [`Vec3::normalize`] when a unit vector is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Vec3 {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::splat(Fixed::ZERO);
    pub const ONE: Vec3 = Vec3::splat(Fixed::ONE);

    #[inline]
    pub const fn new(x: Fixed, y: Fixed, z: Fixed) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: Fixed) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Build from float components, each rounded to the nearest fixed value.
    pub fn from_f32(x: f32, y: f32, z: f32) -> Self {
        Self::new(Fixed::from_f32(x), Fixed::from_f32(y), Fixed::from_f32(z))
    }

    /// Build from raw scaled integers.
    pub const fn from_raw(x: i32, y: i32, z: i32) -> Self {
        Self::new(Fixed::from_raw(x), Fixed::from_raw(y), Fixed::from_raw(z))
    }

    /// The raw scaled components.
    pub fn to_raw(self) -> [i32; 3] {
        bytemuck::cast(self)
    }

    /// Sum of the pairwise fixed-point products.
    #[inline]
    pub fn dot(self, rhs: Vec3) -> Fixed {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn length_squared(self) -> Fixed {
        self.dot(self)
    }

    /// Multiply every component by `s`.
    #[inline]
    pub fn scale(self, s: Fixed) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    /// Scale by the approximate inverse length. The zero vector stays zero.
    pub fn normalize(self) -> Vec3 {
        self.scale(self.length_squared().inv_sqrt())
    }

    pub fn to_glam(self) -> glam::Vec3 {
        glam::Vec3::new(self.x.to_f32(), self.y.to_f32(), self.z.to_f32())
    }
}

impl From<glam::Vec3> for Vec3 {
    fn from(v: glam::Vec3) -> Self {
        Vec3::from_f32(v.x, v.y, v.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Componentwise product (color modulation). Not a dot product.
impl Mul for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Mul<Fixed> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: Fixed) -> Vec3 {
        self.scale(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec3, b: glam::Vec3, tol: f32) -> bool {
        (a.to_glam() - b).abs().max_element() < tol
    }

    #[test]
    fn test_add_sub() {
        let a = Vec3::from_f32(1.0, 2.0, 3.0);
        let b = Vec3::from_f32(0.5, -1.0, 0.25);
        assert_eq!(a + b, Vec3::from_f32(1.5, 1.0, 3.25));
        assert_eq!(a - b, Vec3::from_f32(0.5, 3.0, 2.75));
        assert_eq!(-a, Vec3::from_f32(-1.0, -2.0, -3.0));
    }

    #[test]
    fn test_dot() {
        let a = Vec3::from_f32(1.0, 2.0, 3.0);
        let b = Vec3::from_f32(4.0, -5.0, 0.5);
        assert_eq!(a.dot(b), Fixed::from_f32(-4.5));
    }

    #[test]
    fn test_componentwise_mul_is_not_dot() {
        let albedo = Vec3::from_f32(0.5, 0.25, 1.0);
        let light = Vec3::from_f32(2.0, 2.0, 2.0);
        assert_eq!(albedo * light, Vec3::from_f32(1.0, 0.5, 2.0));
    }

    #[test]
    fn test_scale() {
        let v = Vec3::from_f32(1.0, -2.0, 0.5);
        assert_eq!(v.scale(Fixed::from_int(2)), Vec3::from_f32(2.0, -4.0, 1.0));
        assert_eq!(v * Fixed::ZERO, Vec3::ZERO);
    }

    #[test]
    fn test_normalize() {
        let n = Vec3::from_f32(3.0, 0.0, 4.0).normalize();
        assert!(approx_eq(n, glam::Vec3::new(0.6, 0.0, 0.8), 0.005));

        let axis = Vec3::from_f32(0.0, 0.0, -1.0).normalize();
        assert!(approx_eq(axis, glam::Vec3::NEG_Z, 0.005));
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_glam_conversion() {
        let v: Vec3 = glam::Vec3::new(0.25, -0.5, 1.0).into();
        assert_eq!(v, Vec3::from_f32(0.25, -0.5, 1.0));
        assert_eq!(v.to_glam(), glam::Vec3::new(0.25, -0.5, 1.0));
        assert_eq!(v.to_raw(), [1024, -2048, 4096]);
    }
}
