//! Pinhole camera for primary ray generation.
//!
//! The camera looks down -Z from a fixed position. The field of view is turned
//! into a screen-space scale once, at construction, so generating a ray needs
//! no trigonometry.

use fxtrace_math::{Fixed, Ray, Vec3};

/// Pinhole camera looking down -Z.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,
    position: Vec3,
    /// tan(fov / 2)
    fov_scale: f32,
}

impl Camera {
    /// Default eye position inside the box.
    pub fn default_position() -> Vec3 {
        Vec3::from_f32(0.0, 0.8, 2.0)
    }

    /// Create a camera at the default position.
    pub fn new(image_width: u32, image_height: u32, fov_degrees: f32) -> Self {
        let fov_rad = (fov_degrees as f64 * std::f64::consts::PI / 180.0) as f32;
        Self {
            image_width,
            image_height,
            position: Self::default_position(),
            fov_scale: (fov_rad as f64 / 2.0).tan() as f32,
        }
    }

    /// Move the eye.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn fov_scale(&self) -> f32 {
        self.fov_scale
    }

    /// Primary ray through pixel (x, y), with (0, 0) at the top-left.
    ///
    /// Pixel coordinates map to [-1, 1] on both axes without aspect
    /// correction. The direction is normalized.
    pub fn get_ray(&self, x: u32, y: u32) -> Ray {
        let sx = 2.0 * x as f32 / self.image_width as f32 - 1.0;
        let sy = 1.0 - 2.0 * y as f32 / self.image_height as f32;

        let direction = Vec3::new(
            Fixed::from_f32(sx * self.fov_scale),
            Fixed::from_f32(sy * self.fov_scale),
            -Fixed::ONE,
        );

        Ray::new(self.position, direction.normalize())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(256, 256, 60.0)
    }
}
