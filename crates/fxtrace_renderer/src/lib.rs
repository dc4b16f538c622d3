//! fxtrace renderer - fixed-point Monte Carlo path tracing.
//!
//! Every pixel is estimated with diffuse bounces and next-event estimation
//! toward a single rectangular area light. All arithmetic past the camera
//! setup is 12-fractional-bit fixed point, and every random decision comes
//! from an explicitly passed xorshift generator, so a seed and a scan order
//! fully determine the image.
//!
//! # Example
//!
//! ```
//! use fxtrace_core::cornell_box;
//! use fxtrace_renderer::{render, RenderConfig};
//!
//! let scene = cornell_box().unwrap();
//! let config = RenderConfig {
//!     width: 8,
//!     height: 8,
//!     samples_per_pixel: 1,
//!     ..RenderConfig::default()
//! };
//! let image = render(&scene, &config).unwrap();
//! assert_eq!(image.pixels.len(), 64);
//! ```

mod bucket;
mod camera;
mod integrator;
mod intersect;
mod output;
mod random;
mod renderer;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
pub use camera::Camera;
pub use integrator::PathTracer;
pub use intersect::{intersect_scene, is_on_light, occluded, HitKind, Hittable, Intersection};
pub use output::{save_image, save_png, save_ppm, write_ppm, OutputError};
pub use random::{
    bounce_direction, rand_fixed, random_unit_vector, XorShift32, DEFAULT_SEED, UNIT_VECTOR_LUT,
};
pub use renderer::{
    render, render_parallel, ConfigError, ImageBuffer, RenderConfig, Rgb, MAX_BRIGHTNESS_SHIFT,
};

/// Re-export the fixed-point types from fxtrace_math
pub use fxtrace_math::{Fixed, Ray, Vec3};
