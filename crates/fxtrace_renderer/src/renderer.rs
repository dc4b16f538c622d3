//! Image-level rendering.
//!
//! Drives [`PathTracer`] over every pixel of the image, either sequentially
//! with one shared generator or in parallel buckets with one stream per pixel.

use std::time::Instant;

use bytemuck::{Pod, Zeroable};
use fxtrace_core::Scene;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::integrator::PathTracer;
use crate::random::{XorShift32, DEFAULT_SEED};

/// Largest brightness shift that keeps `to_display_byte` inside i32.
pub const MAX_BRIGHTNESS_SHIFT: u32 = 8;

/// Errors raised by an invalid [`RenderConfig`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("max bounces must be at least 1")]
    ZeroBounces,

    #[error("bucket size must be at least 1")]
    ZeroBucketSize,

    #[error("field of view must be in (0, 180) degrees, got {0}")]
    FieldOfView(f32),

    #[error("brightness shift {0} exceeds 8")]
    BrightnessShift(u32),
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Paths traced per pixel
    pub samples_per_pixel: u32,
    /// Path segments per sample, the primary ray included
    pub max_bounces: u32,
    /// Full vertical field of view
    pub fov_degrees: f32,
    /// Left shift applied before scaling to 0..=255
    pub brightness_shift: u32,
    pub seed: u32,
    /// Bucket edge length for parallel rendering
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            samples_per_pixel: 16,
            max_bounces: 3,
            fov_degrees: 60.0,
            brightness_shift: 4,
            seed: DEFAULT_SEED,
            bucket_size: 64,
        }
    }
}

impl RenderConfig {
    /// Reject values the renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.max_bounces == 0 {
            return Err(ConfigError::ZeroBounces);
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::ZeroBucketSize);
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov_degrees));
        }
        if self.brightness_shift > MAX_BRIGHTNESS_SHIFT {
            return Err(ConfigError::BrightnessShift(self.brightness_shift));
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// 8-bit display color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Row-major buffer of display colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::default(); width as usize * height as usize],
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Rgb {
        self.pixels[self.offset(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        let offset = self.offset(x, y);
        self.pixels[offset] = color;
    }

    /// Packed RGB bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        let rows = result.pixels.chunks_exact(bucket.width as usize);
        for (local_y, row) in (0..bucket.height).zip(rows) {
            let start = self.offset(bucket.x, bucket.y + local_y);
            self.pixels[start..start + row.len()].copy_from_slice(row);
        }
    }
}

/// Render the scene with a single generator, row-major from the top-left.
///
/// Pixels share one stream, so the result depends on scan order. This is the
/// reproducible reference mode.
pub fn render<const S: usize, const P: usize>(
    scene: &Scene<S, P>,
    config: &RenderConfig,
) -> Result<ImageBuffer, ConfigError> {
    config.validate()?;

    let tracer = PathTracer::new(scene, config);
    let mut rng = XorShift32::new(config.seed);
    let mut image = ImageBuffer::new(config.width, config.height);

    log::info!(
        "Rendering {}x{} @ {} spp, {} bounces (sequential)",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_bounces
    );
    let start = Instant::now();

    for y in 0..config.height {
        for x in 0..config.width {
            let color = tracer.trace_pixel(x, y, &mut rng);
            image.set(x, y, color);
        }
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}

/// Render the scene in buckets on the rayon pool.
///
/// Each pixel draws from its own stream seeded from `config.seed` and its
/// coordinates, so the image does not depend on scheduling. It does differ
/// from [`render`].
pub fn render_parallel<const S: usize, const P: usize>(
    scene: &Scene<S, P>,
    config: &RenderConfig,
) -> Result<ImageBuffer, ConfigError> {
    use rayon::prelude::*;

    config.validate()?;

    let tracer = PathTracer::new(scene, config);
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);

    log::info!(
        "Rendering {}x{} @ {} spp, {} bounces ({} buckets on {} threads)",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_bounces,
        buckets.len(),
        rayon::current_num_threads()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let pixels = render_bucket(bucket, &tracer, config.seed);
            log::debug!("Bucket {} done ({}, {})", bucket.index, bucket.x, bucket.y);
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}
