//! Path integrator.
//!
//! Traces a fixed number of samples per pixel, each a fixed number of bounces
//! deep, with next-event estimation toward the area light at every bounce.
//! All loops are bounded and nothing allocates. The only side effect of
//! [`PathTracer::trace_pixel`] is advancing the generator it is handed.

use fxtrace_core::Scene;
use fxtrace_math::{Fixed, Ray, Vec3};
use rand::RngCore;

use crate::camera::Camera;
use crate::intersect::{intersect_scene, occluded, HitKind};
use crate::random::{bounce_direction, rand_fixed};
use crate::renderer::{RenderConfig, Rgb};

/// Offset along the normal for secondary ray origins.
const SURFACE_BIAS: f32 = 0.01;

/// Albedo of the emissive plane where it is hit outside the light rectangle.
const OUTSIDE_LIGHT_ALBEDO: f32 = 0.2;

/// Diffuse BRDF normalization.
const INV_PI: f32 = 0.3183;

/// Per-pixel radiance estimator over a static scene.
#[derive(Debug, Clone)]
pub struct PathTracer<'a, const S: usize, const P: usize> {
    scene: &'a Scene<S, P>,
    camera: Camera,
    samples_per_pixel: u32,
    max_bounces: u32,
    brightness_shift: u32,
    surface_bias: Fixed,
    outside_light_albedo: Vec3,
    inv_pi: Fixed,
}

impl<'a, const S: usize, const P: usize> PathTracer<'a, S, P> {
    /// Create a tracer with a default camera built from `config`.
    pub fn new(scene: &'a Scene<S, P>, config: &RenderConfig) -> Self {
        Self {
            scene,
            camera: Camera::new(config.width, config.height, config.fov_degrees),
            samples_per_pixel: config.samples_per_pixel.max(1),
            max_bounces: config.max_bounces,
            brightness_shift: config.brightness_shift,
            surface_bias: Fixed::from_f32(SURFACE_BIAS),
            outside_light_albedo: Vec3::splat(Fixed::from_f32(OUTSIDE_LIGHT_ALBEDO)),
            inv_pi: Fixed::from_f32(INV_PI),
        }
    }

    /// Replace the camera.
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene<S, P> {
        self.scene
    }

    /// Color of pixel (x, y).
    ///
    /// The result depends only on the pixel, the scene and the position of
    /// `rng` when the call starts. The number of draws consumed varies with
    /// how many bounces escape the scene early.
    pub fn trace_pixel(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Rgb {
        let primary = self.camera.get_ray(x, y);

        let mut sum = [0i64; 3];
        for _ in 0..self.samples_per_pixel {
            let radiance = self.sample_radiance(&primary, rng);
            for (acc, c) in sum.iter_mut().zip(radiance.to_raw()) {
                *acc += c as i64;
            }
        }

        let n = self.samples_per_pixel as i64;
        let [r, g, b] =
            sum.map(|c| Fixed::from_raw((c / n) as i32).to_display_byte(self.brightness_shift));
        Rgb::new(r, g, b)
    }

    /// Radiance carried back along one path starting with `primary`.
    pub fn sample_radiance(&self, primary: &Ray, rng: &mut dyn RngCore) -> Vec3 {
        let spheres = self.scene.spheres();
        let planes = self.scene.planes();
        let light = self.scene.light();

        let mut ray = *primary;
        let mut radiance = Vec3::ZERO;
        let mut throughput = Vec3::ONE;

        for bounce in 0..self.max_bounces {
            let hit = intersect_scene(self.scene, &ray);
            if !hit.hit {
                // Escaped: nothing further reaches the eye along this path
                break;
            }

            let point = ray.at(hit.t);
            let (normal, material) = match hit.kind {
                HitKind::Sphere => {
                    let sphere = &spheres[hit.index];
                    ((point - sphere.center).normalize(), sphere.material)
                }
                _ => {
                    let plane = &planes[hit.index];
                    (plane.normal, plane.material)
                }
            };

            let mut albedo = material.color;
            if material.emissive {
                if light.contains(point) {
                    // Later bounces see the light through next-event estimation only
                    if bounce == 0 {
                        radiance += material.color;
                    }
                    throughput = Vec3::ZERO;
                } else {
                    albedo = self.outside_light_albedo;
                }
            }

            radiance += self.direct_light(point, normal, throughput * albedo, rng);

            throughput = throughput * albedo;

            // The loop keeps drawing after the light zeroes the throughput
            let origin = point + normal.scale(self.surface_bias);
            ray = Ray::new(origin, bounce_direction(normal, rng));
        }

        radiance
    }

    /// Next-event estimate from one uniform sample on the light rectangle.
    ///
    /// `weight` is the path throughput already modulated by the surface albedo.
    fn direct_light(&self, point: Vec3, normal: Vec3, weight: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let light = self.scene.light();

        let u = rand_fixed(rng);
        let v = rand_fixed(rng);
        let light_point = light.sample(u, v);

        let to_light = light_point - point;
        let dist_sq = to_light.length_squared();
        let light_dir = to_light.normalize();

        let shadow_ray = Ray::new(point + normal.scale(self.surface_bias), light_dir);
        if occluded(self.scene, &shadow_ray, dist_sq) {
            return Vec3::ZERO;
        }

        let cos_surface = normal.dot(light_dir);
        let cos_light = light.normal.dot(-light_dir);
        if cos_surface <= Fixed::ZERO || cos_light <= Fixed::ZERO {
            return Vec3::ZERO;
        }

        let geometry = (cos_surface * cos_light) / dist_sq;
        (weight * self.scene.light_emission())
            .scale(geometry)
            .scale(light.area)
            .scale(self.inv_pi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::XorShift32;
    use fxtrace_core::{cornell_box, CornellBox};

    fn default_tracer(scene: &CornellBox) -> PathTracer<'_, 2, 6> {
        PathTracer::new(scene, &RenderConfig::default())
    }

    /// First row in column 128 whose primary ray lands on the light.
    fn light_row(tracer: &PathTracer<'_, 2, 6>) -> u32 {
        let scene = tracer.scene();
        (0..tracer.camera().image_height)
            .find(|&y| {
                let hit = intersect_scene(scene, &tracer.camera().get_ray(128, y));
                hit.kind == HitKind::Plane && hit.index == scene.light_plane()
            })
            .expect("some pixel in column 128 should see the light")
    }

    #[test]
    fn test_escaped_ray_contributes_nothing() {
        let scene = cornell_box().unwrap();
        let tracer = default_tracer(&scene);
        let mut rng = XorShift32::default();

        let out_the_front = Ray::new(Vec3::ZERO, Vec3::from_f32(0.0, 0.0, 1.0));
        assert_eq!(tracer.sample_radiance(&out_the_front, &mut rng), Vec3::ZERO);
        // No bounce happened, so nothing was drawn
        assert_eq!(rng, XorShift32::default());
    }

    #[test]
    fn test_light_seen_directly_adds_emission_once() {
        let scene = cornell_box().unwrap();
        let tracer = default_tracer(&scene);
        let primary = tracer.camera().get_ray(128, light_row(&tracer));
        let mut rng = XorShift32::default();

        for _ in 0..32 {
            let radiance = tracer.sample_radiance(&primary, &mut rng);
            assert_eq!(radiance, scene.light_emission());
        }
    }

    #[test]
    fn test_light_pixel_saturates() {
        let scene = cornell_box().unwrap();
        let tracer = default_tracer(&scene);
        let y = light_row(&tracer);
        let mut rng = XorShift32::default();

        assert_eq!(tracer.trace_pixel(128, y, &mut rng), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_emission_is_monotonic() {
        let scene = cornell_box().unwrap();
        let dark_scene = scene.with_light_emission(Vec3::ZERO);
        let lit = default_tracer(&scene);
        let dark = default_tracer(&dark_scene);
        let y = light_row(&lit);

        for seed in [1, 7, 12345, 0xDEAD_BEEF] {
            let bright = lit.trace_pixel(128, y, &mut XorShift32::new(seed));
            let unlit = dark.trace_pixel(128, y, &mut XorShift32::new(seed));
            assert!(bright.r >= unlit.r && bright.g >= unlit.g && bright.b >= unlit.b);
        }
    }

    #[test]
    fn test_unlit_scene_is_black() {
        let scene = cornell_box().unwrap().with_light_emission(Vec3::ZERO);
        let tracer = default_tracer(&scene);
        let mut rng = XorShift32::default();

        for (x, y) in [(0, 0), (64, 200), (128, 128), (200, 40), (255, 255)] {
            assert_eq!(tracer.trace_pixel(x, y, &mut rng), Rgb::default());
        }
    }

    #[test]
    fn test_trace_pixel_is_deterministic() {
        let scene = cornell_box().unwrap();
        let tracer = default_tracer(&scene);

        let mut a = XorShift32::new(42);
        let mut b = XorShift32::new(42);
        for (x, y) in [(10, 10), (128, 64), (200, 180)] {
            assert_eq!(tracer.trace_pixel(x, y, &mut a), tracer.trace_pixel(x, y, &mut b));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_trace_pixel_advances_rng() {
        let scene = cornell_box().unwrap();
        let tracer = default_tracer(&scene);
        let mut rng = XorShift32::default();

        tracer.trace_pixel(128, 128, &mut rng);
        assert_ne!(rng, XorShift32::default());
    }

    #[test]
    fn test_zero_bounces_is_black() {
        let scene = cornell_box().unwrap();
        let config = RenderConfig {
            max_bounces: 0,
            ..RenderConfig::default()
        };
        let tracer = PathTracer::new(&scene, &config);
        let mut rng = XorShift32::default();

        assert_eq!(tracer.trace_pixel(128, 128, &mut rng), Rgb::default());
        assert_eq!(rng, XorShift32::default());
    }

    /// Pixel (128, 64) of the default 256x256 render looks at the back wall just
    /// below the ceiling. Averaged over independent seeds it lands near a fixed
    /// reference, warmed by light bounced off the yellow sphere.
    #[test]
    fn test_back_wall_pixel_regression_band() {
        let scene = cornell_box().unwrap();
        let tracer = default_tracer(&scene);

        let runs = 32u32;
        let mut sum = [0u32; 3];
        for run in 0..runs {
            let mut rng = XorShift32::new(1 + run * 7919);
            let c = tracer.trace_pixel(128, 64, &mut rng);
            sum[0] += c.r as u32;
            sum[1] += c.g as u32;
            sum[2] += c.b as u32;
        }
        let mean = sum.map(|c| c as f32 / runs as f32);

        for (channel, reference) in mean.iter().zip(REFERENCE_128_64) {
            assert!(
                (channel - reference).abs() <= REFERENCE_TOLERANCE,
                "mean {:?} outside {} of reference {:?}",
                mean,
                REFERENCE_TOLERANCE,
                REFERENCE_128_64
            );
        }
    }

    const REFERENCE_128_64: [f32; 3] = [68.2, 57.0, 48.7];
    const REFERENCE_TOLERANCE: f32 = 12.0;
}
