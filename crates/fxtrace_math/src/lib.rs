//! Fixed-point math for fxtrace.
//!
//! Q-format scalars, three-component vectors and rays. All arithmetic is
//! integer based apart from the seed of the inverse square root.

// Re-export glam for scene authoring in floats
pub use glam;

mod fixed;
mod ray;
mod vec3;

pub use fixed::{Fixed, FRAC_BITS};
pub use ray::Ray;
pub use vec3::Vec3;
