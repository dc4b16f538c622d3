//! fxtrace core - static scene model.
//!
//! This crate provides:
//!
//! - **Scene types**: `Material`, `Sphere`, `Plane`, `LightRect`, `Scene`
//! - **Default scene**: the enclosed box used by the renderer and tests
//!
//! # Example
//!
//! ```
//! use fxtrace_core::cornell_box;
//!
//! let scene = cornell_box().unwrap();
//! assert_eq!(scene.light_plane(), 1);
//! ```

pub mod cornell;
pub mod scene;

// Re-export commonly used types
pub use cornell::{cornell_box, CornellBox, LIGHT_INTENSITY};
pub use scene::{LightRect, Material, Plane, Scene, SceneError, Sphere};
