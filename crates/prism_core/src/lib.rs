//! Prism Core - scene description and render configuration.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Triangle`, `Sphere`, `PointLight`, `Material`
//! - **Configuration**: `RenderConfig` and its shading, photon and camera
//!   sections, loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use prism_core::{Material, Scene, Sphere, RenderConfig};
//!
//! let mut scene = Scene::new();
//! scene.add_sphere(Sphere::new(Vec3::ZERO, 0.5, Material::default()));
//! let config = RenderConfig::from_json_file("render.json")?;
//! ```

pub mod config;
pub mod material;
pub mod scene;

// Re-export commonly used types
pub use config::{
    CameraConfig, ConfigError, ConfigResult, PhotonConfig, RenderConfig, ShadingConfig,
};
pub use material::{Color, Material};
pub use scene::{PointLight, Scene, Sphere, Triangle};
