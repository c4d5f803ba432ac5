//! Render configuration.
//!
//! Every struct has a `Default` matching the stock renderer settings and can be
//! loaded, fully or partially, from JSON. Missing fields fall back to their
//! defaults.

use std::path::Path;

use prism_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a render configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for the recursive shader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Shadow rays per light are `light_samples^2`, spread over the light area
    pub light_samples: u32,

    /// Monte-Carlo samples per indirect evaluation
    pub indirect_samples: u32,

    /// Indirect bounces before the indirect term is dropped
    pub max_bounce_depth: u32,

    /// Mirror/refraction recursion limit
    pub max_reflect_depth: u32,

    /// Surface offset for secondary rays
    pub ray_offset: f32,

    /// Add the photon-map estimate at primary hits
    pub caustics: bool,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            light_samples: 1,
            indirect_samples: 16,
            max_bounce_depth: 1,
            max_reflect_depth: 8,
            ray_offset: 1e-4,
            caustics: true,
        }
    }
}

/// Settings for photon emission and the caustic density estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotonConfig {
    pub photons_per_light: u32,

    /// Propagation limit through specular surfaces
    pub max_depth: u32,

    /// Radius of the density-estimation sphere
    pub gather_radius: f32,

    /// Scale applied to the photon density
    pub light_multiplier: f32,

    /// Cosine-power exponent of the emission lobe
    pub emission_exponent: f32,

    /// Centre of the emission lobe (+Y is "down" in the demo scene)
    pub emission_axis: Vec3,

    /// Photons traced per parallel task
    pub chunk_size: u32,

    pub seed: u64,
}

impl Default for PhotonConfig {
    fn default() -> Self {
        Self {
            photons_per_light: 200_000,
            max_depth: 8,
            gather_radius: 0.04,
            light_multiplier: 50.0,
            emission_exponent: 2.0,
            emission_axis: Vec3::Y,
            chunk_size: 4096,
            seed: 0x5eed,
        }
    }
}

/// Pinhole camera placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,

    /// Rotation angles in radians
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,

    pub focal_length: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -1.8),
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            focal_length: 1.0,
        }
    }
}

/// Top-level render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,

    /// Sub-samples per pixel are `anti_aliasing^2` on a regular grid
    pub anti_aliasing: u32,

    /// Tile edge for parallel rendering
    pub bucket_size: u32,

    /// Base seed for per-bucket random number generators
    pub seed: u64,

    pub camera: CameraConfig,
    pub shading: ShadingConfig,
    pub photons: PhotonConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            anti_aliasing: 1,
            bucket_size: 64,
            seed: 42,
            camera: CameraConfig::default(),
            shading: ShadingConfig::default(),
            photons: PhotonConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::info!("Loaded render config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON, e.g. to write out a starter config.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the renderer cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.anti_aliasing == 0 {
            return Err(ConfigError::Invalid("anti_aliasing must be at least 1".into()));
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::Invalid("bucket_size must be at least 1".into()));
        }
        if self.shading.light_samples == 0 {
            return Err(ConfigError::Invalid("light_samples must be at least 1".into()));
        }
        if self.shading.ray_offset <= 0.0 {
            return Err(ConfigError::Invalid("ray_offset must be positive".into()));
        }
        if self.shading.caustics {
            if self.photons.photons_per_light == 0 {
                return Err(ConfigError::Invalid(
                    "caustics are enabled but photons_per_light is 0".into(),
                ));
            }
            if self.photons.gather_radius <= 0.0 {
                return Err(ConfigError::Invalid("gather_radius must be positive".into()));
            }
        }
        if self.photons.chunk_size == 0 {
            return Err(ConfigError::Invalid("photon chunk_size must be at least 1".into()));
        }
        Ok(())
    }
}
