//! Surface material description shared by triangles and spheres.

use prism_math::Vec3;
use serde::{Deserialize, Serialize};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Phong-style material with specular transport coefficients.
///
/// `reflectance + refractance` should stay at or below 1 for the result to be
/// plausible. The renderer does not enforce it; see
/// [`Material::is_energy_conserving`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Albedo
    pub color: Color,

    /// Weight of each light's ambient term
    pub ambient: f32,

    /// Lambertian weight, also scales diffuse indirect samples
    pub diffuse: f32,

    /// Phong weight, also scales glossy indirect samples
    pub specular: f32,

    /// Cosine-lobe exponent of the Phong term and of glossy sampling
    pub shininess: f32,

    /// Weight of the perfect mirror ray
    pub reflectance: f32,

    /// Weight of the Fresnel-split dielectric transport
    pub refractance: f32,

    /// Index of refraction of the medium behind the surface
    pub refractive_index: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::splat(0.75),
            ambient: 0.2,
            diffuse: 0.5,
            specular: 0.0,
            shininess: 1.0,
            reflectance: 0.0,
            refractance: 0.0,
            refractive_index: 1.0,
        }
    }
}

impl Material {
    /// Create a new material with only a color; other weights take defaults.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Set the Phong weights.
    pub fn with_phong(mut self, ambient: f32, diffuse: f32, specular: f32, shininess: f32) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    /// Set the mirror weight.
    pub fn with_reflectance(mut self, reflectance: f32) -> Self {
        self.reflectance = reflectance;
        self
    }

    /// Set the dielectric weight and index of refraction.
    pub fn with_refraction(mut self, refractance: f32, refractive_index: f32) -> Self {
        self.refractance = refractance;
        self.refractive_index = refractive_index;
        self
    }

    /// Check if this material spawns mirror or refraction rays.
    pub fn is_specular(&self) -> bool {
        self.reflectance > 0.0 || self.refractance > 0.0
    }

    /// Check if this material is refractive.
    pub fn is_refractive(&self) -> bool {
        self.refractance > 0.0
    }

    /// True when the specular transport weights sum to at most one.
    pub fn is_energy_conserving(&self) -> bool {
        self.reflectance + self.refractance <= 1.0
    }
}
