//! Primary-ray driver.
//!
//! Implements:
//! - `trace`, the single-ray entry point
//! - anti-aliased pixel rendering over a fixed sub-sample grid
//! - a single-threaded whole-image render that walks the same buckets as the
//!   parallel one, so both produce identical pixels

use crate::bucket::{generate_buckets, render_bucket};
use crate::camera::Camera;
use crate::hittable::closest_intersection;
use crate::photon_map::PhotonMap;
use crate::shader::Shader;
use prism_core::{Color, RenderConfig, Scene, ShadingConfig};
use prism_math::Ray;
use rand::RngCore;
use std::time::Instant;

/// Radiance seen along a ray, or `None` if it hits nothing.
pub fn trace(
    scene: &Scene,
    photon_map: &PhotonMap,
    config: &ShadingConfig,
    ray: &Ray,
    rng: &mut dyn RngCore,
) -> Option<Color> {
    Shader::new(scene, photon_map, config).trace(ray, rng)
}

impl Shader<'_> {
    /// Find the nearest hit along a primary ray and shade it.
    pub fn trace(&self, ray: &Ray, rng: &mut dyn RngCore) -> Option<Color> {
        let hit = closest_intersection(ray, self.scene())?;
        Some(self.shade(&hit, ray, rng))
    }
}

/// Convert a color to 8-bit RGBA.
///
/// Each channel is clamped to [0, 1] and scaled; no gamma curve is applied.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let c = color.clamp(Color::ZERO, Color::ONE) * 255.0;
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

/// Render a single pixel, averaging its `AA x AA` sub-samples.
///
/// Sub-samples that miss the scene contribute black.
pub fn render_pixel(
    camera: &Camera,
    shader: &Shader,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let aa = camera.anti_aliasing;
    let mut pixel_color = Color::ZERO;

    for sub_x in 0..aa {
        for sub_y in 0..aa {
            let ray = camera.get_ray(x, y, sub_x, sub_y);
            if let Some(color) = shader.trace(&ray, rng) {
                pixel_color += color;
            }
        }
    }

    pixel_color / camera.samples_per_pixel() as f32
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes, row-major from the top-left pixel.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&color| color_to_rgba(color))
            .collect()
    }
}

/// Render the entire image on the calling thread.
pub fn render(
    camera: &Camera,
    scene: &Scene,
    photon_map: &PhotonMap,
    config: &RenderConfig,
) -> ImageBuffer {
    let start = Instant::now();
    let shader = Shader::new(scene, photon_map, &config.shading);
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for bucket in generate_buckets(camera.image_width, camera.image_height, config.bucket_size) {
        let result = render_bucket(&bucket, camera, &shader, config.seed);
        image.write_bucket(&result);
    }

    log::info!(
        "Rendered {}x{} in {:.2?}",
        image.width,
        image.height,
        start.elapsed()
    );
    image
}
