//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use crate::camera::Camera;
use crate::photon_map::PhotonMap;
use crate::renderer::{render_pixel, ImageBuffer};
use crate::shader::Shader;
use prism_core::{Color, RenderConfig, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's random stream.
    pub fn seed(&self, base: u64) -> u64 {
        base.wrapping_add(self.index as u64)
    }
}

/// Split an image into buckets of at most `bucket_size` pixels a side.
///
/// Buckets nearest the image centre come first and `index` follows that
/// order, so it also picks each bucket's seed. A zero size is treated as one.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);
    let step = size as usize;

    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(step)
        .flat_map(|y| (0..width).step_by(step).map(move |x| (x, y)))
        .map(|(x, y)| Bucket::new(x, y, size.min(width - x), size.min(height - y), 0))
        .collect();

    sort_from_center(&mut buckets, width, height);
    for (index, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = index;
    }
    buckets
}

/// Stable sort by squared distance from the bucket centre to the image centre.
/// Ties keep row-major order.
fn sort_from_center(buckets: &mut [Bucket], width: u32, height: u32) {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let distance = |b: &Bucket| {
        let dx = b.x as f32 + b.width as f32 / 2.0 - cx;
        let dy = b.y as f32 + b.height as f32 / 2.0 - cy;
        dx * dx + dy * dy
    };
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Render a single bucket with its own seeded RNG.
pub fn render_bucket(bucket: &Bucket, camera: &Camera, shader: &Shader, seed: u64) -> BucketResult {
    let mut rng = StdRng::seed_from_u64(bucket.seed(seed));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            pixels.push(render_pixel(camera, shader, global_x, global_y, &mut rng));
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}

impl ImageBuffer {
    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, line) in result
            .pixels
            .chunks(bucket.width.max(1) as usize)
            .enumerate()
        {
            for (col, &color) in line.iter().enumerate() {
                self.set(bucket.x + col as u32, bucket.y + row as u32, color);
            }
        }
    }
}

/// Render the entire image, one rayon task per bucket.
///
/// Every bucket seeds its own RNG from `config.seed` and its index, so the
/// output does not depend on the number of threads and matches
/// [`render`](crate::render) exactly.
pub fn render_parallel(
    camera: &Camera,
    scene: &Scene,
    photon_map: &PhotonMap,
    config: &RenderConfig,
) -> ImageBuffer {
    let start = Instant::now();
    let shader = Shader::new(scene, photon_map, &config.shading);
    let buckets = generate_buckets(camera.image_width, camera.image_height, config.bucket_size);
    log::info!(
        "Rendering {}x{} in {} buckets on {} threads",
        camera.image_width,
        camera.image_height,
        buckets.len(),
        rayon::current_num_threads()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, camera, &shader, config.seed))
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
