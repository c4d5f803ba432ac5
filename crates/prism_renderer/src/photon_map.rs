//! Caustic photon map.
//!
//! Photons are emitted from each light, and only those whose first hit is
//! refractive are kept. Each kept photon is walked through the specular
//! surfaces it meets. Its final resting position goes into a k-d tree.
//! At shading time the number of photons near a point stands in for the
//! caustic radiance there.

use crate::hittable::{closest_intersection, Intersection};
use crate::kdtree::{KdTree, KdTreeBuilder};
use crate::sampling::sample_lobe;
use prism_core::{Color, PhotonConfig, PointLight, Scene};
use prism_math::{reflect, refract, Onb, Ray, Vec3, RAY_OFFSET};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;

/// A photon at the end of its path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Photon {
    /// Carried power. Not used by the density estimate.
    pub energy: Color,
    pub position: Vec3,
}

/// Indexed caustic photons plus the settings used to query them.
pub struct PhotonMap {
    tree: KdTree,
    total: usize,
    gather_radius: f32,
    light_multiplier: f32,
}

impl PhotonMap {
    /// A map with no photons; every caustic estimate is zero.
    pub fn empty() -> Self {
        let config = PhotonConfig::default();
        Self {
            tree: KdTree::empty(),
            total: 0,
            gather_radius: config.gather_radius,
            light_multiplier: config.light_multiplier,
        }
    }

    /// Emit, trace and index caustic photons for every light in the scene.
    ///
    /// Deterministic for a given scene and `config.seed`, independent of the
    /// number of worker threads.
    pub fn build(scene: &Scene, config: &PhotonConfig) -> Self {
        let start = Instant::now();
        let chunk_size = config.chunk_size.max(1);
        let chunks_per_light = config.photons_per_light.div_ceil(chunk_size);

        let mut positions = Vec::new();
        for (light_index, light) in scene.lights.iter().enumerate() {
            let chunks: Vec<Vec<Vec3>> = (0..chunks_per_light)
                .into_par_iter()
                .map(|chunk| {
                    let first = chunk * chunk_size;
                    let count = chunk_size.min(config.photons_per_light - first);
                    let seed = chunk_seed(config.seed, light_index, chunk);
                    emit_chunk(scene, light, count, seed, config)
                })
                .collect();

            positions.extend(chunks.into_iter().flatten());
            log::debug!(
                "Light {}: {} caustic photons so far",
                light_index,
                positions.len()
            );
        }

        let map = Self::from_positions(positions, config);
        log::info!(
            "Photon map built: {} photons indexed from {} emitted in {:.2?}",
            map.total,
            config.photons_per_light as usize * scene.lights.len(),
            start.elapsed()
        );
        map
    }

    /// Index already-traced photon positions.
    pub fn from_positions<I>(positions: I, config: &PhotonConfig) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let builder: KdTreeBuilder = positions.into_iter().collect();
        let total = builder.len();
        Self {
            tree: builder.build(),
            total,
            gather_radius: config.gather_radius,
            light_multiplier: config.light_multiplier,
        }
    }

    /// Number of indexed photons.
    pub fn total_photons(&self) -> usize {
        self.total
    }

    /// Read-only access to the underlying index.
    pub fn tree(&self) -> &KdTree {
        &self.tree
    }

    /// Caustic radiance estimate at a surface point.
    ///
    /// `multiplier * (white + albedo) * n / (total + 1)`, where `n` counts the
    /// photons within the gather radius.
    pub fn caustic_estimate(&self, position: Vec3, albedo: Color) -> Color {
        if self.total == 0 {
            return Color::ZERO;
        }
        let count = self.tree.range_count(position, self.gather_radius);
        self.light_multiplier * (Color::ONE + albedo) * count as f32 / (self.total as f32 + 1.0)
    }
}

/// Seed for one chunk of one light. The base seed is spread over the high
/// bits first so neighbouring seeds do not share chunk streams.
fn chunk_seed(seed: u64, light_index: usize, chunk: u32) -> u64 {
    let stream = ((light_index as u64) << 32) | chunk as u64;
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ stream
}

/// Emit `count` photons from one light and return the kept end positions.
fn emit_chunk(
    scene: &Scene,
    light: &PointLight,
    count: u32,
    seed: u64,
    config: &PhotonConfig,
) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let basis = Onb::from_axis(config.emission_axis);

    (0..count)
        .filter_map(|_| {
            let direction = sample_lobe(&basis, config.emission_exponent, &mut rng);
            let ray = Ray::new(light.position, direction);
            trace_photon(scene, &ray, config.max_depth).map(|photon| photon.position)
        })
        .collect()
}

/// Trace a single photon.
///
/// Returns `None` when the photon misses everything or its first hit is not
/// refractive.
pub fn trace_photon(scene: &Scene, ray: &Ray, max_depth: u32) -> Option<Photon> {
    let first = closest_intersection(ray, scene)?;
    if !first.material.is_refractive() {
        return None;
    }

    let mut hit = first;
    let mut incoming = *ray;
    for _ in 0..max_depth {
        match next_bounce(scene, &hit, &incoming) {
            Some((next_hit, next_ray)) => {
                hit = next_hit;
                incoming = next_ray;
            }
            None => break,
        }
    }

    Some(Photon {
        energy: Color::ONE,
        position: hit.position,
    })
}

/// Follow a photon off a specular surface.
///
/// A mirror takes priority; otherwise a refractive surface transmits, or
/// reflects under total internal reflection. Diffuse surfaces absorb.
fn next_bounce(scene: &Scene, hit: &Intersection, incoming: &Ray) -> Option<(Intersection, Ray)> {
    let material = &hit.material;
    let cast = |direction: Vec3| {
        let ray = Ray::offset_from(hit.position, hit.normal, direction, RAY_OFFSET);
        closest_intersection(&ray, scene).map(|next| (next, ray))
    };

    if material.reflectance > 0.0 {
        if let Some(found) = cast(reflect(incoming.direction, hit.normal)) {
            return Some(found);
        }
    }

    if material.refractance > 0.0 {
        let direction = refract(incoming.direction, hit.normal, material.refractive_index)
            .unwrap_or_else(|| reflect(incoming.direction, hit.normal));
        return cast(direction);
    }

    None
}
