//! Random sampling helpers.
//!
//! Every sampler takes the caller's RNG so each worker can own its generator.

use prism_math::{Onb, Vec3};
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Sample a direction from a cosine-power lobe around local +Y.
///
/// The density is proportional to `cos(theta)^exponent`; exponent 1 gives the
/// usual diffuse distribution, larger exponents narrow the lobe.
pub fn cosine_power_sample(exponent: f32, rng: &mut dyn RngCore) -> Vec3 {
    let u = gen_f32(rng);
    let v = gen_f32(rng);

    let cos_theta = (1.0 - u).powf(1.0 / (1.0 + exponent));
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * v;

    Vec3::new(sin_theta * phi.cos(), cos_theta, sin_theta * phi.sin())
}

/// Sample a world-space direction from a cosine-power lobe around `basis.axis`.
#[inline]
pub fn sample_lobe(basis: &Onb, exponent: f32, rng: &mut dyn RngCore) -> Vec3 {
    basis.to_world(cosine_power_sample(exponent, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_are_unit_and_in_hemisphere() {
        let mut rng = StdRng::seed_from_u64(7);
        for exponent in [1.0, 2.0, 20.0] {
            for _ in 0..1000 {
                let s = cosine_power_sample(exponent, &mut rng);
                assert!((s.length() - 1.0).abs() < 1e-4);
                assert!(s.y >= 0.0);
            }
        }
    }

    #[test]
    fn test_higher_exponent_narrows_lobe() {
        let mut rng = StdRng::seed_from_u64(11);
        let mean_cos = |exponent: f32, rng: &mut StdRng| {
            (0..4000)
                .map(|_| cosine_power_sample(exponent, &mut *rng).y)
                .sum::<f32>()
                / 4000.0
        };

        let wide = mean_cos(1.0, &mut rng);
        let narrow = mean_cos(50.0, &mut rng);

        // E[cos] = (m + 1) / (m + 2) for this lobe
        assert!((wide - 2.0 / 3.0).abs() < 0.03, "wide={wide}");
        assert!(narrow > 0.95, "narrow={narrow}");
    }

    #[test]
    fn test_lobe_follows_axis() {
        let mut rng = StdRng::seed_from_u64(3);
        let axis = Vec3::new(1.0, -1.0, 0.5).normalize();
        let basis = Onb::from_axis(axis);
        for _ in 0..500 {
            assert!(sample_lobe(&basis, 1.0, &mut rng).dot(axis) >= -1e-5);
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..10 {
            assert_eq!(cosine_power_sample(2.0, &mut a), cosine_power_sample(2.0, &mut b));
        }
    }
}
