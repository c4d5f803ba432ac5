//! Reflection, refraction and Fresnel helpers for dielectric interfaces.
//!
//! The surface normal may face either way: the sign of `I·N` decides whether
//! the ray is entering the medium (`I·N < 0`) or leaving it.

use crate::Vec3;

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a direction through an interface using Snell's law.
///
/// `ior` is the index of the medium behind the surface, relative to the
/// medium the normal points into. Returns `None` on total internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, ior: f32) -> Option<Vec3> {
    let i = incident.normalize_or_zero();
    let mut cosi = i.dot(normal).clamp(-1.0, 1.0);
    let (mut etai, mut etat) = (1.0, ior);
    let mut n = normal;

    if cosi < 0.0 {
        cosi = -cosi;
    } else {
        std::mem::swap(&mut etai, &mut etat);
        n = -normal;
    }

    let eta = etai / etat;
    let k = 1.0 - eta * eta * (1.0 - cosi * cosi);
    if k < 0.0 {
        return None;
    }

    Some(eta * i + (eta * cosi - k.sqrt()) * n)
}

/// Fraction of energy reflected at a dielectric interface (exact Fresnel
/// equations, averaged over both polarisations).
///
/// Returns 1.0 under total internal reflection.
pub fn fresnel(incident: Vec3, normal: Vec3, ior: f32) -> f32 {
    let mut cosi = incident
        .normalize_or_zero()
        .dot(normal.normalize_or_zero())
        .clamp(-1.0, 1.0);
    let (mut etai, mut etat) = (1.0_f32, ior);
    if cosi > 0.0 {
        std::mem::swap(&mut etai, &mut etat);
    }

    let sint = etai / etat * (1.0 - cosi * cosi).max(0.0).sqrt();
    if sint >= 1.0 {
        return 1.0;
    }

    let cost = (1.0 - sint * sint).max(0.0).sqrt();
    cosi = cosi.abs();
    let rs = ((etat * cosi) - (etai * cost)) / ((etat * cosi) + (etai * cost));
    let rp = ((etai * cosi) - (etat * cost)) / ((etai * cosi) + (etat * cost));
    (rs * rs + rp * rp) / 2.0
}
