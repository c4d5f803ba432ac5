//! Hittable trait, Intersection record and scene-wide ray queries.
//!
//! The scene is small enough that every query is a linear scan: triangles
//! first, then spheres.

use prism_core::{Material, Scene};
use prism_math::{Interval, Ray, Vec3};

/// Record of a ray-primitive intersection.
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    /// Point of intersection
    pub position: Vec3,
    /// Surface normal as stored on the primitive (not flipped towards the ray)
    pub normal: Vec3,
    /// Ray parameter t of the hit
    pub distance: f32,
    /// Material of the primitive that was hit
    pub material: Material,
}

/// Trait for primitives that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Intersect a ray with this primitive.
    ///
    /// Returns the nearest hit with a positive (or, for spheres, non-negative)
    /// ray parameter, or `None` on a miss.
    fn intersect(&self, ray: &Ray) -> Option<Intersection>;
}

/// Every primitive in the scene, triangles first.
fn primitives(scene: &Scene) -> impl Iterator<Item = &dyn Hittable> {
    scene
        .triangles
        .iter()
        .map(|t| t as &dyn Hittable)
        .chain(scene.spheres.iter().map(|s| s as &dyn Hittable))
}

/// Find the nearest hit with a strictly positive distance.
///
/// Used for camera, bounce, reflection and refraction rays.
pub fn closest_intersection(ray: &Ray, scene: &Scene) -> Option<Intersection> {
    let mut closest: Option<Intersection> = None;

    for object in primitives(scene) {
        if let Some(hit) = object.intersect(ray) {
            if !Interval::FORWARD.surrounds(hit.distance) {
                continue;
            }
            match &closest {
                Some(best) if best.distance <= hit.distance => {}
                _ => closest = Some(hit),
            }
        }
    }

    closest
}

/// True if anything is hit with a ray parameter in `(0, max_t)`.
///
/// Returns on the first such hit in scene order; it is not necessarily the
/// nearest one. Shadow rays aim at the light sample and pass `max_t = 1.0`.
pub fn occluded(ray: &Ray, scene: &Scene, max_t: f32) -> bool {
    let range = Interval::new(0.0, max_t);
    primitives(scene).any(|object| {
        object
            .intersect(ray)
            .is_some_and(|hit| range.surrounds(hit.distance))
    })
}

/// True if the ray hits anything at all in front of its origin.
pub fn any_intersection(ray: &Ray, scene: &Scene) -> bool {
    occluded(ray, scene, f32::INFINITY)
}
