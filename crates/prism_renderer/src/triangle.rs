//! Ray-triangle intersection.
//!
//! Solves `origin + t*d = v0 + u*(v1 - v0) + v*(v2 - v0)` with Cramer's rule.
//! Hits are strict: a ray through an edge or a vertex misses.

use crate::hittable::{Hittable, Intersection};
use prism_core::Triangle;
use prism_math::{Interval, Mat3, Ray};

/// Ray parameter and barycentric coordinates of a triangle hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

/// Solve the ray/triangle linear system.
///
/// Returns the solution only when it lies strictly inside the triangle and
/// strictly in front of the ray origin. Zero-area triangles and rays parallel
/// to the plane (zero determinant) never hit.
pub fn solve_barycentric(ray: &Ray, triangle: &Triangle) -> Option<Barycentric> {
    if triangle.is_degenerate() {
        return None;
    }
    let [v0, v1, v2] = triangle.vertices();
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let b = ray.origin() - v0;
    let neg_d = -ray.direction();

    let det = Mat3::from_cols(neg_d, e1, e2).determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }

    let t = Mat3::from_cols(b, e1, e2).determinant() / det;
    let u = Mat3::from_cols(neg_d, b, e2).determinant() / det;
    let v = Mat3::from_cols(neg_d, e1, b).determinant() / det;

    if Interval::FORWARD.surrounds(t) && u > 0.0 && v > 0.0 && u + v < 1.0 {
        Some(Barycentric { t, u, v })
    } else {
        None
    }
}

/// Intersect a ray with a triangle.
pub fn intersect_triangle(ray: &Ray, triangle: &Triangle) -> Option<Intersection> {
    let Barycentric { t, u, v } = solve_barycentric(ray, triangle)?;
    let [v0, v1, v2] = triangle.vertices();

    Some(Intersection {
        position: v0 + u * (v1 - v0) + v * (v2 - v0),
        normal: triangle.normal(),
        distance: t,
        material: triangle.material,
    })
}

impl Hittable for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        intersect_triangle(ray, self)
    }
}
