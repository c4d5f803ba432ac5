//! Ray-sphere intersection.

use crate::hittable::{Hittable, Intersection};
use prism_core::Sphere;
use prism_math::Ray;

/// Solve `a*x^2 + b*x + c = 0`, returning the real roots in ascending order.
///
/// Uses the cancellation-free form of the quadratic formula. A zero
/// discriminant yields the same root twice.
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    if a == 0.0 {
        return None;
    }

    let discr = b * b - 4.0 * a * c;
    if discr < 0.0 {
        return None;
    }

    let (x0, x1) = if discr == 0.0 {
        let x = -0.5 * b / a;
        (x, x)
    } else {
        let q = if b > 0.0 {
            -0.5 * (b + discr.sqrt())
        } else {
            -0.5 * (b - discr.sqrt())
        };
        (q / a, c / q)
    };

    Some(if x0 > x1 { (x1, x0) } else { (x0, x1) })
}

/// Intersect a ray with a sphere.
///
/// Takes the smaller non-negative root, so a ray starting inside the sphere
/// hits the far side. The normal always points outwards.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere) -> Option<Intersection> {
    if sphere.radius_squared() <= 0.0 {
        return None;
    }

    let l = ray.origin() - sphere.origin();
    let dir = ray.direction();

    let a = dir.length_squared();
    let b = 2.0 * dir.dot(l);
    let c = l.length_squared() - sphere.radius_squared();

    let (t0, t1) = solve_quadratic(a, b, c)?;
    let t = if t0 >= 0.0 {
        t0
    } else if t1 >= 0.0 {
        t1
    } else {
        return None;
    };

    let position = ray.at(t);
    Some(Intersection {
        position,
        normal: (position - sphere.origin()).normalize_or_zero(),
        distance: t,
        material: sphere.material,
    })
}

impl Hittable for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        intersect_sphere(ray, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::Material;
    use prism_math::Vec3;

    #[test]
    fn test_sphere_hit_front() {
        for r in [0.25, 0.5, 1.0] {
            let sphere = Sphere::new(Vec3::ZERO, r, Material::default());
            let ray = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);

            let hit = intersect_sphere(&ray, &sphere).unwrap();
            assert!((hit.distance - (2.0 - r)).abs() < 1e-5, "r={r}");
            assert!((hit.normal - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_from_inside_hits_far_side() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, Material::default());
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let hit = intersect_sphere(&ray, &sphere).unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-5);
        // Outward, i.e. along the ray
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_behind_is_miss() {
        let sphere = Sphere::new(Vec3::ZERO, 0.5, Material::default());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::Z);
        assert!(intersect_sphere(&ray, &sphere).is_none());
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::ZERO, 0.5, Material::default());
        let ray = Ray::new(Vec3::new(0.0, 1.0, -2.0), Vec3::Z);
        assert!(intersect_sphere(&ray, &sphere).is_none());
    }

    #[test]
    fn test_sphere_tangent_hit() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, Material::default());
        let ray = Ray::new(Vec3::new(0.0, 1.0, -2.0), Vec3::Z);

        let hit = intersect_sphere(&ray, &sphere).unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_radius_sphere_misses() {
        let sphere = Sphere::new(Vec3::ZERO, 0.0, Material::default());
        let ray = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        assert!(intersect_sphere(&ray, &sphere).is_none());
    }

    #[test]
    fn test_zero_direction_misses() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, Material::default());
        let ray = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::ZERO);
        assert!(intersect_sphere(&ray, &sphere).is_none());
    }

    #[test]
    fn test_solve_quadratic() {
        // (x - 1)(x - 3)
        assert_eq!(solve_quadratic(1.0, -4.0, 3.0), Some((1.0, 3.0)));
        // (x + 2)^2
        assert_eq!(solve_quadratic(1.0, 4.0, 4.0), Some((-2.0, -2.0)));
        assert_eq!(solve_quadratic(1.0, 0.0, 1.0), None);
    }
}
