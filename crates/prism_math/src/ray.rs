use crate::Vec3;

/// Distance secondary rays are pushed off the surface they leave.
pub const RAY_OFFSET: f32 = 1e-4;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not required to be normalized. Hit distances reported by
/// the intersection routines are in units of the ray parameter `t`, so
/// `ray.at(t)` is always the hit point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray leaving a surface point.
    ///
    /// The origin is pushed `offset` along the surface normal, on the side the
    /// new direction heads towards. Reflected rays start in front of the
    /// surface and transmitted rays start behind it, whichever way the stored
    /// normal faces.
    pub fn offset_from(position: Vec3, normal: Vec3, direction: Vec3, offset: f32) -> Self {
        let side = if direction.dot(normal) >= 0.0 { 1.0 } else { -1.0 };
        Self {
            origin: position + normal * (side * offset),
            direction,
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
        assert_eq!(ray.origin(), ray.origin);
        assert_eq!(ray.direction(), ray.direction);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_offset_follows_direction_side() {
        let p = Vec3::ZERO;
        let n = Vec3::Y;

        // Leaving along the normal: pushed in front
        let out = Ray::offset_from(p, n, Vec3::new(0.3, 1.0, 0.0), RAY_OFFSET);
        assert!(out.origin.y > 0.0);

        // Transmitted through the surface: pushed behind
        let through = Ray::offset_from(p, n, Vec3::new(0.3, -1.0, 0.0), RAY_OFFSET);
        assert!(through.origin.y < 0.0);
        assert!((through.origin.y + RAY_OFFSET).abs() < 1e-9);
    }
}
