use crate::Vec3;

/// Orthonormal basis around a unit axis.
///
/// The tangent is picked from the two largest components of the axis so the
/// construction never divides by a vanishing length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    pub axis: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

impl Onb {
    /// Build a basis with `axis` as its up direction.
    ///
    /// A zero axis yields the canonical basis with +Y up.
    pub fn from_axis(axis: Vec3) -> Self {
        let n = axis.normalize_or_zero();
        if n == Vec3::ZERO {
            return Self {
                axis: Vec3::Y,
                tangent: Vec3::Z,
                bitangent: Vec3::X,
            };
        }

        let tangent = if n.x.abs() > n.y.abs() {
            Vec3::new(n.z, 0.0, -n.x) / (n.x * n.x + n.z * n.z).sqrt()
        } else {
            Vec3::new(0.0, -n.z, n.y) / (n.y * n.y + n.z * n.z).sqrt()
        };
        let bitangent = n.cross(tangent);

        Self {
            axis: n,
            tangent,
            bitangent,
        }
    }

    /// Map a local sample (`y` along the axis) into world space.
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        local.x * self.bitangent + local.y * self.axis + local.z * self.tangent
    }
}
