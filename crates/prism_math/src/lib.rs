// Re-export glam for convenience
pub use glam::*;

// Prism math types
mod aabb;
mod basis;
mod interval;
pub mod optics;
mod ray;

pub use aabb::Aabb;
pub use basis::Onb;
pub use interval::Interval;
pub use optics::{fresnel, reflect, refract};
pub use ray::{Ray, RAY_OFFSET};
