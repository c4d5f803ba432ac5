//! Prism renderer - CPU ray tracing with photon-mapped caustics
//!
//! Whitted-style recursion for mirrors and glass, Monte Carlo sampling for
//! indirect light, and a caustic photon map indexed by a k-d tree.
//!
//! Typical use: build a [`PhotonMap`] once per scene, then render with
//! [`render_parallel`] or shade individual rays with [`trace`].

mod bucket;
mod camera;
mod hittable;
mod kdtree;
mod photon_map;
mod renderer;
mod sampling;
mod shader;
mod sphere;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult};
pub use camera::Camera;
pub use hittable::{any_intersection, closest_intersection, occluded, Hittable, Intersection};
pub use kdtree::{KdTree, KdTreeBuilder};
pub use photon_map::{trace_photon, Photon, PhotonMap};
pub use renderer::{color_to_rgba, render, render_pixel, trace, ImageBuffer};
pub use sampling::{cosine_power_sample, gen_f32, sample_lobe};
pub use shader::{Depth, Shader};
pub use sphere::{intersect_sphere, solve_quadratic};
pub use triangle::{intersect_triangle, solve_barycentric, Barycentric};

/// Re-export common types from the core and math crates
pub use prism_core::{Color, Material, PointLight, Scene, Sphere, Triangle};
pub use prism_math::{Ray, Vec3};
