//! Scene types for Prism.
//!
//! A scene is a flat list of triangles, spheres and point lights. It is built
//! once and then only read by the renderer; the one exception is moving a
//! light between frames, which needs `&mut Scene` and therefore cannot overlap
//! a render that borrows the scene.

use prism_math::{Aabb, Vec3, Vec4};

use crate::material::{Color, Material};

/// A flat-shaded triangle.
#[derive(Clone, Debug)]
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,

    /// Unit face normal derived from the winding (zero when degenerate)
    normal: Vec3,

    pub material: Material,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        Self {
            v0,
            v1,
            v2,
            normal: Self::face_normal(v0, v1, v2),
            material,
        }
    }

    /// Create a triangle from homogeneous vertices.
    ///
    /// Points with `w != 0` are projected back by dividing through by `w`.
    pub fn from_homogeneous(v0: Vec4, v1: Vec4, v2: Vec4, material: Material) -> Self {
        Self::new(dehomogenize(v0), dehomogenize(v1), dehomogenize(v2), material)
    }

    /// Replace the vertices and recompute the normal.
    pub fn set_vertices(&mut self, v0: Vec3, v1: Vec3, v2: Vec3) {
        self.v0 = v0;
        self.v1 = v1;
        self.v2 = v2;
        self.normal = Self::face_normal(v0, v1, v2);
    }

    // Winding is clockwise-positive: normal = (v2 - v0) x (v1 - v0).
    fn face_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
        (v2 - v0).cross(v1 - v0).normalize_or_zero()
    }

    #[inline]
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Check if the triangle has (numerically) zero area.
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::ZERO
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::bounding([self.v0, self.v1, self.v2])
    }
}

fn dehomogenize(p: Vec4) -> Vec3 {
    if p.w != 0.0 {
        p.truncate() / p.w
    } else {
        p.truncate()
    }
}

/// A sphere primitive.
#[derive(Clone, Debug)]
pub struct Sphere {
    origin: Vec3,
    radius: f32,
    radius2: f32,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(origin: Vec3, radius: f32, material: Material) -> Self {
        let radius = radius.max(0.0);
        Self {
            origin,
            radius,
            radius2: radius * radius,
            material,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn radius_squared(&self) -> f32 {
        self.radius2
    }

    pub fn bounds(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        Aabb::from_points(self.origin - r, self.origin + r)
    }
}

/// A point light with a small rectangular extent for soft shadows.
#[derive(Clone, Debug)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,

    /// Per-light Phong coefficients
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,

    /// (constant, linear, quadratic) falloff
    pub attenuation: Vec3,

    /// Edges of the sampled area, centred on `position`
    pub plane_a: Vec3,
    pub plane_b: Vec3,
}

impl PointLight {
    /// Create a white light with the given position and no area extent.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            color: Color::ONE,
            ambient: 0.1,
            diffuse: 1.0,
            specular: 1.0,
            attenuation: Vec3::new(1.0, 0.0, 0.0),
            plane_a: Vec3::ZERO,
            plane_b: Vec3::ZERO,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_coefficients(mut self, ambient: f32, diffuse: f32, specular: f32) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    pub fn with_attenuation(mut self, attenuation: Vec3) -> Self {
        self.attenuation = attenuation;
        self
    }

    /// Make this an area light spanned by two edge vectors.
    pub fn with_extent(mut self, plane_a: Vec3, plane_b: Vec3) -> Self {
        self.plane_a = plane_a;
        self.plane_b = plane_b;
        self
    }

    /// Polynomial falloff divisor at distance `d`.
    ///
    /// Non-positive values (e.g. an all-zero triple) mean "no falloff".
    pub fn attenuation_at(&self, d: f32) -> f32 {
        let a = self.attenuation;
        let value = (a.z * d + a.y) * d + a.x;
        if value > 0.0 {
            value
        } else {
            1.0
        }
    }

    /// Point on the light's area for grid cell `(i, j)` of an `n x n` grid.
    pub fn sample_point(&self, i: u32, j: u32, n: u32) -> Vec3 {
        let n = n.max(1) as f32;
        let grad_a = i as f32 / n - 0.5;
        let grad_b = j as f32 / n - 0.5;
        self.position + self.plane_a * grad_a + self.plane_b * grad_b
    }
}

/// A complete scene containing geometry and lights.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub triangles: Vec<Triangle>,
    pub spheres: Vec<Sphere>,
    pub lights: Vec<PointLight>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Move a light by `offset`, returning its new position.
    ///
    /// The photon map is not rebuilt; caustics stay where they were until the
    /// caller builds a new one.
    pub fn move_light(&mut self, index: usize, offset: Vec3) -> Option<Vec3> {
        let light = self.lights.get_mut(index)?;
        light.position += offset;
        Some(light.position)
    }

    /// Iterate over every material in the scene.
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.triangles
            .iter()
            .map(|t| &t.material)
            .chain(self.spheres.iter().map(|s| &s.material))
    }

    /// Log a warning for each material whose specular weights exceed one.
    ///
    /// Returns the number of offending primitives.
    pub fn check_materials(&self) -> usize {
        let mut count = 0;
        for (index, material) in self.materials().enumerate() {
            if !material.is_energy_conserving() {
                log::warn!(
                    "Primitive {} has reflectance + refractance = {:.2} > 1",
                    index,
                    material.reflectance + material.refractance
                );
                count += 1;
            }
        }
        count
    }

    /// Bounding box of all geometry (lights excluded).
    pub fn bounds(&self) -> Aabb {
        let tri = self.triangles.iter().map(Triangle::bounds);
        let sph = self.spheres.iter().map(Sphere::bounds);
        tri.chain(sph)
            .fold(Aabb::EMPTY, |acc, b| Aabb::surrounding(&acc, &b))
    }
}
