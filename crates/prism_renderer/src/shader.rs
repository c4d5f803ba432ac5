//! Recursive light-transport shader.
//!
//! The radiance at a hit is the sum of four terms:
//! - direct Phong lighting with soft shadows from each light's sample grid
//! - Monte Carlo indirect lighting (diffuse and glossy lobes)
//! - mirror reflection and Fresnel-weighted refraction
//! - the caustic estimate from the photon map, at the primary hit only
//!
//! Recursion is bounded by two independent counters in [`Depth`].

use crate::hittable::{closest_intersection, occluded, Intersection};
use crate::photon_map::PhotonMap;
use crate::sampling::sample_lobe;
use prism_core::{Color, PointLight, Scene, ShadingConfig};
use prism_math::{fresnel, reflect, refract, Onb, Ray, Vec3};
use rand::RngCore;

/// Recursion state of a shading call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Depth {
    /// Mirror and refraction steps taken so far
    pub reflect: u32,
    /// Indirect (Monte Carlo) bounces taken so far
    pub bounce: u32,
}

impl Depth {
    fn next_reflect(self) -> Self {
        Self {
            reflect: self.reflect + 1,
            ..self
        }
    }

    fn next_bounce(self) -> Self {
        Self {
            bounce: self.bounce + 1,
            ..self
        }
    }

    fn is_primary(self) -> bool {
        self.reflect == 0 && self.bounce == 0
    }
}

/// Computes the radiance leaving a surface hit towards the viewer.
///
/// Borrows everything it reads, so one shader can be shared across threads.
/// Each thread brings its own RNG.
pub struct Shader<'a> {
    scene: &'a Scene,
    photon_map: &'a PhotonMap,
    config: &'a ShadingConfig,
}

impl<'a> Shader<'a> {
    pub fn new(scene: &'a Scene, photon_map: &'a PhotonMap, config: &'a ShadingConfig) -> Self {
        Self {
            scene,
            photon_map,
            config,
        }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    /// Shade a primary hit.
    pub fn shade(&self, hit: &Intersection, ray: &Ray, rng: &mut dyn RngCore) -> Color {
        self.shade_at(hit, ray, Depth::default(), rng)
    }

    /// Shade a hit reached at the given recursion depth.
    pub fn shade_at(
        &self,
        hit: &Intersection,
        ray: &Ray,
        depth: Depth,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut color: Color = self
            .scene
            .lights
            .iter()
            .map(|light| self.direct_lighting(hit, ray, light))
            .sum();

        if depth.bounce < self.config.max_bounce_depth {
            color += self.indirect_lighting(hit, ray, depth, rng);
        }

        if depth.reflect < self.config.max_reflect_depth && hit.material.is_specular() {
            color += self.specular_transport(hit, ray, depth, rng);
        }

        if self.config.caustics && depth.is_primary() {
            color += self
                .photon_map
                .caustic_estimate(hit.position, hit.material.color);
        }

        color
    }

    /// Phong lighting from one light, with shadowing over its sample grid.
    ///
    /// A fully shadowed point receives only the ambient term. Shadow rays
    /// always leave from the side the stored normal faces, so a light behind
    /// the surface is blocked by the surface itself.
    pub fn direct_lighting(&self, hit: &Intersection, ray: &Ray, light: &PointLight) -> Color {
        let material = &hit.material;
        let albedo = material.color;
        let ambient = albedo * material.ambient * light.ambient;

        let to_light = light.position - hit.position;
        let distance = to_light.length();

        let origin = hit.position + hit.normal * self.config.ray_offset;
        let samples = self.config.light_samples.max(1);
        let mut visible = 0u32;
        for i in 0..samples {
            for j in 0..samples {
                let shadow = Ray::new(origin, light.sample_point(i, j, samples) - origin);
                if !occluded(&shadow, self.scene, 1.0) {
                    visible += 1;
                }
            }
        }
        if visible == 0 {
            return ambient;
        }
        let fraction = visible as f32 / (samples * samples) as f32;

        let l = to_light.normalize_or_zero();
        let n_dot_l = hit.normal.dot(l).max(0.0);
        let reflected = reflect(hit.position - ray.origin, hit.normal).normalize_or_zero();
        let r_dot_l = l.dot(reflected).max(0.0);

        let diffuse = n_dot_l * albedo * light.color * material.diffuse * light.diffuse;
        let specular =
            r_dot_l.powf(material.shininess) * light.color * material.specular * light.specular;

        (diffuse + specular) * fraction / light.attenuation_at(distance) + ambient
    }

    /// Monte Carlo estimate of light arriving from other surfaces.
    fn indirect_lighting(
        &self,
        hit: &Intersection,
        ray: &Ray,
        depth: Depth,
        rng: &mut dyn RngCore,
    ) -> Color {
        let breadth = self.config.indirect_samples;
        let material = &hit.material;
        if breadth == 0 || (material.diffuse <= 0.0 && material.specular <= 0.0) {
            return Color::ZERO;
        }

        let normal_basis = Onb::from_axis(hit.normal);
        let mirror_basis = Onb::from_axis(reflect(ray.direction, hit.normal));
        let next = depth.next_bounce();

        let mut diffuse_sum = Color::ZERO;
        let mut specular_sum = Color::ZERO;
        for _ in 0..breadth {
            if material.diffuse > 0.0 {
                let direction = sample_lobe(&normal_basis, 1.0, rng);
                diffuse_sum += self.trace_and_shade(hit, direction, next, rng);
            }
            if material.specular > 0.0 {
                let direction = sample_lobe(&mirror_basis, material.shininess, rng);
                specular_sum += self.trace_and_shade(hit, direction, next, rng);
            }
        }

        (diffuse_sum * material.diffuse + specular_sum * material.specular) / breadth as f32
    }

    /// Mirror reflection and Fresnel-split refraction.
    fn specular_transport(
        &self,
        hit: &Intersection,
        ray: &Ray,
        depth: Depth,
        rng: &mut dyn RngCore,
    ) -> Color {
        let material = &hit.material;
        let next = depth.next_reflect();
        let mirror = reflect(ray.direction, hit.normal);
        let mut color = Color::ZERO;

        if material.reflectance > 0.0 {
            color += self.trace_and_shade(hit, mirror, next, rng) * material.reflectance;
        }

        if material.refractance > 0.0 {
            let kr = fresnel(ray.direction, hit.normal, material.refractive_index);
            let mut transmitted = self.trace_and_shade(hit, mirror, next, rng) * kr;
            if let Some(direction) = refract(ray.direction, hit.normal, material.refractive_index)
            {
                transmitted += self.trace_and_shade(hit, direction, next, rng) * (1.0 - kr);
            }
            color += transmitted * material.refractance;
        }

        color
    }

    /// Cast a secondary ray off `hit` and shade whatever it reaches.
    /// A miss contributes nothing.
    fn trace_and_shade(
        &self,
        hit: &Intersection,
        direction: Vec3,
        depth: Depth,
        rng: &mut dyn RngCore,
    ) -> Color {
        let ray = Ray::offset_from(hit.position, hit.normal, direction, self.config.ray_offset);
        match closest_intersection(&ray, self.scene) {
            Some(next) => self.shade_at(&next, &ray, depth, rng),
            None => Color::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{Material, PhotonConfig, Sphere, Triangle};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn surface_hit(material: Material) -> Intersection {
        Intersection {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            distance: 1.0,
            material,
        }
    }

    fn lit_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_light(PointLight::new(Vec3::new(0.0, 2.0, 0.0)).with_coefficients(0.1, 1.0, 1.0));
        scene
    }

    fn blocker() -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(0.0, 1.0, 2.0),
            Material::default(),
        )
    }

    fn camera_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 1.0, -1.0), Vec3::new(0.0, -1.0, 1.0))
    }

    #[test]
    fn test_fully_obscured_light_gives_ambient() {
        let mut scene = lit_scene();
        scene.add_triangle(blocker());

        let map = PhotonMap::empty();
        let config = ShadingConfig::default();
        let shader = Shader::new(&scene, &map, &config);

        let material = Material::new(Color::new(0.5, 0.6, 0.7)).with_phong(0.2, 0.8, 0.5, 4.0);
        let hit = surface_hit(material);
        let light = &scene.lights[0];

        let color = shader.direct_lighting(&hit, &camera_ray(), light);
        assert_eq!(color, material.color * material.ambient * light.ambient);
    }

    #[test]
    fn test_visible_light_adds_to_ambient() {
        let scene = lit_scene();
        let map = PhotonMap::empty();
        let config = ShadingConfig::default();
        let shader = Shader::new(&scene, &map, &config);

        let material = Material::new(Color::new(0.5, 0.6, 0.7)).with_phong(0.2, 0.8, 0.0, 1.0);
        let hit = surface_hit(material);
        let light = &scene.lights[0];

        let color = shader.direct_lighting(&hit, &camera_ray(), light);
        let ambient = material.color * material.ambient * light.ambient;
        // Light straight overhead: N.L = 1, no falloff
        let expected = material.color * 0.8 + ambient;
        assert!((color - expected).length() < 1e-5, "color={color:?}");
    }

    #[test]
    fn test_soft_shadow_fraction() {
        let mut scene = Scene::new();
        // Extent straddles the edge of a blocker covering x < 0
        scene.add_light(
            PointLight::new(Vec3::new(0.05, 2.0, 0.0)).with_extent(Vec3::new(0.2, 0.0, 0.0), Vec3::ZERO),
        );
        scene.add_triangle(Triangle::new(
            Vec3::new(-10.0, 1.0, -10.0),
            Vec3::new(0.0, 1.0, 10.0),
            Vec3::new(0.0, 1.0, -10.0),
            Material::default(),
        ));

        let map = PhotonMap::empty();
        let full = ShadingConfig {
            light_samples: 1,
            ..Default::default()
        };
        let soft = ShadingConfig {
            light_samples: 2,
            ..Default::default()
        };

        let material = Material::new(Color::ONE).with_phong(0.0, 1.0, 0.0, 1.0);
        let hit = surface_hit(material);
        let light = &scene.lights[0];

        // One sample at x = -0.05 is blocked; with 2x2 samples the x = 0.05 column is lit
        let hard = Shader::new(&scene, &map, &full).direct_lighting(&hit, &camera_ray(), light);
        let partial = Shader::new(&scene, &map, &soft).direct_lighting(&hit, &camera_ray(), light);
        assert_eq!(hard, Color::ZERO);
        assert!(partial.x > 0.0);
    }

    #[test]
    fn test_zero_attenuation_means_no_falloff() {
        let map = PhotonMap::empty();
        let config = ShadingConfig::default();
        let material = Material::new(Color::ONE).with_phong(0.1, 0.5, 0.0, 1.0);
        let hit = surface_hit(material);

        let mut plain = lit_scene();
        plain.lights[0].attenuation = Vec3::new(1.0, 0.0, 0.0);
        let mut zeroed = lit_scene();
        zeroed.lights[0].attenuation = Vec3::ZERO;

        let a = Shader::new(&plain, &map, &config).direct_lighting(&hit, &camera_ray(), &plain.lights[0]);
        let b = Shader::new(&zeroed, &map, &config).direct_lighting(&hit, &camera_ray(), &zeroed.lights[0]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_open_sheet_blocks_light_behind_it() {
        // Sheet in y = 0 facing +y, light just below it, viewer grazing from above
        let mut scene = Scene::new();
        let material = Material::new(Color::ONE).with_phong(0.0, 1.0, 1.0, 1.0);
        scene.add_triangle(Triangle::new(
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(10.0, 0.0, -10.0),
            Vec3::new(0.0, 0.0, 20.0),
            material,
        ));
        scene.add_light(PointLight::new(Vec3::new(2.0, -0.2, 0.0)).with_coefficients(0.0, 1.0, 1.0));

        let map = PhotonMap::empty();
        let config = ShadingConfig::default();
        let shader = Shader::new(&scene, &map, &config);

        let ray = Ray::new(Vec3::new(-2.0, 0.2, 0.0), Vec3::new(1.0, -0.1, 0.0));
        let hit = closest_intersection(&ray, &scene).unwrap();
        assert!((hit.normal - Vec3::Y).length() < 1e-5);
        assert!(hit.position.length() < 1e-4);

        // The mirrored view ray lines up with the light, so any leak shows as specular
        let color = shader.direct_lighting(&hit, &ray, &scene.lights[0]);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_nested_mirrors_stop_at_reflect_depth() {
        let mut scene = Scene::new();
        let mirror = Material::new(Color::ONE)
            .with_phong(0.5, 0.0, 0.0, 1.0)
            .with_reflectance(1.0);
        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, mirror));
        scene.add_sphere(Sphere::new(Vec3::ZERO, 0.3, mirror));
        scene.add_light(PointLight::new(Vec3::new(0.0, 0.5, 0.0)).with_coefficients(0.2, 1.0, 1.0));

        let map = PhotonMap::empty();
        let config = ShadingConfig::default();
        let shader = Shader::new(&scene, &map, &config);

        // Bounces along the z axis between the outer and inner shells forever
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.6), Vec3::Z);
        let hit = closest_intersection(&ray, &scene).unwrap();
        assert!((hit.position.z - 1.0).abs() < 1e-5);

        let inner = Ray::offset_from(hit.position, hit.normal, -Vec3::Z, config.ray_offset);
        let next = closest_intersection(&inner, &scene).unwrap();
        assert!((next.position.z - 0.3).abs() < 1e-4);

        let mut rng = StdRng::seed_from_u64(1);
        let color = shader.shade(&hit, &ray, &mut rng);
        assert!(color.is_finite());
        // One ambient term of 0.5 * 0.2 per reflect depth, 0 through 8
        let expected = 9.0 * 0.1;
        assert!((color - Color::splat(expected)).abs().max_element() < 1e-4, "color={color:?}");

        let shallow = ShadingConfig {
            max_reflect_depth: 2,
            ..config
        };
        let color = Shader::new(&scene, &map, &shallow).shade(&hit, &ray, &mut rng);
        assert!((color - Color::splat(0.3)).abs().max_element() < 1e-4, "color={color:?}");
    }

    #[test]
    fn test_caustics_only_at_primary_hit() {
        let scene = lit_scene();
        let photon_config = PhotonConfig::default();
        let map = PhotonMap::from_positions([Vec3::ZERO, Vec3::new(0.01, 0.0, 0.0)], &photon_config);
        let empty = PhotonMap::empty();
        let config = ShadingConfig {
            indirect_samples: 0,
            ..Default::default()
        };

        let hit = surface_hit(Material::new(Color::splat(0.5)));
        let ray = camera_ray();
        let mut rng = StdRng::seed_from_u64(3);

        let with = Shader::new(&scene, &map, &config);
        let without = Shader::new(&scene, &empty, &config);

        let caustic = map.caustic_estimate(hit.position, hit.material.color);
        assert!(caustic.x > 0.0);

        let primary = with.shade(&hit, &ray, &mut rng) - without.shade(&hit, &ray, &mut rng);
        assert!((primary - caustic).length() < 1e-4);

        let bounced = Depth { reflect: 0, bounce: 1 };
        assert_eq!(
            with.shade_at(&hit, &ray, bounced, &mut rng),
            without.shade_at(&hit, &ray, bounced, &mut rng)
        );

        let disabled = ShadingConfig {
            caustics: false,
            ..config
        };
        assert_eq!(
            Shader::new(&scene, &map, &disabled).shade(&hit, &ray, &mut rng),
            without.shade(&hit, &ray, &mut rng)
        );
    }

    #[test]
    fn test_indirect_light_from_nearby_wall() {
        // Floor at y = 0 facing up towards a bright wall above it, light hidden from the floor
        let mut scene = Scene::new();
        let wall = Material::new(Color::ONE).with_phong(1.0, 0.0, 0.0, 1.0);
        scene.add_triangle(Triangle::new(
            Vec3::new(-10.0, 1.0, -10.0),
            Vec3::new(10.0, 1.0, -10.0),
            Vec3::new(0.0, 1.0, 20.0),
            wall,
        ));
        scene.add_light(PointLight::new(Vec3::new(0.0, 5.0, 0.0)).with_coefficients(1.0, 0.0, 0.0));

        let map = PhotonMap::empty();
        let flat = ShadingConfig {
            max_bounce_depth: 0,
            ..Default::default()
        };
        let bounced = ShadingConfig::default();

        let floor = surface_hit(Material::new(Color::ONE).with_phong(0.0, 1.0, 0.0, 1.0));
        let ray = camera_ray();
        let mut rng = StdRng::seed_from_u64(5);

        let direct_only = Shader::new(&scene, &map, &flat).shade(&floor, &ray, &mut rng);
        let with_indirect = Shader::new(&scene, &map, &bounced).shade(&floor, &ray, &mut rng);
        assert_eq!(direct_only, Color::ZERO);
        assert!(with_indirect.x > 0.5, "indirect={with_indirect:?}");
    }

    #[test]
    fn test_glass_transmits_light_behind_it() {
        let mut scene = Scene::new();
        let backdrop = Material::new(Color::ONE).with_phong(1.0, 0.0, 0.0, 1.0);
        scene.add_triangle(Triangle::new(
            Vec3::new(-10.0, -10.0, 5.0),
            Vec3::new(10.0, -10.0, 5.0),
            Vec3::new(0.0, 20.0, 5.0),
            backdrop,
        ));
        let glass = Material::new(Color::ONE)
            .with_phong(0.0, 0.0, 0.0, 1.0)
            .with_refraction(1.0, 1.5);
        scene.add_sphere(Sphere::new(Vec3::ZERO, 0.5, glass));
        scene.add_light(PointLight::new(Vec3::new(0.0, 0.0, -5.0)).with_coefficients(1.0, 0.0, 0.0));

        let map = PhotonMap::empty();
        let config = ShadingConfig {
            indirect_samples: 0,
            ..Default::default()
        };
        let shader = Shader::new(&scene, &map, &config);

        let ray = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        let hit = closest_intersection(&ray, &scene).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        // Mostly transmitted through the ball onto the backdrop (ambient 1.0)
        let color = shader.shade(&hit, &ray, &mut rng);
        assert!(color.x > 0.9 && color.x <= 1.0 + 1e-4, "color={color:?}");
    }
}
