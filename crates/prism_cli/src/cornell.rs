//! Cornell box demo scene.
//!
//! The classic 555-unit box, scaled into [-1, 1]^3 with x and y flipped so
//! +y points down. A glass ball hangs under the light and a mirror ball sits
//! near the right wall.

use prism_core::{Color, Material, PointLight, Scene, Sphere, Triangle};
use prism_math::Vec3;

/// Side length of the box in source units.
const L: f32 = 555.0;

/// Map a source-space point into the scene's y-down unit cube.
fn to_scene(p: Vec3) -> Vec3 {
    let q = p * (2.0 / L) - Vec3::ONE;
    Vec3::new(-q.x, -q.y, q.z)
}

fn push_quad(scene: &mut Scene, tris: [[Vec3; 3]; 2], material: Material) {
    for [a, b, c] in tris {
        scene.add_triangle(Triangle::new(to_scene(a), to_scene(b), to_scene(c), material));
    }
}

/// Five faces of an axis-aligned block given its eight corners.
///
/// Corners are `[a, b, c, d]` on the floor and `[e, f, g, h]` directly above.
fn push_block(scene: &mut Scene, corners: [Vec3; 8], material: Material) {
    let [a, b, c, d, e, f, g, h] = corners;
    push_quad(scene, [[e, b, a], [e, f, b]], material);
    push_quad(scene, [[f, d, b], [f, h, d]], material);
    push_quad(scene, [[h, c, d], [h, g, c]], material);
    push_quad(scene, [[g, e, c], [e, a, c]], material);
    push_quad(scene, [[g, f, e], [g, h, f]], material);
}

fn block(floor: [(f32, f32); 4], top: f32) -> [Vec3; 8] {
    let lo = floor.map(|(x, z)| Vec3::new(x, 0.0, z));
    let hi = floor.map(|(x, z)| Vec3::new(x, top, z));
    [lo[0], lo[1], lo[2], lo[3], hi[0], hi[1], hi[2], hi[3]]
}

/// Build the demo scene.
pub fn cornell_box() -> Scene {
    let red = Color::new(0.75, 0.15, 0.15);
    let yellow = Color::new(0.75, 0.75, 0.15);
    let green = Color::new(0.15, 0.75, 0.15);
    let cyan = Color::new(0.15, 0.75, 0.75);
    let blue = Color::new(0.15, 0.15, 0.75);
    let purple = Color::new(0.75, 0.15, 0.75);
    let white = Color::new(0.75, 0.75, 0.75);

    let floor = Material::new(green).with_phong(0.2, 0.1, 1.0, 20.0);
    let left_wall = Material::new(purple).with_phong(0.2, 1.0, 0.0, 1.0);
    let right_wall = Material::new(yellow).with_phong(0.0, 0.2, 0.8, 2.0);
    let ceiling = Material::new(cyan).with_phong(0.2, 0.5, 0.5, 20.0);
    let back_wall = Material::new(white).with_phong(0.2, 0.5, 0.5, 8.0);
    let short_block = Material::new(red).with_phong(0.2, 0.0, 1.0, 8.0);
    let tall_block = Material::new(blue).with_phong(0.2, 1.0, 0.0, 20.0);

    let mut scene = Scene::new();

    // Room
    let a = Vec3::new(L, 0.0, 0.0);
    let b = Vec3::new(0.0, 0.0, 0.0);
    let c = Vec3::new(L, 0.0, L);
    let d = Vec3::new(0.0, 0.0, L);
    let e = Vec3::new(L, L, 0.0);
    let f = Vec3::new(0.0, L, 0.0);
    let g = Vec3::new(L, L, L);
    let h = Vec3::new(0.0, L, L);

    push_quad(&mut scene, [[c, b, a], [c, d, b]], floor);
    push_quad(&mut scene, [[a, e, c], [c, e, g]], left_wall);
    push_quad(&mut scene, [[f, b, d], [h, f, d]], right_wall);
    push_quad(&mut scene, [[e, f, g], [f, h, g]], ceiling);
    push_quad(&mut scene, [[g, d, c], [g, h, d]], back_wall);

    push_block(
        &mut scene,
        block([(290.0, 114.0), (130.0, 65.0), (240.0, 272.0), (82.0, 225.0)], 165.0),
        short_block,
    );
    push_block(
        &mut scene,
        block([(423.0, 247.0), (265.0, 296.0), (472.0, 406.0), (314.0, 456.0)], 330.0),
        tall_block,
    );

    scene.add_sphere(Sphere::new(
        Vec3::new(0.0, 0.0, -0.7),
        0.2,
        Material::new(Color::ONE)
            .with_phong(0.01, 0.0, 0.0, 8.0)
            .with_refraction(1.0, 1.5),
    ));
    scene.add_sphere(Sphere::new(
        Vec3::new(0.4, -0.2, 0.0),
        0.15,
        Material::new(Color::ONE)
            .with_phong(0.1, 0.1, 1.0, 10.0)
            .with_reflectance(0.9),
    ));

    let light_size = 0.1;
    scene.add_light(
        PointLight::new(Vec3::new(0.0, -0.5, -0.7))
            .with_coefficients(0.1, 14.0, 14.0)
            .with_attenuation(Vec3::new(0.0, 0.0, 12.5))
            .with_extent(Vec3::new(light_size, 0.0, 0.0), Vec3::new(0.0, 0.0, light_size)),
    );

    scene
}
