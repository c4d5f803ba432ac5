//! Pinhole camera for primary ray generation.

use prism_core::CameraConfig;
use prism_math::{Mat3, Ray, Vec3};

/// Pinhole camera looking down its local +Z axis.
///
/// Image-plane coordinates run from -1 to 1 across the width; the height is
/// scaled by the aspect ratio so pixels stay square. Screen y grows downwards,
/// matching the y-down scene convention.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,
    /// Sub-samples per pixel side
    pub anti_aliasing: u32,

    position: Vec3,
    focal_length: f32,
    rotation: Mat3,

    // Cached from the resolution
    aspect: f32,
    sub_dx: f32,
    sub_dy: f32,
}

impl Camera {
    /// Camera at the origin with no rotation.
    pub fn new(image_width: u32, image_height: u32) -> Self {
        let mut camera = Self {
            image_width: image_width.max(1),
            image_height: image_height.max(1),
            anti_aliasing: 1,
            position: Vec3::ZERO,
            focal_length: 1.0,
            rotation: Mat3::IDENTITY,
            aspect: 1.0,
            sub_dx: 0.0,
            sub_dy: 0.0,
        };
        camera.update_steps();
        camera
    }

    /// Build a camera from configuration plus output resolution.
    pub fn from_config(config: &CameraConfig, width: u32, height: u32, anti_aliasing: u32) -> Self {
        Self::new(width, height)
            .with_position(config.position)
            .with_rotation(config.yaw, config.pitch, config.roll)
            .with_focal_length(config.focal_length)
            .with_anti_aliasing(anti_aliasing)
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the orientation from angles in radians.
    pub fn with_rotation(mut self, yaw: f32, pitch: f32, roll: f32) -> Self {
        self.rotation = rotation_matrix(yaw, pitch, roll);
        self
    }

    pub fn with_focal_length(mut self, focal_length: f32) -> Self {
        self.focal_length = focal_length;
        self
    }

    pub fn with_anti_aliasing(mut self, anti_aliasing: u32) -> Self {
        self.anti_aliasing = anti_aliasing.max(1);
        self.update_steps();
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Number of primary rays per pixel.
    pub fn samples_per_pixel(&self) -> u32 {
        self.anti_aliasing * self.anti_aliasing
    }

    fn update_steps(&mut self) {
        let width = self.image_width as f32;
        let height = self.image_height as f32;
        let aa = self.anti_aliasing as f32;

        self.aspect = height / width;
        self.sub_dx = 2.0 / width / aa;
        self.sub_dy = 2.0 / height / aa * self.aspect;
    }

    /// Primary ray through pixel `(x, y)` for anti-aliasing sub-sample
    /// `(sub_x, sub_y)`.
    pub fn get_ray(&self, x: u32, y: u32, sub_x: u32, sub_y: u32) -> Ray {
        let x_dir = 2.0 * x as f32 / self.image_width as f32 - 1.0;
        let y_dir = (2.0 * y as f32 / self.image_height as f32 - 1.0) * self.aspect;

        let local = Vec3::new(
            x_dir + sub_x as f32 * self.sub_dx,
            y_dir + sub_y as f32 * self.sub_dy,
            self.focal_length,
        );
        Ray::new(self.position, self.rotation * local)
    }
}

/// Combined pitch * yaw * roll rotation.
fn rotation_matrix(yaw: f32, pitch: f32, roll: f32) -> Mat3 {
    let (sp, cp) = pitch.sin_cos();
    let (sy, cy) = yaw.sin_cos();
    let (sr, cr) = roll.sin_cos();

    let pitch = Mat3::from_cols(
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, cp, -sp),
        Vec3::new(0.0, sp, cp),
    );
    let yaw = Mat3::from_cols(
        Vec3::new(cy, 0.0, sy),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(-sy, 0.0, cy),
    );
    let roll = Mat3::from_cols(
        Vec3::new(cr, -sr, 0.0),
        Vec3::new(sr, cr, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
    );

    pitch * yaw * roll
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_centre_ray_looks_down_z() {
        let camera = Camera::new(640, 480).with_position(Vec3::new(0.0, 0.0, -1.8));
        let ray = camera.get_ray(320, 240, 0, 0);

        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, -1.8));
        assert!((ray.direction - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_corner_rays_keep_pixels_square() {
        let camera = Camera::new(640, 480);

        let top_left = camera.get_ray(0, 0, 0, 0).direction;
        assert!((top_left - Vec3::new(-1.0, -0.75, 1.0)).length() < 1e-6);

        // Right edge of the last pixel column is one pixel short of +1
        let last = camera.get_ray(639, 479, 0, 0).direction;
        assert!((last.x - (1.0 - 2.0 / 640.0)).abs() < 1e-6);
        assert!((last.y - (1.0 - 2.0 / 480.0) * 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_sub_samples_stay_inside_pixel() {
        let camera = Camera::new(100, 100).with_anti_aliasing(4);
        assert_eq!(camera.samples_per_pixel(), 16);

        let base = camera.get_ray(10, 20, 0, 0).direction;
        let far = camera.get_ray(10, 20, 3, 3).direction;
        let next_pixel = camera.get_ray(11, 21, 0, 0).direction;

        assert!(far.x > base.x && far.x < next_pixel.x);
        assert!(far.y > base.y && far.y < next_pixel.y);
    }

    #[test]
    fn test_yaw_turns_view() {
        let camera = Camera::new(2, 2).with_rotation(FRAC_PI_2, 0.0, 0.0);
        let ray = camera.get_ray(1, 1, 0, 0);
        assert!((ray.direction - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_from_config() {
        let config = CameraConfig {
            focal_length: 2.0,
            ..Default::default()
        };
        let camera = Camera::from_config(&config, 64, 48, 2);

        assert_eq!(camera.position(), config.position);
        assert_eq!(camera.samples_per_pixel(), 4);
        assert!((camera.get_ray(32, 24, 0, 0).direction - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-6);
    }
}
