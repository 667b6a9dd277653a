// Copyright @yucwang 2026

use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector3f, PI};
use crate::math::ray::Ray3f;

const RIGHT_FALLBACK_EPSILON: Float = 1e-6;

/// Pinhole camera orbiting the origin, aimed by yaw and pitch.
///
/// Film offsets span `[-h * aspect, h * aspect] x [-h, h]` with `h = tan(fov / 2)`,
/// edges inclusive. Row 0 sits at `v = +h`.
pub struct PerspectiveCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    aspect: Float,
    width: usize,
    height: usize,
}

impl PerspectiveCamera {
    pub fn new(yaw: Float,
               pitch: Float,
               fov_y_degrees: Float,
               distance: Float,
               width: usize,
               height: usize) -> Self {
        let forward = Vector3f::new(pitch.cos() * yaw.cos(),
                                    pitch.cos() * yaw.sin(),
                                    pitch.sin());
        let world_up = Vector3f::new(0.0, 0.0, 1.0);
        let right = forward.cross(&world_up);
        let right = if right.norm() > RIGHT_FALLBACK_EPSILON {
            right.normalize()
        } else {
            log::warn!("camera looks along the world up axis, using fixed right vector");
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let up = right.cross(&forward);

        let aspect = if height > 0 { width as Float / height as Float } else { 1.0 };

        Self {
            origin: -forward * distance,
            forward,
            right,
            up,
            tan_half_fov_y: (fov_y_degrees * PI / 360.0).tan(),
            aspect,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn forward(&self) -> Vector3f {
        self.forward
    }

    pub fn right(&self) -> Vector3f {
        self.right
    }

    pub fn up(&self) -> Vector3f {
        self.up
    }

    /// Film-plane offset of pixel (x, y).
    pub fn film_offset(&self, x: usize, y: usize) -> (Float, Float) {
        let half_w = self.tan_half_fov_y * self.aspect;
        let half_h = self.tan_half_fov_y;
        (spread(x, self.width, -half_w, half_w), spread(y, self.height, half_h, -half_h))
    }
}

// Evenly spaced samples from `start` to `stop` inclusive; a single sample sits at the midpoint.
fn spread(index: usize, count: usize, start: Float, stop: Float) -> Float {
    if count < 2 {
        return 0.5 * (start + stop);
    }
    let step = (stop - start) / (count - 1) as Float;
    start + index as Float * step
}

impl Sensor for PerspectiveCamera {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel_ray(&self, x: usize, y: usize) -> Ray3f {
        let (u, v) = self.film_offset(x, y);
        let dir = self.right * u + self.up * v + self.forward;
        Ray3f::new(self.origin, dir)
    }

    fn describe(&self) -> String {
        format!("PerspectiveCamera\n  origin: {:?}\n  forward: {:?}\n  tan_half_fov_y: {}\n  aspect: {}\n  film: {}x{}",
                self.origin, self.forward, self.tan_half_fov_y, self.aspect, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_camera_center_ray() {
        let cam = PerspectiveCamera::new(0.0, 0.0, 60.0, 20.0, 5, 3);
        let ray = cam.pixel_ray(2, 1);
        let dir = ray.dir();

        assert!((dir.x - 1.0).abs() < 1e-6);
        assert!(dir.y.abs() < 1e-6);
        assert!(dir.z.abs() < 1e-6);
        assert!((ray.origin() - Vector3f::new(-20.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_film_corners_span_field_of_view() {
        let cam = PerspectiveCamera::new(0.0, 0.0, 90.0, 20.0, 4, 4);
        let (u0, v0) = cam.film_offset(0, 0);
        let (u1, v1) = cam.film_offset(3, 3);
        assert!((u0 + 1.0).abs() < 1e-5);
        assert!((v0 - 1.0).abs() < 1e-5);
        assert!((u1 - 1.0).abs() < 1e-5);
        assert!((v1 + 1.0).abs() < 1e-5);

        // Top row looks up (+z), left column looks toward +y.
        let top_left = cam.pixel_ray(0, 0).dir();
        assert!(top_left.z > 0.0);
        assert!(top_left.y > 0.0);
    }

    #[test]
    fn test_all_directions_unit_length() {
        let cam = PerspectiveCamera::new(0.7, -0.3, 45.0, 20.0, 7, 5);
        let rays = cam.generate_rays();
        assert_eq!(rays.len(), 35);
        for ray in rays.iter() {
            assert!((ray.dir().norm() - 1.0).abs() < 1e-5);
            assert_eq!(ray.origin(), cam.origin());
        }
        assert!((cam.origin().norm() - 20.0).abs() < 1e-4);
        assert!(cam.forward().dot(&cam.right()).abs() < 1e-5);
        assert!(cam.forward().dot(&cam.up()).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_basis_uses_fallback_right() {
        let cam = PerspectiveCamera::new(0.0, PI / 2.0, 60.0, 20.0, 3, 3);
        assert_eq!(cam.right(), Vector3f::new(1.0, 0.0, 0.0));
        for ray in cam.generate_rays() {
            let d = ray.dir();
            assert!(d.x.is_finite() && d.y.is_finite() && d.z.is_finite());
            assert!((d.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_single_pixel_film() {
        let cam = PerspectiveCamera::new(0.0, 0.0, 60.0, 20.0, 1, 1);
        assert_eq!(cam.film_offset(0, 0), (0.0, 0.0));
    }
}
