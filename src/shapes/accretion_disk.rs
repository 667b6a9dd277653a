// Copyright @yucwang 2026

use crate::core::shape::{Crossing, Shape};
use crate::math::constants::{Float, Vector3f};

/// Thin annulus in the z = 0 plane.
///
/// A ray hits when its z coordinate changes sign strictly during a step and
/// the post-step cylindrical radius lies strictly inside `(inner, outer)`.
/// The radius is not interpolated back to the plane, and a step that lands
/// exactly on z = 0 does not count as a crossing.
pub struct AccretionDisk {
    inner: Float,
    outer: Float,
}

impl AccretionDisk {
    pub fn new(inner: Float, outer: Float) -> Self {
        Self { inner, outer }
    }

    pub fn inner_radius(&self) -> Float {
        self.inner
    }

    pub fn outer_radius(&self) -> Float {
        self.outer
    }

    pub fn crosses_plane(previous_z: Float, z: Float) -> bool {
        previous_z * z < 0.0
    }

    pub fn contains_radius(&self, radius: Float) -> bool {
        self.inner < radius && radius < self.outer
    }
}

impl Shape for AccretionDisk {
    fn intersect_step(&self, previous_z: Float, position: &Vector3f) -> Option<Crossing> {
        if !Self::crosses_plane(previous_z, position.z) {
            return None;
        }
        let radius = (position.x * position.x + position.y * position.y).sqrt();
        if self.contains_radius(radius) {
            Some(Crossing::Disk { radius })
        } else {
            None
        }
    }

    fn describe(&self) -> String {
        format!("AccretionDisk\n  inner: {}\n  outer: {}", self.inner, self.outer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_inside_annulus() {
        let disk = AccretionDisk::new(3.0, 15.0);
        match disk.intersect_step(0.05, &Vector3f::new(6.0, 8.0, -0.05)) {
            Some(Crossing::Disk { radius }) => assert!((radius - 10.0).abs() < 1e-5),
            other => panic!("expected disk hit, got {:?}", other),
        }
    }

    #[test]
    fn test_crossing_outside_annulus() {
        let disk = AccretionDisk::new(3.0, 15.0);
        assert_eq!(disk.intersect_step(0.05, &Vector3f::new(20.0, 0.0, -0.05)), None);
        assert_eq!(disk.intersect_step(-0.05, &Vector3f::new(1.0, 1.0, 0.05)), None);
        assert_eq!(disk.intersect_step(0.05, &Vector3f::new(15.0, 0.0, -0.05)), None);
    }

    #[test]
    fn test_no_sign_change_no_hit() {
        let disk = AccretionDisk::new(3.0, 15.0);
        assert_eq!(disk.intersect_step(0.5, &Vector3f::new(5.0, 0.0, 0.1)), None);
        // Landing exactly on the plane is not a crossing.
        assert_eq!(disk.intersect_step(0.5, &Vector3f::new(5.0, 0.0, 0.0)), None);
        assert_eq!(disk.intersect_step(0.0, &Vector3f::new(5.0, 0.0, -0.1)), None);
    }
}
