// Copyright @yucwang 2026

use crate::core::integrator::Integrator;
use crate::math::constants::{Float, Vector3f, EPSILON};

/// Bends rays with a central pseudo-force `a = -2M r / |r|^3`.
///
/// This is a Newtonian stand-in for null geodesics, not the Schwarzschild
/// geodesic equation. Only the part of `a` transverse to the ray turns it,
/// so rays keep unit speed.
pub struct NewtonianIntegrator {
    mass: Float,
    step_size: Float,
}

impl NewtonianIntegrator {
    pub fn new(mass: Float, step_size: Float) -> Self {
        Self { mass, step_size }
    }

    pub fn mass(&self) -> Float {
        self.mass
    }

    pub fn acceleration(&self, position: &Vector3f) -> Vector3f {
        let r = position.norm();
        *position * (-2.0 * self.mass / (r * r * r))
    }
}

impl Integrator for NewtonianIntegrator {
    fn advance(&self, position: &mut Vector3f, direction: &mut Vector3f) {
        let ds = self.step_size;
        // The acceleration is evaluated at the post-step position.
        *position += *direction * ds;

        // Near the singularity the horizon test claims the ray this step.
        if position.norm() < EPSILON {
            return;
        }

        let d = *direction;
        let accel = self.acceleration(position);
        let accel_perp = accel - d * accel.dot(&d);
        *direction = (d + accel_perp * ds).normalize();
    }

    fn step_size(&self) -> Float {
        self.step_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ray_batch::RayBatch;
    use crate::math::ray::Ray3f;

    fn march(integrator: &NewtonianIntegrator, mut p: Vector3f, mut d: Vector3f, steps: usize) -> (Vector3f, Vector3f) {
        for _ in 0..steps {
            integrator.advance(&mut p, &mut d);
        }
        (p, d)
    }

    #[test]
    fn test_radial_ray_stays_radial() {
        let integrator = NewtonianIntegrator::new(1.0, 0.1);
        let mut p = Vector3f::new(-20.0, 0.0, 0.0);
        let mut d = Vector3f::new(1.0, 0.0, 0.0);
        let mut steps = 0;
        while p.norm() >= 2.0 {
            integrator.advance(&mut p, &mut d);
            assert_eq!(p.y, 0.0);
            assert_eq!(p.z, 0.0);
            assert_eq!(d, Vector3f::new(1.0, 0.0, 0.0));
            steps += 1;
            assert!(steps < 1000);
        }
        assert!(p.x > -2.0 && p.x < -1.8);
    }

    #[test]
    fn test_direction_stays_unit() {
        let integrator = NewtonianIntegrator::new(1.0, 0.1);
        let mut p = Vector3f::new(-20.0, 5.0, 1.0);
        let mut d = Vector3f::new(1.0, 0.0, 0.0);
        for _ in 0..300 {
            integrator.advance(&mut p, &mut d);
            assert!((d.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_deflection_decreases_with_impact_parameter() {
        let integrator = NewtonianIntegrator::new(1.0, 0.1);
        let angle = |b: Float| {
            let (_, d) = march(&integrator, Vector3f::new(-20.0, b, 0.0), Vector3f::new(1.0, 0.0, 0.0), 500);
            assert!(d.y < 0.0, "ray should bend toward the mass");
            d.x.min(1.0).acos()
        };
        let near = angle(20.0);
        let mid = angle(30.0);
        let far = angle(60.0);
        assert!(near > mid && mid > far && far > 0.0);
        assert!(near < 0.3);
    }

    #[test]
    fn test_acceleration_points_inward() {
        let integrator = NewtonianIntegrator::new(2.0, 0.1);
        let a = integrator.acceleration(&Vector3f::new(0.0, 4.0, 0.0));
        assert!((a - Vector3f::new(0.0, -0.25, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_step_skips_frozen_rays() {
        use crate::core::ray_batch::TerminalState;
        use crate::math::spectrum::RGBSpectrum;

        let integrator = NewtonianIntegrator::new(1.0, 0.1);
        let rays = vec![
            Ray3f::new(Vector3f::new(-20.0, 3.0, 0.0), Vector3f::new(1.0, 0.0, 0.0)),
            Ray3f::new(Vector3f::new(-20.0, -3.0, 0.0), Vector3f::new(1.0, 0.0, 0.0)),
        ];
        let mut batch = RayBatch::from_rays(&rays);
        batch.terminate(1, TerminalState::Sky, RGBSpectrum::black());
        batch.retain_active();
        integrator.step(&mut batch);
        assert!((batch.position(0).x + 19.9).abs() < 1e-5);
        assert_eq!(batch.position(1), Vector3f::new(-20.0, -3.0, 0.0));
        assert_eq!(batch.direction(1), Vector3f::new(1.0, 0.0, 0.0));
    }
}
