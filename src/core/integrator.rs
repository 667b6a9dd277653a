// Copyright @yucwang 2026

use crate::core::ray_batch::RayBatch;
use crate::math::constants::{Float, Vector3f};

pub trait Integrator: Sync {
    /// Advance a single ray by one step, keeping `direction` unit length.
    fn advance(&self, position: &mut Vector3f, direction: &mut Vector3f);
    fn step_size(&self) -> Float;

    fn step(&self, batch: &mut RayBatch) {
        batch.for_each_active(|position, direction| self.advance(position, direction));
    }
}
