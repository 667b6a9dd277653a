// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};

/// What a ray ran into during its last step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Crossing {
    Horizon,
    Disk { radius: Float },
}

pub trait Shape: Sync {
    /// Test the post-step `position` against this shape; `previous_z` is the
    /// ray's z coordinate before the step.
    fn intersect_step(&self, previous_z: Float, position: &Vector3f) -> Option<Crossing>;

    fn describe(&self) -> String {
        String::from("Shape")
    }
}
