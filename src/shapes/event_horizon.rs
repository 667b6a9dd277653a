// Copyright @yucwang 2026

use crate::core::shape::{Crossing, Shape};
use crate::math::constants::{Float, Vector3f};

pub struct EventHorizon {
    radius: Float,
}

impl EventHorizon {
    pub fn new(radius: Float) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> Float {
        self.radius
    }

    pub fn contains(&self, position: &Vector3f) -> bool {
        position.norm() < self.radius
    }
}

impl Shape for EventHorizon {
    fn intersect_step(&self, _previous_z: Float, position: &Vector3f) -> Option<Crossing> {
        if self.contains(position) {
            Some(Crossing::Horizon)
        } else {
            None
        }
    }

    fn describe(&self) -> String {
        format!("EventHorizon\n  radius: {}", self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_and_outside() {
        let horizon = EventHorizon::new(2.0);
        assert_eq!(horizon.intersect_step(1.0, &Vector3f::new(1.0, 1.0, 1.0)), Some(Crossing::Horizon));
        assert_eq!(horizon.intersect_step(1.0, &Vector3f::new(2.0, 0.0, 0.0)), None);
        assert_eq!(horizon.intersect_step(-1.0, &Vector3f::new(0.0, 0.0, 0.0)), Some(Crossing::Horizon));
    }
}
