// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// How a ray stopped being marched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TerminalState {
    Disk,
    Horizon,
    Sky,
}

/// Structure-of-arrays ray state plus the indices still being marched.
///
/// A ray whose `state` is `Some` is frozen: none of its fields change again.
pub struct RayBatch {
    positions: Vec<Vector3f>,
    directions: Vec<Vector3f>,
    colors: Vec<RGBSpectrum>,
    previous_z: Vec<Float>,
    states: Vec<Option<TerminalState>>,
    active: Vec<usize>,
}

impl RayBatch {
    pub fn from_rays(rays: &[Ray3f]) -> Self {
        let n = rays.len();
        Self {
            positions: rays.iter().map(|r| r.origin()).collect(),
            directions: rays.iter().map(|r| r.dir()).collect(),
            colors: vec![RGBSpectrum::black(); n],
            previous_z: rays.iter().map(|r| r.origin().z).collect(),
            states: vec![None; n],
            active: (0..n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn active_indices(&self) -> &[usize] {
        &self.active
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.states[index].is_none()
    }

    pub fn position(&self, index: usize) -> Vector3f {
        self.positions[index]
    }

    pub fn direction(&self, index: usize) -> Vector3f {
        self.directions[index]
    }

    pub fn color(&self, index: usize) -> RGBSpectrum {
        self.colors[index]
    }

    pub fn state(&self, index: usize) -> Option<TerminalState> {
        self.states[index]
    }

    pub fn previous_z(&self, index: usize) -> Float {
        self.previous_z[index]
    }

    pub fn colors(&self) -> &[RGBSpectrum] {
        &self.colors
    }

    pub fn states(&self) -> &[Option<TerminalState>] {
        &self.states
    }

    /// Visit position and direction of every active ray.
    pub fn for_each_active<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Vector3f, &mut Vector3f),
    {
        for &idx in &self.active {
            f(&mut self.positions[idx], &mut self.directions[idx]);
        }
    }

    pub fn set_previous_z(&mut self, index: usize, z: Float) {
        if self.is_active(index) {
            self.previous_z[index] = z;
        }
    }

    /// Freeze a ray with its final color. Returns false if it was already frozen.
    pub fn terminate(&mut self, index: usize, state: TerminalState, color: RGBSpectrum) -> bool {
        if !self.is_active(index) {
            return false;
        }
        self.states[index] = Some(state);
        self.colors[index] = color;
        true
    }

    /// Drop frozen rays from the active index set.
    pub fn retain_active(&mut self) {
        let states = &self.states;
        self.active.retain(|&idx| states[idx].is_none());
    }

    /// Freeze every remaining active ray, colored from its final direction.
    pub fn finish_with<F>(&mut self, state: TerminalState, mut color_of: F)
    where
        F: FnMut(&Vector3f) -> RGBSpectrum,
    {
        for &idx in &self.active {
            if self.states[idx].is_none() {
                self.colors[idx] = color_of(&self.directions[idx]);
                self.states[idx] = Some(state);
            }
        }
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_rays() -> RayBatch {
        let rays = vec![
            Ray3f::new(Vector3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, 0.0, 2.0)),
            Ray3f::new(Vector3f::new(5.0, 0.0, 1.0), Vector3f::new(-1.0, 0.0, 0.0)),
        ];
        RayBatch::from_rays(&rays)
    }

    #[test]
    fn test_initial_state() {
        let batch = two_rays();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.active_indices(), &[0, 1]);
        assert!(batch.color(0).is_black());
        assert_eq!(batch.previous_z(0), -1.0);
        assert_eq!(batch.previous_z(1), 1.0);
        assert!((batch.direction(0).norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_terminated_ray_is_frozen() {
        let mut batch = two_rays();
        assert!(batch.terminate(0, TerminalState::Disk, RGBSpectrum::new(0.5, 0.2, 0.1)));
        assert!(!batch.terminate(0, TerminalState::Horizon, RGBSpectrum::black()));
        batch.set_previous_z(0, 3.0);
        batch.retain_active();
        assert_eq!(batch.active_indices(), &[1]);

        let before = batch.position(0);
        batch.for_each_active(|p, _d| *p += Vector3f::new(1.0, 1.0, 1.0));
        assert_eq!(batch.position(0), before);
        assert_eq!(batch.position(1), Vector3f::new(6.0, 1.0, 2.0));

        assert_eq!(batch.state(0), Some(TerminalState::Disk));
        assert_eq!(batch.color(0), RGBSpectrum::new(0.5, 0.2, 0.1));
        assert_eq!(batch.previous_z(0), -1.0);
    }

    #[test]
    fn test_finish_with_resolves_remaining() {
        let mut batch = two_rays();
        batch.terminate(1, TerminalState::Horizon, RGBSpectrum::black());
        batch.finish_with(TerminalState::Sky, |_| RGBSpectrum::white());
        assert_eq!(batch.active_count(), 0);
        assert_eq!(batch.state(0), Some(TerminalState::Sky));
        assert_eq!(batch.color(0), RGBSpectrum::white());
        assert_eq!(batch.state(1), Some(TerminalState::Horizon));
        assert!(batch.color(1).is_black());
        assert!(batch.states().iter().all(|s| s.is_some()));
    }
}
