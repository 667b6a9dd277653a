// Copyright @yucwang 2026

use crate::core::emitter::Emitter;
use crate::core::integrator::Integrator;
use crate::core::ray_batch::{RayBatch, TerminalState};
use crate::core::scene::Scene;
use crate::core::shape::{Crossing, Shape};
use crate::emitters::sky_dome::SkyDome;
use crate::integrators::newtonian::NewtonianIntegrator;
use crate::materials::relativistic::RelativisticShader;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::renderers::renderer::RenderError;
use crate::shapes::accretion_disk::AccretionDisk;
use crate::shapes::event_horizon::EventHorizon;

use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of tracing one ray on its own.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RayRecord {
    pub state: TerminalState,
    pub color: RGBSpectrum,
    pub steps: u32,
    pub position: Vector3f,
    pub direction: Vector3f,
    pub crossing: Option<Crossing>,
}

/// Marches rays through the lensing field until they hit the horizon, hit the
/// disk, or run out of steps and fall back to the sky.
pub struct GeodesicTracer<'a> {
    integrator: NewtonianIntegrator,
    horizon: EventHorizon,
    disk: AccretionDisk,
    shader: RelativisticShader,
    sky: &'a SkyDome,
    max_steps: u32,
    time: Float,
}

impl<'a> GeodesicTracer<'a> {
    pub fn new(scene: &Scene, sky: &'a SkyDome, time: Float) -> Self {
        Self {
            integrator: scene.integrator(),
            horizon: scene.event_horizon(),
            disk: scene.accretion_disk(),
            shader: scene.shader(),
            sky,
            max_steps: scene.constants().max_steps,
            time,
        }
    }

    pub fn shader(&self) -> &RelativisticShader {
        &self.shader
    }

    pub fn time(&self) -> Float {
        self.time
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    // Horizon first: a ray inside the horizon cannot reach the disk.
    pub fn shapes(&self) -> [&dyn Shape; 2] {
        [&self.horizon, &self.disk]
    }

    /// Terminal state and color for a ray that just stepped to `position`.
    pub fn classify(&self, previous_z: Float, position: &Vector3f, direction: &Vector3f)
        -> Option<(Crossing, TerminalState, RGBSpectrum)> {
        for shape in self.shapes().iter() {
            if let Some(crossing) = shape.intersect_step(previous_z, position) {
                let (state, color) = match crossing {
                    Crossing::Horizon => (TerminalState::Horizon, RGBSpectrum::black()),
                    Crossing::Disk { radius } => (
                        TerminalState::Disk,
                        self.shader.shade(position, direction, radius, self.time),
                    ),
                };
                return Some((crossing, state, color));
            }
        }
        None
    }

    /// Run the horizon and disk tests on every active ray after a step.
    pub fn detect(&self, batch: &mut RayBatch) {
        for k in 0..batch.active_count() {
            let idx = batch.active_indices()[k];
            let position = batch.position(idx);
            let direction = batch.direction(idx);
            match self.classify(batch.previous_z(idx), &position, &direction) {
                Some((_, state, color)) => {
                    batch.terminate(idx, state, color);
                }
                None => batch.set_previous_z(idx, position.z),
            }
        }
    }

    /// March a whole batch to completion. Returns the number of single-ray
    /// integration steps performed.
    pub fn trace_batch(&self, batch: &mut RayBatch, cancel: Option<&AtomicBool>) -> Result<u64, RenderError> {
        let mut steps = 0u64;
        for _ in 0..self.max_steps {
            if batch.active_count() == 0 {
                break;
            }
            if cancel.map_or(false, |flag| flag.load(Ordering::Relaxed)) {
                return Err(RenderError::Cancelled);
            }

            self.integrator.step(batch);
            steps += batch.active_count() as u64;
            self.detect(batch);
            batch.retain_active();
        }

        let sky = self.sky;
        batch.finish_with(TerminalState::Sky, |direction| sky.eval_direction(direction));
        Ok(steps)
    }

    pub fn trace_ray(&self, ray: &Ray3f) -> RayRecord {
        self.trace_ray_with(ray, |_, _, _| {})
    }

    /// Trace one ray, reporting `(step, position, direction)` after every step.
    pub fn trace_ray_with<F>(&self, ray: &Ray3f, mut observer: F) -> RayRecord
    where
        F: FnMut(u32, &Vector3f, &Vector3f),
    {
        let mut position = ray.origin();
        let mut direction = ray.dir();
        let mut previous_z = position.z;

        for step in 1..=self.max_steps {
            self.integrator.advance(&mut position, &mut direction);
            observer(step, &position, &direction);
            if let Some((crossing, state, color)) = self.classify(previous_z, &position, &direction) {
                return RayRecord { state, color, steps: step, position, direction, crossing: Some(crossing) };
            }
            previous_z = position.z;
        }

        RayRecord {
            state: TerminalState::Sky,
            color: self.sky.eval_direction(&direction),
            steps: self.max_steps,
            position,
            direction,
            crossing: None,
        }
    }
}
