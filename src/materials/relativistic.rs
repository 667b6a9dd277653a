// Copyright @yucwang 2026

use crate::math::blackbody::blackbody_rgb;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Number of bright/dark band pairs around the disk.
pub const BAND_FREQUENCY: Float = 20.0;
/// Emission temperature at `r = 3M`.
pub const REFERENCE_TEMPERATURE: Float = 5000.0;
const TEMPERATURE_EXPONENT: Float = -0.75;

/// Intermediate quantities of one disk sample, kept for diagnostics.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DiskEmission {
    pub phi: Float,
    pub angular_velocity: Float,
    pub texture: Float,
    pub beta: Float,
    pub cos_theta: Float,
    pub gamma: Float,
    pub doppler: Float,
    pub gravitational: Float,
    pub delta: Float,
    pub emitted_temperature: Float,
    pub observed_temperature: Float,
}

/// Colors disk hits from Keplerian rotation, Doppler shift, gravitational
/// redshift and beaming. Output is not clamped.
pub struct RelativisticShader {
    mass: Float,
    horizon_radius: Float,
}

impl RelativisticShader {
    pub fn new(mass: Float, horizon_radius: Float) -> Self {
        Self { mass, horizon_radius }
    }

    /// `radius` must exceed both the horizon radius and the mass; scene
    /// validation guarantees this for every radius inside the disk.
    pub fn emission(&self, position: &Vector3f, direction: &Vector3f, radius: Float, time: Float) -> DiskEmission {
        let m = self.mass;
        let phi = position.y.atan2(position.x);

        let angular_velocity = (m / (radius * radius * radius)).sqrt();
        let texture = 0.5 + 0.5 * (BAND_FREQUENCY * (phi - angular_velocity * time)).sin();

        let beta = (m / radius).sqrt();
        let velocity = Vector3f::new(-phi.sin(), phi.cos(), 0.0) * beta;
        let cos_theta = velocity.dot(&(-*direction)) / beta;
        let gamma = 1.0 / (1.0 - beta * beta).sqrt();

        let z_doppler = 1.0 / (gamma * (1.0 - beta * cos_theta)) - 1.0;
        let doppler = 1.0 / (1.0 + z_doppler);
        let gravitational = (1.0 - self.horizon_radius / radius).sqrt();
        let delta = doppler * gravitational;

        let emitted_temperature = REFERENCE_TEMPERATURE * (radius / (3.0 * m)).powf(TEMPERATURE_EXPONENT);

        DiskEmission {
            phi,
            angular_velocity,
            texture,
            beta,
            cos_theta,
            gamma,
            doppler,
            gravitational,
            delta,
            emitted_temperature,
            observed_temperature: emitted_temperature * delta,
        }
    }

    pub fn shade(&self, position: &Vector3f, direction: &Vector3f, radius: Float, time: Float) -> RGBSpectrum {
        let e = self.emission(position, direction, radius, time);
        let beaming = e.delta * e.delta * e.delta;
        blackbody_rgb(e.observed_temperature) * (e.texture * beaming)
    }
}
