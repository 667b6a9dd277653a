// Copyright @yucwang 2026

use crate::integrators::newtonian::NewtonianIntegrator;
use crate::materials::relativistic::RelativisticShader;
use crate::math::constants::Float;
use crate::sensors::perspective::PerspectiveCamera;
use crate::shapes::accretion_disk::AccretionDisk;
use crate::shapes::event_horizon::EventHorizon;

use std::fmt;

/// Numeric description of one render. Angles are radians except the
/// vertical field of view, which is in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneConstants {
    pub mass: Float,
    pub horizon_radius: Float,
    pub step_size: Float,
    pub max_steps: u32,
    pub disk_inner: Float,
    pub disk_outer: Float,
    pub fov_deg: Float,
    pub yaw: Float,
    pub pitch: Float,
    pub camera_distance: Float,
}

impl Default for SceneConstants {
    fn default() -> Self {
        Self {
            mass: 1.0,
            horizon_radius: 2.0,
            step_size: 0.1,
            max_steps: 500,
            disk_inner: 3.0,
            disk_outer: 15.0,
            fov_deg: 60.0,
            yaw: 0.0,
            pitch: 0.0,
            camera_distance: 20.0,
        }
    }
}

impl SceneConstants {
    pub fn with_schwarzschild_horizon(mut self) -> Self {
        self.horizon_radius = 2.0 * self.mass;
        self
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        let fields = [
            ("mass", self.mass),
            ("horizon_radius", self.horizon_radius),
            ("step_size", self.step_size),
            ("disk_inner", self.disk_inner),
            ("disk_outer", self.disk_outer),
            ("fov_deg", self.fov_deg),
            ("yaw", self.yaw),
            ("pitch", self.pitch),
            ("camera_distance", self.camera_distance),
        ];
        for &(name, value) in fields.iter() {
            if !value.is_finite() {
                return Err(SceneError::NonFinite(name));
            }
        }

        if self.mass <= 0.0 {
            return Err(SceneError::NonPositiveMass(self.mass));
        }
        if self.horizon_radius <= 0.0 {
            return Err(SceneError::NonPositiveHorizon(self.horizon_radius));
        }
        if self.step_size <= 0.0 {
            return Err(SceneError::NonPositiveStepSize(self.step_size));
        }
        if self.max_steps == 0 {
            return Err(SceneError::ZeroMaxSteps);
        }
        // sqrt(1 - Rs / r) must stay real over the whole disk.
        if self.disk_inner <= self.horizon_radius {
            return Err(SceneError::DiskInsideHorizon {
                inner: self.disk_inner,
                horizon: self.horizon_radius,
            });
        }
        // Keplerian speed sqrt(M / r) must stay below 1 for a finite Lorentz factor.
        if self.disk_inner <= self.mass {
            return Err(SceneError::SuperluminalDisk { inner: self.disk_inner, mass: self.mass });
        }
        if self.disk_outer <= self.disk_inner {
            return Err(SceneError::EmptyDisk { inner: self.disk_inner, outer: self.disk_outer });
        }
        if self.fov_deg <= 0.0 || self.fov_deg >= 180.0 {
            return Err(SceneError::InvalidFov(self.fov_deg));
        }
        if self.camera_distance <= self.horizon_radius {
            return Err(SceneError::CameraInsideHorizon {
                distance: self.camera_distance,
                horizon: self.horizon_radius,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    NonFinite(&'static str),
    NonPositiveMass(Float),
    NonPositiveHorizon(Float),
    NonPositiveStepSize(Float),
    ZeroMaxSteps,
    DiskInsideHorizon { inner: Float, horizon: Float },
    SuperluminalDisk { inner: Float, mass: Float },
    EmptyDisk { inner: Float, outer: Float },
    InvalidFov(Float),
    CameraInsideHorizon { distance: Float, horizon: Float },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::NonFinite(name) => write!(f, "{} is not a finite number", name),
            SceneError::NonPositiveMass(m) => write!(f, "mass must be positive, got {}", m),
            SceneError::NonPositiveHorizon(rs) => write!(f, "horizon radius must be positive, got {}", rs),
            SceneError::NonPositiveStepSize(ds) => write!(f, "step size must be positive, got {}", ds),
            SceneError::ZeroMaxSteps => write!(f, "max steps must be at least 1"),
            SceneError::DiskInsideHorizon { inner, horizon } => write!(
                f, "disk inner radius {} must be greater than horizon radius {}", inner, horizon),
            SceneError::SuperluminalDisk { inner, mass } => write!(
                f, "disk inner radius {} must be greater than mass {} for sub-light orbits", inner, mass),
            SceneError::EmptyDisk { inner, outer } => write!(
                f, "disk outer radius {} must be greater than inner radius {}", outer, inner),
            SceneError::InvalidFov(fov) => write!(f, "field of view must be in (0, 180) degrees, got {}", fov),
            SceneError::CameraInsideHorizon { distance, horizon } => write!(
                f, "camera distance {} must be greater than horizon radius {}", distance, horizon),
        }
    }
}

impl std::error::Error for SceneError {}

/// A validated, immutable scene. Everything a render needs is built from it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Scene {
    constants: SceneConstants,
}

impl Scene {
    pub fn new(constants: SceneConstants) -> Result<Self, SceneError> {
        constants.validate()?;
        Ok(Self { constants })
    }

    pub fn constants(&self) -> &SceneConstants {
        &self.constants
    }

    pub fn camera(&self, width: usize, height: usize) -> PerspectiveCamera {
        let c = &self.constants;
        PerspectiveCamera::new(c.yaw, c.pitch, c.fov_deg, c.camera_distance, width, height)
    }

    pub fn integrator(&self) -> NewtonianIntegrator {
        NewtonianIntegrator::new(self.constants.mass, self.constants.step_size)
    }

    pub fn event_horizon(&self) -> EventHorizon {
        EventHorizon::new(self.constants.horizon_radius)
    }

    pub fn accretion_disk(&self) -> AccretionDisk {
        AccretionDisk::new(self.constants.disk_inner, self.constants.disk_outer)
    }

    pub fn shader(&self) -> RelativisticShader {
        RelativisticShader::new(self.constants.mass, self.constants.horizon_radius)
    }
}
