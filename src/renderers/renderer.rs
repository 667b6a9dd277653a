// Copyright @yucwang 2021

use crate::core::ray_batch::TerminalState;
use crate::core::scene::Scene;
use crate::emitters::sky_dome::SkyDome;
use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;

use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RenderError {
    Cancelled,
    Incomplete { missing: usize },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Cancelled => write!(f, "render cancelled"),
            RenderError::Incomplete { missing } => write!(f, "render finished with {} unresolved pixels", missing),
        }
    }
}

impl std::error::Error for RenderError {}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub disk_hits: usize,
    pub horizon_hits: usize,
    pub sky_hits: usize,
    pub integration_steps: u64,
}

impl RenderStats {
    pub fn record(&mut self, state: TerminalState) {
        match state {
            TerminalState::Disk => self.disk_hits += 1,
            TerminalState::Horizon => self.horizon_hits += 1,
            TerminalState::Sky => self.sky_hits += 1,
        }
    }

    pub fn pixels(&self) -> usize {
        self.disk_hits + self.horizon_hits + self.sky_hits
    }
}

/// A rendered image plus how every pixel's ray ended.
#[derive(Debug, Clone)]
pub struct Frame {
    bitmap: Bitmap,
    states: Vec<TerminalState>,
    stats: RenderStats,
}

impl Frame {
    pub fn new(bitmap: Bitmap, states: Vec<TerminalState>, stats: RenderStats) -> Self {
        Self { bitmap, states, stats }
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn into_bitmap(self) -> Bitmap {
        self.bitmap
    }

    pub fn width(&self) -> usize {
        self.bitmap.width()
    }

    pub fn height(&self) -> usize {
        self.bitmap.height()
    }

    pub fn color(&self, x: usize, y: usize) -> RGBSpectrum {
        self.bitmap[(x, y)]
    }

    pub fn state(&self, x: usize, y: usize) -> TerminalState {
        self.states[x + self.bitmap.width() * y]
    }

    pub fn states(&self) -> &[TerminalState] {
        &self.states
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }
}

pub trait Renderer {
    fn render(&self, scene: &Scene, sky: &SkyDome, width: usize, height: usize, time: Float)
        -> Result<Frame, RenderError>;
}
