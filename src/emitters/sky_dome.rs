// Copyright @yucwang 2026

use crate::core::emitter::Emitter;
use crate::core::rng::LcgRng;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector3f, INV_PI, INV_TWO_PI, TWO_PI};
use crate::math::spectrum::RGBSpectrum;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SkyDomeSettings {
    pub width: usize,
    pub height: usize,
    pub stars: usize,
    pub seed: u64,
}

impl Default for SkyDomeSettings {
    fn default() -> Self {
        Self { width: 720, height: 360, stars: 2000, seed: 0 }
    }
}

/// Equirectangular starfield: black texels with a scattering of white stars.
///
/// Columns span azimuth `[0, 2pi)` from +x toward +y, rows span polar angle
/// `[0, pi]` from +z.
pub struct SkyDome {
    texture: Bitmap,
    stars: usize,
}

impl SkyDome {
    /// Stars land on uniformly random texels; duplicates simply overwrite.
    /// Zero dimensions are raised to one texel.
    pub fn new(settings: &SkyDomeSettings) -> Self {
        let width = settings.width.max(1);
        let height = settings.height.max(1);
        let mut texture = Bitmap::new(width, height);
        let mut rng = LcgRng::new(settings.seed);
        for _ in 0..settings.stars {
            let row = rng.next_below(height);
            let col = rng.next_below(width);
            texture[(col, row)] = RGBSpectrum::white();
        }
        log::debug!("sky dome {}x{} with {} stars (seed {})", width, height, settings.stars, settings.seed);
        Self { texture, stars: settings.stars }
    }

    pub fn from_bitmap(texture: Bitmap) -> Self {
        let stars = texture.pixels().iter().filter(|c| !c.is_black()).count();
        Self { texture, stars }
    }

    pub fn width(&self) -> usize {
        self.texture.width()
    }

    pub fn height(&self) -> usize {
        self.texture.height()
    }

    pub fn texture(&self) -> &Bitmap {
        &self.texture
    }

    /// Texel (column, row) seen along `direction`. Always in bounds, even for
    /// non-unit or non-finite input.
    pub fn texel_from_direction(&self, direction: &Vector3f) -> (usize, usize) {
        let mut phi = direction.y.atan2(direction.x);
        if phi < 0.0 {
            phi += TWO_PI;
        }
        let theta = direction.z.clamp(-1.0, 1.0).acos();

        let width = self.texture.width();
        let height = self.texture.height();
        // Float to usize casts saturate, and NaN maps to 0.
        let col = ((phi * INV_TWO_PI * width as Float) as usize) % width;
        let row = ((theta * INV_PI * height as Float) as usize) % height;
        (col, row)
    }
}

impl Emitter for SkyDome {
    fn eval_direction(&self, direction: &Vector3f) -> RGBSpectrum {
        self.texture[self.texel_from_direction(direction)]
    }

    fn describe(&self) -> String {
        format!("SkyDome\n  resolution: {}x{}\n  stars: {}", self.width(), self.height(), self.stars)
    }
}
