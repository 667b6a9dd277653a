// Copyright @yucwang 2026

//! Empirical blackbody-to-RGB fit.
//!
//! Temperatures are rescaled to hundreds of Kelvin and each channel is a
//! piecewise logarithmic / power-law curve, clamped to [0, 255] and then
//! normalized. Below 1000K the input is clamped, so the result is always a
//! valid color.

use super::constants::Float;
use super::spectrum::RGBSpectrum;

pub const MIN_TEMPERATURE: Float = 1000.0;

const KNEE: Float = 66.0;
const BLUE_CUTOFF: Float = 19.0;

pub fn blackbody_rgb(temperature: Float) -> RGBSpectrum {
    let t = temperature.max(MIN_TEMPERATURE) / 100.0;

    let (r, g, b) = if t <= KNEE {
        let g = 99.4708025861 * t.ln() - 161.1195681661;
        let b = if t <= BLUE_CUTOFF {
            0.0
        } else {
            138.5177312231 * (t - 10.0).ln() - 305.0447927307
        };
        (255.0, g, b)
    } else {
        let r = 329.698727446 * (t - 60.0).powf(-0.1332047592);
        let g = 288.1221695283 * (t - 60.0).powf(-0.0755148498);
        (r, g, 255.0)
    };

    RGBSpectrum::new(normalize_channel(r), normalize_channel(g), normalize_channel(b))
}

fn normalize_channel(value: Float) -> Float {
    value.max(0.0).min(255.0) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_in_unit_range() {
        let mut t = 0.0;
        while t < 60000.0 {
            let c = blackbody_rgb(t);
            for idx in 0..3 {
                assert!(c[idx] >= 0.0 && c[idx] <= 1.0, "T={} channel {} = {}", t, idx, c[idx]);
            }
            t += 137.0;
        }
        let c = blackbody_rgb(-5.0);
        assert_eq!(c, blackbody_rgb(MIN_TEMPERATURE));
    }

    #[test]
    fn test_cool_is_reddish() {
        let c = blackbody_rgb(1000.0);
        assert!((c[0] - 1.0).abs() < 1e-6);
        assert!(c[1] < 0.5);
        assert_eq!(c[2], 0.0);
    }

    #[test]
    fn test_hot_is_bluish_white() {
        let c = blackbody_rgb(15000.0);
        assert!((c[2] - 1.0).abs() < 1e-6);
        assert!(c[0] < c[2]);
        assert!(c[0] > 0.6 && c[1] > 0.6);
    }

    #[test]
    fn test_sunlike_is_near_white() {
        let c = blackbody_rgb(6500.0);
        assert!((c[0] - 1.0).abs() < 1e-6);
        assert!(c[1] > 0.9);
        assert!(c[2] > 0.8);
    }
}
