// Copyright @yucwang 2026

use crate::math::constants::Vector3f;
use crate::math::spectrum::RGBSpectrum;

pub trait Emitter: Send + Sync {
    fn eval_direction(&self, _direction: &Vector3f) -> RGBSpectrum {
        RGBSpectrum::default()
    }

    fn describe(&self) -> String {
        String::from("Emitter")
    }
}
