// Copyright @yucwang 2026

use crate::math::ray::Ray3f;

pub trait Sensor: Sync {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn pixel_ray(&self, x: usize, y: usize) -> Ray3f;

    /// Rays for the whole film, row-major with row 0 at the top.
    fn generate_rays(&self) -> Vec<Ray3f> {
        let mut rays = Vec::with_capacity(self.width() * self.height());
        for y in 0..self.height() {
            for x in 0..self.width() {
                rays.push(self.pixel_ray(x, y));
            }
        }
        rays
    }

    fn describe(&self) -> String {
        String::from("Sensor")
    }
}
