// Copyright @yucwang 2026

use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;

use image::{ImageBuffer, Rgb, RgbImage};

/// Clamp to [0, 1] and truncate to 8 bits.
pub fn quantize_channel(value: Float) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value * 255.0).max(0.0).min(255.0) as u8
}

pub fn to_rgb8(bitmap: &Bitmap) -> RgbImage {
    ImageBuffer::from_fn(bitmap.width() as u32, bitmap.height() as u32, |x, y| {
        let c = bitmap[(x as usize, y as usize)];
        Rgb([quantize_channel(c[0]), quantize_channel(c[1]), quantize_channel(c[2])])
    })
}

/// Write an 8-bit image; the format follows the file extension.
pub fn write_ldr_to_file(bitmap: &Bitmap, file_path: &str) -> std::result::Result<(), String> {
    log::info!("Writing {}x{} image to {}.", bitmap.width(), bitmap.height(), file_path);
    to_rgb8(bitmap)
        .save(file_path)
        .map_err(|e| format!("image write to {} failed: {}", file_path, e))
}
