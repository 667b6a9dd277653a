/* Copyright 2020 @TwoCookingMice */

use crate::math::bitmap::Bitmap;

use exr::prelude::*;

// Write linear, unclamped radiance to an OpenEXR file.
pub fn write_exr_to_file(bitmap: &Bitmap, file_path: &str) -> std::result::Result<(), String> {
    log::info!("Starting writing openexr images: {}.", file_path);

    let width = bitmap.width();
    let image = bitmap.raw_copy();
    write_rgb_file(file_path, bitmap.width(), bitmap.height(), |x, y| {
        (
            image[y * width + x].0,
            image[y * width + x].1,
            image[y * width + x].2
        )
    }).map_err(|e| format!("EXR write to {} failed: {}", file_path, e))?;

    log::info!("EXR written to: {}.", file_path);
    Ok(())
}
