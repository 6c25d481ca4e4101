//! Edge-strength extraction from the smoothed canonical frame.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::gradients::{horizontal_scharr, vertical_scharr};

/// Scalar edge-strength map, same dimensions as the input frame.
pub type GradientMap = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Compute the Scharr gradient magnitude of a smoothed luma frame.
///
/// Directional derivatives are taken along both axes and combined into
/// `sqrt(gx^2 + gy^2)` per pixel. Pure; the map is non-negative
/// everywhere and zero on constant inputs.
pub fn gradient_magnitude(gray: &GrayImage) -> GradientMap {
    let gx = horizontal_scharr(gray);
    let gy = vertical_scharr(gray);

    let (w, h) = gray.dimensions();
    let mut magnitude = GradientMap::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let dx = gx.get_pixel(x, y)[0] as f32;
            let dy = gy.get_pixel(x, y)[0] as f32;
            magnitude.put_pixel(x, y, Luma([(dx * dx + dy * dy).sqrt()]));
        }
    }
    magnitude
}
