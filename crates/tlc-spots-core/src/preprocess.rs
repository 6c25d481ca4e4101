//! Canonical-frame preprocessing: crop, resize, luma conversion, smoothing.
//!
//! All detection runs in a fixed-size canonical frame so that thresholds
//! and area cutoffs keep their meaning across source resolutions. The
//! preprocessor also owns the coordinate transform that maps user-supplied
//! baseline/topline references from original-image pixel space into the
//! canonical frame.

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use serde::{Deserialize, Serialize};

use crate::band::{Band, BandError};

/// Fixed output size all detection logic operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalFrame {
    pub width: u32,
    pub height: u32,
}

impl Default for CanonicalFrame {
    fn default() -> Self {
        Self {
            width: 256,
            height: 500,
        }
    }
}

/// Per-side crop fractions applied to the original image before resizing.
///
/// Each fraction is relative to the original width (left/right) or height
/// (top/bottom) and must lie in `[0, 0.5)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropFractions {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for CropFractions {
    fn default() -> Self {
        Self {
            left: 0.10,
            right: 0.10,
            top: 0.05,
            bottom: 0.05,
        }
    }
}

impl CropFractions {
    fn validate(&self) -> Result<(), PreprocessError> {
        for (side, value) in [
            ("left", self.left),
            ("right", self.right),
            ("top", self.top),
            ("bottom", self.bottom),
        ] {
            if !(0.0..0.5).contains(&value) {
                return Err(PreprocessError::FractionOutOfRange { side, value });
            }
        }
        Ok(())
    }

    /// Pixels removed from the top of an image of the given height.
    pub fn top_offset_px(&self, original_height: u32) -> u32 {
        (original_height as f32 * self.top) as u32
    }

    /// Height remaining after the vertical crop, never below one pixel.
    pub fn cropped_height(&self, original_height: u32) -> u32 {
        let bottom = (original_height as f32 * self.bottom) as u32;
        (original_height - self.top_offset_px(original_height) - bottom).max(1)
    }
}

/// Errors produced by [`preprocess`].
#[derive(thiserror::Error, Debug)]
pub enum PreprocessError {
    #[error("crop fraction {side}={value} outside [0, 0.5)")]
    FractionOutOfRange { side: &'static str, value: f32 },

    #[error("input image is empty")]
    EmptyImage,
}

/// Output of the preprocessing stage: the canonical color working copy
/// (the annotation target) and the smoothed luma frame the detection
/// stages consume.
#[derive(Clone, Debug)]
pub struct PlateFrames {
    pub color: RgbImage,
    pub smoothed: GrayImage,
}

/// Crop by the configured fractions, resize to the canonical frame,
/// convert to luma and Gaussian-smooth.
///
/// The output dimensions equal the canonical frame for any non-empty
/// input, regardless of source resolution or aspect ratio.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(src), fields(width = src.width(), height = src.height()))
)]
pub fn preprocess(
    src: &RgbImage,
    crop: &CropFractions,
    frame: &CanonicalFrame,
    blur_sigma: f32,
) -> Result<PlateFrames, PreprocessError> {
    crop.validate()?;
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return Err(PreprocessError::EmptyImage);
    }

    let left = (w as f32 * crop.left) as u32;
    let right = (w as f32 * crop.right) as u32;
    let top = crop.top_offset_px(h);
    let cropped_w = (w - left - right).max(1);
    let cropped_h = crop.cropped_height(h);

    let cropped = imageops::crop_imm(src, left, top, cropped_w, cropped_h).to_image();
    let color = imageops::resize(&cropped, frame.width, frame.height, FilterType::Triangle);
    let gray = imageops::grayscale(&color);
    let smoothed = gaussian_blur_f32(&gray, blur_sigma);

    Ok(PlateFrames { color, smoothed })
}

/// Map baseline/topline references from original-image pixel space into
/// the canonical frame.
///
/// The top-crop offset is subtracted first, then the remaining extent is
/// scaled by `canonical_height / cropped_height`; results clamp to
/// `[0, canonical_height - 1]`. Fails if the mapped band degenerates.
pub fn band_to_canonical(
    topline_y: u32,
    baseline_y: u32,
    original_height: u32,
    crop: &CropFractions,
    frame: &CanonicalFrame,
) -> Result<Band, BandError> {
    let top = crop.top_offset_px(original_height) as f64;
    let cropped_h = crop.cropped_height(original_height) as f64;
    let scale = frame.height as f64 / cropped_h;
    let max_y = frame.height.saturating_sub(1) as f64;

    let map = |y: u32| ((y as f64 - top) * scale).round().clamp(0.0, max_y) as u32;

    Band::new(map(topline_y), map(baseline_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_image(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, image::Rgb([180, 180, 180]))
    }

    #[test]
    fn output_is_always_canonical_size() {
        let frame = CanonicalFrame::default();
        let crop = CropFractions::default();
        for (w, h) in [(37, 91), (256, 500), (1024, 768), (3000, 4000), (2, 2)] {
            let frames = preprocess(&flat_image(w, h), &crop, &frame, 1.1).unwrap();
            assert_eq!(frames.color.dimensions(), (256, 500));
            assert_eq!(frames.smoothed.dimensions(), (256, 500));
        }
    }

    #[test]
    fn rejects_out_of_range_fractions() {
        let frame = CanonicalFrame::default();
        let crop = CropFractions {
            left: 0.5,
            ..CropFractions::default()
        };
        let err = preprocess(&flat_image(100, 100), &crop, &frame, 1.1);
        assert!(matches!(
            err,
            Err(PreprocessError::FractionOutOfRange { side: "left", .. })
        ));
    }

    #[test]
    fn rejects_empty_image() {
        let frame = CanonicalFrame::default();
        let crop = CropFractions::default();
        let empty = RgbImage::new(0, 0);
        assert!(matches!(
            preprocess(&empty, &crop, &frame, 1.1),
            Err(PreprocessError::EmptyImage)
        ));
    }

    #[test]
    fn band_mapping_compensates_crop_then_scales() {
        let frame = CanonicalFrame::default();
        let crop = CropFractions::default();
        // original height 1000: top crop 50 px, cropped extent 900 px.
        let band = band_to_canonical(50, 500, 1000, &crop, &frame).unwrap();
        assert_eq!(band.topline_y(), 0);
        assert_eq!(band.baseline_y(), 250);
    }

    #[test]
    fn band_mapping_clamps_to_frame() {
        let frame = CanonicalFrame::default();
        let crop = CropFractions::default();
        // 950 maps past the bottom of the canonical frame and clamps.
        let band = band_to_canonical(10, 950, 1000, &crop, &frame).unwrap();
        assert_eq!(band.topline_y(), 0);
        assert_eq!(band.baseline_y(), 499);
    }

    #[test]
    fn band_mapping_rejects_collapsed_band() {
        let frame = CanonicalFrame::default();
        let crop = CropFractions::default();
        // Both references inside the cropped-away top margin collapse to 0.
        assert!(band_to_canonical(0, 40, 1000, &crop, &frame).is_err());
    }

    #[test]
    fn identity_mapping_without_crop() {
        let frame = CanonicalFrame::default();
        let crop = CropFractions {
            left: 0.0,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
        };
        let band = band_to_canonical(20, 480, 500, &crop, &frame).unwrap();
        assert_eq!(band.topline_y(), 20);
        assert_eq!(band.baseline_y(), 480);
    }
}
