//! Color-based plate validity pre-check.
//!
//! A quick statistic over the source image, run before the pipeline
//! when enabled: a photograph dominated by near-black pixels is not a
//! usable plate shot (lens covered, unlit bench). Deliberately a
//! separate collaborator, never fused into contour logic.

use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Cutoffs for the near-black pixel test.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidityParams {
    /// Luma at or below which a pixel counts as near-black.
    pub dark_luma_max: u8,
    /// Fraction of near-black pixels above which the plate is rejected.
    pub max_dark_fraction: f32,
}

impl Default for ValidityParams {
    fn default() -> Self {
        Self {
            dark_luma_max: 40,
            max_dark_fraction: 0.25,
        }
    }
}

/// Whether the photograph passes the near-black pixel test.
pub fn plate_is_valid(img: &RgbImage, params: &ValidityParams) -> bool {
    let total = img.width() as u64 * img.height() as u64;
    if total == 0 {
        return false;
    }

    let dark = img
        .pixels()
        .filter(|p| luma(p) <= params.dark_luma_max)
        .count() as u64;

    (dark as f32 / total as f32) <= params.max_dark_fraction
}

// BT.601 integer luma, matching the `image` crate's grayscale weights.
#[inline]
fn luma(p: &image::Rgb<u8>) -> u8 {
    let [r, g, b] = p.0;
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}
