//! Unified pipeline configuration.
//!
//! Historically this detector existed as three near-identical pipelines
//! (adaptive retry, band masking, color pre-check). One parameter struct
//! now drives a single pipeline; the variants are plain flags here.

use serde::{Deserialize, Serialize};

use crate::preprocess::{CanonicalFrame, CropFractions};
use crate::spots::GeometryParams;
use crate::suppress::SuppressionVariant;

/// Configuration for the full detection pipeline.
///
/// `DetectorParams::default()` reproduces the production constants:
/// 256x500 canonical frame, 10 %/5 % crop margins, gradient threshold
/// 50, starting area cutoff 200 relaxed by 100 per pass, at least 7
/// candidate spots, 0.2 overlap threshold and the 250 px^2 / 3:1
/// geometry cutoffs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectorParams {
    /// Crop margins applied to the original image.
    pub crop: CropFractions,
    /// Canonical working frame all detection runs in.
    pub frame: CanonicalFrame,
    /// Gaussian smoothing sigma applied to the luma frame.
    pub blur_sigma: f32,
    /// Gradient magnitude binarization threshold.
    pub gradient_threshold: f32,
    /// Starting minimum region area (raw pixel count), strict cutoff.
    pub initial_min_area: f64,
    /// Amount subtracted from the area cutoff per relaxation pass.
    pub area_relax_step: f64,
    /// Hard floor for the relaxed area cutoff.
    pub area_floor: f64,
    /// Maximum number of contour/suppression passes.
    pub max_relax_iterations: usize,
    /// Candidate count that ends the adaptive search.
    pub min_required_spots: usize,
    /// Pairwise overlap fraction above which a candidate is suppressed.
    pub overlap_threshold: f64,
    /// Which suppression semantics to use.
    pub suppression: SuppressionVariant,
    /// Post-suppression shape plausibility cutoffs.
    pub geometry: GeometryParams,
    /// Relax the area cutoff until enough candidates survive. Off means
    /// a single contour/suppression pass.
    pub adaptive_relaxation: bool,
    /// Reject plates that fail the near-black pixel pre-check before
    /// running the pipeline.
    pub color_validity_check: bool,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            crop: CropFractions::default(),
            frame: CanonicalFrame::default(),
            blur_sigma: 1.1,
            gradient_threshold: 50.0,
            initial_min_area: 200.0,
            area_relax_step: 100.0,
            area_floor: 0.0,
            max_relax_iterations: 8,
            min_required_spots: 7,
            overlap_threshold: 0.2,
            suppression: SuppressionVariant::default(),
            geometry: GeometryParams::default(),
            adaptive_relaxation: true,
            color_validity_check: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_serde() {
        let params = DetectorParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: DetectorParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back.frame, params.frame);
        assert_eq!(back.suppression, SuppressionVariant::AreaPriority);
        assert_eq!(back.min_required_spots, 7);
    }

    #[test]
    fn suppression_variant_uses_kebab_case() {
        let json = serde_json::to_string(&SuppressionVariant::AreaPriority).unwrap();
        assert_eq!(json, r#""area-priority""#);
    }
}
