//! Geometric plausibility filtering and Rf mapping.

use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

use crate::band::Band;
use crate::contour::{rect_area, Region};
use crate::preprocess::CanonicalFrame;

/// Shape plausibility cutoffs applied after suppression.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryParams {
    /// Minimum rectangle area (`width * height`), strict.
    pub min_area: f64,
    /// Maximum `width / height` ratio, inclusive.
    pub max_aspect_ratio: f64,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            min_area: 250.0,
            max_aspect_ratio: 3.0,
        }
    }
}

/// A detected spot: center in canonical-frame coordinates and its
/// retention-factor value, rounded to three decimals.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub x: i32,
    pub y: i32,
    pub rf_value: f64,
}

/// A spot paired with the rectangle it was derived from, for annotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectedSpot {
    pub rect: Rect,
    pub spot: Spot,
}

/// Whether a rectangle passes the aspect-ratio and area cutoffs.
pub fn passes_geometry(rect: &Rect, params: &GeometryParams) -> bool {
    let aspect = rect.width() as f64 / rect.height() as f64;
    aspect <= params.max_aspect_ratio && rect_area(rect) > params.min_area
}

/// Integer center of a rectangle.
pub fn rect_center(rect: &Rect) -> (i32, i32) {
    (
        rect.left() + rect.width() as i32 / 2,
        rect.top() + rect.height() as i32 / 2,
    )
}

/// Retention factor for a spot center at row `cy`.
///
/// With a band: `(baseline - cy) / (baseline - topline)`. Centers are
/// not re-clamped; band containment upstream already bounds them.
/// Without a band the looser canonical-frame normalization
/// `1 - cy / height` applies.
pub fn rf_value(cy: f64, band: Option<&Band>, frame: &CanonicalFrame) -> f64 {
    match band {
        Some(band) => (band.baseline_y() as f64 - cy) / band.span() as f64,
        None => 1.0 - cy / frame.height as f64,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Apply the geometric filter and map survivors to [`Spot`]s.
pub fn filter_and_map(
    candidates: &[Region],
    params: &GeometryParams,
    band: Option<&Band>,
    frame: &CanonicalFrame,
) -> Vec<DetectedSpot> {
    candidates
        .iter()
        .filter(|region| passes_geometry(&region.rect, params))
        .map(|region| {
            let (cx, cy) = rect_center(&region.rect);
            DetectedSpot {
                rect: region.rect,
                spot: Spot {
                    x: cx,
                    y: cy,
                    rf_value: round3(rf_value(cy as f64, band, frame)),
                },
            }
        })
        .collect()
}
