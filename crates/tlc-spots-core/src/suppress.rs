//! Overlap suppression over candidate regions.
//!
//! Two variants exist in the wild and are deliberately not merged. The
//! canonical one is [`SuppressionVariant::AreaPriority`]; the legacy
//! [`SuppressionVariant::EdgePriority`] reproduces the historical
//! behavior exactly, inclusive pixel extents included.

use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

use crate::contour::{rect_area, Region};

/// Which suppression semantics to apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuppressionVariant {
    /// Sort by rectangle area descending; drop any rectangle whose
    /// overlap with a kept one, normalized by the smaller of the two
    /// areas, exceeds the threshold.
    #[default]
    AreaPriority,
    /// Legacy: process by bottom-edge Y descending; overlap normalized
    /// by the area of the rectangle under test.
    EdgePriority,
}

/// Remove redundant overlapping regions.
///
/// For `AreaPriority` the result guarantees that no surviving pair has
/// `intersection / min(area_a, area_b) > overlap_threshold`, and is
/// ordered by descending kept-rectangle area.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(candidates)))]
pub fn suppress(
    candidates: &[Region],
    overlap_threshold: f64,
    variant: SuppressionVariant,
) -> Vec<Region> {
    match variant {
        SuppressionVariant::AreaPriority => suppress_area_priority(candidates, overlap_threshold),
        SuppressionVariant::EdgePriority => suppress_edge_priority(candidates, overlap_threshold),
    }
}

/// Overlap fraction normalized by the smaller rectangle's area.
pub fn overlap_fraction(a: &Rect, b: &Rect) -> f64 {
    let inter = match a.intersect(*b) {
        Some(r) => rect_area(&r),
        None => return 0.0,
    };
    inter / rect_area(a).min(rect_area(b))
}

fn suppress_area_priority(candidates: &[Region], overlap_threshold: f64) -> Vec<Region> {
    let mut remaining: Vec<Region> = candidates.to_vec();
    remaining.sort_by(|a, b| {
        rect_area(&b.rect)
            .partial_cmp(&rect_area(&a.rect))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept = Vec::new();
    while !remaining.is_empty() {
        let selected = remaining.remove(0);
        remaining.retain(|other| {
            overlap_fraction(&selected.rect, &other.rect) <= overlap_threshold
        });
        kept.push(selected);
    }
    kept
}

/// Intersection extent with the legacy inclusive `+1` on each axis.
fn inclusive_intersection(a: &Rect, b: &Rect) -> f64 {
    let w = (a.right().min(b.right()) - a.left().max(b.left()) + 1).max(0);
    let h = (a.bottom().min(b.bottom()) - a.top().max(b.top()) + 1).max(0);
    (w as f64) * (h as f64)
}

fn suppress_edge_priority(candidates: &[Region], overlap_threshold: f64) -> Vec<Region> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by_key(|&i| candidates[i].rect.bottom());

    let mut kept = Vec::new();
    while let Some(i) = order.pop() {
        let selected = &candidates[i];
        kept.push(*selected);
        order.retain(|&j| {
            let other = &candidates[j];
            let overlap = inclusive_intersection(&selected.rect, &other.rect)
                / rect_area(&other.rect);
            overlap <= overlap_threshold
        });
    }
    kept
}
