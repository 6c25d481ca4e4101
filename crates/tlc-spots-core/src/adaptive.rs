//! Bounded adaptive search over the contour and suppression stages.
//!
//! An unbounded relaxation loop can spin forever on a plate that never
//! yields enough candidates, so the search is an explicit two-state
//! machine bounded by both an iteration cap and a cutoff floor.

use log::debug;

use crate::band::Band;
use crate::contour::{extract_regions, Region};
use crate::gradient::GradientMap;
use crate::params::DetectorParams;
use crate::suppress::suppress;

/// Mutable search state, alive for one detection call only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionState {
    /// Binarization threshold for the contour stage.
    pub threshold: f32,
    /// Current minimum-area cutoff.
    pub min_area: f64,
    /// Completed contour/suppression passes.
    pub iteration: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SearchState {
    Searching,
    Done,
}

/// Result of the adaptive search: the last suppressed candidate set and
/// the state the search ended in.
#[derive(Clone, Debug)]
pub struct AdaptiveOutcome {
    pub candidates: Vec<Region>,
    pub state: DetectionState,
}

/// Run contour extraction and suppression, relaxing the minimum-area
/// cutoff until enough candidates survive.
///
/// The stopping count is the suppressed candidate count, before the
/// geometric filter. The search always terminates: it ends once the
/// count reaches `min_required_spots`, the cutoff sits at the floor, or
/// `max_relax_iterations` passes have run. With `adaptive_relaxation`
/// off exactly one pass runs.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip(magnitude, params, band))
)]
pub fn adaptive_search(
    magnitude: &GradientMap,
    params: &DetectorParams,
    band: Option<&Band>,
) -> AdaptiveOutcome {
    let mut state = DetectionState {
        threshold: params.gradient_threshold,
        min_area: params.initial_min_area,
        iteration: 0,
    };
    let mut mode = SearchState::Searching;
    let mut candidates = Vec::new();

    while mode == SearchState::Searching {
        let regions = extract_regions(magnitude, state.threshold, state.min_area, band);
        candidates = suppress(&regions, params.overlap_threshold, params.suppression);
        state.iteration += 1;

        debug!(
            "pass {}: min_area={:.0}, {} region(s), {} after suppression",
            state.iteration,
            state.min_area,
            regions.len(),
            candidates.len()
        );

        if candidates.len() >= params.min_required_spots || !params.adaptive_relaxation {
            mode = SearchState::Done;
        } else if state.iteration >= params.max_relax_iterations
            || state.min_area <= params.area_floor
        {
            debug!(
                "ending search with {} candidate(s) after {} pass(es)",
                candidates.len(),
                state.iteration
            );
            mode = SearchState::Done;
        } else {
            state.min_area = (state.min_area - params.area_relax_step).max(params.area_floor);
        }
    }

    AdaptiveOutcome { candidates, state }
}
