//! Core detection pipeline for spots on photographed TLC plates.
//!
//! The pipeline runs strictly left to right on one plate image per call:
//! preprocessing into a fixed canonical frame, Scharr gradient
//! magnitude, contour extraction, overlap suppression, geometric
//! filtering and Rf mapping, with a bounded adaptive search relaxing
//! the area cutoff until enough candidates survive.
//!
//! This crate is pure computation: no file I/O, no annotation drawing,
//! no serialization boundary. Those live in the `tlc-spots` facade.

mod adaptive;
mod band;
mod contour;
mod gradient;
mod logger;
mod params;
mod preprocess;
mod spots;
mod suppress;

pub use adaptive::{adaptive_search, AdaptiveOutcome, DetectionState};
pub use band::{Band, BandError};
pub use contour::{extract_regions, rect_area, Region};
pub use gradient::{gradient_magnitude, GradientMap};
pub use params::DetectorParams;
pub use preprocess::{
    band_to_canonical, preprocess, CanonicalFrame, CropFractions, PlateFrames, PreprocessError,
};
pub use spots::{
    filter_and_map, passes_geometry, rect_center, rf_value, DetectedSpot, GeometryParams, Spot,
};
pub use suppress::{overlap_fraction, suppress, SuppressionVariant};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
