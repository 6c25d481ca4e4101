//! High-level facade for the `tlc-spots-*` workspace.
//!
//! Locates developed spots on a photographed thin-layer-chromatography
//! plate and converts each spot's vertical position into a retention
//! factor (Rf), optionally normalized against user-supplied baseline
//! (solvent front) and topline (sample origin) references.
//!
//! ## Quickstart
//!
//! ```no_run
//! use tlc_spots::{SpotDetector, BandRefs};
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = ImageReader::open("plate.png")?.decode()?.to_rgb8();
//! let detector = SpotDetector::default();
//!
//! let detection = detector.detect_image(&img, BandRefs::from_sentinels(480, 20))?;
//! for spot in &detection.spots {
//!     println!("spot at ({}, {}): rf = {:.3}", spot.x, spot.y, spot.rf_value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `tlc_spots::core`: the detection pipeline (preprocessing,
//!   gradients, contours, suppression, Rf mapping, adaptive search).
//! - [`SpotDetector`]: decoded-image and path-based entry points.
//! - [`detect_spots_json`] / [`detect_plate`]: the plugin-boundary
//!   surface (JSON array and boolean variants).
//! - [`validity`]: the optional color-based plate pre-check.

pub use tlc_spots_core as core;

pub use tlc_spots_core::{DetectorParams, Spot, SuppressionVariant};

mod annotate;
mod detect;
pub mod validity;

pub use detect::{
    detect_plate, detect_spots_json, spots_to_json, BandRefs, DetectError, Detection,
    ProcessOutcome, SpotDetector, UNSET_REFERENCE,
};
