//! End-to-end detection from decoded images and from image paths.
//!
//! The path-based surface owns the call-boundary semantics: decode or
//! processing failures are logged and mapped to an empty result with a
//! `false` success flag, and nothing is written back in that case. Only
//! a fully successful run overwrites the input resource with the
//! annotated canonical frame.

use std::path::{Path, PathBuf};

use image::{ImageReader, RgbImage};
use log::{info, warn};

use tlc_spots_core::{
    adaptive_search, band_to_canonical, filter_and_map, gradient_magnitude, preprocess, Band,
    BandError, DetectorParams, PreprocessError, Spot,
};

use crate::annotate::annotate_spot;
use crate::validity::{plate_is_valid, ValidityParams};

/// Sentinel for "reference not supplied" at the plugin boundary.
pub const UNSET_REFERENCE: i32 = -1;

/// Baseline/topline references in original-image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandRefs {
    pub topline_y: u32,
    pub baseline_y: u32,
}

impl BandRefs {
    /// Interpret a sentinel pair from the plugin boundary. Both
    /// references must be present (non-negative) to form a band.
    pub fn from_sentinels(baseline_y: i32, topline_y: i32) -> Option<Self> {
        if baseline_y < 0 || topline_y < 0 {
            return None;
        }
        Some(Self {
            topline_y: topline_y as u32,
            baseline_y: baseline_y as u32,
        })
    }
}

/// Errors produced by the detection facade.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("could not load image at {path:?}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not write annotated image to {path:?}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("plate rejected by the color validity pre-check")]
    InvalidPlate,

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Band(#[from] BandError),
}

/// Successful in-memory detection result.
#[derive(Clone, Debug)]
pub struct Detection {
    /// Surviving spots, in suppression order.
    pub spots: Vec<Spot>,
    /// Canonical working copy with outlines, centers and Rf labels.
    pub annotated: RgbImage,
    /// Contour/suppression passes the adaptive search used.
    pub iterations: usize,
}

/// Result of the path-based surface; never an error.
#[derive(Clone, Debug, Default)]
pub struct ProcessOutcome {
    pub spots: Vec<Spot>,
    pub success: bool,
}

/// Spot detector facade over the core pipeline.
#[derive(Clone, Debug, Default)]
pub struct SpotDetector {
    params: DetectorParams,
    validity: ValidityParams,
}

impl SpotDetector {
    pub fn new(params: DetectorParams) -> Self {
        Self {
            params,
            validity: ValidityParams::default(),
        }
    }

    /// Override the color validity cutoffs.
    pub fn with_validity_params(mut self, validity: ValidityParams) -> Self {
        self.validity = validity;
        self
    }

    #[inline]
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Run the pipeline on a decoded image.
    ///
    /// Pure in-memory variant: no file I/O, errors are returned rather
    /// than mapped to the boundary result.
    pub fn detect_image(
        &self,
        src: &RgbImage,
        band_refs: Option<BandRefs>,
    ) -> Result<Detection, DetectError> {
        if self.params.color_validity_check && !plate_is_valid(src, &self.validity) {
            return Err(DetectError::InvalidPlate);
        }

        let band: Option<Band> = band_refs
            .map(|refs| {
                band_to_canonical(
                    refs.topline_y,
                    refs.baseline_y,
                    src.height(),
                    &self.params.crop,
                    &self.params.frame,
                )
            })
            .transpose()?;

        let frames = preprocess(
            src,
            &self.params.crop,
            &self.params.frame,
            self.params.blur_sigma,
        )?;
        let magnitude = gradient_magnitude(&frames.smoothed);
        let outcome = adaptive_search(&magnitude, &self.params, band.as_ref());
        let detected = filter_and_map(
            &outcome.candidates,
            &self.params.geometry,
            band.as_ref(),
            &self.params.frame,
        );

        let mut annotated = frames.color;
        for spot in &detected {
            annotate_spot(&mut annotated, spot);
        }

        Ok(Detection {
            spots: detected.iter().map(|d| d.spot).collect(),
            annotated,
            iterations: outcome.state.iteration,
        })
    }

    /// Process the image at `path` and overwrite it with the annotated
    /// canonical frame.
    ///
    /// Load failures and internal faults map to an empty outcome with
    /// `success = false`; no partial annotation is ever written.
    pub fn process_path<P: AsRef<Path>>(
        &self,
        path: P,
        baseline_y: i32,
        topline_y: i32,
    ) -> ProcessOutcome {
        let path = path.as_ref();
        match self.try_process(path, BandRefs::from_sentinels(baseline_y, topline_y)) {
            Ok(spots) => ProcessOutcome {
                spots,
                success: true,
            },
            Err(err) => {
                warn!("detection failed for {}: {err}", path.display());
                ProcessOutcome::default()
            }
        }
    }

    fn try_process(&self, path: &Path, band_refs: Option<BandRefs>) -> Result<Vec<Spot>, DetectError> {
        info!("processing plate image at {}", path.display());

        let src = ImageReader::open(path)
            .map_err(|err| DetectError::Load {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(err),
            })?
            .decode()
            .map_err(|err| DetectError::Load {
                path: path.to_path_buf(),
                source: err,
            })?
            .to_rgb8();

        let detection = self.detect_image(&src, band_refs)?;
        detection.annotated.save(path).map_err(|err| DetectError::Save {
            path: path.to_path_buf(),
            source: err,
        })?;

        info!(
            "found {} spot(s) in {} pass(es)",
            detection.spots.len(),
            detection.iterations
        );
        Ok(detection.spots)
    }
}

/// Serialize spots with the `[{"x":..,"y":..,"rf_value":..}]` contract.
pub fn spots_to_json(spots: &[Spot]) -> String {
    serde_json::to_string(spots).unwrap_or_else(|err| {
        warn!("spot serialization failed: {err}");
        "[]".to_string()
    })
}

/// Detect spots and return them as a JSON array, `"[]"` on any failure.
///
/// `baseline_y`/`topline_y` are original-image Y coordinates;
/// [`UNSET_REFERENCE`] (or any negative value) means "not supplied".
pub fn detect_spots_json<P: AsRef<Path>>(path: P, baseline_y: i32, topline_y: i32) -> String {
    let outcome = SpotDetector::default().process_path(path, baseline_y, topline_y);
    spots_to_json(&outcome.spots)
}

/// Boolean variant of the plugin surface: `true` once the annotated
/// image is written, `false` on load failure or any internal fault.
pub fn detect_plate<P: AsRef<Path>>(path: P) -> bool {
    SpotDetector::default()
        .process_path(path, UNSET_REFERENCE, UNSET_REFERENCE)
        .success
}
