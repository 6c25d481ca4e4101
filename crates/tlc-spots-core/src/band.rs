//! Vertical reference band between the topline and baseline markings.

use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

/// Vertical region of the canonical frame in which spots are considered
/// valid, delimited by the topline (upper reference, smaller Y) and the
/// baseline (lower reference, larger Y).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    topline_y: u32,
    baseline_y: u32,
}

/// Errors produced when constructing a [`Band`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BandError {
    #[error("degenerate band (topline_y={topline_y} must be below baseline_y={baseline_y})")]
    Degenerate { topline_y: u32, baseline_y: u32 },
}

impl Band {
    /// Create a band from canonical-frame coordinates.
    ///
    /// Requires `topline_y < baseline_y`.
    pub fn new(topline_y: u32, baseline_y: u32) -> Result<Self, BandError> {
        if topline_y >= baseline_y {
            return Err(BandError::Degenerate {
                topline_y,
                baseline_y,
            });
        }
        Ok(Self {
            topline_y,
            baseline_y,
        })
    }

    #[inline]
    pub fn topline_y(&self) -> u32 {
        self.topline_y
    }

    #[inline]
    pub fn baseline_y(&self) -> u32 {
        self.baseline_y
    }

    /// Vertical extent in pixels.
    #[inline]
    pub fn span(&self) -> u32 {
        self.baseline_y - self.topline_y
    }

    /// Whether a row of the canonical frame falls inside the band.
    #[inline]
    pub fn contains_row(&self, y: u32) -> bool {
        y >= self.topline_y && y <= self.baseline_y
    }

    /// Whether a rectangle lies entirely inside the band (containment,
    /// not mere overlap).
    pub fn contains_rect(&self, rect: &Rect) -> bool {
        rect.top() >= self.topline_y as i32 && rect.bottom() <= self.baseline_y as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_band() {
        assert!(Band::new(100, 100).is_err());
        assert!(Band::new(200, 100).is_err());
        assert!(Band::new(20, 480).is_ok());
    }

    #[test]
    fn containment_is_inclusive() {
        let band = Band::new(20, 480).unwrap();
        assert!(band.contains_rect(&Rect::at(10, 20).of_size(30, 461)));
        assert!(!band.contains_rect(&Rect::at(10, 19).of_size(30, 10)));
        assert!(!band.contains_rect(&Rect::at(10, 460).of_size(30, 30)));
    }

    #[test]
    fn row_containment() {
        let band = Band::new(20, 480).unwrap();
        assert!(!band.contains_row(19));
        assert!(band.contains_row(20));
        assert!(band.contains_row(480));
        assert!(!band.contains_row(481));
    }
}
