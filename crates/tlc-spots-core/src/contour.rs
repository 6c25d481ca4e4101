//! Candidate region extraction from the gradient magnitude map.
//!
//! Binarization, optional band masking, morphological closing and
//! connected-component labeling. The closing step bridges the
//! single-pixel gaps the gradient operator leaves between the two flanks
//! of a spot edge, so each spot labels as one solid region.

use std::collections::BTreeMap;

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::close;
use imageproc::rect::Rect;
use imageproc::region_labelling::{connected_components, Connectivity};

use crate::band::Band;
use crate::gradient::GradientMap;

/// A connected foreground region: bounding rectangle plus raw pixel area.
///
/// `area` counts labeled pixels and is distinct from the rectangle area
/// `width * height`; the contour stage filters on the former, the
/// geometric filter on the latter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub rect: Rect,
    pub area: u32,
}

/// Rectangle area as f64, `width * height`.
#[inline]
pub fn rect_area(rect: &Rect) -> f64 {
    rect.width() as f64 * rect.height() as f64
}

/// Extract candidate regions from a gradient magnitude map.
///
/// Cells strictly above `threshold` become foreground; when `band` is
/// set, rows outside it are cleared before labeling and only regions
/// whose bounding rectangle lies entirely inside the band survive.
/// Regions must exceed `min_area` raw pixels. Pure function of its
/// inputs; regions are returned in label (raster) order.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(magnitude, band))
)]
pub fn extract_regions(
    magnitude: &GradientMap,
    threshold: f32,
    min_area: f64,
    band: Option<&Band>,
) -> Vec<Region> {
    let (w, h) = magnitude.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let mut mask = GrayImage::from_fn(w, h, |x, y| {
        if magnitude.get_pixel(x, y)[0] > threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });

    if let Some(band) = band {
        for y in (0..h).filter(|&y| !band.contains_row(y)) {
            for x in 0..w {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
    }

    // 3x3 square structuring element.
    let closed = close(&mask, Norm::LInf, 1);
    let labels = connected_components(&closed, Connectivity::Eight, Luma([0u8]));

    // label -> (min_x, min_y, max_x, max_y, pixel count)
    let mut extents: BTreeMap<u32, (u32, u32, u32, u32, u32)> = BTreeMap::new();
    for y in 0..h {
        for x in 0..w {
            let label = labels.get_pixel(x, y)[0];
            if label == 0 {
                continue;
            }
            let entry = extents.entry(label).or_insert((x, y, x, y, 0));
            entry.0 = entry.0.min(x);
            entry.1 = entry.1.min(y);
            entry.2 = entry.2.max(x);
            entry.3 = entry.3.max(y);
            entry.4 += 1;
        }
    }

    extents
        .into_values()
        .map(|(min_x, min_y, max_x, max_y, area)| Region {
            rect: Rect::at(min_x as i32, min_y as i32)
                .of_size(max_x - min_x + 1, max_y - min_y + 1),
            area,
        })
        .filter(|region| region.area as f64 > min_area)
        .filter(|region| band.is_none_or(|b| b.contains_rect(&region.rect)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with_blocks(blocks: &[(u32, u32, u32, u32)]) -> GradientMap {
        let mut map = GradientMap::new(64, 128);
        for &(x0, y0, bw, bh) in blocks {
            for y in y0..y0 + bh {
                for x in x0..x0 + bw {
                    map.put_pixel(x, y, Luma([80.0]));
                }
            }
        }
        map
    }

    #[test]
    fn finds_block_bounding_rect_and_area() {
        let map = map_with_blocks(&[(10, 20, 8, 6)]);
        let regions = extract_regions(&map, 50.0, 10.0, None);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].rect, Rect::at(10, 20).of_size(8, 6));
        assert_eq!(regions[0].area, 48);
    }

    #[test]
    fn min_area_cutoff_is_strict() {
        let map = map_with_blocks(&[(10, 20, 4, 4)]);
        assert_eq!(extract_regions(&map, 50.0, 16.0, None).len(), 0);
        assert_eq!(extract_regions(&map, 50.0, 15.0, None).len(), 1);
    }

    #[test]
    fn closing_bridges_single_pixel_gap() {
        let mut map = GradientMap::new(64, 64);
        // Two 3-wide bars separated by a one-pixel gap at x = 13.
        for y in 20..26 {
            for x in 10..13 {
                map.put_pixel(x, y, Luma([80.0]));
            }
            for x in 14..17 {
                map.put_pixel(x, y, Luma([80.0]));
            }
        }
        let regions = extract_regions(&map, 50.0, 1.0, None);
        assert_eq!(regions.len(), 1, "gap should close into one region");
    }

    #[test]
    fn band_masks_rows_before_labeling() {
        // One block inside the band, one outside, one straddling the
        // edge. The outside block is cleared entirely; the straddler is
        // trimmed to the band rows and survives as a smaller region.
        let map = map_with_blocks(&[(10, 40, 6, 6), (10, 10, 6, 6), (30, 28, 6, 8)]);
        let band = Band::new(30, 60).unwrap();
        let regions = extract_regions(&map, 50.0, 10.0, Some(&band));
        assert_eq!(regions.len(), 2);

        let trimmed = regions.iter().find(|r| r.rect.left() == 30).unwrap();
        assert_eq!(trimmed.rect.top(), 30);
        assert_eq!(trimmed.rect.height(), 6);
        assert_eq!(trimmed.area, 36);

        assert!(regions.iter().all(|r| band.contains_rect(&r.rect)));
    }

    #[test]
    fn threshold_is_strict() {
        let mut map = GradientMap::new(16, 16);
        for y in 4..9 {
            for x in 4..9 {
                map.put_pixel(x, y, Luma([50.0]));
            }
        }
        assert!(extract_regions(&map, 50.0, 1.0, None).is_empty());
        assert_eq!(extract_regions(&map, 49.9, 1.0, None).len(), 1);
    }
}
