//! Raster-based kerning between horizontally neighbouring shapes.
//!
//! Each shape is rasterized over a shared vertical range. Per scanline the
//! kerner records the leftmost and rightmost inked column (the silhouette
//! edges). The offset that makes two shapes touch is the largest per-row
//! overlap between the left shape's right edge and the right shape's left
//! edge.

use crate::config::KerningOptions;
use crate::geometry::{Path, Rect, union_all};
use crate::raster::{Raster, RasterFrame, rasterize};
use glam::Vec2;
use log::trace;

/// Silhouette edges of one rasterized shape.
///
/// Row `r` covers world y from `frame.origin.y + r / frame.resolution`. Edge
/// entries are pixel columns, `None` for rows without ink.
#[derive(Clone, Debug, PartialEq)]
pub struct KerningInfo {
    pub frame: RasterFrame,
    pub left: Vec<Option<usize>>,
    pub right: Vec<Option<usize>>,
}

impl KerningInfo {
    /// Scans every row of `raster` from both sides for the first inked pixel.
    pub fn from_raster(raster: &Raster, frame: &RasterFrame) -> Self {
        let inked = |x: usize, y: usize| raster.alpha(x, y) > 0;
        let (left, right) = (0..raster.height())
            .map(|y| {
                let l = (0..raster.width()).find(|&x| inked(x, y));
                let r = (0..raster.width()).rev().find(|&x| inked(x, y));
                (l, r)
            })
            .unzip();

        Self {
            frame: *frame,
            left,
            right,
        }
    }

    /// World x of the right ink edge on row `row`.
    fn right_edge(&self, row: usize) -> Option<f32> {
        self.right[row].map(|col| self.frame.column_x(col + 1))
    }

    /// World x of the left ink edge on row `row`.
    fn left_edge(&self, row: usize) -> Option<f32> {
        self.left[row].map(|col| self.frame.column_x(col))
    }
}

/// Horizontal translation for the right shape so that its silhouette sits
/// exactly `padding` units to the right of the left shape's silhouette.
///
/// Negative values move the right shape left. Rows are matched by world y;
/// both profiles must share a resolution. Returns `None` when no row carries
/// ink in both shapes.
pub fn kerning_offset(left: &KerningInfo, right: &KerningInfo, padding: f32) -> Option<f32> {
    let shift = ((right.frame.origin.y - left.frame.origin.y) * left.frame.resolution).round() as isize;

    (0..left.left.len())
        .filter_map(|row| {
            let other = usize::try_from(row as isize - shift).ok()?;
            if other >= right.left.len() {
                return None;
            }
            Some(left.right_edge(row)? - right.left_edge(other)?)
        })
        .reduce(f32::max)
        .map(|overlap| overlap + padding)
}

/// Computes kerning offsets by rasterizing path sets.
#[derive(Clone, Copy, Debug, Default)]
pub struct Kerner {
    options: KerningOptions,
}

impl Kerner {
    pub fn new(options: KerningOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &KerningOptions {
        &self.options
    }

    /// Silhouette of `paths` rasterized over world rows `top..=bottom`.
    pub fn profile(&self, paths: &[Path], bounds: Rect, top: f32, bottom: f32) -> KerningInfo {
        let margin = self.options.stroke_width + 1.0 / self.options.resolution;
        let span = Rect::new(
            Vec2::new(bounds.min.x, top),
            Vec2::new(bounds.max.x, bottom),
        );
        let frame = RasterFrame::covering(span, self.options.resolution, margin);
        let raster = rasterize(paths, &frame, self.options.stroke_width);
        KerningInfo::from_raster(&raster, &frame)
    }

    /// Horizontal translation to apply to `right` so it sits next to `left`.
    ///
    /// Empty inputs need no offset. Shapes whose ink never shares a row fall
    /// back to bounding-box adjacency.
    pub fn offset(&self, left: &[Path], right: &[Path]) -> f32 {
        let (Some(lb), Some(rb)) = (bounds_of(left), bounds_of(right)) else {
            return 0.0;
        };
        let top = lb.min.y.min(rb.min.y);
        let bottom = lb.max.y.max(rb.max.y);

        let left_info = self.profile(left, lb, top, bottom);
        let right_info = self.profile(right, rb, top, bottom);

        let offset = kerning_offset(&left_info, &right_info, self.options.padding)
            .unwrap_or(lb.max.x - rb.min.x + self.options.padding);
        trace!("kerning offset {offset:.2}");
        offset
    }
}

fn bounds_of(paths: &[Path]) -> Option<Rect> {
    union_all(paths.iter().filter_map(Path::bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn frame(origin: Vec2, width: usize, height: usize) -> RasterFrame {
        RasterFrame {
            origin,
            resolution: 1.0,
            width,
            height,
        }
    }

    #[test]
    fn profiles_record_first_ink_from_each_side() {
        let f = frame(Vec2::ZERO, 8, 3);
        let mut raster = Raster::new(8, 3);
        raster.fill_rect(2, 0, 5, 1);
        raster.fill_rect(1, 2, 7, 3);

        let info = KerningInfo::from_raster(&raster, &f);
        assert_eq!(info.left, vec![Some(2), None, Some(1)]);
        assert_eq!(info.right, vec![Some(4), None, Some(6)]);
    }

    #[test]
    fn edges_are_in_world_units_of_the_frame() {
        let f = RasterFrame {
            origin: Vec2::new(1.0, 0.0),
            resolution: 2.0,
            width: 4,
            height: 1,
        };
        let mut raster = Raster::new(4, 1);
        raster.fill_rect(1, 0, 3, 1);

        let info = KerningInfo::from_raster(&raster, &f);
        assert_eq!(info.left_edge(0), Some(1.5));
        assert_eq!(info.right_edge(0), Some(2.5));
    }

    #[test]
    fn synthetic_rectangles_close_their_gap() {
        // Left block ink spans x in [0, 10), right block [15, 25): gap of 5.
        let lf = frame(Vec2::ZERO, 10, 4);
        let mut lr = Raster::new(10, 4);
        lr.fill_rect(0, 0, 10, 4);

        let rf = frame(Vec2::new(15.0, 0.0), 10, 4);
        let mut rr = Raster::new(10, 4);
        rr.fill_rect(0, 0, 10, 4);

        let left = KerningInfo::from_raster(&lr, &lf);
        let right = KerningInfo::from_raster(&rr, &rf);

        assert_eq!(kerning_offset(&left, &right, 0.0), Some(-5.0));
        assert_eq!(kerning_offset(&left, &right, 2.0), Some(-3.0));
    }

    #[test]
    fn worst_row_wins() {
        // Left shape juts out on row 1; the right shape must clear that row.
        let f = frame(Vec2::ZERO, 10, 3);
        let mut lr = Raster::new(10, 3);
        lr.fill_rect(0, 0, 3, 3);
        lr.fill_rect(0, 1, 8, 2);

        let mut rr = Raster::new(10, 3);
        rr.fill_rect(5, 0, 10, 3);

        let left = KerningInfo::from_raster(&lr, &f);
        let right = KerningInfo::from_raster(&rr, &f);

        // Row 1: left edge at 8, right starts at 5 => move right by 3.
        assert_eq!(kerning_offset(&left, &right, 0.0), Some(3.0));
    }

    #[test]
    fn rows_without_ink_are_ignored() {
        let f = frame(Vec2::ZERO, 6, 2);
        let mut lr = Raster::new(6, 2);
        lr.fill_rect(0, 0, 6, 1);
        let mut rr = Raster::new(6, 2);
        rr.fill_rect(0, 1, 6, 2);

        let left = KerningInfo::from_raster(&lr, &f);
        let right = KerningInfo::from_raster(&rr, &f);
        assert_eq!(kerning_offset(&left, &right, 1.0), None);
    }

    #[test]
    fn rows_are_matched_by_world_height() {
        // The right raster starts two rows lower.
        let lf = frame(Vec2::ZERO, 4, 4);
        let mut lr = Raster::new(4, 4);
        lr.fill_rect(0, 3, 4, 4);

        let rf = frame(Vec2::new(10.0, 2.0), 4, 2);
        let mut rr = Raster::new(4, 2);
        rr.fill_rect(0, 1, 4, 2);

        let left = KerningInfo::from_raster(&lr, &lf);
        let right = KerningInfo::from_raster(&rr, &rf);
        assert_eq!(kerning_offset(&left, &right, 0.0), Some(-6.0));
    }

    #[test]
    fn kerner_closes_gap_between_stroked_boxes() {
        let options = KerningOptions {
            resolution: 4.0,
            padding: 1.5,
            stroke_width: 0.5,
        };
        let kerner = Kerner::new(options);

        let square = |x0: f32| {
            Path::closed(vec![
                Vec2::new(x0, 0.0),
                Vec2::new(x0 + 10.0, 0.0),
                Vec2::new(x0 + 10.0, 10.0),
                Vec2::new(x0, 10.0),
            ])
        };
        let gap = 7.0;
        let offset = kerner.offset(&[square(0.0)], &[square(10.0 + gap)]);

        // Stroke ink widens each outline by half the stroke on both sides.
        let expected = options.padding - gap + options.stroke_width;
        assert!(
            (offset - expected).abs() <= 1.0 / options.resolution + 1e-4,
            "offset {offset}, expected {expected}"
        );
    }

    #[test]
    fn kerner_with_empty_side_needs_no_offset() {
        let kerner = Kerner::default();
        let stroke = Path::segment(Vec2::ZERO, Vec2::new(0.0, 5.0));
        assert_eq!(kerner.offset(&[], &[stroke.clone()]), 0.0);
        assert_eq!(kerner.offset(&[stroke], &[]), 0.0);
    }

    #[test]
    fn kerner_falls_back_to_bounds_when_rows_never_meet() {
        let kerner = Kerner::new(KerningOptions {
            resolution: 2.0,
            padding: 1.0,
            stroke_width: 0.5,
        });
        let high = Path::segment(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0));
        let low = Path::segment(Vec2::new(20.0, 30.0), Vec2::new(24.0, 30.0));
        assert_eq!(kerner.offset(&[high], &[low]), 4.0 - 20.0 + 1.0);
    }
}
