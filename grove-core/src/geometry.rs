//! Polyline geometry shared by glyph growth, tree layout and kerning.
//!
//! Coordinates are y-down: a point with a larger `y` lies *lower* on the
//! canvas. Every shape in the crate is a set of [`Path`] polylines, which keeps
//! intersection and rasterization simple enough to reason about.

use glam::{Affine2, Vec2};
use std::f32::consts::TAU;

/// Distance under which two points are treated as the same point.
pub const EPSILON: f32 = 1e-3;

/// Angular tolerance (radians) used when classifying contacts.
const ANGLE_EPSILON: f32 = 1e-4;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Smallest rectangle containing all `points`, or `None` for an empty input.
    pub fn from_points<I: IntoIterator<Item = Vec2>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    pub fn union(self, other: Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn translate(self, delta: Vec2) -> Rect {
        Rect {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

/// Union of every rectangle in `rects`, or `None` if there are none.
pub fn union_all<I: IntoIterator<Item = Rect>>(rects: I) -> Option<Rect> {
    rects.into_iter().reduce(Rect::union)
}

/// A point where two paths meet.
///
/// `crossing` is `true` when one path passes through the other, and `false`
/// for a tangential touch (the paths meet but stay on the same side).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub point: Vec2,
    pub crossing: bool,
}

/// An open or closed polyline.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    points: Vec<Vec2>,
    closed: bool,
}

impl Path {
    pub fn open(points: Vec<Vec2>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    pub fn closed(points: Vec<Vec2>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    /// Single straight segment from `a` to `b`.
    pub fn segment(a: Vec2, b: Vec2) -> Self {
        Self::open(vec![a, b])
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn first_point(&self) -> Option<Vec2> {
        self.points.first().copied()
    }

    pub fn last_point(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    /// Number of segments (a closed path has one extra, joining last to first).
    pub fn segment_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    fn segment_at(&self, i: usize) -> (Vec2, Vec2) {
        let n = self.points.len();
        (self.points[i], self.points[(i + 1) % n])
    }

    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        (0..self.segment_count()).map(|i| self.segment_at(i))
    }

    pub fn length(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(self.points.iter().copied())
    }

    pub fn transform(&mut self, t: &Affine2) {
        for p in &mut self.points {
            *p = t.transform_point2(*p);
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    /// Moves the first point backwards along the first segment by `by`,
    /// lengthening the path at its start.
    ///
    /// Paths with fewer than two distinct points are left unchanged.
    pub fn extend_start(&mut self, by: f32) {
        if self.points.len() < 2 {
            return;
        }
        let dir = (self.points[1] - self.points[0]).normalize_or_zero();
        self.points[0] -= dir * by;
    }

    /// All contact points between `self` and `other`.
    ///
    /// Contacts closer than [`EPSILON`] are merged into one; a merged contact
    /// is a crossing if any of its contributing segment pairs crosses.
    pub fn intersections(&self, other: &Path) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = Vec::new();

        for i in 0..self.segment_count() {
            let (a0, a1) = self.segment_at(i);
            for j in 0..other.segment_count() {
                let (b0, b1) = other.segment_at(j);
                for (point, ta, tb) in segment_contacts(a0, a1, b0, b1) {
                    let crossing = classify(self, i, ta, other, j, tb, point);
                    match hits.iter_mut().find(|h| h.point.distance(point) < EPSILON) {
                        Some(existing) => existing.crossing |= crossing,
                        None => hits.push(Intersection { point, crossing }),
                    }
                }
            }
        }

        hits
    }

    /// Like [`Path::intersections`], keeping only contacts accepted by `keep`.
    pub fn intersections_filtered(
        &self,
        other: &Path,
        keep: impl Fn(&Intersection) -> bool,
    ) -> Vec<Intersection> {
        self.intersections(other)
            .into_iter()
            .filter(|hit| keep(hit))
            .collect()
    }

    /// Directions leaving `point` along this path, for a contact found on
    /// segment `seg` at parameter `t`.
    fn rays_at(&self, seg: usize, t: f32, point: Vec2) -> Vec<Vec2> {
        let n = self.points.len();
        let (a, b) = self.segment_at(seg);
        let tol = EPSILON / a.distance(b).max(EPSILON);

        let vertex = if t <= tol {
            Some(seg)
        } else if t >= 1.0 - tol {
            Some((seg + 1) % n)
        } else {
            None
        };

        let neighbours = match vertex {
            None => vec![a, b],
            Some(k) => {
                let mut out = Vec::with_capacity(2);
                if self.closed || k > 0 {
                    out.push(self.points[(k + n - 1) % n]);
                }
                if self.closed || k + 1 < n {
                    out.push(self.points[(k + 1) % n]);
                }
                out
            }
        };

        neighbours
            .into_iter()
            .map(|q| q - point)
            .filter(|d| d.length_squared() > EPSILON * EPSILON)
            .collect()
    }
}

/// Contact points of two segments as `(point, t_on_a, t_on_b)`.
///
/// Parallel overlapping segments report the two ends of the shared stretch.
fn segment_contacts(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> Vec<(Vec2, f32, f32)> {
    let r = a1 - a0;
    let s = b1 - b0;
    let len_r = r.length();
    let len_s = s.length();
    if len_r < EPSILON || len_s < EPSILON {
        return Vec::new();
    }

    let denom = r.perp_dot(s);
    let qp = b0 - a0;

    if denom.abs() < 1e-9 * len_r * len_s {
        // Parallel: only collinear overlaps produce contacts.
        if qp.perp_dot(r).abs() / len_r > EPSILON {
            return Vec::new();
        }
        let rr = r.dot(r);
        let t0 = qp.dot(r) / rr;
        let t1 = (b1 - a0).dot(r) / rr;
        let lo = t0.min(t1).max(0.0);
        let hi = t0.max(t1).min(1.0);
        if lo > hi + EPSILON / len_r {
            return Vec::new();
        }
        let project_b = |p: Vec2| ((p - b0).dot(s) / s.dot(s)).clamp(0.0, 1.0);
        let mut out = vec![(a0 + r * lo, lo, project_b(a0 + r * lo))];
        if (hi - lo) * len_r > EPSILON {
            out.push((a0 + r * hi, hi, project_b(a0 + r * hi)));
        }
        return out;
    }

    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    let tol_t = EPSILON / len_r;
    let tol_u = EPSILON / len_s;
    if t < -tol_t || t > 1.0 + tol_t || u < -tol_u || u > 1.0 + tol_u {
        return Vec::new();
    }
    let t = t.clamp(0.0, 1.0);
    let u = u.clamp(0.0, 1.0);
    vec![(a0 + r * t, t, u)]
}

/// Decides whether a contact is a crossing.
///
/// Each path contributes the rays leaving the contact point. Path `a` splits
/// the plane around the point into two sectors; the contact is a crossing
/// exactly when the two rays of `b` fall into different sectors. Path ends
/// (a single ray) and collinear rays can never cross.
fn classify(a: &Path, seg_a: usize, ta: f32, b: &Path, seg_b: usize, tb: f32, point: Vec2) -> bool {
    let rays_a = a.rays_at(seg_a, ta, point);
    let rays_b = b.rays_at(seg_b, tb, point);
    let ([base, other_a], [b1, b2]) = (rays_a.as_slice(), rays_b.as_slice()) else {
        return false;
    };

    let sector = angle_from(*base, *other_a);
    let beta1 = angle_from(*base, *b1);
    let beta2 = angle_from(*base, *b2);

    let on_boundary =
        |beta: f32| beta < ANGLE_EPSILON || (beta - sector).abs() < ANGLE_EPSILON || beta > TAU - ANGLE_EPSILON;
    if on_boundary(beta1) || on_boundary(beta2) {
        return false;
    }

    (beta1 < sector) != (beta2 < sector)
}

/// Counter-clockwise angle from `base` to `v`, in `[0, TAU)`.
fn angle_from(base: Vec2, v: Vec2) -> f32 {
    let angle = base.perp_dot(v).atan2(base.dot(v));
    if angle < 0.0 { angle + TAU } else { angle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use test_log::test;

    #[test]
    fn rect_union_and_extent() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 1.0));
        let b = Rect::new(Vec2::new(-1.0, 3.0), Vec2::new(1.0, 4.0));
        let u = a.union(b);
        assert_eq!(u.min, Vec2::new(-1.0, 0.0));
        assert_eq!(u.max, Vec2::new(2.0, 4.0));
        assert_eq!(u.width(), 3.0);
        assert_eq!(u.height(), 4.0);
        assert_eq!(u.center(), Vec2::new(0.5, 2.0));
    }

    #[test]
    fn empty_point_set_has_no_bounds() {
        assert!(Rect::from_points(std::iter::empty()).is_none());
        assert!(Path::open(Vec::new()).bounds().is_none());
    }

    #[test]
    fn x_shape_is_a_single_crossing() {
        let a = Path::segment(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        let b = Path::segment(Vec2::new(-1.0, 1.0), Vec2::new(1.0, -1.0));
        let hits = a.intersections(&b);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].crossing);
        assert!(hits[0].point.length() < EPSILON);
    }

    #[test]
    fn t_junction_is_a_touch() {
        let bar = Path::segment(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0));
        let stem = Path::segment(Vec2::new(0.0, 0.0), Vec2::new(0.0, 2.0));
        let hits = bar.intersections(&stem);
        assert_eq!(hits.len(), 1);
        assert!(!hits[0].crossing);
    }

    #[test]
    fn polyline_through_vertex_is_a_crossing() {
        // The vertical line passes straight through the corner of the zigzag.
        let zig = Path::open(vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
        ]);
        let line = Path::segment(Vec2::new(0.0, -2.0), Vec2::new(0.0, 2.0));
        let hits = zig.intersections(&line);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].crossing);
    }

    #[test]
    fn vee_touching_line_is_not_a_crossing() {
        // Both arms of the vee stay below the horizontal line.
        let vee = Path::open(vec![
            Vec2::new(-1.0, 1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
        ]);
        let line = Path::segment(Vec2::new(-2.0, 0.0), Vec2::new(2.0, 0.0));
        let hits = vee.intersections(&line);
        assert_eq!(hits.len(), 1);
        assert!(!hits[0].crossing);
    }

    #[test]
    fn collinear_overlap_reports_both_ends() {
        let a = Path::segment(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0));
        let b = Path::segment(Vec2::new(1.0, 0.0), Vec2::new(6.0, 0.0));
        let hits = a.intersections(&b);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| !h.crossing));
    }

    #[test]
    fn square_crossed_by_line_has_two_contacts() {
        let square = Path::closed(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ]);
        let line = Path::segment(Vec2::new(-1.0, 1.0), Vec2::new(3.0, 1.0));
        let hits = square.intersections(&line);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.crossing));
    }

    #[test]
    fn filtered_intersections_drop_excluded_points() {
        let a = Path::segment(Vec2::new(0.0, 0.0), Vec2::new(0.0, -2.0));
        let b = Path::segment(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0));
        let origin = Vec2::ZERO;
        let hits = a.intersections_filtered(&b, |h| h.point.distance(origin) > EPSILON);
        assert!(hits.is_empty());
    }

    #[test]
    fn extend_start_lengthens_backwards() {
        let mut trunk = Path::segment(Vec2::new(0.0, 0.0), Vec2::new(0.0, -3.0));
        trunk.extend_start(2.0);
        assert_eq!(trunk.first_point(), Some(Vec2::new(0.0, 2.0)));
        assert!((trunk.length() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn transform_rotates_points() {
        let mut p = Path::segment(Vec2::ZERO, Vec2::new(1.0, 0.0));
        p.transform(&Affine2::from_angle(FRAC_PI_2));
        let end = p.last_point().unwrap();
        assert!(end.distance(Vec2::new(0.0, 1.0)) < 1e-5);
    }
}
