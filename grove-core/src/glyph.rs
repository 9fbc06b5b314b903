//! A single placed character: its strokes, trunk and branch points.

use crate::config::GrowingOrder;
use crate::geometry::{EPSILON, Path, Rect, union_all};
use glam::{Affine2, Vec2};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A point on a glyph where another glyph may be rooted, together with the
/// direction the grafted glyph should grow in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub point: Vec2,
    pub direction: Vec2,
}

impl Branch {
    pub fn new(point: Vec2, direction: Vec2) -> Self {
        Self {
            point,
            direction: direction.normalize_or(Vec2::NEG_Y),
        }
    }

    fn transform(&mut self, t: &Affine2) {
        self.point = t.transform_point2(self.point);
        self.direction = t.transform_vector2(self.direction).normalize_or(Vec2::NEG_Y);
    }
}

#[derive(Clone, Debug)]
pub struct Glyph {
    ch: char,
    trunk: Path,
    strokes: Vec<Path>,
    branches: Vec<Branch>,
}

impl Glyph {
    pub fn new(ch: char, trunk: Path, strokes: Vec<Path>, branches: Vec<Branch>) -> Self {
        Self {
            ch,
            trunk,
            strokes,
            branches,
        }
    }

    pub fn ch(&self) -> char {
        self.ch
    }

    pub fn trunk(&self) -> &Path {
        &self.trunk
    }

    pub fn strokes(&self) -> &[Path] {
        &self.strokes
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Where the glyph is rooted: the start of its trunk.
    pub fn anchor(&self) -> Vec2 {
        self.trunk.first_point().unwrap_or(Vec2::ZERO)
    }

    /// Unit direction from the trunk start towards the glyph body.
    pub fn trunk_direction(&self) -> Vec2 {
        match self.trunk.points() {
            [a, b, ..] => (*b - *a).normalize_or(Vec2::NEG_Y),
            _ => Vec2::NEG_Y,
        }
    }

    /// Trunk followed by every stroke; these are the outlines tested for
    /// crossings.
    pub fn outlines(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(&self.trunk).chain(self.strokes.iter())
    }

    /// Bounds of the strokes alone, without the trunk.
    pub fn body_bounds(&self) -> Option<Rect> {
        union_all(self.strokes.iter().filter_map(Path::bounds))
    }

    pub fn bounds(&self) -> Option<Rect> {
        union_all(self.outlines().filter_map(Path::bounds))
    }

    /// Lowest y reached by the glyph body (larger is lower).
    pub fn bottom(&self) -> f32 {
        self.body_bounds().map_or(self.anchor().y, |b| b.max.y)
    }

    pub fn transform(&mut self, t: &Affine2) {
        self.trunk.transform(t);
        for stroke in &mut self.strokes {
            stroke.transform(t);
        }
        for branch in &mut self.branches {
            branch.transform(t);
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.transform(&Affine2::from_translation(delta));
    }

    /// Rotates and moves the glyph so its trunk starts at `branch.point` and
    /// grows along `branch.direction`.
    pub fn align_to(&mut self, branch: &Branch) {
        let from = self.trunk_direction();
        let angle = from.perp_dot(branch.direction).atan2(from.dot(branch.direction));
        let rotation = Affine2::from_angle(angle);
        let moved = rotation.transform_point2(self.anchor());
        self.transform(&(Affine2::from_translation(branch.point - moved) * rotation));
    }

    /// Lengthens the trunk at its start by `by`, moving the anchor with it.
    pub fn extend_trunk(&mut self, by: f32) {
        self.trunk.extend_start(by);
    }

    /// Branches in the order growth should try them.
    ///
    /// With `start_at_trunk` the branch closest to the anchor is moved to the
    /// front; the rest keep the order chosen by `order`.
    pub fn ordered_branches<R: Rng + ?Sized>(
        &self,
        order: GrowingOrder,
        start_at_trunk: bool,
        rng: &mut R,
    ) -> Vec<Branch> {
        let mut branches = self.branches.clone();
        match order {
            GrowingOrder::Natural => {}
            GrowingOrder::Reversed => branches.reverse(),
            GrowingOrder::Randomized => branches.shuffle(rng),
        }

        if start_at_trunk {
            let anchor = self.anchor();
            let nearest = branches
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    a.point
                        .distance_squared(anchor)
                        .total_cmp(&b.point.distance_squared(anchor))
                })
                .map(|(i, _)| i);
            if let Some(i) = nearest {
                let first = branches.remove(i);
                branches.insert(0, first);
            }
        }

        branches
    }

    /// Whether this (candidate) glyph would cross `placed`.
    ///
    /// Every outline pair is checked. Contacts at this glyph's own anchor are
    /// ignored since that is where it is grafted. A pair is rejected when it
    /// meets more than once, or once with a true crossing; a single
    /// tangential touch is allowed.
    pub fn crosses(&self, placed: &Glyph) -> bool {
        let origin = self.anchor();
        self.outlines().any(|mine| {
            placed.outlines().any(|theirs| {
                let hits = mine.intersections_filtered(theirs, |hit| {
                    hit.point.distance(origin) > EPSILON
                });
                match hits.as_slice() {
                    [] => false,
                    [single] => single.crossing,
                    _ => true,
                }
            })
        })
    }
}
