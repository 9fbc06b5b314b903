//! Composite trees: word trees and nested trees arranged around a trunk.
//!
//! Children are first laid out on a row, left to right, each one kerned
//! against everything already on the row. The row is then split into a left
//! group, a center child and a right group. The left group is turned a quarter
//! turn so it grows out to the left of the trunk, the right group a quarter
//! turn the other way, and the center child sits on top of the trunk.
//!
//! Local frame of a balanced tree (y-down):
//!
//! ```text
//!              center
//!                |
//!      left ---- + ---- right      <- trunk top at (0, 0)
//!      left ---- |
//!                |
//!                +                 <- pivot, (0, extent + margin)
//! ```

use crate::config::Config;
use crate::content::Content;
use crate::error::GrowError;
use crate::font::GlyphProvider;
use crate::geometry::{Path, Rect, union_all};
use crate::kerning::Kerner;
use crate::sprout::{Sprout, Subtree};
use crate::types::ChildId;
use crate::word_tree::WordTree;
use glam::{Affine2, Vec2};
use log::debug;
use std::f32::consts::FRAC_PI_2;

/// How a tree's children are grouped around its trunk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Distribution {
    pub left: Vec<ChildId>,
    pub center: Option<ChildId>,
    pub right: Vec<ChildId>,
}

/// Splits children into left, center and right.
///
/// `items` holds each child's pivot x and bounds, in row order. Up to three
/// children are assigned by position in the row; from four on, children are
/// split at the horizontal center of the row and the center child is taken
/// from whichever side balances the two groups better.
pub fn distribute(items: &[(f32, Rect)]) -> Distribution {
    match items.len() {
        0 => Distribution::default(),
        1 => Distribution {
            left: Vec::new(),
            center: Some(0),
            right: Vec::new(),
        },
        2 => Distribution {
            left: vec![0],
            center: Some(1),
            right: Vec::new(),
        },
        3 => Distribution {
            left: vec![0],
            center: Some(1),
            right: vec![2],
        },
        _ => distribute_row(items),
    }
}

fn distribute_row(items: &[(f32, Rect)]) -> Distribution {
    let Some(row) = union_all(items.iter().map(|(_, b)| *b)) else {
        return Distribution::default();
    };
    let mid = row.center().x;

    let (mut left, mut right): (Vec<ChildId>, Vec<ChildId>) =
        (0..items.len()).partition(|&i| items[i].0 < mid);

    let span = |ids: &[ChildId]| union_all(ids.iter().map(|&i| items[i].1)).map_or(0.0, |b| b.width());

    let center = if left.len() > 1 && right.len() > 1 {
        // Take the center from the side that keeps the wider remainder.
        let left_rest = span(&left[..left.len() - 1]);
        let right_rest = span(&right[1..]);
        if left_rest > right_rest {
            left.pop()
        } else {
            Some(right.remove(0))
        }
    } else {
        // One side is nearly empty: the child whose pivot is nearest the
        // middle becomes the center.
        match (left.last().copied(), right.first().copied()) {
            (Some(l), Some(r)) if mid - items[l].0 < items[r].0 - mid => left.pop(),
            (_, Some(_)) => Some(right.remove(0)),
            (Some(_), None) => left.pop(),
            (None, None) => None,
        }
    };

    Distribution {
        left,
        center,
        right,
    }
}

#[derive(Debug)]
pub struct Tree {
    config: Config,
    kerner: Kerner,
    children: Vec<Subtree>,
    /// Balancing transform applied to each child on top of its row placement.
    placements: Vec<Affine2>,
    /// Transform applied to the whole tree since it was last balanced.
    frame: Affine2,
    distribution: Distribution,
    trunk: Path,
}

impl Tree {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            kerner: Kerner::new(config.kerning),
            children: Vec::new(),
            placements: Vec::new(),
            frame: Affine2::IDENTITY,
            distribution: Distribution::default(),
            trunk: Path::segment(Vec2::ZERO, Vec2::new(0.0, config.tree.trunk_margin)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn children(&self) -> &[Subtree] {
        &self.children
    }

    pub fn left(&self) -> &[ChildId] {
        &self.distribution.left
    }

    pub fn right(&self) -> &[ChildId] {
        &self.distribution.right
    }

    pub fn center(&self) -> Option<ChildId> {
        self.distribution.center
    }

    /// Grows every element of `content` into a child and rebalances.
    ///
    /// Words become [`WordTree`]s and groups become nested trees with the same
    /// configuration. Calling `grow` again adds further children.
    pub fn grow(&mut self, content: &[Content], font: &dyn GlyphProvider) -> Result<(), GrowError> {
        if content.is_empty() {
            return Err(GrowError::EmptyContent);
        }

        let mut grown = Vec::with_capacity(content.len());
        for item in content {
            grown.push(self.sprout(item, font)?);
        }

        self.unbalance();
        for child in grown {
            self.push_child(child);
        }
        self.distribute_trees();
        self.balance();
        Ok(())
    }

    fn sprout(&self, item: &Content, font: &dyn GlyphProvider) -> Result<Subtree, GrowError> {
        Ok(match item {
            Content::Word(word) => {
                let mut tree = WordTree::new(self.config.growth);
                tree.grow(word, font)?;
                Subtree::from(tree)
            }
            Content::Group(items) => {
                let mut tree = Tree::new(self.config);
                tree.grow(items, font)?;
                Subtree::from(tree)
            }
        })
    }

    /// Adds an already grown child and rebalances the whole tree.
    pub fn add_tree(&mut self, child: Subtree) {
        self.unbalance();
        self.push_child(child);
        self.distribute_trees();
        self.balance();
    }

    /// Appends `child` to the row, kerned against the children already there.
    /// Only valid while the tree is unbalanced.
    fn push_child(&mut self, mut child: Subtree) {
        child.set_position(Vec2::ZERO);
        if !self.children.is_empty() {
            let row: Vec<Path> = self.children.iter().flat_map(|c| c.paths()).collect();
            let dx = self.kerner.offset(&row, &child.paths());
            child.set_position(Vec2::new(dx, 0.0));
        }
        self.children.push(child);
        self.placements.push(Affine2::IDENTITY);
    }

    /// Recomputes the left/center/right grouping from the row layout.
    fn distribute_trees(&mut self) {
        let items: Vec<(f32, Rect)> = self
            .children
            .iter()
            .map(|c| {
                let pos = c.position();
                (pos.x, c.bounds().unwrap_or(Rect::new(pos, pos)))
            })
            .collect();
        self.distribution = distribute(&items);
        debug!(
            "distributed {} children: left {:?}, center {:?}, right {:?}",
            self.children.len(),
            self.distribution.left,
            self.distribution.center,
            self.distribution.right
        );
    }

    /// Puts every child back on the row, undoing earlier balancing.
    fn unbalance(&mut self) {
        let frame_inv = self.frame.inverse();
        for (child, placement) in self.children.iter_mut().zip(&mut self.placements) {
            child.transform(&(placement.inverse() * frame_inv));
            *placement = Affine2::IDENTITY;
        }
        self.frame = Affine2::IDENTITY;
    }

    fn place(&mut self, id: ChildId, t: Affine2) {
        self.children[id].transform(&t);
        self.placements[id] = t * self.placements[id];
    }

    fn side_bounds(&self, ids: &[ChildId]) -> Option<Rect> {
        union_all(ids.iter().filter_map(|&i| self.children[i].bounds()))
    }

    fn translate_side(&mut self, ids: &[ChildId], delta: Vec2) {
        for &i in ids {
            self.place(i, Affine2::from_translation(delta));
        }
    }

    /// Arranges the distributed children around a freshly sized trunk.
    fn balance(&mut self) {
        let left = self.distribution.left.clone();
        let right = self.distribution.right.clone();

        for &i in &left {
            self.place(i, Affine2::from_angle(-FRAC_PI_2));
        }
        for &i in &right {
            self.place(i, Affine2::from_angle(FRAC_PI_2));
        }

        let extent = |b: Option<Rect>| b.map_or(0.0, |b| b.height());
        let left_extent = extent(self.side_bounds(&left));
        let right_extent = extent(self.side_bounds(&right));
        let (taller, shorter) = if left_extent >= right_extent {
            (&left, &right)
        } else {
            (&right, &left)
        };
        let (bigger, smaller) = (left_extent.max(right_extent), left_extent.min(right_extent));

        // Spread the shorter side's positions so both sides span alike.
        if smaller > 0.0 && shorter.len() > 1 {
            let ratio = bigger / smaller;
            if let Some(bounds) = self.side_bounds(shorter) {
                let mid = bounds.center().y;
                for &i in shorter {
                    let y = self.children[i].position().y;
                    let target = mid + (y - mid) * ratio;
                    self.place(i, Affine2::from_translation(Vec2::new(0.0, target - y)));
                }
            }
        }

        let bigger = extent(self.side_bounds(taller)).max(extent(self.side_bounds(shorter)));
        let length = bigger + self.config.tree.trunk_margin;
        self.trunk = Path::segment(Vec2::ZERO, Vec2::new(0.0, length));

        let half_width = self.config.tree.trunk_width * 0.5;
        if let Some(b) = self.side_bounds(&left) {
            self.translate_side(&left, Vec2::new(-half_width - b.max.x, 0.0));
        }
        if let Some(b) = self.side_bounds(&right) {
            self.translate_side(&right, Vec2::new(half_width - b.min.x, 0.0));
        }

        if let Some(b) = self.side_bounds(taller) {
            self.translate_side(taller, Vec2::new(0.0, -b.min.y));
        }
        if let (Some(tall), Some(short)) = (self.side_bounds(taller), self.side_bounds(shorter)) {
            self.translate_side(shorter, Vec2::new(0.0, tall.center().y - short.center().y));
        }

        if let Some(center) = self.distribution.center {
            let pos = self.children[center].position();
            self.place(center, Affine2::from_translation(-pos));
        }

        self.frame = Affine2::IDENTITY;
        debug!("balanced tree: trunk {length:.2}, sides {left_extent:.2}/{right_extent:.2}");
    }
}

impl Sprout for Tree {
    fn paths(&self) -> Vec<Path> {
        std::iter::once(self.trunk.clone())
            .chain(self.children.iter().flat_map(|c| c.paths()))
            .collect()
    }

    fn bounds(&self) -> Option<Rect> {
        let children = self.children.iter().filter_map(|c| c.bounds());
        union_all(self.trunk.bounds().into_iter().chain(children))
    }

    fn trunk(&self) -> Option<&Path> {
        Some(&self.trunk)
    }

    /// The bottom end of the trunk.
    fn position(&self) -> Vec2 {
        self.trunk.last_point().unwrap_or(Vec2::ZERO)
    }

    fn set_position(&mut self, position: Vec2) {
        let delta = position - self.position();
        self.transform(&Affine2::from_translation(delta));
    }

    fn transform(&mut self, t: &Affine2) {
        for child in &mut self.children {
            child.transform(t);
        }
        self.trunk.transform(t);
        self.frame = *t * self.frame;
    }
}
