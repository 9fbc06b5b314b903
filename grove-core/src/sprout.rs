//! The capability set shared by everything a [`Tree`] can hold as a child.

use crate::geometry::{Path, Rect};
use crate::tree::Tree;
use crate::word_tree::WordTree;
use enum_dispatch::enum_dispatch;
use glam::{Affine2, Vec2};

/// Common behaviour of grown structures.
#[enum_dispatch]
pub trait Sprout {
    /// Every outline of the structure, in world coordinates.
    fn paths(&self) -> Vec<Path>;

    /// Bounding box of all outlines, `None` before anything has grown.
    fn bounds(&self) -> Option<Rect>;

    /// The segment connecting the structure to whatever it grows from.
    fn trunk(&self) -> Option<&Path>;

    /// The pivot: where the structure attaches to its parent.
    fn position(&self) -> Vec2;

    /// Moves the structure so that its pivot lands on `position`.
    fn set_position(&mut self, position: Vec2);

    fn transform(&mut self, t: &Affine2);
}

/// A child of a [`Tree`]: either a grown word or a nested tree.
#[enum_dispatch(Sprout)]
#[derive(Debug)]
pub enum Subtree {
    Word(WordTree),
    Tree(Tree),
}
