//! Word trees: handwriting-like trees grown from stroke glyphs.
//!
//! Main components:
//! - [`geometry`] - polylines, bounds and intersection classification.
//! - [`raster`] - coverage rasterization used for kerning.
//! - [`font`] - glyph definitions and the built-in stroke font.
//! - [`glyph`] - placed glyphs with trunks and branch points.
//! - [`word_tree`] - growing a single word glyph by glyph.
//! - [`kerning`] - silhouette-based horizontal spacing.
//! - [`tree`] - composite trees balanced around a trunk.
//! - [`sprout`] - the behaviour shared by word trees and trees.
//! - [`content`] - nested word/group input and its text syntax.
//! - [`config`] - growth, kerning and layout options.
//! - [`error`] - the [`GrowError`] type.
//! - [`types`] - shared index aliases.

pub mod config;
pub mod content;
pub mod error;
pub mod font;
pub mod geometry;
pub mod glyph;
pub mod kerning;
pub mod raster;
pub mod sprout;
pub mod tree;
pub mod types;
pub mod word_tree;

pub use error::GrowError;
