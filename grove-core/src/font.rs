//! Glyph providers: where branch-annotated character shapes come from.
//!
//! A [`GlyphDefinition`] is described in its own local frame, with the trunk
//! starting at the origin and pointing up (negative y). Growth instantiates a
//! fresh [`Glyph`] from it for every placement attempt.

use crate::error::GrowError;
use crate::geometry::Path;
use crate::glyph::{Branch, Glyph};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::PI;

/// Anything that can map a character to its glyph definition.
pub trait GlyphProvider {
    fn lookup(&self, ch: char) -> Option<&GlyphDefinition>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlyphDefinition {
    pub ch: char,
    pub trunk: Vec<Vec2>,
    pub strokes: Vec<Vec<Vec2>>,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

impl GlyphDefinition {
    /// A fresh, unpositioned glyph.
    pub fn instantiate(&self) -> Glyph {
        Glyph::new(
            self.ch,
            Path::open(self.trunk.clone()),
            self.strokes.iter().cloned().map(Path::open).collect(),
            self.branches
                .iter()
                .map(|b| Branch::new(b.point, b.direction))
                .collect(),
        )
    }
}

#[derive(Deserialize)]
struct FontFile {
    #[serde(rename = "glyph", default)]
    glyphs: Vec<GlyphDefinition>,
}

/// An in-memory stroke font.
#[derive(Clone, Debug, Default)]
pub struct StrokeFont {
    glyphs: HashMap<char, GlyphDefinition>,
}

impl StrokeFont {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the definition for `definition.ch`.
    pub fn insert(&mut self, definition: GlyphDefinition) {
        self.glyphs.insert(definition.ch, definition);
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Parses a font from TOML, one `[[glyph]]` table per character.
    pub fn from_toml_str(text: &str) -> Result<Self, GrowError> {
        let file: FontFile = toml::from_str(text)?;
        let mut font = Self::new();
        for definition in file.glyphs {
            font.insert(definition);
        }
        Ok(font)
    }

    /// A deterministic procedural font covering `a..=z`.
    ///
    /// Each letter is a short trunk and a stem ending in one to three arms;
    /// every arm tip is a branch. Stem height, arm length and lean vary with
    /// the letter so that words produce varied trees.
    pub fn builtin() -> Self {
        let mut font = Self::new();
        for (idx, ch) in ('a'..='z').enumerate() {
            font.insert(builtin_letter(ch, idx));
        }
        font
    }
}

impl GlyphProvider for StrokeFont {
    fn lookup(&self, ch: char) -> Option<&GlyphDefinition> {
        self.glyphs.get(&ch)
    }
}

fn builtin_letter(ch: char, idx: usize) -> GlyphDefinition {
    const TRUNK: f32 = 3.0;

    let stem_height = 8.0 + (idx % 4) as f32 * 2.0;
    let arm_length = 6.0 + (idx % 3) as f32 * 2.0;
    let arms = 1 + idx % 3;
    let lean = (idx % 5) as f32 - 2.0;

    let base = Vec2::new(0.0, -TRUNK);
    let top = Vec2::new(0.0, -TRUNK - stem_height);

    let mut strokes = vec![vec![base, top]];
    let mut branches = Vec::with_capacity(arms);

    for k in 0..arms {
        let angle = if arms == 1 {
            lean * PI / 24.0
        } else {
            let spread = PI / 3.5;
            -spread + 2.0 * spread * k as f32 / (arms - 1) as f32 + lean * PI / 48.0
        };
        let direction = Vec2::from_angle(angle).rotate(Vec2::NEG_Y);
        let tip = top + direction * arm_length;
        strokes.push(vec![top, tip]);
        branches.push(Branch::new(tip, direction));
    }

    // Letters past the first third get a short spur halfway up the stem.
    if idx % 3 == 2 {
        let mid = (base + top) * 0.5;
        strokes.push(vec![mid, mid + Vec2::new(2.5, -1.5)]);
    }

    GlyphDefinition {
        ch,
        trunk: vec![Vec2::ZERO, base],
        strokes,
        branches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn builtin_covers_lowercase_ascii() {
        let font = StrokeFont::builtin();
        assert_eq!(font.len(), 26);
        assert!(font.lookup('a').is_some());
        assert!(font.lookup('z').is_some());
        assert!(font.lookup('A').is_none());
        assert!(font.lookup('1').is_none());
    }

    #[test]
    fn builtin_branch_counts_cycle() {
        let font = StrokeFont::builtin();
        assert_eq!(font.lookup('a').unwrap().branches.len(), 1);
        assert_eq!(font.lookup('b').unwrap().branches.len(), 2);
        assert_eq!(font.lookup('c').unwrap().branches.len(), 3);
        assert_eq!(font.lookup('d').unwrap().branches.len(), 1);
    }

    #[test]
    fn builtin_branches_sit_on_arm_tips() {
        let font = StrokeFont::builtin();
        for ch in 'a'..='z' {
            let def = font.lookup(ch).unwrap();
            for branch in &def.branches {
                let on_stroke = def
                    .strokes
                    .iter()
                    .any(|s| s.last().is_some_and(|p| p.distance(branch.point) < 1e-5));
                assert!(on_stroke, "branch of {ch:?} is not at a stroke end");
                assert!(branch.direction.y < 0.0, "branch of {ch:?} points down");
            }
        }
    }

    #[test]
    fn instantiate_starts_at_origin() {
        let font = StrokeFont::builtin();
        let glyph = font.lookup('q').unwrap().instantiate();
        assert_eq!(glyph.ch(), 'q');
        assert_eq!(glyph.anchor(), Vec2::ZERO);
        assert_eq!(glyph.trunk_direction(), Vec2::NEG_Y);
    }

    #[test]
    fn parses_toml_font() {
        let font = StrokeFont::from_toml_str(
            r#"
            [[glyph]]
            ch = "i"
            trunk = [[0.0, 0.0], [0.0, -2.0]]
            strokes = [[[0.0, -2.0], [0.0, -8.0]]]
            branches = [{ point = [0.0, -8.0], direction = [0.0, -1.0] }]

            [[glyph]]
            ch = "o"
            trunk = [[0.0, 0.0], [0.0, -1.0]]
            strokes = [[[0.0, -1.0], [1.0, -2.0], [0.0, -3.0], [-1.0, -2.0], [0.0, -1.0]]]
            "#,
        )
        .unwrap();

        assert_eq!(font.len(), 2);
        let i = font.lookup('i').unwrap();
        assert_eq!(i.branches.len(), 1);
        assert_eq!(i.branches[0].point, Vec2::new(0.0, -8.0));
        assert!(font.lookup('o').unwrap().branches.is_empty());
    }

    #[test]
    fn malformed_toml_font_is_an_error() {
        let err = StrokeFont::from_toml_str("[[glyph]]\nch = 3").unwrap_err();
        assert!(matches!(err, GrowError::Config(_)));
    }
}
