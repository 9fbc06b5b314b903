//! Growing a single word into a connected tree of glyphs.
//!
//! The first character becomes the root glyph. Every following character is
//! grafted onto each branch of the glyph placed for the previous character,
//! depth first. A candidate that would cross an already placed glyph is
//! dropped and its branch simply stays bare.

use crate::config::GrowthOptions;
use crate::error::GrowError;
use crate::font::GlyphProvider;
use crate::geometry::{Path, Rect, union_all};
use crate::glyph::Glyph;
use crate::sprout::Sprout;
use crate::types::GlyphId;
use glam::{Affine2, Vec2};
use log::{debug, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug)]
pub struct WordTree {
    word: String,
    options: GrowthOptions,
    glyphs: Vec<Glyph>,
    parents: Vec<Option<GlyphId>>,
    lowest: Option<GlyphId>,
    position: Vec2,
    rng: StdRng,
}

impl WordTree {
    pub fn new(options: GrowthOptions) -> Self {
        Self {
            word: String::new(),
            options,
            glyphs: Vec::new(),
            parents: Vec::new(),
            lowest: None,
            position: Vec2::ZERO,
            rng: seeded_rng(options.seed),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn options(&self) -> &GrowthOptions {
        &self.options
    }

    /// Placed glyphs in growth order; the first one is the root.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// The glyph `id` was grafted onto, `None` for the root.
    pub fn parent_of(&self, id: GlyphId) -> Option<GlyphId> {
        self.parents.get(id).copied().flatten()
    }

    /// The glyph whose body reaches lowest.
    pub fn lowest_glyph(&self) -> Option<&Glyph> {
        self.lowest.map(|id| &self.glyphs[id])
    }

    pub fn trunk_length(&self) -> f32 {
        self.glyphs.first().map_or(0.0, |root| root.trunk().length())
    }

    /// Grows `word` from scratch, replacing anything grown before.
    ///
    /// Every character must be known to `font`; otherwise nothing is grown
    /// and [`GrowError::GlyphNotFound`] is returned.
    pub fn grow(&mut self, word: &str, font: &dyn GlyphProvider) -> Result<(), GrowError> {
        let chars: Vec<char> = word.chars().collect();
        let Some((&first, rest)) = chars.split_first() else {
            return Err(GrowError::EmptyWord);
        };
        if chars.len() > self.options.max_depth {
            return Err(GrowError::WordTooLong {
                len: chars.len(),
                max: self.options.max_depth,
            });
        }
        if let Some(&missing) = chars.iter().find(|&&c| font.lookup(c).is_none()) {
            return Err(GrowError::GlyphNotFound(missing));
        }

        if !self.glyphs.is_empty() {
            self.chop();
        }
        self.word = word.to_owned();

        let mut root = font
            .lookup(first)
            .ok_or(GrowError::GlyphNotFound(first))?
            .instantiate();
        root.translate(self.position - root.anchor());
        let root_bottom = root.bottom();
        self.glyphs.push(root);
        self.parents.push(None);
        self.lowest = Some(0);
        self.adjust_trunk(root_bottom);

        self.grow_from(0, rest, font)?;

        self.position = self.glyphs[0].anchor();
        debug!(
            "grew {:?} into {} glyphs, trunk {:.2}",
            self.word,
            self.glyphs.len(),
            self.trunk_length()
        );
        Ok(())
    }

    fn grow_from(
        &mut self,
        parent: GlyphId,
        rest: &[char],
        font: &dyn GlyphProvider,
    ) -> Result<(), GrowError> {
        let Some((&ch, rest)) = rest.split_first() else {
            return Ok(());
        };
        let definition = font.lookup(ch).ok_or(GrowError::GlyphNotFound(ch))?;

        let branches = self.glyphs[parent].ordered_branches(
            self.options.growing_order,
            self.options.start_at_trunk,
            &mut self.rng,
        );

        for branch in branches {
            if self.glyphs.len() >= self.options.max_glyphs {
                debug!("glyph limit {} reached, not growing {ch:?}", self.options.max_glyphs);
                return Ok(());
            }

            let mut candidate = definition.instantiate();
            candidate.align_to(&branch);
            let bottom = candidate.bottom();
            self.adjust_trunk(bottom);

            if self.glyphs.iter().any(|placed| candidate.crosses(placed)) {
                debug!("rejected {ch:?} on a branch of glyph {parent}");
                continue;
            }

            let id = self.glyphs.len();
            if self.lowest.is_none_or(|low| bottom > self.glyphs[low].bottom()) {
                self.lowest = Some(id);
            }
            trace!("placed {ch:?} as glyph {id} on glyph {parent}");
            self.glyphs.push(candidate);
            self.parents.push(Some(parent));

            self.grow_from(id, rest, font)?;
        }

        Ok(())
    }

    /// Extends the root trunk when the lowest body point (including a
    /// tentative `candidate_bottom`) comes closer than
    /// `branch_bottom_distance` to the root's anchor.
    ///
    /// Clearance is the anchor's y minus the lowest body y. When it falls
    /// short, the trunk is lengthened by `branch_bottom_distance - clearance`,
    /// which leaves the clearance at exactly `branch_bottom_distance`. The
    /// trunk only ever grows.
    fn adjust_trunk(&mut self, candidate_bottom: f32) {
        let lowest_bottom = self
            .lowest
            .map_or(candidate_bottom, |id| self.glyphs[id].bottom().max(candidate_bottom));
        let Some(root) = self.glyphs.first_mut() else {
            return;
        };

        let clearance = root.anchor().y - lowest_bottom;
        let wanted = self.options.branch_bottom_distance;
        if clearance < wanted {
            let by = wanted - clearance;
            root.extend_trunk(by);
            debug!("extended root trunk by {by:.2}");
        }
    }

    /// Releases every glyph and resets the tree so that the next
    /// [`WordTree::grow`] starts from the same state as a fresh instance.
    pub fn chop(&mut self) {
        self.glyphs.clear();
        self.parents.clear();
        self.lowest = None;
        self.word.clear();
        self.position = Vec2::ZERO;
        self.rng = seeded_rng(self.options.seed);
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

impl Sprout for WordTree {
    fn paths(&self) -> Vec<Path> {
        self.glyphs
            .iter()
            .flat_map(|g| g.outlines().cloned())
            .collect()
    }

    fn bounds(&self) -> Option<Rect> {
        union_all(self.glyphs.iter().filter_map(Glyph::bounds))
    }

    fn trunk(&self) -> Option<&Path> {
        self.glyphs.first().map(Glyph::trunk)
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        let delta = position - self.position;
        self.transform(&Affine2::from_translation(delta));
    }

    fn transform(&mut self, t: &Affine2) {
        for glyph in &mut self.glyphs {
            glyph.transform(t);
        }
        self.position = t.transform_point2(self.position);
    }
}
