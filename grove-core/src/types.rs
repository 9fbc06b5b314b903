/// Identifier for a glyph in a [`crate::word_tree::WordTree`].
///
/// This is an index into the word tree's glyph list, in growth order, and is
/// only meaningful until the next `chop`.
pub type GlyphId = usize;

/// Identifier for a child of a [`crate::tree::Tree`].
///
/// Index into the tree's child list; the left/center/right groups store these
/// rather than owning the children.
pub type ChildId = usize;
