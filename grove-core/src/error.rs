//! Error type for growing word trees and composite trees.

use thiserror::Error;

/// Failures that abort a growth call.
///
/// Geometric rejection of a candidate glyph is ordinary pruning and never
/// shows up here.
#[derive(Error, Debug)]
pub enum GrowError {
    #[error("no glyph definition for {0:?}")]
    GlyphNotFound(char),
    #[error("cannot grow an empty word")]
    EmptyWord,
    #[error("cannot grow a tree from empty content")]
    EmptyContent,
    #[error("word has {len} characters, the limit is {max}")]
    WordTooLong { len: usize, max: usize },
    #[error("unbalanced parenthesis at byte {0}")]
    UnbalancedGroup(usize),
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}
