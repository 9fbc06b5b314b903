//! Growth, kerning and layout settings.
//!
//! Every struct deserializes from TOML with `#[serde(default)]`, so a config
//! file only needs the keys it wants to change:
//!
//! ```toml
//! [growth]
//! branch_bottom_distance = 6.0
//! growing_order = "randomized"
//! seed = 7
//!
//! [tree]
//! trunk_margin = 12.0
//! ```

use crate::error::GrowError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Order in which a glyph's branches are tried during growth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowingOrder {
    /// The order the font defines the branches in.
    #[default]
    Natural,
    Reversed,
    /// Shuffled per glyph; reproducible when [`GrowthOptions::seed`] is set.
    Randomized,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthOptions {
    /// Minimum clearance between the lowest glyph and the root's trunk start.
    /// The root trunk is extended whenever the clearance drops below this.
    pub branch_bottom_distance: f32,
    pub growing_order: GrowingOrder,
    /// Try the branch nearest the glyph's trunk first.
    pub start_at_trunk: bool,
    pub seed: Option<u64>,
    /// Longest word accepted; growth recursion is one level per character.
    pub max_depth: usize,
    /// Once a word tree holds this many glyphs no further candidates are tried.
    pub max_glyphs: usize,
}

impl Default for GrowthOptions {
    fn default() -> Self {
        Self {
            branch_bottom_distance: 4.0,
            growing_order: GrowingOrder::Natural,
            start_at_trunk: false,
            seed: None,
            max_depth: 64,
            max_glyphs: 512,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KerningOptions {
    /// Pixels per world unit used when rasterizing silhouettes.
    pub resolution: f32,
    /// Gap left between neighbouring silhouettes.
    pub padding: f32,
    /// Stroke width (world units) used when rasterizing paths.
    pub stroke_width: f32,
}

impl Default for KerningOptions {
    fn default() -> Self {
        Self {
            resolution: 2.0,
            padding: 2.0,
            stroke_width: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Extra trunk length below the taller side group.
    pub trunk_margin: f32,
    /// Side groups sit flush against a trunk of this width.
    pub trunk_width: f32,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            trunk_margin: 10.0,
            trunk_width: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub growth: GrowthOptions,
    pub kerning: KerningOptions,
    pub tree: TreeOptions,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, GrowError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GrowError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Loads `path` if given, falling back to defaults when it is missing or
    /// invalid.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        if let Some(path) = path {
            match Self::load(path) {
                Ok(cfg) => {
                    info!("Loaded config: {}", path.display());
                    return cfg;
                }
                Err(e) => warn!("Failed to load config {}: {}", path.display(), e),
            }
        }
        info!("Using built-in default config");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let cfg = Config::from_toml_str(
            r#"
            [growth]
            branch_bottom_distance = 6.5
            growing_order = "randomized"
            start_at_trunk = true
            seed = 7

            [tree]
            trunk_margin = 3.0
            "#,
        )
        .unwrap();

        assert_eq!(cfg.growth.branch_bottom_distance, 6.5);
        assert_eq!(cfg.growth.growing_order, GrowingOrder::Randomized);
        assert!(cfg.growth.start_at_trunk);
        assert_eq!(cfg.growth.seed, Some(7));
        assert_eq!(cfg.growth.max_glyphs, GrowthOptions::default().max_glyphs);
        assert_eq!(cfg.tree.trunk_margin, 3.0);
        assert_eq!(cfg.kerning, KerningOptions::default());
    }

    #[test]
    fn unknown_growing_order_is_rejected() {
        let err = Config::from_toml_str("[growth]\ngrowing_order = \"sideways\"").unwrap_err();
        assert!(matches!(err, GrowError::Config(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = Config::load_or_default(Some(Path::new("/nonexistent/grove.toml")));
        assert_eq!(cfg, Config::default());
    }
}
