//! Application entry point for the word tree viewer.
//!
//! Sets up logging, loads an optional TOML config given as the first
//! argument and hands everything else to [`Viewer`].

mod viewer;

use anyhow::anyhow;
use grove_core::config::Config;
use std::path::PathBuf;
use viewer::Viewer;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = Config::load_or_default(config_path.as_deref());

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Word Trees",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(cfg)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
