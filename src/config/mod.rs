//! Configuration module for Grantsearch-RS
//!
//! Handles loading settings from YAML files and environment variables.
//! Settings are passed explicitly to whatever needs them; there is no global.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "GRANTSEARCH_SETTINGS_PATH";

/// Places a settings file is looked for, in order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("grantsearch-rs/settings.yml"));
    }
    paths
}

/// Load settings from the first file found, or defaults, then apply env
pub fn load() -> Result<Settings> {
    let explicit = std::env::var(SETTINGS_PATH_ENV).ok().map(PathBuf::from);
    let candidates = explicit.into_iter().chain(default_paths());
    load_from(candidates)
}

/// Load settings from the first existing path in `candidates`
pub fn load_from(candidates: impl IntoIterator<Item = PathBuf>) -> Result<Settings> {
    let mut settings = match candidates.into_iter().find(|p| p.exists()) {
        Some(path) => read(&path)?,
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    Ok(settings)
}

fn read(path: &Path) -> Result<Settings> {
    info!("Loading settings from: {}", path.display());
    Settings::from_file(path)
}
