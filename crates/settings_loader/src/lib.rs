//! # Settings Loader
//!
//! Centralized settings loading for the ROI analyzer. Settings come from a
//! `settings.json` file (every field optional) and can then be overridden by
//! environment variables, which may themselves come from a `.env` file.
//!
//! ## Environment overrides
//!
//! - `ROI_STORAGE_DIR`: directory of the file-backed scenario store
//! - `ROI_SCENARIOS_KEY`: key the scenario collection is stored under
//! - `ROI_LOG`: fallback tracing filter
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Explicit path, then ./settings.json, then built-in defaults
//! let path = Some(PathBuf::from("config/settings.json"));
//! let settings = settings_loader::load_settings_with_fallback(path.as_ref())?;
//!
//! // Layer .env / environment variables on top
//! let settings = settings_loader::with_env_overrides(settings);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::Settings;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// An explicitly given path must load. Without one, `settings.json` in the
/// current directory is used when present, otherwise the defaults.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<Settings> {
    if let Some(settings) = load_optional_settings(path)? {
        return Ok(settings);
    }
    if settings_file_exists(DEFAULT_SETTINGS_FILE) {
        return load_settings(DEFAULT_SETTINGS_FILE);
    }
    Ok(Settings::default())
}

/// Applies overrides from a variable lookup
pub fn apply_env_overrides<F>(mut settings: Settings, lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = lookup("ROI_STORAGE_DIR").filter(|v| !v.trim().is_empty()) {
        settings.storage_dir = PathBuf::from(dir);
    }
    if let Some(key) = lookup("ROI_SCENARIOS_KEY").filter(|v| !v.trim().is_empty()) {
        settings.scenarios_key = key;
    }
    if let Some(filter) = lookup("ROI_LOG").filter(|v| !v.trim().is_empty()) {
        settings.log_filter = filter;
    }
    settings
}

/// Loads `.env` if present, then applies process environment overrides
pub fn with_env_overrides(settings: Settings) -> Settings {
    let _ = dotenvy::dotenv();
    apply_env_overrides(settings, |name| std::env::var(name).ok())
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}
