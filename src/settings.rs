//! User settings, read from `settings.toml`.
//!
//! The file lives in the platform config directory
//! (`<config_dir>/comic_viewer/settings.toml`) unless a path is given on the
//! command line. Every field is optional; missing fields take the defaults
//! below and a missing file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use comic_series::gesture::{DEFAULT_LATCH_DISTANCE, DEFAULT_RELEASE_THRESHOLD, SwipeConfig};
use serde::{Deserialize, Serialize};

use crate::config::*;
use crate::error::AppError;

/// Which kind of series source to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Date-templated URLs from a JSON config.
    Date,
    /// Folders listed through the contents API.
    Listing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: SourceMode,
    /// Remote JSON config (date mode).
    pub config_url: String,
    /// Local copy of the JSON config (date mode).
    pub local_config: PathBuf,
    /// Contents API base, e.g. `https://api.github.com/repos/<owner>/<repo>/contents`.
    pub api_base: String,
    /// Raw-content prefix for listed images.
    pub raw_base: String,
    /// Folder whose subfolders are the series (listing mode).
    pub root_path: String,
    pub cache_dir: PathBuf,
    /// Size cap of `cache_dir` in MiB; oldest files go first.
    pub disk_cache_max_mb: u64,
    pub http_timeout_secs: u64,
    pub swipe_latch_distance: f32,
    pub swipe_threshold: f32,
    pub image_cache_size: usize,
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.map(|dir| dir.join(APP_DIR)).unwrap_or_default()
}

impl Default for Settings {
    fn default() -> Self {
        let raw_base = format!(
            "https://raw.githubusercontent.com/{}/{}",
            DEFAULT_REPO, DEFAULT_BRANCH
        );
        Self {
            mode: SourceMode::Date,
            config_url: format!("{}/config.json", raw_base),
            local_config: app_dir(dirs::data_dir()).join("config.json"),
            api_base: format!("https://api.github.com/repos/{}/contents", DEFAULT_REPO),
            raw_base,
            root_path: DEFAULT_ROOT_PATH.to_string(),
            cache_dir: app_dir(dirs::cache_dir()).join("cache"),
            disk_cache_max_mb: DISK_CACHE_MAX_MB,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            swipe_latch_distance: DEFAULT_LATCH_DISTANCE,
            swipe_threshold: DEFAULT_RELEASE_THRESHOLD,
            image_cache_size: CACHE_SIZE,
        }
    }
}

impl Settings {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn disk_cache_max_bytes(&self) -> u64 {
        self.disk_cache_max_mb.saturating_mul(1024 * 1024)
    }

    pub fn swipe_config(&self) -> SwipeConfig {
        SwipeConfig {
            latch_distance: self.swipe_latch_distance,
            release_threshold: self.swipe_threshold,
        }
    }

    /// Replace out-of-range values with their defaults.
    fn sanitize(mut self) -> Self {
        let defaults = Settings::default();
        if !(self.swipe_latch_distance > 0.0) {
            log::warn!("swipe_latch_distance must be positive, using default");
            self.swipe_latch_distance = defaults.swipe_latch_distance;
        }
        if !(self.swipe_threshold > 0.0) {
            log::warn!("swipe_threshold must be positive, using default");
            self.swipe_threshold = defaults.swipe_threshold;
        }
        if self.http_timeout_secs == 0 {
            self.http_timeout_secs = defaults.http_timeout_secs;
        }
        if self.image_cache_size == 0 {
            self.image_cache_size = defaults.image_cache_size;
        }
        self
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}

/// Load from `path`, or from the default location when `None`.
/// A missing file yields the defaults.
pub fn load(path: Option<&Path>) -> Result<Settings, AppError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_path() {
            Some(path) => path,
            None => return Ok(Settings::default()),
        },
    };
    if !path.exists() {
        log::info!("No settings at {}, using defaults", path.display());
        return Ok(Settings::default());
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<Settings, AppError> {
    let content = fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)
        .map_err(|e| AppError::Settings(format!("{}: {}", path.display(), e)))?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings.sanitize())
}
