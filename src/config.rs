//! Application-wide configuration constants.

pub const NAME: &str = concat!("Comic Viewer ", env!("CARGO_PKG_VERSION"));
/// Directory name under the platform config/cache/data dirs.
pub const APP_DIR: &str = "comic_viewer";
pub const SETTINGS_FILE: &str = "settings.toml";
/// Default window width.
pub const WIN_WIDTH: f32 = 480.0;
/// Default window height.
pub const WIN_HEIGHT: f32 = 860.0;
/// Number of decoded strips to keep in memory.
pub const CACHE_SIZE: usize = 20;
/// Size cap of the on-disk image cache, in MiB.
pub const DISK_CACHE_MAX_MB: u64 = 256;
/// Repository holding `config.json` and the `comics/` folders.
pub const DEFAULT_REPO: &str = "sagara939/Visualizzatore_vignette";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_ROOT_PATH: &str = "comics";
pub const HTTP_TIMEOUT_SECS: u64 = 10;
pub const MIN_ZOOM: f32 = 0.05;
pub const MAX_ZOOM: f32 = 5.0;
/// Seconds a status message stays in the bottom bar.
pub const LOG_TIMEOUT: u64 = 2;
/// Zoom change per point of mouse-wheel scroll.
pub const ZOOM_SENSITIVITY: f32 = 0.005;
