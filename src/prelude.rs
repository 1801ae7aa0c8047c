// std
pub use std::collections::HashSet;
pub use std::io::Cursor;
pub use std::num::NonZeroUsize;
pub use std::path::{Path, PathBuf};
pub use std::sync::{Arc, Mutex};
pub use std::time::{Duration, Instant};

// external crates
pub use eframe::{
    CreationContext,
    egui::{
        self, CentralPanel, Color32, ColorImage, Context, Layout, Pos2, Rect, RichText, Spinner,
        TextStyle, TextureHandle, Ui, Vec2,
    },
};
pub use image::codecs::gif::GifDecoder;
pub use image::{AnimationDecoder, DynamicImage, GenericImageView};
pub use log::{debug, warn};
pub use lru::LruCache;

// crate modules
pub use crate::{
    app::ComicViewerApp,
    cache::{
        DiskCache, LoadedImage, PageImage, SharedImageCache, TextureCache, load_image_async,
        new_image_cache,
    },
    config::*,
    error::AppError,
    ui::{
        draw_spinner, draw_strip,
        image::ZoomPan,
        log::{UiLogLevel, UiLogger},
    },
};
