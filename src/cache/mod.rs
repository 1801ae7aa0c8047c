//! Image, texture and on-disk caching.

pub mod disk_cache;
pub mod image_cache;
pub mod texture_cache;
pub use disk_cache::DiskCache;
pub use image_cache::*;
pub use texture_cache::*;
