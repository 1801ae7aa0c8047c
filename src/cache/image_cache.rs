//! LRU cache for decoded strips and async image loading.

use comic_series::http::{HttpClient, get_ok};

use crate::cache::disk_cache::DiskCache;
use crate::prelude::*;

/// A decoded strip, or the reason it could not be shown.
#[derive(Clone)]
pub enum PageImage {
    Static(DynamicImage),
    AnimatedGif {
        frames: Vec<egui::ColorImage>,
        delays: Vec<u16>,
        start_time: Instant,
    },
    /// Download or decode failed; drawn as a broken-image placeholder.
    Broken(String),
}

impl PageImage {
    /// Returns the dimensions of the image.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            PageImage::Static(img) => img.dimensions(),
            PageImage::AnimatedGif { frames, .. } => frames
                .first()
                .map(|f| (f.size[0] as u32, f.size[1] as u32))
                .unwrap_or((0, 0)),
            PageImage::Broken(_) => (0, 0),
        }
    }
}

/// A loaded strip, ready for display.
#[derive(Clone)]
pub struct LoadedImage {
    pub image: PageImage,
    pub url: String,
}

/// Shared LRU cache for images, keyed by URL.
pub type SharedImageCache = Arc<Mutex<LruCache<String, LoadedImage>>>;

pub fn new_image_cache(size: usize) -> SharedImageCache {
    let size = NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN);
    Arc::new(Mutex::new(LruCache::new(size)))
}

/// Decode every frame of a GIF. `None` for still GIFs and decode errors.
fn decode_gif(buf: &[u8]) -> Option<(Vec<egui::ColorImage>, Vec<u16>)> {
    let decoder = GifDecoder::new(Cursor::new(buf)).ok()?;
    let frames = decoder.into_frames().collect_frames().ok()?;

    let mut color_frames = Vec::with_capacity(frames.len());
    let mut delays = Vec::with_capacity(frames.len());

    for frame in frames {
        let (numer, denom) = frame.delay().numer_denom_ms();
        let delay = (numer / denom.max(1)).max(20);
        delays.push(delay.min(u16::MAX as u32) as u16);
        let buffer = frame.buffer();
        color_frames.push(egui::ColorImage::from_rgba_unmultiplied(
            [buffer.width() as usize, buffer.height() as usize],
            buffer.as_raw(),
        ));
    }
    if color_frames.len() > 1 {
        Some((color_frames, delays))
    } else {
        None
    }
}

/// Decode downloaded bytes into a displayable image.
pub fn decode_image(url: &str, buf: &[u8]) -> Result<PageImage, AppError> {
    let lower = url.to_lowercase();
    if lower.ends_with(".gif") {
        if let Some((frames, delays)) = decode_gif(buf) {
            return Ok(PageImage::AnimatedGif {
                frames,
                delays,
                start_time: Instant::now(),
            });
        }
    }
    Ok(PageImage::Static(image::load_from_memory(buf)?))
}

fn fetch_bytes(
    url: &str,
    client: &dyn HttpClient,
    disk: Option<&DiskCache>,
) -> Result<(Vec<u8>, bool), AppError> {
    if let Some(bytes) = disk.and_then(|d| d.read(url)) {
        return Ok((bytes, true));
    }
    let resp = get_ok(client, url)?;
    Ok((resp.body, false))
}

/// Download, decode and cache `url` unless it is cached or already loading.
/// Failures are cached as `PageImage::Broken` so the strip shows a placeholder.
pub async fn load_image_async(
    url: String,
    client: Arc<dyn HttpClient>,
    disk: Option<DiskCache>,
    image_lru: SharedImageCache,
    loading: Arc<Mutex<HashSet<String>>>,
    ctx: egui::Context,
) -> Result<(), AppError> {
    {
        let mut loading = loading
            .lock()
            .map_err(|e| AppError::Task(e.to_string()))?;
        if loading.contains(&url) {
            return Ok(());
        }
        if image_lru
            .lock()
            .map_err(|e| AppError::Task(e.to_string()))?
            .contains(&url)
        {
            return Ok(());
        }
        loading.insert(url.clone());
    }

    let task_url = url.clone();
    let result = tokio::task::spawn_blocking(move || {
        let (bytes, from_disk) = fetch_bytes(&task_url, client.as_ref(), disk.as_ref())?;
        let image = decode_image(&task_url, &bytes)?;
        if !from_disk {
            if let Some(disk) = &disk {
                if let Err(e) = disk.write(&task_url, &bytes) {
                    warn!("Failed to cache {} on disk: {}", task_url, e);
                }
            }
        }
        Ok::<_, AppError>(image)
    })
    .await
    .map_err(|e| AppError::Task(e.to_string()))
    .and_then(|r| r);

    let image = match result {
        Ok(image) => {
            debug!("Loaded {}", url);
            image
        }
        Err(e) => {
            warn!("Failed to load {}: {}", url, e);
            PageImage::Broken(e.to_string())
        }
    };

    if let Ok(mut lru) = image_lru.lock() {
        lru.put(
            url.clone(),
            LoadedImage {
                image,
                url: url.clone(),
            },
        );
    }
    if let Ok(mut loading) = loading.lock() {
        loading.remove(&url);
    }
    ctx.request_repaint();
    Ok(())
}
