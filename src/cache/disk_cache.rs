//! On-disk copy of downloaded strip bytes.

use std::time::SystemTime;

use base64ct::{Base64UrlUnpadded, Encoding};

use crate::prelude::*;

/// Longest file name we create; longer URLs are simply not cached.
const MAX_NAME_LEN: usize = 200;

/// Bytes of fetched images, one file per URL. File names are the URL in
/// URL-safe base64, so no two URLs share a file. The directory is kept under
/// `max_bytes` by deleting the oldest files.
#[derive(Clone, Debug)]
pub struct DiskCache {
    dir: PathBuf,
    max_bytes: u64,
}

impl DiskCache {
    /// Create the cache directory if needed and trim it to `max_bytes`.
    pub fn create(dir: &Path, max_bytes: u64) -> Result<Self, AppError> {
        std::fs::create_dir_all(dir)?;
        debug!("Image cache directory {}", dir.display());
        let cache = Self {
            dir: dir.to_path_buf(),
            max_bytes,
        };
        cache.prune(None)?;
        Ok(cache)
    }

    fn path_for(&self, url: &str) -> Option<PathBuf> {
        let name = Base64UrlUnpadded::encode_string(url.as_bytes());
        (name.len() <= MAX_NAME_LEN).then(|| self.dir.join(name))
    }

    pub fn read(&self, url: &str) -> Option<Vec<u8>> {
        let path = self.path_for(url)?;
        let bytes = std::fs::read(path).ok()?;
        debug!("Disk cache hit for {}", url);
        Some(bytes)
    }

    pub fn write(&self, url: &str, bytes: &[u8]) -> Result<(), AppError> {
        if let Some(path) = self.path_for(url) {
            std::fs::write(&path, bytes)?;
            self.prune(Some(&path))?;
        }
        Ok(())
    }

    /// Delete the oldest files until the directory fits in `max_bytes`.
    /// `keep` is never deleted.
    fn prune(&self, keep: Option<&Path>) -> Result<(), AppError> {
        let mut files: Vec<(SystemTime, u64, PathBuf)> = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            if !meta.is_file() {
                continue;
            }
            let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((modified, meta.len(), entry.path()));
        }

        let mut total: u64 = files.iter().map(|(_, len, _)| len).sum();
        if total <= self.max_bytes {
            return Ok(());
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));
        for (_, len, path) in files {
            if total <= self.max_bytes {
                break;
            }
            if Some(path.as_path()) == keep {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    debug!("Evicted {} from disk cache", path.display());
                    total = total.saturating_sub(len);
                }
                Err(e) => warn!("Failed to evict {}: {}", path.display(), e),
            }
        }
        Ok(())
    }
}
