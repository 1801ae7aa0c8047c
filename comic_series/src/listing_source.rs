use std::sync::Arc;

use crate::http::{HttpClient, get_ok};
use crate::prelude::*;

/// Listing-mode series source backed by a contents API
/// (`GET <api_base>/<path>` returning `[{name, type, path}]`).
///
/// Every directory under `root_path` is a series; the allow-listed image
/// files inside it form that series' image list.
pub struct ListingSource {
    client: Arc<dyn HttpClient>,
    api_base: String,
    root_path: String,
}

impl ListingSource {
    pub fn new(
        client: Arc<dyn HttpClient>,
        api_base: impl Into<String>,
        root_path: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            root_path: root_path.into(),
        }
    }

    fn listing_url(&self, path: &str) -> String {
        let base = self.api_base.trim_end_matches('/');
        let path = path.trim_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }

    fn fetch_listing(&self, path: &str) -> Result<Vec<ListingEntry>, SourceError> {
        let url = self.listing_url(path);
        log::debug!("Fetching listing {}", url);
        let resp = get_ok(self.client.as_ref(), &url)
            .map_err(|e| SourceError::ListingFetch(e.to_string()))?;
        serde_json::from_slice(&resp.body)
            .map_err(|e| SourceError::ListingFetch(format!("{}: {}", url, e)))
    }

    fn folder_path(&self, entry: &ListingEntry) -> String {
        match &entry.path {
            Some(path) if !path.is_empty() => path.clone(),
            _ => {
                let root = self.root_path.trim_matches('/');
                if root.is_empty() {
                    entry.name.clone()
                } else {
                    format!("{}/{}", root, entry.name)
                }
            }
        }
    }
}

impl SeriesSource for ListingSource {
    fn load_series(&self) -> Result<SeriesLoad, SourceError> {
        let listing = self.fetch_listing(&self.root_path)?;
        let mut entries: Vec<SeriesEntry> = listing
            .iter()
            .filter(|e| e.kind == EntryKind::Dir)
            .map(|e| SeriesEntry {
                name: e.name.clone(),
                locator: Locator::Folder(FolderLocator {
                    remote_folder_path: self.folder_path(e),
                }),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        log::info!("Found {} series under '{}'", entries.len(), self.root_path);
        Ok(SeriesLoad {
            entries,
            origin: LoadOrigin::Remote,
            warnings: Vec::new(),
        })
    }

    fn list_images(&self, folder: &FolderLocator) -> Result<ImageList, SourceError> {
        let listing = self.fetch_listing(&folder.remote_folder_path)?;
        let images = ImageList::from_listing(&listing);
        log::debug!(
            "{} images in '{}'",
            images.len(),
            folder.remote_folder_path
        );
        Ok(images)
    }
}
