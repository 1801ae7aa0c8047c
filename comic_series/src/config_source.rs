use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::http::{HttpClient, get_ok};
use crate::prelude::*;

/// Date-mode series source: a remote JSON config, mirrored to a local file
/// which is used whenever the remote copy cannot be fetched.
pub struct DateConfigSource {
    client: Arc<dyn HttpClient>,
    config_url: String,
    local_path: PathBuf,
}

impl DateConfigSource {
    pub fn new(
        client: Arc<dyn HttpClient>,
        config_url: impl Into<String>,
        local_path: &Path,
    ) -> Self {
        Self {
            client,
            config_url: config_url.into(),
            local_path: local_path.to_path_buf(),
        }
    }

    fn fetch_remote(&self) -> Result<(ConfigDocument, Vec<SeriesEntry>), SourceError> {
        let resp = get_ok(self.client.as_ref(), &self.config_url)
            .map_err(|e| SourceError::ConfigFetch(e.to_string()))?;
        let doc = ConfigDocument::from_json(&resp.text())
            .map_err(|e| SourceError::ConfigFetch(format!("{}: {}", self.config_url, e)))?;
        let entries = doc.clone().into_entries()?;
        Ok((doc, entries))
    }

    fn read_local(&self) -> Result<Vec<SeriesEntry>, SourceError> {
        let text = fs::read_to_string(&self.local_path)?;
        ConfigDocument::from_json(&text)?.into_entries()
    }

    /// Write the document to the local cache file. Failures are logged only.
    fn save_local(&self, doc: &ConfigDocument) {
        let result = doc.to_json_pretty().and_then(|text| {
            if let Some(parent) = self.local_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&self.local_path, text)?;
            Ok(())
        });
        if let Err(e) = result {
            log::warn!(
                "Failed to save config to {}: {}",
                self.local_path.display(),
                e
            );
        }
    }

    fn apply_fallback(&self) -> Vec<SeriesEntry> {
        let doc = ConfigDocument::fallback();
        self.save_local(&doc);
        // The built-in document always validates.
        doc.into_entries().unwrap_or_default()
    }

    /// Remote first, then the local file, then the built-in demo entry.
    /// Never fails; the reasons for each fallback are kept in `warnings`.
    pub fn load(&self) -> SeriesLoad {
        let mut warnings = Vec::new();

        match self.fetch_remote() {
            Ok((doc, entries)) => {
                self.save_local(&doc);
                log::info!("Loaded remote config from {}", self.config_url);
                return SeriesLoad {
                    entries,
                    origin: LoadOrigin::Remote,
                    warnings,
                };
            }
            Err(e) => {
                log::warn!("Remote config unavailable: {}", e);
                warnings.push(e);
            }
        }

        if self.local_path.exists() {
            match self.read_local() {
                Ok(entries) => {
                    log::info!("Loaded local config from {}", self.local_path.display());
                    return SeriesLoad {
                        entries,
                        origin: LoadOrigin::LocalCache,
                        warnings,
                    };
                }
                Err(e) => {
                    log::warn!("Local config unreadable: {}", e);
                    warnings.push(e);
                }
            }
        }

        log::info!("Using built-in default config");
        SeriesLoad {
            entries: self.apply_fallback(),
            origin: LoadOrigin::Fallback,
            warnings,
        }
    }
}

impl SeriesSource for DateConfigSource {
    fn load_series(&self) -> Result<SeriesLoad, SourceError> {
        Ok(self.load())
    }
}
