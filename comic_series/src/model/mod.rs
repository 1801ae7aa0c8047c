use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::SourceError;

/// Extensions accepted from a directory listing, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 5] = [".png", ".jpg", ".jpeg", ".gif", ".webp"];

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_EXTENSION: &str = ".png";

pub fn is_supported_image(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Recipe for a date-templated image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBasedLocator {
    pub base_url: String,
    pub date_format: String,
    pub extension: String,
    /// Oldest date `prev()` may reach. `None` leaves the past unbounded.
    pub earliest_date: Option<NaiveDate>,
}

/// A folder in the remote repository holding one image per strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderLocator {
    pub remote_folder_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Date(DateBasedLocator),
    Folder(FolderLocator),
}

/// A named comic strip together with the recipe for its image URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesEntry {
    pub name: String,
    pub locator: Locator,
}

impl SeriesEntry {
    pub fn folder(&self) -> Option<&FolderLocator> {
        match &self.locator {
            Locator::Folder(folder) => Some(folder),
            Locator::Date(_) => None,
        }
    }
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

/// One entry of the `series` array in the JSON config file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SeriesRecord {
    pub name: String,
    pub base_url: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_extension")]
    pub file_extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_date: Option<NaiveDate>,
}

/// The JSON config document: `{ "series": [ ... ] }`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub series: Vec<SeriesRecord>,
}

impl ConfigDocument {
    pub fn from_json(text: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SourceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The single demo entry written when neither the remote nor the local
    /// config can be read.
    pub fn fallback() -> Self {
        Self {
            series: vec![SeriesRecord {
                name: "Demo Series".to_string(),
                base_url: "https://example.com/comics/demo/".to_string(),
                date_format: DEFAULT_DATE_FORMAT.to_string(),
                file_extension: DEFAULT_EXTENSION.to_string(),
                earliest_date: None,
            }],
        }
    }

    /// Check every record and turn them into typed series entries.
    pub fn into_entries(self) -> Result<Vec<SeriesEntry>, SourceError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(self.series.len());
        for (i, record) in self.series.into_iter().enumerate() {
            let name = record.name.trim().to_string();
            if name.is_empty() {
                return Err(SourceError::InvalidConfig(format!(
                    "series #{} has an empty name",
                    i + 1
                )));
            }
            if record.base_url.trim().is_empty() {
                return Err(SourceError::InvalidConfig(format!(
                    "series '{}' has an empty base_url",
                    name
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(SourceError::InvalidConfig(format!(
                    "series '{}' is listed twice",
                    name
                )));
            }
            entries.push(SeriesEntry {
                name,
                locator: Locator::Date(DateBasedLocator {
                    base_url: record.base_url,
                    date_format: record.date_format,
                    extension: record.file_extension,
                    earliest_date: record.earliest_date,
                }),
            });
        }
        Ok(entries)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    #[serde(other)]
    Other,
}

/// One item of a contents-API directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub path: Option<String>,
}

/// Filenames of one series folder, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageList {
    names: Vec<String>,
}

impl ImageList {
    pub fn new(mut names: Vec<String>) -> Self {
        names.sort();
        Self { names }
    }

    /// Keep allow-listed image files from a listing and sort them.
    pub fn from_listing(entries: &[ListingEntry]) -> Self {
        let names = entries
            .iter()
            .filter(|e| e.kind == EntryKind::File && is_supported_image(&e.name))
            .map(|e| e.name.clone())
            .collect();
        Self::new(names)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            kind: EntryKind::File,
            path: None,
        }
    }

    #[test]
    fn listing_keeps_sorted_images_only() {
        let entries = vec![file("b.png"), file("a.png"), file("x.txt")];
        let list = ImageList::from_listing(&entries);
        assert_eq!(list.names(), &["a.png".to_string(), "b.png".to_string()]);
    }

    #[test]
    fn listing_extension_check_ignores_case() {
        let entries = vec![
            file("2024-01-02.JPG"),
            file("2024-01-01.WebP"),
            ListingEntry {
                name: "2023.png".to_string(),
                kind: EntryKind::Dir,
                path: None,
            },
        ];
        let list = ImageList::from_listing(&entries);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0), Some("2024-01-01.WebP"));
        assert_eq!(list.get(1), Some("2024-01-02.JPG"));
    }

    #[test]
    fn listing_entry_parses_contents_api_shape() {
        let json = r#"[
            {"name": "garfield", "path": "comics/garfield", "type": "dir", "sha": "abc"},
            {"name": "README.md", "path": "comics/README.md", "type": "file"},
            {"name": "link", "type": "symlink"}
        ]"#;
        let entries: Vec<ListingEntry> = serde_json::from_str(json).expect("valid listing");
        assert_eq!(entries[0].kind, EntryKind::Dir);
        assert_eq!(entries[0].path.as_deref(), Some("comics/garfield"));
        assert_eq!(entries[1].kind, EntryKind::File);
        assert_eq!(entries[2].kind, EntryKind::Other);
    }

    #[test]
    fn config_record_fills_missing_format_and_extension() {
        let doc = ConfigDocument::from_json(
            r#"{"series": [{"name": "Strip", "base_url": "https://s/"}]}"#,
        )
        .expect("valid config");
        let entries = doc.into_entries().expect("valid entries");
        match &entries[0].locator {
            Locator::Date(loc) => {
                assert_eq!(loc.date_format, "%Y-%m-%d");
                assert_eq!(loc.extension, ".png");
                assert_eq!(loc.earliest_date, None);
            }
            other => panic!("unexpected locator {:?}", other),
        }
    }

    #[test]
    fn config_without_series_key_is_empty() {
        let doc = ConfigDocument::from_json("{}").expect("valid config");
        assert!(doc.into_entries().expect("valid entries").is_empty());
    }

    #[test]
    fn config_rejects_duplicate_names() {
        let doc = ConfigDocument::from_json(
            r#"{"series": [
                {"name": "A", "base_url": "https://a/"},
                {"name": "A", "base_url": "https://b/"}
            ]}"#,
        )
        .expect("valid json");
        assert!(matches!(
            doc.into_entries(),
            Err(SourceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_rejects_missing_base_url() {
        assert!(ConfigDocument::from_json(r#"{"series": [{"name": "A"}]}"#).is_err());
        let doc = ConfigDocument::from_json(r#"{"series": [{"name": "A", "base_url": " "}]}"#)
            .expect("valid json");
        assert!(doc.into_entries().is_err());
    }

    #[test]
    fn earliest_date_parses_iso_string() {
        let doc = ConfigDocument::from_json(
            r#"{"series": [
                {"name": "A", "base_url": "https://a/", "earliest_date": "1978-06-19"}
            ]}"#,
        )
        .expect("valid json");
        assert_eq!(
            doc.series[0].earliest_date,
            NaiveDate::from_ymd_opt(1978, 6, 19)
        );
    }
}
