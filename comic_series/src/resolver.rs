//! Turns a series and a cursor position into the URL of the image to show.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveTime};
use chrono::format::{Item, StrftimeItems};

use crate::cursor::{DateCursor, NavigationCursor};
use crate::prelude::*;

/// Format midnight of `date` with a strftime pattern, or `None` if the
/// pattern is invalid. Time fields render as zeros.
pub fn format_date(date: NaiveDate, pattern: &str) -> Option<String> {
    let items: Vec<Item> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut out = String::new();
    let midnight = date.and_time(NaiveTime::MIN);
    write!(out, "{}", midnight.format_with_items(items.into_iter())).ok()?;
    Some(out)
}

/// `base_url + formatted date + extension`. An unusable `date_format` falls
/// back to the ISO date.
pub fn date_url(locator: &DateBasedLocator, cursor: &DateCursor) -> String {
    let formatted = format_date(cursor.current(), &locator.date_format).unwrap_or_else(|| {
        log::warn!(
            "Invalid date format '{}', using {}",
            locator.date_format,
            cursor.iso()
        );
        cursor.iso()
    });
    format!("{}{}{}", locator.base_url, formatted, locator.extension)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    raw_base: String,
}

impl Resolver {
    /// `raw_base` is the raw-content host prefix for listed series.
    pub fn new(raw_base: impl Into<String>) -> Self {
        Self {
            raw_base: raw_base.into(),
        }
    }

    /// The image URL for the cursor position, if the cursor points at one.
    pub fn resolve(
        &self,
        series: &SeriesEntry,
        cursor: &NavigationCursor,
        images: &ImageList,
    ) -> Option<String> {
        match (&series.locator, cursor) {
            (Locator::Date(locator), NavigationCursor::Date(cursor)) => {
                Some(date_url(locator, cursor))
            }
            (Locator::Folder(folder), NavigationCursor::Index(cursor)) => {
                let name = images.get(cursor.index()?)?;
                Some(format!(
                    "{}/{}/{}",
                    self.raw_base.trim_end_matches('/'),
                    folder.remote_folder_path.trim_matches('/'),
                    name
                ))
            }
            _ => None,
        }
    }
}
