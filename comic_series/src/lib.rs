//! Comic series sources, navigation and the viewer state machine.
//!
//! Two kinds of series are supported:
//! * date-templated strips described by a JSON config ([`DateConfigSource`]),
//! * folders of images discovered through a contents API ([`ListingSource`]).

pub mod cursor;
pub mod error;
pub mod gesture;
pub mod http;
pub mod model;
pub mod prelude;
pub mod resolver;
pub mod viewer;

mod config_source;
pub use config_source::DateConfigSource;

mod listing_source;
pub use listing_source::ListingSource;

#[cfg(test)]
mod test_utils;

use crate::prelude::*;

/// Where a series set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Remote,
    LocalCache,
    Fallback,
}

/// Result of loading the series set.
#[derive(Debug)]
pub struct SeriesLoad {
    pub entries: Vec<SeriesEntry>,
    pub origin: LoadOrigin,
    /// Errors that caused a fallback to a less fresh origin.
    pub warnings: Vec<SourceError>,
}

/// A provider of series and, for folder series, their image lists.
/// Implementations block; run them off the UI thread.
pub trait SeriesSource: Send + Sync {
    fn load_series(&self) -> Result<SeriesLoad, SourceError>;

    fn list_images(&self, _folder: &FolderLocator) -> Result<ImageList, SourceError> {
        Err(SourceError::Unsupported)
    }
}
