pub use crate::error::SourceError;
pub use crate::model::{
    ConfigDocument, DateBasedLocator, EntryKind, FolderLocator, ImageList, ListingEntry, Locator,
    SeriesEntry,
};
pub use crate::{DateConfigSource, ListingSource, LoadOrigin, SeriesLoad, SeriesSource};
