//! Viewer state machine.
//!
//! `Viewer` owns the series set, the selection, the image list and the
//! navigation cursor. UI and network code feed it [`Event`]s and carry out
//! the [`Effect`]s it returns; it never performs I/O itself.

use chrono::NaiveDate;

use crate::cursor::{DateCursor, IndexCursor, NavigationCursor, Step};
use crate::gesture::Swipe;
use crate::prelude::*;
use crate::resolver::Resolver;

/// Identifies one series or listing fetch so late answers can be told apart.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
}

#[derive(Debug)]
pub enum Event {
    SeriesLoaded {
        request: RequestId,
        result: Result<SeriesLoad, SourceError>,
    },
    SelectSeries(String),
    ListingLoaded {
        request: RequestId,
        result: Result<ImageList, SourceError>,
    },
    Refresh,
    Navigate(Command),
    Swipe(Swipe),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoFutureContent,
    Refreshing,
    /// The series set did not come from the remote config; `reason` says why.
    ConfigFallback { origin: LoadOrigin, reason: String },
    SeriesFailed(String),
    ListingFailed(String),
    EmptySeries(String),
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::NoFutureContent | Notice::Refreshing => NoticeLevel::Info,
            Notice::ConfigFallback { .. } | Notice::EmptySeries(_) => NoticeLevel::Warning,
            Notice::SeriesFailed(_) | Notice::ListingFailed(_) => NoticeLevel::Error,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::NoFutureContent => "No future strip available".to_string(),
            Notice::Refreshing => "Refreshing series...".to_string(),
            Notice::ConfigFallback { origin, reason } => {
                let using = match origin {
                    LoadOrigin::LocalCache => "using local copy",
                    _ => "using default series",
                };
                if reason.is_empty() {
                    format!("Remote config unavailable, {}", using)
                } else {
                    format!("Remote config unavailable ({}), {}", reason, using)
                }
            }
            Notice::SeriesFailed(e) => format!("Failed to load series: {}", e),
            Notice::ListingFailed(e) => format!("Failed to load listing: {}", e),
            Notice::EmptySeries(name) => format!("No images in '{}'", name),
        }
    }
}

/// What the display surface should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    pub series: String,
    pub url: String,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load the series set. Supersedes any earlier series request.
    FetchSeries { request: RequestId },
    /// Fetch a folder listing. Supersedes any earlier listing request.
    FetchListing {
        request: RequestId,
        folder: FolderLocator,
    },
    /// Load the image and reset zoom and pan.
    Show(Display),
    ClearImage,
    Notice(Notice),
}

pub struct Viewer {
    resolver: Resolver,
    series: Vec<SeriesEntry>,
    selected: Option<usize>,
    cursor: NavigationCursor,
    images: ImageList,
    selector_error: Option<&'static str>,
    pending_series: Option<RequestId>,
    pending_listing: Option<RequestId>,
    next_request: RequestId,
}

impl Viewer {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            series: Vec::new(),
            selected: None,
            cursor: NavigationCursor::Empty,
            images: ImageList::default(),
            selector_error: None,
            pending_series: None,
            pending_listing: None,
            next_request: 0,
        }
    }

    /// Effects to run once at startup.
    pub fn start(&mut self) -> Vec<Effect> {
        vec![self.fetch_series()]
    }

    pub fn handle(&mut self, event: Event, today: NaiveDate) -> Vec<Effect> {
        match event {
            Event::Refresh => vec![Effect::Notice(Notice::Refreshing), self.fetch_series()],
            Event::SeriesLoaded { request, result } => {
                self.on_series_loaded(request, result, today)
            }
            Event::SelectSeries(name) => match self.position_of(&name) {
                Some(index) => self.select_index(index, today),
                None => {
                    log::debug!("Ignoring selection of unknown series '{}'", name);
                    Vec::new()
                }
            },
            Event::ListingLoaded { request, result } => self.on_listing_loaded(request, result),
            Event::Navigate(command) => self.navigate(command, today),
            Event::Swipe(swipe) => match swipe.command() {
                Some(command) => self.navigate(command, today),
                None => Vec::new(),
            },
        }
    }

    pub fn series(&self) -> &[SeriesEntry] {
        &self.series
    }

    pub fn selected(&self) -> Option<&SeriesEntry> {
        self.selected.and_then(|i| self.series.get(i))
    }

    pub fn cursor(&self) -> &NavigationCursor {
        &self.cursor
    }

    pub fn images(&self) -> &ImageList {
        &self.images
    }

    pub fn is_loading_series(&self) -> bool {
        self.pending_series.is_some()
    }

    pub fn is_loading_listing(&self) -> bool {
        self.pending_listing.is_some()
    }

    /// Text for the series selector: an error marker after a failed fetch,
    /// otherwise the selected series name.
    pub fn selector_label(&self) -> String {
        if let Some(label) = self.selector_error {
            return label.to_string();
        }
        match self.selected() {
            Some(series) => series.name.clone(),
            None if self.is_loading_series() => "Loading...".to_string(),
            None => "Select series".to_string(),
        }
    }

    pub fn position_label(&self) -> Option<String> {
        self.cursor.position_label()
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.series.iter().position(|s| s.name == name)
    }

    fn take_request_id(&mut self) -> RequestId {
        let request = self.next_request;
        self.next_request += 1;
        request
    }

    fn fetch_series(&mut self) -> Effect {
        let request = self.take_request_id();
        self.pending_series = Some(request);
        Effect::FetchSeries { request }
    }

    fn on_series_loaded(
        &mut self,
        request: RequestId,
        result: Result<SeriesLoad, SourceError>,
        today: NaiveDate,
    ) -> Vec<Effect> {
        if self.pending_series != Some(request) {
            log::debug!("Dropping stale series response #{}", request);
            return Vec::new();
        }
        self.pending_series = None;
        let load = match result {
            Ok(load) => load,
            Err(e) => {
                self.selector_error = Some(e.selector_label());
                return vec![Effect::Notice(Notice::SeriesFailed(e.to_string()))];
            }
        };

        let mut effects = Vec::new();
        if load.origin != LoadOrigin::Remote {
            let reason = load
                .warnings
                .iter()
                .map(|w| w.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            effects.push(Effect::Notice(Notice::ConfigFallback {
                origin: load.origin,
                reason,
            }));
        }

        let previous = self.selected().map(|s| s.name.clone());
        self.series = load.entries;
        self.selector_error = None;

        let index = previous
            .and_then(|name| self.position_of(&name))
            .or(if self.series.is_empty() { None } else { Some(0) });

        match index {
            Some(index) => effects.extend(self.select_index(index, today)),
            None => {
                self.selected = None;
                self.cursor = NavigationCursor::Empty;
                self.images = ImageList::default();
                self.pending_listing = None;
                effects.push(Effect::ClearImage);
            }
        }
        effects
    }

    fn select_index(&mut self, index: usize, today: NaiveDate) -> Vec<Effect> {
        let reselect = self.selected == Some(index);
        self.selected = Some(index);
        let series = &self.series[index];
        log::info!("Selected series '{}'", series.name);

        match &series.locator {
            Locator::Date(locator) => {
                self.pending_listing = None;
                self.images = ImageList::default();
                self.cursor = NavigationCursor::Date(DateCursor::new(today, locator.earliest_date));
                vec![self.show()]
            }
            Locator::Folder(folder) => {
                let folder = folder.clone();
                let request = self.take_request_id();
                self.pending_listing = Some(request);

                let mut effects = Vec::new();
                // Re-selecting keeps the current list on screen until the
                // new one arrives (or fails).
                if !reselect {
                    self.images = ImageList::default();
                    self.cursor = NavigationCursor::Empty;
                    effects.push(Effect::ClearImage);
                }
                effects.push(Effect::FetchListing { request, folder });
                effects
            }
        }
    }

    fn on_listing_loaded(
        &mut self,
        request: RequestId,
        result: Result<ImageList, SourceError>,
    ) -> Vec<Effect> {
        if self.pending_listing != Some(request) {
            log::debug!("Dropping stale listing response #{}", request);
            return Vec::new();
        }
        self.pending_listing = None;

        match result {
            Ok(images) => {
                self.selector_error = None;
                self.cursor = NavigationCursor::Index(IndexCursor::new(images.len()));
                self.images = images;
                if self.images.is_empty() {
                    let name = self.selected().map(|s| s.name.clone()).unwrap_or_default();
                    vec![Effect::ClearImage, Effect::Notice(Notice::EmptySeries(name))]
                } else {
                    vec![self.show()]
                }
            }
            Err(e) => {
                self.selector_error = Some(e.selector_label());
                vec![Effect::Notice(Notice::ListingFailed(e.to_string()))]
            }
        }
    }

    fn navigate(&mut self, command: Command, today: NaiveDate) -> Vec<Effect> {
        if !self.cursor.is_positioned() {
            return Vec::new();
        }
        let step = match command {
            Command::Next => self.cursor.next(today),
            Command::Prev => self.cursor.prev(),
        };
        match step {
            Step::Moved => vec![self.show()],
            Step::NoFutureContent => vec![Effect::Notice(Notice::NoFutureContent)],
            Step::Unchanged => Vec::new(),
        }
    }

    fn show(&self) -> Effect {
        let Some(series) = self.selected() else {
            return Effect::ClearImage;
        };
        match (
            self.resolver.resolve(series, &self.cursor, &self.images),
            self.cursor.position_label(),
        ) {
            (Some(url), Some(position)) => {
                log::debug!("Showing {}", url);
                Effect::Show(Display {
                    series: series.name.clone(),
                    url,
                    position,
                })
            }
            _ => Effect::ClearImage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "https://raw.example.com/me/strips/main";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).expect("valid date")
    }

    fn folder_series(name: &str) -> SeriesEntry {
        SeriesEntry {
            name: name.to_string(),
            locator: Locator::Folder(FolderLocator {
                remote_folder_path: format!("comics/{}", name),
            }),
        }
    }

    fn date_series(name: &str) -> SeriesEntry {
        SeriesEntry {
            name: name.to_string(),
            locator: Locator::Date(DateBasedLocator {
                base_url: format!("https://{}/", name),
                date_format: "%Y%m%d".to_string(),
                extension: ".png".to_string(),
                earliest_date: None,
            }),
        }
    }

    fn series_request(effects: &[Effect]) -> RequestId {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::FetchSeries { request } => Some(*request),
                _ => None,
            })
            .expect("series fetch requested")
    }

    fn remote(entries: Vec<SeriesEntry>) -> Result<SeriesLoad, SourceError> {
        Ok(SeriesLoad {
            entries,
            origin: LoadOrigin::Remote,
            warnings: Vec::new(),
        })
    }

    /// Refresh and answer the resulting series fetch with `entries`.
    fn load(viewer: &mut Viewer, entries: Vec<SeriesEntry>) -> Vec<Effect> {
        let request = series_request(&viewer.handle(Event::Refresh, today()));
        viewer.handle(
            Event::SeriesLoaded {
                request,
                result: remote(entries),
            },
            today(),
        )
    }

    fn images(names: &[&str]) -> ImageList {
        ImageList::new(names.iter().map(|n| n.to_string()).collect())
    }

    fn listing_request(effects: &[Effect]) -> (RequestId, String) {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::FetchListing { request, folder } => {
                    Some((*request, folder.remote_folder_path.clone()))
                }
                _ => None,
            })
            .expect("listing fetch requested")
    }

    fn shown(effects: &[Effect]) -> Option<&Display> {
        effects.iter().find_map(|e| match e {
            Effect::Show(display) => Some(display),
            _ => None,
        })
    }

    #[test]
    fn start_requests_series() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        let effects = viewer.start();
        assert!(matches!(effects.as_slice(), [Effect::FetchSeries { .. }]));
        assert!(viewer.is_loading_series());
        assert_eq!(viewer.selector_label(), "Loading...");
    }

    #[test]
    fn date_series_shows_today_on_load() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        let effects = load(&mut viewer, vec![date_series("a"), date_series("b")]);
        let display = shown(&effects).expect("image shown");
        assert_eq!(display.url, "https://a/20240105.png");
        assert_eq!(display.position, "2024-01-05");
        assert_eq!(viewer.selector_label(), "a");
    }

    #[test]
    fn date_next_at_today_emits_notice() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        load(&mut viewer, vec![date_series("a")]);
        let effects = viewer.handle(Event::Navigate(Command::Next), today());
        assert_eq!(effects, vec![Effect::Notice(Notice::NoFutureContent)]);
        assert_eq!(viewer.position_label().as_deref(), Some("2024-01-05"));
    }

    #[test]
    fn swipe_right_goes_to_previous_day() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        load(&mut viewer, vec![date_series("a")]);
        let effects = viewer.handle(Event::Swipe(Swipe::Right), today());
        assert_eq!(
            shown(&effects).map(|d| d.url.as_str()),
            Some("https://a/20240104.png")
        );
        assert!(viewer.handle(Event::Swipe(Swipe::None), today()).is_empty());
    }

    #[test]
    fn selecting_other_series_resets_date() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        load(&mut viewer, vec![date_series("a"), date_series("b")]);
        viewer.handle(Event::Navigate(Command::Prev), today());
        viewer.handle(Event::Navigate(Command::Prev), today());

        let effects = viewer.handle(Event::SelectSeries("b".to_string()), today());
        assert_eq!(
            shown(&effects).map(|d| d.url.as_str()),
            Some("https://b/20240105.png")
        );
    }

    #[test]
    fn unknown_series_is_ignored() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        load(&mut viewer, vec![date_series("a")]);
        viewer.handle(Event::Navigate(Command::Prev), today());
        assert!(viewer.handle(Event::SelectSeries("zzz".to_string()), today()).is_empty());
        assert_eq!(viewer.position_label().as_deref(), Some("2024-01-04"));
    }

    #[test]
    fn selecting_b_fetches_its_listing() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        let effects = load(&mut viewer, vec![folder_series("A"), folder_series("B")]);
        let (first, path) = listing_request(&effects);
        assert_eq!(path, "comics/A");
        viewer.handle(
            Event::ListingLoaded {
                request: first,
                result: Ok(images(&["1.png", "2.png"])),
            },
            today(),
        );
        viewer.handle(Event::Navigate(Command::Next), today());
        assert_eq!(viewer.position_label().as_deref(), Some("2/2"));

        let effects = viewer.handle(Event::SelectSeries("B".to_string()), today());
        let (second, path) = listing_request(&effects);
        assert_eq!(path, "comics/B");
        assert_ne!(first, second);
        assert!(effects.contains(&Effect::ClearImage));
        assert_eq!(*viewer.cursor(), NavigationCursor::Empty);

        let effects = viewer.handle(
            Event::ListingLoaded {
                request: second,
                result: Ok(images(&["b.png", "a.png"])),
            },
            today(),
        );
        let display = shown(&effects).expect("image shown");
        assert_eq!(display.url, format!("{}/comics/B/a.png", RAW));
        assert_eq!(display.position, "1/2");
    }

    #[test]
    fn stale_listing_is_dropped() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        let effects = load(&mut viewer, vec![folder_series("A"), folder_series("B")]);
        let (stale, _) = listing_request(&effects);
        let effects = viewer.handle(Event::SelectSeries("B".to_string()), today());
        let (current, _) = listing_request(&effects);

        let effects = viewer.handle(
            Event::ListingLoaded {
                request: stale,
                result: Ok(images(&["old.png"])),
            },
            today(),
        );
        assert!(effects.is_empty());
        assert!(viewer.images().is_empty());
        assert!(viewer.is_loading_listing());

        viewer.handle(
            Event::ListingLoaded {
                request: current,
                result: Ok(images(&["new.png"])),
            },
            today(),
        );
        assert_eq!(viewer.images().get(0), Some("new.png"));
    }

    #[test]
    fn index_navigation_clamps_silently() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        let effects = load(&mut viewer, vec![folder_series("A")]);
        let (request, _) = listing_request(&effects);
        viewer.handle(
            Event::ListingLoaded {
                request,
                result: Ok(images(&["1.png", "2.png"])),
            },
            today(),
        );
        assert!(viewer.handle(Event::Navigate(Command::Prev), today()).is_empty());
        assert!(shown(&viewer.handle(Event::Swipe(Swipe::Left), today())).is_some());
        assert!(viewer.handle(Event::Navigate(Command::Next), today()).is_empty());
        assert_eq!(viewer.position_label().as_deref(), Some("2/2"));
    }

    #[test]
    fn empty_listing_clears_and_warns() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        let effects = load(&mut viewer, vec![folder_series("A")]);
        let (request, _) = listing_request(&effects);
        let effects = viewer.handle(
            Event::ListingLoaded {
                request,
                result: Ok(ImageList::default()),
            },
            today(),
        );
        assert_eq!(
            effects,
            vec![
                Effect::ClearImage,
                Effect::Notice(Notice::EmptySeries("A".to_string()))
            ]
        );
        assert!(viewer.handle(Event::Navigate(Command::Next), today()).is_empty());
    }

    #[test]
    fn listing_failure_keeps_previous_list() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        let effects = load(&mut viewer, vec![folder_series("A")]);
        let (request, _) = listing_request(&effects);
        viewer.handle(
            Event::ListingLoaded {
                request,
                result: Ok(images(&["1.png", "2.png"])),
            },
            today(),
        );
        viewer.handle(Event::Navigate(Command::Next), today());

        // Refresh re-selects the same series and refetches its folder.
        viewer.handle(Event::Refresh, today());
        let effects = load(&mut viewer, vec![folder_series("A")]);
        let (request, _) = listing_request(&effects);
        assert!(!effects.contains(&Effect::ClearImage));

        let effects = viewer.handle(
            Event::ListingLoaded {
                request,
                result: Err(SourceError::ListingFetch("timeout".to_string())),
            },
            today(),
        );
        assert!(matches!(
            effects.as_slice(),
            [Effect::Notice(Notice::ListingFailed(_))]
        ));
        assert_eq!(viewer.images().len(), 2);
        assert_eq!(viewer.position_label().as_deref(), Some("2/2"));
        assert_eq!(viewer.selector_label(), "Listing error");
    }

    #[test]
    fn series_failure_keeps_previous_set() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        load(&mut viewer, vec![date_series("a")]);
        viewer.handle(Event::Navigate(Command::Prev), today());

        let effects = viewer.handle(Event::Refresh, today());
        assert_eq!(effects[0], Effect::Notice(Notice::Refreshing));
        let request = series_request(&effects);
        viewer.handle(
            Event::SeriesLoaded {
                request,
                result: Err(SourceError::ListingFetch("offline".to_string())),
            },
            today(),
        );
        assert!(!viewer.is_loading_series());
        assert_eq!(viewer.series().len(), 1);
        assert_eq!(viewer.position_label().as_deref(), Some("2024-01-04"));
        assert_eq!(viewer.selector_label(), "Listing error");

        // A later successful load clears the marker.
        load(&mut viewer, vec![date_series("a")]);
        assert_eq!(viewer.selector_label(), "a");
    }

    #[test]
    fn refresh_keeps_selected_series_and_resets_cursor() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        load(&mut viewer, vec![date_series("a"), date_series("b")]);
        viewer.handle(Event::SelectSeries("b".to_string()), today());
        viewer.handle(Event::Navigate(Command::Prev), today());

        let effects = load(&mut viewer, vec![date_series("a"), date_series("b")]);
        let display = shown(&effects).expect("image shown");
        assert_eq!(display.series, "b");
        assert_eq!(display.position, "2024-01-05");
    }

    #[test]
    fn fallback_config_is_announced() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        let request = series_request(&viewer.start());
        let effects = viewer.handle(
            Event::SeriesLoaded {
                request,
                result: Ok(SeriesLoad {
                    entries: vec![date_series("a")],
                    origin: LoadOrigin::LocalCache,
                    warnings: vec![SourceError::ConfigFetch("404".to_string())],
                }),
            },
            today(),
        );
        let Effect::Notice(notice) = &effects[0] else {
            panic!("expected a notice first, got {:?}", effects);
        };
        assert_eq!(notice.level(), NoticeLevel::Warning);
        assert!(notice.message().contains("404"));
        assert!(notice.message().ends_with("using local copy"));
        assert!(shown(&effects).is_some());
    }

    #[test]
    fn empty_series_set_clears_selection() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        load(&mut viewer, vec![date_series("a")]);
        let effects = load(&mut viewer, Vec::new());
        assert_eq!(effects, vec![Effect::ClearImage]);
        assert!(viewer.selected().is_none());
        assert_eq!(viewer.selector_label(), "Select series");
        assert!(viewer.handle(Event::Navigate(Command::Prev), today()).is_empty());
    }

    #[test]
    fn older_series_answer_is_dropped() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        let first = series_request(&viewer.start());
        let second = series_request(&viewer.handle(Event::Refresh, today()));
        assert_ne!(first, second);

        viewer.handle(
            Event::SeriesLoaded {
                request: second,
                result: remote(vec![date_series("new")]),
            },
            today(),
        );
        let effects = viewer.handle(
            Event::SeriesLoaded {
                request: first,
                result: remote(vec![date_series("old")]),
            },
            today(),
        );
        assert!(effects.is_empty());
        assert_eq!(viewer.series().len(), 1);
        assert_eq!(viewer.series()[0].name, "new");
        assert!(!viewer.is_loading_series());
    }

    #[test]
    fn series_stays_loading_until_latest_answer() {
        let mut viewer = Viewer::new(Resolver::new(RAW));
        let first = series_request(&viewer.start());
        let second = series_request(&viewer.handle(Event::Refresh, today()));

        viewer.handle(
            Event::SeriesLoaded {
                request: first,
                result: remote(vec![date_series("old")]),
            },
            today(),
        );
        assert!(viewer.is_loading_series());
        assert!(viewer.series().is_empty());

        viewer.handle(
            Event::SeriesLoaded {
                request: second,
                result: remote(vec![date_series("new")]),
            },
            today(),
        );
        assert!(!viewer.is_loading_series());
        assert_eq!(viewer.selector_label(), "new");
    }
}
