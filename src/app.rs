//! Main application state and logic.

use comic_series::gesture::SwipeRecognizer;
use comic_series::http::{HttpClient, ReqwestClient};
use comic_series::resolver::Resolver;
use comic_series::viewer::{Command, Display, Effect, Event, Viewer};
use comic_series::{DateConfigSource, ListingSource, SeriesSource};

use crate::fetch::FetchWorker;
use crate::prelude::*;
use crate::settings::{Settings, SourceMode};

/// The main application struct, holding all state.
pub struct ComicViewerApp {
    pub settings: Settings,
    pub viewer: Viewer,
    worker: FetchWorker,
    http: Arc<dyn HttpClient>,
    disk_cache: Option<DiskCache>,
    pub image_lru: SharedImageCache,
    pub loading_images: Arc<Mutex<HashSet<String>>>,
    pub texture_cache: TextureCache,
    pub ui_logger: UiLogger,
    /// Strip the viewer asked us to show.
    pub display: Option<Display>,
    pub view: ZoomPan,
    pub swipe: SwipeRecognizer,
    title: String,
}

fn build_source(settings: &Settings, http: Arc<dyn HttpClient>) -> Arc<dyn SeriesSource> {
    match settings.mode {
        SourceMode::Date => Arc::new(DateConfigSource::new(
            http,
            settings.config_url.clone(),
            &settings.local_config,
        )),
        SourceMode::Listing => Arc::new(ListingSource::new(
            http,
            settings.api_base.clone(),
            settings.root_path.clone(),
        )),
    }
}

impl ComicViewerApp {
    pub fn new(cc: &CreationContext, settings: Settings) -> Result<Self, AppError> {
        crate::ui::setup_visuals(&cc.egui_ctx);

        let http: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new(settings.http_timeout())?);
        let source = build_source(&settings, http.clone());

        let mut ui_logger = UiLogger::new();
        let cache_cap = settings.disk_cache_max_bytes();
        let disk_cache = match DiskCache::create(&settings.cache_dir, cache_cap) {
            Ok(cache) => Some(cache),
            Err(e) => {
                ui_logger.warn(format!("Image cache disabled: {}", e), None);
                None
            }
        };

        let mut app = Self {
            viewer: Viewer::new(Resolver::new(settings.raw_base.clone())),
            worker: FetchWorker::new(source, cc.egui_ctx.clone()),
            http,
            disk_cache,
            image_lru: new_image_cache(settings.image_cache_size),
            loading_images: Arc::new(Mutex::new(HashSet::new())),
            texture_cache: TextureCache::new(),
            ui_logger,
            display: None,
            view: ZoomPan::default(),
            swipe: SwipeRecognizer::new(settings.swipe_config()),
            title: String::new(),
            settings,
        };
        let effects = app.viewer.start();
        app.apply(effects);
        Ok(app)
    }

    /// Feed one event to the viewer and carry out what it asks for.
    pub fn dispatch(&mut self, event: Event) {
        let today = chrono::Local::now().date_naive();
        let effects = self.viewer.handle(event, today);
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchSeries { request } => self.worker.fetch_series(request),
                Effect::FetchListing { request, folder } => {
                    self.worker.fetch_listing(request, folder)
                }
                Effect::Show(display) => {
                    debug!("Showing {} ({})", display.url, display.position);
                    self.view.reset();
                    self.swipe.cancel();
                    self.texture_cache.clear();
                    self.display = Some(display);
                }
                Effect::ClearImage => {
                    self.display = None;
                    self.view.reset();
                    self.texture_cache.clear();
                }
                Effect::Notice(notice) => self.ui_logger.notice(&notice),
            }
        }
    }

    pub fn goto_next(&mut self) {
        self.dispatch(Event::Navigate(Command::Next));
    }

    pub fn goto_prev(&mut self) {
        self.dispatch(Event::Navigate(Command::Prev));
    }

    pub fn refresh(&mut self) {
        self.dispatch(Event::Refresh);
    }

    /// The decoded strip for the current display, if it has arrived.
    pub fn current_image(&self) -> Option<LoadedImage> {
        let url = &self.display.as_ref()?.url;
        self.image_lru.lock().ok()?.get(url).cloned()
    }

    /// Start downloading the current strip unless it is cached or in flight.
    fn request_image(&self, ctx: &Context) {
        let Some(display) = &self.display else {
            return;
        };
        let cached = self
            .image_lru
            .lock()
            .map(|lru| lru.contains(&display.url))
            .unwrap_or(false);
        if cached {
            return;
        }
        let url = display.url.clone();
        let client = self.http.clone();
        let disk = self.disk_cache.clone();
        let lru = self.image_lru.clone();
        let loading = self.loading_images.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Err(e) = load_image_async(url, client, disk, lru, loading, ctx).await {
                warn!("Image task failed: {}", e);
            }
        });
    }

    pub fn is_loading_image(&self) -> bool {
        let Some(display) = &self.display else {
            return false;
        };
        self.loading_images
            .lock()
            .map(|set| set.contains(&display.url))
            .unwrap_or(false)
    }

    fn handle_input(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
            self.goto_next();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
            self.goto_prev();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::F5)) && !self.viewer.is_loading_series() {
            self.refresh();
        }
    }

    fn update_title(&mut self, ctx: &Context) {
        let title = match (&self.display, self.viewer.selected()) {
            (Some(display), _) => format!("{} - {} - {}", NAME, display.series, display.position),
            (None, Some(series)) => format!("{} - {}", NAME, series.name),
            (None, None) => NAME.to_string(),
        };
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }
}

impl eframe::App for ComicViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        for event in self.worker.drain() {
            self.dispatch(event);
        }
        self.request_image(ctx);
        self.handle_input(ctx);

        self.display_top_bar(ctx);
        self.display_bottom_bar(ctx);
        if let Some(swipe) = self.display_central_area(ctx) {
            self.dispatch(Event::Swipe(swipe));
        }

        self.update_title(ctx);
        self.ui_logger.clear_expired();
        if let Some(remaining) = self.ui_logger.remaining() {
            ctx.request_repaint_after(remaining);
        }
    }
}
