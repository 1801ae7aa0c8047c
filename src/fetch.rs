//! Background fetching of series sets and folder listings.
//!
//! Sources block, so every call runs on tokio's blocking pool. Results come
//! back as viewer events through a channel drained once per frame.

use comic_series::SeriesSource;
use comic_series::model::FolderLocator;
use comic_series::viewer::{Event, RequestId};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::prelude::*;

pub struct FetchWorker {
    source: Arc<dyn SeriesSource>,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
    series_task: Option<JoinHandle<()>>,
    listing_task: Option<JoinHandle<()>>,
    ctx: Context,
}

impl FetchWorker {
    pub fn new(source: Arc<dyn SeriesSource>, ctx: Context) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            tx,
            rx,
            series_task: None,
            listing_task: None,
            ctx,
        }
    }

    fn send(tx: &UnboundedSender<Event>, ctx: &Context, event: Event) {
        if tx.send(event).is_err() {
            debug!("Viewer gone, dropping fetch result");
        }
        ctx.request_repaint();
    }

    /// Start loading the series set, abandoning any earlier load.
    pub fn fetch_series(&mut self, request: RequestId) {
        if let Some(task) = self.series_task.take() {
            task.abort();
        }
        let source = self.source.clone();
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();
        debug!("Loading series (request {})", request);
        self.series_task = Some(tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || source.load_series())
                .await
                .unwrap_or_else(|e| {
                    Err(comic_series::error::SourceError::ConfigFetch(e.to_string()))
                });
            Self::send(&tx, &ctx, Event::SeriesLoaded { request, result });
        }));
    }

    /// Start a listing fetch, abandoning any earlier one.
    pub fn fetch_listing(&mut self, request: RequestId, folder: FolderLocator) {
        if let Some(task) = self.listing_task.take() {
            task.abort();
        }
        let source = self.source.clone();
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();
        debug!("Listing {} (request {})", folder.remote_folder_path, request);
        self.listing_task = Some(tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || source.list_images(&folder))
                .await
                .unwrap_or_else(|e| {
                    Err(comic_series::error::SourceError::ListingFetch(e.to_string()))
                });
            Self::send(&tx, &ctx, Event::ListingLoaded { request, result });
        }));
    }

    /// Events that arrived since the last call.
    pub fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
