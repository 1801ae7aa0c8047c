//! Texture cache for egui.

use crate::prelude::*;
use std::collections::HashMap;

/// GPU texture for the strip on screen, keyed by its URL.
pub struct PageTexture {
    pub url: String,
    pub handle: TextureHandle,
}

/// Holds the current static texture and the frames of an animated strip.
#[derive(Default)]
pub struct TextureCache {
    pub single: Option<PageTexture>,
    pub animated: HashMap<String, TextureHandle>,
}

impl TextureCache {
    pub fn new() -> Self {
        debug!("TextureCache created");
        Self::default()
    }

    pub fn get_single(&self, url: &str) -> Option<&TextureHandle> {
        match &self.single {
            Some(pt) if pt.url == url => Some(&pt.handle),
            _ => {
                debug!("TextureCache miss: {}", url);
                None
            }
        }
    }

    pub fn set_single(&mut self, url: &str, handle: TextureHandle) {
        debug!("TextureCache set: {}", url);
        self.single = Some(PageTexture {
            url: url.to_string(),
            handle,
        });
    }

    pub fn get_animated(&self, key: &str) -> Option<&TextureHandle> {
        self.animated.get(key)
    }

    pub fn set_animated(&mut self, key: String, handle: TextureHandle) {
        self.animated.insert(key, handle);
    }

    pub fn clear(&mut self) {
        debug!("TextureCache cleared");
        self.single = None;
        self.animated.clear();
    }
}
