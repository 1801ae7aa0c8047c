//! UI rendering and layout.

pub mod display;
pub mod image;
pub mod log;
pub mod modules;
pub use image::*;

use crate::prelude::*;

/// Dark theme with slightly larger body text for phone-sized windows.
pub fn setup_visuals(ctx: &Context) {
    ctx.set_visuals(egui::Visuals::dark());
    ctx.style_mut(|style| {
        if let Some(body) = style.text_styles.get_mut(&TextStyle::Body) {
            body.size = 16.0;
        }
        if let Some(button) = style.text_styles.get_mut(&TextStyle::Button) {
            button.size = 16.0;
        }
    });
}
