use comic_series::gesture::Swipe;

use crate::prelude::*;
use crate::ui::modules;

impl ComicViewerApp {
    /// Draw the top bar (series selector, position, refresh).
    pub fn display_top_bar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                modules::ui_series_selector(self, ui);
                ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
                    modules::ui_refresh(self, ui);
                    modules::ui_position(self, ui);
                });
            });
        });
    }

    /// Draw the bottom bar (navigation buttons, status message).
    pub fn display_bottom_bar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::bottom("bottom_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                modules::ui_strip_nav(self, ui);
                ui.separator();
                if let Some((msg, kind)) = &self.ui_logger.message {
                    modules::ui_log_msg(ui, msg, *kind);
                }
            });
        });
    }

    /// Draw the strip and handle touch and mouse input on it.
    /// Returns a completed swipe, to be dispatched once drawing is done.
    pub fn display_central_area(&mut self, ctx: &Context) -> Option<Swipe> {
        let mut swipe = None;

        CentralPanel::default().show(ctx, |ui| {
            let image_area = ui.available_rect_before_wrap();
            let response = ui.allocate_rect(image_area, egui::Sense::click_and_drag());

            let Some(url) = self.display.as_ref().map(|d| d.url.clone()) else {
                let loading = self.viewer.is_loading_series() || self.viewer.is_loading_listing();
                ui.centered_and_justified(|ui| {
                    let text = if loading {
                        "Loading..."
                    } else {
                        "No strip selected"
                    };
                    ui.label(RichText::new(text).text_style(TextStyle::Heading));
                });
                return;
            };

            let loaded = self.current_image();
            let dims = loaded
                .as_ref()
                .map(|l| l.image.dimensions())
                .unwrap_or((0, 0));
            if dims != (0, 0) {
                self.view.fit(dims, image_area);
            }

            swipe = self.handle_gestures(ctx, &response, dims, image_area);

            match &loaded {
                Some(loaded) if loaded.url == url => {
                    draw_strip(ui, loaded, image_area, &self.view, &mut self.texture_cache)
                }
                _ => draw_spinner(ui, image_area),
            }
        });

        swipe.filter(|s| *s != Swipe::None)
    }

    fn handle_gestures(
        &mut self,
        ctx: &Context,
        response: &egui::Response,
        dims: (u32, u32),
        area: Rect,
    ) -> Option<Swipe> {
        let pivot = ctx
            .input(|i| i.pointer.hover_pos())
            .unwrap_or_else(|| area.center());

        // Pinch, and ctrl + wheel on desktop.
        let multi_touch = ctx.input(|i| i.multi_touch());
        if multi_touch.is_some() {
            self.swipe.cancel();
        }
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if (zoom_delta - 1.0).abs() > f32::EPSILON {
            self.view.zoom_by(zoom_delta, pivot, area);
        } else if response.hovered() {
            self.view
                .handle_zoom(ctx.input(|i| i.raw_scroll_delta.y), pivot, area);
        }

        if multi_touch.is_some() {
            return None;
        }

        if self.view.at_rest() {
            if response.drag_started() {
                if let Some(origin) = ctx.input(|i| i.pointer.press_origin()) {
                    self.swipe.down(origin.x, origin.y);
                }
            }
            if response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.swipe.moved(pos.x, pos.y);
                }
            }
            if response.drag_stopped() {
                let pos = ctx.input(|i| i.pointer.latest_pos());
                return Some(match pos {
                    Some(pos) => self.swipe.up(pos.x, pos.y),
                    None => {
                        self.swipe.cancel();
                        Swipe::None
                    }
                });
            }
            None
        } else {
            self.swipe.cancel();
            self.view.handle_pan(response);
            if response.drag_stopped() && dims != (0, 0) {
                self.view.clamp_pan(dims, area);
            }
            if response.double_clicked() {
                self.view.reset();
            }
            None
        }
    }
}
