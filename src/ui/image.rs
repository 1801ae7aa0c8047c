//! Image drawing helpers for egui.

use crate::prelude::*;

/// Draw a centered spinner in the given area.
pub fn draw_spinner(ui: &mut Ui, area: Rect) {
    let spinner_size = 48.0;
    let spinner_rect = Rect::from_center_size(area.center(), Vec2::splat(spinner_size));
    ui.allocate_new_ui(egui::UiBuilder::new().max_rect(spinner_rect), |ui| {
        ui.add(Spinner::new().size(spinner_size).color(Color32::WHITE));
    });
}

/// Placeholder for a strip that failed to download or decode.
pub fn draw_broken(ui: &mut Ui, area: Rect, reason: &str) {
    let rect = Rect::from_center_size(area.center(), Vec2::new(area.width().min(320.0), 80.0));
    ui.allocate_new_ui(egui::UiBuilder::new().max_rect(rect), |ui| {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("🖼 ✖").size(32.0).color(Color32::GRAY));
            ui.label(RichText::new(reason).small().color(Color32::GRAY));
        });
    });
}

/// Draw the current strip, uploading its texture on first use.
pub fn draw_strip(
    ui: &mut Ui,
    loaded: &LoadedImage,
    area: Rect,
    view: &ZoomPan,
    cache: &mut TextureCache,
) {
    match &loaded.image {
        PageImage::Static(_) => draw_static_image(ui, loaded, area, view, cache),
        PageImage::AnimatedGif { .. } => draw_gif(ui, loaded, area, view, cache),
        PageImage::Broken(reason) => draw_broken(ui, area, reason),
    }
}

fn draw_static_image(
    ui: &mut Ui,
    loaded: &LoadedImage,
    area: Rect,
    view: &ZoomPan,
    cache: &mut TextureCache,
) {
    let PageImage::Static(img) = &loaded.image else {
        return;
    };
    let (w, h) = img.dimensions();
    let disp_size = Vec2::new(w as f32 * view.zoom, h as f32 * view.zoom);

    let handle = match cache.get_single(&loaded.url) {
        Some(handle) => handle.clone(),
        None => {
            let color_img = ColorImage::from_rgba_unmultiplied(
                [w as usize, h as usize],
                img.to_rgba8().as_flat_samples().as_slice(),
            );
            let handle = ui.ctx().load_texture(
                format!("strip:{}", loaded.url),
                color_img,
                egui::TextureOptions::default(),
            );
            cache.set_single(&loaded.url, handle.clone());
            handle
        }
    };

    let rect = Rect::from_center_size(area.center() + view.pan, disp_size);
    ui.painter().image(
        handle.id(),
        rect,
        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        Color32::WHITE,
    );
}

/// Frame to show `elapsed_ms` into the animation. `None` when there is
/// nothing to animate.
pub fn frame_at(delays: &[u16], elapsed_ms: u64) -> Option<usize> {
    let total: u64 = delays.iter().map(|d| *d as u64).sum();
    if total == 0 {
        return None;
    }
    let t = elapsed_ms % total;
    let mut acc = 0u64;
    for (i, delay) in delays.iter().enumerate() {
        acc += *delay as u64;
        if t < acc {
            return Some(i);
        }
    }
    Some(delays.len() - 1)
}

fn draw_gif(
    ui: &mut Ui,
    loaded: &LoadedImage,
    area: Rect,
    view: &ZoomPan,
    cache: &mut TextureCache,
) {
    let PageImage::AnimatedGif {
        frames,
        delays,
        start_time,
    } = &loaded.image
    else {
        return;
    };
    let Some(first) = frames.first() else {
        warn!("GIF has no frames: {}", loaded.url);
        return;
    };

    let idx = frame_at(delays, start_time.elapsed().as_millis() as u64)
        .unwrap_or(0)
        .min(frames.len() - 1);
    let key = format!("gif:{}:{}", loaded.url, idx);

    let handle = match cache.get_animated(&key) {
        Some(handle) => handle.clone(),
        None => {
            let handle = ui.ctx().load_texture(
                key.clone(),
                frames[idx].clone(),
                egui::TextureOptions::default(),
            );
            cache.set_animated(key, handle.clone());
            handle
        }
    };

    let disp_size = Vec2::new(
        first.size[0] as f32 * view.zoom,
        first.size[1] as f32 * view.zoom,
    );
    let rect = Rect::from_center_size(area.center() + view.pan, disp_size);
    ui.painter().image(
        handle.id(),
        rect,
        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        Color32::WHITE,
    );
    ui.ctx().request_repaint();
}

/// Zoom level and pan offset of the strip on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomPan {
    pub zoom: f32,
    pub pan: Vec2,
    original_pan: Vec2,
    drag_start: Option<Pos2>,
    /// Fit zoom for the current strip, computed once it is known.
    fit_zoom: Option<f32>,
}

impl Default for ZoomPan {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            original_pan: Vec2::ZERO,
            drag_start: None,
            fit_zoom: None,
        }
    }
}

impl ZoomPan {
    /// Forget the strip's fit; the next `fit` call recomputes it.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Scale the image down to fit `area` the first time it is seen.
    pub fn fit(&mut self, image_dims: (u32, u32), area: Rect) {
        if self.fit_zoom.is_some() {
            return;
        }
        let (w, h) = image_dims;
        if w == 0 || h == 0 || area.width() <= 0.0 || area.height() <= 0.0 {
            return;
        }
        let fit = (area.width() / w as f32)
            .min(area.height() / h as f32)
            .min(1.0)
            .clamp(MIN_ZOOM, MAX_ZOOM);
        self.fit_zoom = Some(fit);
        self.zoom = fit;
        self.pan = Vec2::ZERO;
    }

    /// True while the strip is shown at its fitted size; swipes only count then.
    pub fn at_rest(&self) -> bool {
        match self.fit_zoom {
            Some(fit) => (self.zoom - fit).abs() <= fit * 0.01,
            None => true,
        }
    }

    /// Move the view with a drag in progress.
    pub fn handle_pan(&mut self, response: &egui::Response) {
        if response.drag_started() {
            self.drag_start = response.interact_pointer_pos();
            self.original_pan = self.pan;
        }
        if response.dragged() {
            if let (Some(start), Some(current)) =
                (self.drag_start, response.interact_pointer_pos())
            {
                self.pan = self.original_pan + (current - start);
            }
        }
        if response.drag_stopped() {
            self.drag_start = None;
        }
    }

    /// Multiply the zoom by `factor` around `pivot`. Returns true on change.
    pub fn zoom_by(&mut self, factor: f32, pivot: Pos2, area: Rect) -> bool {
        if !factor.is_finite() || (factor - 1.0).abs() < f32::EPSILON {
            return false;
        }
        let old_zoom = self.zoom;
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (self.zoom - old_zoom).abs() <= f32::EPSILON {
            return false;
        }
        let cursor_rel = pivot - area.center();
        let effective = self.zoom / old_zoom;
        self.pan = (self.pan - cursor_rel) * effective + cursor_rel;
        true
    }

    /// Mouse-wheel zoom: positive `scroll_delta_y` zooms in.
    pub fn handle_zoom(&mut self, scroll_delta_y: f32, pivot: Pos2, area: Rect) -> bool {
        if scroll_delta_y.abs() < f32::EPSILON {
            return false;
        }
        let factor = (1.0 + ZOOM_SENSITIVITY * scroll_delta_y).clamp(0.5, 2.0);
        self.zoom_by(factor, pivot, area)
    }

    /// Ease the pan back so at least half the image stays on screen.
    pub fn clamp_pan(&mut self, image_dims: (u32, u32), viewport: Rect) {
        let (img_w, img_h) = image_dims;
        let scaled_w = img_w as f32 * self.zoom;
        let scaled_h = img_h as f32 * self.zoom;

        let max_x = ((scaled_w - viewport.width()) / 2.0 + scaled_w * 0.5).max(0.0);
        let max_y = ((scaled_h - viewport.height()) / 2.0 + scaled_h * 0.5).max(0.0);

        let k = 0.2;
        let target_x = self.pan.x.clamp(-max_x, max_x);
        let target_y = self.pan.y.clamp(-max_y, max_y);
        self.pan.x += (target_x - self.pan.x) * k;
        self.pan.y += (target_y - self.pan.y) * k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::from_min_size(egui::pos2(0.0, 0.0), Vec2::new(400.0, 800.0))
    }

    #[test]
    fn frame_at_walks_delays() {
        let delays = [100, 50, 100];
        assert_eq!(frame_at(&delays, 0), Some(0));
        assert_eq!(frame_at(&delays, 99), Some(0));
        assert_eq!(frame_at(&delays, 100), Some(1));
        assert_eq!(frame_at(&delays, 160), Some(2));
        assert_eq!(frame_at(&delays, 250), Some(0));
    }

    #[test]
    fn frame_at_zero_duration_is_none() {
        assert_eq!(frame_at(&[], 10), None);
        assert_eq!(frame_at(&[0, 0], 10), None);
    }

    #[test]
    fn fit_scales_to_smaller_side() {
        let mut view = ZoomPan::default();
        view.fit((800, 400), area());
        assert!((view.zoom - 0.5).abs() < 1e-6);
        assert!(view.at_rest());

        view.fit((100, 100), area());
        assert!((view.zoom - 0.5).abs() < 1e-6, "fit is computed once");
    }

    #[test]
    fn zoom_leaves_rest_and_reset_restores() {
        let mut view = ZoomPan::default();
        view.fit((400, 800), area());
        assert!(view.zoom_by(2.0, area().center(), area()));
        assert!(!view.at_rest());
        assert_eq!(view.pan, Vec2::ZERO, "pivot at centre keeps pan");

        view.reset();
        assert_eq!(view, ZoomPan::default());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = ZoomPan::default();
        view.zoom_by(1000.0, area().center(), area());
        assert_eq!(view.zoom, MAX_ZOOM);
        assert!(!view.zoom_by(2.0, area().center(), area()));
    }

    #[test]
    fn clamp_pan_pulls_back_towards_bounds() {
        let mut view = ZoomPan::default();
        view.pan = Vec2::new(10_000.0, 0.0);
        view.clamp_pan((100, 100), area());
        assert!(view.pan.x < 10_000.0);
    }
}
