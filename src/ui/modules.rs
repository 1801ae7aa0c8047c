use comic_series::viewer::Event;

use crate::prelude::*;

pub fn ui_series_selector(app: &mut ComicViewerApp, ui: &mut Ui) {
    let mut chosen = None;
    egui::ComboBox::from_id_salt("series_selector")
        .selected_text(app.viewer.selector_label())
        .width(180.0)
        .show_ui(ui, |ui| {
            let selected = app.viewer.selected().map(|s| s.name.clone());
            for series in app.viewer.series() {
                let is_selected = selected.as_deref() == Some(series.name.as_str());
                if ui.selectable_label(is_selected, &series.name).clicked() {
                    chosen = Some(series.name.clone());
                }
            }
        });
    if let Some(name) = chosen {
        app.dispatch(Event::SelectSeries(name));
    }
}

pub fn ui_position(app: &ComicViewerApp, ui: &mut Ui) {
    if let Some(label) = app.viewer.position_label() {
        ui.label(RichText::new(label).monospace());
    }
}

pub fn ui_refresh(app: &mut ComicViewerApp, ui: &mut Ui) {
    let busy = app.viewer.is_loading_series();
    if ui
        .add_enabled(!busy, egui::Button::new("🔄"))
        .on_hover_text("Reload series")
        .clicked()
    {
        app.refresh();
    }
}

pub fn ui_strip_nav(app: &mut ComicViewerApp, ui: &mut Ui) {
    let positioned = app.viewer.cursor().is_positioned();
    if ui
        .add_enabled(positioned, egui::Button::new("◀ Previous"))
        .clicked()
    {
        app.goto_prev();
    }
    if ui
        .add_enabled(positioned, egui::Button::new("Next ▶"))
        .clicked()
    {
        app.goto_next();
    }
    if app.is_loading_image() {
        ui.add(Spinner::new());
    }
}

pub fn ui_log_msg(ui: &mut Ui, msg: &str, kind: UiLogLevel) {
    ui.colored_label(kind.color(), format!("{}: {}", kind.as_str(), msg));
}
