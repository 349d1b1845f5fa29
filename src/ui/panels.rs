use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – date range
// ---------------------------------------------------------------------------

/// Render the left panel: logo and the delivery date range picker.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered) ----
    let logo = egui::include_image!("../../assets/logo.png");
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add(
            egui::Image::new(logo)
                .max_width(ui.available_width() * 0.8)
                .max_height(120.0)
                .corner_radius(4.0),
        );
    });
    ui.add_space(4.0);

    ui.heading("Time Range");
    ui.separator();

    let min = state.dataset.min_date();
    let max = state.dataset.max_date();
    let mut start = state.range.start;
    let mut end = state.range.end;

    egui::Grid::new("range_grid")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("From");
            let start_changed = ui
                .add(DatePickerButton::new(&mut start).id_salt("range_start"))
                .changed();
            ui.end_row();

            ui.label("To");
            let end_changed = ui
                .add(DatePickerButton::new(&mut end).id_salt("range_end"))
                .changed();
            ui.end_row();

            if start_changed || end_changed {
                state.set_range(start, end);
            }
        });

    ui.add_space(4.0);
    ui.label(RichText::new(format!("Deliveries {min} to {max}")).weak());

    if ui.button("Reset range").clicked() {
        state.reset_range();
    }

    if state.range.is_inverted() {
        ui.label(RichText::new("Start date is after end date.").color(Color32::YELLOW));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} order rows loaded, {} in range",
            state.dataset.len(),
            state.outputs.order_rows
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open order data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // Startup already succeeded, so a bad file here is reported, not fatal.
        match olist_dashboard::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
