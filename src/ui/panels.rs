use std::time::Instant;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::charts::ChartKind;
use crate::state::AppState;

const LOAD_GREEN: Color32 = Color32::from_rgb(0x4C, 0xAF, 0x50);
const VISUALIZE_BLUE: Color32 = Color32::from_rgb(0x21, 0x96, 0xF3);
const CLEAN_RED: Color32 = Color32::from_rgb(0xF4, 0x43, 0x36);

// ---------------------------------------------------------------------------
// Left side panel – actions
// ---------------------------------------------------------------------------

fn action_button(ui: &mut Ui, label: &str, fill: Color32) -> bool {
    let button = egui::Button::new(RichText::new(label).color(Color32::WHITE).strong())
        .fill(fill)
        .min_size(egui::vec2(ui.available_width(), 32.0));
    ui.add(button).clicked()
}

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered) ----
    let logo = egui::include_image!("../../assets/logo.png");
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add(
            egui::Image::new(logo)
                .max_width(ui.available_width() * 0.5)
                .max_height(96.0)
                .corner_radius(4.0),
        );
    });
    ui.add_space(4.0);

    // Controls stay disabled while a figure window is open.
    let idle = state.figure.is_none();
    ui.add_enabled_ui(idle, |ui: &mut Ui| {
        egui::CollapsingHeader::new(RichText::new("Import data").strong())
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                ui.label(state.status_label.as_str());
                ui.add_space(4.0);
                if action_button(ui, "Open a CSV or Excel file", LOAD_GREEN) {
                    open_file_dialog(state);
                }
            });

        ui.separator();

        ui.strong("Visualization");
        let selected = state
            .chart_choice
            .map(|k| k.to_string())
            .unwrap_or_else(|| "Choose a visualization".to_string());
        egui::ComboBox::from_id_salt("chart_kind")
            .selected_text(selected)
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                ui.selectable_value(&mut state.chart_choice, None, "Choose a visualization");
                for kind in ChartKind::ALL {
                    ui.selectable_value(&mut state.chart_choice, Some(kind), kind.to_string());
                }
            });
        ui.add_space(4.0);

        if action_button(ui, "Visualize", VISUALIZE_BLUE) {
            state.visualize();
        }
        if action_button(ui, "Clean data", CLEAN_RED) {
            state.clean();
        }
    });

    if !idle {
        ui.add_space(8.0);
        ui.label(RichText::new("Close the figure window to continue.").italics());
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let idle = state.figure.is_none();
            if ui.add_enabled(idle, egui::Button::new("Open…")).clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let (rows, cols) = ds.shape();
            let numeric = ds.columns().iter().filter(|c| c.dtype.is_numeric()).count();
            ui.label(format!("{rows} rows × {cols} columns ({numeric} numeric)"));
        }

        if let Some(name) = state.source.as_ref().and_then(|p| p.file_name()) {
            ui.separator();
            ui.label(RichText::new(name.to_string_lossy()).weak());
        }
    });
}

// ---------------------------------------------------------------------------
// Bottom status bar
// ---------------------------------------------------------------------------

pub fn status_bar(ui: &mut Ui, state: &AppState) {
    ui.label(state.active_flash(Instant::now()).unwrap_or_default());
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open a data file")
        .add_filter("CSV file", &["csv"])
        .add_filter("Excel file", &["xlsx"])
        .pick_file();

    match file {
        Some(path) => state.load_path(&path),
        None => log::debug!("File dialog cancelled"),
    }
}
