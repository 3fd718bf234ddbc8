use eframe::egui::{self, RichText, ScrollArea, TextStyle, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::CellValue;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Data preview (central panel)
// ---------------------------------------------------------------------------

/// Render the loaded table, one virtualised row per record.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to preview it  (File → Open…)");
            });
            return;
        }
    };

    if dataset.n_cols() == 0 {
        ui.label("The file has no columns.");
        return;
    }

    let row_height = TextStyle::Body.resolve(ui.style()).size + 6.0;

    ScrollArea::horizontal()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(TableColumn::auto().at_least(36.0))
                .columns(TableColumn::auto().at_least(72.0), dataset.n_cols())
                .header(row_height * 2.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("#");
                    });
                    for column in dataset.columns() {
                        header.col(|ui| {
                            ui.vertical(|ui| {
                                ui.strong(column.name.as_str());
                                ui.weak(column.dtype.to_string());
                            });
                        });
                    }
                })
                .body(|body| {
                    body.rows(row_height, dataset.n_rows(), |mut row| {
                        let r = row.index();
                        row.col(|ui| {
                            ui.weak(r.to_string());
                        });
                        for c in 0..dataset.n_cols() {
                            row.col(|ui| match dataset.cell(r, c) {
                                Some(CellValue::Null) => {
                                    ui.label(RichText::new("NaN").italics().weak());
                                }
                                Some(value) => {
                                    ui.label(value.to_string());
                                }
                                None => {}
                            });
                        }
                    });
                });
        });
}
