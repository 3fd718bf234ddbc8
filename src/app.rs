use std::time::Instant;

use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{figure, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyStatsApp {
    pub state: AppState,
}

impl RustyStatsApp {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for RustyStatsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: transient status ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::status_bar(ui, &self.state);
        });

        // ---- Left side panel: actions ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::data_table(ui, &self.state);
        });

        // ---- Figure window (blocks the controls while open) ----
        figure::show_figure_window(ctx, &mut self.state);

        // Wake up once more so the status message disappears on time.
        if let Some(flash) = &self.state.flash {
            let now = Instant::now();
            if now < flash.expires_at {
                ctx.request_repaint_after(flash.expires_at - now);
            }
        }
    }
}
