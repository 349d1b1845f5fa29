use eframe::egui;
use olist_dashboard::color::BarPalette;
use olist_dashboard::config::DashboardConfig;
use olist_dashboard::data::model::OrderDataset;

use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    palette: BarPalette,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig, dataset: OrderDataset) -> Self {
        Self {
            state: AppState::new(config, dataset),
            palette: BarPalette::default(),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: date range ----
        egui::SidePanel::left("range_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            charts::dashboard(ui, &self.state, &self.palette);
        });
    }
}
