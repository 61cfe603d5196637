//! Dashboard Main Application
//! Main window with the filter panel and the chart viewer.

use std::path::Path;

use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::{Color32, RichText, SidePanel};
use happiness_dashboard::data::LoaderError;
use happiness_dashboard::pipeline::{DashboardEvent, Session};

/// Startup outcome. A failed load shows only the error, never a partial dashboard.
enum AppState {
    Ready(Session),
    Failed(String),
}

/// Main application window.
pub struct DashboardApp {
    state: AppState,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    banner: Option<egui::TextureHandle>,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, startup: Result<Session, LoaderError>) -> Self {
        let (state, banner) = match startup {
            Ok(session) => {
                let banner = session
                    .config()
                    .banner_path
                    .as_deref()
                    .and_then(|path| Self::load_banner(&cc.egui_ctx, path));
                (AppState::Ready(session), banner)
            }
            Err(e) => (AppState::Failed(e.to_string()), None),
        };

        Self {
            state,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            banner,
        }
    }

    /// Decorative banner; any failure is logged and the dashboard runs without it.
    fn load_banner(ctx: &egui::Context, path: &Path) -> Option<egui::TextureHandle> {
        let image = match image::open(path) {
            Ok(image) => image.to_rgba8(),
            Err(e) => {
                log::warn!("Banner image {} not loaded: {e}", path.display());
                return None;
            }
        };

        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        Some(ctx.load_texture("banner", color_image, egui::TextureOptions::LINEAR))
    }

    fn handle_event(&mut self, event: DashboardEvent) {
        let AppState::Ready(session) = &mut self.state else {
            return;
        };
        match session.dispatch(event) {
            Ok(()) => {
                let selected = session.artifacts().view.len();
                self.control_panel
                    .set_status(&format!("Showing {selected} selected countries"));
            }
            Err(e) => {
                log::warn!("Rejected control change: {e}");
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }

    fn show_startup_error(ctx: &egui::Context, message: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(format!("Dashboard could not start\n\n{message}"))
                        .size(18.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            });
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let session = match &self.state {
            AppState::Ready(session) => session,
            AppState::Failed(message) => {
                Self::show_startup_error(ctx, message);
                return;
            }
        };

        let mut events = Vec::new();
        let control_panel = &mut self.control_panel;
        let chart_viewer = &mut self.chart_viewer;
        let banner = self.banner.as_ref();

        // Left panel - Filters
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    if let ControlPanelAction::Dispatch(event) = control_panel.show(ui, session) {
                        events.push(event);
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(event) = chart_viewer.show(ui, session, banner) {
                events.push(event);
            }
        });

        for event in events {
            self.handle_event(event);
        }
    }
}
