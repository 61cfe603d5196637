//! Chart Viewer Widget
//! Central scrollable panel: averages, filtered table, charts and ranking.

use crate::charts::ChartPlotter;
use egui::{Color32, RichText, ScrollArea};
use happiness_dashboard::data::SCORE_COLUMN;
use happiness_dashboard::pipeline::{axis_title, DashboardEvent, Session};

const SECTION_SPACING: f32 = 18.0;

/// Scrollable dashboard body.
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    /// Draw every section. Returns the event raised by the top-N slider, if any.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        session: &Session,
        banner: Option<&egui::TextureHandle>,
    ) -> Option<DashboardEvent> {
        let mut event = None;
        let config = session.config();
        let notes = config.extensions.notes;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if let Some(texture) = banner {
                    ui.add(
                        egui::Image::new(texture)
                            .max_width(ui.available_width())
                            .max_height(220.0)
                            .rounding(6.0),
                    );
                    ui.add_space(8.0);
                }

                ui.heading(RichText::new("🌍 World Happiness Dashboard").size(26.0));
                ui.add_space(SECTION_SPACING);

                // ===== Global Averages =====
                Self::section(ui, "📈 Global Averages");
                for (column, mean) in &session.overview().averages {
                    match mean {
                        Ok(v) => {
                            ui.label(
                                RichText::new(format!("Average {}: {v:.2}", axis_title(column)))
                                    .strong(),
                            );
                        }
                        Err(e) => Self::placeholder(ui, &e.to_string()),
                    }
                }
                ui.add_space(SECTION_SPACING);

                let artifacts = session.artifacts();
                let selection = session.selection();

                // ===== Filtered Data =====
                Self::section(ui, "📊 Filtered Data Table");
                ChartPlotter::draw_data_table(ui, "filtered_table", &artifacts.view);
                ui.add_space(SECTION_SPACING);

                // ===== Scatter =====
                match &artifacts.scatter {
                    Ok(series) => {
                        Self::section(ui, &format!("📈 {}", series.title));
                        if notes {
                            Self::note(
                                ui,
                                "Each point is one selected country. Change the axes in the side panel.",
                            );
                        }
                        ChartPlotter::draw_scatter(ui, series);
                    }
                    Err(e) => {
                        Self::section(ui, "📈 Scatter Plot");
                        Self::placeholder(ui, &e.to_string());
                    }
                }
                ui.add_space(SECTION_SPACING);

                // ===== Correlation =====
                Self::section(ui, "🔥 Correlation Heatmap of Happiness Factors");
                if notes {
                    Self::note(
                        ui,
                        "Pearson correlation over all countries. Red is positive, blue is negative; blank cells are undefined.",
                    );
                }
                match &session.overview().correlation {
                    Ok(matrix) => ChartPlotter::draw_heatmap(ui, matrix),
                    Err(e) => Self::placeholder(ui, &e.to_string()),
                }
                ui.add_space(SECTION_SPACING);

                // ===== Scores by Country =====
                Self::section(ui, "🌏 World Happiness Scores");
                ChartPlotter::draw_score_bars(ui, session.table());
                ui.add_space(SECTION_SPACING);

                // ===== Distribution =====
                if config.extensions.histogram {
                    Self::section(ui, "📉 Distribution of Happiness Scores");
                    if notes {
                        Self::note(ui, "Number of countries per score interval.");
                    }
                    match session.table().numeric_values(SCORE_COLUMN) {
                        Some(values) => {
                            let bins =
                                ChartPlotter::histogram(&values, config.extensions.histogram_bins);
                            ChartPlotter::draw_histogram(ui, &bins, SCORE_COLUMN);
                        }
                        None => Self::placeholder(ui, "score column unavailable"),
                    }
                    ui.add_space(SECTION_SPACING);
                }

                // ===== Ranking =====
                Self::section(ui, "🏆 Happiest Countries Ranking");
                let mut top_n = selection.top_n;
                ui.add(
                    egui::Slider::new(&mut top_n, config.top_n.min..=config.top_n.max)
                        .text("Select number of top countries to display"),
                );
                if top_n != selection.top_n {
                    event = Some(DashboardEvent::SetTopN(top_n));
                }
                ui.add_space(6.0);
                match &artifacts.top {
                    Ok(top) => ChartPlotter::draw_ranking_table(ui, top),
                    Err(e) => Self::placeholder(ui, &e.to_string()),
                }
                ui.add_space(SECTION_SPACING);
            });

        event
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(18.0).strong());
        ui.add_space(6.0);
    }

    fn note(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).size(12.0).italics().color(Color32::GRAY));
        ui.add_space(4.0);
    }

    /// Empty state for a widget whose data could not be derived.
    fn placeholder(ui: &mut egui::Ui, reason: &str) {
        egui::Frame::none()
            .stroke(egui::Stroke::new(1.0, Color32::from_rgb(220, 53, 69)))
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(format!("⚠ Unavailable: {reason}")).color(Color32::GRAY));
            });
    }
}
