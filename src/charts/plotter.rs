//! Chart Plotter Module
//! Draws the dashboard's tables and charts with egui / egui_plot.

use egui::{Align2, Color32, FontId, RichText, ScrollArea, Sense, Stroke};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};
use happiness_dashboard::data::Table;
use happiness_dashboard::pipeline::{axis_title, ScatterSeries};
use happiness_dashboard::stats::CorrelationMatrix;

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Bar colour for score-based charts.
pub const SCORE_COLOR: Color32 = Color32::from_rgb(52, 152, 219);

// Cool-warm diverging scale endpoints
const COOL: (f32, f32, f32) = (59.0, 76.0, 192.0);
const NEUTRAL: (f32, f32, f32) = (221.0, 221.0, 221.0);
const WARM: (f32, f32, f32) = (180.0, 4.0, 38.0);

const HEATMAP_CELL: egui::Vec2 = egui::vec2(72.0, 30.0);

/// One equal-width histogram bin.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub width: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        self.start + self.width / 2.0
    }
}

/// Creates the dashboard visualizations using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn country_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Map a coefficient in [-1, 1] onto the cool-warm scale.
    pub fn coolwarm(value: f64) -> Color32 {
        let t = value.clamp(-1.0, 1.0) as f32;
        let (from, to, f) = if t < 0.0 {
            (NEUTRAL, COOL, -t)
        } else {
            (NEUTRAL, WARM, t)
        };
        let lerp = |a: f32, b: f32| (a + (b - a) * f).round() as u8;
        Color32::from_rgb(
            lerp(from.0, to.0),
            lerp(from.1, to.1),
            lerp(from.2, to.2),
        )
    }

    /// Equal-width bins spanning the sample range. Non-finite values are skipped.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Vec::new();
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            return vec![HistogramBin {
                start: min - 0.5,
                width: 1.0,
                count: finite.len(),
            }];
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for v in &finite {
            // the maximum lands in the last bin
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: min + i as f64 * width,
                width,
                count,
            })
            .collect()
    }

    /// Every column of a table in file order.
    pub fn draw_data_table(ui: &mut egui::Ui, id: &str, table: &Table) {
        if table.is_empty() {
            ui.label(RichText::new("No countries selected").color(Color32::GRAY));
            return;
        }

        let schema = table.schema();
        let columns: Vec<_> = schema
            .columns()
            .iter()
            .filter_map(|name| schema.resolve(name).map(|c| (name, c)))
            .collect();

        ScrollArea::horizontal()
            .id_salt(format!("{id}_scroll"))
            .show(ui, |ui| {
                egui::Grid::new(id)
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([10.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("").strong().size(11.0));
                        for (name, _) in &columns {
                            ui.label(RichText::new(name.as_str()).strong().size(11.0));
                        }
                        ui.end_row();

                        for (i, row) in table.rows().iter().enumerate() {
                            ui.label(RichText::new(i.to_string()).size(11.0).color(Color32::GRAY));
                            for (_, column) in &columns {
                                ui.label(RichText::new(row.display(*column)).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    /// Scatter of the selected countries, one colour each.
    pub fn draw_scatter(ui: &mut egui::Ui, series: &ScatterSeries) {
        Plot::new("scatter")
            .height(320.0)
            .x_axis_label(axis_title(&series.x_axis))
            .y_axis_label(axis_title(&series.y_axis))
            .legend(Legend::default())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for point in &series.points {
                    plot_ui.points(
                        Points::new(PlotPoints::new(vec![[point.x, point.y]]))
                            .radius(7.0)
                            .color(Self::country_color(point.key_index))
                            .name(&point.country),
                    );
                }
            });
    }

    /// Annotated correlation grid; undefined coefficients stay blank.
    pub fn draw_heatmap(ui: &mut egui::Ui, matrix: &CorrelationMatrix) {
        let labels: Vec<String> = matrix.columns().iter().map(|c| axis_title(c)).collect();

        ScrollArea::horizontal().id_salt("heatmap_scroll").show(ui, |ui| {
            egui::Grid::new("correlation_heatmap")
                .spacing([2.0, 2.0])
                .show(ui, |ui| {
                    ui.label("");
                    for label in &labels {
                        ui.add_sized(
                            [HEATMAP_CELL.x, 20.0],
                            egui::Label::new(RichText::new(label).size(10.0)).truncate(),
                        );
                    }
                    ui.end_row();

                    for (i, row_label) in labels.iter().enumerate() {
                        ui.label(RichText::new(row_label).size(11.0));
                        for (j, col_label) in labels.iter().enumerate() {
                            let (rect, response) =
                                ui.allocate_exact_size(HEATMAP_CELL, Sense::hover());
                            let painter = ui.painter();

                            if matrix.is_defined(i, j) {
                                let value = matrix.get(i, j);
                                painter.rect_filled(rect, 2.0, Self::coolwarm(value));
                                let text_color = if value.abs() > 0.6 {
                                    Color32::WHITE
                                } else {
                                    Color32::BLACK
                                };
                                painter.text(
                                    rect.center(),
                                    Align2::CENTER_CENTER,
                                    format!("{value:.2}"),
                                    FontId::proportional(12.0),
                                    text_color,
                                );
                                response.on_hover_text(format!(
                                    "{row_label} / {col_label}: {value:.3}"
                                ));
                            } else {
                                painter.rect_stroke(rect, 2.0, Stroke::new(1.0, Color32::GRAY));
                                response.on_hover_text(format!(
                                    "{row_label} / {col_label}: undefined"
                                ));
                            }
                        }
                        ui.end_row();
                    }
                });
        });
    }

    /// Score of every country, in table order.
    pub fn draw_score_bars(ui: &mut egui::Ui, table: &Table) {
        let names: Vec<String> = table
            .countries()
            .into_iter()
            .map(str::to_string)
            .collect();
        let bars: Vec<Bar> = table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new(i as f64, row.score)
                    .width(0.8)
                    .name(&row.country_or_region)
                    .fill(Self::coolwarm((row.score - 5.5) / 2.5))
            })
            .collect();

        Plot::new("score_bars")
            .height(260.0)
            .y_axis_label("Score")
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx as usize) < names.len() && (mark.value - idx).abs() < 1e-6 {
                    names[idx as usize].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Happiness score"));
            });
    }

    pub fn draw_histogram(ui: &mut egui::Ui, bins: &[HistogramBin], column: &str) {
        let bars: Vec<Bar> = bins
            .iter()
            .map(|bin| {
                Bar::new(bin.center(), bin.count as f64)
                    .width(bin.width)
                    .name(format!("{:.2} - {:.2}", bin.start, bin.start + bin.width))
            })
            .collect();

        Plot::new(format!("histogram_{column}"))
            .height(240.0)
            .x_axis_label(axis_title(column))
            .y_axis_label("Countries")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(SCORE_COLOR)
                        .name(axis_title(column)),
                );
            });
    }

    /// Rank, country and score of a ranked table, indexed from 0.
    pub fn draw_ranking_table(ui: &mut egui::Ui, top: &Table) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("ranking_table")
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("").strong().size(12.0));
                        ui.label(RichText::new("overall_rank").strong().size(12.0));
                        ui.label(RichText::new("country_or_region").strong().size(12.0));
                        ui.label(RichText::new("score").strong().size(12.0));
                        ui.end_row();

                        for (i, row) in top.rows().iter().enumerate() {
                            ui.label(RichText::new(i.to_string()).size(12.0).color(Color32::GRAY));
                            ui.label(RichText::new(row.overall_rank.to_string()).size(12.0));
                            ui.label(RichText::new(&row.country_or_region).size(12.0));
                            ui.label(RichText::new(format!("{:.3}", row.score)).size(12.0));
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value_once() {
        let values = [2.0, 2.5, 3.0, 3.5, 4.0, 7.0];
        let bins = ChartPlotter::histogram(&values, 5);

        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].start, 2.0);
        // the maximum falls into the last bin
        assert_eq!(bins[4].count, 1);
    }

    #[test]
    fn histogram_of_constant_sample_is_single_bin() {
        let bins = ChartPlotter::histogram(&[5.0, 5.0, 5.0], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[0].center(), 5.0);
    }

    #[test]
    fn histogram_of_empty_sample_is_empty() {
        assert!(ChartPlotter::histogram(&[], 10).is_empty());
        assert!(ChartPlotter::histogram(&[f64::NAN], 10).is_empty());
    }

    #[test]
    fn coolwarm_endpoints() {
        assert_eq!(ChartPlotter::coolwarm(0.0), Color32::from_rgb(221, 221, 221));
        assert_eq!(ChartPlotter::coolwarm(1.0), Color32::from_rgb(180, 4, 38));
        assert_eq!(ChartPlotter::coolwarm(-1.0), Color32::from_rgb(59, 76, 192));
        assert_eq!(ChartPlotter::coolwarm(3.0), ChartPlotter::coolwarm(1.0));
    }
}
