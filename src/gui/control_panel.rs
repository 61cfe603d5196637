//! Control Panel Widget
//! Left side panel with the country multi-select and the axis pickers.

use egui::{Color32, ComboBox, RichText, ScrollArea};
use happiness_dashboard::pipeline::{axis_title, DashboardEvent, Session};

/// Left side filter panel.
pub struct ControlPanel {
    /// Case-insensitive country search text.
    pub search: String,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, session: &Session) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        let selection = session.selection();
        let table = session.table();

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Filter Options")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Country Section =====
        ui.label(
            RichText::new(format!(
                "Select Countries ({}/{})",
                selection.countries.len(),
                table.len()
            ))
            .size(14.0)
            .strong(),
        );
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.search);
        });

        let needle = self.search.to_lowercase();
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                    for country in table.countries() {
                        if !needle.is_empty() && !country.to_lowercase().contains(&needle) {
                            continue;
                        }
                        let mut checked = selection.countries.iter().any(|c| c == country);
                        if ui.checkbox(&mut checked, country).changed() {
                            action = ControlPanelAction::Dispatch(DashboardEvent::ToggleCountry(
                                country.to_string(),
                            ));
                        }
                    }
                });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                action = ControlPanelAction::Dispatch(DashboardEvent::SetCountries(
                    table.countries().into_iter().map(str::to_string).collect(),
                ));
            }
            if ui.small_button("Clear All").clicked() {
                action = ControlPanelAction::Dispatch(DashboardEvent::SetCountries(Vec::new()));
            }
            if ui.small_button("Reset").clicked() {
                action = ControlPanelAction::Dispatch(DashboardEvent::SetCountries(
                    session.config().default_countries.clone(),
                ));
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Axis Section =====
        ui.label(RichText::new("Scatter Axes").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 60.0;
        let combo_width = 190.0;
        let factors = table.schema().factor_columns();

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("X-Axis:"));
            ComboBox::from_id_salt("x_axis")
                .width(combo_width)
                .selected_text(axis_title(&selection.x_axis))
                .show_ui(ui, |ui| {
                    for col in factors {
                        if ui
                            .selectable_label(selection.x_axis == *col, axis_title(col))
                            .clicked()
                        {
                            action =
                                ControlPanelAction::Dispatch(DashboardEvent::SetXAxis(col.clone()));
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Y-Axis:"));
            ComboBox::from_id_salt("y_axis")
                .width(combo_width)
                .selected_text(axis_title(&selection.y_axis))
                .show_ui(ui, |ui| {
                    for col in factors {
                        if ui
                            .selectable_label(selection.y_axis == *col, axis_title(col))
                            .clicked()
                        {
                            action =
                                ControlPanelAction::Dispatch(DashboardEvent::SetYAxis(col.clone()));
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Dispatch(DashboardEvent),
}
