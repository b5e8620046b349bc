use eframe::egui::{self, Color32, RichText, Ui};

use crate::graph::NodeKind;
use crate::render::kind_color;

use super::super::ViewModel;

const LINK_DISTANCE_RANGE: std::ops::RangeInclusive<f32> = 10.0..=400.0;
const CHARGE_STRENGTH_RANGE: std::ops::RangeInclusive<f32> = -1500.0..=-10.0;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        self.draw_search(ui);

        ui.separator();
        ui.label(RichText::new("Forces").strong());
        let distance_changed = ui
            .add(
                egui::Slider::new(&mut self.link_distance, LINK_DISTANCE_RANGE)
                    .text("Link distance")
                    .clamping(egui::SliderClamping::Always),
            )
            .changed();
        let charge_changed = ui
            .add(
                egui::Slider::new(&mut self.charge_strength, CHARGE_STRENGTH_RANGE)
                    .text("Charge strength")
                    .clamping(egui::SliderClamping::Always),
            )
            .changed();
        if distance_changed || charge_changed {
            self.simulation
                .set_forces(self.link_distance, self.charge_strength);
        }
        if ui.button("Reset forces").clicked() {
            self.link_distance = self.config.simulation.link_distance;
            self.charge_strength = self.config.simulation.charge_strength;
            self.simulation
                .set_forces(self.link_distance, self.charge_strength);
        }

        ui.separator();
        ui.label(RichText::new("Legend").strong());
        for kind in NodeKind::ALL {
            ui.horizontal(|ui| {
                ui.label(RichText::new("●").color(kind_color(kind)));
                ui.label(kind.label());
            });
        }

        ui.separator();
        egui::CollapsingHeader::new(format!("Build warnings ({})", self.warnings.len()))
            .default_open(false)
            .show(ui, |ui| {
                if self.warnings.is_empty() {
                    ui.label("No warnings.");
                    return;
                }
                egui::ScrollArea::vertical()
                    .id_salt("build_warnings_scroll")
                    .max_height(240.0)
                    .show(ui, |ui| {
                        for warning in &self.warnings {
                            ui.label(RichText::new(warning).color(Color32::from_rgb(241, 146, 94)));
                        }
                    });
            });
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.label("Search by name");
        let response = ui.text_edit_singleline(&mut self.search);
        if response.changed() {
            self.search_results = self.interaction.search(&self.search, &self.simulation);
        }

        let min_len = self.interaction.config().min_query_len;
        let query_len = self.search.trim().chars().count();
        if query_len > 0 && query_len < min_len {
            ui.small(format!("Type at least {min_len} characters."));
            return;
        }
        if query_len >= min_len && self.search_results.is_empty() {
            ui.small("No matches.");
            return;
        }

        let mut focus = None;
        for id in &self.search_results {
            let Some(node) = self
                .simulation
                .index_of(id)
                .and_then(|index| self.simulation.node(index))
            else {
                continue;
            };
            let is_selected = self.interaction.selected() == Some(id.as_str());
            let label = format!("{}  ({})", node.display_name, node.kind);
            if ui.selectable_label(is_selected, label).clicked() {
                focus = Some(id.clone());
            }
        }
        if let Some(id) = focus {
            self.focus(&id);
        }
    }
}
