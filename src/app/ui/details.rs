use eframe::egui::{self, RichText, Ui};

use crate::interaction::NodeDetails;
use crate::render::kind_color;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Details");
            if ui.button("Close").clicked() {
                self.interaction.select(None);
            }
        });
        ui.add_space(6.0);

        let Some(selected_id) = self.interaction.selected() else {
            ui.label("Click a node or pick a search result.");
            return;
        };
        let Some(details) = self
            .simulation
            .index_of(selected_id)
            .and_then(|index| NodeDetails::for_node(&self.simulation, index))
        else {
            ui.label("Selected node no longer exists in the graph.");
            return;
        };

        ui.label(RichText::new(&details.title).strong().size(16.0));
        ui.label(RichText::new(details.kind.label()).color(kind_color(details.kind)));
        ui.small(details.id.as_str());
        ui.add_space(6.0);

        egui::Grid::new("detail_rows")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for row in &details.rows {
                    ui.label(RichText::new(row.label).strong());
                    ui.label(row.value.as_str());
                    ui.end_row();
                }
            });

        ui.separator();
        ui.label(RichText::new(format!("Connections ({})", details.connections.len())).strong());
        if details.connections.is_empty() {
            ui.label("No connections.");
            return;
        }

        let mut focus = None;
        egui::ScrollArea::vertical()
            .id_salt("connections_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for connection in &details.connections {
                    let arrow = if connection.outgoing { "→" } else { "←" };
                    let label = format!("{arrow} {}  [{}]", connection.name, connection.relation);
                    if ui.link(label).on_hover_text(connection.id.as_str()).clicked() {
                        focus = Some(connection.id.clone());
                    }
                }
            });
        if let Some(id) = focus {
            self.focus(&id);
        }
    }
}
