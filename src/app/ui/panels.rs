use eframe::egui::{self, Align, Context, Layout};

use crate::config::NetworkConfig;
use crate::graph::BuildOutput;
use crate::interaction::Interaction;
use crate::physics::Simulation;
use crate::viewport::Viewport;

use super::super::{INITIAL_SURFACE_SIZE, RepaintScheduler, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(
        ctx: &Context,
        output: BuildOutput,
        config: &NetworkConfig,
        source_label: String,
    ) -> Self {
        let BuildOutput { graph, warnings } = output;
        let simulation = Simulation::start(
            graph.nodes,
            graph.edges,
            INITIAL_SURFACE_SIZE,
            config.simulation,
            RepaintScheduler::new(ctx.clone()),
        );

        Self {
            source_label,
            config: config.clone(),
            warnings: warnings.iter().map(ToString::to_string).collect(),
            viewport: Viewport::new(&config.viewport),
            interaction: Interaction::new(config.interaction),
            search: String::new(),
            search_results: Vec::new(),
            link_distance: config.simulation.link_distance,
            charge_strength: config.simulation.charge_strength,
            surface_size: INITIAL_SURFACE_SIZE,
            simulation,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Investor Network");
                    ui.separator();
                    ui.label(format!("source: {}", self.source_label));
                    ui.label(format!("nodes: {}", self.simulation.nodes().len()));
                    ui.label(format!("edges: {}", self.simulation.links().len()));
                    ui.label(format!("warnings: {}", self.warnings.len()));
                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Center view").clicked() {
                        self.center_view();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "zoom {:.0}%  |  {:?}",
                            self.viewport.scale() * 100.0,
                            self.simulation.state()
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.interaction.selected().is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading relationship network...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    pub(in crate::app) fn center_view(&mut self) {
        self.interaction.center_view(
            &mut self.simulation,
            &mut self.viewport,
            &self.config.viewport,
        );
    }

    pub(in crate::app) fn focus(&mut self, id: &str) {
        self.interaction.focus(
            id,
            &self.simulation,
            &mut self.viewport,
            self.surface_size,
            &self.config.viewport,
        );
    }
}
