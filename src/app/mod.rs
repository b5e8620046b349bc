use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2, vec2};

use crate::config::NetworkConfig;
use crate::entities::DataSource;
use crate::graph::{BuildOutput, build_graph};
use crate::interaction::Interaction;
use crate::physics::{Simulation, TickScheduler};
use crate::viewport::Viewport;

mod graph;
mod ui;

type LoadResult = Result<BuildOutput, String>;

/// Surface size assumed until the canvas reports its real size.
const INITIAL_SURFACE_SIZE: Vec2 = vec2(1000.0, 760.0);

pub struct NetworkApp {
    source: DataSource,
    config: NetworkConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    source_label: String,
    config: NetworkConfig,
    warnings: Vec<String>,
    simulation: Simulation,
    viewport: Viewport,
    interaction: Interaction,
    search: String,
    search_results: Vec<String>,
    link_distance: f32,
    charge_strength: f32,
    surface_size: Vec2,
}

/// Ticks the simulation once per egui frame by asking for another repaint.
struct RepaintScheduler {
    ctx: Context,
    cancelled: bool,
}

impl RepaintScheduler {
    fn new(ctx: Context) -> Self {
        Self {
            ctx,
            cancelled: false,
        }
    }
}

impl TickScheduler for RepaintScheduler {
    fn request_tick(&mut self) {
        if !self.cancelled {
            self.ctx.request_repaint();
        }
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }
}

impl NetworkApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: DataSource, config: NetworkConfig) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: DataSource) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = source
                .load()
                .map(|entities| build_graph(&entities))
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: DataSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready(&self, ctx: &Context, output: BuildOutput) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(
            ctx,
            output,
            &self.config,
            self.source.to_string(),
        )))
    }
}

impl eframe::App for NetworkApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading relationship network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load relationship network");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    model.simulation.stop();
                    model.interaction.reset();
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry {
            self.state = Self::start_load(self.source.clone());
            return;
        }

        if let Some(result) = transition {
            if let AppState::Ready(model) = &mut self.state {
                model.simulation.stop();
            }
            self.reload_rx = None;
            self.state = match result {
                Ok(output) => self.ready(ctx, output),
                Err(error) => {
                    tracing::warn!(%error, "load failed");
                    AppState::Error(error)
                }
            };
        }
    }
}
