use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use investor_network::app::NetworkApp;
use investor_network::config::NetworkConfig;
use investor_network::entities::DataSource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with `people`, `organizations` and `events`; built-in sample data when omitted
    #[arg(long)]
    data: Option<PathBuf>,

    /// JSON file with simulation, viewport and interaction settings
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    link_distance: Option<f32>,

    /// Negative values repel
    #[arg(long, allow_hyphen_values = true)]
    charge_strength: Option<f32>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => NetworkConfig::load(path)?,
        None => NetworkConfig::default(),
    };
    config.apply_overrides(args.link_distance, args.charge_strength);
    config.validate()?;

    let source = args.data.map_or(DataSource::Sample, DataSource::File);
    tracing::info!(%source, "starting investor network");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Investor Network",
        options,
        Box::new(move |cc| Ok(Box::new(NetworkApp::new(cc, source, config)))),
    )
    .map_err(|error| anyhow!("failed to run the viewer: {error}"))
}
