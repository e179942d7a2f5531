// main.rs - Conway's Game of Life window
//
// Keys: Q quit, R reset, D debug overlay, L grid lines, +/- speed, Space single step.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use conway_life::Simulation;
use eframe::egui;
use tracing::info;

mod cli;
mod clock;
mod input;
mod ui;

fn main() -> Result<()> {
    init_tracing();

    let args = cli::Args::parse();
    info!(?args, "starting");

    let simulation = Simulation::configure(args.simulation_config())
        .context("cannot build the board")?
        .with_overlays(args.debug, args.lines);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(args.window_size())
            .with_fullscreen(args.fullscreen),
        ..Default::default()
    };

    let cell_size = args.cell_size;
    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(move |_cc| Box::new(ui::LifeApp::new(simulation, cell_size))),
    )
    .map_err(|err| anyhow!("window closed with error: {err}"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
