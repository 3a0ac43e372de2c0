//! Coachmark CLI
//!
//! Terminal host for the coachmark guided-tour engine.

mod args;
mod cli;
mod renderer;
mod simulate;

use anyhow::{Context, Result};
use args::{Args, Commands, TourCommands};
use clap::Parser;
use cli::Cli;
use coachmark_core::{EngineConfig, TourCatalog};
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        config,
        tours,
        command,
    } = Args::parse();

    let config = match config {
        Some(path) => EngineConfig::from_path(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let mut catalog = TourCatalog::builtin().context("Failed to load built-in tours")?;
    if let Some(path) = tours {
        catalog.extend(
            TourCatalog::from_path(&path)
                .with_context(|| format!("Failed to load tours {}", path.display()))?,
        );
    }

    info!("Coachmark started with {} tours", catalog.len());

    let cli = Cli::new(
        catalog,
        config,
        database_file,
        TerminalRenderer::new(!no_color),
    );

    match command {
        Some(Tour { command }) => cli.handle_tour_command(command),
        Some(Pending { command }) => cli.handle_pending_command(command),
        Some(Flags) => cli.list_flags(),
        Some(Place(args)) => {
            cli.place(&args);
            Ok(())
        }
        Some(Simulate(args)) => cli.simulate(&args).await,
        None => cli.handle_tour_command(TourCommands::List),
    }
}
