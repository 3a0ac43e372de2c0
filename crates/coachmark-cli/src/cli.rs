//! Command handlers.
//!
//! Each handler loads what it needs (catalog, store, config), calls into
//! `coachmark_core`, and renders the result as markdown.

use std::path::PathBuf;

use anyhow::{Context, Result};
use coachmark_core::{
    store::tour_completed_key, EngineConfig, FlagRecords, FlagStore, OperationStatus,
    Persistence, PlacementEngine, PlacementRequest, SqliteBackend, StoreBuilder, TourCatalog,
    TourSummaries, TourSummary,
};
use log::info;

use crate::{
    args::{PendingCommands, PlaceArgs, SimulateArgs, TourCommands},
    renderer::TerminalRenderer,
    simulate::{Script, Simulation},
};

pub struct Cli {
    catalog: TourCatalog,
    config: EngineConfig,
    database_file: Option<PathBuf>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(
        catalog: TourCatalog,
        config: EngineConfig,
        database_file: Option<PathBuf>,
        renderer: TerminalRenderer,
    ) -> Self {
        Self {
            catalog,
            config,
            database_file,
            renderer,
        }
    }

    /// Opens the flag store only for commands that read or write flags.
    fn open_store(&self) -> Result<Persistence<SqliteBackend>> {
        StoreBuilder::new()
            .with_database_path(self.database_file.as_ref())
            .build()
            .context("Failed to open flag store")
    }

    pub fn handle_tour_command(&self, command: TourCommands) -> Result<()> {
        match command {
            TourCommands::List => self.list_tours(),
            TourCommands::Show(args) => self.show_tour(&args.id),
            TourCommands::Reset(args) => self.reset_tour(&args.id),
        }
    }

    pub fn handle_pending_command(&self, command: Option<PendingCommands>) -> Result<()> {
        match command.unwrap_or(PendingCommands::Show) {
            PendingCommands::Show => self.show_pending(),
            PendingCommands::Set(args) => self.set_pending(&args.id),
            PendingCommands::Clear => self.clear_pending(),
        }
    }

    pub fn list_tours(&self) -> Result<()> {
        let store = self.open_store()?;
        let pending = store.pending();
        let summaries = self
            .catalog
            .iter()
            .map(|tour| {
                TourSummary::new(
                    tour,
                    store.is_tour_completed(tour.id()),
                    pending.as_deref() == Some(tour.id()),
                )
            })
            .collect();
        self.renderer.show(&TourSummaries(summaries));
        Ok(())
    }

    pub fn show_tour(&self, id: &str) -> Result<()> {
        let tour = self.catalog.require(id)?;
        self.renderer.show(tour);
        Ok(())
    }

    pub fn reset_tour(&self, id: &str) -> Result<()> {
        self.catalog.require(id)?;
        let mut store = self.open_store()?;
        let removed = store
            .backend_mut()
            .delete_flag(&tour_completed_key(id))
            .with_context(|| format!("Failed to reset tour '{id}'"))?;

        let status = if removed {
            info!("Reset completion flag of tour '{id}'");
            OperationStatus::success(format!("Tour '{id}' will be offered again"))
        } else {
            OperationStatus::success(format!("Tour '{id}' had not been completed"))
        };
        self.renderer.show(&status);
        Ok(())
    }

    pub fn show_pending(&self) -> Result<()> {
        let store = self.open_store()?;
        let message = match store.pending() {
            Some(id) => format!("Pending tour: `{id}`\n"),
            None => "No pending tour.\n".to_string(),
        };
        self.renderer.render(&message);
        Ok(())
    }

    pub fn set_pending(&self, id: &str) -> Result<()> {
        self.catalog.require(id)?;
        let mut store = self.open_store()?;
        store.set_pending(id);
        self.renderer.show(&OperationStatus::success(format!(
            "Tour '{id}' will start on the next page load"
        )));
        Ok(())
    }

    pub fn clear_pending(&self) -> Result<()> {
        let mut store = self.open_store()?;
        store.clear_pending();
        self.renderer
            .show(&OperationStatus::success("Pending tour cleared"));
        Ok(())
    }

    pub fn list_flags(&self) -> Result<()> {
        let store = self.open_store()?;
        let flags = store
            .backend()
            .list_flags()
            .context("Failed to list flags")?;
        self.renderer.show(&FlagRecords(flags));
        Ok(())
    }

    pub fn place(&self, args: &PlaceArgs) {
        let request = PlacementRequest {
            target: args.target,
            container: args.container,
            side: args.side,
            tooltip: args.tooltip.unwrap_or(self.config.tooltip),
            viewport: args.viewport,
        };
        let placement =
            PlacementEngine::new(self.config.margin, self.config.edge_padding).place(&request);

        self.renderer.render(&format!(
            "- Tooltip: {placement}\n- Box: {}\n",
            placement.rect(request.tooltip)
        ));
    }

    pub async fn simulate(&self, args: &SimulateArgs) -> Result<()> {
        let script = Script::from_path(&args.script)?;
        info!("Simulating tour '{}'", script.tour);
        let report = Simulation::run(&self.catalog, self.config.clone(), script, args.realtime)
            .await
            .context("Simulation failed")?;
        self.renderer.show(&report);
        Ok(())
    }
}
