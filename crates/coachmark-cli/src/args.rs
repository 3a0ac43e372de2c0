//! Command-line argument definitions using clap's derive API.
//!
//! Argument types stay in this crate; handlers in [`crate::cli`] translate
//! them into calls on the core engine, catalog and store.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use coachmark_core::{Rect, Side, Size};

/// Terminal host for the coachmark guided-tour engine
///
/// Inspects the tour catalog, manages the persisted completion flags and the
/// pending-tour slot, computes tooltip placements, and replays scripted
/// sessions against a static page layout.
#[derive(Parser)]
#[command(version, about, name = "coachmark")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/coachmark/coachmark.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// JSON file with engine settings (poll interval, mount timeout, sizes)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON file with additional tours, merged over the built-in catalog
    #[arg(long, global = true)]
    pub tours: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and reset tours
    #[command(alias = "t")]
    Tour {
        #[command(subcommand)]
        command: TourCommands,
    },
    /// Inspect or edit the pending-tour slot
    Pending {
        #[command(subcommand)]
        command: Option<PendingCommands>,
    },
    /// List persisted flags
    Flags,
    /// Compute a tooltip placement
    Place(PlaceArgs),
    /// Replay a scripted session against a tour
    #[command(alias = "sim")]
    Simulate(SimulateArgs),
}

#[derive(Subcommand)]
pub enum TourCommands {
    /// List catalog tours with their completion status
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show the steps of a tour
    #[command(alias = "s")]
    Show(TourIdArgs),
    /// Clear a tour's completion flag so it is offered again
    #[command(alias = "r")]
    Reset(TourIdArgs),
}

#[derive(Subcommand)]
pub enum PendingCommands {
    /// Show the pending tour
    Show,
    /// Mark a tour to start on the next page load
    Set(TourIdArgs),
    /// Clear the pending slot
    Clear,
}

#[derive(ClapArgs)]
pub struct TourIdArgs {
    /// Identifier of the tour
    #[arg(help = "Tour identifier, as listed by `tour list`")]
    pub id: String,
}

/// Compute where a tooltip goes for a target box
///
/// Boxes are `left,top,width,height` and sizes are `width,height`, in CSS
/// pixels with the origin at the top-left corner of the viewport.
#[derive(ClapArgs)]
pub struct PlaceArgs {
    /// Target box; omit for a centered tooltip
    #[arg(long, value_name = "L,T,W,H")]
    pub target: Option<Rect>,
    /// Floating container (dialog, drawer) the target lives in
    #[arg(long, value_name = "L,T,W,H")]
    pub container: Option<Rect>,
    /// Preferred side: top, bottom, left, right or center
    #[arg(long, default_value = "bottom")]
    pub side: Side,
    /// Tooltip size; defaults to the configured tooltip size
    #[arg(long, value_name = "W,H")]
    pub tooltip: Option<Size>,
    /// Viewport size
    #[arg(long, value_name = "W,H", default_value = "1280,800")]
    pub viewport: Size,
}

/// Replay a scripted session
///
/// The script names a tour, a page layout, and a list of timed actions. Time
/// is virtual unless --realtime is given.
#[derive(ClapArgs)]
pub struct SimulateArgs {
    /// Path to the JSON script
    pub script: PathBuf,
    /// Pace the script with wall-clock timers
    #[arg(long)]
    pub realtime: bool,
}
