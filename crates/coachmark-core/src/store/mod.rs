//! Persistence of tour progress flags.
//!
//! The engine talks to storage only through [`FlagStore`], a deliberately
//! narrow key/boolean contract plus one "pending tour" slot. It is
//! infallible: losing persisted progress is acceptable, a crashing tour is
//! not.
//!
//! Storage technologies implement the fallible [`FlagBackend`] instead, and
//! [`Persistence`] adapts one to the other:
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌──────────────────┐
//! │  TourEngine  │───▶│  Persistence<B>  │───▶│  MemoryBackend   │
//! │ (FlagStore)  │    │ (swallows errors)│    │  SqliteBackend   │
//! └──────────────┘    └──────────────────┘    └──────────────────┘
//! ```
//!
//! Flags are shared mutable state with last-write-wins semantics. Callers
//! re-read instead of trusting what they last wrote.

use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{Result, TourError};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::{FlagRecord, SqliteBackend};

/// Name of the slot holding the tour to auto-start on the next page load.
pub const PENDING_SLOT: &str = "pendingTour";

/// Key under which a tour's completion is stored.
pub fn tour_completed_key(tour_id: &str) -> String {
    format!("tour.{tour_id}.completed")
}

/// Key of a host checklist module's completion flag.
pub fn module_completed_key(module_id: &str) -> String {
    format!("module.{module_id}.completed")
}

/// The persistence contract consumed by the engine.
pub trait FlagStore {
    /// Reads a flag; missing or unreadable flags are `false`.
    fn get_flag(&self, key: &str) -> bool;

    /// Writes a flag on a best-effort basis.
    fn set_flag(&mut self, key: &str, value: bool);

    /// Tour that should start on the next relevant page load.
    fn pending(&self) -> Option<String>;

    fn set_pending(&mut self, tour_id: &str);

    fn clear_pending(&mut self);
}

/// A storage technology able to hold flags and named slots.
pub trait FlagBackend {
    fn read_flag(&self, key: &str) -> Result<Option<bool>>;

    fn write_flag(&mut self, key: &str, value: bool) -> Result<()>;

    fn read_slot(&self, name: &str) -> Result<Option<String>>;

    fn write_slot(&mut self, name: &str, value: &str) -> Result<()>;

    fn remove_slot(&mut self, name: &str) -> Result<()>;
}

/// Adapts a [`FlagBackend`] to the infallible [`FlagStore`] contract.
///
/// Read failures are reported as "not set", write failures are logged and
/// dropped.
#[derive(Debug, Default)]
pub struct Persistence<B> {
    backend: B,
}

impl<B: FlagBackend> Persistence<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Whether the given tour has been completed.
    pub fn is_tour_completed(&self, tour_id: &str) -> bool {
        self.get_flag(&tour_completed_key(tour_id))
    }
}

impl<B: FlagBackend> FlagStore for Persistence<B> {
    fn get_flag(&self, key: &str) -> bool {
        match self.backend.read_flag(key) {
            Ok(value) => value.unwrap_or(false),
            Err(e) => {
                warn!("Treating flag '{key}' as unset: {e}");
                false
            }
        }
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        if let Err(e) = self.backend.write_flag(key, value) {
            warn!("Dropping write of flag '{key}': {e}");
        }
    }

    fn pending(&self) -> Option<String> {
        match self.backend.read_slot(PENDING_SLOT) {
            Ok(value) => value.filter(|id| !id.trim().is_empty()),
            Err(e) => {
                warn!("Treating pending tour as unset: {e}");
                None
            }
        }
    }

    fn set_pending(&mut self, tour_id: &str) {
        if let Err(e) = self.backend.write_slot(PENDING_SLOT, tour_id) {
            warn!("Dropping pending tour '{tour_id}': {e}");
        }
    }

    fn clear_pending(&mut self) {
        if let Err(e) = self.backend.remove_slot(PENDING_SLOT) {
            warn!("Failed to clear pending tour: {e}");
        }
    }
}

/// Builder for opening the SQLite-backed store.
#[derive(Debug, Clone, Default)]
pub struct StoreBuilder {
    database_path: Option<PathBuf>,
}

impl StoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/coachmark/coachmark.db` or
    /// `~/.local/share/coachmark/coachmark.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Opens the store, creating the database and its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `TourError::FileSystem` if the parent directory cannot be
    /// created, `TourError::XdgDirectory` if no default path can be resolved,
    /// and `TourError::Database` if the database cannot be initialized.
    pub fn build(self) -> Result<Persistence<SqliteBackend>> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TourError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        Ok(Persistence::new(SqliteBackend::open(&db_path)?))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("coachmark")
            .place_data_file("coachmark.db")
            .map_err(|e| TourError::XdgDirectory(e.to_string()))
    }
}
