//! Display formatting for tours, frames and persisted flags.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and operation feedback get newtype wrappers. Everything is
//! written as markdown so the CLI can render it with rich formatting or print
//! it as plain text.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers        │    │   Formatted     │
//! │  (Tour, Frame)  │───▶│ (TourSummaries, │───▶│    Output       │
//! │                 │    │  FlagRecords)   │    │   (Terminal)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: `TourSummaries`, `FlagRecords`
//! - [`status`]: `OperationStatus` confirmation lines
//! - [`datetime`]: `LocalDateTime`
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage Examples
//!
//! ```rust
//! use coachmark_core::{catalog::TourCatalog, display::TourSummaries, models::TourSummary};
//!
//! let catalog = TourCatalog::builtin().unwrap();
//! let summaries = TourSummaries(
//!     catalog
//!         .iter()
//!         .map(|tour| TourSummary::new(tour, false, false))
//!         .collect(),
//! );
//! let output = summaries.to_string();
//! assert!(output.contains("team-invite"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::{FlagRecords, TourSummaries};
pub use datetime::LocalDateTime;
pub use status::OperationStatus;
