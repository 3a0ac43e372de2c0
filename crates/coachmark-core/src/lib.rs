//! Core library for the Coachmark guided-tour engine.
//!
//! A tour is declarative data ([`models::Tour`]): an ordered list of steps,
//! each optionally pointing at a host element by stable identifier and saying
//! what moves it forward. [`TourEngine`] runs one tour at a time against a
//! host surface ([`locator::TargetLocator`]) and a flag store
//! ([`store::FlagStore`]), computing viewport-safe tooltip positions with
//! [`placement::PlacementEngine`] and publishing a render [`overlay::Frame`]
//! plus [`engine::TourEvent`]s.
//!
//! # Display Architecture
//!
//! - **Domain Models** ([`models`]): implement [`std::fmt::Display`] as
//!   markdown
//! - **Display Wrappers** ([`display`]): listings and operation feedback
//! - **Terminal Rendering**: done by the CLI's renderer
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::{Duration, Instant};
//!
//! use coachmark_core::{
//!     catalog::TourCatalog,
//!     engine::{TourEngineBuilder, TourOptions, Transition},
//!     geometry::Size,
//!     locator::Layout,
//!     store::{MemoryBackend, Persistence},
//! };
//!
//! let catalog = TourCatalog::builtin()?;
//! let layout = Layout::new(Size::new(1280.0, 800.0));
//! let mut engine = TourEngineBuilder::new(layout, Persistence::new(MemoryBackend::new())).build()?;
//!
//! let start = Instant::now();
//! let handle = engine.start_tour_by_id(&catalog, "product-tutorial", TourOptions::new(), start)?;
//! assert_eq!(engine.next(&handle, start), Transition::Moved { from: 0, to: 1 });
//!
//! // The dashboard is not on screen; after the mount timeout the step
//! // degrades to a centered tooltip instead of blocking.
//! engine.tick(start + Duration::from_secs(5));
//! assert!(engine.frame().unwrap().degraded);
//! # Ok::<(), coachmark_core::TourError>(())
//! ```

pub mod catalog;
pub mod display;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod listeners;
pub mod locator;
pub mod models;
pub mod overlay;
pub mod placement;
pub mod store;
pub mod wait;

// Re-export commonly used types
pub use catalog::TourCatalog;
pub use display::{FlagRecords, LocalDateTime, OperationStatus, TourSummaries};
pub use engine::{
    EngineConfig, Key, Rejection, TourEngine, TourEngineBuilder, TourEvent, TourHandle,
    TourOptions, Transition, UiEvent,
};
pub use error::{Result, TourError};
pub use geometry::{Point, Rect, Size};
pub use locator::{Layout, Located, TargetLocator};
pub use models::{
    Completion, FieldPredicate, Side, SideEffect, Step, Tour, TourBuilder, TourState, TourSummary,
};
pub use overlay::{Controls, Frame, Hotspot};
pub use placement::{Placement, PlacementEngine, PlacementRequest, PlacementStage};
pub use store::{FlagStore, MemoryBackend, Persistence, SqliteBackend, StoreBuilder};
