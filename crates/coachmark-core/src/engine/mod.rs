//! The tour controller.
//!
//! [`TourEngine`] owns at most one running tour and drives it through the
//! [`TourState`] machine. It is single-threaded and never blocks: the host
//! forwards UI events through [`TourEngine::dispatch`] and calls
//! [`TourEngine::tick`] on a timer, passing the current [`Instant`] so that
//! every wait is deterministic under test.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌──────────────────┐
//! │     Host     │    │    TourEngine    │    │  TargetLocator   │
//! │ (dispatch,   │───▶│ (transitions,    │───▶│  FlagStore       │
//! │  tick, API)  │    │  polling)        │    │  PlacementEngine │
//! └──────────────┘    └──────────────────┘    └──────────────────┘
//!                              │
//!                              ▼
//!                      Frame + TourEvents
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: assembles an engine from a locator, a store and a config
//! - [`config`]: timing and layout knobs
//! - [`events`]: UI inputs, published events and transition outcomes
//! - [`options`]: host callbacks for one run
//! - `transitions`: step entry, advance, completion and abort
//! - `polling`: mount waits, field re-evaluation and frame refresh
//!
//! ## Run ownership
//!
//! Everything a run arms (listeners, waits, the cached frame) lives in its
//! `TourRun`. While a transition executes, the run is taken out of the
//! engine; anything arriving for a run that is no longer installed is
//! answered with [`Transition::Stale`] and has no effect. Ending a run drops
//! its waits, so a timer can never advance a tour that has already ended.
//!
//! # Usage Examples
//!
//! ```rust
//! use std::time::Instant;
//!
//! use coachmark_core::{
//!     engine::{TourEngineBuilder, TourOptions, Transition, UiEvent},
//!     geometry::{Rect, Size},
//!     locator::Layout,
//!     models::{Side, Step, Tour, TourState},
//!     store::{FlagStore, MemoryBackend, Persistence},
//! };
//!
//! let mut layout = Layout::new(Size::new(1280.0, 800.0));
//! layout.mount("btn-a", Rect::new(100.0, 100.0, 80.0, 32.0));
//!
//! let tour = Tour::builder("demo", "Demo")
//!     .step(Step::new("click", "Click", "Press the button.").at("btn-a", Side::Bottom).on_target_click())
//!     .step(Step::new("done", "Done", "That's it."))
//!     .build()
//!     .unwrap();
//!
//! let mut engine = TourEngineBuilder::new(layout, Persistence::new(MemoryBackend::new()))
//!     .build()
//!     .unwrap();
//!
//! let now = Instant::now();
//! let handle = engine.start_tour(tour, TourOptions::new(), now);
//! engine.dispatch(UiEvent::click("btn-a"), now);
//! assert_eq!(engine.next(&handle, now), Transition::Completed);
//! assert_eq!(engine.state(), TourState::Completed);
//! assert!(engine.store().get_flag("tour.demo.completed"));
//! ```

use std::time::Instant;

use log::info;
use serde::Serialize;

use crate::{
    catalog::TourCatalog,
    error::{Result, TourError},
    geometry::Size,
    listeners::ListenerSet,
    locator::TargetLocator,
    models::{Step, Tour, TourState},
    overlay::Frame,
    placement::PlacementEngine,
    store::{tour_completed_key, FlagStore},
    wait::{Wait, WaitSet},
};

pub mod builder;
pub mod config;
pub mod events;
pub mod options;
mod polling;
mod transitions;


pub use builder::TourEngineBuilder;
pub use config::EngineConfig;
pub use events::{Key, Rejection, TourEvent, Transition, UiEvent};
pub use options::TourOptions;

/// Token identifying one run of a tour.
///
/// Handles outlive their run; calls made with a handle whose run has ended
/// are rejected instead of touching whatever tour is current.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TourHandle {
    run_id: u64,
    tour_id: String,
}

impl TourHandle {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn tour_id(&self) -> &str {
        &self.tour_id
    }
}

/// State owned by one active run.
#[derive(Debug)]
struct TourRun {
    id: u64,
    tour: Tour,
    options: TourOptions,
    state: TourState,
    listeners: ListenerSet,
    waits: WaitSet,
    frame: Option<Frame>,
    tooltip: Size,
    /// The watched element has been looked up and bound this activation
    bound: bool,
    degraded: bool,
    /// Highest step index entered so far
    furthest: usize,
    /// The active step was already passed once and has been returned to
    revisited: bool,
}

impl TourRun {
    fn index(&self) -> Option<usize> {
        self.state.current_index()
    }

    fn current_step(&self) -> Option<&Step> {
        self.index().and_then(|i| self.tour.step(i))
    }

    fn handle(&self) -> TourHandle {
        TourHandle {
            run_id: self.id,
            tour_id: self.tour.id().to_string(),
        }
    }
}

/// Drives guided tours against a host surface and a flag store.
pub struct TourEngine<L, S> {
    locator: L,
    store: S,
    config: EngineConfig,
    placement: PlacementEngine,
    run: Option<TourRun>,
    /// State of the most recently ended run
    last_state: TourState,
    last_run_id: Option<u64>,
    next_run_id: u64,
    events: Vec<TourEvent>,
}

impl<L: TargetLocator, S: FlagStore> TourEngine<L, S> {
    pub(crate) fn new(locator: L, store: S, config: EngineConfig) -> Self {
        let placement = PlacementEngine::new(config.margin, config.edge_padding);
        Self {
            locator,
            store,
            config,
            placement,
            run: None,
            last_state: TourState::Idle,
            last_run_id: None,
            next_run_id: 1,
            events: Vec::new(),
        }
    }

    /// Starts `tour` at its first step.
    ///
    /// A tour that is already running is torn down first, without persisting
    /// anything or publishing `Aborted`.
    pub fn start_tour(&mut self, tour: Tour, options: TourOptions, now: Instant) -> TourHandle {
        if self.run.is_some() {
            self.unmount();
        }

        let id = self.next_run_id;
        self.next_run_id += 1;
        info!("Starting tour '{}' ({} steps, run #{id})", tour.id(), tour.len());

        let mut run = TourRun {
            id,
            tour,
            options,
            state: TourState::Idle,
            listeners: ListenerSet::new(),
            waits: WaitSet::new(),
            frame: None,
            tooltip: self.config.tooltip,
            bound: false,
            degraded: false,
            furthest: 0,
            revisited: false,
        };
        let handle = run.handle();
        self.enter_step(&mut run, 0, now);
        let event = TourEvent::StepChanged {
            tour_id: handle.tour_id.clone(),
            index: 0,
        };
        self.emit(&mut run, event);
        self.install(run);
        handle
    }

    /// Looks `tour_id` up in `catalog` and starts it.
    pub fn start_tour_by_id(
        &mut self,
        catalog: &TourCatalog,
        tour_id: &str,
        options: TourOptions,
        now: Instant,
    ) -> Result<TourHandle> {
        let tour = catalog.get(tour_id).ok_or_else(|| TourError::UnknownTour {
            id: tour_id.to_string(),
        })?;
        Ok(self.start_tour(tour.clone(), options, now))
    }

    /// Starts the tour named by the pending slot, if it should run.
    ///
    /// The slot is re-read rather than trusted from an earlier write. A
    /// marker naming an unknown or already completed tour is cleared. When
    /// the named tour is already running nothing happens.
    pub fn resume_pending(&mut self, catalog: &TourCatalog, now: Instant) -> Option<TourHandle> {
        let tour_id = self.store.pending()?;

        if let Some(run) = &self.run {
            if run.tour.id() == tour_id && run.state.is_active() {
                return None;
            }
        }

        let Some(tour) = catalog.get(&tour_id) else {
            info!("Clearing pending marker for unknown tour '{tour_id}'");
            self.store.clear_pending();
            return None;
        };
        if self.store.get_flag(&tour_completed_key(&tour_id)) {
            info!("Clearing pending marker for completed tour '{tour_id}'");
            self.store.clear_pending();
            return None;
        }

        Some(self.start_tour(tour.clone(), TourOptions::new(), now))
    }

    /// Advances past the current step, subject to its completion guard.
    pub fn next(&mut self, handle: &TourHandle, now: Instant) -> Transition {
        self.with_run(handle, |engine, run| engine.try_next(run, now))
    }

    /// Skips the current step without running its effects.
    pub fn skip(&mut self, handle: &TourHandle, now: Instant) -> Transition {
        self.with_run(handle, |engine, run| engine.try_skip(run, now))
    }

    /// Goes back one step. No effects are re-run.
    pub fn previous(&mut self, handle: &TourHandle, now: Instant) -> Transition {
        self.with_run(handle, |engine, run| engine.try_previous(run, now))
    }

    /// Jumps to an arbitrary step. No effects are run.
    pub fn go_to(&mut self, handle: &TourHandle, index: usize, now: Instant) -> Transition {
        self.with_run(handle, |engine, run| engine.jump(run, index, now))
    }

    /// Dismisses the tour. Safe to call at any time, including while waits
    /// are outstanding.
    pub fn abort(&mut self, handle: &TourHandle) -> Transition {
        self.with_run(handle, |engine, run| engine.abort_run(run))
    }

    /// Handles one host UI event for whatever run is active.
    pub fn dispatch(&mut self, event: UiEvent, now: Instant) -> Transition {
        match self.run.as_ref().map(TourRun::handle) {
            Some(handle) => self.with_run(&handle, |engine, run| engine.handle_event(run, event, now)),
            None => Transition::Unchanged,
        }
    }

    /// Services the active run's waits that are due at `now`.
    pub fn tick(&mut self, now: Instant) -> Transition {
        match self.run.as_ref().map(TourRun::handle) {
            Some(handle) => self.with_run(&handle, |engine, run| engine.poll(run, now)),
            None => Transition::Unchanged,
        }
    }

    /// Tears the active run down because the host view went away.
    ///
    /// Nothing is persisted and no event is published; the run's waits and
    /// listeners are released.
    pub fn unmount(&mut self) {
        if let Some(mut run) = self.run.take() {
            info!("Unmounting tour '{}' (run #{})", run.tour.id(), run.id);
            run.listeners.teardown();
            run.waits.cancel_all();
            self.last_run_id = Some(run.id);
            self.last_state = TourState::Idle;
        }
    }

    /// Current state of the active run, or the final state of the last one.
    pub fn state(&self) -> TourState {
        self.run.as_ref().map_or(self.last_state, |run| run.state)
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Handle of the active run.
    pub fn handle(&self) -> Option<TourHandle> {
        self.run.as_ref().map(TourRun::handle)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.run.as_ref().and_then(TourRun::index)
    }

    pub fn current_tour(&self) -> Option<&Tour> {
        self.run.as_ref().map(|run| &run.tour)
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.run.as_ref().and_then(TourRun::current_step)
    }

    /// Last computed render frame.
    pub fn frame(&self) -> Option<&Frame> {
        self.run.as_ref().and_then(|run| run.frame.as_ref())
    }

    pub fn listeners(&self) -> Option<&ListenerSet> {
        self.run.as_ref().map(|run| &run.listeners)
    }

    /// Outstanding waits of the active run.
    pub fn pending_waits(&self) -> Vec<&Wait> {
        self.run
            .as_ref()
            .map(|run| run.waits.iter().collect())
            .unwrap_or_default()
    }

    /// Drains the events published since the last call.
    pub fn take_events(&mut self) -> Vec<TourEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Mutable access to the host surface. Call [`TourEngine::dispatch`]
    /// with a `Mutation` event afterwards so the frame catches up.
    pub fn locator_mut(&mut self) -> &mut L {
        &mut self.locator
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs `f` with the run named by `handle` taken out of the engine.
    fn with_run<F>(&mut self, handle: &TourHandle, f: F) -> Transition
    where
        F: FnOnce(&mut Self, &mut TourRun) -> Transition,
    {
        let Some(mut run) = self.run.take() else {
            return self.ended(handle);
        };
        if run.id != handle.run_id {
            self.run = Some(run);
            return Transition::Stale;
        }
        let transition = f(self, &mut run);
        self.install(run);
        transition
    }

    fn ended(&self, handle: &TourHandle) -> Transition {
        if self.last_run_id == Some(handle.run_id) {
            Transition::rejected(Rejection::NotActive)
        } else {
            Transition::Stale
        }
    }

    /// Puts a run back, or retires it if it has finished.
    fn install(&mut self, run: TourRun) {
        if run.state.is_finished() {
            self.last_state = run.state;
            self.last_run_id = Some(run.id);
        } else {
            self.run = Some(run);
        }
    }

    fn emit(&mut self, run: &mut TourRun, event: TourEvent) {
        run.options.notify(&event);
        self.events.push(event);
    }
}
