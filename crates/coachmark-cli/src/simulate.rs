//! Scripted sessions.
//!
//! A script names a tour, the page it runs on, and a list of actions stamped
//! with a millisecond offset. Between actions the engine is polled at the
//! configured interval, so mount timeouts and field watches behave as they
//! would in a live page. Flags are kept in memory and never touch the
//! database.

use std::{
    fmt,
    path::Path,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use coachmark_core::{
    store::tour_completed_key, EngineConfig, Frame, FlagStore, Key, Layout, MemoryBackend,
    Persistence, Rect, Size, TourCatalog, TourEngine, TourEngineBuilder, TourEvent, TourHandle,
    TourOptions, TourState, Transition, UiEvent,
};
use log::debug;
use serde::Deserialize;

type ScriptEngine = TourEngine<Layout, Persistence<MemoryBackend>>;

#[derive(Debug, Deserialize)]
pub struct Script {
    /// Tour to start at time zero
    pub tour: String,
    pub layout: Layout,
    #[serde(default)]
    pub actions: Vec<ScriptAction>,
    /// Keep polling until this offset after the last action
    #[serde(default)]
    pub until_ms: Option<u64>,
}

impl Script {
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse script {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
pub struct ScriptAction {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum Action {
    Next,
    Skip,
    Previous,
    GoTo {
        index: usize,
    },
    Abort,
    Click {
        element_id: String,
    },
    /// Sets a field value and reports the edit
    Type {
        element_id: String,
        value: String,
    },
    Key {
        key: Key,
    },
    Mount {
        element_id: String,
        rect: Rect,
        #[serde(default)]
        container: Option<String>,
    },
    Unmount {
        element_id: String,
    },
    OpenContainer {
        container_id: String,
        rect: Rect,
    },
    CloseContainer {
        container_id: String,
    },
    Resize {
        viewport: Size,
    },
    Scroll {
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
    },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Next => write!(f, "next"),
            Action::Skip => write!(f, "skip"),
            Action::Previous => write!(f, "previous"),
            Action::GoTo { index } => write!(f, "go to step {}", index + 1),
            Action::Abort => write!(f, "abort"),
            Action::Click { element_id } => write!(f, "click `{element_id}`"),
            Action::Type { element_id, value } => write!(f, "type \"{value}\" into `{element_id}`"),
            Action::Key { key } => write!(f, "press {key:?}"),
            Action::Mount { element_id, .. } => write!(f, "mount `{element_id}`"),
            Action::Unmount { element_id } => write!(f, "unmount `{element_id}`"),
            Action::OpenContainer { container_id, .. } => write!(f, "open `{container_id}`"),
            Action::CloseContainer { container_id } => write!(f, "close `{container_id}`"),
            Action::Resize { viewport } => {
                write!(f, "resize to {}x{}", viewport.width, viewport.height)
            }
            Action::Scroll { dx, dy } => write!(f, "scroll by {dx},{dy}"),
        }
    }
}

/// One line of the simulation log.
#[derive(Debug)]
pub struct Entry {
    pub at_ms: u64,
    pub label: String,
    pub transition: Option<Transition>,
    pub events: Vec<TourEvent>,
}

#[derive(Debug)]
pub struct SimulationReport {
    pub tour_id: String,
    pub entries: Vec<Entry>,
    pub final_state: TourState,
    pub completed_flag: bool,
    pub frame: Option<Frame>,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Simulation of `{}`", self.tour_id)?;
        writeln!(f)?;
        for entry in &self.entries {
            write!(f, "- {} ms: {}", entry.at_ms, entry.label)?;
            if let Some(transition) = &entry.transition {
                write!(f, " ({transition})")?;
            }
            writeln!(f)?;
            for event in &entry.events {
                writeln!(f, "  - {event}")?;
            }
        }
        writeln!(f)?;
        writeln!(f, "## Final state: {}", self.final_state)?;
        writeln!(f)?;
        writeln!(
            f,
            "- Completion flag: {}",
            if self.completed_flag { "set" } else { "not set" }
        )?;
        if let Some(frame) = &self.frame {
            writeln!(f)?;
            write!(f, "{frame}")?;
        }
        Ok(())
    }
}

/// Maps script offsets to instants, optionally waiting for the wall clock.
struct Clock {
    start: Instant,
    elapsed_ms: u64,
    realtime: bool,
}

impl Clock {
    fn new(realtime: bool) -> Self {
        Self {
            start: Instant::now(),
            elapsed_ms: 0,
            realtime,
        }
    }

    fn now(&self) -> Instant {
        self.start + Duration::from_millis(self.elapsed_ms)
    }

    async fn set(&mut self, at_ms: u64) {
        self.elapsed_ms = at_ms;
        if self.realtime {
            tokio::time::sleep_until(tokio::time::Instant::from_std(self.now())).await;
        }
    }
}

pub struct Simulation {
    engine: ScriptEngine,
    handle: TourHandle,
    clock: Clock,
    poll_ms: u64,
    entries: Vec<Entry>,
}

impl Simulation {
    /// Builds an engine over the script's layout and starts the tour.
    pub fn start(
        catalog: &TourCatalog,
        config: EngineConfig,
        tour_id: &str,
        layout: Layout,
        realtime: bool,
    ) -> Result<Self> {
        let tour = catalog.require(tour_id)?.clone();
        let poll_ms = config.poll_interval_ms;
        let mut engine = TourEngineBuilder::new(layout, Persistence::new(MemoryBackend::new()))
            .with_config(config)
            .build()
            .context("Failed to build tour engine")?;

        let clock = Clock::new(realtime);
        let handle = engine.start_tour(tour, TourOptions::new(), clock.now());
        let mut simulation = Self {
            engine,
            handle,
            clock,
            poll_ms,
            entries: Vec::new(),
        };
        simulation.record("start".to_string(), None);
        Ok(simulation)
    }

    /// Runs a whole script and reports what happened.
    pub async fn run(
        catalog: &TourCatalog,
        config: EngineConfig,
        script: Script,
        realtime: bool,
    ) -> Result<SimulationReport> {
        let Script {
            tour,
            layout,
            mut actions,
            until_ms,
        } = script;
        actions.sort_by_key(|action| action.at_ms);

        let mut simulation = Self::start(catalog, config, &tour, layout, realtime)?;
        for ScriptAction { at_ms, action } in actions {
            simulation.advance_to(at_ms).await;
            simulation.apply(action);
        }
        if let Some(until_ms) = until_ms {
            simulation.advance_to(until_ms).await;
        }
        Ok(simulation.finish())
    }

    /// Polls at every interval boundary up to `at_ms`.
    pub async fn advance_to(&mut self, at_ms: u64) {
        while self.engine.is_running() && self.clock.elapsed_ms + self.poll_ms <= at_ms {
            let next = self.clock.elapsed_ms + self.poll_ms;
            self.clock.set(next).await;
            let transition = self.engine.tick(self.clock.now());
            let events = self.engine.take_events();
            if transition.is_change() || !events.is_empty() {
                self.entries.push(Entry {
                    at_ms: next,
                    label: "poll".to_string(),
                    transition: Some(transition).filter(Transition::is_change),
                    events,
                });
            }
        }
        if at_ms > self.clock.elapsed_ms {
            self.clock.set(at_ms).await;
        }
    }

    pub fn apply(&mut self, action: Action) {
        debug!("Script action at {} ms: {action}", self.clock.elapsed_ms);
        let label = action.to_string();
        let now = self.clock.now();
        let handle = &self.handle;
        let engine = &mut self.engine;

        let transition = match action {
            Action::Next => engine.next(handle, now),
            Action::Skip => engine.skip(handle, now),
            Action::Previous => engine.previous(handle, now),
            Action::GoTo { index } => engine.go_to(handle, index, now),
            Action::Abort => engine.abort(handle),
            Action::Click { element_id } => engine.dispatch(UiEvent::click(element_id), now),
            Action::Type { element_id, value } => {
                engine.locator_mut().set_value(&element_id, value);
                engine.dispatch(UiEvent::input(element_id), now)
            }
            Action::Key { key } => engine.dispatch(UiEvent::Key { key }, now),
            Action::Mount {
                element_id,
                rect,
                container,
            } => {
                match container {
                    Some(container) => engine.locator_mut().mount_in(element_id, rect, container),
                    None => engine.locator_mut().mount(element_id, rect),
                };
                engine.dispatch(UiEvent::Mutation, now)
            }
            Action::Unmount { element_id } => {
                engine.locator_mut().unmount(&element_id);
                engine.dispatch(UiEvent::Mutation, now)
            }
            Action::OpenContainer { container_id, rect } => {
                engine.locator_mut().open_container(container_id, rect);
                engine.dispatch(UiEvent::Mutation, now)
            }
            Action::CloseContainer { container_id } => {
                engine.locator_mut().close_container(&container_id);
                engine.dispatch(UiEvent::Mutation, now)
            }
            Action::Resize { viewport } => {
                engine.locator_mut().resize(viewport);
                engine.dispatch(UiEvent::Resize, now)
            }
            Action::Scroll { dx, dy } => {
                engine.locator_mut().scroll_by(dx, dy);
                engine.dispatch(UiEvent::Scroll, now)
            }
        };
        self.record(label, Some(transition));
    }

    fn record(&mut self, label: String, transition: Option<Transition>) {
        self.entries.push(Entry {
            at_ms: self.clock.elapsed_ms,
            label,
            transition,
            events: self.engine.take_events(),
        });
    }

    pub fn finish(self) -> SimulationReport {
        SimulationReport {
            tour_id: self.handle.tour_id().to_string(),
            completed_flag: self
                .engine
                .store()
                .get_flag(&tour_completed_key(self.handle.tour_id())),
            final_state: self.engine.state(),
            frame: self.engine.frame().cloned(),
            entries: self.entries,
        }
    }
}
