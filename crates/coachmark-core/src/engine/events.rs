//! Inputs to and outputs from the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Host UI events the engine reacts to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum UiEvent {
    /// An element was clicked
    Click { element_id: String },
    /// A form field was edited
    Input { element_id: String },
    /// The window was resized
    Resize,
    /// The page or a scrollable ancestor scrolled
    Scroll,
    /// Elements were added, removed or moved
    Mutation,
    /// A key was pressed while the tour was on screen
    Key { key: Key },
    /// The host measured the rendered tooltip
    TooltipMeasured { size: Size },
}

impl UiEvent {
    pub fn click(element_id: impl Into<String>) -> Self {
        UiEvent::Click {
            element_id: element_id.into(),
        }
    }

    pub fn input(element_id: impl Into<String>) -> Self {
        UiEvent::Input {
            element_id: element_id.into(),
        }
    }
}

/// Keys with a tour binding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Dismisses the tour
    Escape,
    /// Previous step
    ArrowLeft,
    /// Next step
    ArrowRight,
    /// Next step
    Enter,
}

/// Notifications published to the host.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum TourEvent {
    /// A step became active
    StepChanged { tour_id: String, index: usize },
    /// A step was completed by its action or by Next (not by Skip)
    StepCompleted { tour_id: String, index: usize },
    /// The terminal step completed; the completion flag is already written
    Completed { tour_id: String },
    /// The tour was dismissed
    Aborted { tour_id: String },
    /// A side effect asked the host to navigate
    Navigate { route: String },
    /// An element never mounted within the wait bound
    TargetMissing {
        tour_id: String,
        step_id: String,
        element_id: String,
    },
}

/// Why a requested transition did not happen.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The step does not offer Skip
    NotSkippable,
    /// Required fields are still empty
    FieldsIncomplete,
    /// The step completes on a click, not on Next
    AwaitingAction,
    /// Previous on the first step
    AtFirstStep,
    /// Jump target outside the tour
    OutOfRange { index: usize, len: usize },
    /// The tour is not on a step
    NotActive,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotSkippable => write!(f, "this step cannot be skipped"),
            Rejection::FieldsIncomplete => write!(f, "required fields are empty"),
            Rejection::AwaitingAction => write!(f, "waiting for the highlighted action"),
            Rejection::AtFirstStep => write!(f, "already at the first step"),
            Rejection::OutOfRange { index, len } => {
                write!(f, "step {index} is out of range for a tour of {len} steps")
            }
            Rejection::NotActive => write!(f, "the tour is not running"),
        }
    }
}

/// Outcome of a control call, event or tick.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum Transition {
    Moved { from: usize, to: usize },
    Completed,
    Aborted,
    /// Nothing to do
    Unchanged,
    Rejected { reason: Rejection },
    /// The handle belongs to a run that has ended or been replaced
    Stale,
}

impl Transition {
    pub fn rejected(reason: Rejection) -> Self {
        Transition::Rejected { reason }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Transition::Rejected { .. })
    }

    /// Whether the state machine changed state.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Transition::Moved { .. } | Transition::Completed | Transition::Aborted
        )
    }
}
