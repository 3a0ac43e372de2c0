//! Lifecycle states of a running tour.

use serde::{Deserialize, Serialize};

/// The controller's state machine.
///
/// ```text
/// Idle ──start──▶ StepActive(0) ──next/skip/action──▶ StepActive(i+1)
///                     │    ▲                               │
///                     │    └──────────previous/go_to───────┘
///                     ├──terminal advance──▶ Completed
///                     └──abort──────────────▶ Aborted
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", tag = "state", content = "index")]
pub enum TourState {
    /// No tour has been started
    #[default]
    Idle,
    /// Step at the given index is on screen
    StepActive(usize),
    /// Terminal step was completed and persisted
    Completed,
    /// Tour was dismissed before completion
    Aborted,
}

impl TourState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TourState::Idle => "idle",
            TourState::StepActive(_) => "active",
            TourState::Completed => "completed",
            TourState::Aborted => "aborted",
        }
    }

    /// Index of the active step, if any.
    pub fn current_index(&self) -> Option<usize> {
        match self {
            TourState::StepActive(index) => Some(*index),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TourState::StepActive(_))
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TourState::Completed | TourState::Aborted)
    }
}
