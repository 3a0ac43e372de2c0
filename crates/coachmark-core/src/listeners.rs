//! Listener bookkeeping for the active step.
//!
//! Every subscription the engine holds on host elements is recorded in a
//! [`ListenerSet`]. The set belongs to exactly one step at a time:
//! [`ListenerSet::begin`] detaches everything armed for the previous owner
//! before the new owner can arm anything, so two steps can never have live
//! listeners at once.

use log::debug;
use serde::Serialize;

/// What a listener reacts to.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ListenerKind {
    /// Click on the step's own target
    TargetClick,
    /// Click on an element other than the target
    ActionClick,
    /// Edits to a watched form field
    FieldInput,
}

/// One armed subscription.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Listener {
    pub id: u64,
    /// Index of the step that armed it
    pub step: usize,
    pub element_id: String,
    pub kind: ListenerKind,
    /// Detached as soon as it fires
    pub once: bool,
}

/// Listeners armed for the current step.
#[derive(Debug, Default)]
pub struct ListenerSet {
    owner: Option<usize>,
    armed: Vec<Listener>,
    next_id: u64,
    detached: u64,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands the set to `step`, detaching whatever the previous step armed.
    ///
    /// Returns the number of listeners detached.
    pub fn begin(&mut self, step: usize) -> usize {
        let detached = self.teardown();
        self.owner = Some(step);
        detached
    }

    /// Detaches every listener and releases ownership.
    pub fn teardown(&mut self) -> usize {
        let count = self.armed.len();
        if count > 0 {
            debug!("Detaching {count} listener(s) of step {:?}", self.owner);
        }
        self.detached += count as u64;
        self.armed.clear();
        self.owner = None;
        count
    }

    /// Arms a listener for the current owner. Without an owner nothing is
    /// armed and `None` is returned.
    pub fn arm(&mut self, element_id: &str, kind: ListenerKind, once: bool) -> Option<u64> {
        let step = self.owner?;
        if self.is_armed(element_id, kind) {
            return None;
        }
        self.next_id += 1;
        let id = self.next_id;
        debug!("Arming {kind:?} listener #{id} on '{element_id}' for step {step}");
        self.armed.push(Listener {
            id,
            step,
            element_id: element_id.to_string(),
            kind,
            once,
        });
        Some(id)
    }

    pub fn is_armed(&self, element_id: &str, kind: ListenerKind) -> bool {
        self.armed
            .iter()
            .any(|l| l.kind == kind && l.element_id == element_id)
    }

    /// Delivers a click. A matching one-shot listener is detached before it
    /// is returned, so a second click on the same element finds nothing.
    pub fn fire_click(&mut self, element_id: &str) -> Option<Listener> {
        let position = self.armed.iter().position(|l| {
            l.element_id == element_id
                && matches!(l.kind, ListenerKind::TargetClick | ListenerKind::ActionClick)
        })?;
        if self.armed[position].once {
            self.detached += 1;
            Some(self.armed.remove(position))
        } else {
            Some(self.armed[position].clone())
        }
    }

    /// Whether an edit to `element_id` is being watched.
    pub fn watches_input(&self, element_id: &str) -> bool {
        self.is_armed(element_id, ListenerKind::FieldInput)
    }

    pub fn owner(&self) -> Option<usize> {
        self.owner
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listener> {
        self.armed.iter()
    }

    pub fn len(&self) -> usize {
        self.armed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }

    /// Total listeners detached over the set's lifetime.
    pub fn detached_total(&self) -> u64 {
        self.detached
    }
}
