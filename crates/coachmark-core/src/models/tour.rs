//! Tour model: an immutable, validated sequence of steps.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Completion, SideEffect, Step};
use crate::error::{Result, TourError};

/// A named, ordered sequence of steps.
///
/// Tours are pure data. They are validated once, when built, so an authoring
/// defect fails fast instead of stranding a user halfway through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "TourDefinition")]
pub struct Tour {
    id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    steps: Vec<Step>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    effects: Vec<SideEffect>,
    abort_completes: bool,
}

/// Unvalidated tour as authored in JSON.
#[derive(Debug, Clone, Deserialize)]
struct TourDefinition {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    steps: Vec<Step>,
    #[serde(default)]
    effects: Vec<SideEffect>,
    #[serde(default)]
    abort_completes: bool,
}

impl TryFrom<TourDefinition> for Tour {
    type Error = TourError;

    fn try_from(def: TourDefinition) -> Result<Self> {
        let mut builder = TourBuilder::new(def.id, def.title)
            .steps(def.steps)
            .abort_completes(def.abort_completes);
        if let Some(description) = def.description {
            builder = builder.description(description);
        }
        for effect in def.effects {
            builder = builder.on_complete(effect);
        }
        builder.build()
    }
}

impl Tour {
    /// Starts building a tour.
    pub fn builder(id: impl Into<String>, title: impl Into<String>) -> TourBuilder {
        TourBuilder::new(id, title)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a validated tour.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Effects applied once, when the terminal step completes.
    pub fn effects(&self) -> &[SideEffect] {
        &self.effects
    }

    /// Whether dismissing the tour counts as completing it.
    pub fn abort_completes(&self) -> bool {
        self.abort_completes
    }
}

/// Builder that validates tour invariants on [`TourBuilder::build`].
#[derive(Debug, Clone)]
pub struct TourBuilder {
    id: String,
    title: String,
    description: Option<String>,
    steps: Vec<Step>,
    effects: Vec<SideEffect>,
    abort_completes: bool,
}

impl TourBuilder {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            steps: Vec::new(),
            effects: Vec::new(),
            abort_completes: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Adds an effect applied when the tour completes.
    pub fn on_complete(mut self, effect: SideEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn abort_completes(mut self, abort_completes: bool) -> Self {
        self.abort_completes = abort_completes;
        self
    }

    /// Validates and freezes the tour.
    ///
    /// The last step is always marked terminal; marking any other step
    /// terminal is rejected.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidStepModel` when the tour has no steps, a step
    /// id is empty or repeated, a predicate names no fields, an action step has
    /// nothing to watch, or a non-last step is marked terminal.
    pub fn build(mut self) -> Result<Tour> {
        let invalid = |reason: String| TourError::invalid_model(self.id.clone()).with_reason(reason);

        if self.id.trim().is_empty() {
            return Err(invalid("tour id must not be empty".to_string()));
        }
        if self.steps.is_empty() {
            return Err(invalid("a tour needs at least one step".to_string()));
        }

        let last = self.steps.len() - 1;
        let mut seen = HashSet::new();
        for (index, step) in self.steps.iter().enumerate() {
            if step.id.trim().is_empty() {
                return Err(invalid(format!("step {index} has an empty id")));
            }
            if !seen.insert(step.id.as_str()) {
                return Err(invalid(format!("duplicate step id '{}'", step.id)));
            }
            if step.terminal && index != last {
                return Err(invalid(format!(
                    "step '{}' is marked terminal but is not the last step",
                    step.id
                )));
            }
            match &step.completion {
                Completion::OnTargetClick if step.target_id.is_none() => {
                    return Err(invalid(format!(
                        "step '{}' completes on target click but has no target",
                        step.id
                    )));
                }
                Completion::OnExternalAction { action_id } if action_id.trim().is_empty() => {
                    return Err(invalid(format!(
                        "step '{}' has an empty action id",
                        step.id
                    )));
                }
                Completion::OnFieldsValid { predicate, .. } if predicate.is_empty() => {
                    return Err(invalid(format!(
                        "step '{}' has an empty field predicate",
                        step.id
                    )));
                }
                _ => {}
            }
            if step.skip_gate.as_ref().is_some_and(|gate| gate.is_empty()) {
                return Err(invalid(format!(
                    "step '{}' has an empty skip gate",
                    step.id
                )));
            }
        }

        self.steps[last].terminal = true;

        Ok(Tour {
            id: self.id,
            title: self.title,
            description: self.description,
            steps: self.steps,
            effects: self.effects,
            abort_completes: self.abort_completes,
        })
    }
}
