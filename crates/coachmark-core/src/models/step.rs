//! Step model definition and related functionality.

use serde::{Deserialize, Serialize};

use super::Side;

/// Condition that moves a step forward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Completion {
    /// Only the Next/Skip controls advance the step
    #[default]
    Manual,
    /// A click on the step's own target advances it
    OnTargetClick,
    /// A click on a different element, usually inside UI that mounts later,
    /// advances it
    OnExternalAction { action_id: String },
    /// Next/Skip stay blocked until the predicate holds. With `auto_advance`
    /// the step moves on by itself as soon as it does.
    OnFieldsValid {
        predicate: FieldPredicate,
        #[serde(default)]
        auto_advance: bool,
    },
}

impl Completion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Completion::Manual => "manual",
            Completion::OnTargetClick => "on_target_click",
            Completion::OnExternalAction { .. } => "on_external_action",
            Completion::OnFieldsValid { .. } => "on_fields_valid",
        }
    }
}

/// Requirement over form fields, addressed by stable element identifiers.
///
/// A field counts as filled when its value is non-empty after trimming.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FieldPredicate {
    AllFilled(Vec<String>),
    AnyFilled(Vec<String>),
}

impl FieldPredicate {
    pub fn all_filled<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldPredicate::AllFilled(fields.into_iter().map(Into::into).collect())
    }

    pub fn any_filled<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldPredicate::AnyFilled(fields.into_iter().map(Into::into).collect())
    }

    pub fn fields(&self) -> &[String] {
        match self {
            FieldPredicate::AllFilled(fields) | FieldPredicate::AnyFilled(fields) => fields,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|field| field.trim().is_empty())
    }

    /// Evaluates the predicate against current field values.
    ///
    /// Fields that cannot be found count as empty.
    pub fn evaluate<F>(&self, value_of: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        let filled = |field: &String| {
            value_of(field).is_some_and(|value| !value.trim().is_empty())
        };
        match self {
            FieldPredicate::AllFilled(fields) => fields.iter().all(filled),
            FieldPredicate::AnyFilled(fields) => fields.iter().any(filled),
        }
    }
}

/// Declarative effect applied when a step or a whole tour completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SideEffect {
    /// Set a host-owned flag to true
    SetFlag { key: String },
    /// Set a host-owned flag to false
    ClearFlag { key: String },
    /// Mark a checklist module as done
    MarkModule { module_id: String },
    /// Ask the host to navigate
    Navigate { route: String },
}

/// One page of a tour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Identifier, unique within its tour
    pub id: String,

    /// Tooltip heading
    pub title: String,

    /// Tooltip text
    #[serde(default)]
    pub body: String,

    /// Stable identifier of the element to point at; untargeted steps center
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,

    /// Preferred tooltip side
    #[serde(default)]
    pub placement: Side,

    /// What moves this step forward
    #[serde(default)]
    pub completion: Completion,

    /// Whether the Skip control is offered
    #[serde(default)]
    pub skippable: bool,

    /// Fields that must be filled before Skip is accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_gate: Option<FieldPredicate>,

    /// Set on the last step only; completing it completes the tour
    #[serde(default)]
    pub terminal: bool,

    /// Applied when the step is completed (not when it is skipped)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<SideEffect>,
}

impl Step {
    /// Creates an untargeted, manual step.
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            target_id: None,
            placement: Side::Center,
            completion: Completion::Manual,
            skippable: false,
            skip_gate: None,
            terminal: false,
            effects: Vec::new(),
        }
    }

    /// Points the step at an element.
    pub fn at(mut self, target_id: impl Into<String>, placement: Side) -> Self {
        self.target_id = Some(target_id.into());
        self.placement = placement;
        self
    }

    pub fn completes_on(mut self, completion: Completion) -> Self {
        self.completion = completion;
        self
    }

    /// Shorthand for [`Completion::OnTargetClick`].
    pub fn on_target_click(self) -> Self {
        self.completes_on(Completion::OnTargetClick)
    }

    /// Shorthand for [`Completion::OnExternalAction`].
    pub fn on_action(self, action_id: impl Into<String>) -> Self {
        self.completes_on(Completion::OnExternalAction {
            action_id: action_id.into(),
        })
    }

    pub fn skippable(mut self, skippable: bool) -> Self {
        self.skippable = skippable;
        self
    }

    pub fn with_skip_gate(mut self, gate: FieldPredicate) -> Self {
        self.skip_gate = Some(gate);
        self
    }

    pub fn with_effect(mut self, effect: SideEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Element whose click completes the step, if any.
    pub fn watched_element(&self) -> Option<&str> {
        match &self.completion {
            Completion::OnTargetClick => self.target_id.as_deref(),
            Completion::OnExternalAction { action_id } => Some(action_id),
            _ => None,
        }
    }

    /// Fields that should be watched for input while the step is active.
    pub fn watched_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        if let Completion::OnFieldsValid { predicate, .. } = &self.completion {
            fields.extend(predicate.fields().iter().map(String::as_str));
        }
        if let Some(gate) = &self.skip_gate {
            for field in gate.fields() {
                if !fields.contains(&field.as_str()) {
                    fields.push(field);
                }
            }
        }
        fields
    }
}
