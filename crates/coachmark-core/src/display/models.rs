//! Display implementations for domain models.
//!
//! Kept apart from the model definitions so the models stay plain data.
//! Output is markdown.

use std::fmt;

use crate::{
    engine::{TourEvent, Transition},
    models::{Completion, FieldPredicate, Side, SideEffect, Step, Tour, TourState, TourSummary},
    overlay::Frame,
    placement::{Placement, PlacementStage},
};

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TourState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourState::StepActive(index) => write!(f, "step {}", index + 1),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl fmt::Display for FieldPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (joiner, fields) = match self {
            FieldPredicate::AllFilled(fields) => (" and ", fields),
            FieldPredicate::AnyFilled(fields) => (" or ", fields),
        };
        let quoted: Vec<String> = fields.iter().map(|field| format!("`{field}`")).collect();
        write!(f, "{} filled", quoted.join(joiner))
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Manual => write!(f, "Next button"),
            Completion::OnTargetClick => write!(f, "click on the target"),
            Completion::OnExternalAction { action_id } => write!(f, "click on `{action_id}`"),
            Completion::OnFieldsValid {
                predicate,
                auto_advance,
            } => {
                write!(f, "{predicate}")?;
                if *auto_advance {
                    write!(f, " (advances automatically)")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideEffect::SetFlag { key } => write!(f, "set `{key}`"),
            SideEffect::ClearFlag { key } => write!(f, "clear `{key}`"),
            SideEffect::MarkModule { module_id } => write!(f, "mark module `{module_id}` done"),
            SideEffect::Navigate { route } => write!(f, "navigate to `{route}`"),
        }
    }
}

impl Step {
    fn fmt_step(&self, position: Option<usize>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match position {
            Some(position) => writeln!(f, "### {position}. {} (`{}`)", self.title, self.id)?,
            None => writeln!(f, "### {} (`{}`)", self.title, self.id)?,
        }
        writeln!(f)?;
        if !self.body.is_empty() {
            writeln!(f, "{}", self.body)?;
            writeln!(f)?;
        }

        match &self.target_id {
            Some(target) => writeln!(f, "- Target: `{target}` ({})", self.placement)?,
            None => writeln!(f, "- Target: none (centered)")?,
        }
        writeln!(f, "- Advances on: {}", self.completion)?;
        if self.skippable {
            match &self.skip_gate {
                Some(gate) => writeln!(f, "- Skippable once {gate}")?,
                None => writeln!(f, "- Skippable")?,
            }
        }
        for effect in &self.effects {
            writeln!(f, "- On completion: {effect}")?;
        }
        if self.terminal {
            writeln!(f, "- Last step")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_step(None, f)
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} (`{}`)", self.title(), self.id())?;
        writeln!(f)?;
        if let Some(description) = self.description() {
            writeln!(f, "{description}")?;
            writeln!(f)?;
        }
        writeln!(f, "- Steps: {}", self.len())?;
        for effect in self.effects() {
            writeln!(f, "- On completion: {effect}")?;
        }
        if self.abort_completes() {
            writeln!(f, "- Dismissing also counts as completion")?;
        }
        writeln!(f, "\n## Steps\n")?;
        for (index, step) in self.steps().iter().enumerate() {
            step.fmt_step(Some(index + 1), f)?;
        }
        Ok(())
    }
}

impl fmt::Display for TourSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- **{}** `{}`: {} steps",
            self.title, self.id, self.total_steps
        )?;
        if self.completed {
            write!(f, " (completed)")?;
        }
        if self.pending {
            write!(f, " (pending)")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for PlacementStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlacementStage::Preferred => "preferred side",
            PlacementStage::Flipped => "flipped",
            PlacementStage::OutsideContainer => "outside container",
            PlacementStage::BelowContainer => "below container",
            PlacementStage::Centered => "centered",
        };
        write!(f, "{label}")
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.0}, {:.0}) anchored {} [{}]",
            self.x, self.y, self.anchor, self.stage
        )
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} ({})", self.title, self.progress_label())?;
        writeln!(f)?;
        if !self.body.is_empty() {
            writeln!(f, "{}", self.body)?;
            writeln!(f)?;
        }
        writeln!(f, "- Tooltip: {}", self.tooltip)?;
        if let Some(hotspot) = &self.hotspot {
            writeln!(f, "- Hotspot: ({:.0}, {:.0})", hotspot.x, hotspot.y)?;
        }
        if let Some(spotlight) = &self.spotlight {
            writeln!(f, "- Spotlight: {spotlight}")?;
        }

        let mut controls = Vec::new();
        if self.controls.can_previous {
            controls.push("Back");
        }
        if self.controls.show_skip {
            controls.push(if self.controls.can_skip {
                "Skip"
            } else {
                "Skip (blocked)"
            });
        }
        controls.push(if self.controls.can_next {
            self.controls.next_label
        } else {
            "waiting for action"
        });
        writeln!(f, "- Controls: {}", controls.join(" | "))?;
        if self.degraded {
            writeln!(f, "- Target not found; showing centered")?;
        }
        Ok(())
    }
}

impl fmt::Display for TourEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourEvent::StepChanged { tour_id, index } => {
                write!(f, "{tour_id}: step {} active", index + 1)
            }
            TourEvent::StepCompleted { tour_id, index } => {
                write!(f, "{tour_id}: step {} completed", index + 1)
            }
            TourEvent::Completed { tour_id } => write!(f, "{tour_id}: completed"),
            TourEvent::Aborted { tour_id } => write!(f, "{tour_id}: aborted"),
            TourEvent::Navigate { route } => write!(f, "navigate to {route}"),
            TourEvent::TargetMissing {
                tour_id,
                step_id,
                element_id,
            } => write!(f, "{tour_id}: '{element_id}' never appeared for step '{step_id}'"),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Moved { from, to } => write!(f, "moved {} → {}", from + 1, to + 1),
            Transition::Completed => write!(f, "completed"),
            Transition::Aborted => write!(f, "aborted"),
            Transition::Unchanged => write!(f, "unchanged"),
            Transition::Rejected { reason } => write!(f, "rejected: {reason}"),
            Transition::Stale => write!(f, "stale handle"),
        }
    }
}
