//! Step entry, advancing, completion and abort.

use std::time::Instant;

use log::{debug, info};

use super::{Key, Rejection, TourEngine, TourEvent, TourRun, Transition, UiEvent};
use crate::{
    listeners::ListenerKind,
    locator::TargetLocator,
    models::{Completion, FieldPredicate, SideEffect, TourState},
    store::{module_completed_key, tour_completed_key, FlagStore},
    wait::{Wait, WaitPurpose},
};

/// How a step was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Via {
    /// Its completion action fired
    Action,
    /// The Next control
    Next,
    /// The Skip control; the step's effects do not run
    Skip,
}

impl<L: TargetLocator, S: FlagStore> TourEngine<L, S> {
    /// Makes `index` the active step.
    ///
    /// The previous step's listeners and waits are released before anything
    /// is armed for the new one. A step below the furthest one reached is
    /// entered as revisited: it never auto-advances and leaving it again
    /// neither re-applies its effects nor re-emits `StepCompleted`.
    pub(super) fn enter_step(&mut self, run: &mut TourRun, index: usize, now: Instant) {
        run.listeners.begin(index);
        run.waits.cancel_all();
        run.state = TourState::StepActive(index);
        run.bound = false;
        run.degraded = false;
        run.revisited = index < run.furthest;
        run.furthest = run.furthest.max(index);

        let Some(step) = run.tour.step(index).cloned() else {
            return;
        };
        debug!(
            "Entering step {index} '{}' of tour '{}' ({})",
            step.id,
            run.tour.id(),
            step.completion.as_str()
        );

        let fields = step.watched_fields();
        if !fields.is_empty() {
            for field in &fields {
                run.listeners.arm(field, ListenerKind::FieldInput, false);
            }
            run.waits.add(Wait::new(
                WaitPurpose::FieldWatch,
                now,
                self.config.field_poll_interval(),
                None,
            ));
        }

        if let Some(target) = &step.target_id {
            if self.locator.locate(target).is_none() {
                debug!("Target '{target}' not mounted yet; polling");
                run.waits.add(self.mount_wait(
                    WaitPurpose::TargetMount {
                        element_id: target.clone(),
                    },
                    now,
                ));
            }
        }

        if let Completion::OnExternalAction { action_id } = &step.completion {
            if self.locator.locate(action_id).is_none() {
                debug!("Action element '{action_id}' not mounted yet; polling");
                run.waits.add(self.mount_wait(
                    WaitPurpose::ActionMount {
                        element_id: action_id.clone(),
                    },
                    now,
                ));
            }
        }

        self.bind_action(run);
        self.refresh_frame(run);
    }

    fn mount_wait(&self, purpose: WaitPurpose, now: Instant) -> Wait {
        Wait::new(
            purpose,
            now,
            self.config.poll_interval(),
            Some(self.config.mount_timeout()),
        )
    }

    /// Arms the one-shot click listener of an action step once its element
    /// exists. Binding happens at most once per activation.
    pub(super) fn bind_action(&mut self, run: &mut TourRun) {
        if run.bound {
            return;
        }
        let Some(step) = run.current_step() else {
            return;
        };
        let kind = match step.completion {
            Completion::OnTargetClick => ListenerKind::TargetClick,
            Completion::OnExternalAction { .. } => ListenerKind::ActionClick,
            _ => return,
        };
        let Some(element_id) = step.watched_element().map(str::to_string) else {
            return;
        };
        if self.locator.locate(&element_id).is_some() {
            run.listeners.arm(&element_id, kind, true);
            run.bound = true;
        }
    }

    pub(super) fn fields_hold(&self, predicate: &FieldPredicate) -> bool {
        predicate.evaluate(|field| self.locator.field_value(field))
    }

    /// Why Next would be refused on the current step, if it would.
    pub(super) fn next_guard(&self, run: &TourRun) -> Option<Rejection> {
        let Some(step) = run.current_step() else {
            return Some(Rejection::NotActive);
        };
        if run.revisited {
            return None;
        }
        match &step.completion {
            Completion::Manual => None,
            Completion::OnFieldsValid { predicate, .. } => {
                (!self.fields_hold(predicate)).then_some(Rejection::FieldsIncomplete)
            }
            Completion::OnTargetClick | Completion::OnExternalAction { .. } => {
                (!run.degraded).then_some(Rejection::AwaitingAction)
            }
        }
    }

    /// Why Skip would be refused on the current step, if it would.
    pub(super) fn skip_guard(&self, run: &TourRun) -> Option<Rejection> {
        let Some(step) = run.current_step() else {
            return Some(Rejection::NotActive);
        };
        if !step.skippable {
            return Some(Rejection::NotSkippable);
        }
        if run.revisited {
            return None;
        }
        if let Completion::OnFieldsValid { predicate, .. } = &step.completion {
            if !self.fields_hold(predicate) {
                return Some(Rejection::FieldsIncomplete);
            }
        }
        match &step.skip_gate {
            Some(gate) if !self.fields_hold(gate) => Some(Rejection::FieldsIncomplete),
            _ => None,
        }
    }

    pub(super) fn try_next(&mut self, run: &mut TourRun, now: Instant) -> Transition {
        if let Some(reason) = self.next_guard(run) {
            debug!("Next rejected: {reason}");
            return Transition::rejected(reason);
        }
        self.advance(run, Via::Next, now)
    }

    pub(super) fn try_skip(&mut self, run: &mut TourRun, now: Instant) -> Transition {
        if let Some(reason) = self.skip_guard(run) {
            debug!("Skip rejected: {reason}");
            return Transition::rejected(reason);
        }
        self.advance(run, Via::Skip, now)
    }

    pub(super) fn try_previous(&mut self, run: &mut TourRun, now: Instant) -> Transition {
        match run.index() {
            Some(0) => Transition::rejected(Rejection::AtFirstStep),
            Some(index) => self.move_to(run, index - 1, now),
            None => Transition::rejected(Rejection::NotActive),
        }
    }

    pub(super) fn jump(&mut self, run: &mut TourRun, index: usize, now: Instant) -> Transition {
        let Some(current) = run.index() else {
            return Transition::rejected(Rejection::NotActive);
        };
        if index >= run.tour.len() {
            return Transition::rejected(Rejection::OutOfRange {
                index,
                len: run.tour.len(),
            });
        }
        if index == current {
            return Transition::Unchanged;
        }
        self.move_to(run, index, now)
    }

    fn move_to(&mut self, run: &mut TourRun, index: usize, now: Instant) -> Transition {
        let from = run.index().unwrap_or_default();
        self.enter_step(run, index, now);
        let event = TourEvent::StepChanged {
            tour_id: run.tour.id().to_string(),
            index,
        };
        self.emit(run, event);
        Transition::Moved { from, to: index }
    }

    /// Leaves the current step forwards. The step's effects and
    /// `StepCompleted` happen before the next step becomes active, unless
    /// the step is being left for the second time.
    pub(super) fn advance(&mut self, run: &mut TourRun, via: Via, now: Instant) -> Transition {
        let Some(index) = run.index() else {
            return Transition::rejected(Rejection::NotActive);
        };
        let Some(step) = run.tour.step(index).cloned() else {
            return Transition::rejected(Rejection::NotActive);
        };

        if via == Via::Skip {
            debug!("Skipping step {index} '{}'", step.id);
        } else if run.revisited {
            debug!("Leaving revisited step {index} '{}'", step.id);
        } else {
            self.apply_effects(run, &step.effects);
            let event = TourEvent::StepCompleted {
                tour_id: run.tour.id().to_string(),
                index,
            };
            self.emit(run, event);
        }

        if step.terminal || index >= run.tour.last_index() {
            return self.complete(run);
        }
        self.move_to(run, index + 1, now)
    }

    fn complete(&mut self, run: &mut TourRun) -> Transition {
        run.listeners.teardown();
        run.waits.cancel_all();
        run.state = TourState::Completed;
        run.frame = None;

        let tour_id = run.tour.id().to_string();
        let effects = run.tour.effects().to_vec();
        self.apply_effects(run, &effects);
        self.store.set_flag(&tour_completed_key(&tour_id), true);
        self.clear_pending_for(&tour_id);

        info!("Tour '{tour_id}' completed");
        self.emit(run, TourEvent::Completed { tour_id });
        Transition::Completed
    }

    pub(super) fn abort_run(&mut self, run: &mut TourRun) -> Transition {
        if !run.state.is_active() {
            return Transition::rejected(Rejection::NotActive);
        }
        let index = run.index();
        run.listeners.teardown();
        let cancelled = run.waits.cancel_all();
        run.state = TourState::Aborted;
        run.frame = None;

        let tour_id = run.tour.id().to_string();
        if run.tour.abort_completes() {
            let effects = run.tour.effects().to_vec();
            self.apply_effects(run, &effects);
            self.store.set_flag(&tour_completed_key(&tour_id), true);
        }
        self.clear_pending_for(&tour_id);

        info!("Tour '{tour_id}' aborted at step {index:?} ({cancelled} wait(s) cancelled)");
        self.emit(run, TourEvent::Aborted { tour_id });
        Transition::Aborted
    }

    /// Clears the pending slot only while it still names `tour_id`.
    fn clear_pending_for(&mut self, tour_id: &str) {
        if self.store.pending().as_deref() == Some(tour_id) {
            self.store.clear_pending();
        }
    }

    fn apply_effects(&mut self, run: &mut TourRun, effects: &[SideEffect]) {
        for effect in effects {
            debug!("Applying {effect:?}");
            match effect {
                SideEffect::SetFlag { key } => self.store.set_flag(key, true),
                SideEffect::ClearFlag { key } => self.store.set_flag(key, false),
                SideEffect::MarkModule { module_id } => {
                    self.store.set_flag(&module_completed_key(module_id), true)
                }
                SideEffect::Navigate { route } => self.emit(
                    run,
                    TourEvent::Navigate {
                        route: route.clone(),
                    },
                ),
            }
        }
    }

    pub(super) fn handle_event(
        &mut self,
        run: &mut TourRun,
        event: UiEvent,
        now: Instant,
    ) -> Transition {
        if !run.state.is_active() {
            return Transition::Unchanged;
        }
        match event {
            UiEvent::Click { element_id } => self.handle_click(run, &element_id, now),
            UiEvent::Input { element_id } => {
                if run.listeners.watches_input(&element_id) {
                    self.evaluate_fields(run, now)
                } else {
                    Transition::Unchanged
                }
            }
            UiEvent::Resize | UiEvent::Scroll | UiEvent::Mutation => {
                self.resync(run);
                Transition::Unchanged
            }
            UiEvent::TooltipMeasured { size } => {
                run.tooltip = size;
                self.refresh_frame(run);
                Transition::Unchanged
            }
            UiEvent::Key { key } => match key {
                Key::Escape => self.abort_run(run),
                Key::ArrowRight | Key::Enter => self.try_next(run, now),
                Key::ArrowLeft => self.try_previous(run, now),
            },
        }
    }

    fn handle_click(&mut self, run: &mut TourRun, element_id: &str, now: Instant) -> Transition {
        // The element may have mounted since the last tick.
        self.bind_action(run);
        let Some(listener) = run.listeners.fire_click(element_id) else {
            return Transition::Unchanged;
        };
        if run.index() != Some(listener.step) {
            return Transition::Unchanged;
        }
        debug!(
            "Listener #{} fired on '{element_id}' for step {}",
            listener.id, listener.step
        );
        self.advance(run, Via::Action, now)
    }
}
