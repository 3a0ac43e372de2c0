//! Mount waits, field re-evaluation and frame refresh.

use std::time::Instant;

use log::{debug, warn};

use super::{transitions::Via, TourEngine, TourEvent, TourRun, Transition};
use crate::{
    locator::TargetLocator,
    models::{Completion, Side},
    overlay::{Controls, Frame, Hotspot},
    placement::PlacementRequest,
    store::FlagStore,
    wait::{WaitPoll, WaitPurpose},
};

impl<L: TargetLocator, S: FlagStore> TourEngine<L, S> {
    /// Services every wait of `run` that is due at `now`.
    pub(super) fn poll(&mut self, run: &mut TourRun, now: Instant) -> Transition {
        let Some(index) = run.index() else {
            return Transition::Unchanged;
        };

        for (purpose, poll) in run.waits.due(now) {
            // A wait may have ended the step; the rest of the batch belongs
            // to a step that is no longer active.
            if run.index() != Some(index) {
                break;
            }
            let transition = match &purpose {
                WaitPurpose::TargetMount { element_id }
                | WaitPurpose::ActionMount { element_id } => {
                    self.poll_mount(run, &purpose, element_id, poll, now);
                    Transition::Unchanged
                }
                WaitPurpose::FieldWatch => {
                    run.waits.reschedule(&purpose, now);
                    self.evaluate_fields(run, now)
                }
            };
            if transition.is_change() {
                return transition;
            }
        }
        Transition::Unchanged
    }

    fn poll_mount(
        &mut self,
        run: &mut TourRun,
        purpose: &WaitPurpose,
        element_id: &str,
        poll: WaitPoll,
        now: Instant,
    ) {
        if self.locator.locate(element_id).is_some() {
            debug!("'{element_id}' mounted after polling");
            run.waits.resolve(purpose);
            self.bind_action(run);
            self.refresh_frame(run);
            return;
        }
        if poll != WaitPoll::Expired {
            run.waits.reschedule(purpose, now);
            return;
        }

        run.waits.resolve(purpose);
        run.degraded = true;
        let step_id = run
            .current_step()
            .map(|step| step.id.clone())
            .unwrap_or_default();
        warn!(
            "'{element_id}' did not mount within {:?} on step '{step_id}' of tour '{}'; \
             showing a centered tooltip",
            self.config.mount_timeout(),
            run.tour.id()
        );
        let event = TourEvent::TargetMissing {
            tour_id: run.tour.id().to_string(),
            step_id,
            element_id: element_id.to_string(),
        };
        self.emit(run, event);
        self.refresh_frame(run);
    }

    /// Re-checks the step's field predicates after an edit or a poll.
    pub(super) fn evaluate_fields(&mut self, run: &mut TourRun, now: Instant) -> Transition {
        let auto_advance = match run.current_step().map(|step| &step.completion) {
            Some(Completion::OnFieldsValid {
                predicate,
                auto_advance: true,
            }) if !run.revisited => self.fields_hold(predicate),
            _ => false,
        };
        if auto_advance {
            debug!("Fields valid; auto-advancing");
            return self.advance(run, Via::Action, now);
        }
        self.refresh_frame(run);
        Transition::Unchanged
    }

    /// Reacts to layout changes: resolves mount waits whose element has
    /// appeared, binds late action elements and recomputes the frame.
    pub(super) fn resync(&mut self, run: &mut TourRun) {
        let mounted: Vec<WaitPurpose> = run
            .waits
            .iter()
            .filter(|wait| match &wait.purpose {
                WaitPurpose::TargetMount { element_id }
                | WaitPurpose::ActionMount { element_id } => {
                    self.locator.locate(element_id).is_some()
                }
                WaitPurpose::FieldWatch => false,
            })
            .map(|wait| wait.purpose.clone())
            .collect();
        for purpose in &mounted {
            run.waits.resolve(purpose);
        }
        self.bind_action(run);
        self.refresh_frame(run);
    }

    /// Recomputes the render frame of the active step.
    pub(super) fn refresh_frame(&mut self, run: &mut TourRun) {
        let Some(index) = run.index() else {
            run.frame = None;
            return;
        };
        let Some(step) = run.current_step() else {
            run.frame = None;
            return;
        };

        let viewport = self.locator.viewport();
        let located = step
            .target_id
            .as_deref()
            .and_then(|target| self.locator.locate(target));
        let request = PlacementRequest {
            target: located.map(|l| l.rect),
            container: located.and_then(|l| l.container),
            side: if step.target_id.is_some() {
                step.placement
            } else {
                Side::Center
            },
            tooltip: run.tooltip,
            viewport,
        };
        let tooltip = self.placement.place(&request);

        let hotspot_rect = step
            .watched_element()
            .and_then(|element| self.locator.locate(element))
            .or(located)
            .map(|l| l.rect);
        let hotspot = hotspot_rect.map(|rect| {
            Hotspot::beside(
                &rect,
                viewport,
                self.config.hotspot_size,
                self.config.hotspot_offset,
            )
        });

        let is_last = index >= run.tour.last_index();
        let controls = Controls {
            can_previous: index > 0,
            can_next: self.next_guard(run).is_none(),
            show_skip: step.skippable,
            can_skip: self.skip_guard(run).is_none(),
            next_label: Controls::next_label(is_last),
        };

        let frame = Frame {
            tour_id: run.tour.id().to_string(),
            step_id: step.id.clone(),
            index,
            total: run.tour.len(),
            title: step.title.clone(),
            body: step.body.clone(),
            tooltip,
            tooltip_size: run.tooltip,
            hotspot,
            spotlight: located.map(|l| l.rect.inflate(self.config.spotlight_padding)),
            controls,
            degraded: run.degraded,
        };
        run.frame = Some(frame);
    }
}
