//! Per-run host callbacks.

use std::fmt;

use super::TourEvent;

type TourCallback = Box<dyn FnMut(&str)>;

/// Callbacks supplied by the host when it starts a tour.
///
/// Callbacks run on the engine's thread after the corresponding state change
/// and persistence writes have been applied. They receive plain values, never
/// the engine, so they cannot re-enter a transition in progress.
#[derive(Default)]
pub struct TourOptions {
    on_complete: Option<TourCallback>,
    on_abort: Option<TourCallback>,
    on_step_changed: Option<Box<dyn FnMut(usize)>>,
    on_event: Option<Box<dyn FnMut(&TourEvent)>>,
}

impl TourOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the tour id once the completion flag is written.
    pub fn on_complete(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Called with the tour id when the tour is dismissed.
    pub fn on_abort(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_abort = Some(Box::new(callback));
        self
    }

    /// Called with the new index whenever a step becomes active.
    pub fn on_step_changed(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.on_step_changed = Some(Box::new(callback));
        self
    }

    /// Called for every event the run publishes.
    pub fn on_event(mut self, callback: impl FnMut(&TourEvent) + 'static) -> Self {
        self.on_event = Some(Box::new(callback));
        self
    }

    pub(crate) fn notify(&mut self, event: &TourEvent) {
        if let Some(callback) = self.on_event.as_mut() {
            callback(event);
        }
        match event {
            TourEvent::StepChanged { index, .. } => {
                if let Some(callback) = self.on_step_changed.as_mut() {
                    callback(*index);
                }
            }
            TourEvent::Completed { tour_id } => {
                if let Some(callback) = self.on_complete.as_mut() {
                    callback(tour_id);
                }
            }
            TourEvent::Aborted { tour_id } => {
                if let Some(callback) = self.on_abort.as_mut() {
                    callback(tour_id);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Debug for TourOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourOptions")
            .field("on_complete", &self.on_complete.is_some())
            .field("on_abort", &self.on_abort.is_some())
            .field("on_step_changed", &self.on_step_changed.is_some())
            .field("on_event", &self.on_event.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[test]
    fn test_notify_routes_to_specific_callbacks() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (a, b, c) = (seen.clone(), seen.clone(), seen.clone());
        let mut options = TourOptions::new()
            .on_complete(move |id| a.borrow_mut().push(format!("complete:{id}")))
            .on_step_changed(move |i| b.borrow_mut().push(format!("step:{i}")))
            .on_event(move |_| c.borrow_mut().push("event".to_string()));

        options.notify(&TourEvent::StepChanged {
            tour_id: "t".into(),
            index: 1,
        });
        options.notify(&TourEvent::Completed { tour_id: "t".into() });
        options.notify(&TourEvent::Aborted { tour_id: "t".into() });

        assert_eq!(
            *seen.borrow(),
            vec!["event", "step:1", "event", "complete:t", "event"]
        );
    }

    #[test]
    fn test_debug_shows_registered_callbacks() {
        let options = TourOptions::new().on_abort(|_| {});
        let debug = format!("{options:?}");
        assert!(debug.contains("on_abort: true"));
        assert!(debug.contains("on_complete: false"));
    }
}
