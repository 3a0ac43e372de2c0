mod common;

use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

use coachmark_core::{
    Completion, FieldPredicate, FlagStore, Key, Layout, MemoryBackend, Persistence, Rect,
    Rejection, Side, Size, Step, Tour, TourCatalog, TourEngineBuilder, TourEvent, TourOptions,
    TourState, Transition, UiEvent,
};
use common::{create_test_engine, page};

fn two_step_tour(id: &str) -> Tour {
    Tour::builder(id, "Two steps")
        .step(
            Step::new("press", "Press", "Press the button.")
                .at("btn-a", Side::Bottom)
                .on_target_click(),
        )
        .step(Step::new("done", "Done", "All set."))
        .build()
        .expect("valid tour")
}

#[test]
fn test_target_click_then_next_completes() {
    let mut engine = create_test_engine(page());
    let now = Instant::now();
    let handle = engine.start_tour(two_step_tour("tourId"), TourOptions::new(), now);
    assert_eq!(engine.current_index(), Some(0));

    engine.dispatch(UiEvent::click("btn-a"), now);
    assert_eq!(engine.current_index(), Some(1));

    assert_eq!(engine.next(&handle, now), Transition::Completed);
    assert_eq!(engine.state(), TourState::Completed);
    assert!(engine.store().get_flag("tour.tourId.completed"));
}

#[test]
fn test_fields_valid_gates_skip() {
    let mut layout = page();
    layout
        .mount("name", Rect::new(400.0, 300.0, 240.0, 36.0))
        .mount("type", Rect::new(400.0, 350.0, 240.0, 36.0));
    let tour = Tour::builder("details", "Details")
        .step(
            Step::new("fill", "Enter details", "")
                .at("name", Side::Bottom)
                .completes_on(Completion::OnFieldsValid {
                    predicate: FieldPredicate::all_filled(["name", "type"]),
                    auto_advance: false,
                })
                .skippable(true),
        )
        .step(Step::new("end", "End", ""))
        .build()
        .unwrap();

    let mut engine = create_test_engine(layout);
    let now = Instant::now();
    let handle = engine.start_tour(tour, TourOptions::new(), now);

    assert_eq!(
        engine.skip(&handle, now),
        Transition::Rejected {
            reason: Rejection::FieldsIncomplete
        }
    );
    assert_eq!(engine.current_index(), Some(0));

    engine.locator_mut().set_value("name", "Private equity");
    engine.dispatch(UiEvent::input("name"), now);
    assert!(engine.skip(&handle, now).is_rejected());

    engine.locator_mut().set_value("type", "investment");
    engine.dispatch(UiEvent::input("type"), now);
    assert_eq!(engine.skip(&handle, now), Transition::Moved { from: 0, to: 1 });
}

#[test]
fn test_whitespace_does_not_count_as_filled() {
    let mut layout = page();
    layout.mount("name", Rect::new(400.0, 300.0, 240.0, 36.0));
    let tour = Tour::builder("ws", "Whitespace")
        .step(
            Step::new("fill", "Fill", "").completes_on(Completion::OnFieldsValid {
                predicate: FieldPredicate::all_filled(["name"]),
                auto_advance: false,
            }),
        )
        .build()
        .unwrap();
    let mut engine = create_test_engine(layout);
    let now = Instant::now();
    let handle = engine.start_tour(tour, TourOptions::new(), now);

    engine.locator_mut().set_value("name", "   ");
    assert_eq!(
        engine.next(&handle, now),
        Transition::Rejected {
            reason: Rejection::FieldsIncomplete
        }
    );
}

#[test]
fn test_abort_mid_poll_cannot_resurrect() {
    let tour = Tour::builder("wizard", "Wizard")
        .step(
            Step::new("dialog", "Dialog", "")
                .at("wizard-name", Side::Bottom)
                .on_target_click(),
        )
        .step(Step::new("end", "End", ""))
        .build()
        .unwrap();
    let mut engine = create_test_engine(page());
    let start = Instant::now();
    let handle = engine.start_tour(tour, TourOptions::new(), start);
    assert_eq!(engine.pending_waits().len(), 1);

    engine.tick(start + Duration::from_millis(250));
    assert_eq!(engine.abort(&handle), Transition::Aborted);
    assert!(engine.pending_waits().is_empty());
    engine.take_events();

    engine
        .locator_mut()
        .mount("wizard-name", Rect::new(500.0, 300.0, 200.0, 36.0));
    for ms in [500, 750, 1000, 6000] {
        assert_eq!(
            engine.tick(start + Duration::from_millis(ms)),
            Transition::Unchanged
        );
    }
    assert_eq!(
        engine.dispatch(UiEvent::click("wizard-name"), start + Duration::from_secs(7)),
        Transition::Unchanged
    );

    assert_eq!(engine.state(), TourState::Aborted);
    assert!(engine.take_events().is_empty());
    assert!(!engine.store().get_flag("tour.wizard.completed"));
}

#[test]
fn test_tours_do_not_share_flags() {
    let mut engine = create_test_engine(page());
    let now = Instant::now();
    let a = engine.start_tour(two_step_tour("tourA"), TourOptions::new(), now);
    engine.dispatch(UiEvent::click("btn-a"), now);
    assert_eq!(engine.next(&a, now), Transition::Completed);

    assert!(engine.store().get_flag("tour.tourA.completed"));
    assert!(!engine.store().get_flag("tour.tourB.completed"));
}

#[test]
fn test_index_stays_in_bounds_under_any_input() {
    let catalog = TourCatalog::builtin().unwrap();
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut roll = |n: u64| {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed % n
    };

    for tour in catalog.iter() {
        let mut layout = page();
        for (i, step) in tour.steps().iter().enumerate() {
            if let Some(target) = &step.target_id {
                layout.mount(target.as_str(), Rect::new(40.0 * i as f64, 80.0, 120.0, 36.0));
            }
            if let Some(watched) = step.watched_element() {
                layout.mount(watched, Rect::new(600.0, 40.0 * i as f64, 120.0, 36.0));
            }
        }
        let mut engine = create_test_engine(layout);
        let start = Instant::now();
        let handle = engine.start_tour(tour.clone(), TourOptions::new(), start);

        for tick in 0..200u64 {
            let now = start + Duration::from_millis(tick * 100);
            match roll(6) {
                0 => {
                    engine.next(&handle, now);
                }
                1 => {
                    engine.previous(&handle, now);
                }
                2 => {
                    engine.skip(&handle, now);
                }
                3 => {
                    let index = roll(tour.len() as u64 + 1) as usize;
                    engine.go_to(&handle, index, now);
                }
                4 => {
                    if let Some(element) =
                        engine.current_step().and_then(|s| s.watched_element()).map(str::to_string)
                    {
                        engine.dispatch(UiEvent::click(element), now);
                    }
                }
                _ => {
                    engine.tick(now);
                }
            }

            match engine.state() {
                TourState::StepActive(index) => {
                    assert!(index < tour.len(), "{}: index {index} escaped", tour.id());
                    let listeners = engine.listeners().unwrap();
                    assert_eq!(listeners.owner(), Some(index));
                    assert!(listeners.iter().all(|l| l.step == index));
                    let frame = engine.frame().unwrap();
                    let viewport = Rect::new(0.0, 0.0, 1280.0, 800.0);
                    assert!(viewport.contains(&frame.tooltip_rect()));
                }
                TourState::Completed => {
                    assert!(engine.store().get_flag(&format!("tour.{}.completed", tour.id())));
                    break;
                }
                other => panic!("unexpected state {other:?}"),
            }
        }
    }
}

#[test]
fn test_repeated_clicks_advance_once() {
    let mut engine = create_test_engine(page());
    let now = Instant::now();
    engine.start_tour(
        Tour::builder("once", "Once")
            .step(Step::new("a", "A", "").at("btn-a", Side::Bottom).on_target_click())
            .step(Step::new("b", "B", "").at("btn-b", Side::Bottom).on_target_click())
            .step(Step::new("c", "C", ""))
            .build()
            .unwrap(),
        TourOptions::new(),
        now,
    );

    let moved = (0..5)
        .map(|_| engine.dispatch(UiEvent::click("btn-a"), now))
        .filter(Transition::is_change)
        .count();
    assert_eq!(moved, 1);
    assert_eq!(engine.current_index(), Some(1));
}

#[test]
fn test_abort_leaves_completion_flag_unchanged() {
    let mut engine = create_test_engine(page());
    let now = Instant::now();
    let handle = engine.start_tour(two_step_tour("fresh"), TourOptions::new(), now);
    engine.abort(&handle);
    assert!(!engine.store().get_flag("tour.fresh.completed"));

    engine.store_mut().set_flag("tour.done-before.completed", true);
    let handle = engine.start_tour(two_step_tour("done-before"), TourOptions::new(), now);
    engine.abort(&handle);
    assert!(engine.store().get_flag("tour.done-before.completed"));
}

#[test]
fn test_non_skippable_step_rejects_skip() {
    let catalog = TourCatalog::builtin().unwrap();
    let mut engine = create_test_engine(page());
    let now = Instant::now();
    let handle = engine
        .start_tour_by_id(&catalog, "category-setup", TourOptions::new(), now)
        .unwrap();

    assert_eq!(
        engine.skip(&handle, now),
        Transition::Rejected {
            reason: Rejection::NotSkippable
        }
    );
    assert_eq!(engine.state(), TourState::StepActive(0));
}

#[test]
fn test_category_walkthrough_end_to_end() {
    let catalog = TourCatalog::builtin().unwrap();
    let mut engine = create_test_engine(page());
    let completed = Rc::new(RefCell::new(Vec::new()));
    let sink = completed.clone();
    let options = TourOptions::new().on_complete(move |id| sink.borrow_mut().push(id.to_string()));

    let start = Instant::now();
    let handle = engine
        .start_tour_by_id(&catalog, "category-setup", options, start)
        .unwrap();

    // Clicking "New category" opens the wizard a moment later.
    engine.dispatch(UiEvent::click("btn-new-category"), start);
    assert_eq!(engine.current_index(), Some(1));
    assert!(engine.frame().unwrap().tooltip.stage == coachmark_core::PlacementStage::Centered);

    let wizard = Rect::new(340.0, 100.0, 600.0, 560.0);
    engine
        .locator_mut()
        .open_container("category-wizard", wizard)
        .mount_in("category-wizard-name-input", Rect::new(370.0, 180.0, 540.0, 40.0), "category-wizard")
        .mount_in("category-wizard-type-select", Rect::new(370.0, 240.0, 540.0, 40.0), "category-wizard")
        .mount_in("category-wizard-continue-btn", Rect::new(800.0, 600.0, 110.0, 36.0), "category-wizard");
    engine.tick(start + Duration::from_millis(250));
    assert!(engine.pending_waits().iter().all(|w| {
        matches!(w.purpose, coachmark_core::wait::WaitPurpose::FieldWatch)
    }));

    // Skip is gated on the name and type fields.
    assert!(engine.skip(&handle, start).is_rejected());
    engine
        .locator_mut()
        .set_value("category-wizard-name-input", "Real estate")
        .set_value("category-wizard-type-select", "asset");
    assert_eq!(engine.skip(&handle, start), Transition::Moved { from: 1, to: 2 });

    for (index, element) in [(2, "category-wizard-capsules"), (3, "category-wizard-custom-fields")] {
        engine
            .locator_mut()
            .mount_in(element, Rect::new(370.0, 180.0, 540.0, 300.0), "category-wizard");
        engine.dispatch(UiEvent::Mutation, start);
        assert_eq!(
            engine.dispatch(UiEvent::click("category-wizard-continue-btn"), start),
            Transition::Moved {
                from: index,
                to: index + 1
            }
        );
    }

    engine
        .locator_mut()
        .mount_in("category-wizard-workflow", Rect::new(370.0, 180.0, 540.0, 300.0), "category-wizard")
        .mount_in("category-wizard-create-btn", Rect::new(800.0, 600.0, 110.0, 36.0), "category-wizard");
    assert!(engine.skip(&handle, start).is_rejected());
    assert_eq!(
        engine.dispatch(UiEvent::click("category-wizard-create-btn"), start),
        Transition::Completed
    );

    assert_eq!(*completed.borrow(), vec!["category-setup".to_string()]);
    assert!(engine.store().get_flag("module.setup-domains.completed"));
    assert!(engine.store().get_flag("tour.category-setup.completed"));
}

#[test]
fn test_target_in_dialog_is_placed_outside_container() {
    let mut layout = page();
    let dialog = Rect::new(300.0, 150.0, 500.0, 500.0);
    layout
        .open_container("dialog", dialog)
        .mount_in("field", Rect::new(320.0, 170.0, 460.0, 460.0), "dialog");
    let tour = Tour::builder("dialog", "Dialog")
        .step(Step::new("field", "Field", "").at("field", Side::Bottom))
        .build()
        .unwrap();

    let mut engine = create_test_engine(layout);
    engine.start_tour(tour, TourOptions::new(), Instant::now());
    let frame = engine.frame().unwrap();

    assert_eq!(
        frame.tooltip.stage,
        coachmark_core::PlacementStage::OutsideContainer
    );
    assert_eq!(frame.tooltip.anchor, Side::Right);
    assert!(frame.tooltip_rect().left >= dialog.right());
}

#[test]
fn test_resize_recomputes_placement() {
    let mut engine = create_test_engine(page());
    let now = Instant::now();
    engine.start_tour(two_step_tour("resize"), TourOptions::new(), now);
    let before = engine.frame().unwrap().tooltip;

    engine
        .locator_mut()
        .resize(Size::new(800.0, 220.0))
        .mount("btn-a", Rect::new(700.0, 120.0, 96.0, 36.0));
    engine.dispatch(UiEvent::Resize, now);
    let after = engine.frame().unwrap();

    assert_ne!(after.tooltip, before);
    assert!(Rect::new(0.0, 0.0, 800.0, 220.0).contains(&after.tooltip_rect()));
}

#[test]
fn test_scroll_moves_spotlight() {
    let mut engine = create_test_engine(page());
    let now = Instant::now();
    engine.start_tour(two_step_tour("scroll"), TourOptions::new(), now);
    let before = engine.frame().unwrap().spotlight.unwrap();

    engine.locator_mut().scroll_by(0.0, 50.0);
    engine.dispatch(UiEvent::Scroll, now);
    let after = engine.frame().unwrap().spotlight.unwrap();
    assert_eq!(after.top, before.top - 50.0);
}

#[test]
fn test_escape_aborts_and_notifies() {
    let aborted = Rc::new(RefCell::new(None));
    let sink = aborted.clone();
    let mut engine = create_test_engine(page());
    let now = Instant::now();
    engine.start_tour(
        two_step_tour("esc"),
        TourOptions::new().on_abort(move |id| *sink.borrow_mut() = Some(id.to_string())),
        now,
    );

    assert_eq!(
        engine.dispatch(UiEvent::Key { key: Key::Escape }, now),
        Transition::Aborted
    );
    assert_eq!(aborted.borrow().as_deref(), Some("esc"));
    assert!(engine
        .take_events()
        .contains(&TourEvent::Aborted {
            tour_id: "esc".into()
        }));
}

#[test]
fn test_step_changed_callback_sees_each_index() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let tour = Tour::builder("steps", "Steps")
        .steps((0..4).map(|i| Step::new(format!("s{i}"), format!("S{i}"), "")))
        .build()
        .unwrap();
    let mut engine = create_test_engine(page());
    let now = Instant::now();
    let handle = engine.start_tour(
        tour,
        TourOptions::new().on_step_changed(move |i| sink.borrow_mut().push(i)),
        now,
    );

    engine.next(&handle, now);
    engine.next(&handle, now);
    engine.previous(&handle, now);
    engine.go_to(&handle, 3, now);
    assert_eq!(*seen.borrow(), vec![0, 1, 2, 1, 3]);
}

#[test]
fn test_resume_pending_starts_named_tour() {
    let catalog = TourCatalog::builtin().unwrap();
    let mut engine = create_test_engine(page());
    engine.store_mut().set_pending("team-invite");

    let handle = engine
        .resume_pending(&catalog, Instant::now())
        .expect("pending tour starts");
    assert_eq!(handle.tour_id(), "team-invite");
    assert_eq!(engine.state(), TourState::StepActive(0));

    // Already running: nothing new is started.
    assert!(engine.resume_pending(&catalog, Instant::now()).is_none());
    assert_eq!(engine.handle(), Some(handle));
}

#[test]
fn test_resume_pending_clears_stale_markers() {
    let catalog = TourCatalog::builtin().unwrap();
    let mut engine = create_test_engine(page());

    engine.store_mut().set_pending("no-such-tour");
    assert!(engine.resume_pending(&catalog, Instant::now()).is_none());
    assert_eq!(engine.store().pending(), None);

    engine.store_mut().set_flag("tour.team-invite.completed", true);
    engine.store_mut().set_pending("team-invite");
    assert!(engine.resume_pending(&catalog, Instant::now()).is_none());
    assert_eq!(engine.store().pending(), None);
}

#[test]
fn test_resume_pending_rereads_slot() {
    let catalog = TourCatalog::builtin().unwrap();
    let mut engine = create_test_engine(page());
    engine.store_mut().set_pending("team-invite");
    // Another tab overwrote the slot in the meantime.
    engine.store_mut().set_pending("organization-setup");

    let handle = engine.resume_pending(&catalog, Instant::now()).unwrap();
    assert_eq!(handle.tour_id(), "organization-setup");
}

#[test]
fn test_unavailable_store_offers_tours_again() {
    let mut backend = MemoryBackend::new();
    backend.set_flag_value("tour.tourId.completed", true);
    backend.set_available(false);
    let mut engine = TourEngineBuilder::new(page(), Persistence::new(backend))
        .build()
        .unwrap();

    assert!(!engine.store().get_flag("tour.tourId.completed"));

    let now = Instant::now();
    let handle = engine.start_tour(two_step_tour("tourId"), TourOptions::new(), now);
    engine.dispatch(UiEvent::click("btn-a"), now);
    assert_eq!(engine.next(&handle, now), Transition::Completed);
    assert_eq!(engine.state(), TourState::Completed);
    assert_eq!(engine.store().backend().writes(), 0);
}

#[test]
fn test_unknown_tour_id_is_an_error() {
    let catalog = TourCatalog::builtin().unwrap();
    let mut engine = create_test_engine(Layout::new(Size::new(1024.0, 768.0)));
    let err = engine
        .start_tour_by_id(&catalog, "nope", TourOptions::new(), Instant::now())
        .unwrap_err();
    assert_eq!(err.to_string(), "Tour 'nope' not found");
    assert!(!engine.is_running());
}
