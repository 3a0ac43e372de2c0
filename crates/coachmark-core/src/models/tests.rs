#[cfg(test)]
mod model_tests {
    use std::collections::HashMap;

    use crate::models::{Completion, FieldPredicate, Side, SideEffect, Step, Tour, TourState};

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_last_step_becomes_terminal() {
        let tour = Tour::builder("t", "T")
            .step(Step::new("a", "A", ""))
            .step(Step::new("b", "B", ""))
            .build()
            .expect("valid tour");

        assert!(!tour.steps()[0].terminal);
        assert!(tour.steps()[1].terminal);
        assert_eq!(tour.last_index(), 1);
    }

    #[test]
    fn test_empty_tour_is_rejected() {
        let err = Tour::builder("empty", "Empty").build().unwrap_err();
        assert!(err.is_authoring_error());
        assert!(err.to_string().contains("at least one step"));
    }

    #[test]
    fn test_duplicate_step_ids_are_rejected() {
        let err = Tour::builder("dup", "Dup")
            .step(Step::new("same", "A", ""))
            .step(Step::new("same", "B", ""))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate step id 'same'"));
    }

    #[test]
    fn test_terminal_on_inner_step_is_rejected() {
        let mut first = Step::new("a", "A", "");
        first.terminal = true;
        let err = Tour::builder("t", "T")
            .step(first)
            .step(Step::new("b", "B", ""))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("not the last step"));
    }

    #[test]
    fn test_empty_field_predicate_is_rejected() {
        let step = Step::new("fields", "Fields", "").completes_on(Completion::OnFieldsValid {
            predicate: FieldPredicate::AllFilled(vec![]),
            auto_advance: false,
        });
        let err = Tour::builder("t", "T").step(step).build().unwrap_err();
        assert!(err.to_string().contains("empty field predicate"));

        let gated = Step::new("gated", "Gated", "").with_skip_gate(FieldPredicate::AnyFilled(vec![" ".into()]));
        let err = Tour::builder("t", "T").step(gated).build().unwrap_err();
        assert!(err.to_string().contains("empty skip gate"));
    }

    #[test]
    fn test_target_click_requires_target() {
        let err = Tour::builder("t", "T")
            .step(Step::new("a", "A", "").on_target_click())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("has no target"));
    }

    #[test]
    fn test_field_predicate_evaluation() {
        let predicate = FieldPredicate::all_filled(["name", "type"]);
        let empty = values(&[("name", "  "), ("type", "")]);
        let partial = values(&[("name", "Investments"), ("type", "")]);
        let full = values(&[("name", "Investments"), ("type", "domain")]);

        assert!(!predicate.evaluate(|f| empty.get(f).cloned()));
        assert!(!predicate.evaluate(|f| partial.get(f).cloned()));
        assert!(predicate.evaluate(|f| full.get(f).cloned()));

        let any = FieldPredicate::any_filled(["name", "type"]);
        assert!(any.evaluate(|f| partial.get(f).cloned()));
        assert!(!any.evaluate(|_| None));
    }

    #[test]
    fn test_watched_element_follows_completion() {
        let click = Step::new("a", "A", "").at("btn-a", Side::Right).on_target_click();
        assert_eq!(click.watched_element(), Some("btn-a"));

        let external = Step::new("b", "B", "")
            .at("btn-new-category", Side::Right)
            .on_action("wizard-continue");
        assert_eq!(external.watched_element(), Some("wizard-continue"));

        let manual = Step::new("c", "C", "").at("stats", Side::Bottom);
        assert_eq!(manual.watched_element(), None);
    }

    #[test]
    fn test_watched_fields_merge_gate_and_predicate() {
        let step = Step::new("details", "Details", "")
            .completes_on(Completion::OnFieldsValid {
                predicate: FieldPredicate::all_filled(["name"]),
                auto_advance: false,
            })
            .with_skip_gate(FieldPredicate::all_filled(["name", "type"]));
        assert_eq!(step.watched_fields(), vec!["name", "type"]);
    }

    #[test]
    fn test_tour_from_json() {
        let json = r#"{
            "id": "team-invite",
            "title": "Invite your team",
            "effects": [{"type": "mark_module", "module_id": "add-team-member"}],
            "steps": [
                {"id": "intro", "title": "Invite key users"},
                {
                    "id": "invite",
                    "title": "Invite",
                    "target_id": "btn-invite-first",
                    "placement": "right",
                    "completion": {"kind": "on_target_click"},
                    "skippable": true
                },
                {
                    "id": "details",
                    "title": "Details",
                    "target_id": "input-email",
                    "completion": {"kind": "on_external_action", "action_id": "btn-send-invitation"}
                }
            ]
        }"#;

        let tour: Tour = serde_json::from_str(json).expect("tour parses");
        assert_eq!(tour.id(), "team-invite");
        assert_eq!(tour.len(), 3);
        assert_eq!(tour.steps()[1].placement, Side::Right);
        assert_eq!(tour.steps()[0].placement, Side::Bottom);
        assert!(tour.steps()[2].terminal);
        assert_eq!(
            tour.effects(),
            &[SideEffect::MarkModule {
                module_id: "add-team-member".to_string()
            }]
        );
        assert!(!tour.abort_completes());
    }

    #[test]
    fn test_invalid_json_tour_fails_to_parse() {
        let json = r#"{"id": "bad", "steps": []}"#;
        let err = serde_json::from_str::<Tour>(json).unwrap_err();
        assert!(err.to_string().contains("at least one step"));
    }

    #[test]
    fn test_side_parsing_and_fallbacks() {
        assert_eq!("RIGHT".parse::<Side>().unwrap(), Side::Right);
        assert!("diagonal".parse::<Side>().is_err());
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Side::Top.fallbacks(), [Side::Bottom, Side::Right, Side::Left]);
    }

    #[test]
    fn test_tour_state_helpers() {
        assert_eq!(TourState::StepActive(2).current_index(), Some(2));
        assert!(TourState::Completed.is_finished());
        assert!(!TourState::Idle.is_active());
        assert_eq!(TourState::Aborted.as_str(), "aborted");
    }
}
