//! Property-based tests for core workflow types.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use waymark::builder::simple_transition;
use waymark::charge::{Charge, Threshold};
use waymark::core::{
    evaluate, AuditRecord, Context, Guard, GuardOutcome, History, Payload, State, StateCollection,
    StateValue,
};
use waymark::transition::{Scope, Transition, TransitionCollection};
use waymark::ErrorKind;

struct Subject;

fn value(index: u8) -> StateValue {
    StateValue::from(format!("s{index}"))
}

fn ctx() -> Context {
    Context::new(Some(State::new("a")), State::new("b"), None, Payload::new())
}

prop_compose! {
    fn arbitrary_outcome()(kind in 0..3u8, reason in "[a-z]{1,8}") -> GuardOutcome {
        match kind {
            0 => GuardOutcome::Open,
            1 => GuardOutcome::Recoverable(reason),
            _ => GuardOutcome::Fatal(reason),
        }
    }
}

proptest! {
    #[test]
    fn one_matches_iff_exactly_one_state(
        declared in prop::collection::vec(0..5u8, 0..8),
        probe in 0..5u8,
    ) {
        let states: StateCollection = declared.iter().map(|i| State::new(value(*i))).collect();
        let count = declared.iter().filter(|i| **i == probe).count();

        match states.one(value(probe)) {
            Ok(state) => {
                prop_assert_eq!(count, 1);
                prop_assert_eq!(state.value(), &value(probe));
            }
            Err(err) if count == 0 => prop_assert_eq!(err.kind(), ErrorKind::NotFound),
            Err(err) => {
                prop_assert!(count >= 2);
                prop_assert_eq!(err.kind(), ErrorKind::AmbiguousMatch);
            }
        }
    }

    #[test]
    fn from_keeps_exactly_matching_sources_in_order(
        edges in prop::collection::vec((0..4u8, 0..4u8), 0..12),
        source in 0..4u8,
    ) {
        let declared: Vec<Transition<Subject>> = edges
            .iter()
            .map(|(from, to)| simple_transition(value(*from), value(*to)))
            .collect();
        let states = StateCollection::new((0..4).map(|i| State::new(value(i))).collect());
        let all = TransitionCollection::new(Scope::new(&Subject, &states), &declared);

        let expected: Vec<StateValue> = edges
            .iter()
            .filter(|(from, _)| *from == source)
            .map(|(_, to)| value(*to))
            .collect();
        let actual: Vec<StateValue> = all.from(value(source)).targets().into_iter().cloned().collect();

        prop_assert_eq!(actual, expected);
        prop_assert_eq!(all.len(), edges.len());
    }

    #[test]
    fn guards_stop_at_first_block(outcomes in prop::collection::vec(arbitrary_outcome(), 0..8)) {
        let calls = Arc::new(AtomicUsize::new(0));
        let guards: Vec<Guard<Subject>> = outcomes
            .iter()
            .cloned()
            .map(|outcome| {
                let calls = Arc::clone(&calls);
                Guard::new(move |_: &Subject, _: &Context| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    outcome.clone()
                })
            })
            .collect();

        let first_block = outcomes.iter().position(|o| !o.is_open());
        let result = evaluate(&guards, &Subject, &ctx());

        match first_block {
            Some(index) => {
                prop_assert_eq!(&result, &outcomes[index]);
                prop_assert_eq!(calls.load(Ordering::SeqCst), index + 1);
            }
            None => {
                prop_assert!(result.is_open());
                prop_assert_eq!(calls.load(Ordering::SeqCst), outcomes.len());
            }
        }
    }

    #[test]
    fn charge_progress_stays_in_unit_interval(raw in prop::num::f64::ANY) {
        let charge: Charge<Subject> = Charge::new(
            move |_: &Subject| raw,
            |_: &Subject, _: &Context| true,
            |_: &mut Subject, _: &Context| {},
        );

        let progress = charge.progress(&Subject);
        prop_assert!((0.0..=1.0).contains(&progress));
        prop_assert_eq!(charge.charged(&Subject), progress >= 1.0);
    }

    #[test]
    fn threshold_progress_is_monotonic(required in 1..10usize, count in 0..20usize) {
        let threshold = Threshold::new(required);

        prop_assert!(threshold.progress(count) <= threshold.progress(count + 1));
        prop_assert_eq!(threshold.progress(count) >= 1.0, count >= required);
    }

    #[test]
    fn history_path_follows_recorded_targets(targets in prop::collection::vec(0..5u8, 1..10)) {
        let mut history = History::new();
        let mut source: Option<State> = None;

        for target in &targets {
            let state = State::new(value(*target));
            let ctx = Context::new(source.clone(), state.clone(), None, Payload::new());
            history = history.record(AuditRecord::new("bp", "status", "1", ctx));
            source = Some(state);
        }

        let expected: Vec<StateValue> = targets.iter().map(|t| value(*t)).collect();
        let path: Vec<StateValue> = history.path().into_iter().cloned().collect();
        prop_assert_eq!(path, expected);
    }

    #[test]
    fn history_record_is_pure(target in 0..5u8) {
        let history = History::new();
        let ctx = Context::initial(State::new(value(target)), None, Payload::new());

        let next = history.record(AuditRecord::new("bp", "status", "1", ctx));

        prop_assert_eq!(history.len(), 0);
        prop_assert_eq!(next.len(), 1);
    }

    #[test]
    fn state_equality_ignores_labels(index in 0..5u8, label in "[A-Za-z ]{0,12}") {
        let plain = State::new(value(index));
        let labelled = State::new(value(index)).with_label(label);

        prop_assert_eq!(&plain, &labelled);
        prop_assert!(labelled.is(value(index)));
    }
}
