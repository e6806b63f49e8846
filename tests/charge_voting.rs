//! Progressive transitions that need several distinct approvals.

use std::sync::Arc;
use waymark::blueprint::Blueprint;
use waymark::builder::{BlueprintBuilder, TransitionBuilder};
use waymark::charge::{Charge, Threshold};
use waymark::core::{Actor, Context, Payload, StateValue};
use waymark::engine::{ChargeDeniedPolicy, Engine, EngineBuilder, EngineConfig, TransitOutcome};
use waymark::entity::{Attributes, Entity};
use waymark::WorkflowError;

struct Proposal {
    attrs: Attributes,
    approvals: Vec<String>,
}

impl Proposal {
    fn submitted() -> Self {
        Self {
            attrs: Attributes::loaded([("status", StateValue::from("submitted"))]),
            approvals: Vec::new(),
        }
    }
}

impl Entity for Proposal {
    fn entity_id(&self) -> String {
        "p-1".into()
    }

    fn attribute(&self, name: &str) -> Option<StateValue> {
        self.attrs.get(name)
    }

    fn set_attribute(&mut self, name: &str, value: StateValue) {
        self.attrs.set(name, value);
    }

    fn original_attribute(&self, name: &str) -> Option<StateValue> {
        self.attrs.original(name)
    }
}

fn blueprint() -> Arc<dyn Blueprint<Proposal>> {
    Arc::new(
        BlueprintBuilder::<Proposal>::new("proposal")
            .states(["submitted", "approved", "rejected"])
            .transition(
                TransitionBuilder::new()
                    .from("submitted")
                    .to("approved")
                    .charge(Threshold::new(3).distinct_actors(
                        |p: &Proposal| &p.approvals,
                        |p: &mut Proposal| &mut p.approvals,
                    )),
            )
            .unwrap()
            .transition(TransitionBuilder::new().from("submitted").to("rejected"))
            .unwrap()
            .build()
            .unwrap(),
    )
}

fn engine(config: EngineConfig) -> Engine<Proposal> {
    EngineBuilder::new(blueprint(), Proposal::submitted())
        .config(config)
        .build()
        .unwrap()
}

fn vote(engine: &mut Engine<Proposal>, voter: &str) -> Result<TransitOutcome, WorkflowError> {
    engine.act_as(Some(Actor::new(voter)));
    engine.transit("approved", Payload::new())
}

fn progress(outcome: &TransitOutcome) -> f64 {
    match outcome {
        TransitOutcome::Charging { progress } => *progress,
        other => panic!("expected charging, got {other:?}"),
    }
}

#[test]
fn commits_exactly_on_the_third_distinct_voter() {
    let mut engine = engine(EngineConfig::default());

    let first = vote(&mut engine, "ann").unwrap();
    assert!((progress(&first) - 1.0 / 3.0).abs() < 1e-9);
    assert!(engine.is("submitted"));

    let second = vote(&mut engine, "bob").unwrap();
    assert!((progress(&second) - 2.0 / 3.0).abs() < 1e-9);
    assert!(engine.is("submitted"));
    assert!(!engine.is_dirty());
    assert!(engine.pending_context().is_none());

    let third = vote(&mut engine, "cid").unwrap();
    assert!(third.is_committed());
    assert!(engine.is("approved"));
    assert_eq!(engine.entity().approvals, vec!["ann", "bob", "cid"]);
}

#[test]
fn repeated_vote_is_a_silent_no_op() {
    let mut engine = engine(EngineConfig::default());

    vote(&mut engine, "ann").unwrap();
    let again = vote(&mut engine, "ann").unwrap();

    assert_eq!(again, TransitOutcome::Declined);
    assert_eq!(engine.entity().approvals, vec!["ann"]);
    assert!(engine.is("submitted"));
}

#[test]
fn repeated_vote_can_be_rejected() {
    let mut engine = engine(EngineConfig {
        charge_denied: ChargeDeniedPolicy::Reject,
        ..EngineConfig::default()
    });

    vote(&mut engine, "ann").unwrap();
    assert!(matches!(
        vote(&mut engine, "ann"),
        Err(WorkflowError::AlreadyCharged { .. })
    ));
}

#[test]
fn anonymous_votes_are_declined() {
    let mut engine = engine(EngineConfig::default());

    let outcome = engine.transit("approved", Payload::new()).unwrap();

    assert_eq!(outcome, TransitOutcome::Declined);
    assert!(engine.entity().approvals.is_empty());
}

#[test]
fn non_progressive_routes_commit_immediately() {
    let mut engine = engine(EngineConfig::default());
    vote(&mut engine, "ann").unwrap();

    let outcome = engine.transit("rejected", Payload::new()).unwrap();

    assert!(outcome.is_committed());
    assert!(engine.is("rejected"));
}

#[test]
fn custom_charges_drive_the_engine() {
    struct Budget {
        attrs: Attributes,
        funded: f64,
    }

    impl Entity for Budget {
        fn entity_id(&self) -> String {
            "b-1".into()
        }

        fn attribute(&self, name: &str) -> Option<StateValue> {
            self.attrs.get(name)
        }

        fn set_attribute(&mut self, name: &str, value: StateValue) {
            self.attrs.set(name, value);
        }

        fn original_attribute(&self, name: &str) -> Option<StateValue> {
            self.attrs.original(name)
        }
    }

    let blueprint: Arc<dyn Blueprint<Budget>> = Arc::new(
        BlueprintBuilder::<Budget>::new("budget")
            .states(["open", "funded"])
            .transition(TransitionBuilder::new().from("open").to("funded").charge(
                Charge::new(
                    |b: &Budget| b.funded / 100.0,
                    |_: &Budget, _: &Context| true,
                    |b: &mut Budget, ctx: &Context| {
                        b.funded += ctx.get("amount").and_then(|v| v.as_f64()).unwrap_or(0.0);
                    },
                ),
            ))
            .unwrap()
            .build()
            .unwrap(),
    );
    let mut engine = EngineBuilder::new(
        blueprint,
        Budget {
            attrs: Attributes::new(),
            funded: 0.0,
        },
    )
    .build()
    .unwrap();
    engine.init(Payload::new()).unwrap();

    let pledge = |amount: f64| waymark::core::payload(serde_json::json!({ "amount": amount }));

    assert_eq!(
        engine.transit("funded", pledge(60.0)).unwrap(),
        TransitOutcome::Charging { progress: 0.6 }
    );
    assert!(engine.transit("funded", pledge(60.0)).unwrap().is_committed());
    assert!(engine.is("funded"));
}

#[test]
fn declined_voters_are_not_judged_on_their_payload() {
    let blueprint: Arc<dyn Blueprint<Proposal>> = Arc::new(
        BlueprintBuilder::<Proposal>::new("reasoned")
            .states(["submitted", "approved"])
            .transition(
                TransitionBuilder::new()
                    .from("submitted")
                    .to("approved")
                    .rule("reason", "required|string")
                    .charge(Threshold::new(2).distinct_actors(
                        |p: &Proposal| &p.approvals,
                        |p: &mut Proposal| &mut p.approvals,
                    )),
            )
            .unwrap()
            .build()
            .unwrap(),
    );
    let mut engine = EngineBuilder::new(blueprint, Proposal::submitted())
        .build()
        .unwrap();
    let reason = waymark::core::payload(serde_json::json!({ "reason": "solid" }));

    engine.act_as(Some(Actor::new("ann")));
    assert!(matches!(
        engine.transit("approved", reason).unwrap(),
        TransitOutcome::Charging { .. }
    ));

    let again = engine.transit("approved", Payload::new()).unwrap();
    assert_eq!(again, TransitOutcome::Declined);

    engine.act_as(Some(Actor::new("bob")));
    assert!(matches!(
        engine.transit("approved", Payload::new()),
        Err(WorkflowError::Validation(_))
    ));
    assert_eq!(engine.entity().approvals, vec!["ann"]);
}
