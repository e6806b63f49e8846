//! Ordered, filterable views over declared transitions.
//!
//! Filters never touch the base sequence: each returns a new collection that
//! borrows the same transitions, in the same declaration order.

use super::{AuthorizationProvider, DenyCapabilities, Transition};
use crate::core::{Actor, Context, GuardOutcome, Payload, State, StateCollection, StateValue};
use crate::error::{Result, WorkflowError};

/// Everything guards and authorization rules need besides the transition.
pub struct Scope<'a, E> {
    entity: &'a E,
    states: &'a StateCollection,
    actor: Option<Actor>,
    authorizer: &'a dyn AuthorizationProvider<E>,
}

impl<'a, E> Scope<'a, E> {
    pub fn new(entity: &'a E, states: &'a StateCollection) -> Self {
        Self {
            entity,
            states,
            actor: None,
            authorizer: &DenyCapabilities,
        }
    }

    pub fn with_actor(mut self, actor: Option<Actor>) -> Self {
        self.actor = actor;
        self
    }

    pub fn with_authorizer(mut self, authorizer: &'a dyn AuthorizationProvider<E>) -> Self {
        self.authorizer = authorizer;
        self
    }

    pub fn entity(&self) -> &'a E {
        self.entity
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    fn state(&self, value: &StateValue) -> State {
        self.states
            .find(value)
            .cloned()
            .unwrap_or_else(|| State::new(value))
    }

    /// Prospective context for taking `transition` with `payload`.
    pub fn context(&self, transition: &Transition<E>, payload: Payload) -> Context {
        Context::new(
            Some(self.state(transition.source())),
            self.state(transition.target()),
            self.actor.clone(),
            payload,
        )
    }

    pub fn outcome(&self, transition: &Transition<E>) -> GuardOutcome {
        transition.outcome(self.entity, &self.context(transition, Payload::new()))
    }

    pub fn is_authorized(&self, transition: &Transition<E>) -> bool {
        transition.is_authorized(
            self.entity,
            &self.context(transition, Payload::new()),
            self.authorizer,
        )
    }
}

impl<E> Clone for Scope<'_, E> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity,
            states: self.states,
            actor: self.actor.clone(),
            authorizer: self.authorizer,
        }
    }
}

/// Ordered transitions evaluated against one entity.
///
/// # Example
///
/// ```rust
/// use waymark::builder::TransitionBuilder;
/// use waymark::core::{Guard, GuardOutcome, State, StateCollection, StateValue};
/// use waymark::transition::{Scope, Transition, TransitionCollection};
///
/// struct Ticket;
///
/// let declared: Vec<Transition<Ticket>> = vec![
///     TransitionBuilder::new()
///         .from("open")
///         .to("closed")
///         .guard(Guard::new(|_: &Ticket, _| GuardOutcome::Fatal("locked".into())))
///         .build()
///         .unwrap(),
///     TransitionBuilder::new().from("open").to("waiting").build().unwrap(),
/// ];
/// let states = StateCollection::new(vec![
///     State::new("open"),
///     State::new("waiting"),
///     State::new("closed"),
/// ]);
///
/// let ticket = Ticket;
/// let all = TransitionCollection::new(Scope::new(&ticket, &states), &declared);
/// let available = all.from("open").without_forbidden();
///
/// assert_eq!(available.len(), 1);
/// assert_eq!(available.targets(), vec![&StateValue::from("waiting")]);
/// assert_eq!(all.len(), 2);
/// ```
pub struct TransitionCollection<'a, E> {
    scope: Scope<'a, E>,
    items: Vec<&'a Transition<E>>,
}

impl<'a, E> TransitionCollection<'a, E> {
    pub fn new<I>(scope: Scope<'a, E>, transitions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transition<E>>,
    {
        Self {
            scope,
            items: transitions.into_iter().collect(),
        }
    }

    fn filtered<F>(&self, keep: F) -> Self
    where
        F: Fn(&Transition<E>) -> bool,
    {
        Self {
            scope: self.scope.clone(),
            items: self.items.iter().copied().filter(|t| keep(*t)).collect(),
        }
    }

    /// Transitions leaving `source`.
    pub fn from(&self, source: impl Into<StateValue>) -> Self {
        let source = source.into();
        self.filtered(|t| t.source() == &source)
    }

    /// Transitions entering `target`.
    pub fn to(&self, target: impl Into<StateValue>) -> Self {
        let target = target.into();
        self.filtered(|t| t.target() == &target)
    }

    /// Drop transitions a guard blocks fatally.
    pub fn without_forbidden(&self) -> Self {
        self.filtered(|t| !self.scope.outcome(t).is_fatal())
    }

    /// Keep only transitions blocked recoverably: the "why can't I" view.
    pub fn without_recoverable(&self) -> Self {
        self.filtered(|t| self.scope.outcome(t).is_recoverable())
    }

    /// Keep transitions whose authorization rule passes.
    pub fn authorized(&self) -> Self {
        self.filtered(|t| self.scope.is_authorized(t))
    }

    /// Resolve exactly one transition between two states.
    pub fn sole(
        &self,
        source: impl Into<StateValue>,
        target: impl Into<StateValue>,
    ) -> Result<&'a Transition<E>> {
        let source = source.into();
        let target = target.into();
        let matches: Vec<&'a Transition<E>> = self
            .items
            .iter()
            .copied()
            .filter(|t| t.connects(&source, &target))
            .collect();

        match matches.as_slice() {
            [] => Err(WorkflowError::TransitionNotFound {
                from: Some(source),
                target,
            }),
            [transition] => Ok(*transition),
            _ => Err(WorkflowError::AmbiguousTransition {
                from: source,
                target,
                count: matches.len(),
            }),
        }
    }

    /// Guard outcome of one transition in this scope.
    pub fn outcome(&self, transition: &Transition<E>) -> GuardOutcome {
        self.scope.outcome(transition)
    }

    /// First guard problem of one transition in this scope.
    pub fn problem(&self, transition: &Transition<E>) -> Option<String> {
        self.outcome(transition).problem().map(str::to_string)
    }

    pub fn scope(&self) -> &Scope<'a, E> {
        &self.scope
    }

    pub fn targets(&self) -> Vec<&'a StateValue> {
        self.items.iter().map(|t| t.target()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Transition<E>> + '_ {
        self.items.iter().copied()
    }

    pub fn first(&self) -> Option<&'a Transition<E>> {
        self.items.first().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<E> Clone for TransitionCollection<'_, E> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            items: self.items.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TransitionBuilder;
    use crate::core::Guard;
    use crate::transition::{Authorization, CapabilityTable};

    struct Doc;

    fn v(value: &str) -> StateValue {
        StateValue::from(value)
    }

    fn states() -> StateCollection {
        ["a", "b", "c", "d"].into_iter().map(State::new).collect()
    }

    fn declared() -> Vec<Transition<Doc>> {
        vec![
            TransitionBuilder::new()
                .from("a")
                .to("b")
                .guard(Guard::new(|_: &Doc, _| GuardOutcome::Fatal("never".into())))
                .build()
                .unwrap(),
            TransitionBuilder::new().from("a").to("c").build().unwrap(),
            TransitionBuilder::new()
                .from("b")
                .to("c")
                .guard(Guard::new(|_: &Doc, _| {
                    GuardOutcome::Recoverable("fill in the form".into())
                }))
                .build()
                .unwrap(),
            TransitionBuilder::new()
                .from("c")
                .to("d")
                .authorize(Authorization::capability("finish"))
                .build()
                .unwrap(),
        ]
    }

    #[test]
    fn from_keeps_declaration_order() {
        let states = states();
        let declared = declared();
        let all = TransitionCollection::new(Scope::new(&Doc, &states), &declared);

        let from_a = all.from("a");
        assert_eq!(from_a.targets(), vec![&v("b"), &v("c")]);
        assert_eq!(all.to("c").len(), 2);
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn without_forbidden_drops_fatal_entries() {
        let states = states();
        let declared = declared();
        let all = TransitionCollection::new(Scope::new(&Doc, &states), &declared);

        let from_a = all.from("a");
        assert_eq!(from_a.without_forbidden().targets(), vec![&v("c")]);
        assert!(from_a.without_recoverable().is_empty());
    }

    #[test]
    fn without_recoverable_keeps_only_recoverable_blocks() {
        let states = states();
        let declared = declared();
        let all = TransitionCollection::new(Scope::new(&Doc, &states), &declared);

        let blocked = all.without_recoverable();
        assert_eq!(blocked.len(), 1);
        let transition = blocked.first().unwrap();
        assert_eq!(
            blocked.problem(transition),
            Some("fill in the form".to_string())
        );
    }

    #[test]
    fn authorized_consults_the_provider() {
        let states = states();
        let declared = declared();
        let table = CapabilityTable::new().grant("boss", "finish");

        let anonymous = TransitionCollection::new(Scope::new(&Doc, &states), &declared);
        assert_eq!(anonymous.from("c").authorized().len(), 0);

        let scope = Scope::new(&Doc, &states)
            .with_actor(Some(Actor::new("boss")))
            .with_authorizer(&table);
        let boss = TransitionCollection::new(scope, &declared);
        assert_eq!(boss.from("c").authorized().len(), 1);
        assert_eq!(boss.authorized().len(), 4);
    }

    #[test]
    fn sole_resolves_one_transition() {
        let states = states();
        let declared = declared();
        let all = TransitionCollection::new(Scope::new(&Doc, &states), &declared);

        assert_eq!(all.sole("a", "c").unwrap().target(), &v("c"));
        assert!(matches!(
            all.sole("d", "a"),
            Err(WorkflowError::TransitionNotFound { .. })
        ));
    }

    #[test]
    fn sole_rejects_duplicate_declarations() {
        let states = states();
        let declared: Vec<Transition<Doc>> = vec![
            TransitionBuilder::new().from("a").to("b").build().unwrap(),
            TransitionBuilder::new().from("a").to("b").build().unwrap(),
        ];
        let all = TransitionCollection::new(Scope::new(&Doc, &states), &declared);

        assert!(matches!(
            all.sole("a", "b"),
            Err(WorkflowError::AmbiguousTransition { count: 2, .. })
        ));
    }

    #[test]
    fn filters_do_not_mutate_the_base() {
        let states = states();
        let declared = declared();
        let all = TransitionCollection::new(Scope::new(&Doc, &states), &declared);

        let _ = all.from("a").without_forbidden();
        let _ = all.authorized();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn guard_context_resolves_declared_states() {
        let states = StateCollection::new(vec![
            State::new("a").with_label("Alpha"),
            State::new("b").with_label("Beta"),
        ]);
        let declared: Vec<Transition<Doc>> = vec![TransitionBuilder::new()
            .from("a")
            .to("b")
            .guard(Guard::new(|_: &Doc, ctx: &Context| {
                if ctx.target().label() == Some("Beta") {
                    GuardOutcome::Open
                } else {
                    GuardOutcome::Fatal("label missing".into())
                }
            }))
            .build()
            .unwrap()];

        let all = TransitionCollection::new(Scope::new(&Doc, &states), &declared);
        assert_eq!(all.without_forbidden().len(), 1);
    }
}
