//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::charge::Charge;
use crate::core::{Context, Guard, GuardOutcome, Metadata, Payload, StateValue};
use crate::transition::{Authorization, CallbackError, PostCommit, Transition};
use crate::validation::RuleMap;
use std::sync::Arc;

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<E> {
    from: Option<StateValue>,
    to: Option<StateValue>,
    label: Option<String>,
    guards: Vec<Guard<E>>,
    authorization: Option<Authorization<E>>,
    rules: RuleMap,
    callbacks: Vec<PostCommit<E>>,
    metadata: Metadata,
    charge: Option<Charge<E>>,
}

impl<E> TransitionBuilder<E> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            label: None,
            guards: Vec::new(),
            authorization: None,
            rules: RuleMap::new(),
            callbacks: Vec::new(),
            metadata: Metadata::new(),
            charge: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: impl Into<StateValue>) -> Self {
        self.from = Some(state.into());
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: impl Into<StateValue>) -> Self {
        self.to = Some(state.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Append a guard. Guards run in the order they are added.
    pub fn guard(mut self, guard: Guard<E>) -> Self {
        self.guards.push(guard);
        self
    }

    /// Append a guard from a closure returning the full outcome.
    pub fn when<F>(self, check: F) -> Self
    where
        F: Fn(&E, &Context) -> GuardOutcome + Send + Sync + 'static,
    {
        self.guard(Guard::new(check))
    }

    /// Set the authorization rule (optional).
    pub fn authorize(mut self, rule: Authorization<E>) -> Self {
        self.authorization = Some(rule);
        self
    }

    /// Require a capability checked by the engine's authorization provider.
    pub fn capability(self, name: impl Into<String>) -> Self {
        self.authorize(Authorization::capability(name))
    }

    /// Authorize with a local predicate.
    pub fn authorize_with<F>(self, predicate: F) -> Self
    where
        F: Fn(&E, &Context) -> bool + Send + Sync + 'static,
    {
        self.authorize(Authorization::predicate(predicate))
    }

    /// Add a payload rule spec for one field, e.g. `"required|string"`.
    pub fn rule(mut self, field: impl Into<String>, spec: impl Into<String>) -> Self {
        self.rules.insert(field.into(), spec.into());
        self
    }

    /// Append a post-commit callback.
    pub fn after<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut E, &Payload) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.callbacks.push(Arc::new(callback));
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Make the transition progressive (optional).
    pub fn charge(mut self, charge: Charge<E>) -> Self {
        self.charge = Some(charge);
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<E>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        let mut transition = Transition::between(from, to);
        transition.label = self.label;
        transition.guards = self.guards;
        transition.authorization = self.authorization;
        transition.rules = self.rules;
        transition.callbacks = self.callbacks;
        transition.metadata = self.metadata;
        transition.charge = self.charge;
        Ok(transition)
    }
}

impl<E> Default for TransitionBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}
