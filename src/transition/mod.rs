//! Declared transitions between two states.
//!
//! A transition bundles everything the engine needs to decide on and carry
//! out a move: guards, an authorization rule, payload rules, post-commit
//! callbacks and an optional charge. Build them with
//! [`TransitionBuilder`](crate::builder::TransitionBuilder).

pub mod authorization;
pub mod collection;

pub use authorization::{Authorization, AuthorizationProvider, CapabilityTable, DenyCapabilities};
pub use collection::{Scope, TransitionCollection};

use crate::charge::Charge;
use crate::core::{evaluate, Context, Guard, GuardOutcome, Metadata, Payload, StateValue};
use crate::validation::{required_fields, RuleMap};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a post-commit callback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct CallbackError {
    pub message: String,
}

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for CallbackError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for CallbackError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Callback run after the attribute was committed.
pub type PostCommit<E> = Arc<dyn Fn(&mut E, &Payload) -> Result<(), CallbackError> + Send + Sync>;

/// A legal move from `source` to `target`.
pub struct Transition<E> {
    pub(crate) source: StateValue,
    pub(crate) target: StateValue,
    pub(crate) label: Option<String>,
    pub(crate) guards: Vec<Guard<E>>,
    pub(crate) authorization: Option<Authorization<E>>,
    pub(crate) rules: RuleMap,
    pub(crate) callbacks: Vec<PostCommit<E>>,
    pub(crate) metadata: Metadata,
    pub(crate) charge: Option<Charge<E>>,
}

impl<E> Transition<E> {
    pub(crate) fn between(source: StateValue, target: StateValue) -> Self {
        Self {
            source,
            target,
            label: None,
            guards: Vec::new(),
            authorization: None,
            rules: RuleMap::new(),
            callbacks: Vec::new(),
            metadata: Metadata::new(),
            charge: None,
        }
    }

    pub fn source(&self) -> &StateValue {
        &self.source
    }

    pub fn target(&self) -> &StateValue {
        &self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The label when present, otherwise the target value.
    pub fn caption(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.target.to_string())
    }

    /// Check whether this transition connects the two values.
    pub fn connects(&self, source: &StateValue, target: &StateValue) -> bool {
        &self.source == source && &self.target == target
    }

    pub fn guards(&self) -> &[Guard<E>] {
        &self.guards
    }

    /// Run the guards in declaration order, stopping at the first block.
    pub fn outcome(&self, entity: &E, ctx: &Context) -> GuardOutcome {
        evaluate(&self.guards, entity, ctx)
    }

    /// First problem reported by the guards, if any.
    pub fn has_problem(&self, entity: &E, ctx: &Context) -> Option<String> {
        self.outcome(entity, ctx).problem().map(str::to_string)
    }

    pub fn authorization(&self) -> Option<&Authorization<E>> {
        self.authorization.as_ref()
    }

    /// Apply the authorization rule. No rule means everyone may.
    pub fn is_authorized(
        &self,
        entity: &E,
        ctx: &Context,
        provider: &dyn AuthorizationProvider<E>,
    ) -> bool {
        self.authorization
            .as_ref()
            .is_none_or(|rule| rule.permits(entity, self, ctx, provider))
    }

    pub fn rules(&self) -> &RuleMap {
        &self.rules
    }

    pub fn required_fields(&self) -> Vec<String> {
        required_fields(&self.rules)
    }

    /// Run post-commit callbacks in order. The first failure stops the rest.
    pub fn run_callbacks(&self, entity: &mut E, payload: &Payload) -> Result<(), CallbackError> {
        for callback in &self.callbacks {
            callback(entity, payload)?;
        }
        Ok(())
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn charge(&self) -> Option<&Charge<E>> {
        self.charge.as_ref()
    }

    pub fn is_progressive(&self) -> bool {
        self.charge.is_some()
    }
}

impl<E> Clone for Transition<E> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            target: self.target.clone(),
            label: self.label.clone(),
            guards: self.guards.clone(),
            authorization: self.authorization.clone(),
            rules: self.rules.clone(),
            callbacks: self.callbacks.iter().map(Arc::clone).collect(),
            metadata: self.metadata.clone(),
            charge: self.charge.clone(),
        }
    }
}

impl<E> fmt::Debug for Transition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("label", &self.label)
            .field("guards", &self.guards.len())
            .field("authorization", &self.authorization)
            .field("rules", &self.rules)
            .field("callbacks", &self.callbacks.len())
            .field("progressive", &self.charge.is_some())
            .finish()
    }
}
