//! Blueprints: the declared states and transitions of one workflow.
//!
//! A blueprint is immutable once built and is shared between engines through
//! an `Arc`. Engines cache what they read from it for their own lifetime only.

pub mod validator;

pub use validator::{BlueprintValidator, StateReport, TransitionReport, ValidationReport};

use crate::core::{Actor, PrincipalResolver, State};
use crate::transition::Transition;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Workflow definition consumed by the engine.
pub trait Blueprint<E>: Send + Sync {
    /// Identity used in audit records and snapshots.
    fn id(&self) -> &str;

    /// Declared states in order. The first one is the initial state.
    fn states(&self) -> Vec<State>;

    /// Declared transitions in order.
    fn transitions(&self) -> Vec<Transition<E>>;

    /// Actor performing changes when none is set on the engine.
    fn principal(&self) -> Option<Actor> {
        None
    }

    /// Caption of `state` for one entity. Override for entity-bound labels.
    fn state_caption(&self, state: &State, _entity: &E) -> String {
        state.caption()
    }
}

/// Blueprint assembled with [`BlueprintBuilder`](crate::builder::BlueprintBuilder).
pub struct DeclaredBlueprint<E> {
    pub(crate) id: String,
    pub(crate) states: Vec<State>,
    pub(crate) transitions: Vec<Transition<E>>,
    pub(crate) principal: Option<Arc<dyn PrincipalResolver>>,
}

impl<E> Blueprint<E> for DeclaredBlueprint<E> {
    fn id(&self) -> &str {
        &self.id
    }

    fn states(&self) -> Vec<State> {
        self.states.clone()
    }

    fn transitions(&self) -> Vec<Transition<E>> {
        self.transitions.clone()
    }

    fn principal(&self) -> Option<Actor> {
        self.principal.as_ref().and_then(|resolver| resolver.current())
    }
}

impl<E> fmt::Debug for DeclaredBlueprint<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredBlueprint")
            .field("id", &self.id)
            .field("states", &self.states)
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}

/// Blueprints by id, used to re-attach engines restored from snapshots.
pub struct BlueprintRegistry<E> {
    blueprints: HashMap<String, Arc<dyn Blueprint<E>>>,
}

impl<E> BlueprintRegistry<E> {
    pub fn new() -> Self {
        Self {
            blueprints: HashMap::new(),
        }
    }

    /// Register a blueprint under its own id, replacing any previous entry.
    pub fn register(&mut self, blueprint: Arc<dyn Blueprint<E>>) -> &mut Self {
        self.blueprints
            .insert(blueprint.id().to_string(), blueprint);
        self
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Blueprint<E>>> {
        self.blueprints.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.blueprints.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }
}

impl<E> Default for BlueprintRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}
