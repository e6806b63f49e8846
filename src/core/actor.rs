//! The principal performing a transition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whoever is acting on the entity: a user, a service account, a job.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} ({})", self.id),
            None => f.write_str(&self.id),
        }
    }
}

/// Resolves the current actor. Returns `None` for anonymous or system work.
pub trait PrincipalResolver: Send + Sync {
    fn current(&self) -> Option<Actor>;
}

impl<F> PrincipalResolver for F
where
    F: Fn() -> Option<Actor> + Send + Sync,
{
    fn current(&self) -> Option<Actor> {
        self()
    }
}
