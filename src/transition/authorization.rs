//! Authorization rules attached to transitions.

use super::Transition;
use crate::core::{Actor, Context};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// External authority answering capability checks.
pub trait AuthorizationProvider<E>: Send + Sync {
    fn allows(
        &self,
        capability: &str,
        entity: &E,
        transition: &Transition<E>,
        actor: Option<&Actor>,
    ) -> bool;
}

/// Provider used when none is configured: every capability check fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyCapabilities;

impl<E> AuthorizationProvider<E> for DenyCapabilities {
    fn allows(&self, _: &str, _: &E, _: &Transition<E>, _: Option<&Actor>) -> bool {
        false
    }
}

/// Static actor-to-capabilities grants.
///
/// ```rust
/// use waymark::transition::CapabilityTable;
///
/// let table = CapabilityTable::new()
///     .grant("editor-1", "review")
///     .grant("editor-1", "publish");
///
/// assert!(table.has("editor-1", "publish"));
/// assert!(!table.has("writer-7", "publish"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    grants: HashMap<String, HashSet<String>>,
}

impl CapabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, actor: impl Into<String>, capability: impl Into<String>) -> Self {
        self.grants
            .entry(actor.into())
            .or_default()
            .insert(capability.into());
        self
    }

    pub fn has(&self, actor: &str, capability: &str) -> bool {
        self.grants
            .get(actor)
            .is_some_and(|caps| caps.contains(capability))
    }
}

impl<E> AuthorizationProvider<E> for CapabilityTable {
    fn allows(&self, capability: &str, _: &E, _: &Transition<E>, actor: Option<&Actor>) -> bool {
        actor.is_some_and(|actor| self.has(actor.id(), capability))
    }
}

/// How a transition decides who may take it.
pub enum Authorization<E> {
    /// Delegate to the injected [`AuthorizationProvider`].
    Capability(String),
    /// Decide locally; `false` denies.
    Predicate(Arc<dyn Fn(&E, &Context) -> bool + Send + Sync>),
}

impl<E> Authorization<E> {
    pub fn capability(name: impl Into<String>) -> Self {
        Self::Capability(name.into())
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&E, &Context) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    pub fn permits(
        &self,
        entity: &E,
        transition: &Transition<E>,
        ctx: &Context,
        provider: &dyn AuthorizationProvider<E>,
    ) -> bool {
        match self {
            Self::Capability(capability) => {
                provider.allows(capability, entity, transition, ctx.actor())
            }
            Self::Predicate(predicate) => predicate(entity, ctx),
        }
    }
}

impl<E> Clone for Authorization<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Capability(name) => Self::Capability(name.clone()),
            Self::Predicate(predicate) => Self::Predicate(Arc::clone(predicate)),
        }
    }
}

impl<E> fmt::Debug for Authorization<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capability(name) => f.debug_tuple("Capability").field(name).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::simple_transition;
    use crate::core::{Payload, State};

    struct Page {
        owner: String,
    }

    fn ctx(actor: Option<&str>) -> Context {
        Context::new(
            Some(State::new("draft")),
            State::new("live"),
            actor.map(Actor::new),
            Payload::new(),
        )
    }

    #[test]
    fn deny_capabilities_rejects_everything() {
        let page = Page { owner: "a".into() };
        let transition = simple_transition::<Page>("draft", "live");
        let rule = Authorization::capability("publish");

        assert!(!rule.permits(&page, &transition, &ctx(Some("a")), &DenyCapabilities));
    }

    #[test]
    fn capability_table_checks_the_actor() {
        let page = Page { owner: "a".into() };
        let transition = simple_transition::<Page>("draft", "live");
        let rule = Authorization::capability("publish");
        let table = CapabilityTable::new().grant("a", "publish");

        assert!(rule.permits(&page, &transition, &ctx(Some("a")), &table));
        assert!(!rule.permits(&page, &transition, &ctx(Some("b")), &table));
        assert!(!rule.permits(&page, &transition, &ctx(None), &table));
    }

    #[test]
    fn predicate_is_invoked_directly() {
        let page = Page { owner: "a".into() };
        let transition = simple_transition::<Page>("draft", "live");
        let rule = Authorization::predicate(|page: &Page, ctx: &Context| {
            ctx.actor().is_some_and(|actor| actor.id() == page.owner)
        });

        assert!(rule.permits(&page, &transition, &ctx(Some("a")), &DenyCapabilities));
        assert!(!rule.permits(&page, &transition, &ctx(Some("b")), &DenyCapabilities));
    }
}
