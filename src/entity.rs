//! The persistent entity a workflow is attached to.
//!
//! The engine never saves anything. It only reads and writes one named
//! attribute through [`Entity`] and reports whether the entity needs saving.

use crate::core::StateValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accessor contract between the engine and an application entity.
pub trait Entity {
    /// Durable identity, used in audit records and snapshots.
    fn entity_id(&self) -> String;

    /// Current in-memory value of a workflow attribute.
    fn attribute(&self, name: &str) -> Option<StateValue>;

    fn set_attribute(&mut self, name: &str, value: StateValue);

    /// Value of the attribute as last loaded from or saved to storage.
    fn original_attribute(&self, name: &str) -> Option<StateValue>;

    /// Whether the attribute differs from its stored value.
    fn is_dirty(&self, name: &str) -> bool {
        self.attribute(name) != self.original_attribute(name)
    }
}

/// Dirty-tracking attribute storage that entities can embed.
///
/// # Example
///
/// ```rust
/// use waymark::core::StateValue;
/// use waymark::entity::Attributes;
///
/// let mut attrs = Attributes::loaded([("status", StateValue::from("review"))]);
/// assert!(!attrs.is_dirty("status"));
///
/// attrs.set("status", "published".into());
/// assert!(attrs.is_dirty("status"));
///
/// attrs.mark_clean();
/// assert!(!attrs.is_dirty("status"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    current: BTreeMap<String, StateValue>,
    original: BTreeMap<String, StateValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes as read from storage: current and original agree.
    pub fn loaded<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, StateValue)>,
        K: Into<String>,
    {
        let current: BTreeMap<String, StateValue> =
            values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            original: current.clone(),
            current,
        }
    }

    pub fn get(&self, name: &str) -> Option<StateValue> {
        self.current.get(name).cloned()
    }

    pub fn set(&mut self, name: &str, value: StateValue) {
        self.current.insert(name.to_string(), value);
    }

    pub fn original(&self, name: &str) -> Option<StateValue> {
        self.original.get(name).cloned()
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.current.get(name) != self.original.get(name)
    }

    /// Call after the owning entity was saved.
    pub fn mark_clean(&mut self) {
        self.original = self.current.clone();
    }
}
