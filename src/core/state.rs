//! Workflow states and the collections that hold them.
//!
//! A state is identified by a scalar [`StateValue`]. Raw strings, integers,
//! enumerated constants and [`State`] objects are all normalized into that
//! one value type at every public boundary, so comparisons never depend on
//! which representation the caller happened to use.

use crate::error::{Result, WorkflowError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Free-form metadata attached to states and transitions.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Canonical scalar value backing a state.
///
/// Serialized untagged, so `"review"` and `3` round-trip as themselves.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Int(i64),
    Text(String),
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for StateValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for StateValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&StateValue> for StateValue {
    fn from(value: &StateValue) -> Self {
        value.clone()
    }
}

impl From<State> for StateValue {
    fn from(state: State) -> Self {
        state.value
    }
}

impl From<&State> for StateValue {
    fn from(state: &State) -> Self {
        state.value.clone()
    }
}

/// A single declared state of a blueprint.
///
/// Equality and hashing look at the value only; labels and metadata are
/// presentation details.
///
/// # Example
///
/// ```rust
/// use waymark::core::State;
///
/// let review = State::new("review").with_label("In Review");
///
/// assert_eq!(review.caption(), "In Review");
/// assert_eq!(review, State::new("review"));
/// assert_eq!(State::new(3).caption(), "3");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct State {
    value: StateValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: Metadata,
}

impl State {
    pub fn new(value: impl Into<StateValue>) -> Self {
        Self {
            value: value.into(),
            label: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn value(&self) -> &StateValue {
        &self.value
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Human readable name: the label when present, otherwise the value.
    pub fn caption(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.value.to_string())
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Check whether this state carries the given value.
    pub fn is(&self, value: impl Into<StateValue>) -> bool {
        self.value == value.into()
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl From<StateValue> for State {
    fn from(value: StateValue) -> Self {
        Self::new(value)
    }
}

impl From<&str> for State {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<i64> for State {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for State {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Ordered set of declared states. The first entry is the initial state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateCollection {
    states: Vec<State>,
}

impl StateCollection {
    pub fn new(states: Vec<State>) -> Self {
        Self { states }
    }

    /// Resolve exactly one state by value.
    ///
    /// Fails with `StateNotFound` when nothing matches and `AmbiguousState`
    /// when the blueprint declared the value more than once.
    ///
    /// # Example
    ///
    /// ```rust
    /// use waymark::core::{State, StateCollection};
    ///
    /// let states = StateCollection::new(vec![State::new("draft"), State::new("done")]);
    ///
    /// assert!(states.one("draft").is_ok());
    /// assert!(states.one("missing").is_err());
    /// ```
    pub fn one(&self, value: impl Into<StateValue>) -> Result<&State> {
        let value = value.into();
        let mut matches = self.states.iter().filter(|s| s.value == value);

        match (matches.next(), matches.count()) {
            (None, _) => Err(WorkflowError::StateNotFound { value }),
            (Some(state), 0) => Ok(state),
            (Some(_), rest) => Err(WorkflowError::AmbiguousState {
                value,
                count: rest + 1,
            }),
        }
    }

    /// First state with the given value, if any.
    pub fn find(&self, value: &StateValue) -> Option<&State> {
        self.states.iter().find(|s| &s.value == value)
    }

    pub fn contains(&self, value: &StateValue) -> bool {
        self.find(value).is_some()
    }

    /// The state a freshly initialized entity enters.
    pub fn initial(&self) -> Option<&State> {
        self.states.first()
    }

    /// Values declared more than once, each reported once, in declaration order.
    pub fn duplicates(&self) -> Vec<&StateValue> {
        let mut seen: BTreeMap<&StateValue, usize> = BTreeMap::new();
        let mut duplicates = Vec::new();

        for state in &self.states {
            let count = seen.entry(&state.value).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(&state.value);
            }
        }

        duplicates
    }

    pub fn values(&self) -> Vec<&StateValue> {
        self.states.iter().map(State::value).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, State> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl<'a> IntoIterator for &'a StateCollection {
    type Item = &'a State;
    type IntoIter = std::slice::Iter<'a, State>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

impl FromIterator<State> for StateCollection {
    fn from_iter<I: IntoIterator<Item = State>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
