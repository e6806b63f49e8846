//! Serializable presentation of the current state.

use crate::core::{Metadata, StateValue};
use serde::{Deserialize, Serialize};

/// Current state with the transitions a client may offer from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    pub value: StateValue,
    pub caption: String,
    pub additional: Metadata,
    pub transitions: Vec<TransitionView>,
}

/// One transition leaving the current state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionView {
    pub source: StateValue,
    pub target: StateValue,
    pub caption: String,
    /// Reason a recoverable guard currently blocks the transition
    pub has_problem: Option<String>,
    pub required_fields: Vec<String>,
    pub additional: Metadata,
}
