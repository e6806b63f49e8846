//! Build errors for blueprint, transition and engine builders.

use thiserror::Error;

/// Errors that can occur when building blueprints, transitions and engines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Blueprint id not specified. Pass a non-empty id to BlueprintBuilder::new")]
    MissingBlueprintId,

    #[error("No states declared. Add at least one state; the first one is initial")]
    NoStates,

    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Workflow attribute name is empty")]
    MissingAttribute,
}
