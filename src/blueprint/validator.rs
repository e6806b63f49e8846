//! Static consistency checks for blueprints.
//!
//! Validation is entity-independent: it only looks at declared states and
//! transition endpoints. Every problem on a row is reported, not just the
//! first one.

use super::Blueprint;
use crate::core::{StateCollection, StateValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

pub const DUPLICATE_STATE: &str = "Duplicate State";
pub const SOURCE_NOT_FOUND: &str = "Source Not Found";
pub const TARGET_NOT_FOUND: &str = "Target Not Found";
pub const DUPLICATE_TRANSITION: &str = "Duplicate Transition";

/// One declared state and what is wrong with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateReport {
    pub value: StateValue,
    pub caption: String,
    pub errors: Vec<String>,
}

/// One declared transition and what is wrong with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionReport {
    pub source: StateValue,
    pub target: StateValue,
    pub caption: String,
    pub errors: Vec<String>,
}

/// Outcome of validating one blueprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub blueprint: String,
    pub valid: bool,
    pub states: Vec<StateReport>,
    pub transitions: Vec<TransitionReport>,
}

impl ValidationReport {
    /// Every problem as `"<row>: <error>"`, states first.
    pub fn problems(&self) -> Vec<String> {
        let states = self.states.iter().flat_map(|row| {
            row.errors
                .iter()
                .map(move |error| format!("state '{}': {error}", row.value))
        });
        let transitions = self.transitions.iter().flat_map(|row| {
            row.errors
                .iter()
                .map(move |error| format!("transition '{}' -> '{}': {error}", row.source, row.target))
        });
        states.chain(transitions).collect()
    }
}

/// Checks a blueprint for dangling and duplicate declarations.
///
/// # Example
///
/// ```rust
/// use waymark::blueprint::BlueprintValidator;
/// use waymark::builder::{simple_transition, BlueprintBuilder};
///
/// struct Ticket;
///
/// let blueprint = BlueprintBuilder::<Ticket>::new("support")
///     .states(["open", "closed"])
///     .add_transition(simple_transition("open", "archived"))
///     .build()
///     .unwrap();
///
/// let report = BlueprintValidator::validate(&blueprint);
/// assert!(!report.valid);
/// assert_eq!(report.transitions[0].errors, vec!["Target Not Found"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BlueprintValidator;

impl BlueprintValidator {
    pub fn validate<E, B>(blueprint: &B) -> ValidationReport
    where
        B: Blueprint<E> + ?Sized,
    {
        let states = StateCollection::new(blueprint.states());
        let duplicated = states.duplicates();

        let state_rows: Vec<StateReport> = states
            .iter()
            .map(|state| {
                let mut errors = Vec::new();
                if duplicated.contains(&state.value()) {
                    errors.push(DUPLICATE_STATE.to_string());
                }
                StateReport {
                    value: state.value().clone(),
                    caption: state.caption(),
                    errors,
                }
            })
            .collect();

        let transitions = blueprint.transitions();
        let mut seen: HashMap<(&StateValue, &StateValue), usize> = HashMap::new();
        for transition in &transitions {
            *seen
                .entry((transition.source(), transition.target()))
                .or_insert(0) += 1;
        }

        let transition_rows: Vec<TransitionReport> = transitions
            .iter()
            .map(|transition| {
                let mut errors = Vec::new();
                if !states.contains(transition.source()) {
                    errors.push(SOURCE_NOT_FOUND.to_string());
                }
                if !states.contains(transition.target()) {
                    errors.push(TARGET_NOT_FOUND.to_string());
                }
                if seen
                    .get(&(transition.source(), transition.target()))
                    .is_some_and(|count| *count > 1)
                {
                    errors.push(DUPLICATE_TRANSITION.to_string());
                }
                TransitionReport {
                    source: transition.source().clone(),
                    target: transition.target().clone(),
                    caption: transition.caption(),
                    errors,
                }
            })
            .collect();

        for row in state_rows.iter().filter(|row| !row.errors.is_empty()) {
            warn!(
                blueprint = blueprint.id(),
                state = %row.value,
                errors = ?row.errors,
                "Invalid state declaration"
            );
        }
        for row in transition_rows.iter().filter(|row| !row.errors.is_empty()) {
            warn!(
                blueprint = blueprint.id(),
                from = %row.source,
                to = %row.target,
                errors = ?row.errors,
                "Invalid transition declaration"
            );
        }

        let valid = state_rows.iter().all(|row| row.errors.is_empty())
            && transition_rows.iter().all(|row| row.errors.is_empty());
        debug!(blueprint = blueprint.id(), valid, "Validated blueprint");

        ValidationReport {
            blueprint: blueprint.id().to_string(),
            valid,
            states: state_rows,
            transitions: transition_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{simple_transition, BlueprintBuilder};

    struct Doc;

    #[test]
    fn valid_blueprint_has_no_errors() {
        let blueprint = BlueprintBuilder::<Doc>::new("docs")
            .states(["draft", "final"])
            .add_transition(simple_transition("draft", "final"))
            .build()
            .unwrap();

        let report = BlueprintValidator::validate(&blueprint);
        assert!(report.valid);
        assert!(report.problems().is_empty());
        assert_eq!(report.states.len(), 2);
    }

    #[test]
    fn missing_endpoints_are_reported_independently() {
        let blueprint = BlueprintBuilder::<Doc>::new("docs")
            .states(["draft"])
            .add_transition(simple_transition("ghost", "phantom"))
            .add_transition(simple_transition("draft", "phantom"))
            .build()
            .unwrap();

        let report = BlueprintValidator::validate(&blueprint);
        assert!(!report.valid);
        assert_eq!(
            report.transitions[0].errors,
            vec![SOURCE_NOT_FOUND, TARGET_NOT_FOUND]
        );
        assert_eq!(report.transitions[1].errors, vec![TARGET_NOT_FOUND]);
    }

    #[test]
    fn duplicates_are_flagged_on_every_row() {
        let blueprint = BlueprintBuilder::<Doc>::new("docs")
            .states(["draft", "final", "draft"])
            .add_transition(simple_transition("draft", "final"))
            .add_transition(simple_transition("draft", "final"))
            .build()
            .unwrap();

        let report = BlueprintValidator::validate(&blueprint);
        assert!(!report.valid);
        assert_eq!(report.states[0].errors, vec![DUPLICATE_STATE]);
        assert!(report.states[1].errors.is_empty());
        assert_eq!(report.states[2].errors, vec![DUPLICATE_STATE]);
        assert!(report
            .transitions
            .iter()
            .all(|row| row.errors == vec![DUPLICATE_TRANSITION]));
        assert_eq!(report.problems().len(), 4);
    }
}
