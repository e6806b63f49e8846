//! Builder for constructing blueprints.

use crate::blueprint::DeclaredBlueprint;
use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{PrincipalResolver, State};
use crate::transition::Transition;
use std::sync::Arc;

/// Builder for constructing blueprints with a fluent API.
///
/// # Example
///
/// ```rust
/// use waymark::blueprint::Blueprint;
/// use waymark::builder::{BlueprintBuilder, TransitionBuilder};
///
/// struct Ticket;
///
/// let blueprint = BlueprintBuilder::<Ticket>::new("support")
///     .states(["open", "waiting", "closed"])
///     .transition(TransitionBuilder::new().from("open").to("waiting"))
///     .unwrap()
///     .transition(TransitionBuilder::new().from("waiting").to("closed"))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(blueprint.states()[0].value().to_string(), "open");
/// assert_eq!(blueprint.transitions().len(), 2);
/// ```
pub struct BlueprintBuilder<E> {
    id: String,
    states: Vec<State>,
    transitions: Vec<Transition<E>>,
    principal: Option<Arc<dyn PrincipalResolver>>,
}

impl<E> BlueprintBuilder<E> {
    /// Create a new builder for the blueprint `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            states: Vec::new(),
            transitions: Vec::new(),
            principal: None,
        }
    }

    /// Declare one state. The first declared state is the initial one.
    pub fn state(mut self, state: impl Into<State>) -> Self {
        self.states.push(state.into());
        self
    }

    /// Declare several states in order.
    pub fn states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<E>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<E>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Resolver for the acting principal when the engine has none.
    pub fn principal<R>(mut self, resolver: R) -> Self
    where
        R: PrincipalResolver + 'static,
    {
        self.principal = Some(Arc::new(resolver));
        self
    }

    /// Build the blueprint.
    ///
    /// Only the shape required to run is checked here. Dangling or duplicate
    /// declarations are reported by
    /// [`BlueprintValidator`](crate::blueprint::BlueprintValidator).
    pub fn build(self) -> Result<DeclaredBlueprint<E>, BuildError> {
        if self.id.trim().is_empty() {
            return Err(BuildError::MissingBlueprintId);
        }

        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        Ok(DeclaredBlueprint {
            id: self.id,
            states: self.states,
            transitions: self.transitions,
            principal: self.principal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::Blueprint;
    use crate::builder::simple_transition;
    use crate::core::StateValue;

    struct Parcel;

    #[test]
    fn builder_validates_required_fields() {
        let result = BlueprintBuilder::<Parcel>::new("  ").state("packed").build();
        assert!(matches!(result, Err(BuildError::MissingBlueprintId)));

        let result = BlueprintBuilder::<Parcel>::new("shipping").build();
        assert!(matches!(result, Err(BuildError::NoStates)));
    }

    #[test]
    fn transition_errors_propagate() {
        let result =
            BlueprintBuilder::<Parcel>::new("shipping").transition(TransitionBuilder::new().from("packed"));

        assert!(matches!(result, Err(BuildError::MissingToState)));
    }

    #[test]
    fn add_multiple_transitions() {
        let blueprint = BlueprintBuilder::<Parcel>::new("shipping")
            .states(["packed", "shipped", "delivered"])
            .transitions(vec![
                simple_transition("packed", "shipped"),
                simple_transition("shipped", "delivered"),
            ])
            .build()
            .unwrap();

        let sources: Vec<&StateValue> = blueprint.transitions.iter().map(|t| t.source()).collect();
        assert_eq!(
            sources,
            vec![&StateValue::from("packed"), &StateValue::from("shipped")]
        );
    }

    #[test]
    fn mixed_state_declarations() {
        let blueprint = BlueprintBuilder::<Parcel>::new("levels")
            .state(1)
            .state(State::new(2).with_label("Second"))
            .build()
            .unwrap();

        let states = blueprint.states();
        assert_eq!(states[0].value(), &StateValue::Int(1));
        assert_eq!(states[1].caption(), "Second");
    }
}
