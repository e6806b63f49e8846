//! Builder API for ergonomic blueprint construction.
//!
//! This module provides fluent builders and macros for declaring workflows
//! with minimal boilerplate.

pub mod blueprint;
pub mod error;
pub mod macros;
pub mod transition;

pub use blueprint::BlueprintBuilder;
pub use error::BuildError;
pub use transition::TransitionBuilder;

use crate::core::{Guard, StateValue};
use crate::transition::Transition;

/// Create an unconditional transition.
///
/// # Example
///
/// ```
/// use waymark::builder::simple_transition;
/// use waymark::transition::Transition;
///
/// struct Ticket;
///
/// let transition: Transition<Ticket> = simple_transition("open", "closed");
/// assert_eq!(transition.caption(), "closed");
/// ```
pub fn simple_transition<E>(
    from: impl Into<StateValue>,
    to: impl Into<StateValue>,
) -> Transition<E> {
    Transition::between(from.into(), to.into())
}

/// Create a transition with a single guard.
///
/// # Example
///
/// ```
/// use waymark::builder::guarded_transition;
/// use waymark::core::{Context, Guard, Payload, State};
///
/// struct Ticket {
///     resolved: bool,
/// }
///
/// let transition = guarded_transition(
///     "open",
///     "closed",
///     Guard::fatal_unless(|t: &Ticket, _| t.resolved, "Ticket is unresolved"),
/// );
///
/// let ctx = Context::new(Some(State::new("open")), State::new("closed"), None, Payload::new());
/// let ticket = Ticket { resolved: false };
/// assert!(transition.outcome(&ticket, &ctx).is_fatal());
/// ```
pub fn guarded_transition<E>(
    from: impl Into<StateValue>,
    to: impl Into<StateValue>,
    guard: Guard<E>,
) -> Transition<E> {
    let mut transition = simple_transition(from, to);
    transition.guards.push(guard);
    transition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Context, GuardOutcome, Payload, State};

    struct Lamp {
        plugged: bool,
    }

    fn ctx() -> Context {
        Context::new(Some(State::new("off")), State::new("on"), None, Payload::new())
    }

    #[test]
    fn simple_transition_builds() {
        let transition = simple_transition::<Lamp>("off", "on");

        assert_eq!(transition.source(), &StateValue::from("off"));
        assert_eq!(transition.target(), &StateValue::from("on"));
        assert!(transition.guards().is_empty());
        assert!(transition.outcome(&Lamp { plugged: false }, &ctx()).is_open());
    }

    #[test]
    fn guarded_transition_respects_guard() {
        let transition = guarded_transition(
            "off",
            "on",
            Guard::recoverable_unless(|lamp: &Lamp, _| lamp.plugged, "Plug it in"),
        );

        assert!(transition.outcome(&Lamp { plugged: true }, &ctx()).is_open());
        assert_eq!(
            transition.outcome(&Lamp { plugged: false }, &ctx()),
            GuardOutcome::Recoverable("Plug it in".into())
        );
    }
}
