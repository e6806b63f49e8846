//! Macros for ergonomic state declaration.

/// Declare an enum of workflow states backed by scalar values.
///
/// Each variant maps to the value stored on the entity, optionally with a
/// display label. Variants convert into [`StateValue`](crate::core::StateValue)
/// and [`State`](crate::core::State), so they can be passed anywhere the
/// engine accepts a state.
///
/// # Example
///
/// ```
/// use waymark::core::StateValue;
/// use waymark::workflow_states;
///
/// workflow_states! {
///     pub enum ArticleState {
///         New => "new",
///         Review => "review" as "In Review",
///         Published => "published",
///     }
/// }
///
/// assert_eq!(ArticleState::Review.value(), StateValue::from("review"));
/// assert_eq!(ArticleState::Review.state().caption(), "In Review");
/// assert_eq!(ArticleState::all().len(), 3);
/// ```
#[macro_export]
macro_rules! workflow_states {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $value:literal $(as $label:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Scalar stored on the entity for this state.
            pub fn value(self) -> $crate::core::StateValue {
                match self {
                    $(Self::$variant => $crate::core::StateValue::from($value)),*
                }
            }

            /// Declared state, including its label.
            pub fn state(self) -> $crate::core::State {
                match self {
                    $(Self::$variant => {
                        #[allow(unused_mut)]
                        let mut state = $crate::core::State::new($value);
                        $(state = state.with_label($label);)?
                        state
                    }),*
                }
            }

            /// Every declared state, in declaration order.
            pub fn all() -> ::std::vec::Vec<$crate::core::State> {
                ::std::vec![$(Self::$variant.state()),*]
            }
        }

        impl ::std::convert::From<$name> for $crate::core::StateValue {
            fn from(state: $name) -> Self {
                state.value()
            }
        }

        impl ::std::convert::From<$name> for $crate::core::State {
            fn from(state: $name) -> Self {
                state.state()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{State, StateValue};

    workflow_states! {
        enum Level {
            Low => 1,
            Mid => 2 as "Medium",
            High => 3,
        }
    }

    #[test]
    fn workflow_states_macro_generates_values() {
        assert_eq!(Level::Low.value(), StateValue::Int(1));
        assert_eq!(StateValue::from(Level::High), StateValue::Int(3));
        assert_eq!(Level::Mid.state().caption(), "Medium");
        assert_eq!(Level::Low.state().label(), None);
    }

    #[test]
    fn workflow_states_lists_all_in_order() {
        let all = Level::all();
        assert_eq!(all, vec![State::new(1), State::new(2), State::new(3)]);
    }

    #[test]
    fn workflow_states_supports_visibility() {
        workflow_states! {
            pub enum PublicState {
                A => "a",
                B => "b",
            }
        }

        let state: State = PublicState::B.into();
        assert!(state.is("b"));
    }
}
