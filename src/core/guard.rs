//! Guards that veto transitions.
//!
//! A guard inspects the entity and the prospective [`Context`] and answers
//! with a [`GuardOutcome`]. Guards never throw: the severity of a block is a
//! value the caller pattern-matches on.

use super::context::Context;
use std::fmt;
use std::sync::Arc;

/// Result of evaluating a guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Nothing blocks the transition.
    Open,
    /// Blocked for now; the reason tells the user what to fix.
    Recoverable(String),
    /// Blocked permanently; the transition is hidden from listings.
    Fatal(String),
}

impl GuardOutcome {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// The blocking reason, if any.
    pub fn problem(&self) -> Option<&str> {
        match self {
            Self::Open => None,
            Self::Recoverable(reason) | Self::Fatal(reason) => Some(reason),
        }
    }
}

/// Predicate deciding whether a transition may proceed.
///
/// # Example
///
/// ```rust
/// use waymark::core::{Context, Guard, GuardOutcome, Payload, State};
///
/// struct Article {
///     body: String,
/// }
///
/// let needs_content = Guard::recoverable_unless(
///     |article: &Article, _ctx: &Context| !article.body.is_empty(),
///     "needs content",
/// );
///
/// let ctx = Context::new(Some(State::new("new")), State::new("review"), None, Payload::new());
///
/// assert_eq!(
///     needs_content.check(&Article { body: String::new() }, &ctx),
///     GuardOutcome::Recoverable("needs content".to_string())
/// );
/// assert!(needs_content.check(&Article { body: "text".into() }, &ctx).is_open());
/// ```
pub struct Guard<E> {
    check: Arc<dyn Fn(&E, &Context) -> GuardOutcome + Send + Sync>,
}

impl<E> Guard<E> {
    /// Create a guard from a function returning the full outcome.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&E, &Context) -> GuardOutcome + Send + Sync + 'static,
    {
        Guard {
            check: Arc::new(check),
        }
    }

    /// Block recoverably with `reason` whenever the predicate is false.
    pub fn recoverable_unless<F>(predicate: F, reason: impl Into<String>) -> Self
    where
        F: Fn(&E, &Context) -> bool + Send + Sync + 'static,
    {
        let reason = reason.into();
        Self::new(move |entity, ctx| {
            if predicate(entity, ctx) {
                GuardOutcome::Open
            } else {
                GuardOutcome::Recoverable(reason.clone())
            }
        })
    }

    /// Block fatally with `reason` whenever the predicate is false.
    pub fn fatal_unless<F>(predicate: F, reason: impl Into<String>) -> Self
    where
        F: Fn(&E, &Context) -> bool + Send + Sync + 'static,
    {
        let reason = reason.into();
        Self::new(move |entity, ctx| {
            if predicate(entity, ctx) {
                GuardOutcome::Open
            } else {
                GuardOutcome::Fatal(reason.clone())
            }
        })
    }

    pub fn check(&self, entity: &E, ctx: &Context) -> GuardOutcome {
        (self.check)(entity, ctx)
    }
}

impl<E> Clone for Guard<E> {
    fn clone(&self) -> Self {
        Self {
            check: Arc::clone(&self.check),
        }
    }
}

impl<E> fmt::Debug for Guard<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

/// Run guards in order and stop at the first one that blocks.
pub fn evaluate<E>(guards: &[Guard<E>], entity: &E, ctx: &Context) -> GuardOutcome {
    for guard in guards {
        let outcome = guard.check(entity, ctx);
        if !outcome.is_open() {
            return outcome;
        }
    }
    GuardOutcome::Open
}
