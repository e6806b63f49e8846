//! Ready-made charge counting distinct contributors.

use super::Charge;
use crate::core::Context;
use std::sync::Arc;

/// Number of distinct contributions a transition needs.
///
/// # Example
///
/// ```rust
/// use waymark::charge::Threshold;
///
/// let quorum = Threshold::new(3);
/// assert_eq!(quorum.progress(0), 0.0);
/// assert_eq!(quorum.progress(3), 1.0);
/// assert_eq!(quorum.progress(5), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    required: usize,
}

impl Threshold {
    /// A threshold of zero is treated as one.
    pub fn new(required: usize) -> Self {
        Self {
            required: required.max(1),
        }
    }

    pub fn required(&self) -> usize {
        self.required
    }

    pub fn progress(&self, contributions: usize) -> f64 {
        (contributions as f64 / self.required as f64).min(1.0)
    }

    /// Build a [`Charge`] where each distinct actor contributes once.
    ///
    /// Contributor ids live on the entity: `read` and `write` give access to
    /// that list. Anonymous calls (no actor) may not contribute.
    pub fn distinct_actors<E, R, W>(self, read: R, write: W) -> Charge<E>
    where
        R: Fn(&E) -> &Vec<String> + Send + Sync + 'static,
        W: Fn(&mut E) -> &mut Vec<String> + Send + Sync + 'static,
    {
        let read = Arc::new(read);
        let permit_read = Arc::clone(&read);

        Charge::new(
            move |entity: &E| self.progress(read(entity).len()),
            move |entity: &E, ctx: &Context| match ctx.actor() {
                Some(actor) => !permit_read(entity).iter().any(|id| id == actor.id()),
                None => false,
            },
            move |entity: &mut E, ctx: &Context| {
                if let Some(actor) = ctx.actor() {
                    let contributors = write(entity);
                    if !contributors.iter().any(|id| id == actor.id()) {
                        contributors.push(actor.id().to_string());
                    }
                }
            },
        )
    }
}
