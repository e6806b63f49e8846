//! Progressive transitions that commit once enough contributions arrive.
//!
//! A [`Charge`] keeps its accumulation state on the entity itself. It is made
//! of three independent callbacks:
//!
//! - `charging` computes the current progress in `[0, 1]`
//! - `may_charge` decides whether the current actor may still contribute
//! - `charge` applies one contribution
//!
//! Applying a contribution and noticing completion are separate steps, so a
//! contribution (for example a recorded vote) survives even when the
//! threshold is not reached yet. The caller still has to persist the entity
//! to keep it.

mod threshold;

pub use threshold::Threshold;

use crate::core::Context;
use std::fmt;
use std::sync::Arc;

type Progress<E> = Arc<dyn Fn(&E) -> f64 + Send + Sync>;
type Permit<E> = Arc<dyn Fn(&E, &Context) -> bool + Send + Sync>;
type Contribution<E> = Arc<dyn Fn(&mut E, &Context) + Send + Sync>;

/// Result of one contribution attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum ChargeOutcome {
    /// The actor may not contribute (again); nothing changed.
    Declined,
    /// Contribution applied, threshold not reached.
    Charging(f64),
    /// Contribution applied and the threshold is reached.
    Charged,
}

/// Accumulator attached to a transition.
pub struct Charge<E> {
    charging: Progress<E>,
    may_charge: Permit<E>,
    charge: Contribution<E>,
}

impl<E> Charge<E> {
    pub fn new<P, M, C>(charging: P, may_charge: M, charge: C) -> Self
    where
        P: Fn(&E) -> f64 + Send + Sync + 'static,
        M: Fn(&E, &Context) -> bool + Send + Sync + 'static,
        C: Fn(&mut E, &Context) + Send + Sync + 'static,
    {
        Self {
            charging: Arc::new(charging),
            may_charge: Arc::new(may_charge),
            charge: Arc::new(charge),
        }
    }

    /// Current progress, clamped to `[0, 1]`. NaN counts as no progress.
    pub fn progress(&self, entity: &E) -> f64 {
        let progress = (self.charging)(entity);
        if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        }
    }

    pub fn charged(&self, entity: &E) -> bool {
        self.progress(entity) >= 1.0
    }

    pub fn may_charge(&self, entity: &E, ctx: &Context) -> bool {
        (self.may_charge)(entity, ctx)
    }

    /// Apply one contribution without checking permission or progress.
    pub fn charge(&self, entity: &mut E, ctx: &Context) {
        (self.charge)(entity, ctx)
    }

    /// Check permission, apply the contribution and report progress.
    ///
    /// # Example
    ///
    /// ```rust
    /// use waymark::charge::{Charge, ChargeOutcome};
    /// use waymark::core::{Context, Payload, State};
    ///
    /// struct Poll {
    ///     votes: u32,
    /// }
    ///
    /// let charge = Charge::new(
    ///     |p: &Poll| f64::from(p.votes) / 2.0,
    ///     |_: &Poll, _: &Context| true,
    ///     |p: &mut Poll, _: &Context| p.votes += 1,
    /// );
    ///
    /// let ctx = Context::new(Some(State::new("open")), State::new("closed"), None, Payload::new());
    /// let mut poll = Poll { votes: 0 };
    ///
    /// assert_eq!(charge.contribute(&mut poll, &ctx), ChargeOutcome::Charging(0.5));
    /// assert_eq!(charge.contribute(&mut poll, &ctx), ChargeOutcome::Charged);
    /// ```
    pub fn contribute(&self, entity: &mut E, ctx: &Context) -> ChargeOutcome {
        if !self.may_charge(entity, ctx) {
            return ChargeOutcome::Declined;
        }

        self.charge(entity, ctx);

        if self.charged(entity) {
            ChargeOutcome::Charged
        } else {
            ChargeOutcome::Charging(self.progress(entity))
        }
    }
}

impl<E> Clone for Charge<E> {
    fn clone(&self) -> Self {
        Self {
            charging: Arc::clone(&self.charging),
            may_charge: Arc::clone(&self.may_charge),
            charge: Arc::clone(&self.charge),
        }
    }
}

impl<E> fmt::Debug for Charge<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Charge").finish_non_exhaustive()
    }
}
