//! Engine binding one blueprint to one attribute of one entity.

use super::config::{ChargeDeniedPolicy, EngineConfig};
use super::view::{StateView, TransitionView};
use crate::audit::{AuditRecord, AuditSink};
use crate::blueprint::Blueprint;
use crate::charge::ChargeOutcome;
use crate::checkpoint::EngineSnapshot;
use crate::core::{Actor, Context, GuardOutcome, Payload, PrincipalResolver, State, StateCollection, StateValue};
use crate::entity::Entity;
use crate::error::{Result, WorkflowError};
use crate::transition::{AuthorizationProvider, Scope, Transition, TransitionCollection};
use crate::validation::PayloadValidator;
use std::cell::OnceCell;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a successful `transit` call
#[derive(Clone, Debug, PartialEq)]
pub enum TransitOutcome {
    /// The attribute now holds the target
    Committed(Context),

    /// Contribution recorded, threshold not reached; attribute unchanged
    Charging { progress: f64 },

    /// The actor may not contribute; nothing changed
    Declined,
}

impl TransitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    pub fn context(&self) -> Option<&Context> {
        match self {
            Self::Committed(ctx) => Some(ctx),
            _ => None,
        }
    }
}

/// Runtime driver for one (blueprint, entity, attribute) binding.
///
/// The engine never persists the entity. It reads and writes the workflow
/// attribute, queues the context of every change until
/// [`persisted`](Engine::persisted) is called, and reports dirtiness.
///
/// Blueprint states and transitions are read once and cached for the
/// lifetime of the engine.
pub struct Engine<E: Entity> {
    pub(super) blueprint: Arc<dyn Blueprint<E>>,
    pub(super) entity: E,
    pub(super) config: EngineConfig,
    pub(super) authorizer: Arc<dyn AuthorizationProvider<E>>,
    pub(super) validator: Arc<dyn PayloadValidator>,
    pub(super) principal: Option<Arc<dyn PrincipalResolver>>,
    pub(super) audit: Option<Arc<dyn AuditSink>>,
    pub(super) acting: Option<Actor>,
    pub(super) states: OnceCell<StateCollection>,
    pub(super) transitions: OnceCell<Arc<[Transition<E>]>>,
    /// Changes made since the last `persisted` call, oldest first
    pub(super) pending: Vec<Context>,
    /// Attribute value as last written by this engine or seen at bind time
    pub(super) written: Option<StateValue>,
}

impl<E: Entity> Engine<E> {
    pub fn blueprint(&self) -> &dyn Blueprint<E> {
        self.blueprint.as_ref()
    }

    pub fn attribute(&self) -> &str {
        &self.config.attribute
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    /// Mutable access for changes unrelated to the workflow attribute.
    ///
    /// Writing the workflow attribute through this handle makes the next
    /// `init` or `transit` fail with `ConsistencyViolation`.
    pub fn entity_mut(&mut self) -> &mut E {
        &mut self.entity
    }

    pub fn into_entity(self) -> E {
        self.entity
    }

    /// Override the principal resolvers for subsequent calls.
    pub fn act_as(&mut self, actor: Option<Actor>) -> &mut Self {
        self.acting = actor;
        self
    }

    /// Acting principal: explicit override, then the engine resolver, then
    /// the blueprint's.
    pub fn actor(&self) -> Option<Actor> {
        self.acting
            .clone()
            .or_else(|| self.principal.as_ref().and_then(|p| p.current()))
            .or_else(|| self.blueprint.principal())
    }

    /// Declared states, read from the blueprint on first use.
    pub fn states(&self) -> &StateCollection {
        self.states
            .get_or_init(|| StateCollection::new(self.blueprint.states()))
    }

    fn declared(&self) -> &Arc<[Transition<E>]> {
        self.transitions
            .get_or_init(|| Arc::from(self.blueprint.transitions()))
    }

    fn current(&self) -> Option<StateValue> {
        self.entity.attribute(&self.config.attribute)
    }

    fn scope(&self) -> Scope<'_, E> {
        Scope::new(&self.entity, self.states())
            .with_actor(self.actor())
            .with_authorizer(self.authorizer.as_ref())
    }

    /// Current state, `None` before initialization.
    ///
    /// Fails when the attribute holds a value the blueprint does not declare
    /// exactly once.
    pub fn state(&self) -> Result<Option<&State>> {
        match self.current() {
            None => Ok(None),
            Some(value) => self.states().one(value).map(Some),
        }
    }

    pub fn is(&self, state: impl Into<StateValue>) -> bool {
        self.current() == Some(state.into())
    }

    pub fn is_not(&self, state: impl Into<StateValue>) -> bool {
        !self.is(state)
    }

    /// Every declared transition, unfiltered.
    pub fn all_transitions(&self) -> TransitionCollection<'_, E> {
        TransitionCollection::new(self.scope(), self.declared().iter())
    }

    /// Transitions leaving the current state; empty before initialization.
    pub fn transitions(&self) -> TransitionCollection<'_, E> {
        match self.current() {
            Some(current) => self.all_transitions().from(current),
            None => TransitionCollection::new(self.scope(), std::iter::empty()),
        }
    }

    /// The declared transition from the current state to `target`.
    ///
    /// `None` means there is no route at all, which differs from a route
    /// that guards currently block.
    pub fn transition_to(&self, target: impl Into<StateValue>) -> Result<Option<&Transition<E>>> {
        let Some(current) = self.current() else {
            return Ok(None);
        };

        match self.transitions().sole(current, target) {
            Ok(transition) => Ok(Some(transition)),
            Err(WorkflowError::TransitionNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn require(&self, target: &StateValue) -> Result<&Transition<E>> {
        let Some(current) = self.current() else {
            return Err(WorkflowError::NotInitialized {
                attribute: self.config.attribute.clone(),
            });
        };

        self.transition_to(target)?
            .ok_or_else(|| WorkflowError::TransitionNotFound {
                from: Some(current),
                target: target.clone(),
            })
    }

    /// Fail when the attribute was changed behind the engine's back.
    pub fn ensure_consistent(&self) -> Result<()> {
        let found = self.current();
        if found == self.written {
            return Ok(());
        }

        warn!(
            blueprint = self.blueprint.id(),
            entity = %self.entity.entity_id(),
            attribute = %self.config.attribute,
            expected = ?self.written,
            found = ?found,
            "Workflow attribute changed outside a transition"
        );
        Err(WorkflowError::ConsistencyViolation {
            attribute: self.config.attribute.clone(),
            expected: self.written.clone(),
            found,
        })
    }

    /// Enter the blueprint's initial state.
    pub fn init(&mut self, data: Payload) -> Result<Context> {
        self.initialize(None, data)
    }

    /// Enter `state` instead of the blueprint's initial state.
    pub fn init_as(&mut self, state: impl Into<StateValue>, data: Payload) -> Result<Context> {
        self.initialize(Some(state.into()), data)
    }

    fn initialize(&mut self, state: Option<StateValue>, data: Payload) -> Result<Context> {
        self.ensure_consistent()?;

        if let Some(current) = self.current() {
            return Err(WorkflowError::AlreadyInitialized {
                attribute: self.config.attribute.clone(),
                current,
            });
        }

        let states = self.states();
        let state = match state {
            Some(value) => states.one(value)?.clone(),
            None => states
                .initial()
                .cloned()
                .ok_or_else(|| WorkflowError::NoInitialState {
                    blueprint: self.blueprint.id().to_string(),
                })?,
        };

        let ctx = Context::initial(state.clone(), self.actor(), data);
        self.commit(state.value().clone(), &ctx);

        info!(
            blueprint = self.blueprint.id(),
            entity = %self.entity.entity_id(),
            to = %state.value(),
            "Initialized workflow"
        );
        Ok(ctx)
    }

    fn commit(&mut self, value: StateValue, ctx: &Context) {
        self.entity.set_attribute(&self.config.attribute, value.clone());
        self.written = Some(value);
        self.pending.push(ctx.clone());
    }

    /// Move to `target`.
    ///
    /// Payload rules are always checked. Guards and authorization are only
    /// re-evaluated when [`EngineConfig::enforce_guards`] is set; otherwise
    /// callers are expected to have filtered with
    /// [`transitions`](Engine::transitions) and [`authorize`](Engine::authorize).
    ///
    /// Progressive transitions commit only once their charge is complete.
    /// Post-commit callback failures surface as `PostCommit` errors and leave
    /// the attribute committed.
    pub fn transit(&mut self, target: impl Into<StateValue>, data: Payload) -> Result<TransitOutcome> {
        let target = target.into();
        self.ensure_consistent()?;

        let transition = self.require(&target)?.clone();
        let ctx = self.scope().context(&transition, data);
        debug!(
            blueprint = self.blueprint.id(),
            entity = %self.entity.entity_id(),
            from = %transition.source(),
            to = %target,
            "Resolved transition"
        );

        if self.config.enforce_guards {
            self.screen(&transition, &ctx)?;
        }

        // Declined contributors are turned away before their payload is judged.
        if let Some(charge) = transition.charge() {
            if !charge.may_charge(&self.entity, &ctx) {
                return self.decline(target, &ctx);
            }
        }
        self.validate(&transition, ctx.data())?;

        if let Some(charge) = transition.charge() {
            match charge.contribute(&mut self.entity, &ctx) {
                ChargeOutcome::Declined => return self.decline(target, &ctx),
                ChargeOutcome::Charging(progress) => {
                    info!(
                        blueprint = self.blueprint.id(),
                        entity = %self.entity.entity_id(),
                        to = %target,
                        progress,
                        "Charge contribution recorded"
                    );
                    return Ok(TransitOutcome::Charging { progress });
                }
                ChargeOutcome::Charged => {}
            }
        }

        self.commit(target.clone(), &ctx);
        info!(
            blueprint = self.blueprint.id(),
            entity = %self.entity.entity_id(),
            from = %transition.source(),
            to = %target,
            "Committed transition"
        );

        transition
            .run_callbacks(&mut self.entity, ctx.data())
            .map_err(|error| {
                warn!(
                    blueprint = self.blueprint.id(),
                    to = %target,
                    error = %error,
                    "Post-commit callback failed"
                );
                WorkflowError::PostCommit {
                    target: target.clone(),
                    error,
                }
            })?;

        Ok(TransitOutcome::Committed(ctx))
    }

    fn decline(&self, target: StateValue, ctx: &Context) -> Result<TransitOutcome> {
        warn!(
            blueprint = self.blueprint.id(),
            entity = %self.entity.entity_id(),
            to = %target,
            actor = ?ctx.actor().map(Actor::id),
            "Charge contribution declined"
        );
        match self.config.charge_denied {
            ChargeDeniedPolicy::Silent => Ok(TransitOutcome::Declined),
            ChargeDeniedPolicy::Reject => Err(WorkflowError::AlreadyCharged { target }),
        }
    }

    /// Fail with `AuthorizationDenied` unless the route to `target` may be
    /// taken by the acting principal.
    pub fn authorize(&self, target: impl Into<StateValue>) -> Result<()> {
        let target = target.into();
        let transition = self.require(&target)?;
        let ctx = self.scope().context(transition, Payload::new());

        if transition.is_authorized(&self.entity, &ctx, self.authorizer.as_ref()) {
            Ok(())
        } else {
            Err(WorkflowError::AuthorizationDenied { target })
        }
    }

    /// Run every check a forced transition to `target` would face: guards,
    /// authorization and payload rules.
    pub fn verify(&self, target: impl Into<StateValue>, data: &Payload) -> Result<()> {
        let target = target.into();
        let transition = self.require(&target)?;
        let ctx = self.scope().context(transition, data.clone());

        self.screen(transition, &ctx)?;
        self.validate(transition, ctx.data())
    }

    fn screen(&self, transition: &Transition<E>, ctx: &Context) -> Result<()> {
        match transition.outcome(&self.entity, ctx) {
            GuardOutcome::Open => {}
            GuardOutcome::Recoverable(reason) => {
                debug!(to = %transition.target(), reason = %reason, "Guard blocked transition");
                return Err(WorkflowError::RecoverableGuard {
                    target: transition.target().clone(),
                    reason,
                });
            }
            GuardOutcome::Fatal(reason) => {
                debug!(to = %transition.target(), reason = %reason, "Guard forbade transition");
                return Err(WorkflowError::FatalGuard {
                    target: transition.target().clone(),
                    reason,
                });
            }
        }

        if !transition.is_authorized(&self.entity, ctx, self.authorizer.as_ref()) {
            return Err(WorkflowError::AuthorizationDenied {
                target: transition.target().clone(),
            });
        }
        Ok(())
    }

    fn validate(&self, transition: &Transition<E>, data: &Payload) -> Result<()> {
        if transition.rules().is_empty() {
            return Ok(());
        }
        self.validator.validate(transition.rules(), data)?;
        Ok(())
    }

    /// Whether the workflow attribute needs saving.
    pub fn is_dirty(&self) -> bool {
        self.entity.is_dirty(&self.config.attribute)
    }

    /// Context of the most recent init or transit not yet persisted.
    pub fn pending_context(&self) -> Option<&Context> {
        self.pending.last()
    }

    /// Every change not yet persisted, oldest first.
    pub fn pending_contexts(&self) -> &[Context] {
        &self.pending
    }

    /// Signal that the entity was saved.
    ///
    /// Hands each pending change to the audit sink as an [`AuditRecord`], in
    /// the order the changes were made, and returns the records. Returns an
    /// empty vector when nothing was pending.
    pub fn persisted(&mut self) -> Vec<AuditRecord> {
        let subject = self.entity.entity_id();
        let records: Vec<AuditRecord> = std::mem::take(&mut self.pending)
            .into_iter()
            .map(|ctx| {
                AuditRecord::new(
                    self.blueprint.id(),
                    self.config.attribute.as_str(),
                    subject.as_str(),
                    ctx,
                )
            })
            .collect();

        if let Some(sink) = &self.audit {
            for record in &records {
                sink.record(record.clone());
            }
        }
        records
    }

    /// Serializable view of the current state and the transitions a client
    /// may offer: fatally blocked and unauthorized routes are left out.
    pub fn describe(&self) -> Result<Option<StateView>> {
        let Some(state) = self.state()? else {
            return Ok(None);
        };

        let available = self.transitions().without_forbidden().authorized();
        let transitions = available
            .iter()
            .map(|t| TransitionView {
                source: t.source().clone(),
                target: t.target().clone(),
                caption: t.caption(),
                has_problem: available.problem(t),
                required_fields: t.required_fields(),
                additional: t.metadata().clone(),
            })
            .collect();

        Ok(Some(StateView {
            value: state.value().clone(),
            caption: self.blueprint.state_caption(state, &self.entity),
            additional: state.metadata().clone(),
            transitions,
        }))
    }

    /// Durable binding of this engine: blueprint id, attribute and entity id.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::new(
            self.blueprint.id(),
            self.config.attribute.as_str(),
            self.entity.entity_id(),
        )
    }
}
