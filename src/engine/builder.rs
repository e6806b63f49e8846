//! Builder for constructing engines.

use super::config::EngineConfig;
use super::machine::Engine;
use crate::audit::AuditSink;
use crate::blueprint::{Blueprint, BlueprintRegistry};
use crate::builder::BuildError;
use crate::checkpoint::{EngineSnapshot, EntityResolver};
use crate::core::PrincipalResolver;
use crate::entity::Entity;
use crate::error::{Result, WorkflowError};
use crate::transition::{AuthorizationProvider, DenyCapabilities};
use crate::validation::{PayloadValidator, RuleValidator};
use std::cell::OnceCell;
use std::sync::Arc;
use tracing::debug;

/// Builder binding a blueprint to an entity.
///
/// Unset collaborators default to [`DenyCapabilities`] for capability checks,
/// [`RuleValidator`] for payloads and no audit sink.
pub struct EngineBuilder<E: Entity> {
    blueprint: Arc<dyn Blueprint<E>>,
    entity: E,
    config: EngineConfig,
    authorizer: Option<Arc<dyn AuthorizationProvider<E>>>,
    validator: Option<Arc<dyn PayloadValidator>>,
    principal: Option<Arc<dyn PrincipalResolver>>,
    audit: Option<Arc<dyn AuditSink>>,
}

impl<E: Entity> EngineBuilder<E> {
    pub fn new(blueprint: Arc<dyn Blueprint<E>>, entity: E) -> Self {
        Self {
            blueprint,
            entity,
            config: EngineConfig::default(),
            authorizer: None,
            validator: None,
            principal: None,
            audit: None,
        }
    }

    /// Re-attach an engine from a snapshot.
    ///
    /// The blueprint is looked up by id and the entity is loaded through
    /// `resolver`. Collaborators are not part of a snapshot; set them on the
    /// returned builder before building.
    pub fn restore<R>(
        snapshot: &EngineSnapshot,
        registry: &BlueprintRegistry<E>,
        resolver: &R,
    ) -> Result<Self>
    where
        R: EntityResolver<E> + ?Sized,
    {
        snapshot.validate()?;

        let blueprint = registry
            .get(&snapshot.blueprint)
            .ok_or_else(|| WorkflowError::UnknownBlueprint(snapshot.blueprint.clone()))?;
        let entity = resolver
            .find(&snapshot.entity)
            .ok_or_else(|| WorkflowError::EntityNotFound(snapshot.entity.clone()))?;

        debug!(
            blueprint = %snapshot.blueprint,
            entity = %snapshot.entity,
            snapshot = %snapshot.id,
            "Restoring engine"
        );
        Ok(Self::new(blueprint, entity).attribute(snapshot.attribute.as_str()))
    }

    /// Name of the workflow attribute (default `"status"`).
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.config.attribute = name.into();
        self
    }

    /// Replace the whole configuration, attribute name included.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn authorizer<A>(mut self, authorizer: A) -> Self
    where
        A: AuthorizationProvider<E> + 'static,
    {
        self.authorizer = Some(Arc::new(authorizer));
        self
    }

    pub fn validator<V>(mut self, validator: V) -> Self
    where
        V: PayloadValidator + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn principal<P>(mut self, resolver: P) -> Self
    where
        P: PrincipalResolver + 'static,
    {
        self.principal = Some(Arc::new(resolver));
        self
    }

    pub fn audit(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Build the engine.
    pub fn build(self) -> std::result::Result<Engine<E>, BuildError> {
        if self.config.attribute.trim().is_empty() {
            return Err(BuildError::MissingAttribute);
        }

        let written = self.entity.attribute(&self.config.attribute);

        Ok(Engine {
            blueprint: self.blueprint,
            entity: self.entity,
            config: self.config,
            authorizer: self
                .authorizer
                .unwrap_or_else(|| Arc::new(DenyCapabilities)),
            validator: self.validator.unwrap_or_else(|| Arc::new(RuleValidator)),
            principal: self.principal,
            audit: self.audit,
            acting: None,
            states: OnceCell::new(),
            transitions: OnceCell::new(),
            pending: Vec::new(),
            written,
        })
    }
}
