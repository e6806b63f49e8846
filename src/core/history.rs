//! Audit records and the ordered history built from them.
//!
//! Records are immutable values; [`History::record`] returns a new history
//! rather than mutating the existing one.

use super::actor::Actor;
use super::context::{Context, Payload};
use super::state::{State, StateValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// One committed initialization or transition, as handed to an audit sink.
///
/// # Example
///
/// ```rust
/// use waymark::core::{AuditRecord, Context, Payload, State};
///
/// let ctx = Context::initial(State::new("new"), None, Payload::new());
/// let record = AuditRecord::new("article", "status", "42", ctx.clone());
///
/// assert_eq!(record.subject, "42");
/// assert_eq!(record.context(), ctx);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    /// Identity of the blueprint that governed the change
    pub blueprint: String,
    /// Name of the workflow attribute on the entity
    pub attribute: String,
    /// Identity of the entity that changed
    pub subject: String,
    pub performer: Option<Actor>,
    /// `None` when the record describes initialization
    pub source: Option<State>,
    pub target: State,
    #[serde(default)]
    pub payload: Payload,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(
        blueprint: impl Into<String>,
        attribute: impl Into<String>,
        subject: impl Into<String>,
        context: Context,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            blueprint: blueprint.into(),
            attribute: attribute.into(),
            subject: subject.into(),
            performer: context.actor().cloned(),
            source: context.source().cloned(),
            target: context.target().clone(),
            payload: context.data().clone(),
            created_at: Utc::now(),
        }
    }

    /// Rebuild the transition context this record was created from.
    pub fn context(&self) -> Context {
        Context::new(
            self.source.clone(),
            self.target.clone(),
            self.performer.clone(),
            self.payload.clone(),
        )
    }
}

/// Ordered history of audit records for one or more entities.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct History {
    records: Vec<AuditRecord>,
}

impl History {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record an entry, returning a new history.
    pub fn record(&self, record: AuditRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// Append in place, for owners that already hold the history exclusively.
    pub(crate) fn push(&mut self, record: AuditRecord) {
        self.records.push(record);
    }

    /// Records concerning a single entity, in order.
    pub fn for_subject(&self, subject: &str) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| r.subject == subject)
                .cloned()
                .collect(),
        }
    }

    /// Path of state values traversed.
    ///
    /// Starts with the first record's source when there is one (an
    /// initialization record has none), then each record's target.
    ///
    /// ```rust
    /// use waymark::core::{AuditRecord, Context, History, Payload, State, StateValue};
    ///
    /// let history = History::new()
    ///     .record(AuditRecord::new("bp", "status", "1",
    ///         Context::initial(State::new("new"), None, Payload::new())))
    ///     .record(AuditRecord::new("bp", "status", "1",
    ///         Context::new(Some(State::new("new")), State::new("review"), None, Payload::new())));
    ///
    /// assert_eq!(history.path(), vec![&StateValue::from("new"), &StateValue::from("review")]);
    /// ```
    pub fn path(&self) -> Vec<&StateValue> {
        let mut path = Vec::new();
        if let Some(source) = self.records.first().and_then(|r| r.source.as_ref()) {
            path.push(source.value());
        }
        for record in &self.records {
            path.push(record.target.value());
        }
        path
    }

    /// Elapsed time between the first and last record.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            last.created_at
                .signed_duration_since(first.created_at)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    /// Contexts reconstructed from every record.
    pub fn contexts(&self) -> Vec<Context> {
        self.records.iter().map(AuditRecord::context).collect()
    }

    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
