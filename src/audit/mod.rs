//! Audit sinks receiving committed changes.
//!
//! The engine hands an [`AuditRecord`] to its sink once the entity has been
//! persisted. Storage is the integrator's concern; the sinks here keep
//! records in memory or emit them as log events.

use crate::core::History;
use parking_lot::Mutex;
use tracing::info;

pub use crate::core::AuditRecord;

/// Receiver of committed initializations and transitions.
pub trait AuditSink: Send + Sync {
    fn record(&self, record: AuditRecord);
}

/// Keeps every record in an in-memory [`History`].
///
/// # Example
///
/// ```rust
/// use waymark::audit::{AuditRecord, AuditSink, MemoryAuditSink};
/// use waymark::core::{Context, Payload, State};
///
/// let sink = MemoryAuditSink::new();
/// sink.record(AuditRecord::new(
///     "article",
///     "status",
///     "7",
///     Context::initial(State::new("new"), None, Payload::new()),
/// ));
///
/// assert_eq!(sink.history().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    history: Mutex<History>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn history(&self) -> History {
        self.history.lock().clone()
    }

    pub fn clear(&self) {
        *self.history.lock() = History::new();
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, record: AuditRecord) {
        self.history.lock().push(record);
    }
}

/// Emits each record as an `info` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: AuditRecord) {
        info!(
            audit_id = %record.id,
            blueprint = %record.blueprint,
            attribute = %record.attribute,
            entity = %record.subject,
            from = ?record.source.as_ref().map(|s| s.value()),
            to = %record.target.value(),
            performer = ?record.performer.as_ref().map(|a| a.id()),
            "Workflow change recorded"
        );
    }
}
