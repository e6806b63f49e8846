//! Core workflow value types.
//!
//! This module contains the data the engine reasons about:
//! - States, their scalar values and ordered collections
//! - Actors and the principal resolver contract
//! - Transition contexts and payloads
//! - Guards with their two blocking severities
//! - Audit records and history
//!
//! Nothing in here touches an entity's persistence.

mod actor;
mod context;
mod guard;
mod history;
mod state;

pub use actor::{Actor, PrincipalResolver};
pub use context::{payload, Context, Payload};
pub use guard::{evaluate, Guard, GuardOutcome};
pub use history::{AuditRecord, History};
pub use state::{Metadata, State, StateCollection, StateValue};
