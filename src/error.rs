//! Engine error type.

use crate::checkpoint::CheckpointError;
use crate::core::StateValue;
use crate::transition::CallbackError;
use crate::validation::ValidationErrors;
use thiserror::Error;

pub type Result<T, E = WorkflowError> = std::result::Result<T, E>;

/// Errors raised while resolving or performing transitions.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("State '{value}' not found")]
    StateNotFound { value: StateValue },

    #[error("Blueprint '{blueprint}' declares no states")]
    NoInitialState { blueprint: String },

    #[error("No transition declared from {} to '{target}'", display_source(.from))]
    TransitionNotFound {
        from: Option<StateValue>,
        target: StateValue,
    },

    #[error("State '{value}' is declared {count} times")]
    AmbiguousState { value: StateValue, count: usize },

    #[error("Transition '{from}' -> '{target}' is declared {count} times")]
    AmbiguousTransition {
        from: StateValue,
        target: StateValue,
        count: usize,
    },

    #[error("Transition to '{target}' is blocked: {reason}")]
    RecoverableGuard { target: StateValue, reason: String },

    #[error("Transition to '{target}' is forbidden: {reason}")]
    FatalGuard { target: StateValue, reason: String },

    #[error("Not authorized to transition to '{target}'")]
    AuthorizationDenied { target: StateValue },

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Attribute '{attribute}' was changed outside a transition (expected {}, found {})", display_value(.expected), display_value(.found))]
    ConsistencyViolation {
        attribute: String,
        expected: Option<StateValue>,
        found: Option<StateValue>,
    },

    #[error("Workflow attribute '{attribute}' is not initialized")]
    NotInitialized { attribute: String },

    #[error("Workflow attribute '{attribute}' is already initialized with '{current}'")]
    AlreadyInitialized {
        attribute: String,
        current: StateValue,
    },

    #[error("Current actor already contributed to the transition to '{target}'")]
    AlreadyCharged { target: StateValue },

    #[error("Post-commit callback failed after entering '{target}': {error}")]
    PostCommit {
        target: StateValue,
        #[source]
        error: CallbackError,
    },

    #[error("Unknown blueprint '{0}'")]
    UnknownBlueprint(String),

    #[error("Entity '{0}' not found")]
    EntityNotFound(String),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

fn display_source(from: &Option<StateValue>) -> String {
    match from {
        Some(value) => format!("'{value}'"),
        None => "an uninitialized entity".to_string(),
    }
}

fn display_value(value: &Option<StateValue>) -> String {
    match value {
        Some(value) => format!("'{value}'"),
        None => "nothing".to_string(),
    }
}

/// Coarse classification of a [`WorkflowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AmbiguousMatch,
    RecoverableGuardFailure,
    FatalGuardFailure,
    AuthorizationDenied,
    ValidationFailure,
    ConsistencyViolation,
    Usage,
    Callback,
    Checkpoint,
}

impl ErrorKind {
    /// Errors caused by the request rather than by configuration or code.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            Self::RecoverableGuardFailure
                | Self::FatalGuardFailure
                | Self::AuthorizationDenied
                | Self::ValidationFailure
        )
    }
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StateNotFound { .. }
            | Self::NoInitialState { .. }
            | Self::TransitionNotFound { .. }
            | Self::UnknownBlueprint(_)
            | Self::EntityNotFound(_) => ErrorKind::NotFound,
            Self::AmbiguousState { .. } | Self::AmbiguousTransition { .. } => {
                ErrorKind::AmbiguousMatch
            }
            Self::RecoverableGuard { .. } => ErrorKind::RecoverableGuardFailure,
            Self::FatalGuard { .. } => ErrorKind::FatalGuardFailure,
            Self::AuthorizationDenied { .. } => ErrorKind::AuthorizationDenied,
            Self::Validation(_) => ErrorKind::ValidationFailure,
            Self::ConsistencyViolation { .. } => ErrorKind::ConsistencyViolation,
            Self::NotInitialized { .. }
            | Self::AlreadyInitialized { .. }
            | Self::AlreadyCharged { .. } => ErrorKind::Usage,
            Self::PostCommit { .. } => ErrorKind::Callback,
            Self::Checkpoint(_) => ErrorKind::Checkpoint,
        }
    }
}
