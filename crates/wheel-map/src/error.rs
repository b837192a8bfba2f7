//! Errors from override editing and session transitions.

use thiserror::Error;

use crate::overrides::EntityKind;

/// Errors from override edit operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// Each kind must keep at least one entity; deleting the last one is
    /// refused so every activity still has a destination.
    #[error("cannot delete the last remaining {0}")]
    LastEntity(EntityKind),
    /// The referenced override slot does not exist (stale id).
    #[error("no override slot with id {0}")]
    SlotNotFound(u32),
    /// Entity names must be non-empty after trimming.
    #[error("{0} name cannot be empty")]
    EmptyName(EntityKind),
}

/// Errors from import session stage transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid transition: {action} is not allowed while {stage}")]
    InvalidTransition {
        action: &'static str,
        stage: &'static str,
    },
    /// The suggestion's suitability warning forbids importing it.
    #[error("import blocked by suitability warning: {0}")]
    ImportBlocked(String),
}
