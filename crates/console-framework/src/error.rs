//! # Framework Errors
//!
//! This module defines the error types shared by every collection. The console
//! distinguishes three failure classes:
//!
//! - [`ValidationError`]: a required field is empty. Raised before any network
//!   call and never seen by the gateway.
//! - [`ConsoleError::Transport`]: the query/mutation service rejected the call
//!   or could not be reached.
//! - [`ConsoleError::NotFound`]: a single-entity fetch came back empty.
//!
//! [`FrameworkError`] covers the plumbing of the in-process resource actor
//! (closed channels, scripted mocks) and always surfaces to callers as a
//! transport failure.

/// Errors that can occur within the resource actor plumbing itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unexpected request: {0}")]
    Unexpected(String),
    #[error("{0}")]
    Rejected(String),
}

/// A schema-mandated field was left empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {field} is required")]
pub struct ValidationError {
    pub entity: &'static str,
    pub field: &'static str,
}

/// The error channel a controller surfaces to its presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Transport(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl ConsoleError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

impl From<FrameworkError> for ConsoleError {
    fn from(e: FrameworkError) -> Self {
        Self::Transport(e.to_string())
    }
}
