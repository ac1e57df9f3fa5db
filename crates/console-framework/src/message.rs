//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the `ResourceClient` and `ResourceActor`.

use crate::entity::ConsoleEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// # The CRUD Pattern
/// The variants map one-to-one onto the operations of the query/mutation service:
///
/// - **List**: `getAll<Entity>s`, in store order, relations joined.
/// - **Get**: `get<Entity>(id)`, `None` when unknown.
/// - **Create**: uses [`ConsoleEntity::Create`]; the actor assigns the id.
/// - **Update**: uses [`ConsoleEntity::Patch`]; patch semantics.
/// - **Delete**: resolves to `true` if something was removed.
///
/// This type is generic over `T: ConsoleEntity`, so a `Post` create payload can
/// never reach a `User` actor.
#[derive(Debug)]
pub enum ResourceRequest<T: ConsoleEntity> {
    List {
        respond_to: Response<Vec<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Create {
        input: T::Create,
        respond_to: Response<T>,
    },
    Update {
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<bool>,
    },
}

impl<T: ConsoleEntity> ResourceRequest<T> {
    /// Operation name, used in logs and mock bookkeeping.
    pub fn kind(&self) -> RequestKind {
        match self {
            ResourceRequest::List { .. } => RequestKind::List,
            ResourceRequest::Get { .. } => RequestKind::Get,
            ResourceRequest::Create { .. } => RequestKind::Create,
            ResourceRequest::Update { .. } => RequestKind::Update,
            ResourceRequest::Delete { .. } => RequestKind::Delete,
        }
    }
}

/// Discriminant of a [`ResourceRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    List,
    Get,
    Create,
    Update,
    Delete,
}
