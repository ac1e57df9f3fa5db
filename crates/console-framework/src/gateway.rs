//! # Mutation Gateway
//!
//! Wraps the create/update/delete calls of one collection. Each invocation is
//! fire-once (no retry, no deduplication) and yields exactly one
//! [`MutationOutcome`]. The gateway keeps no state between calls; the
//! controller decides what an outcome means for the interaction state.

use crate::entity::{entity_type, ConsoleEntity};
use crate::error::ConsoleError;
use crate::service::SharedService;
use tracing::{info, warn};

/// Terminal result of one mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<P> {
    Success(P),
    /// Human-readable reason, shown to the user as-is.
    Failure(String),
}

impl<P> MutationOutcome<P> {
    pub fn is_success(&self) -> bool {
        matches!(self, MutationOutcome::Success(_))
    }
}

impl<P> From<Result<P, ConsoleError>> for MutationOutcome<P> {
    fn from(result: Result<P, ConsoleError>) -> Self {
        match result {
            Ok(payload) => MutationOutcome::Success(payload),
            Err(e) => MutationOutcome::Failure(e.to_string()),
        }
    }
}

/// Which mutation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

/// One gateway per collection. Cheap to clone; safe to share or rebuild per call.
pub struct MutationGateway<T: ConsoleEntity> {
    service: SharedService<T>,
}

impl<T: ConsoleEntity> Clone for MutationGateway<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<T: ConsoleEntity> MutationGateway<T> {
    pub fn new(service: SharedService<T>) -> Self {
        Self { service }
    }

    pub async fn create(&self, input: T::Create) -> MutationOutcome<T> {
        let entity_type = entity_type::<T>();
        let outcome = MutationOutcome::from(self.service.create(input).await);
        match &outcome {
            MutationOutcome::Success(created) => {
                info!(entity_type, id = %created.id(), "Created successfully")
            }
            MutationOutcome::Failure(reason) => warn!(entity_type, %reason, "Create failed"),
        }
        outcome
    }

    /// Issues the patch. A response for a different id than the patch targets is
    /// rejected here, so the controller never sees a mismatched record.
    pub async fn update(&self, patch: T::Patch) -> MutationOutcome<T> {
        let entity_type = entity_type::<T>();
        let target = T::patch_target(&patch).clone();
        let outcome = match self.service.update(patch).await {
            Ok(updated) if updated.id() != &target => MutationOutcome::Failure(format!(
                "{} update for {} returned {}",
                T::NAME,
                target,
                updated.id()
            )),
            result => MutationOutcome::from(result),
        };
        match &outcome {
            MutationOutcome::Success(_) => info!(entity_type, id = %target, "Updated successfully"),
            MutationOutcome::Failure(reason) => {
                warn!(entity_type, id = %target, %reason, "Update failed")
            }
        }
        outcome
    }

    pub async fn delete(&self, id: T::Id) -> MutationOutcome<bool> {
        let entity_type = entity_type::<T>();
        let outcome = MutationOutcome::from(self.service.delete(id.clone()).await);
        match &outcome {
            MutationOutcome::Success(true) => info!(entity_type, %id, "Deleted successfully"),
            MutationOutcome::Success(false) => {
                warn!(entity_type, %id, "Service reported nothing deleted")
            }
            MutationOutcome::Failure(reason) => warn!(entity_type, %id, %reason, "Delete failed"),
        }
        outcome
    }
}
