//! # Consistency Refresher
//!
//! After every successful mutation the locally held list is discarded and the
//! full list query is issued again. The server is the source of truth; no
//! partial or optimistic patch of the old list is ever applied.

use crate::entity::{entity_type, ConsoleEntity};
use crate::error::ConsoleError;
use crate::service::SharedService;
use crate::state::{CollectionState, ListPhase};
use tracing::{debug, info, warn};

/// Re-issues the list query of one collection. Holds no list data itself.
pub struct ConsistencyRefresher<T: ConsoleEntity> {
    service: SharedService<T>,
}

impl<T: ConsoleEntity> Clone for ConsistencyRefresher<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<T: ConsoleEntity> ConsistencyRefresher<T> {
    pub fn new(service: SharedService<T>) -> Self {
        Self { service }
    }

    /// Drops the current list, including its joined relations.
    pub fn discard(state: &mut CollectionState<T>) {
        debug!(entity_type = entity_type::<T>(), "Discarding list");
        state.phase = ListPhase::Loading;
    }

    /// Fetches the full list again.
    pub async fn reload(&self) -> Result<Vec<T>, ConsoleError> {
        let entity_type = entity_type::<T>();
        let result = self.service.get_all().await;
        match &result {
            Ok(items) => info!(entity_type, count = items.len(), "List loaded"),
            Err(e) => warn!(entity_type, error = %e, "List query failed"),
        }
        result
    }
}
