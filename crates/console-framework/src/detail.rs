//! Single-entity fetch for detail pages.

use crate::entity::{entity_type, ConsoleEntity};
use crate::error::ConsoleError;
use crate::service::CollectionService;
use tracing::debug;

/// Loads one entity by its raw (route) id.
///
/// An id that does not parse and an id the service does not know are both
/// [`ConsoleError::NotFound`]; service failures stay [`ConsoleError::Transport`].
pub async fn fetch_detail<T: ConsoleEntity>(
    service: &dyn CollectionService<T>,
    raw_id: &str,
) -> Result<T, ConsoleError> {
    let not_found = || ConsoleError::NotFound {
        entity: T::NAME,
        id: raw_id.to_string(),
    };
    let Ok(id) = raw_id.parse::<T::Id>() else {
        debug!(entity_type = entity_type::<T>(), raw_id, "Unparsable id");
        return Err(not_found());
    };
    service.get(id).await?.ok_or_else(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameworkError;
    use crate::fixtures::{Note, NoteId};
    use crate::mock::MockClient;

    #[tokio::test]
    async fn returns_the_entity() {
        let mock = MockClient::<Note>::new();
        mock.expect_get(NoteId(3))
            .return_ok(Some(Note::new(3, "t", "b")));
        let note = fetch_detail(&mock.client(), "3").await.unwrap();
        assert_eq!(note.title, "t");
        mock.verify();
    }

    #[tokio::test]
    async fn absent_entity_is_not_found() {
        let mock = MockClient::<Note>::new();
        mock.expect_get(NoteId(8)).return_ok(None);
        let err = fetch_detail(&mock.client(), "8").await.unwrap_err();
        assert_eq!(
            err,
            ConsoleError::NotFound {
                entity: "Note",
                id: "8".into()
            }
        );
        assert_eq!(err.to_string(), "Note not found: 8");
    }

    #[tokio::test]
    async fn garbage_id_is_not_found_without_a_call() {
        let mock = MockClient::<Note>::new();
        let err = fetch_detail(&mock.client(), "abc").await.unwrap_err();
        assert!(matches!(err, ConsoleError::NotFound { .. }));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn service_failure_stays_transport() {
        let mock = MockClient::<Note>::new();
        mock.expect_get(NoteId(1))
            .return_err(FrameworkError::Rejected("timeout".into()));
        let err = fetch_detail(&mock.client(), "1").await.unwrap_err();
        assert_eq!(err, ConsoleError::Transport("timeout".into()));
    }
}
