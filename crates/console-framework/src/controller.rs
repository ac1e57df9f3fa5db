//! # Entity List Controller
//!
//! One controller per mounted collection page. It is an actor in the same shape
//! as [`ResourceActor`](crate::ResourceActor): a private task owns the
//! [`CollectionState`] and processes commands sequentially, while cloneable
//! [`ControllerHandle`]s send commands and read published snapshots.
//!
//! ## Lifecycle
//!
//! 1. **Mount**: [`EntityListController::new`] returns the controller and a handle;
//!    spawning [`run`](EntityListController::run) moves `Idle -> Loading` and
//!    issues the initial list query.
//! 2. **Interact**: commands mutate the state through its admission-checked
//!    transitions. Accepted submits spawn a gateway call; its
//!    [`MutationOutcome`] comes back to the actor as a completion message.
//! 3. **Refetch**: every successful mutation discards the list and reloads it.
//!    Only the most recent reload may settle the list.
//! 4. **Teardown**: when every handle is dropped the loop ends. Calls still in
//!    flight run to completion (they are never aborted) but their results find
//!    the completion channel closed and are dropped without touching state.
//!
//! ## Observing
//!
//! Snapshots are published on a `tokio::sync::watch` channel after every
//! change, so a presentation layer can re-render from
//! [`ControllerHandle::subscribe`] without polling.

use crate::entity::{entity_type, ConsoleEntity};
use crate::error::{ConsoleError, FrameworkError};
use crate::gateway::{MutationGateway, MutationOutcome};
use crate::refresher::ConsistencyRefresher;
use crate::service::SharedService;
use crate::state::{Admission, CollectionState, Refusal};
use std::future::Future;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

/// The confirmation text shown before a delete is issued.
pub fn delete_prompt<T: ConsoleEntity>() -> String {
    format!(
        "Are you sure you want to delete this {}?",
        T::NAME.to_lowercase()
    )
}

enum Command<T: ConsoleEntity> {
    StartCreate {
        respond_to: oneshot::Sender<Admission>,
    },
    EditDraft {
        draft: T::Create,
        respond_to: oneshot::Sender<Admission>,
    },
    SubmitCreate {
        input: T::Create,
        respond_to: oneshot::Sender<Admission>,
    },
    CancelCreate {
        respond_to: oneshot::Sender<Admission>,
    },
    StartEdit {
        id: T::Id,
        respond_to: oneshot::Sender<Admission>,
    },
    EditPatch {
        patch: T::Patch,
        respond_to: oneshot::Sender<Admission>,
    },
    SubmitEdit {
        patch: T::Patch,
        respond_to: oneshot::Sender<Admission>,
    },
    CancelEdit {
        respond_to: oneshot::Sender<Admission>,
    },
    RequestDelete {
        id: T::Id,
        respond_to: oneshot::Sender<Admission>,
    },
}

/// Results of spawned calls, fed back into the actor loop.
enum Completion<T: ConsoleEntity> {
    Created(MutationOutcome<T>),
    Updated(MutationOutcome<T>),
    Deleted(MutationOutcome<bool>),
    Listed {
        generation: u64,
        result: Result<Vec<T>, ConsoleError>,
    },
}

impl<T: ConsoleEntity> Completion<T> {
    fn label(&self) -> &'static str {
        match self {
            Completion::Created(_) => "create",
            Completion::Updated(_) => "update",
            Completion::Deleted(_) => "delete",
            Completion::Listed { .. } => "list",
        }
    }
}

/// The interaction state machine of one collection page.
pub struct EntityListController<T: ConsoleEntity> {
    commands: mpsc::Receiver<Command<T>>,
    completions: mpsc::Receiver<Completion<T>>,
    completion_tx: mpsc::Sender<Completion<T>>,
    gateway: MutationGateway<T>,
    refresher: ConsistencyRefresher<T>,
    state: CollectionState<T>,
    publisher: watch::Sender<CollectionState<T>>,
    /// Bumped on every reload; list results carrying an older value are stale.
    generation: u64,
}

impl<T: ConsoleEntity> EntityListController<T> {
    /// Creates the controller (to be spawned) and its first handle.
    pub fn new(service: SharedService<T>, buffer_size: usize) -> (Self, ControllerHandle<T>) {
        let (command_tx, commands) = mpsc::channel(buffer_size);
        let (completion_tx, completions) = mpsc::channel(buffer_size);
        let (publisher, state_rx) = watch::channel(CollectionState::new());
        let controller = Self {
            commands,
            completions,
            completion_tx,
            gateway: MutationGateway::new(service.clone()),
            refresher: ConsistencyRefresher::new(service),
            state: CollectionState::new(),
            publisher,
            generation: 0,
        };
        let handle = ControllerHandle {
            sender: command_tx,
            state: state_rx,
        };
        (controller, handle)
    }

    /// Runs until every handle has been dropped.
    pub async fn run(mut self) {
        let entity_type = entity_type::<T>();
        info!(entity_type, "Controller mounted");
        self.reload();
        self.publish();

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(completion) = self.completions.recv() => self.handle_completion(completion),
            }
        }

        info!(entity_type, "Controller torn down");
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }

    fn handle_command(&mut self, command: Command<T>) {
        let entity_type = entity_type::<T>();
        let (admission, respond_to) = match command {
            Command::StartCreate { respond_to } => (self.state.start_create(), respond_to),
            Command::EditDraft { draft, respond_to } => (self.state.edit_draft(draft), respond_to),
            Command::SubmitCreate { input, respond_to } => {
                let admission = match self.state.submit_create(input) {
                    Ok(input) => {
                        let gateway = self.gateway.clone();
                        self.spawn_call(async move { Completion::Created(gateway.create(input).await) });
                        Admission::Accepted
                    }
                    Err(refusal) => Admission::Refused(refusal),
                };
                (admission, respond_to)
            }
            Command::CancelCreate { respond_to } => {
                self.state.cancel_create();
                (Admission::Accepted, respond_to)
            }
            Command::StartEdit { id, respond_to } => (self.state.start_edit(id), respond_to),
            Command::EditPatch { patch, respond_to } => (self.state.edit_patch(patch), respond_to),
            Command::SubmitEdit { patch, respond_to } => {
                let admission = match self.state.submit_edit(patch) {
                    Ok(patch) => {
                        let gateway = self.gateway.clone();
                        self.spawn_call(async move { Completion::Updated(gateway.update(patch).await) });
                        Admission::Accepted
                    }
                    Err(refusal) => Admission::Refused(refusal),
                };
                (admission, respond_to)
            }
            Command::CancelEdit { respond_to } => {
                self.state.cancel_edit();
                (Admission::Accepted, respond_to)
            }
            Command::RequestDelete { id, respond_to } => {
                let admission = match self.state.request_delete(id) {
                    Ok(id) => {
                        let gateway = self.gateway.clone();
                        self.spawn_call(async move { Completion::Deleted(gateway.delete(id).await) });
                        Admission::Accepted
                    }
                    Err(refusal) => Admission::Refused(refusal),
                };
                (admission, respond_to)
            }
        };

        if let Admission::Refused(refusal) = &admission {
            debug!(entity_type, ?refusal, "Command refused");
        }
        self.publish();
        let _ = respond_to.send(admission);
    }

    fn handle_completion(&mut self, completion: Completion<T>) {
        let refetch = match completion {
            Completion::Created(outcome) => self.state.finish_create(outcome),
            Completion::Updated(outcome) => self.state.finish_edit(outcome),
            Completion::Deleted(outcome) => self.state.finish_delete(outcome),
            Completion::Listed { generation, result } => {
                if generation != self.generation {
                    debug!(
                        entity_type = entity_type::<T>(),
                        generation,
                        current = self.generation,
                        "Ignoring stale list result"
                    );
                    return;
                }
                self.state.apply_list(result);
                false
            }
        };
        if refetch {
            self.reload();
        }
        self.publish();
    }

    /// Discards the list and issues a fresh query.
    fn reload(&mut self) {
        ConsistencyRefresher::discard(&mut self.state);
        self.generation += 1;
        let generation = self.generation;
        let refresher = self.refresher.clone();
        self.spawn_call(async move {
            Completion::Listed {
                generation,
                result: refresher.reload().await,
            }
        });
    }

    /// Runs `call` detached from the actor loop. The call is never aborted; if
    /// the controller is gone when it finishes, its result is dropped.
    fn spawn_call(&self, call: impl Future<Output = Completion<T>> + Send + 'static) {
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let completion = call.await;
            let label = completion.label();
            if completions.send(completion).await.is_err() {
                info!(
                    entity_type = entity_type::<T>(),
                    call = label,
                    "Controller torn down, discarding result"
                );
            }
        });
    }
}

/// Cloneable interface to a running [`EntityListController`].
///
/// Every command answers with an [`Admission`]. A refused command changed
/// nothing. An accepted submit only means the mutation was dispatched; its
/// outcome shows up in a later snapshot.
pub struct ControllerHandle<T: ConsoleEntity> {
    sender: mpsc::Sender<Command<T>>,
    state: watch::Receiver<CollectionState<T>>,
}

impl<T: ConsoleEntity> Clone for ControllerHandle<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: ConsoleEntity> ControllerHandle<T> {
    async fn command(
        &self,
        build: impl FnOnce(oneshot::Sender<Admission>) -> Command<T>,
    ) -> Result<Admission, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }

    pub async fn start_create(&self) -> Result<Admission, FrameworkError> {
        self.command(|respond_to| Command::StartCreate { respond_to })
            .await
    }

    pub async fn edit_draft(&self, draft: T::Create) -> Result<Admission, FrameworkError> {
        self.command(|respond_to| Command::EditDraft { draft, respond_to })
            .await
    }

    /// Validates and dispatches a create. An empty required field is answered
    /// with [`Refusal::Invalid`] and nothing is sent.
    pub async fn submit_create(&self, input: T::Create) -> Result<Admission, FrameworkError> {
        self.command(|respond_to| Command::SubmitCreate { input, respond_to })
            .await
    }

    pub async fn cancel_create(&self) -> Result<Admission, FrameworkError> {
        self.command(|respond_to| Command::CancelCreate { respond_to })
            .await
    }

    pub async fn start_edit(&self, id: T::Id) -> Result<Admission, FrameworkError> {
        self.command(|respond_to| Command::StartEdit { id, respond_to })
            .await
    }

    pub async fn edit_patch(&self, patch: T::Patch) -> Result<Admission, FrameworkError> {
        self.command(|respond_to| Command::EditPatch { patch, respond_to })
            .await
    }

    pub async fn submit_edit(&self, patch: T::Patch) -> Result<Admission, FrameworkError> {
        self.command(|respond_to| Command::SubmitEdit { patch, respond_to })
            .await
    }

    pub async fn cancel_edit(&self) -> Result<Admission, FrameworkError> {
        self.command(|respond_to| Command::CancelEdit { respond_to })
            .await
    }

    /// Asks `confirm` with [`delete_prompt`] first. A declined prompt sends nothing.
    pub async fn request_delete(
        &self,
        id: T::Id,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Admission, FrameworkError> {
        if !confirm(&delete_prompt::<T>()) {
            debug!(entity_type = entity_type::<T>(), %id, "Delete declined");
            return Ok(Admission::Refused(Refusal::Declined));
        }
        self.command(|respond_to| Command::RequestDelete { id, respond_to })
            .await
    }

    /// The most recently published state.
    pub fn snapshot(&self) -> CollectionState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionState<T>> {
        self.state.clone()
    }

    /// Waits until the list has loaded (or failed) and no mutation is in flight.
    pub async fn settled(&self) -> Result<CollectionState<T>, FrameworkError> {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(CollectionState::is_settled)
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        Ok(CollectionState::clone(&settled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Note, NoteCreate, NoteId, NotePatch};
    use crate::mock::MockClient;
    use crate::state::{CreatePanel, EditSlot, ListPhase};
    use std::sync::Arc;

    fn mount(mock: &MockClient<Note>) -> ControllerHandle<Note> {
        let (controller, handle) = EntityListController::new(Arc::new(mock.client()), 8);
        tokio::spawn(controller.run());
        handle
    }

    fn notes() -> Vec<Note> {
        vec![Note::new(1, "A", "first"), Note::new(2, "B", "second")]
    }

    #[test]
    fn prompt_names_the_entity() {
        assert_eq!(
            delete_prompt::<Note>(),
            "Are you sure you want to delete this note?"
        );
    }

    #[tokio::test]
    async fn mount_loads_the_list() {
        let mock = MockClient::<Note>::new();
        mock.expect_list().return_ok(notes());
        let handle = mount(&mock);

        let state = handle.settled().await.unwrap();
        assert_eq!(state.phase, ListPhase::Ready(notes()));
        mock.verify();
    }

    #[tokio::test]
    async fn create_refetches_and_closes_panel() {
        let mock = MockClient::<Note>::new();
        mock.expect_list().return_ok(notes());
        mock.expect_create().return_ok(Note::new(3, "C", "third"));
        let mut refreshed = notes();
        refreshed.push(Note::new(3, "C", "third"));
        mock.expect_list().return_ok(refreshed.clone());
        let handle = mount(&mock);
        handle.settled().await.unwrap();

        assert!(handle.start_create().await.unwrap().is_accepted());
        let admission = handle
            .submit_create(NoteCreate::new("C", "third"))
            .await
            .unwrap();
        assert!(admission.is_accepted());

        let state = handle.settled().await.unwrap();
        assert_eq!(state.phase, ListPhase::Ready(refreshed));
        assert_eq!(state.create_panel, CreatePanel::Closed);
        assert_eq!(state.last_error, None);
        mock.verify();
    }

    #[tokio::test]
    async fn invalid_create_issues_no_call() {
        let mock = MockClient::<Note>::new();
        mock.expect_list().return_ok(notes());
        let handle = mount(&mock);
        handle.settled().await.unwrap();

        handle.start_create().await.unwrap();
        let admission = handle
            .submit_create(NoteCreate::new("C", ""))
            .await
            .unwrap();
        assert!(matches!(
            admission,
            Admission::Refused(Refusal::Invalid(ref e)) if e.field == "body"
        ));
        assert_eq!(mock.request_count(), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn blanked_edit_issues_no_call() {
        let mock = MockClient::<Note>::new();
        mock.expect_list().return_ok(notes());
        let handle = mount(&mock);
        handle.settled().await.unwrap();

        handle.start_edit(NoteId(1)).await.unwrap();
        let admission = handle
            .submit_edit(NotePatch::title(NoteId(1), ""))
            .await
            .unwrap();
        assert!(matches!(
            admission,
            Admission::Refused(Refusal::Invalid(ref e)) if e.field == "title"
        ));

        let state = handle.settled().await.unwrap();
        assert!(matches!(state.editing, EditSlot::Active { id: NoteId(1), .. }));
        assert!(matches!(state.last_error, Some(ConsoleError::Validation(_))));
        assert_eq!(state.in_flight, None);
        assert_eq!(mock.request_count(), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn failed_update_keeps_edit_mode_without_refetch() {
        let mock = MockClient::<Note>::new();
        mock.expect_list().return_ok(notes());
        mock.expect_update(NoteId(1))
            .return_err(FrameworkError::Rejected("conflict".into()));
        let handle = mount(&mock);
        handle.settled().await.unwrap();

        handle.start_edit(NoteId(1)).await.unwrap();
        handle
            .submit_edit(NotePatch::title(NoteId(1), "X"))
            .await
            .unwrap();

        let state = handle.settled().await.unwrap();
        assert!(matches!(state.editing, EditSlot::Active { id: NoteId(1), .. }));
        assert_eq!(state.last_error, Some(ConsoleError::Transport("conflict".into())));
        assert_eq!(state.phase, ListPhase::Ready(notes()));
        mock.verify();
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let mock = MockClient::<Note>::new();
        mock.expect_list().return_ok(notes());
        let handle = mount(&mock);
        handle.settled().await.unwrap();

        let admission = handle.request_delete(NoteId(2), |_| false).await.unwrap();
        assert_eq!(admission, Admission::Refused(Refusal::Declined));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn refetch_failure_ends_in_error_phase() {
        let mock = MockClient::<Note>::new();
        mock.expect_list().return_ok(notes());
        mock.expect_delete(NoteId(1)).return_ok(true);
        mock.expect_list()
            .return_err(FrameworkError::Rejected("server down".into()));
        let handle = mount(&mock);
        handle.settled().await.unwrap();

        handle.request_delete(NoteId(1), |_| true).await.unwrap();
        let state = handle.settled().await.unwrap();
        assert_eq!(state.phase, ListPhase::Errored("server down".into()));
        mock.verify();
    }

    #[tokio::test]
    async fn commands_fail_once_controller_is_gone() {
        let mock = MockClient::<Note>::new();
        mock.expect_list().return_ok(notes());
        let (controller, handle) = EntityListController::new(Arc::new(mock.client()), 8);
        drop(controller);
        assert_eq!(
            handle.start_create().await,
            Err(FrameworkError::ActorClosed)
        );
    }
}
