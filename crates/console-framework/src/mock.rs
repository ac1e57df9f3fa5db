//! # Mock Service & Testing Guide
//!
//! `MockClient<T>` answers the requests of a real [`ResourceClient<T>`] from a
//! scripted queue instead of a store. Since `ResourceClient` implements
//! [`CollectionService`](crate::CollectionService), a mock plugs straight into an
//! [`EntityListController`](crate::EntityListController) or a
//! [`MutationGateway`](crate::MutationGateway).
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | ResourceActor |
//! |---------|------------|---------------|
//! | **State** | None (scripted responses) | Real store with ids and joins |
//! | **Error Injection** | Easy (`return_err`) | Only "not found" |
//! | **Request log** | Yes ([`MockClient::requests`]) | No |
//! | **Use Case** | Controller flows, failure paths | End-to-end flows |
//!
//! ## Testing Strategies
//!
//! <details>
//! <summary><b>Pattern 0: Scripted Controller Test</b></summary>
//!
//! ```rust
//! use console_framework::mock::MockClient;
//! use console_framework::{ConsoleEntity, EntityListController, ListPhase};
//! use std::borrow::Cow;
//! use std::sync::Arc;
//!
//! console_framework::entity_id!(Tag);
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Tag { id: TagId, label: String }
//! #[derive(Clone, Debug, Default)] struct TagCreate { label: String }
//! #[derive(Clone, Debug)] struct TagPatch { id: TagId, label: Option<String> }
//!
//! impl ConsoleEntity for Tag {
//!     type Id = TagId; type Create = TagCreate; type Patch = TagPatch; type Context = ();
//!     const NAME: &'static str = "Tag";
//!     fn id(&self) -> &TagId { &self.id }
//!     fn required_fields(input: &TagCreate) -> Vec<(&'static str, Cow<'_, str>)> { vec![("label", Cow::from(&input.label))] }
//!     fn patch_target(patch: &TagPatch) -> &TagId { &patch.id }
//!     fn to_patch(&self) -> TagPatch { TagPatch { id: self.id, label: Some(self.label.clone()) } }
//!     fn from_create_params(id: TagId, input: TagCreate) -> Self { Self { id, label: input.label } }
//!     fn apply_patch(&mut self, patch: TagPatch) { if let Some(l) = patch.label { self.label = l; } }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockClient::<Tag>::new();
//!     mock.expect_list().return_ok(vec![Tag { id: TagId(1), label: "rust".into() }]);
//!
//!     let (controller, handle) = EntityListController::new(Arc::new(mock.client()), 8);
//!     tokio::spawn(controller.run());
//!
//!     let state = handle.settled().await.unwrap();
//!     assert!(matches!(state.phase, ListPhase::Ready(ref tags) if tags.len() == 1));
//!     mock.verify();
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 1: Hand-Driven Channel</b></summary>
//!
//! When a test must decide *when* a response arrives (for instance to tear a
//! controller down while a create is pending), use [`create_mock_client`] and
//! answer requests manually with [`expect_create`], [`expect_list`] and friends.
//! </details>
//!
//! <details>
//! <summary><b>Pattern 2: Full System</b></summary>
//!
//! Spawn real [`ResourceActor`](crate::ResourceActor)s and drive them through
//! controllers. See `tests/controller_flow_test.rs`.
//! </details>
//!
//! ## Mismatches
//!
//! A request that does not match the next expectation is answered with
//! [`FrameworkError::Unexpected`] rather than panicking inside the mock task, so
//! the code under test sees an ordinary transport failure. [`MockClient::verify`]
//! then fails the test.

use crate::client::ResourceClient;
use crate::entity::ConsoleEntity;
use crate::error::FrameworkError;
use crate::message::{RequestKind, ResourceRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the response to give it.
enum Expectation<T: ConsoleEntity> {
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<bool, FrameworkError>,
    },
}

type Shared<V> = Arc<Mutex<V>>;

/// A mock service with expectation tracking for fluent testing.
pub struct MockClient<T: ConsoleEntity> {
    client: ResourceClient<T>,
    expectations: Shared<VecDeque<Expectation<T>>>,
    requests: Shared<Vec<RequestKind>>,
    unexpected: Shared<Vec<String>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ConsoleEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ConsoleEntity> MockClient<T> {
    /// Creates a new mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Shared<VecDeque<Expectation<T>>> = Arc::default();
        let requests: Shared<Vec<RequestKind>> = Arc::default();
        let unexpected: Shared<Vec<String>> = Arc::default();

        let (exps, log, misses) = (expectations.clone(), requests.clone(), unexpected.clone());
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                log.lock().unwrap().push(request.kind());
                let expectation = exps.lock().unwrap().pop_front();
                answer(request, expectation, &exps, &misses);
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            requests,
            unexpected,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_list(&self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::List { response })
    }

    pub fn expect_get(&self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    pub fn expect_create(&self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_update(&self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&self, id: T::Id) -> ExpectationBuilder<T, bool> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    fn builder<R>(
        &self,
        wrap: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            wrap: Box::new(wrap),
            expectations: self.expectations.clone(),
        }
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RequestKind> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Panics if expectations remain or a request did not match its expectation.
    pub fn verify(&self) {
        let misses = self.unexpected.lock().unwrap();
        if !misses.is_empty() {
            panic!("Unexpected requests: {}", misses.join(", "));
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Sends the scripted response. On a mismatch the request is recorded before
/// it is rejected, and the expectation goes back to the front of the queue.
fn answer<T: ConsoleEntity>(
    request: ResourceRequest<T>,
    expectation: Option<Expectation<T>>,
    expectations: &Shared<VecDeque<Expectation<T>>>,
    unexpected: &Shared<Vec<String>>,
) {
    match (request, expectation) {
        (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response }))
            if id == want =>
        {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Update { patch, respond_to },
            Some(Expectation::Update { id: want, response }),
        ) if T::patch_target(&patch) == &want => {
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Delete { id, respond_to },
            Some(Expectation::Delete { id: want, response }),
        ) if id == want => {
            let _ = respond_to.send(response);
        }
        (request, expectation) => {
            let miss = format!("{:?}", request.kind());
            if let Some(expectation) = expectation {
                expectations.lock().unwrap().push_front(expectation);
            }
            unexpected.lock().unwrap().push(miss.clone());
            reject(request, FrameworkError::Unexpected(miss));
        }
    }
}

fn reject<T: ConsoleEntity>(request: ResourceRequest<T>, error: FrameworkError) {
    match request {
        ResourceRequest::List { respond_to } => {
            let _ = respond_to.send(Err(error));
        }
        ResourceRequest::Get { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
        ResourceRequest::Create { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
        ResourceRequest::Update { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
        ResourceRequest::Delete { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
    }
}

/// Builder for one expectation; finish it with `return_ok` or `return_err`.
pub struct ExpectationBuilder<T: ConsoleEntity, R> {
    wrap: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
    expectations: Shared<VecDeque<Expectation<T>>>,
}

impl<T: ConsoleEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        let expectation = (self.wrap)(Ok(value));
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.wrap)(Err(error));
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a client and the receiving end of its channel.
///
/// # Testing Strategy
/// The test plays the actor: it receives each request with one of the
/// `expect_*` helpers below and answers through the returned responder
/// whenever it chooses. This makes response timing fully deterministic.
pub fn create_mock_client<T: ConsoleEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

type Responder<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: ConsoleEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<Responder<Vec<T>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: ConsoleEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { input, respond_to }) => Some((input, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: ConsoleEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Patch, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { patch, respond_to }) => Some((patch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: ConsoleEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Responder<bool>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Note, NoteCreate, NoteId, NotePatch};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Note>(10);

        let create_task =
            tokio::spawn(async move { client.insert(NoteCreate::new("Test", "body")).await });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.title, "Test");
        responder.send(Ok(Note::new(1, "Test", "body"))).unwrap();

        let result = create_task.await.unwrap();
        assert!(matches!(result, Ok(note) if note.id == NoteId(1)));
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mock = MockClient::<Note>::new();
        mock.expect_create().return_ok(Note::new(1, "Test", "body"));
        mock.expect_get(NoteId(1))
            .return_ok(Some(Note::new(1, "Test", "body")));

        let client = mock.client();
        let created = client.insert(NoteCreate::new("Test", "body")).await.unwrap();
        assert_eq!(created.id, NoteId(1));

        let fetched = client.fetch(NoteId(1)).await.unwrap();
        assert_eq!(fetched.unwrap().title, "Test");

        assert_eq!(mock.requests(), vec![RequestKind::Create, RequestKind::Get]);
        mock.verify();
    }

    #[tokio::test]
    async fn mismatch_is_answered_with_unexpected() {
        let mock = MockClient::<Note>::new();
        mock.expect_delete(NoteId(1)).return_ok(true);

        let client = mock.client();
        let result = client.patch(NotePatch::title(NoteId(1), "X")).await;
        assert_eq!(result, Err(FrameworkError::Unexpected("Update".into())));

        // The unmatched expectation is still available.
        assert_eq!(client.remove(NoteId(1)).await, Ok(true));
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected requests: List")]
    async fn verify_reports_unexpected_requests() {
        let mock = MockClient::<Note>::new();
        let _ = mock.client().list().await;
        mock.verify();
    }
}
