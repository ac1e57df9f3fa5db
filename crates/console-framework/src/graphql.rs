//! # GraphQL Transport
//!
//! [`GraphqlService<T>`] talks to a remote query/mutation service over HTTP.
//! Operation names are derived from the entity schema, so one implementation
//! serves every collection:
//!
//! | operation | document |
//! |-----------|----------|
//! | list | `query GetAllPosts { getAllPosts { .. } }` |
//! | get | `query GetPost($id: ID!) { getPost(id: $id) { .. } }` |
//! | create | `mutation CreatePost($input: CreatePostInput!) { createPost(input: $input) { .. } }` |
//! | update | `mutation UpdatePost($input: UpdatePostInput!) { updatePost(input: $input) { .. } }` |
//! | delete | `mutation DeletePost($id: ID!) { deletePost(id: $id) }` |
//!
//! A non-empty `errors` array, a non-2xx status, an unreachable endpoint and an
//! undecodable payload all surface as [`ConsoleError::Transport`].

use crate::entity::{entity_type, ConsoleEntity};
use crate::error::ConsoleError;
use crate::service::CollectionService;
use async_trait::async_trait;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::marker::PhantomData;
use std::ops::RangeInclusive;
use tracing::{debug, instrument, warn};

/// Schema names of an entity on the GraphQL endpoint.
pub trait GraphqlEntity: ConsoleEntity + DeserializeOwned {
    /// Plural form used by the list field, e.g. `"Posts"` for `getAllPosts`.
    const COLLECTION: &'static str;

    /// Selection set requested for every returned record.
    const SELECTION: &'static str;
}

/// Range of the ids drawn under [`CreateIdPolicy::ClientGenerated`].
pub const CLIENT_ID_RANGE: RangeInclusive<u32> = 10_000..=99_999;

/// Who assigns the id of a newly created entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreateIdPolicy {
    /// The service assigns ids; `input.id` is never sent.
    #[default]
    ServerAssigned,
    /// A pseudo-random id from [`CLIENT_ID_RANGE`] is sent as the number `input.id`.
    ClientGenerated,
}

impl std::str::FromStr for CreateIdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "server-assigned" => Ok(Self::ServerAssigned),
            "client-generated" => Ok(Self::ClientGenerated),
            other => Err(format!(
                "unknown create id policy {other:?} (expected server-assigned or client-generated)"
            )),
        }
    }
}

/// One named GraphQL operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Top-level response field, e.g. `createPost`.
    pub field: String,
    pub document: String,
}

/// The five documents of one collection.
#[derive(Debug, Clone)]
pub struct Operations {
    pub list: Operation,
    pub get: Operation,
    pub create: Operation,
    pub update: Operation,
    pub delete: Operation,
}

impl Operations {
    pub fn of<T: GraphqlEntity>() -> Self {
        let name = T::NAME;
        let plural = T::COLLECTION;
        let selection = T::SELECTION;
        let op = |field: String, document: String| Operation { field, document };
        Self {
            list: op(
                format!("getAll{plural}"),
                format!("query GetAll{plural} {{ getAll{plural} {{ {selection} }} }}"),
            ),
            get: op(
                format!("get{name}"),
                format!("query Get{name}($id: ID!) {{ get{name}(id: $id) {{ {selection} }} }}"),
            ),
            create: op(
                format!("create{name}"),
                format!(
                    "mutation Create{name}($input: Create{name}Input!) {{ create{name}(input: $input) {{ {selection} }} }}"
                ),
            ),
            update: op(
                format!("update{name}"),
                format!(
                    "mutation Update{name}($input: Update{name}Input!) {{ update{name}(input: $input) {{ {selection} }} }}"
                ),
            ),
            delete: op(
                format!("delete{name}"),
                format!("mutation Delete{name}($id: ID!) {{ delete{name}(id: $id) }}"),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Pulls `data.<field>` out of a response body, or the joined error messages.
fn decode_payload<R: DeserializeOwned>(body: GraphqlResponse, field: &str) -> Result<R, ConsoleError> {
    if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
        let message = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ConsoleError::Transport(message));
    }
    let payload = body
        .data
        .and_then(|mut data| data.get_mut(field).map(Value::take))
        .unwrap_or(Value::Null);
    serde_json::from_value(payload)
        .map_err(|e| ConsoleError::transport(format!("malformed {field} payload: {e}")))
}

/// HTTP client for one collection of a GraphQL endpoint.
pub struct GraphqlService<T> {
    http: reqwest::Client,
    endpoint: String,
    create_ids: CreateIdPolicy,
    operations: Operations,
    _entity: PhantomData<fn() -> T>,
}

impl<T: GraphqlEntity> GraphqlService<T> {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Shares one connection pool across collections.
    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            create_ids: CreateIdPolicy::default(),
            operations: Operations::of::<T>(),
            _entity: PhantomData,
        }
    }

    pub fn with_create_ids(mut self, policy: CreateIdPolicy) -> Self {
        self.create_ids = policy;
        self
    }

    /// The id sent with a create payload, if any. This is the only place
    /// [`CreateIdPolicy`] is consulted.
    fn client_supplied_id(&self) -> Option<u32> {
        match self.create_ids {
            CreateIdPolicy::ServerAssigned => None,
            CreateIdPolicy::ClientGenerated => Some(rand::rng().random_range(CLIENT_ID_RANGE)),
        }
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: Value,
    ) -> Result<R, ConsoleError> {
        debug!(field = %operation.field, %variables, "Sending GraphQL request");
        let transport = |e: reqwest::Error| {
            warn!(field = %operation.field, error = %e, "GraphQL request failed");
            ConsoleError::transport(e.to_string())
        };
        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": operation.document, "variables": variables }))
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;
        let body: GraphqlResponse = response.json().await.map_err(transport)?;
        decode_payload(body, &operation.field)
    }
}

fn encode<V: Serialize>(value: &V) -> Result<Value, ConsoleError> {
    serde_json::to_value(value).map_err(|e| ConsoleError::transport(format!("cannot encode input: {e}")))
}

#[async_trait]
impl<T> CollectionService<T> for GraphqlService<T>
where
    T: GraphqlEntity,
    T::Create: Serialize,
    T::Patch: Serialize,
{
    #[instrument(skip(self), fields(entity_type = entity_type::<T>()))]
    async fn get_all(&self) -> Result<Vec<T>, ConsoleError> {
        self.execute(&self.operations.list, json!({})).await
    }

    #[instrument(skip(self), fields(entity_type = entity_type::<T>()))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, ConsoleError> {
        self.execute(&self.operations.get, json!({ "id": id.to_string() }))
            .await
    }

    #[instrument(skip(self), fields(entity_type = entity_type::<T>()))]
    async fn create(&self, input: T::Create) -> Result<T, ConsoleError> {
        let mut input = encode(&input)?;
        if let (Some(id), Value::Object(fields)) = (self.client_supplied_id(), &mut input) {
            fields.insert("id".into(), json!(id));
        }
        self.execute(&self.operations.create, json!({ "input": input }))
            .await
    }

    #[instrument(skip(self), fields(entity_type = entity_type::<T>()))]
    async fn update(&self, patch: T::Patch) -> Result<T, ConsoleError> {
        let input = encode(&patch)?;
        self.execute(&self.operations.update, json!({ "input": input }))
            .await
    }

    #[instrument(skip(self), fields(entity_type = entity_type::<T>()))]
    async fn delete(&self, id: T::Id) -> Result<bool, ConsoleError> {
        self.execute(&self.operations.delete, json!({ "id": id.to_string() }))
            .await
    }
}
