mod common;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use common::{new_task, Task, TaskId, TaskPatch};
use console_framework::{
    CollectionService, ConsoleError, CreateIdPolicy, EntityListController, GraphqlEntity,
    GraphqlService,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

impl GraphqlEntity for Task {
    const COLLECTION: &'static str = "Tasks";
    const SELECTION: &'static str = "id title owner";
}

#[derive(Clone, Default)]
struct ServerState {
    received: Arc<Mutex<Vec<Value>>>,
}

impl ServerState {
    fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

async fn handle_graphql(State(state): State<ServerState>, Json(body): Json<Value>) -> Json<Value> {
    state.received.lock().unwrap().push(body.clone());
    let query = body["query"].as_str().unwrap_or_default();
    let variables = &body["variables"];

    let response = if query.contains("getAllTasks") {
        json!({ "data": { "getAllTasks": [
            { "id": "1", "title": "Write docs", "owner": "ana" },
            { "id": 2, "title": "Ship", "owner": "bo" }
        ] } })
    } else if query.contains("getTask") {
        json!({ "data": { "getTask": null } })
    } else if query.contains("createTask") {
        let mut created = variables["input"].clone();
        if created.get("id").is_none() {
            created["id"] = json!("3");
        }
        json!({ "data": { "createTask": created } })
    } else if query.contains("updateTask") {
        json!({ "data": null, "errors": [{ "message": "title is locked" }] })
    } else {
        json!({ "data": { "deleteTask": true } })
    };
    Json(response)
}

async fn handle_broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn spawn_graphql_server() -> (String, ServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let state = ServerState::default();
    let app = Router::new()
        .route("/graphql", post(handle_graphql))
        .route("/broken", post(handle_broken))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

#[tokio::test]
async fn list_decodes_string_and_numeric_ids() {
    let (url, server) = spawn_graphql_server().await;
    let service = GraphqlService::<Task>::new(format!("{url}/graphql"));

    let tasks = service.get_all().await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, TaskId(1));
    assert_eq!(tasks[1].id, TaskId(2));

    let sent = server.received();
    assert_eq!(
        sent[0]["query"],
        "query GetAllTasks { getAllTasks { id title owner } }"
    );
}

#[tokio::test]
async fn create_sends_input_without_id_by_default() {
    let (url, server) = spawn_graphql_server().await;
    let service = GraphqlService::<Task>::new(format!("{url}/graphql"));

    let created = service.create(new_task("Review", "cy")).await.unwrap();
    assert_eq!(created.id, TaskId(3));
    assert_eq!(created.title, "Review");

    let sent = server.received();
    assert_eq!(sent[0]["variables"]["input"], json!({ "title": "Review", "owner": "cy" }));
}

#[tokio::test]
async fn client_generated_policy_sends_an_id() {
    let (url, server) = spawn_graphql_server().await;
    let service = GraphqlService::<Task>::new(format!("{url}/graphql"))
        .with_create_ids(CreateIdPolicy::ClientGenerated);

    let created = service.create(new_task("Review", "cy")).await.unwrap();
    assert!((10_000..=99_999).contains(&created.id.0));

    let sent = server.received();
    let id = &sent[0]["variables"]["input"]["id"];
    assert!(id.is_number(), "client id sent as {id}");
    assert_eq!(id.as_u64(), Some(u64::from(created.id.0)));
}

#[tokio::test]
async fn graphql_errors_become_transport_failures() {
    let (url, server) = spawn_graphql_server().await;
    let service = GraphqlService::<Task>::new(format!("{url}/graphql"));

    let patch = TaskPatch {
        id: TaskId(1),
        title: Some("B".into()),
        owner: None,
    };
    let err = service.update(patch).await.unwrap_err();
    assert_eq!(err, ConsoleError::Transport("title is locked".into()));

    // Unset patch fields are not sent.
    let sent = server.received();
    assert_eq!(sent[0]["variables"]["input"], json!({ "id": "1", "title": "B" }));
}

#[tokio::test]
async fn missing_entity_and_delete() {
    let (url, server) = spawn_graphql_server().await;
    let service = GraphqlService::<Task>::new(format!("{url}/graphql"));

    assert_eq!(service.get(TaskId(9)).await.unwrap(), None);
    assert!(service.delete(TaskId(2)).await.unwrap());

    let sent = server.received();
    assert_eq!(sent[0]["variables"], json!({ "id": "9" }));
    assert_eq!(
        sent[1]["query"],
        "mutation DeleteTask($id: ID!) { deleteTask(id: $id) }"
    );
}

#[tokio::test]
async fn http_failure_errors_the_list() {
    let (url, _server) = spawn_graphql_server().await;
    let service = GraphqlService::<Task>::new(format!("{url}/broken"));

    let (controller, handle) = EntityListController::new(Arc::new(service), 4);
    tokio::spawn(controller.run());

    let state = handle.settled().await.unwrap();
    assert!(matches!(
        state.phase,
        console_framework::ListPhase::Errored(ref msg) if msg.contains("500")
    ));
}
