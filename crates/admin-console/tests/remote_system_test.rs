use admin_console::lifecycle::ConsoleSystem;
use admin_console::model::{PostId, UserId};
use admin_console::shell;
use axum::{extract::State, routing::post, Json, Router};
use console_framework::CreateIdPolicy;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Recorded(Arc<Mutex<Vec<Value>>>);

impl Recorded {
    fn queries(&self) -> Vec<Value> {
        self.0.lock().unwrap().clone()
    }
}

/// Serves a fixed post list, echoes comment creates and rejects user updates.
async fn handle(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    recorded.0.lock().unwrap().push(body.clone());
    let query = body["query"].as_str().unwrap_or_default();

    let response = if query.contains("getAllPosts") {
        json!({ "data": { "getAllPosts": [
            { "id": "1", "userId": "1", "title": "Welcome", "body": "b",
              "user": { "id": "1", "name": "Ana Lima", "email": "ana@example.com" } },
            { "id": "2", "title": "No author selected", "body": "b", "user": null }
        ] } })
    } else if query.contains("createComment") {
        let mut created = body["variables"]["input"].clone();
        created["post"] = json!({ "id": created["postId"].clone(), "title": "Welcome" });
        json!({ "data": { "createComment": created } })
    } else if query.contains("getAllComments") {
        json!({ "data": { "getAllComments": [] } })
    } else if query.contains("getAllUsers") {
        json!({ "data": { "getAllUsers": [
            { "id": 1, "name": "Ana", "username": "ana", "email": "a@x", "phone": "1", "website": "w" }
        ] } })
    } else {
        json!({ "errors": [{ "message": "users are read-only" }] })
    };
    Json(response)
}

async fn spawn_server() -> (String, Recorded) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/graphql", post(handle))
        .with_state(recorded.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/graphql"), recorded)
}

#[tokio::test]
async fn remote_posts_decode_optional_relations() {
    let (url, _recorded) = spawn_server().await;
    let mut system = ConsoleSystem::remote(&url, CreateIdPolicy::ServerAssigned, 8);
    let posts = system.mount_posts();

    let items = shell::list(&posts).await.unwrap();
    assert_eq!(items[0].author_id, Some(UserId(1)));
    assert_eq!(items[0].user.as_ref().unwrap().name, "Ana Lima");
    assert_eq!(items[1].id, PostId(2));
    assert_eq!(items[1].author_id, None);
    assert_eq!(items[1].user, None);

    drop(posts);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn remote_comment_create_sends_client_id() {
    let (url, recorded) = spawn_server().await;
    let mut system = ConsoleSystem::remote(&url, CreateIdPolicy::ClientGenerated, 8);
    let comments = system.mount_comments();

    // The stub never lists the new comment, so the shell cannot find it.
    let err = shell::create(
        &comments,
        &[
            "postId=1".to_string(),
            "name=Bo".to_string(),
            "email=bo@example.com".to_string(),
            "body=Hi".to_string(),
        ],
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "created Comment is not listed");

    let create = recorded
        .queries()
        .into_iter()
        .find(|q| q["query"].as_str().unwrap().contains("createComment"))
        .unwrap();
    let input = &create["variables"]["input"];
    assert_eq!(input["postId"], "1");
    assert_eq!(input["body"], "Hi");
    let id = input["id"].as_u64().expect("numeric client id");
    assert!((10_000..=99_999).contains(&id));
}

#[tokio::test]
async fn rejected_update_surfaces_the_message() {
    let (url, _recorded) = spawn_server().await;
    let mut system = ConsoleSystem::remote(&url, CreateIdPolicy::ServerAssigned, 8);
    let users = system.mount_users();

    let err = shell::update(&users, "1", &["name=Ana Lima".to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "users are read-only");

    // The edit stays open with the submitted values.
    let state = users.snapshot();
    assert_eq!(state.editing_id(), Some(&UserId(1)));
    assert_eq!(state.items().len(), 1);
}
