use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use todo_core::{
    InMemoryStore, NewTodo, StoreError, Todo, TodoChanges, TodoId, TodoResource, TodoStore,
};
use todo_server::app;
use tower::ServiceExt;

struct Fixture {
    app: Router,
    store: Arc<InMemoryStore>,
    open: Todo,
    closed: Todo,
}

/// Two seeded todos: one open, one closed at t=123.
fn fixture() -> Fixture {
    let open = Todo::open(TodoId::new(), "First test todo");
    let closed = Todo::closed(TodoId::new(), "Second test todo", 123);
    let store = Arc::new(InMemoryStore::with_todos([open.clone(), closed.clone()]));
    let app = app(TodoResource::new(store.clone()));
    Fixture {
        app,
        store,
        open,
        closed,
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

async fn stored_count(store: &InMemoryStore) -> usize {
    store.find_all().await.unwrap().len()
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_stored_todo() {
    let f = fixture();
    let text = "I wanna do something big";
    let resp = f
        .app
        .oneshot(json_request("POST", "/todos", json!({ "text": text })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["text"], text);
    assert_eq!(body["completed"], false);
    assert_eq!(body["completedAt"], Value::Null);

    let todos = f.store.find_all().await.unwrap();
    let matching: Vec<_> = todos.iter().filter(|todo| todo.text == text).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(body["_id"], matching[0].id.to_string());
}

#[tokio::test]
async fn create_todo_with_empty_text_returns_400() {
    let f = fixture();
    let resp = f
        .app
        .oneshot(json_request("POST", "/todos", json!({ "text": "" })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["code"], "VALIDATION_ERROR");
    assert_eq!(stored_count(&f.store).await, 2);
}

#[tokio::test]
async fn create_todo_with_non_string_text_returns_400() {
    let f = fixture();
    let resp = f
        .app
        .oneshot(json_request("POST", "/todos", json!({ "text": 42 })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(stored_count(&f.store).await, 2);
}

#[tokio::test]
async fn create_todo_with_malformed_json_returns_400() {
    let f = fixture();
    let req = Request::builder()
        .method("POST")
        .uri("/todos")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body("{\"text\":".to_string())
        .unwrap();
    let resp = f.app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["code"], "INVALID_BODY");
}

// --- list ---

#[tokio::test]
async fn list_todos_wraps_collection() {
    let f = fixture();
    let resp = f.app.oneshot(empty_request("GET", "/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["todos"].as_array().unwrap().len(), 2);
}

// --- get ---

#[tokio::test]
async fn get_todo_returns_doc() {
    let f = fixture();
    let resp = f
        .app
        .oneshot(empty_request("GET", &format!("/todos/{}", f.open.id)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["todo"]["text"], f.open.text);
}

#[tokio::test]
async fn get_unknown_todo_returns_404() {
    let f = fixture();
    let resp = f
        .app
        .oneshot(empty_request("GET", &format!("/todos/{}", TodoId::new())))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_malformed_id_returns_404() {
    let f = fixture();
    let resp = f.app.oneshot(empty_request("GET", "/todos/123")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["code"], "NOT_FOUND");
}

// --- delete ---

#[tokio::test]
async fn delete_todo_echoes_id() {
    let f = fixture();
    let id = f.closed.id.to_string();
    let resp = f
        .app
        .oneshot(empty_request("DELETE", &format!("/todos/{id}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["todo"]["_id"], id.as_str());
    assert_eq!(f.store.find_by_id(&f.closed.id).await.unwrap(), None);
}

#[tokio::test]
async fn delete_unknown_todo_returns_404() {
    let f = fixture();
    let resp = f
        .app
        .oneshot(empty_request("DELETE", &format!("/todos/{}", TodoId::new())))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(stored_count(&f.store).await, 2);
}

#[tokio::test]
async fn delete_malformed_id_returns_404() {
    let f = fixture();
    let resp = f.app.oneshot(empty_request("DELETE", "/todos/123")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(stored_count(&f.store).await, 2);
}

// --- update ---

#[tokio::test]
async fn update_todo_sets_text_and_timestamp() {
    let f = fixture();
    let text = "Test updated??";
    let resp = f
        .app
        .oneshot(json_request(
            "PATCH",
            &format!("/todos/{}", f.open.id),
            json!({ "text": text, "completed": true }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let todo = &body["todo"];
    assert_eq!(todo["text"], text);
    assert_eq!(todo["completed"], true);
    assert!(todo["completedAt"].is_i64());
}

#[tokio::test]
async fn update_todo_clears_timestamp_when_reopened() {
    let f = fixture();
    let resp = f
        .app
        .oneshot(json_request(
            "PATCH",
            &format!("/todos/{}", f.closed.id),
            json!({ "completed": false }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let todo = &body["todo"];
    assert_eq!(todo["completed"], false);
    assert_eq!(todo["completedAt"], Value::Null);
}

#[tokio::test]
async fn update_todo_ignores_unlisted_fields() {
    let f = fixture();
    let resp = f
        .app
        .oneshot(json_request(
            "PATCH",
            &format!("/todos/{}", f.closed.id),
            json!({ "completedAt": 5, "_id": "abc", "text": "Renamed" }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let todo = &body["todo"];
    assert_eq!(todo["_id"], f.closed.id.to_string());
    assert_eq!(todo["text"], "Renamed");
    assert_eq!(todo["completedAt"], 123);
}

#[tokio::test]
async fn update_todo_with_blank_text_returns_400() {
    let f = fixture();
    let resp = f
        .app
        .oneshot(json_request(
            "PATCH",
            &format!("/todos/{}", f.open.id),
            json!({ "text": "   " }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        f.store.find_by_id(&f.open.id).await.unwrap(),
        Some(f.open.clone())
    );
}

#[tokio::test]
async fn update_malformed_id_returns_404() {
    let f = fixture();
    let resp = f
        .app
        .oneshot(json_request("PATCH", "/todos/123", json!({ "completed": true })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- store failure ---

struct UnavailableStore;

#[async_trait]
impl TodoStore for UnavailableStore {
    async fn insert(&self, _: NewTodo) -> Result<Todo, StoreError> {
        Err(StoreError::Unavailable("connection reset".into()))
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        Err(StoreError::Unavailable("connection reset".into()))
    }

    async fn find_by_id(&self, _: &TodoId) -> Result<Option<Todo>, StoreError> {
        Err(StoreError::Unavailable("connection reset".into()))
    }

    async fn delete_by_id(&self, _: &TodoId) -> Result<Option<Todo>, StoreError> {
        Err(StoreError::Unavailable("connection reset".into()))
    }

    async fn update_by_id(&self, _: &TodoId, _: TodoChanges) -> Result<Option<Todo>, StoreError> {
        Err(StoreError::Unavailable("connection reset".into()))
    }
}

#[tokio::test]
async fn store_failure_returns_500() {
    let app = app(TodoResource::new(Arc::new(UnavailableStore)));
    let resp = app.oneshot(empty_request("GET", "/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["code"], "INTERNAL_ERROR");
}

// --- seeded lifecycle ---

#[tokio::test]
async fn seeded_lifecycle() {
    let f = fixture();
    let closed_uri = format!("/todos/{}", f.closed.id);

    let resp = f.app.clone().oneshot(empty_request("GET", "/todos")).await.unwrap();
    assert_eq!(body_json(resp).await["todos"].as_array().unwrap().len(), 2);

    let resp = f
        .app
        .clone()
        .oneshot(json_request("PATCH", &closed_uri, json!({ "completed": false })))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["todo"]["completedAt"], Value::Null);

    let resp = f
        .app
        .clone()
        .oneshot(empty_request("DELETE", &closed_uri))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = f
        .app
        .clone()
        .oneshot(empty_request("GET", &closed_uri))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = f
        .app
        .oneshot(empty_request("GET", &format!("/todos/{}", f.open.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["todo"]["text"], f.open.text);
}
