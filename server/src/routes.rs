use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use todo_core::{CreateTodo, Todo, TodoEnvelope, TodoList, TodoResource, UpdateTodo};

use crate::error::ApiErrorResponse;

type ApiResult<T> = Result<Json<T>, ApiErrorResponse>;

pub fn router(resource: TodoResource) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
        .with_state(resource)
}

async fn list_todos(State(resource): State<TodoResource>) -> ApiResult<TodoList> {
    let todos = resource.list().await?;
    Ok(Json(TodoList { todos }))
}

async fn create_todo(
    State(resource): State<TodoResource>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> ApiResult<Todo> {
    let Json(input) = payload?;
    Ok(Json(resource.create(input).await?))
}

// Ids stay raw strings here so a malformed id reaches the resource and
// becomes 404 rather than a path-extraction 400.
async fn get_todo(
    State(resource): State<TodoResource>,
    Path(id): Path<String>,
) -> ApiResult<TodoEnvelope> {
    let todo = resource.get(&id).await?;
    Ok(Json(TodoEnvelope { todo }))
}

async fn update_todo(
    State(resource): State<TodoResource>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> ApiResult<TodoEnvelope> {
    let Json(input) = payload?;
    let todo = resource.update(&id, input).await?;
    Ok(Json(TodoEnvelope { todo }))
}

async fn delete_todo(
    State(resource): State<TodoResource>,
    Path(id): Path<String>,
) -> ApiResult<TodoEnvelope> {
    let todo = resource.delete(&id).await?;
    Ok(Json(TodoEnvelope { todo }))
}
