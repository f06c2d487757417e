use std::sync::Arc;

use axum::{
    extract::{FromRequest, FromRequestParts, State},
    http::HeaderValue,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};
use tracing::debug;

use crate::error::{ApiError, StorageError};
use crate::models::{DeleteOutcome, NewTodo, Todo, TodoChanges};
use crate::service::TodoService;

#[derive(Clone)]
struct AppState {
    service: Arc<dyn TodoService>,
}

/// `axum::Json` whose rejection is answered as `{"detail": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
struct JsonBody<T>(T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
struct Query<T>(T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
struct Path<T>(T);

#[derive(Deserialize)]
struct SearchParams {
    keyword: String,
}

#[derive(Deserialize)]
struct FilterParams {
    completed: bool,
}

pub fn router(service: Arc<dyn TodoService>, cors_origin: HeaderValue) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/todos", get(get_todos).post(add_todo))
        .route("/todos/search", get(search_todos))
        .route("/todos/filter", get(filter_todos))
        .route("/todos/:id", put(update_todo).delete(delete_todo))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Runs one business call on the blocking pool. Storage failures and a
/// panicked task both come back as `ApiError`.
async fn run<T, F>(state: &AppState, call: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn TodoService) -> Result<T, StorageError> + Send + 'static,
{
    let service = Arc::clone(&state.service);
    Ok(tokio::task::spawn_blocking(move || call(service.as_ref())).await??)
}

async fn add_todo(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewTodo>,
) -> Result<Json<Todo>, ApiError> {
    let todo = run(&state, move |service| {
        service.add_todo(&body.title, body.content.as_deref())
    })
    .await?;
    Ok(Json(todo))
}

async fn get_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = run(&state, |service| service.get_todos()).await?;
    Ok(Json(todos))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(changes): JsonBody<TodoChanges>,
) -> Result<Json<Option<Todo>>, ApiError> {
    let todo = run(&state, move |service| service.update_todo(id, &changes)).await?;
    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let outcome = run(&state, move |service| service.delete_todo(id)).await?;
    if !outcome.deleted {
        debug!(id, "delete requested for unknown todo");
    }
    Ok(Json(outcome))
}

async fn search_todos(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = run(&state, move |service| service.search_todos(&params.keyword)).await?;
    Ok(Json(todos))
}

async fn filter_todos(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = run(&state, move |service| {
        service.filter_todos_by_status(params.completed)
    })
    .await?;
    Ok(Json(todos))
}
