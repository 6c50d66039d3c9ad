use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub priority: i64,
    pub due_at: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default)]
    pub due_at: Option<String>,
}

/// Full replacement. Omitted fields fall back to their defaults.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default)]
    pub due_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

fn default_priority() -> i64 {
    1
}

#[derive(Debug, Default)]
pub struct Todos {
    last_id: i64,
    items: BTreeMap<i64, Todo>,
}

pub type Db = Arc<RwLock<Todos>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Todos::default()));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(replace_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn list_todos(State(db): State<Db>) -> Json<Envelope<Vec<Todo>>> {
    let todos = db.read().await;
    Json(Envelope {
        data: todos.items.values().cloned().collect(),
    })
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Envelope<Todo>>), StatusCode> {
    if input.title.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut todos = db.write().await;
    todos.last_id += 1;
    let stamp = now();
    let todo = Todo {
        id: todos.last_id,
        title: input.title,
        description: input.description,
        is_completed: false,
        priority: input.priority,
        due_at: input.due_at.unwrap_or_else(|| stamp.clone()),
        created_at: stamp.clone(),
        updated_at: stamp,
    };
    todos.items.insert(todo.id, todo.clone());
    tracing::info!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(Envelope { data: todo })))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<Todo>>, StatusCode> {
    let todos = db.read().await;
    todos
        .items
        .get(&id)
        .cloned()
        .map(|data| Json(Envelope { data }))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn replace_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<ReplaceTodo>,
) -> Result<Json<Envelope<Todo>>, StatusCode> {
    if input.title.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut todos = db.write().await;
    let todo = todos.items.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let stamp = now();
    todo.title = input.title;
    todo.description = input.description;
    todo.is_completed = input.is_completed;
    todo.priority = input.priority;
    todo.due_at = input.due_at.unwrap_or_else(|| stamp.clone());
    todo.updated_at = stamp;
    tracing::info!(id, "replaced todo");
    Ok(Json(Envelope { data: todo.clone() }))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut todos = db.write().await;
    let removed = todos.items.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    tracing::info!(id = removed.id, "deleted todo");
    Ok(StatusCode::NO_CONTENT)
}
