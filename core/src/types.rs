//! Domain DTOs for the todo API.
//!
//! # Design
//! Field names follow the API's camelCase JSON. Timestamps stay as the raw
//! strings the server sent: a malformed date is a presentation concern
//! (rendered as "Invalid Date"), not a reason to reject the whole list.

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a todo.
pub type TodoId = i64;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    /// Raw priority tier. Anything other than 2 or 3 presents as Low.
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub due_at: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Todo {
    /// The complete representation of this todo as a replace payload, with
    /// every field resent unchanged.
    pub fn replacement(&self) -> ReplaceTodo {
        ReplaceTodo {
            title: self.title.clone(),
            description: self.description.clone(),
            is_completed: self.is_completed,
            priority: self.priority,
            due_at: self.due_at.clone(),
        }
    }

    /// Description text when present and non-empty.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// Request payload for creating a new todo. Completion is not settable here;
/// the server starts every todo as pending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub due_at: String,
}

/// Request payload for replacing an existing todo.
///
/// The update is a full overwrite: any field left at its default here is
/// cleared on the server, not preserved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceTodo {
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    pub due_at: String,
}

impl ReplaceTodo {
    /// Same payload with the completion flag flipped.
    pub fn toggled(mut self) -> Self {
        self.is_completed = !self.is_completed;
        self
    }
}

/// `{ "data": ... }` wrapper used by list, get and create responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}
