//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Any 2xx status counts as success; the
//! body is only inspected for the operations that return data.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Envelope, ReplaceTodo, Todo, TodoId};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("{}/todos", self.base_url))
    }

    pub fn build_get_todo(&self, id: TodoId) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("{}/todos/{id}", self.base_url))
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, format!("{}/todos", self.base_url), input)
    }

    pub fn build_replace_todo(&self, id: TodoId, input: &ReplaceTodo) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Put, format!("{}/todos/{id}", self.base_url), input)
    }

    pub fn build_delete_todo(&self, id: TodoId) -> HttpRequest {
        self.bare(HttpMethod::Delete, format!("{}/todos/{id}", self.base_url))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        unwrap_envelope(&response)
    }

    /// 404 maps to `NotFound { id }`, the only place it is singled out.
    pub fn parse_get_todo(&self, id: TodoId, response: HttpResponse) -> Result<Todo, ApiError> {
        if response.status == 404 {
            return Err(ApiError::NotFound { id });
        }
        check_status(&response)?;
        unwrap_envelope(&response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        unwrap_envelope(&response)
    }

    pub fn parse_replace_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn bare(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    fn json<B: Serialize>(&self, method: HttpMethod, path: String, input: &B) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map any non-2xx status to `HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn unwrap_envelope<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str::<Envelope<T>>(&response.body)
        .map(|envelope| envelope.data)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))
}
