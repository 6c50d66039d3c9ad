//! Client core for the todo web page.
//!
//! # Overview
//! Everything the page does short of touching the network: request
//! building and response parsing for the todo API, the local copy of the
//! list, markup rendering, and the handlers that tie user actions to API
//! round-trips. The host supplies a [`Transport`] and a [`Confirm`] prompt.
//!
//! # Design
//! - `TodoClient` is stateless; `build_*` produces a request, `parse_*`
//!   consumes a response.
//! - `TodoStore` is only ever replaced wholesale after a list fetch.
//! - `App` runs each action to completion: request, full reload, banner.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod page;
pub mod present;
pub mod render;
pub mod store;
pub mod types;

pub use app::{Action, App, Confirm};
pub use client::TodoClient;
pub use config::Config;
pub use error::{ApiError, TransportError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use page::{CreateForm, EditForm, PageState};
pub use render::Renderer;
pub use store::TodoStore;
pub use types::{CreateTodo, ReplaceTodo, Todo, TodoId};
