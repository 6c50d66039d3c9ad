//! Interaction handlers: user actions in, API round-trips and page updates
//! out.
//!
//! # Design
//! Every mutation is followed by a full reload of the list; nothing patches
//! the store in place. Handlers never return errors: failures are logged at
//! this boundary and surfaced as banners, and the page stays usable.

use chrono::{DateTime, Utc};

use crate::client::TodoClient;
use crate::error::{ApiError, ValidationError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::page::{BannerKind, CreateForm, EditForm, ModalKind, PageState};
use crate::render::Renderer;
use crate::store::TodoStore;
use crate::types::{ReplaceTodo, Todo, TodoId};

pub const DELETE_PROMPT: &str = "¿Estás seguro de eliminar este todo?";

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// A control event routed back from the rendered markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Toggle(TodoId),
    View(TodoId),
    Edit(TodoId),
    Delete(TodoId),
    CloseView,
    CloseEdit,
}

impl Action {
    /// Look up an action from its `data-action` / `data-id` pair.
    pub fn parse(kind: &str, id: Option<&str>) -> Option<Self> {
        let id = || id.and_then(|raw| raw.trim().parse::<TodoId>().ok());
        match kind {
            "toggle" => id().map(Action::Toggle),
            "view" => id().map(Action::View),
            "edit" => id().map(Action::Edit),
            "delete" => id().map(Action::Delete),
            "close-view" => Some(Action::CloseView),
            "close-edit" => Some(Action::CloseEdit),
            _ => None,
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            Action::Toggle(_) => "toggle",
            Action::View(_) => "view",
            Action::Edit(_) => "edit",
            Action::Delete(_) => "delete",
            Action::CloseView => "close-view",
            Action::CloseEdit => "close-edit",
        }
    }

    pub fn id(self) -> Option<TodoId> {
        match self {
            Action::Toggle(id) | Action::View(id) | Action::Edit(id) | Action::Delete(id) => Some(id),
            Action::CloseView | Action::CloseEdit => None,
        }
    }
}

pub struct App<T, C> {
    client: TodoClient,
    transport: T,
    confirm: C,
    renderer: Renderer,
    store: TodoStore,
    page: PageState,
    clock: fn() -> DateTime<Utc>,
}

impl<T: Transport, C: Confirm> App<T, C> {
    pub fn new(client: TodoClient, transport: T, confirm: C, renderer: Renderer) -> Self {
        Self {
            client,
            transport,
            confirm,
            renderer,
            store: TodoStore::new(),
            page: PageState::default(),
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Full page markup as of the app clock.
    pub fn render(&self) -> String {
        self.renderer.page(&self.page, &self.store, (self.clock)())
    }

    /// Expire banners whose display time has passed.
    pub fn tick(&mut self) {
        let now = (self.clock)();
        self.page.banners.expire(now);
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(action = action.kind(), id = ?action.id(), "dispatch");
        match action {
            Action::Toggle(id) => self.toggle(id),
            Action::View(id) => self.view(id),
            Action::Edit(id) => self.open_edit(id),
            Action::Delete(id) => self.delete(id),
            Action::CloseView => self.close(ModalKind::View),
            Action::CloseEdit => self.close(ModalKind::Edit),
        }
    }

    /// Refetch the whole list and swap it into the store. On failure the
    /// store keeps its last good contents.
    pub fn load_todos(&mut self) {
        let ticket = self.store.begin_reload();
        let request = self.client.build_list_todos();
        let result = self
            .send(request)
            .and_then(|response| self.client.parse_list_todos(response));
        match result {
            Ok(todos) => {
                let count = todos.len();
                if self.store.replace(ticket, todos) {
                    tracing::debug!(count, "todo list reloaded");
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load todos");
                self.error("Error al cargar los todos");
            }
        }
        self.page.loading = false;
    }

    pub fn search(&mut self, raw_id: &str) {
        let id = match raw_id.trim().parse::<TodoId>() {
            Ok(id) => id,
            Err(_) => {
                let message = ValidationError::InvalidId(raw_id.to_string()).to_string();
                self.page.search_result = Some(self.renderer.search_error(&message));
                self.error(message);
                return;
            }
        };
        match self.fetch_todo(id) {
            Ok(todo) => {
                self.page.search_result = Some(self.renderer.search_found(&todo));
                self.success(format!("Todo con ID {id} encontrado exitosamente"));
            }
            Err(err) => {
                tracing::error!(id, error = %err, "search failed");
                let message = lookup_message(id, &err);
                self.page.search_result = Some(self.renderer.search_error(&message));
                self.error(message);
            }
        }
    }

    /// Submit the create form. The form is kept on failure and reset only
    /// after the server accepted the todo.
    pub fn submit_create(&mut self, form: CreateForm) {
        let payload = form.to_payload((self.clock)(), self.renderer.zone());
        self.page.create_form = form;
        let payload = match payload {
            Ok(payload) => payload,
            Err(err) => {
                self.error(err.to_string());
                return;
            }
        };
        let result = self
            .client
            .build_create_todo(&payload)
            .and_then(|request| self.send(request))
            .and_then(|response| self.client.parse_create_todo(response));
        match result {
            Ok(created) => {
                tracing::info!(id = created.id, "todo created");
                self.success(format!("✅ Todo creado exitosamente con ID: {}", created.id));
                self.load_todos();
                self.page.create_form = CreateForm::default();
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to create todo");
                self.error("Error al crear el todo");
            }
        }
    }

    /// Flip completion, resending every other field as stored.
    pub fn toggle(&mut self, id: TodoId) {
        let Some(todo) = self.store.get(id) else {
            tracing::debug!(id, "toggle for unknown todo ignored");
            return;
        };
        let payload = todo.replacement().toggled();
        self.replace(id, payload);
    }

    /// Open the edit modal pre-filled from the store. Unknown ids leave it
    /// closed.
    pub fn open_edit(&mut self, id: TodoId) {
        let Some(todo) = self.store.get(id) else {
            tracing::debug!(id, "edit for unknown todo ignored");
            return;
        };
        let form = EditForm::prefill(todo, self.renderer.zone());
        self.page.edit_modal.open(form);
    }

    /// Send the edited form. An open modal keeps the values as submitted;
    /// a closed one stays closed.
    pub fn submit_edit(&mut self, form: EditForm) {
        let payload = form.to_payload(self.renderer.zone());
        if self.page.edit_modal.is_open() {
            self.page.edit_modal.open(form);
        }
        match payload {
            Ok((id, payload)) => self.replace(id, payload),
            Err(err) => self.error(err.to_string()),
        }
    }

    pub fn view(&mut self, id: TodoId) {
        match self.fetch_todo(id) {
            Ok(todo) => {
                let content = self.renderer.view_modal(&todo);
                self.page.view_modal.open(content);
            }
            Err(err) => {
                tracing::error!(id, error = %err, "failed to load todo detail");
                self.error(format!("Error al cargar el detalle del todo: {}", lookup_message(id, &err)));
            }
        }
    }

    pub fn delete(&mut self, id: TodoId) {
        if !self.confirm.confirm(DELETE_PROMPT) {
            return;
        }
        let request = self.client.build_delete_todo(id);
        let result = self
            .send(request)
            .and_then(|response| self.client.parse_delete_todo(response));
        match result {
            Ok(()) => {
                tracing::info!(id, "todo deleted");
                self.success("✅ Todo eliminado exitosamente");
                self.load_todos();
            }
            Err(err) => {
                tracing::error!(id, error = %err, "failed to delete todo");
                self.error("Error al eliminar el todo");
            }
        }
    }

    /// Close a modal; closing the edit modal also resets its form.
    pub fn close(&mut self, modal: ModalKind) {
        match modal {
            ModalKind::View => self.page.view_modal.close(),
            ModalKind::Edit => self.page.edit_modal.close(),
        }
    }

    /// A click on a modal's backdrop closes it; clicks inside do not.
    pub fn backdrop_click(&mut self, target_id: &str) {
        match target_id {
            "viewModal" => self.close(ModalKind::View),
            "editModal" => self.close(ModalKind::Edit),
            _ => {}
        }
    }

    fn replace(&mut self, id: TodoId, payload: ReplaceTodo) {
        let result = self
            .client
            .build_replace_todo(id, &payload)
            .and_then(|request| self.send(request))
            .and_then(|response| self.client.parse_replace_todo(response));
        match result {
            Ok(()) => {
                tracing::info!(id, "todo updated");
                self.success("✅ Todo actualizado exitosamente");
                self.load_todos();
                self.close(ModalKind::Edit);
            }
            Err(err) => {
                tracing::error!(id, error = %err, "failed to update todo");
                self.error("Error al actualizar el todo");
            }
        }
    }

    fn fetch_todo(&mut self, id: TodoId) -> Result<Todo, ApiError> {
        let request = self.client.build_get_todo(id);
        let response = self.send(request)?;
        self.client.parse_get_todo(id, response)
    }

    fn send(&mut self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.as_str();
        let path = request.path.clone();
        let response = self.transport.execute(request)?;
        tracing::debug!(method, %path, status = response.status, "response");
        Ok(response)
    }

    fn success(&mut self, message: impl Into<String>) {
        let now = (self.clock)();
        self.page.banners.show(BannerKind::Success, message, now);
    }

    fn error(&mut self, message: impl Into<String>) {
        let now = (self.clock)();
        self.page.banners.show(BannerKind::Error, message, now);
    }
}

/// User message for a failed get-by-id.
fn lookup_message(id: TodoId, err: &ApiError) -> String {
    match err {
        ApiError::NotFound { .. } => format!("No se encontró ningún todo con el ID {id}"),
        _ => format!("Error al buscar el todo {id}"),
    }
}
