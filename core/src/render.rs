//! Markup projection of the store and page state.
//!
//! # Design
//! Every function here is pure: the same store and page state always yield
//! the same markup. Interactive controls are tagged with `data-action` and
//! `data-id`; the host routes events back through [`Action::parse`] instead
//! of embedding serialized todos in the markup.
//!
//! Text is inserted verbatim.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, Utc};

use crate::app::Action;
use crate::page::{Banner, BannerKind, EditForm, Modal, PageState};
use crate::present::{format_date, Priority};
use crate::store::TodoStore;
use crate::types::Todo;

pub const NO_DESCRIPTION: &str = "Sin descripción";

#[derive(Debug, Clone)]
pub struct Renderer {
    zone: FixedOffset,
}

impl Renderer {
    pub fn new(zone: FixedOffset) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> &FixedOffset {
        &self.zone
    }

    /// The list section: count plus either the rows or the empty state.
    pub fn list(&self, todos: &[Todo]) -> String {
        let mut out = format!(r#"<span id="todoCount">{}</span>"#, todos.len());
        if todos.is_empty() {
            out.push_str(r#"<div id="emptyState" class="empty-state">No hay todos todavía</div>"#);
            return out;
        }
        out.push_str(r#"<div id="todoListContainer"><div id="todoList">"#);
        for todo in todos {
            out.push_str(&self.row(todo));
        }
        out.push_str("</div></div>");
        out
    }

    pub fn row(&self, todo: &Todo) -> String {
        let done = if todo.is_completed { " completed" } else { "" };
        let checked = if todo.is_completed { " checked" } else { "" };
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<div class="todo-item"><input type="checkbox" class="todo-checkbox"{checked} {toggle}>"#,
            toggle = action_attrs(Action::Toggle(todo.id)),
        );
        let _ = write!(
            out,
            r#"<div class="todo-content"><div class="todo-header"><div class="todo-info"><span class="todo-id">ID: {id}</span><h3 class="todo-title{done}">{title}</h3></div>{badge}</div>"#,
            id = todo.id,
            title = todo.title,
            badge = priority_badge(todo.priority),
        );
        if let Some(description) = todo.description_text() {
            let _ = write!(out, r#"<p class="todo-description{done}">{description}</p>"#);
        }
        let _ = write!(
            out,
            r#"<div class="todo-meta"><span>📅 Vence: {due}</span><span>🕐 Creado: {created}</span></div></div>"#,
            due = format_date(&todo.due_at, &self.zone),
            created = format_date(&todo.created_at, &self.zone),
        );
        let _ = write!(
            out,
            r#"<div class="todo-actions"><button class="btn btn-view" {view}>Ver</button><button class="btn btn-edit" {edit}>Editar</button><button class="btn btn-delete" {delete}>Eliminar</button></div></div>"#,
            view = action_attrs(Action::View(todo.id)),
            edit = action_attrs(Action::Edit(todo.id)),
            delete = action_attrs(Action::Delete(todo.id)),
        );
        out
    }

    /// Labeled detail rows shared by the search card and the view modal.
    pub fn detail_rows(&self, todo: &Todo) -> String {
        let status = if todo.is_completed { "✅ Completado" } else { "⏳ Pendiente" };
        let rows = [
            ("ID", todo.id.to_string()),
            ("Título", todo.title.clone()),
            ("Descripción", todo.description_text().unwrap_or(NO_DESCRIPTION).to_string()),
            ("Estado", status.to_string()),
            ("Prioridad", priority_badge(todo.priority)),
            ("Fecha de vencimiento", format_date(&todo.due_at, &self.zone)),
            ("Creado", format_date(&todo.created_at, &self.zone)),
            ("Actualizado", format_date(&todo.updated_at, &self.zone)),
        ];
        rows.iter()
            .map(|(label, value)| {
                format!(r#"<div class="detail-row"><span class="detail-label">{label}:</span><span class="detail-value">{value}</span></div>"#)
            })
            .collect()
    }

    pub fn search_found(&self, todo: &Todo) -> String {
        format!(
            r#"<div class="todo-detail-card"><h3>✅ Todo encontrado</h3>{}</div>"#,
            self.detail_rows(todo)
        )
    }

    pub fn search_error(&self, message: &str) -> String {
        format!(r#"<div class="todo-detail-card not-found"><h3>❌ No encontrado</h3><p>{message}</p></div>"#)
    }

    pub fn view_modal(&self, todo: &Todo) -> String {
        format!(
            r#"{}<div class="modal-footer"><button class="btn btn-secondary" {}>Cerrar</button></div>"#,
            self.detail_rows(todo),
            action_attrs(Action::CloseView),
        )
    }

    pub fn edit_modal(&self, form: &EditForm) -> String {
        let checked = if form.is_completed { " checked" } else { "" };
        let options: String = [Priority::Low, Priority::Medium, Priority::High]
            .iter()
            .map(|tier| {
                let value = tier.value();
                let selected = if form.priority == value.to_string() { " selected" } else { "" };
                format!(r#"<option value="{value}"{selected}>{}</option>"#, tier.label())
            })
            .collect();
        format!(
            r#"<form id="editForm"><input type="hidden" id="editId" value="{id}"><input id="editTitle" value="{title}"><textarea id="editDescription">{description}</textarea><input type="checkbox" id="editCompleted"{checked}><select id="editPriority">{options}</select><input type="datetime-local" id="editDueAt" value="{due}"><button type="submit" class="btn">Guardar</button><button type="button" class="btn btn-secondary" {close}>Cancelar</button></form>"#,
            id = form.id,
            title = form.title,
            description = form.description,
            due = form.due_at,
            close = action_attrs(Action::CloseEdit),
        )
    }

    pub fn banner(&self, banner: &Banner) -> String {
        let (id, class) = match banner.kind {
            BannerKind::Success => ("successMessage", "message success show"),
            BannerKind::Error => ("errorMessage", "message error show"),
        };
        format!(r#"<div id="{id}" class="{class}">{}</div>"#, banner.message)
    }

    /// The whole page as of `now`; banners past their expiry are omitted.
    pub fn page(&self, page: &PageState, store: &TodoStore, now: DateTime<Utc>) -> String {
        let mut out = String::from("<main>");
        for banner in page.banners.iter().filter(|b| b.expires_at > now) {
            out.push_str(&self.banner(banner));
        }
        let form = &page.create_form;
        let _ = write!(
            out,
            r#"<form id="createForm"><input name="title" value="{}"><textarea name="description">{}</textarea><input name="priority" value="{}"><input type="datetime-local" name="dueAt" value="{}"></form>"#,
            form.title, form.description, form.priority, form.due_at,
        );
        out.push_str(r#"<form id="searchForm"><input id="searchId" type="number"></form>"#);
        if let Some(result) = &page.search_result {
            let _ = write!(out, r#"<div id="searchResult">{result}</div>"#);
        }
        if page.loading {
            out.push_str(r#"<div id="loading">Cargando…</div>"#);
        } else {
            out.push_str(&self.list(store.items()));
        }
        if let Modal::Open(content) = &page.view_modal {
            let _ = write!(out, r#"<div id="viewModal" class="modal show"><div id="viewModalContent">{content}</div></div>"#);
        }
        if let Modal::Open(form) = &page.edit_modal {
            let _ = write!(out, r#"<div id="editModal" class="modal show">{}</div>"#, self.edit_modal(form));
        }
        out.push_str("</main>");
        out
    }
}

fn priority_badge(raw: Option<i64>) -> String {
    let tier = Priority::from_raw(raw);
    format!(r#"<span class="priority-badge {}">{}</span>"#, tier.css_class(), tier.label())
}

fn action_attrs(action: Action) -> String {
    match action.id() {
        Some(id) => format!(r#"data-action="{}" data-id="{id}""#, action.kind()),
        None => format!(r#"data-action="{}""#, action.kind()),
    }
}
