//! Local read model of the todo list.
//!
//! The store only ever holds the result of the latest applied full-list
//! fetch. Every reload takes a ticket before the request goes out; a
//! response whose ticket is older than the one last applied is dropped, so
//! overlapping reloads cannot roll the list back.

use crate::types::{Todo, TodoId};

/// Generation number handed out by [`TodoStore::begin_reload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReloadTicket(u64);

#[derive(Debug, Default)]
pub struct TodoStore {
    items: Vec<Todo>,
    issued: u64,
    applied: u64,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_reload(&mut self) -> ReloadTicket {
        self.issued += 1;
        ReloadTicket(self.issued)
    }

    /// Swap in a freshly fetched list. Returns `false` when the ticket is
    /// stale and the list was discarded.
    pub fn replace(&mut self, ticket: ReloadTicket, items: Vec<Todo>) -> bool {
        if ticket.0 < self.applied {
            tracing::debug!(ticket = ticket.0, applied = self.applied, "discarding stale reload");
            return false;
        }
        self.applied = ticket.0;
        self.items = items;
        true
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.items.iter().find(|todo| todo.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
