//! Mutable UI state of the single page: banners, modals, forms and the
//! search result slot.

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

use crate::error::ValidationError;
use crate::present::{from_input_value, to_input_value, to_iso, Priority};
use crate::types::{CreateTodo, ReplaceTodo, Todo, TodoId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

impl BannerKind {
    /// How long a banner of this kind stays visible.
    pub fn ttl(self) -> TimeDelta {
        match self {
            BannerKind::Success => TimeDelta::seconds(3),
            BannerKind::Error => TimeDelta::seconds(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

/// One success slot and one error slot; showing a banner replaces whatever
/// occupied its slot.
#[derive(Debug, Clone, Default)]
pub struct Banners {
    success: Option<Banner>,
    error: Option<Banner>,
}

impl Banners {
    pub fn show(&mut self, kind: BannerKind, message: impl Into<String>, now: DateTime<Utc>) {
        let banner = Banner {
            kind,
            message: message.into(),
            expires_at: now + kind.ttl(),
        };
        match kind {
            BannerKind::Success => self.success = Some(banner),
            BannerKind::Error => self.error = Some(banner),
        }
    }

    /// Drop banners whose time is up.
    pub fn expire(&mut self, now: DateTime<Utc>) {
        for slot in [&mut self.success, &mut self.error] {
            if slot.as_ref().is_some_and(|b| b.expires_at <= now) {
                *slot = None;
            }
        }
    }

    pub fn success(&self) -> Option<&Banner> {
        self.success.as_ref()
    }

    pub fn error(&self) -> Option<&Banner> {
        self.error.as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Banner> {
        self.success.iter().chain(self.error.iter())
    }
}

/// Open/closed state of a modal, holding whatever the open modal shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal<T> {
    Closed,
    Open(T),
}

impl<T> Default for Modal<T> {
    fn default() -> Self {
        Modal::Closed
    }
}

impl<T> Modal<T> {
    pub fn open(&mut self, content: T) {
        *self = Modal::Open(content);
    }

    pub fn close(&mut self) {
        *self = Modal::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open(_))
    }

    pub fn content(&self) -> Option<&T> {
        match self {
            Modal::Open(content) => Some(content),
            Modal::Closed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    View,
    Edit,
}

/// Raw values of the create form, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateForm {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub due_at: String,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: "1".to_string(),
            due_at: String::new(),
        }
    }
}

impl CreateForm {
    /// Trim, validate and build the create payload. A blank due date
    /// becomes `now`.
    pub fn to_payload(&self, now: DateTime<Utc>, zone: &FixedOffset) -> Result<CreateTodo, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let due_at = match self.due_at.trim() {
            "" => to_iso(now),
            raw => from_input_value(raw, zone).ok_or_else(|| ValidationError::InvalidDueAt(raw.to_string()))?,
        };
        Ok(CreateTodo {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            priority: parse_priority(&self.priority)?,
            due_at,
        })
    }
}

/// Raw values of the edit modal's form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub priority: String,
    pub due_at: String,
}

impl EditForm {
    /// Pre-fill from a stored todo, with the due date in the display zone.
    /// The priority is the tier the todo is shown as, so a missing or
    /// out-of-range value starts out as Low.
    pub fn prefill(todo: &Todo, zone: &FixedOffset) -> Self {
        Self {
            id: todo.id.to_string(),
            title: todo.title.clone(),
            description: todo.description.clone().unwrap_or_default(),
            is_completed: todo.is_completed,
            priority: Priority::from_raw(todo.priority).value().to_string(),
            due_at: to_input_value(&todo.due_at, zone),
        }
    }

    pub fn to_payload(&self, zone: &FixedOffset) -> Result<(TodoId, ReplaceTodo), ValidationError> {
        let id = self
            .id
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidId(self.id.clone()))?;
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let due_at =
            from_input_value(&self.due_at, zone).ok_or_else(|| ValidationError::InvalidDueAt(self.due_at.clone()))?;
        Ok((
            id,
            ReplaceTodo {
                title: title.to_string(),
                description: Some(self.description.trim().to_string()),
                is_completed: self.is_completed,
                priority: Some(parse_priority(&self.priority)?),
                due_at,
            },
        ))
    }
}

fn parse_priority(raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidPriority(raw.to_string()))
}

/// Everything on the page that is not the todo list itself.
#[derive(Debug, Clone)]
pub struct PageState {
    pub loading: bool,
    pub banners: Banners,
    pub create_form: CreateForm,
    pub search_result: Option<String>,
    pub view_modal: Modal<String>,
    pub edit_modal: Modal<EditForm>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            loading: true,
            banners: Banners::default(),
            create_form: CreateForm::default(),
            search_result: None,
            view_modal: Modal::Closed,
            edit_modal: Modal::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn banners_expire_per_kind() {
        let mut banners = Banners::default();
        banners.show(BannerKind::Success, "ok", now());
        banners.show(BannerKind::Error, "bad", now());
        banners.expire(now() + TimeDelta::seconds(3));
        assert!(banners.success().is_none());
        assert_eq!(banners.error().unwrap().message, "bad");
        banners.expire(now() + TimeDelta::seconds(5));
        assert_eq!(banners.iter().count(), 0);
    }

    #[test]
    fn modal_last_open_wins() {
        let mut modal = Modal::Closed;
        modal.open("a");
        modal.open("b");
        assert_eq!(modal.content(), Some(&"b"));
        modal.close();
        assert!(!modal.is_open());
    }

    #[test]
    fn create_form_trims_and_defaults_due_date() {
        let form = CreateForm {
            title: "  Llamar  ".to_string(),
            description: " al banco ".to_string(),
            priority: "2".to_string(),
            due_at: "   ".to_string(),
        };
        let payload = form.to_payload(now(), &utc()).unwrap();
        assert_eq!(payload.title, "Llamar");
        assert_eq!(payload.description, "al banco");
        assert_eq!(payload.priority, 2);
        assert_eq!(payload.due_at, "2024-03-01T09:30:00.000Z");
    }

    #[test]
    fn create_form_rejects_blank_title_and_bad_priority() {
        let mut form = CreateForm {
            title: "   ".to_string(),
            ..CreateForm::default()
        };
        assert_eq!(form.to_payload(now(), &utc()), Err(ValidationError::EmptyTitle));
        form.title = "x".to_string();
        form.priority = "alta".to_string();
        assert!(matches!(form.to_payload(now(), &utc()), Err(ValidationError::InvalidPriority(_))));
    }

    #[test]
    fn out_of_range_priority_is_accepted() {
        let form = CreateForm {
            title: "x".to_string(),
            priority: "9".to_string(),
            ..CreateForm::default()
        };
        assert_eq!(form.to_payload(now(), &utc()).unwrap().priority, 9);
    }

    #[test]
    fn edit_form_roundtrips_through_prefill() {
        let todo = Todo {
            id: 4,
            title: "Revisar".to_string(),
            description: None,
            is_completed: true,
            priority: Some(3),
            due_at: "2024-03-15T10:00:00Z".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        let form = EditForm::prefill(&todo, &utc());
        assert_eq!(form.due_at, "2024-03-15T10:00");
        assert_eq!(form.description, "");
        let (id, payload) = form.to_payload(&utc()).unwrap();
        assert_eq!(id, 4);
        assert!(payload.is_completed);
        assert_eq!(payload.priority, Some(3));
        assert_eq!(payload.due_at, "2024-03-15T10:00:00.000Z");
    }

    #[test]
    fn edit_form_prefills_priority_from_tier() {
        let mut todo = Todo {
            id: 5,
            title: "Sin prioridad".to_string(),
            description: None,
            is_completed: false,
            priority: None,
            due_at: "2024-03-15T10:00:00Z".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(EditForm::prefill(&todo, &utc()).priority, "1");
        todo.priority = Some(7);
        assert_eq!(EditForm::prefill(&todo, &utc()).priority, "1");
        todo.priority = Some(2);
        let (_, payload) = EditForm::prefill(&todo, &utc()).to_payload(&utc()).unwrap();
        assert_eq!(payload.priority, Some(2));
    }

    #[test]
    fn edit_form_requires_due_date() {
        let form = EditForm {
            id: "1".to_string(),
            title: "t".to_string(),
            priority: "1".to_string(),
            ..EditForm::default()
        };
        assert!(matches!(form.to_payload(&utc()), Err(ValidationError::InvalidDueAt(_))));
    }
}
