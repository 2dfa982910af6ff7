use std::{cell::RefCell, rc::Rc};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::config::ToastDurations;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub level: ToastLevel,
    /// Milliseconds until the toast expires, `None` stays until dismissed
    pub duration: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let duration = i64::try_from(self.duration?).ok()?;
        self.created_at
            .checked_add_signed(Duration::milliseconds(duration))
    }
}

/// Queue of notifications shown to the user. Clones share the same queue.
#[derive(Clone, Debug, Default)]
pub struct Toasts {
    toasts: Rc<RefCell<Vec<Toast>>>,
    durations: ToastDurations,
}

impl Toasts {
    pub fn new(durations: ToastDurations) -> Self {
        Self {
            toasts: Rc::default(),
            durations,
        }
    }

    pub fn add(&self, message: impl Into<String>, level: ToastLevel, duration: Option<u64>) -> Uuid {
        self.add_at(message, level, duration, Utc::now())
    }

    pub fn add_at(
        &self,
        message: impl Into<String>,
        level: ToastLevel,
        duration: Option<u64>,
        now: DateTime<Utc>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.toasts.borrow_mut().push(Toast {
            id,
            message: message.into(),
            level,
            duration,
            created_at: now,
        });
        id
    }

    pub fn remove(&self, id: Uuid) {
        let mut toasts = self.toasts.borrow_mut();
        if let Some(index) = toasts.iter().position(|t| t.id == id) {
            toasts.remove(index);
        }
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.add(message, ToastLevel::Info, Some(self.durations.info))
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.add(message, ToastLevel::Success, Some(self.durations.success))
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.add(message, ToastLevel::Warning, Some(self.durations.warning))
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.add(message, ToastLevel::Error, Some(self.durations.error))
    }

    pub fn current(&self) -> Vec<Toast> {
        self.toasts.borrow().clone()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.toasts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every toast whose duration has run out by `now`.
    pub fn expire(&self, now: DateTime<Utc>) -> usize {
        let mut toasts = self.toasts.borrow_mut();
        let before = toasts.len();
        toasts.retain(|toast| toast.expires_at().map_or(true, |at| at > now));
        before - toasts.len()
    }
}
