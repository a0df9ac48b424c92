//! Transient, user-visible messages about the outcome of an action.
//!
//! The library does not render anything itself. It hands `Notification` values to a `Notifier`,
//! and the front end decides how to show them. `TracingNotifier` writes them to the log, which is
//! what the CLI uses.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, info, Level};

/// How long a notification should stay on screen.
pub const VISIBILITY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

serde_plain::derive_display_from_serialize!(NotificationKind);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    kind: NotificationKind,
    title: String,
    message: String,
    visibility: Duration,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Success".to_string(),
            message: message.into(),
            visibility: VISIBILITY,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Error".to_string(),
            message: message.into(),
            visibility: VISIBILITY,
        }
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn visibility(&self) -> Duration {
        self.visibility
    }
}

/// Something that can present a `Notification` to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Presents notifications by logging them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier {
    errors_reported_elsewhere: bool,
}

impl TracingNotifier {
    /// Logs successes at `info` and errors at `error`.
    pub fn new() -> Self {
        Self::default()
    }

    /// For callers that report every failure themselves, such as the CLI, which exits with the
    /// error. Error notifications are logged at `debug` so the failure is not shown twice.
    pub fn errors_reported_elsewhere() -> Self {
        Self {
            errors_reported_elsewhere: true,
        }
    }

    /// The level a notification of `kind` is logged at.
    pub fn level(&self, kind: NotificationKind) -> Level {
        match kind {
            NotificationKind::Success => Level::INFO,
            NotificationKind::Error if self.errors_reported_elsewhere => Level::DEBUG,
            NotificationKind::Error => Level::ERROR,
        }
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let message = notification.message();
        match self.level(notification.kind()) {
            Level::ERROR => error!("{message}"),
            Level::DEBUG => debug!("{message}"),
            _ => info!("{message}"),
        }
    }
}

/// Keeps every notification in memory. Useful for tests and for front ends that poll.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all notifications received so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Removes and returns all notifications received so far.
    pub fn take(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        match self.notifications.lock() {
            Ok(mut guard) => guard.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
