//! Waterdip Dashboard Notifications
//!
//! Snackbar-style messages raised by pages and the monitor wizard. The
//! renderer drains them; tests inspect them.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{info, warn};
use waterdip_common::error::MUTATION_FAILED_MESSAGE;
use waterdip_common::WaterdipError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Shared queue of pending notifications.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    queue: Arc<Mutex<VecDeque<Notification>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, kind: NotificationKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            NotificationKind::Error => warn!(%message, "notification"),
            _ => info!(%message, "notification"),
        }
        self.queue.lock().push_back(Notification { kind, message });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NotificationKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NotificationKind::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NotificationKind::Info, message);
    }

    /// A failed mutation: the generic message is shown, the server's own
    /// messages only reach the log.
    pub fn mutation_failed(&self, err: &WaterdipError) {
        warn!(error = %err, details = ?err.user_messages(), "mutation failed");
        self.error(MUTATION_FAILED_MESSAGE);
    }

    pub fn drain(&self) -> Vec<Notification> {
        self.queue.lock().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
