//! Toast queue: the reference [`Notifier`].
//!
//! Toasts are appended in arrival order, expire `duration` after they were
//! enqueued (a zero duration never expires) and can be dismissed by id.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::debug;

use crate::core::constants::Severity;
use crate::core::host::Notifier;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: String,
    pub message: String,
    pub severity: Severity,
    pub expires_at: Option<Instant>,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[derive(Default)]
pub struct ToastQueue {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn toasts(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueues a toast and returns its id.
    pub fn push(&self, message: &str, severity: Severity, duration: Duration) -> String {
        self.push_at(message, severity, duration, Instant::now())
    }

    pub fn push_at(
        &self,
        message: &str,
        severity: Severity,
        duration: Duration,
        now: Instant,
    ) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let expires_at = (!duration.is_zero()).then(|| now + duration);
        debug!("Toast {} [{}]: {}", id, severity.label(), message);
        self.toasts().push(Toast {
            id: id.clone(),
            message: message.to_string(),
            severity,
            expires_at,
        });
        id
    }

    /// Removes a toast. Returns false if it was already gone.
    pub fn dismiss(&self, id: &str) -> bool {
        let mut toasts = self.toasts();
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    /// Drops expired toasts and returns the ones still visible.
    pub fn active(&self, now: Instant) -> Vec<Toast> {
        let mut toasts = self.toasts();
        toasts.retain(|t| !t.is_expired(now));
        toasts.clone()
    }

    /// Removes and returns every toast, expired or not.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts())
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, message: &str, severity: Severity, duration: Duration) {
        self.push(message, severity, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire_after_duration() {
        let queue = ToastQueue::new();
        let t0 = Instant::now();
        queue.push_at("short", Severity::Info, Duration::from_millis(3000), t0);
        queue.push_at("long", Severity::Error, Duration::from_millis(8000), t0);

        let visible = queue.active(t0 + Duration::from_millis(5000));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].message, "long");
    }

    #[test]
    fn test_zero_duration_is_sticky() {
        let queue = ToastQueue::new();
        let t0 = Instant::now();
        queue.push_at("sticky", Severity::Warning, Duration::ZERO, t0);
        assert_eq!(queue.active(t0 + Duration::from_secs(3600)).len(), 1);
    }

    #[test]
    fn test_dismiss_by_id() {
        let queue = ToastQueue::new();
        let id = queue.push("bye", Severity::Success, Duration::from_secs(5));
        assert!(queue.dismiss(&id));
        assert!(!queue.dismiss(&id));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_notifier_enqueues() {
        let queue = ToastQueue::new();
        queue.notify("hola", Severity::Error, Duration::from_secs(5));
        let toasts = queue.drain();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].severity, Severity::Error);
    }
}
