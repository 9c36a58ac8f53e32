//! Toast notification container.
//!
//! Toasts are transient: each one is appended with a monotonically
//! increasing id and removed again by a timer after its duration elapses.
//! Removal by id is also exposed for manual dismissal.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use shophub_core::ToastId;

/// How long a toast stays visible unless dismissed.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(2500);

/// Visual style of a toast message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToastVariant {
    /// Confirmation of a completed action (the default).
    #[default]
    Success,
    /// Something worked but deserves attention.
    Warning,
    /// An action failed.
    Error,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Unique id, increasing in display order.
    pub id: ToastId,
    /// Message text.
    pub message: String,
    /// Visual style.
    pub variant: ToastVariant,
}

/// The notification container.
///
/// Cheaply cloneable; all clones share the same toast list. Expiry timers
/// are spawned on the ambient Tokio runtime, so [`Toasts::show`] must be
/// called from within one.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    inner: Arc<ToastsInner>,
}

#[derive(Debug, Default)]
struct ToastsInner {
    toasts: Mutex<Vec<Toast>>,
    next_id: AtomicU64,
}

impl Toasts {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a success toast with the default duration.
    pub fn show(&self, message: impl Into<String>) -> ToastId {
        self.show_with(message, ToastVariant::Success, DEFAULT_TOAST_DURATION)
    }

    /// Show a toast and schedule its removal after `duration`.
    pub fn show_with(
        &self,
        message: impl Into<String>,
        variant: ToastVariant,
        duration: Duration,
    ) -> ToastId {
        let id = ToastId::new(self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let toast = Toast {
            id,
            message: message.into(),
            variant,
        };
        debug!(id = id.as_u64(), ?variant, "toast shown");
        self.lock().push(toast);

        let container = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            container.remove(id);
        });

        id
    }

    /// Remove a toast immediately. No-op if it already expired.
    pub fn remove(&self, id: ToastId) {
        self.lock().retain(|t| t.id != id);
    }

    /// Currently visible toasts, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Toast> {
        self.lock().clone()
    }

    /// Number of currently visible toasts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether there are no visible toasts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Toast>> {
        self.inner
            .toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Give spawned expiry tasks a chance to run after advancing time.
    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_visible_then_expires() {
        let toasts = Toasts::new();
        toasts.show("Added to cart");

        let active = toasts.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "Added to cart");
        assert_eq!(active[0].variant, ToastVariant::Success);

        settle().await;
        tokio::time::advance(DEFAULT_TOAST_DURATION + Duration::from_millis(10)).await;
        settle().await;
        assert!(toasts.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toasts_keep_insertion_order_and_unique_ids() {
        let toasts = Toasts::new();
        let first = toasts.show("first");
        let second = toasts.show_with("second", ToastVariant::Warning, DEFAULT_TOAST_DURATION);
        let third = toasts.show_with("third", ToastVariant::Error, DEFAULT_TOAST_DURATION);

        assert!(first < second && second < third);

        let messages: Vec<String> = toasts.active().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_dismissal() {
        let toasts = Toasts::new();
        let id = toasts.show("dismiss me");
        let kept = toasts.show("keep me");

        toasts.remove(id);
        let active = toasts.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, kept);
    }

    #[tokio::test(start_paused = true)]
    async fn test_staggered_expiry() {
        let toasts = Toasts::new();
        toasts.show_with("short", ToastVariant::Success, Duration::from_millis(100));
        toasts.show_with("long", ToastVariant::Success, Duration::from_millis(500));

        settle().await;
        tokio::time::advance(Duration::from_millis(200)).await;
        settle().await;
        let messages: Vec<String> = toasts.active().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["long"]);

        tokio::time::advance(Duration::from_millis(400)).await;
        settle().await;
        assert!(toasts.is_empty());
    }
}
