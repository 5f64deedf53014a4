//! Fire-and-forget user notifications.

use strum_macros::{Display, EnumString};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationStatus {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub status: NotificationStatus,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn new(status: NotificationStatus, title: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            description: None,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NotificationStatus::Success, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NotificationStatus::Error, title)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Best-effort side channel. No return value and no ordering guarantee.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Records every notification through `tracing` and optionally mirrors it to
/// the desktop notification center.
#[derive(Debug, Clone, Default)]
pub struct NotificationService {
    desktop: bool,
}

impl NotificationService {
    pub fn new(desktop: bool) -> Self {
        Self { desktop }
    }

    fn show_desktop(notification: Notification) {
        let body = notification.description.unwrap_or_default();
        if let Err(e) = notify_rust::Notification::new()
            .appname("CriticalAsset")
            .summary(&notification.title)
            .body(&body)
            .show()
        {
            debug!(error = %e, "Desktop notification failed");
        }
    }
}

impl Notifier for NotificationService {
    fn notify(&self, notification: Notification) {
        let description = notification.description.as_deref().unwrap_or_default();
        match notification.status {
            NotificationStatus::Success | NotificationStatus::Info => {
                info!(status = %notification.status, description, "{}", notification.title)
            }
            NotificationStatus::Warning => {
                warn!(description, "{}", notification.title)
            }
            NotificationStatus::Error => {
                error!(description, "{}", notification.title)
            }
        }

        if self.desktop {
            // show() blocks on the notification daemon
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn_blocking(move || Self::show_desktop(notification));
                }
                Err(_) => Self::show_desktop(notification),
            }
        }
    }
}
