//! Desktop notification for volume changes
//!
//! Each change replaces the previous notification instead of stacking a new
//! one. The handle of the last notification is kept in the state store.

use crate::error::{DdcVolumeError, DdcVolumeResult};
use crate::state::{StateKey, StateStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use zbus::zvariant::Value;
use zbus::Connection;

const NOTIFICATIONS_BUS_NAME: &str = "org.freedesktop.Notifications";
const NOTIFICATIONS_OBJECT_PATH: &str = "/org/freedesktop/Notifications";
const NOTIFICATIONS_INTERFACE: &str = "org.freedesktop.Notifications";

/// Icon shown next to the volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeIcon {
    Low,
    Medium,
    High,
}

impl VolumeIcon {
    /// Pick the icon for a volume level
    pub fn for_volume(volume: u8) -> Self {
        if volume < 33 {
            Self::Low
        } else if volume < 66 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Freedesktop icon name
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Low => "audio-volume-low-symbolic",
            Self::Medium => "audio-volume-medium-symbolic",
            Self::High => "audio-volume-high-symbolic",
        }
    }
}

/// Notification contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeNotification {
    /// Handle of the notification to replace, 0 for a new one
    pub replaces_id: u32,
    pub icon: VolumeIcon,
    pub summary: String,
    pub volume: u8,
    pub timeout_ms: i32,
}

impl VolumeNotification {
    /// Build the notification for `volume`
    pub fn new(volume: u8, replaces_id: u32, timeout_ms: i32) -> Self {
        Self {
            replaces_id,
            icon: VolumeIcon::for_volume(volume),
            summary: format!("Volume {}%", volume),
            volume,
            timeout_ms,
        }
    }
}

/// Something that can show notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show or replace a notification, returning its handle
    async fn notify(&self, notification: &VolumeNotification) -> DdcVolumeResult<u32>;
}

/// Notifier talking to the freedesktop notification server over D-Bus
pub struct DbusNotifier {
    app_name: String,
}

impl DbusNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

#[async_trait]
impl Notifier for DbusNotifier {
    async fn notify(&self, notification: &VolumeNotification) -> DdcVolumeResult<u32> {
        let connection = Connection::session()
            .await
            .map_err(|e| DdcVolumeError::Notification(format!("opening session bus: {}", e)))?;

        let mut hints: HashMap<&str, Value<'_>> = HashMap::new();
        hints.insert("transient", Value::from(true));
        // Makes some servers draw a volume bar in place instead of a popup
        hints.insert("x-canonical-private-synchronous", Value::from(""));
        hints.insert("value", Value::from(i32::from(notification.volume)));
        let actions: Vec<&str> = Vec::new();

        let reply = connection
            .call_method(
                Some(NOTIFICATIONS_BUS_NAME),
                NOTIFICATIONS_OBJECT_PATH,
                Some(NOTIFICATIONS_INTERFACE),
                "Notify",
                &(
                    self.app_name.as_str(),
                    notification.replaces_id,
                    notification.icon.icon_name(),
                    notification.summary.as_str(),
                    "",
                    actions,
                    hints,
                    notification.timeout_ms,
                ),
            )
            .await
            .map_err(|e| DdcVolumeError::Notification(format!("Notify call failed: {}", e)))?;

        reply
            .body()
            .deserialize::<u32>()
            .map_err(|e| DdcVolumeError::Notification(format!("decoding Notify reply: {}", e)))
    }
}

/// Shows the current volume, replacing the previous notification
pub struct NotificationPublisher {
    store: StateStore,
    notifier: Arc<dyn Notifier>,
    timeout_ms: i32,
}

impl NotificationPublisher {
    pub fn new(store: StateStore, notifier: Arc<dyn Notifier>, timeout_ms: i32) -> Self {
        Self {
            store,
            notifier,
            timeout_ms,
        }
    }

    /// Show `volume` and remember the notification handle
    ///
    /// On failure the stored handle is kept.
    pub async fn publish(&self, volume: u8) -> DdcVolumeResult<()> {
        let notifier = &self.notifier;
        let timeout_ms = self.timeout_ms;

        self.store
            .scoped_update(StateKey::NotificationId, |current| async move {
                let replaces_id = current.trim().parse::<u32>().unwrap_or(0);
                let notification = VolumeNotification::new(volume, replaces_id, timeout_ms);
                let id = notifier.notify(&notification).await?;
                debug!("Notification {} replaced by {}", replaces_id, id);
                Ok(id.to_string())
            })
            .await?;

        Ok(())
    }
}
