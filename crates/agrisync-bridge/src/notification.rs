use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of an alert kept in the notification log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum NotificationCategory {
    /// Something needs attention (weather warnings, late check-ins).
    Alert,
    Info,
    Success,
}

/// Identifier of a [`Notification`], unique within one store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct NotificationId(pub String);

impl From<&str> for NotificationId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entry of the notification log.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub category: NotificationCategory,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

/// Seed record for the notification log, as written in the configuration
/// file. The creation time is stamped when the log is built.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NotificationSeed {
    pub id: NotificationId,
    pub message: String,
    pub category: NotificationCategory,
    #[serde(default)]
    pub read: bool,
}

impl NotificationSeed {
    pub fn into_notification(self, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: self.id,
            message: self.message,
            category: self.category,
            created_at,
            read: self.read,
        }
    }
}

/// Severity of a transient toast shown by the frontend. Unlike
/// [`Notification`] these are not stored anywhere.
#[derive(Debug, Clone)]
pub enum ToastType {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient toast payload intended for the user interface.
#[derive(Debug, Clone)]
pub struct ToastMessage {
    pub toast_type: ToastType,
    pub message: String,
}
