//! In-memory notification log.

use agrisync_bridge::notification::{Notification, NotificationId, NotificationSeed};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("notification {0} not found")]
    NotFound(NotificationId),
    #[error("notification id {0} is used more than once")]
    DuplicateId(NotificationId),
}

/// Ordered log of notifications. Entries are only ever marked as read; the
/// unread count is computed from the entries rather than tracked.
#[derive(Debug, Clone, Default)]
pub struct NotificationStore {
    entries: Vec<Notification>,
}

impl NotificationStore {
    /// Builds the log from its seed list, stamping every entry with
    /// `created_at`.
    pub fn from_seed(
        seeds: Vec<NotificationSeed>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let mut entries: Vec<Notification> = Vec::with_capacity(seeds.len());
        for seed in seeds {
            if entries.iter().any(|entry| entry.id == seed.id) {
                return Err(StoreError::DuplicateId(seed.id));
            }
            entries.push(seed.into_notification(created_at));
        }
        Ok(Self { entries })
    }

    /// Entries in insertion order.
    pub fn list(&self) -> &[Notification] {
        &self.entries
    }

    /// Marks an entry as read. Marking an entry that is already read is a
    /// no-op.
    pub fn mark_read(&mut self, id: &NotificationId) -> Result<(), StoreError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| &entry.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        entry.read = true;
        Ok(())
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.read).count()
    }
}
