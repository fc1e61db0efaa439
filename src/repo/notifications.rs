use chrono::Utc;

use crate::error::StoreError;
use crate::model::{fresh_id, Notification};
use crate::store::{KvStore, NOTIFICATIONS_KEY};

/// Owns the user notification collection.
pub struct NotificationRepo<'a> {
    store: &'a KvStore,
}

impl<'a> NotificationRepo<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        NotificationRepo { store }
    }

    pub fn list(&self) -> Result<Vec<Notification>, StoreError> {
        Ok(self.store.get_json(NOTIFICATIONS_KEY)?.unwrap_or_default())
    }

    pub fn add(&self, title: &str, message: &str) -> Result<Notification, StoreError> {
        if title.trim().is_empty() || message.trim().is_empty() {
            return Err(StoreError::invalid(
                "a notification needs a title and a message",
            ));
        }
        self.store
            .update_json(NOTIFICATIONS_KEY, |current: Option<Vec<Notification>>| {
                let mut notifications = current.unwrap_or_default();
                let notification = Notification {
                    id: fresh_id(|id| notifications.iter().any(|n| n.id == id)),
                    title: title.to_string(),
                    message: message.to_string(),
                    read: false,
                    created_at: Utc::now().to_rfc3339(),
                    read_at: None,
                };
                notifications.push(notification.clone());
                Ok((notifications, notification))
            })
    }

    pub fn mark_read(&self, id: &str) -> Result<Notification, StoreError> {
        self.store
            .update_json(NOTIFICATIONS_KEY, |current: Option<Vec<Notification>>| {
                let mut notifications = current.unwrap_or_default();
                let notification = notifications
                    .iter_mut()
                    .find(|n| n.id == id)
                    .ok_or_else(|| StoreError::not_found(format!("notification {id}")))?;
                notification.read = true;
                notification.read_at = Some(Utc::now().to_rfc3339());
                let updated = notification.clone();
                Ok((notifications, updated))
            })
    }

    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store
            .update_json(NOTIFICATIONS_KEY, |current: Option<Vec<Notification>>| {
                let mut notifications = current.unwrap_or_default();
                let before = notifications.len();
                notifications.retain(|n| n.id != id);
                let removed = notifications.len() != before;
                Ok((notifications, removed))
            })
    }

    /// Drops the whole collection key.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(NOTIFICATIONS_KEY)
    }
}
