use chrono::Utc;
use serde::Deserialize;

use crate::error::StoreError;
use crate::model::{fresh_id, CalendarEvent};
use crate::store::{KvStore, CALENDAR_EVENTS_KEY};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Owns the calendar event collection.
pub struct CalendarRepo<'a> {
    store: &'a KvStore,
}

impl<'a> CalendarRepo<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        CalendarRepo { store }
    }

    pub fn events(&self) -> Result<Vec<CalendarEvent>, StoreError> {
        Ok(self.store.get_json(CALENDAR_EVENTS_KEY)?.unwrap_or_default())
    }

    pub fn add(&self, new: NewEvent) -> Result<CalendarEvent, StoreError> {
        if new.title.trim().is_empty() || new.date.trim().is_empty() {
            return Err(StoreError::invalid("an event needs a title and a date"));
        }
        self.store
            .update_json(CALENDAR_EVENTS_KEY, |current: Option<Vec<CalendarEvent>>| {
                let mut events = current.unwrap_or_default();
                let event = CalendarEvent {
                    id: fresh_id(|id| events.iter().any(|e| e.id == id)),
                    title: new.title,
                    date: new.date,
                    time: new.time,
                    description: new.description,
                    created_at: Utc::now().to_rfc3339(),
                    updated_at: None,
                };
                events.push(event.clone());
                Ok((events, event))
            })
    }

    pub fn update(&self, patch: EventPatch) -> Result<CalendarEvent, StoreError> {
        self.store
            .update_json(CALENDAR_EVENTS_KEY, |current: Option<Vec<CalendarEvent>>| {
                let mut events = current.unwrap_or_default();
                let event = events
                    .iter_mut()
                    .find(|e| e.id == patch.id)
                    .ok_or_else(|| StoreError::not_found(format!("event {}", patch.id)))?;
                if let Some(v) = patch.title {
                    event.title = v;
                }
                if let Some(v) = patch.date {
                    event.date = v;
                }
                if let Some(v) = patch.time {
                    event.time = Some(v);
                }
                if let Some(v) = patch.description {
                    event.description = Some(v);
                }
                event.updated_at = Some(Utc::now().to_rfc3339());
                let updated = event.clone();
                Ok((events, updated))
            })
    }

    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store
            .update_json(CALENDAR_EVENTS_KEY, |current: Option<Vec<CalendarEvent>>| {
                let mut events = current.unwrap_or_default();
                let before = events.len();
                events.retain(|e| e.id != id);
                let removed = events.len() != before;
                Ok((events, removed))
            })
    }
}
