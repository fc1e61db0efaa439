use serde_json::json;

use crate::error::StoreError;
use crate::ipc::helpers::{parse_params, required_str, respond};
use crate::ipc::types::{AppState, Request};
use crate::repo::calendar::{CalendarRepo, EventPatch, NewEvent};
use crate::store::KvStore;

fn list(store: &KvStore, _params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let events = CalendarRepo::new(store).events()?;
    Ok(json!({ "events": events }))
}

fn add(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let new: NewEvent = parse_params(params)?;
    let event = CalendarRepo::new(store).add(new)?;
    Ok(json!({ "event": event }))
}

fn update(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let patch: EventPatch = parse_params(params)?;
    let event = CalendarRepo::new(store).update(patch)?;
    Ok(json!({ "event": event }))
}

fn delete(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let id = required_str(params, "id")?;
    let deleted = CalendarRepo::new(store).delete(&id)?;
    Ok(json!({ "deleted": deleted }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "calendar.events.list" => Some(respond(state, req, list)),
        "calendar.events.add" => Some(respond(state, req, add)),
        "calendar.events.update" => Some(respond(state, req, update)),
        "calendar.events.delete" => Some(respond(state, req, delete)),
        _ => None,
    }
}
