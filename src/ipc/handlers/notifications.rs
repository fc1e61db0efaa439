use serde_json::json;

use crate::error::StoreError;
use crate::ipc::helpers::{required_str, respond};
use crate::ipc::types::{AppState, Request};
use crate::repo::notifications::NotificationRepo;
use crate::store::KvStore;

fn list(store: &KvStore, _params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let notifications = NotificationRepo::new(store).list()?;
    Ok(json!({ "notifications": notifications }))
}

fn add(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let title = required_str(params, "title")?;
    let message = required_str(params, "message")?;
    let notification = NotificationRepo::new(store).add(&title, &message)?;
    Ok(json!({ "notification": notification }))
}

fn mark_read(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let id = required_str(params, "id")?;
    let notification = NotificationRepo::new(store).mark_read(&id)?;
    Ok(json!({ "notification": notification }))
}

fn delete(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let id = required_str(params, "id")?;
    let deleted = NotificationRepo::new(store).delete(&id)?;
    Ok(json!({ "deleted": deleted }))
}

fn clear(store: &KvStore, _params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    NotificationRepo::new(store).clear()?;
    Ok(json!({ "cleared": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "notifications.list" => Some(respond(state, req, list)),
        "notifications.add" => Some(respond(state, req, add)),
        "notifications.markRead" => Some(respond(state, req, mark_read)),
        "notifications.delete" => Some(respond(state, req, delete)),
        "notifications.clear" => Some(respond(state, req, clear)),
        _ => None,
    }
}
