use serde_json::json;

use crate::error::StoreError;
use crate::ipc::helpers::{parse_params, required_str, respond};
use crate::ipc::types::{AppState, Request};
use crate::model::ClassInfo;
use crate::repo::schedule::ScheduleRepo;
use crate::store::KvStore;

fn full(store: &KvStore, _params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let schedule = ScheduleRepo::new(store).full()?;
    Ok(json!({ "schedule": schedule }))
}

fn day(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let day = required_str(params, "day")?;
    let schedule = ScheduleRepo::new(store).for_day(&day)?;
    Ok(json!({ "schedule": schedule }))
}

fn update_class(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let day = required_str(params, "day")?;
    let time_slot = required_str(params, "timeSlot")?;
    let info: ClassInfo = parse_params(
        params
            .get("class")
            .ok_or_else(|| StoreError::invalid("missing class"))?,
    )?;
    ScheduleRepo::new(store).update_class(&day, &time_slot, info)?;
    Ok(json!({ "updated": true }))
}

fn teacher(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let teacher = required_str(params, "teacher")?;
    let classes = ScheduleRepo::new(store).for_teacher(&teacher)?;
    Ok(json!({ "classes": classes }))
}

fn current(store: &KvStore, _params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let classes = ScheduleRepo::new(store).current()?;
    Ok(json!({ "classes": classes }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "schedule.full" => Some(respond(state, req, full)),
        "schedule.day" => Some(respond(state, req, day)),
        "schedule.updateClass" => Some(respond(state, req, update_class)),
        "schedule.teacher" => Some(respond(state, req, teacher)),
        "schedule.current" => Some(respond(state, req, current)),
        _ => None,
    }
}
